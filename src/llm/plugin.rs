// LLM插件系统 - 定义识别服务提供商接口和提示词

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::scan::{parse_extraction, AthkarExtraction, ScanError, ScanImage};

/// 识别指令（固定）
pub const EXTRACTION_PROMPT: &str = "قم باستخراج الأذكار أو الأدعية الموجودة في هذه الصورة. لكل ذكر، حدد النص العربي بدقة، وعدد مرات التكرار (إذا وجد، وإلا اجعله 1)، والمرجع (مثلاً: رواه مسلم، أو قرآن كريم).";

/// 不支持结构化 schema 的接口需要在提示词里写明输出格式
pub const JSON_FORMAT_HINT: &str = r#"أعد النتيجة بصيغة JSON فقط على الشكل: {"athkar": [{"text": "...", "count": 1, "reference": "..."}]}"#;

/// 识别结果的 JSON schema（Gemini responseSchema 格式）
pub fn athkar_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "athkar": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "text": {
                            "type": "STRING",
                            "description": "The Arabic text of the Thikr or Dua without tashkeel errors."
                        },
                        "count": {
                            "type": "INTEGER",
                            "description": "Recommended number of repetitions."
                        },
                        "reference": {
                            "type": "STRING",
                            "description": "Source or reference if available (e.g., Quran, Hadith)."
                        }
                    },
                    "required": ["text", "count"]
                }
            }
        }
    })
}

/// 提供商能力
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderCapabilities {
    /// 是否支持结构化输出 schema
    pub structured_output: bool,
    /// 支持的图片MIME类型
    pub supported_mime_types: Vec<String>,
}

impl ProviderCapabilities {
    pub fn supports_mime(&self, mime_type: &str) -> bool {
        self.supported_mime_types.iter().any(|m| m == mime_type)
    }
}

impl Default for ProviderCapabilities {
    fn default() -> Self {
        Self {
            structured_output: false,
            supported_mime_types: vec![
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/webp".to_string(),
            ],
        }
    }
}

/// 发给模型的完整指令
///
/// 不支持 schema 的接口只能靠提示词约束输出格式
pub fn extraction_prompt(capabilities: &ProviderCapabilities) -> String {
    if capabilities.structured_output {
        EXTRACTION_PROMPT.to_string()
    } else {
        format!("{}\n{}", EXTRACTION_PROMPT, JSON_FORMAT_HINT)
    }
}

/// 识别服务提供商
#[async_trait]
pub trait ExtractionProvider: Send + Sync {
    /// 发送图片和识别指令，返回模型输出的原始文本
    ///
    /// 没有输出时返回空字符串，由调用方判定为失败
    async fn extract_text(&self, image: &ScanImage) -> Result<String>;

    /// 识别图片中的记念列表
    async fn extract_athkar(&self, image: &ScanImage) -> Result<AthkarExtraction, ScanError> {
        let raw = self
            .extract_text(image)
            .await
            .map_err(|e| ScanError::Provider(e.to_string()))?;
        parse_extraction(&raw)
    }

    /// 提供商名称
    fn name(&self) -> &str;

    /// 配置提供商（api_key、model、base_url）
    fn configure(&mut self, config: Value) -> Result<()>;

    /// 是否已配置
    fn is_configured(&self) -> bool;

    /// 提供商能力
    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::default()
    }
}

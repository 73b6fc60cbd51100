// LLM模块 - 管理图片识别服务

pub mod gemini;
pub mod plugin;
pub mod qwen;

pub use gemini::GeminiProvider;
pub use plugin::{ExtractionProvider, ProviderCapabilities, EXTRACTION_PROMPT};
pub use qwen::QwenProvider;

use anyhow::{anyhow, Result};
use tracing::{error, info};

use crate::scan::{AthkarExtraction, ScanError, ScanImage};

/// LLM管理器
pub struct LLMManager {
    /// 当前使用的提供商
    provider: Box<dyn ExtractionProvider>,
    /// 当前配置
    config: LLMConfig,
    /// 共享的 HTTP 客户端（切换 provider 时复用）
    http_client: reqwest::Client,
}

/// LLM配置
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LLMConfig {
    /// 当前使用的 provider: "gemini" 或 "qwen"
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Gemini配置
    #[serde(default)]
    pub gemini: GeminiConfig,
    /// Qwen配置
    #[serde(default)]
    pub qwen: QwenConfig,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            gemini: GeminiConfig::default(),
            qwen: QwenConfig::default(),
        }
    }
}

fn default_provider() -> String {
    "gemini".to_string()
}

/// Gemini配置
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct GeminiConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_gemini_model")]
    pub model: String,
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_gemini_model(),
            base_url: default_gemini_base_url(),
        }
    }
}

pub(crate) fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_string()
}

pub(crate) fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

/// Qwen配置
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct QwenConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_qwen_model")]
    pub model: String,
    #[serde(default = "default_qwen_base_url")]
    pub base_url: String,
}

impl Default for QwenConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_qwen_model(),
            base_url: default_qwen_base_url(),
        }
    }
}

pub(crate) fn default_qwen_model() -> String {
    "qwen-vl-max-latest".to_string()
}

pub(crate) fn default_qwen_base_url() -> String {
    "https://dashscope.aliyuncs.com/compatible-mode/v1".to_string()
}

impl LLMManager {
    /// 创建新的LLM管理器（接受共享的HTTP客户端以复用连接池）
    pub fn new(client: reqwest::Client) -> Self {
        // 默认使用 Gemini provider
        let provider: Box<dyn ExtractionProvider> = Box::new(GeminiProvider::new(client.clone()));

        Self {
            provider,
            config: LLMConfig::default(),
            http_client: client,
        }
    }

    /// 应用完整配置：按需切换 provider，再把对应的配置段交给 provider
    pub fn configure(&mut self, config: LLMConfig) -> Result<()> {
        self.switch_provider(&config.provider)?;

        let section = match self.config.provider.as_str() {
            "qwen" => serde_json::to_value(&config.qwen)?,
            _ => serde_json::to_value(&config.gemini)?,
        };
        self.provider.configure(section)?;

        let provider = self.config.provider.clone();
        self.config = LLMConfig { provider, ..config };

        info!("LLM 配置已更新 (provider={})", self.config.provider);
        Ok(())
    }

    /// 切换 provider（使用内部保存的 client）
    pub fn switch_provider(&mut self, provider_name: &str) -> Result<()> {
        let normalized = match provider_name {
            "gemini" => "gemini",
            // "openai" 是 Qwen 的别名（因为使用 OpenAI 兼容接口）
            "qwen" | "openai" => "qwen",
            _ => return Err(anyhow!("不支持的 provider: {}", provider_name)),
        };

        // 检查是否已经是目标 provider，避免重复创建实例
        if self.config.provider == normalized {
            return Ok(());
        }

        info!(
            "切换 LLM provider: {} -> {}",
            self.config.provider, normalized
        );

        self.provider = match normalized {
            "qwen" => Box::new(QwenProvider::new(self.http_client.clone())),
            _ => Box::new(GeminiProvider::new(self.http_client.clone())),
        };
        self.config.provider = normalized.to_string();

        // 新实例需要重新应用已保存的配置
        let section = match normalized {
            "qwen" => serde_json::to_value(&self.config.qwen)?,
            _ => serde_json::to_value(&self.config.gemini)?,
        };
        self.provider.configure(section)?;

        Ok(())
    }

    /// 获取当前配置
    pub fn get_config(&self) -> LLMConfig {
        self.config.clone()
    }

    /// 当前 provider 名称
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_configured()
    }

    /// 识别图片中的记念列表
    pub async fn extract(&self, image: &ScanImage) -> Result<AthkarExtraction, ScanError> {
        if !self.provider.is_configured() {
            return Err(ScanError::NotConfigured(format!(
                "{} 缺少 API key",
                self.provider.name()
            )));
        }

        if !self.provider.capabilities().supports_mime(&image.mime_type) {
            return Err(ScanError::InvalidImage(format!(
                "{} 不支持的图片格式: {}",
                self.provider.name(),
                image.mime_type
            )));
        }

        info!(
            "使用 {} 识别图片 ({} 字节, {})",
            self.provider.name(),
            image.bytes.len(),
            image.mime_type
        );

        match self.provider.extract_athkar(image).await {
            Ok(extraction) => {
                info!("识别成功: {} 条记录", extraction.athkar.len());
                Ok(extraction)
            }
            Err(e) => {
                error!("识别失败: {}", e);
                Err(e)
            }
        }
    }
}

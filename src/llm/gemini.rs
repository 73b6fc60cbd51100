// Google Gemini 提供商实现 - 内联图片 + 结构化JSON输出

use super::plugin::*;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error, info, warn};

use crate::scan::ScanImage;

/// Gemini提供商
pub struct GeminiProvider {
    api_key: Option<String>,
    model: String,
    client: Client,
    base_url: String,
}

impl GeminiProvider {
    /// 创建新的Gemini提供商（接受共享的HTTP客户端以复用连接池）
    pub fn new(client: Client) -> Self {
        Self {
            api_key: None,
            model: super::default_gemini_model(),
            client,
            base_url: super::default_gemini_base_url(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl ExtractionProvider for GeminiProvider {
    async fn extract_text(&self, image: &ScanImage) -> Result<String> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| anyhow!("Gemini API key未配置"))?;

        let start_time = std::time::Instant::now();

        let request_body = json!({
            "contents": [{
                "parts": [
                    {
                        "inlineData": {
                            "mimeType": image.mime_type,
                            "data": image.to_base64()
                        }
                    },
                    { "text": extraction_prompt(&self.capabilities()) }
                ]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": athkar_response_schema()
            }
        });

        debug!(
            "调用Gemini API: model={}, image_bytes={}",
            self.model,
            image.bytes.len()
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            error!("Gemini API错误 ({}): {}", status, error_text);
            return Err(anyhow!("Gemini API调用失败 ({}): {}", status, error_text));
        }

        let response_data: GeminiResponse = response.json().await?;

        if let Some(reason) = response_data
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_ref())
        {
            return Err(anyhow!("Gemini 拒绝处理该图片: {}", reason));
        }

        let candidate = match response_data.candidates.into_iter().next() {
            Some(candidate) => candidate,
            None => {
                warn!("Gemini 响应中没有候选结果");
                return Ok(String::new());
            }
        };

        if candidate.finish_reason.as_deref() == Some("MAX_TOKENS") {
            return Err(anyhow!("Gemini 响应被截断（达到输出token限制）"));
        }

        let text: String = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        info!(
            "Gemini 返回 {} 字符，耗时 {}ms",
            text.len(),
            start_time.elapsed().as_millis()
        );
        Ok(text)
    }

    fn name(&self) -> &str {
        "Gemini"
    }

    fn configure(&mut self, config: serde_json::Value) -> Result<()> {
        // 配置 API key（空字符串表示清除）
        if let Some(api_key) = config.get("api_key").and_then(|v| v.as_str()) {
            let api_key = api_key.trim();
            if api_key.is_empty() {
                if self.api_key.take().is_some() {
                    info!("Gemini API key 已清除");
                }
            } else {
                self.api_key = Some(api_key.to_string());
                info!("✓ Gemini API key 已设置 (长度: {} 字符)", api_key.len());
            }
        }

        if let Some(model) = config.get("model").and_then(|v| v.as_str()) {
            if !model.trim().is_empty() {
                self.model = model.trim().to_string();
            }
        }

        if let Some(base_url) = config.get("base_url").and_then(|v| v.as_str()) {
            if !base_url.trim().is_empty() {
                self.base_url = base_url.trim().to_string();
            }
        }

        info!(
            "✓ Gemini提供商配置完成: model={}, api_key_configured={}",
            self.model,
            self.api_key.is_some()
        );
        Ok(())
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            structured_output: true,
            supported_mime_types: vec![
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/webp".to_string(),
                "image/gif".to_string(),
                "image/bmp".to_string(),
            ],
        }
    }
}

// Gemini API 响应结构
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>, // STOP, MAX_TOKENS, SAFETY ...
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    block_reason: Option<String>,
}

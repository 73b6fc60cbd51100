// 阿里通义千问提供商实现 - OpenAI 兼容接口，图片以 data URL 传入

use super::plugin::*;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error, info, warn};

use crate::scan::ScanImage;

/// Qwen提供商（阿里通义千问）
pub struct QwenProvider {
    api_key: Option<String>,
    model: String,
    client: Client,
    base_url: String,
}

impl QwenProvider {
    /// 创建新的Qwen提供商（接受共享的HTTP客户端以复用连接池）
    pub fn new(client: Client) -> Self {
        Self {
            api_key: None,
            model: super::default_qwen_model(), // 默认使用最新的视觉语言模型
            client,
            base_url: super::default_qwen_base_url(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl ExtractionProvider for QwenProvider {
    async fn extract_text(&self, image: &ScanImage) -> Result<String> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("Qwen API key未配置"))?;

        let start_time = std::time::Instant::now();

        let request_body = json!({
            "model": self.model,
            "response_format": {"type": "json_object"},  // 保证结构化输出
            "messages": [
                {
                    "role": "user",
                    "content": [
                        {
                            "type": "image_url",
                            "image_url": { "url": image.to_data_url() }
                        },
                        {
                            "type": "text",
                            "text": extraction_prompt(&self.capabilities())
                        }
                    ]
                }
            ],
            "temperature": 0.1
        });

        debug!(
            "调用Qwen API: model={}, base_url={}",
            self.model, self.base_url
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            error!("Qwen API错误: {}", error_text);
            return Err(anyhow::anyhow!("Qwen API调用失败: {}", error_text));
        }

        let response_text = response.text().await?;
        let response_data: QwenResponse = serde_json::from_str(&response_text)?;

        let choice = match response_data.choices.into_iter().next() {
            Some(choice) => choice,
            None => {
                warn!("Qwen 响应中没有 choices");
                return Ok(String::new());
            }
        };

        // 如果响应被截断，返回错误而不是不完整的 JSON
        if choice.finish_reason.as_deref() == Some("length") {
            return Err(anyhow::anyhow!(
                "LLM 响应被截断（达到 max_tokens 限制）。内容长度: {} 字符",
                choice.message.content.as_deref().map(str::len).unwrap_or(0)
            ));
        }

        info!("Qwen 调用完成，耗时 {}ms", start_time.elapsed().as_millis());
        Ok(choice.message.content.unwrap_or_default())
    }

    fn name(&self) -> &str {
        "Qwen"
    }

    fn configure(&mut self, config: serde_json::Value) -> Result<()> {
        info!("Qwen configure 被调用");

        // 配置 API key（空字符串表示清除）
        if let Some(api_key) = config.get("api_key").and_then(|v| v.as_str()) {
            let api_key = api_key.trim();
            if api_key.is_empty() {
                if self.api_key.take().is_some() {
                    info!("Qwen API key 已清除");
                }
            } else {
                self.api_key = Some(api_key.to_string());
                info!("✓ Qwen API key 已设置 (长度: {} 字符)", api_key.len());
            }
        } else {
            warn!("✗ 配置中没有 api_key 字段");
        }

        if let Some(model) = config.get("model").and_then(|v| v.as_str()) {
            if !model.trim().is_empty() {
                self.model = model.trim().to_string();
                info!("✓ Qwen model 已设置: {}", self.model);
            }
        }

        if let Some(base_url) = config.get("base_url").and_then(|v| v.as_str()) {
            if !base_url.trim().is_empty() {
                self.base_url = base_url.trim().to_string();
            }
        }

        info!(
            "✓ Qwen提供商配置完成: model={}, api_key_configured={}",
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
            structured_output: false,
            supported_mime_types: vec![
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/gif".to_string(),
                "image/webp".to_string(),
                "image/bmp".to_string(),
            ],
        }
    }
}

#[derive(Debug, Deserialize)]
struct QwenResponse {
    #[serde(default)]
    choices: Vec<QwenChoice>,
}

#[derive(Debug, Deserialize)]
struct QwenChoice {
    message: QwenMessage,
    finish_reason: Option<String>, // 完成原因：stop, length, etc
}

#[derive(Debug, Deserialize)]
struct QwenMessage {
    content: Option<String>,
}

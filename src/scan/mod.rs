//! 扫描结果导入
//!
//! 把外部AI服务返回的候选记录转换为扫描类别的条目：
//! - 图片数据准备（MIME识别、base64编码）
//! - 响应文本严格解析（不做JSON修复，格式错误即整体失败）
//! - 候选记录校验并生成条目

use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Category, ThikrItem};

/// 文件处理失败时展示给用户的提示
pub const FILE_ERROR_MESSAGE: &str = "حدث خطأ أثناء معالجة الملف.";
/// 识别失败时展示给用户的提示
pub const EXTRACTION_ERROR_MESSAGE: &str =
    "عذراً، لم نتمكن من قراءة الصورة. يرجى المحاولة مرة أخرى بصورة أوضح.";

/// 扫描错误
#[derive(Debug, Error)]
pub enum ScanError {
    /// 图片数据无效（空文件、base64解码失败等）
    #[error("图片数据无效: {0}")]
    InvalidImage(String),
    /// 尚未配置AI服务
    #[error("AI 服务未配置: {0}")]
    NotConfigured(String),
    /// 调用AI服务失败（网络错误、服务端错误）
    #[error("AI 服务调用失败: {0}")]
    Provider(String),
    /// AI服务没有返回内容
    #[error("AI 服务没有返回内容")]
    EmptyResponse,
    /// 响应不是合法的结构化JSON
    #[error("AI 响应格式错误: {0}")]
    MalformedResponse(String),
    /// 候选记录缺少必填字段
    #[error("第 {index} 条记录缺少字段 {field}")]
    MissingField { index: usize, field: &'static str },
    /// 内部服务不可用（Actor 已停止）
    #[error("服务不可用: {0}")]
    Unavailable(String),
}

impl ScanError {
    /// 面向用户的本地化提示，用户可以重新扫描
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidImage(_) => FILE_ERROR_MESSAGE,
            _ => EXTRACTION_ERROR_MESSAGE,
        }
    }
}

/// 待识别的图片
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanImage {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ScanImage {
    /// 从原始字节创建，自动识别图片格式
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, ScanError> {
        if bytes.is_empty() {
            return Err(ScanError::InvalidImage("文件为空".to_string()));
        }

        let mime_type = detect_mime_type(&bytes).to_string();
        Ok(Self { mime_type, bytes })
    }

    /// 从 `data:<mime>;base64,<payload>` 或纯 base64 字符串创建
    pub fn from_data_url(data: &str) -> Result<Self, ScanError> {
        let payload = match data.split_once(',') {
            Some((_, payload)) => payload,
            None => data,
        };

        let bytes = general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| ScanError::InvalidImage(format!("base64 解码失败: {}", e)))?;

        Self::from_bytes(bytes)
    }

    /// base64 编码后的图片内容
    pub fn to_base64(&self) -> String {
        general_purpose::STANDARD.encode(&self.bytes)
    }

    /// data URL 形式（OpenAI 兼容接口使用）
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.to_base64())
    }
}

/// 识别图片MIME类型，无法识别时按JPEG处理
fn detect_mime_type(bytes: &[u8]) -> &'static str {
    use image::ImageFormat;

    match image::guess_format(bytes) {
        Ok(ImageFormat::Png) => "image/png",
        Ok(ImageFormat::WebP) => "image/webp",
        Ok(ImageFormat::Gif) => "image/gif",
        Ok(ImageFormat::Bmp) => "image/bmp",
        Ok(ImageFormat::Tiff) => "image/tiff",
        _ => "image/jpeg",
    }
}

/// AI服务返回的候选记录（宽松类型）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanCandidate {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub count: Option<i64>,
    #[serde(default)]
    pub reference: Option<String>,
}

/// AI服务的结构化响应 `{ athkar: [...] }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AthkarExtraction {
    pub athkar: Vec<ScanCandidate>,
}

/// 严格解析AI响应文本
///
/// 允许外层包裹 markdown 代码块；缺少 `athkar` 字段或JSON格式错误都视为失败。
pub fn parse_extraction(raw: &str) -> Result<AthkarExtraction, ScanError> {
    let cleaned = strip_code_fence(raw);
    if cleaned.is_empty() {
        return Err(ScanError::EmptyResponse);
    }

    serde_json::from_str::<AthkarExtraction>(&cleaned)
        .map_err(|e| ScanError::MalformedResponse(e.to_string()))
}

/// 把候选记录转换为扫描条目
///
/// ID 为 `scanned-<批次令牌>-<序号>`；次数缺失或非正数时按1处理；
/// 任何一条缺少文本都会使整批失败，不做部分导入。
pub fn ingest(candidates: Vec<ScanCandidate>, batch_token: &str) -> Result<Vec<ThikrItem>, ScanError> {
    candidates
        .into_iter()
        .enumerate()
        .map(|(index, candidate)| {
            let text = candidate
                .text
                .filter(|text| !text.trim().is_empty())
                .ok_or(ScanError::MissingField {
                    index,
                    field: "text",
                })?;

            let count = match candidate.count {
                Some(count) if count > 0 => u32::try_from(count).unwrap_or(u32::MAX),
                _ => 1,
            };

            let reference = candidate
                .reference
                .map(|r| r.trim().to_string())
                .unwrap_or_default();

            Ok(ThikrItem::new(
                format!("scanned-{}-{}", batch_token, index),
                text,
                count,
                reference,
                Category::Scanned,
            ))
        })
        .collect()
}

/// 去掉 ```json ... ``` 包裹（包括整段写在一行的情况）
fn strip_code_fence(text: &str) -> String {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed.to_string();
    };

    // 语言标记独占一行时整行跳过，否则只去掉紧跟的字母标记
    let body = match rest.split_once('\n') {
        Some((tag, body)) if tag.trim().chars().all(|c| c.is_ascii_alphanumeric()) => body,
        _ => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
    };

    let body = match body.rfind("```") {
        Some(end) => &body[..end],
        None => body,
    };
    body.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
    const JPEG_HEADER: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10, b'J', b'F', b'I', b'F'];

    fn candidate(text: &str, count: Option<i64>, reference: Option<&str>) -> ScanCandidate {
        ScanCandidate {
            text: Some(text.to_string()),
            count,
            reference: reference.map(str::to_string),
        }
    }

    #[test]
    fn test_ingest_builds_scanned_items() {
        let candidates = vec![
            candidate("سبحان الله", Some(33), Some("رواه مسلم")),
            candidate("الحمد لله", Some(33), None),
            candidate("الله أكبر", Some(34), Some("  ")),
        ];

        let items = ingest(candidates, "1700000000000").unwrap();
        assert_eq!(items.len(), 3);

        let ids: HashSet<_> = items.iter().map(|i| i.id.clone()).collect();
        assert_eq!(ids.len(), 3);

        for (index, item) in items.iter().enumerate() {
            assert_eq!(item.id, format!("scanned-1700000000000-{}", index));
            assert_eq!(item.current_count, 0);
            assert_eq!(item.category, Category::Scanned);
        }

        assert_eq!(items[0].reference, "رواه مسلم");
        assert_eq!(items[1].reference, "");
        assert_eq!(items[2].reference, "");
        assert_eq!(items[2].count, 34);
    }

    #[test]
    fn test_ingest_normalizes_non_positive_counts() {
        let items = ingest(
            vec![
                candidate("a", Some(0), None),
                candidate("b", Some(-5), None),
                candidate("c", None, None),
            ],
            "t",
        )
        .unwrap();

        assert!(items.iter().all(|item| item.count == 1));
    }

    #[test]
    fn test_ingest_rejects_missing_text() {
        let result = ingest(
            vec![
                candidate("a", Some(1), None),
                ScanCandidate {
                    text: None,
                    count: Some(3),
                    reference: None,
                },
            ],
            "t",
        );

        assert!(matches!(
            result,
            Err(ScanError::MissingField { index: 1, field: "text" })
        ));

        let blank = ingest(vec![candidate("   ", Some(1), None)], "t");
        assert!(matches!(blank, Err(ScanError::MissingField { index: 0, .. })));
    }

    #[test]
    fn test_ingest_empty_batch_is_valid() {
        let items = ingest(Vec::new(), "t").unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_parse_extraction() {
        let raw = r#"{"athkar":[{"text":"لا إله إلا الله","count":100,"reference":"متفق عليه"},{"text":"سبحان الله","count":3}]}"#;
        let parsed = parse_extraction(raw).unwrap();
        assert_eq!(parsed.athkar.len(), 2);
        assert_eq!(parsed.athkar[0].count, Some(100));
        assert!(parsed.athkar[1].reference.is_none());

        let fenced = "```json\n{\"athkar\": []}\n```";
        assert!(parse_extraction(fenced).unwrap().athkar.is_empty());
    }

    #[test]
    fn test_single_line_fence() {
        let inline = r#"```json{"athkar":[{"text":"سبحان الله","count":33}]}```"#;
        let parsed = parse_extraction(inline).unwrap();
        assert_eq!(parsed.athkar.len(), 1);
        assert_eq!(parsed.athkar[0].count, Some(33));

        assert!(parse_extraction(r#"```{"athkar":[]}```"#).unwrap().athkar.is_empty());
        assert!(parse_extraction("```\n{\"athkar\":[]}\n```").unwrap().athkar.is_empty());
    }

    #[test]
    fn test_parse_extraction_failures() {
        assert!(matches!(parse_extraction("   "), Err(ScanError::EmptyResponse)));
        assert!(matches!(
            parse_extraction(r#"{"items": []}"#),
            Err(ScanError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_extraction(r#"{"athkar": [{"text": "x""#),
            Err(ScanError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_scan_image_mime_detection() {
        let png = ScanImage::from_bytes(PNG_HEADER.to_vec()).unwrap();
        assert_eq!(png.mime_type, "image/png");

        let jpeg = ScanImage::from_bytes(JPEG_HEADER.to_vec()).unwrap();
        assert_eq!(jpeg.mime_type, "image/jpeg");

        let unknown = ScanImage::from_bytes(vec![1, 2, 3, 4]).unwrap();
        assert_eq!(unknown.mime_type, "image/jpeg");

        assert!(matches!(
            ScanImage::from_bytes(Vec::new()),
            Err(ScanError::InvalidImage(_))
        ));
    }

    #[test]
    fn test_scan_image_from_data_url() {
        let encoded = general_purpose::STANDARD.encode(PNG_HEADER);

        let image = ScanImage::from_data_url(&format!("data:image/png;base64,{}", encoded)).unwrap();
        assert_eq!(image.bytes, PNG_HEADER);
        assert_eq!(image.to_base64(), encoded);
        assert!(image.to_data_url().starts_with("data:image/png;base64,"));

        let bare = ScanImage::from_data_url(&encoded).unwrap();
        assert_eq!(bare.bytes, PNG_HEADER);

        let broken = ScanImage::from_data_url("data:image/png;base64,@@@");
        assert_eq!(broken.unwrap_err().user_message(), FILE_ERROR_MESSAGE);
    }

    #[test]
    fn test_user_messages() {
        assert_eq!(ScanError::EmptyResponse.user_message(), EXTRACTION_ERROR_MESSAGE);
        assert_eq!(
            ScanError::Provider("timeout".into()).user_message(),
            EXTRACTION_ERROR_MESSAGE
        );
    }
}

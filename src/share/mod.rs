//! 应用分享
//!
//! 生成固定的推广文案，并按以下顺序尝试投递，前一级失败才尝试下一级：
//! 1. 系统分享面板（用户取消即结束，不再降级）
//! 2. 现代剪贴板接口
//! 3. 旧式复制方式（失败时仅记录日志）
//!
//! 各级渠道通过 [`ShareChannel`] 注入，宿主提供平台实现。

pub mod command;

pub use command::CommandClipboard;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// 分享标题
pub const SHARE_TITLE: &str = "تطبيق حصني";
/// 推广文案
pub const SHARE_TEXT: &str = "تطبيق أذكار ذكي، حول أذكارك من الورق إلى تطبيق باستخدام الكاميرا.";

/// 分享内容
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
    /// 应用链接（未配置时为 None）
    pub url: Option<String>,
}

impl SharePayload {
    /// 构建推广内容，链接为空时不附带
    pub fn promotional(app_link: &str) -> Self {
        let link = app_link.trim();
        Self {
            title: SHARE_TITLE.to_string(),
            text: SHARE_TEXT.to_string(),
            url: (!link.is_empty()).then(|| link.to_string()),
        }
    }

    /// 复制到剪贴板的完整文本：文案 + 换行 + 链接
    pub fn full_text(&self) -> String {
        match &self.url {
            Some(url) => format!("{}\n{}", self.text, url),
            None => self.text.clone(),
        }
    }
}

/// 渠道类型，决定在链中的位置和成功后的反馈
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    NativeShare,
    Clipboard,
    LegacyCopy,
}

impl ChannelKind {
    /// 成功后是否需要提示"已复制"
    pub fn acknowledges_copy(&self) -> bool {
        !matches!(self, Self::NativeShare)
    }
}

/// 渠道投递错误
#[derive(Debug, Error)]
pub enum ShareError {
    /// 用户主动取消（终止，不降级）
    #[error("用户取消了分享")]
    Cancelled,
    /// 渠道失败，继续尝试下一级
    #[error("{0}")]
    Failed(String),
}

/// 分享渠道
#[async_trait]
pub trait ShareChannel: Send + Sync {
    /// 渠道名称（用于日志）
    fn name(&self) -> &str;

    fn kind(&self) -> ChannelKind;

    /// 当前平台是否提供该能力
    fn is_available(&self) -> bool;

    /// 投递内容，不在渠道内部重试
    async fn deliver(&self, payload: &SharePayload) -> Result<(), ShareError>;
}

/// 分享结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ShareOutcome {
    /// 已通过系统分享面板分享
    Shared { channel: String },
    /// 已复制到剪贴板（界面应短暂提示）
    Copied { channel: String },
    /// 用户取消
    Cancelled { channel: String },
    /// 所有渠道都不可用或失败
    Exhausted,
}

impl ShareOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Shared { .. } => "shared",
            Self::Copied { .. } => "copied",
            Self::Cancelled { .. } => "cancelled",
            Self::Exhausted => "exhausted",
        }
    }
}

/// 按顺序尝试的渠道链
pub struct ShareChain {
    channels: Vec<Box<dyn ShareChannel>>,
}

impl ShareChain {
    /// 创建渠道链，按渠道类型排序（同类型保持传入顺序）
    pub fn new(mut channels: Vec<Box<dyn ShareChannel>>) -> Self {
        channels.sort_by_key(|channel| channel.kind());
        Self { channels }
    }

    pub fn channel_names(&self) -> Vec<String> {
        self.channels.iter().map(|c| c.name().to_string()).collect()
    }

    /// 依次尝试各渠道，返回第一个终止结果
    pub async fn share(&self, payload: &SharePayload) -> ShareOutcome {
        for channel in &self.channels {
            if !channel.is_available() {
                tracing::debug!("分享渠道 {} 不可用，跳过", channel.name());
                continue;
            }

            match channel.deliver(payload).await {
                Ok(()) => {
                    let name = channel.name().to_string();
                    info!("通过 {} 分享成功", name);
                    return if channel.kind().acknowledges_copy() {
                        ShareOutcome::Copied { channel: name }
                    } else {
                        ShareOutcome::Shared { channel: name }
                    };
                }
                Err(ShareError::Cancelled) => {
                    info!("用户取消了 {} 分享", channel.name());
                    return ShareOutcome::Cancelled {
                        channel: channel.name().to_string(),
                    };
                }
                Err(ShareError::Failed(reason)) => {
                    warn!("分享渠道 {} 失败: {}，尝试下一个", channel.name(), reason);
                }
            }
        }

        warn!("所有分享渠道均失败");
        ShareOutcome::Exhausted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// 可编程的模拟渠道，记录收到的文本
    struct MockChannel {
        name: &'static str,
        kind: ChannelKind,
        available: bool,
        result: fn() -> Result<(), ShareError>,
        calls: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl ShareChannel for MockChannel {
        fn name(&self) -> &str {
            self.name
        }

        fn kind(&self) -> ChannelKind {
            self.kind
        }

        fn is_available(&self) -> bool {
            self.available
        }

        async fn deliver(&self, payload: &SharePayload) -> Result<(), ShareError> {
            let text = match self.kind {
                ChannelKind::NativeShare => payload.text.clone(),
                _ => payload.full_text(),
            };
            self.calls.lock().unwrap().push(format!("{}:{}", self.name, text));
            (self.result)()
        }
    }

    fn ok() -> Result<(), ShareError> {
        Ok(())
    }

    fn fail() -> Result<(), ShareError> {
        Err(ShareError::Failed("boom".to_string()))
    }

    fn cancel() -> Result<(), ShareError> {
        Err(ShareError::Cancelled)
    }

    fn channel(
        name: &'static str,
        kind: ChannelKind,
        available: bool,
        result: fn() -> Result<(), ShareError>,
        calls: &Arc<Mutex<Vec<String>>>,
    ) -> Box<dyn ShareChannel> {
        Box::new(MockChannel {
            name,
            kind,
            available,
            result,
            calls: calls.clone(),
        })
    }

    fn called(calls: &Arc<Mutex<Vec<String>>>) -> Vec<String> {
        calls
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.split(':').next().unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn test_payload_text() {
        let without = SharePayload::promotional("  ");
        assert_eq!(without.url, None);
        assert_eq!(without.full_text(), SHARE_TEXT);

        let with = SharePayload::promotional("https://example.com/app");
        assert_eq!(with.full_text(), format!("{}\nhttps://example.com/app", SHARE_TEXT));
        assert_eq!(with.title, SHARE_TITLE);
    }

    #[tokio::test]
    async fn test_native_share_wins() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let chain = ShareChain::new(vec![
            channel("clipboard", ChannelKind::Clipboard, true, ok, &calls),
            channel("native", ChannelKind::NativeShare, true, ok, &calls),
        ]);

        let outcome = chain.share(&SharePayload::promotional("")).await;
        assert_eq!(outcome, ShareOutcome::Shared { channel: "native".into() });
        assert_eq!(called(&calls), vec!["native"]);
    }

    #[tokio::test]
    async fn test_cancel_is_terminal() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let chain = ShareChain::new(vec![
            channel("native", ChannelKind::NativeShare, true, cancel, &calls),
            channel("clipboard", ChannelKind::Clipboard, true, ok, &calls),
        ]);

        let outcome = chain.share(&SharePayload::promotional("")).await;
        assert_eq!(outcome, ShareOutcome::Cancelled { channel: "native".into() });
        assert_eq!(called(&calls), vec!["native"]);
    }

    #[tokio::test]
    async fn test_falls_through_to_clipboard() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let chain = ShareChain::new(vec![
            channel("native", ChannelKind::NativeShare, true, fail, &calls),
            channel("legacy", ChannelKind::LegacyCopy, true, ok, &calls),
            channel("clipboard", ChannelKind::Clipboard, true, ok, &calls),
        ]);

        let outcome = chain
            .share(&SharePayload::promotional("https://example.com"))
            .await;
        assert_eq!(outcome, ShareOutcome::Copied { channel: "clipboard".into() });
        assert_eq!(called(&calls), vec!["native", "clipboard"]);

        let recorded = calls.lock().unwrap().clone();
        assert!(recorded[1].ends_with("https://example.com"));
    }

    #[tokio::test]
    async fn test_unavailable_channels_are_skipped() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let chain = ShareChain::new(vec![
            channel("native", ChannelKind::NativeShare, false, ok, &calls),
            channel("clipboard", ChannelKind::Clipboard, false, ok, &calls),
            channel("legacy", ChannelKind::LegacyCopy, true, ok, &calls),
        ]);

        let outcome = chain.share(&SharePayload::promotional("")).await;
        assert_eq!(outcome, ShareOutcome::Copied { channel: "legacy".into() });
        assert_eq!(called(&calls), vec!["legacy"]);
    }

    #[tokio::test]
    async fn test_exhausted_chain() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let chain = ShareChain::new(vec![
            channel("clipboard", ChannelKind::Clipboard, true, fail, &calls),
            channel("legacy", ChannelKind::LegacyCopy, true, fail, &calls),
        ]);

        let outcome = chain.share(&SharePayload::promotional("")).await;
        assert_eq!(outcome, ShareOutcome::Exhausted);
        assert_eq!(called(&calls), vec!["clipboard", "legacy"]);

        let empty = ShareChain::new(Vec::new());
        assert_eq!(empty.share(&SharePayload::promotional("")).await, ShareOutcome::Exhausted);
    }
}

// 分享领域管理器
//
// 负责生成分享内容并交给渠道链投递

use std::sync::Arc;

use crate::event_bus::{AppEvent, EventBus};
use crate::settings::SettingsManager;
use crate::share::{ShareChain, ShareOutcome, SharePayload};

/// 分享领域管理器 - 负责分享应用
#[derive(Clone)]
pub struct ShareDomain {
    chain: Arc<ShareChain>,
    settings: Arc<SettingsManager>,
    event_bus: Arc<EventBus>,
}

impl ShareDomain {
    /// 创建新的分享领域管理器
    pub fn new(chain: Arc<ShareChain>, settings: Arc<SettingsManager>, event_bus: Arc<EventBus>) -> Self {
        Self {
            chain,
            settings,
            event_bus,
        }
    }

    /// 当前配置下的分享内容
    pub async fn payload(&self) -> SharePayload {
        let config = self.settings.get().await;
        SharePayload::promotional(&config.share_settings.app_link)
    }

    /// 分享应用；渠道全部失败时只记录日志，不作为错误返回
    pub async fn share_app(&self) -> ShareOutcome {
        let payload = self.payload().await;
        let outcome = self.chain.share(&payload).await;

        self.event_bus.publish(AppEvent::ShareFinished {
            outcome: outcome.label().to_string(),
        });
        outcome
    }
}

//! 界面命令模块
//!
//! 宿主界面调用的全部命令，按功能分组：
//! - lists: 列表与计数命令
//! - scan: 图片扫描命令
//! - share: 分享命令
//! - config: 配置管理命令
//!
//! 所有命令返回 `Result<T, String>`，错误信息可直接展示给用户

pub mod config;
pub mod lists;
pub mod scan;
pub mod share;

// 重新导出所有命令
pub use config::*;
pub use lists::*;
pub use scan::*;
pub use share::*;

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use crate::app::build_state;
    use crate::logger::LogBroadcaster;
    use crate::models::{AppConfig, ShareSettings};
    use crate::settings::SettingsManager;
    use crate::share::ShareChannel;
    use crate::AppState;

    /// 测试用状态：临时配置文件，不启用命令行复制渠道
    pub async fn state_with(channels: Vec<Box<dyn ShareChannel>>) -> (tempfile::TempDir, AppState) {
        let dir = tempfile::tempdir().unwrap();
        let settings = SettingsManager::new(dir.path().join("settings.json"))
            .await
            .unwrap();
        settings
            .update(AppConfig {
                share_settings: Some(ShareSettings {
                    app_link: "https://example.com/hisni".to_string(),
                    legacy_copy_command: Some(Vec::new()),
                }),
                ..Default::default()
            })
            .await
            .unwrap();

        let state = build_state(Arc::new(settings), Arc::new(LogBroadcaster::new()), channels)
            .await
            .unwrap();
        (dir, state)
    }
}

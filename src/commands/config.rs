//! 配置管理命令
//!
//! 提供应用配置的读取和更新接口，包括：
//! - LLM 服务商配置
//! - 分享设置
//! - 日志推送开关

use crate::models::{AppConfig, PersistedAppConfig};
use crate::AppState;
use crate::event_bus::AppEvent;
use tracing::info;

/// 获取应用配置
pub async fn get_app_config(state: &AppState) -> Result<PersistedAppConfig, String> {
    Ok(state.system_domain.get_settings().get().await)
}

/// 更新配置
///
/// LLM 配置先交给 LLM Actor 校验并生效，失败时不写入配置文件
pub async fn update_app_config(
    state: &AppState,
    mut config: AppConfig,
) -> Result<PersistedAppConfig, String> {
    if let Some(llm_config) = config.llm_config.take() {
        let llm_handle = state.scan_domain.get_llm_handle();
        llm_handle
            .configure(llm_config)
            .await
            .map_err(|e| e.to_string())?;
        // 保存归一化后的配置（openai -> qwen）
        config.llm_config = Some(llm_handle.get_config().await.map_err(|e| e.to_string())?);
    }

    let updated_config = state
        .system_domain
        .get_settings()
        .update(config.clone())
        .await
        .map_err(|e| e.to_string())?;

    if config.llm_config.is_some() {
        info!("LLM 配置已更新，当前服务商: {}", updated_config.llm_config.provider);
        publish(state, "llm");
    }

    if config.share_settings.is_some() {
        // 复制命令在启动时装配，链接立即生效
        info!("分享设置已更新");
        publish(state, "share");
    }

    if let Some(enabled) = config.log_broadcast {
        state.system_domain.get_logger().set_enabled(enabled);
        info!("日志推送已{}", if enabled { "开启" } else { "关闭" });
        publish(state, "log");
    }

    Ok(updated_config)
}

/// 切换 LLM 服务商（gemini / qwen）
pub async fn switch_llm_provider(state: &AppState, provider: &str) -> Result<PersistedAppConfig, String> {
    let llm_handle = state.scan_domain.get_llm_handle();
    llm_handle
        .switch_provider(provider.to_string())
        .await
        .map_err(|e| e.to_string())?;

    let llm_config = llm_handle.get_config().await.map_err(|e| e.to_string())?;
    let updated_config = state
        .system_domain
        .get_settings()
        .update(AppConfig {
            llm_config: Some(llm_config),
            ..Default::default()
        })
        .await
        .map_err(|e| e.to_string())?;

    publish(state, "llm");
    Ok(updated_config)
}

fn publish(state: &AppState, config_type: &str) {
    state.event_bus.publish(AppEvent::ConfigUpdated {
        config_type: config_type.to_string(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::state_with;
    use crate::llm::LLMConfig;
    use crate::models::ShareSettings;
    use crate::settings::SettingsManager;

    #[tokio::test]
    async fn test_log_broadcast_toggle() {
        let (_dir, state) = state_with(Vec::new()).await;
        let mut events = state.event_bus.subscribe();

        let updated = update_app_config(
            &state,
            AppConfig {
                log_broadcast: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert!(!updated.log_broadcast);
        assert!(!state.system_domain.get_logger().is_enabled());
        assert_eq!(
            events.try_recv().unwrap(),
            AppEvent::ConfigUpdated {
                config_type: "log".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_app_link_changes_share_payload() {
        let (_dir, state) = state_with(Vec::new()).await;

        update_app_config(
            &state,
            AppConfig {
                share_settings: Some(ShareSettings {
                    app_link: "  ".to_string(),
                    legacy_copy_command: Some(Vec::new()),
                }),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let payload = state.share_domain.payload().await;
        assert!(payload.url.is_none());
        assert_eq!(get_app_config(&state).await.unwrap().share_settings.app_link, "  ");
    }

    #[tokio::test]
    async fn test_unknown_provider_is_not_saved() {
        let (dir, state) = state_with(Vec::new()).await;

        let result = update_app_config(
            &state,
            AppConfig {
                llm_config: Some(LLMConfig {
                    provider: "claude".to_string(),
                    ..Default::default()
                }),
                log_broadcast: Some(false),
                ..Default::default()
            },
        )
        .await;
        assert!(result.is_err());

        // 内存、文件和 LLM Actor 三者保持一致
        assert_eq!(get_app_config(&state).await.unwrap().llm_config.provider, "gemini");
        assert!(get_app_config(&state).await.unwrap().log_broadcast);
        let reloaded = SettingsManager::new(dir.path().join("settings.json"))
            .await
            .unwrap()
            .get()
            .await;
        assert_eq!(reloaded.llm_config.provider, "gemini");
        assert_eq!(
            state.scan_domain.get_llm_handle().get_config().await.unwrap().provider,
            "gemini"
        );
    }

    #[tokio::test]
    async fn test_provider_alias_is_saved_normalized() {
        let (_dir, state) = state_with(Vec::new()).await;

        let updated = update_app_config(
            &state,
            AppConfig {
                llm_config: Some(LLMConfig {
                    provider: "openai".to_string(),
                    ..Default::default()
                }),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.llm_config.provider, "qwen");
    }

    #[tokio::test]
    async fn test_switch_provider_is_persisted() {
        let (_dir, state) = state_with(Vec::new()).await;

        let updated = switch_llm_provider(&state, "qwen").await.unwrap();
        assert_eq!(updated.llm_config.provider, "qwen");
        assert_eq!(
            state.scan_domain.get_llm_handle().get_config().await.unwrap().provider,
            "qwen"
        );

        assert!(switch_llm_provider(&state, "unknown").await.is_err());
    }
}

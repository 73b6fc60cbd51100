//! 应用程序初始化
//!
//! 负责核心库的完整启动流程，包括：
//! - 日志系统初始化
//! - 配置加载
//! - 各领域模块初始化
//! - Actor 系统启动

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use crate::actors::{LLMManagerActor, ListStoreActor};
use crate::domains::{CounterDomain, ScanDomain, ShareDomain, SystemDomain};
use crate::event_bus::EventBus;
use crate::llm::LLMManager;
use crate::logger::{self, LogBroadcaster};
use crate::models::ShareSettings;
use crate::settings::SettingsManager;
use crate::share::{CommandClipboard, ShareChain, ShareChannel};
use crate::store::ListStore;
use crate::AppState;

/// 启动参数
pub struct BootstrapOptions {
    /// 配置文件路径
    pub config_path: PathBuf,
    /// 日志目录（None 使用平台默认目录）
    pub log_dir: Option<PathBuf>,
    /// 是否安装全局日志订阅器（宿主已有日志系统时关闭）
    pub init_logging: bool,
    /// 宿主提供的分享渠道（系统分享面板、剪贴板接口）
    pub share_channels: Vec<Box<dyn ShareChannel>>,
}

impl BootstrapOptions {
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            log_dir: None,
            init_logging: true,
            share_channels: Vec::new(),
        }
    }
}

/// 启动核心库
///
/// 1. 日志系统初始化
/// 2. 加载配置
/// 3. 领域模块和 Actor 初始化
///
/// 必须在 tokio 运行时中调用
pub async fn bootstrap(options: BootstrapOptions) -> Result<AppState> {
    let log_broadcaster = Arc::new(LogBroadcaster::new());

    if options.init_logging {
        logger::init_with_broadcaster(log_broadcaster.clone(), options.log_dir.clone())?;
    }

    info!("初始化 حصني 记念计数器...");

    let settings = Arc::new(SettingsManager::new(options.config_path).await?);
    build_state(settings, log_broadcaster, options.share_channels).await
}

/// 根据已加载的配置组装应用状态
pub async fn build_state(
    settings: Arc<SettingsManager>,
    log_broadcaster: Arc<LogBroadcaster>,
    mut share_channels: Vec<Box<dyn ShareChannel>>,
) -> Result<AppState> {
    let config = settings.get().await;
    log_broadcaster.set_enabled(config.log_broadcast);

    let event_bus = Arc::new(EventBus::new(256));

    // 共享 HTTP 客户端（复用连接池），不设置超时
    let http_client = reqwest::Client::builder().build()?;

    // LLM 管理器：配置失败不阻止启动，扫描时会提示未配置
    let mut llm_manager = LLMManager::new(http_client);
    if let Err(e) = llm_manager.configure(config.llm_config.clone()) {
        warn!("应用 LLM 配置失败: {}", e);
    }
    let (llm_actor, llm_handle) = LLMManagerActor::new(llm_manager);
    tokio::spawn(llm_actor.run());

    // 列表：每次启动都从内置列表开始，不做持久化
    let (list_actor, list_handle) = ListStoreActor::new(ListStore::seeded());
    tokio::spawn(list_actor.run());

    if let Some(legacy) = legacy_copy_channel(&config.share_settings) {
        info!("旧式复制渠道: {}", legacy.program());
        share_channels.push(Box::new(legacy));
    }
    let share_chain = Arc::new(ShareChain::new(share_channels));
    info!("分享渠道: {:?}", share_chain.channel_names());

    let counter_domain = Arc::new(CounterDomain::new(list_handle.clone(), event_bus.clone()));
    let scan_domain = Arc::new(ScanDomain::new(llm_handle, list_handle, event_bus.clone()));
    let share_domain = Arc::new(ShareDomain::new(
        share_chain,
        settings.clone(),
        event_bus.clone(),
    ));
    let system_domain = Arc::new(SystemDomain::new(settings, log_broadcaster));

    info!("初始化完成");

    Ok(AppState {
        counter_domain,
        scan_domain,
        share_domain,
        system_domain,
        event_bus,
    })
}

/// 配置的复制命令优先，未配置时按平台自动选择
fn legacy_copy_channel(settings: &ShareSettings) -> Option<CommandClipboard> {
    match &settings.legacy_copy_command {
        Some(parts) => CommandClipboard::from_command_line(parts),
        None => CommandClipboard::platform_default(),
    }
}

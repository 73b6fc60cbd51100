// حصني 记念计数器 - 核心库
//
// 宿主界面（移动端/网页外壳）通过 commands 模块调用，
// 通过 event_bus 订阅列表变化

// 声明模块
pub mod actors;
pub mod app;
pub mod commands;
pub mod domains;
pub mod event_bus;
pub mod llm;
pub mod logger;
pub mod models;
pub mod scan;
pub mod settings;
pub mod share;
pub mod store;
pub mod utils;

use std::sync::Arc;

use domains::{CounterDomain, ScanDomain, ShareDomain, SystemDomain};
use event_bus::EventBus;

pub use app::{bootstrap, BootstrapOptions};
pub use models::{Category, ThikrDraft, ThikrItem, ThikrPatch};

/// 应用状态（按领域分组）
///
/// - 计数领域：负责三个列表的读写
/// - 扫描领域：负责图片识别和扫描列表替换
/// - 分享领域：负责分享渠道链
/// - 系统领域：负责设置、日志和基础设施
/// - 事件总线：用于通知界面刷新
#[derive(Clone)]
pub struct AppState {
    /// 计数领域管理器
    pub counter_domain: Arc<CounterDomain>,
    /// 扫描领域管理器
    pub scan_domain: Arc<ScanDomain>,
    /// 分享领域管理器
    pub share_domain: Arc<ShareDomain>,
    /// 系统领域管理器
    pub system_domain: Arc<SystemDomain>,
    /// 事件总线
    pub event_bus: Arc<EventBus>,
}

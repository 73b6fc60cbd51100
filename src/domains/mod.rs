// 领域模块 - 用于组织应用的业务逻辑
//
// 按业务领域拆分应用状态，实现单一职责原则
// 包含4个领域:计数、扫描、分享、系统

pub mod counter;
pub mod scan;
pub mod share;
pub mod system;

pub use counter::CounterDomain;
pub use scan::ScanDomain;
pub use share::ShareDomain;
pub use system::SystemDomain;

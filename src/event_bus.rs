// 事件总线 - 用于模块间解耦通信
//
// 实现发布/订阅模式，界面层订阅后按事件刷新对应列表
// 使用 tokio::sync::broadcast 实现高效的事件分发

use tokio::sync::broadcast;

use crate::models::Category;

/// 应用事件枚举 - 定义所有可能的系统事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    // --- 列表事件 ---

    /// 集合内容发生变化
    ListChanged { category: Category },

    /// 某条记念刚好完成
    ItemCompleted { category: Category, item_id: String },

    // --- 扫描事件 ---

    /// 开始识别图片
    ScanStarted,

    /// 识别完成，扫描列表已被替换
    ScanCompleted { item_count: usize },

    /// 识别失败，扫描列表保持不变
    ScanFailed { error: String },

    // --- 系统事件 ---

    /// 分享结束
    ShareFinished { outcome: String },

    /// 配置更新事件
    ConfigUpdated { config_type: String },
}

/// 事件总线
///
/// 使用 broadcast channel 实现发布/订阅模式
/// 支持多个订阅者同时接收事件
pub struct EventBus {
    sender: broadcast::Sender<AppEvent>,
}

impl EventBus {
    /// 创建新的事件总线
    ///
    /// # 参数
    /// - `capacity`: 事件缓冲区大小，建议 100-1000
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// 发布事件
    ///
    /// 如果没有订阅者，事件会被丢弃(这是正常的)
    pub fn publish(&self, event: AppEvent) {
        match self.sender.send(event) {
            Ok(receiver_count) => {
                tracing::trace!("事件已发布，订阅者数量: {}", receiver_count);
            }
            Err(_) => {
                // 没有订阅者，忽略错误
                tracing::trace!("事件已发布但无订阅者");
            }
        }
    }

    /// 订阅事件
    ///
    /// 返回一个接收器，可以用 `.recv().await` 接收事件
    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.sender.subscribe()
    }

    /// 获取当前订阅者数量
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

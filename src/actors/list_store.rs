// List Store Actor - 使用Actor模式管理三个记念列表
//
// 所有读写都经由消息按到达顺序逐条处理，两次修改不会交错

use tokio::sync::{mpsc, oneshot};

use crate::models::{Category, ProgressOverview, ThikrDraft, ThikrItem, ThikrPatch};
use crate::store::ListStore;
use anyhow::Result;

/// 列表命令
pub enum ListStoreCommand {
    /// 获取集合快照
    Snapshot {
        category: Category,
        reply: oneshot::Sender<Vec<ThikrItem>>,
    },

    /// 获取集合进度
    Progress {
        category: Category,
        reply: oneshot::Sender<u8>,
    },

    /// 获取首页统计
    Overview {
        reply: oneshot::Sender<ProgressOverview>,
    },

    /// 设置当前进度
    SetCount {
        category: Category,
        id: String,
        count: u32,
        reply: oneshot::Sender<Option<ThikrItem>>,
    },

    /// 进度加一（不检查完成状态）
    Increment {
        category: Category,
        id: String,
        reply: oneshot::Sender<Option<ThikrItem>>,
    },

    /// 点击计数（已完成时不再增加）
    Advance {
        category: Category,
        id: String,
        reply: oneshot::Sender<Option<ThikrItem>>,
    },

    /// 进度归零
    Reset {
        category: Category,
        id: String,
        reply: oneshot::Sender<Option<ThikrItem>>,
    },

    /// 新增条目
    AddItem {
        category: Category,
        draft: ThikrDraft,
        reply: oneshot::Sender<ThikrItem>,
    },

    /// 编辑条目
    EditItem {
        category: Category,
        id: String,
        patch: ThikrPatch,
        reply: oneshot::Sender<Option<ThikrItem>>,
    },

    /// 删除条目
    DeleteItem {
        category: Category,
        id: String,
        reply: oneshot::Sender<bool>,
    },

    /// 整体替换集合
    Replace {
        category: Category,
        items: Vec<ThikrItem>,
        reply: oneshot::Sender<()>,
    },

    /// 健康检查（Ping）
    HealthCheck { reply: oneshot::Sender<()> },
}

/// 列表Actor
pub struct ListStoreActor {
    receiver: mpsc::Receiver<ListStoreCommand>,
    store: ListStore, // 直接持有，无需锁
}

impl ListStoreActor {
    /// 创建新的Actor
    pub fn new(store: ListStore) -> (Self, ListStoreHandle) {
        let (sender, receiver) = mpsc::channel(100);
        let actor = Self { receiver, store };
        let handle = ListStoreHandle { sender };
        (actor, handle)
    }

    /// 运行Actor（在单独的任务中运行）
    pub async fn run(mut self) {
        tracing::info!("List Store Actor 已启动");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                ListStoreCommand::Snapshot { category, reply } => {
                    let _ = reply.send(self.store.snapshot(category));
                }

                ListStoreCommand::Progress { category, reply } => {
                    let _ = reply.send(self.store.progress(category));
                }

                ListStoreCommand::Overview { reply } => {
                    let _ = reply.send(self.store.overview());
                }

                ListStoreCommand::SetCount {
                    category,
                    id,
                    count,
                    reply,
                } => {
                    let _ = reply.send(self.store.set_count(category, &id, count));
                }

                ListStoreCommand::Increment { category, id, reply } => {
                    let _ = reply.send(self.store.increment(category, &id));
                }

                ListStoreCommand::Advance { category, id, reply } => {
                    let _ = reply.send(self.store.advance(category, &id));
                }

                ListStoreCommand::Reset { category, id, reply } => {
                    let _ = reply.send(self.store.reset(category, &id));
                }

                ListStoreCommand::AddItem {
                    category,
                    draft,
                    reply,
                } => {
                    let item = self.store.add_item(category, draft);
                    tracing::debug!("新增条目 {} 到 {}", item.id, category);
                    let _ = reply.send(item);
                }

                ListStoreCommand::EditItem {
                    category,
                    id,
                    patch,
                    reply,
                } => {
                    let _ = reply.send(self.store.edit_item(category, &id, patch));
                }

                ListStoreCommand::DeleteItem { category, id, reply } => {
                    let _ = reply.send(self.store.delete_item(category, &id));
                }

                ListStoreCommand::Replace {
                    category,
                    items,
                    reply,
                } => {
                    tracing::debug!("替换 {} 列表，共 {} 条", category, items.len());
                    self.store.replace(category, items);
                    let _ = reply.send(());
                }

                ListStoreCommand::HealthCheck { reply } => {
                    // 立即响应，表明Actor正常运行
                    let _ = reply.send(());
                }
            }
        }

        tracing::info!("List Store Actor 已停止");
    }
}

/// 列表Handle（用于与Actor通信，可克隆）
#[derive(Clone)]
pub struct ListStoreHandle {
    sender: mpsc::Sender<ListStoreCommand>,
}

impl ListStoreHandle {
    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> ListStoreCommand,
    ) -> Result<T> {
        let (reply, rx) = oneshot::channel();
        self.sender
            .send(build(reply))
            .await
            .map_err(|_| anyhow::anyhow!("Actor通道已关闭"))?;
        rx.await.map_err(|_| anyhow::anyhow!("Actor已停止"))
    }

    /// 获取集合快照
    pub async fn snapshot(&self, category: Category) -> Result<Vec<ThikrItem>> {
        self.request(|reply| ListStoreCommand::Snapshot { category, reply })
            .await
    }

    /// 获取集合进度
    pub async fn progress(&self, category: Category) -> Result<u8> {
        self.request(|reply| ListStoreCommand::Progress { category, reply })
            .await
    }

    /// 获取首页统计
    pub async fn overview(&self) -> Result<ProgressOverview> {
        self.request(|reply| ListStoreCommand::Overview { reply }).await
    }

    pub async fn set_count(&self, category: Category, id: &str, count: u32) -> Result<Option<ThikrItem>> {
        let id = id.to_string();
        self.request(|reply| ListStoreCommand::SetCount {
            category,
            id,
            count,
            reply,
        })
        .await
    }

    pub async fn increment(&self, category: Category, id: &str) -> Result<Option<ThikrItem>> {
        let id = id.to_string();
        self.request(|reply| ListStoreCommand::Increment { category, id, reply })
            .await
    }

    pub async fn advance(&self, category: Category, id: &str) -> Result<Option<ThikrItem>> {
        let id = id.to_string();
        self.request(|reply| ListStoreCommand::Advance { category, id, reply })
            .await
    }

    pub async fn reset(&self, category: Category, id: &str) -> Result<Option<ThikrItem>> {
        let id = id.to_string();
        self.request(|reply| ListStoreCommand::Reset { category, id, reply })
            .await
    }

    pub async fn add_item(&self, category: Category, draft: ThikrDraft) -> Result<ThikrItem> {
        self.request(|reply| ListStoreCommand::AddItem {
            category,
            draft,
            reply,
        })
        .await
    }

    pub async fn edit_item(
        &self,
        category: Category,
        id: &str,
        patch: ThikrPatch,
    ) -> Result<Option<ThikrItem>> {
        let id = id.to_string();
        self.request(|reply| ListStoreCommand::EditItem {
            category,
            id,
            patch,
            reply,
        })
        .await
    }

    pub async fn delete_item(&self, category: Category, id: &str) -> Result<bool> {
        let id = id.to_string();
        self.request(|reply| ListStoreCommand::DeleteItem { category, id, reply })
            .await
    }

    /// 整体替换集合
    pub async fn replace(&self, category: Category, items: Vec<ThikrItem>) -> Result<()> {
        self.request(|reply| ListStoreCommand::Replace {
            category,
            items,
            reply,
        })
        .await
    }

    /// 健康检查 - 检测Actor是否响应
    pub async fn health_check(&self) -> bool {
        let (reply, rx) = oneshot::channel();

        if self
            .sender
            .send(ListStoreCommand::HealthCheck { reply })
            .await
            .is_err()
        {
            tracing::warn!("List Store Actor 健康检查失败: 通道已关闭");
            return false;
        }

        // 等待响应，超时5秒
        match tokio::time::timeout(std::time::Duration::from_secs(5), rx).await {
            Ok(Ok(())) => true,
            Ok(Err(_)) => {
                tracing::warn!("List Store Actor 健康检查失败: Actor已停止");
                false
            }
            Err(_) => {
                tracing::warn!("List Store Actor 健康检查失败: 响应超时");
                false
            }
        }
    }
}

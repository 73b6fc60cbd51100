// 计数领域管理器
//
// 负责三个列表的读写，修改成功后发布列表变化事件

use anyhow::Result;
use std::sync::Arc;

use crate::actors::ListStoreHandle;
use crate::event_bus::{AppEvent, EventBus};
use crate::models::{Category, ProgressOverview, ThikrDraft, ThikrItem, ThikrPatch};

/// 计数领域管理器 - 负责列表读写
#[derive(Clone)]
pub struct CounterDomain {
    lists: ListStoreHandle,
    event_bus: Arc<EventBus>,
}

impl CounterDomain {
    /// 创建新的计数领域管理器
    pub fn new(lists: ListStoreHandle, event_bus: Arc<EventBus>) -> Self {
        Self { lists, event_bus }
    }

    /// 获取列表 Handle
    pub fn get_lists(&self) -> &ListStoreHandle {
        &self.lists
    }

    pub async fn list(&self, category: Category) -> Result<Vec<ThikrItem>> {
        self.lists.snapshot(category).await
    }

    pub async fn progress(&self, category: Category) -> Result<u8> {
        self.lists.progress(category).await
    }

    pub async fn overview(&self) -> Result<ProgressOverview> {
        self.lists.overview().await
    }

    /// 点击计数：已完成的条目不再增加
    pub async fn tap(&self, category: Category, id: &str) -> Result<Option<ThikrItem>> {
        let updated = self.lists.advance(category, id).await?;

        if let Some(item) = &updated {
            self.changed(category);
            if item.is_completed() {
                tracing::info!("{} 列表中的 {} 已完成", category, item.id);
                self.event_bus.publish(AppEvent::ItemCompleted {
                    category,
                    item_id: item.id.clone(),
                });
            }
        }

        Ok(updated)
    }

    pub async fn set_count(&self, category: Category, id: &str, count: u32) -> Result<Option<ThikrItem>> {
        let updated = self.lists.set_count(category, id, count).await?;
        if updated.is_some() {
            self.changed(category);
        }
        Ok(updated)
    }

    pub async fn reset(&self, category: Category, id: &str) -> Result<Option<ThikrItem>> {
        let updated = self.lists.reset(category, id).await?;
        if updated.is_some() {
            self.changed(category);
        }
        Ok(updated)
    }

    pub async fn add(&self, category: Category, draft: ThikrDraft) -> Result<ThikrItem> {
        let item = self.lists.add_item(category, draft).await?;
        tracing::info!("已新增 {} 到 {} 列表", item.id, category);
        self.changed(category);
        Ok(item)
    }

    pub async fn edit(&self, category: Category, id: &str, patch: ThikrPatch) -> Result<Option<ThikrItem>> {
        let updated = self.lists.edit_item(category, id, patch).await?;
        if updated.is_some() {
            self.changed(category);
        }
        Ok(updated)
    }

    pub async fn delete(&self, category: Category, id: &str) -> Result<bool> {
        let deleted = self.lists.delete_item(category, id).await?;
        if deleted {
            tracing::info!("已从 {} 列表删除 {}", category, id);
            self.changed(category);
        }
        Ok(deleted)
    }

    fn changed(&self, category: Category) {
        self.event_bus.publish(AppEvent::ListChanged { category });
    }
}

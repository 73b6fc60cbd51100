// 扫描领域管理器
//
// 负责图片识别和扫描列表替换
// 识别成功才会替换扫描列表；任何失败都保留上一次的扫描结果

use std::sync::Arc;

use crate::actors::{LLMHandle, ListStoreHandle};
use crate::event_bus::{AppEvent, EventBus};
use crate::models::{Category, ThikrItem};
use crate::scan::{self, ScanError, ScanImage};

/// 扫描领域管理器 - 负责图片识别
#[derive(Clone)]
pub struct ScanDomain {
    llm_handle: LLMHandle,
    lists: ListStoreHandle,
    event_bus: Arc<EventBus>,
}

impl ScanDomain {
    /// 创建新的扫描领域管理器
    pub fn new(llm_handle: LLMHandle, lists: ListStoreHandle, event_bus: Arc<EventBus>) -> Self {
        Self {
            llm_handle,
            lists,
            event_bus,
        }
    }

    /// 获取 LLM Handle
    pub fn get_llm_handle(&self) -> &LLMHandle {
        &self.llm_handle
    }

    /// 识别图片并用结果替换扫描列表
    pub async fn scan(&self, image: ScanImage) -> Result<Vec<ThikrItem>, ScanError> {
        self.event_bus.publish(AppEvent::ScanStarted);

        match self.run_scan(image).await {
            Ok(items) => {
                tracing::info!("扫描完成，共 {} 条", items.len());
                self.event_bus.publish(AppEvent::ScanCompleted {
                    item_count: items.len(),
                });
                self.event_bus.publish(AppEvent::ListChanged {
                    category: Category::Scanned,
                });
                Ok(items)
            }
            Err(e) => {
                tracing::error!("扫描失败: {}", e);
                self.event_bus.publish(AppEvent::ScanFailed {
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    async fn run_scan(&self, image: ScanImage) -> Result<Vec<ThikrItem>, ScanError> {
        let extraction = self.llm_handle.extract(image).await?;

        let batch_token = chrono::Utc::now().timestamp_millis().to_string();
        let items = scan::ingest(extraction.athkar, &batch_token)?;

        self.lists
            .replace(Category::Scanned, items.clone())
            .await
            .map_err(|e| ScanError::Unavailable(e.to_string()))?;

        Ok(items)
    }
}

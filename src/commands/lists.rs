//! 列表与计数命令
//!
//! 类别名称和条目 ID 由界面传入，先校验再转交计数领域

use crate::models::{ProgressOverview, ThikrDraft, ThikrItem, ThikrPatch};
use crate::utils::{validate_category, validate_draft, validate_item_id, validate_patch};
use crate::AppState;

/// 获取某个列表的全部条目
pub async fn get_list(state: &AppState, category: &str) -> Result<Vec<ThikrItem>, String> {
    let category = validate_category(category)?;
    state
        .counter_domain
        .list(category)
        .await
        .map_err(|e| e.to_string())
}

/// 获取某个列表的完成百分比
pub async fn get_progress(state: &AppState, category: &str) -> Result<u8, String> {
    let category = validate_category(category)?;
    state
        .counter_domain
        .progress(category)
        .await
        .map_err(|e| e.to_string())
}

/// 首页统计
pub async fn get_progress_overview(state: &AppState) -> Result<ProgressOverview, String> {
    state
        .counter_domain
        .overview()
        .await
        .map_err(|e| e.to_string())
}

/// 点击计数卡片
///
/// 已完成或已不存在的条目返回 None，界面无需处理
pub async fn increment_thikr(
    state: &AppState,
    category: &str,
    id: &str,
) -> Result<Option<ThikrItem>, String> {
    let category = validate_category(category)?;
    validate_item_id(id)?;
    state
        .counter_domain
        .tap(category, id)
        .await
        .map_err(|e| e.to_string())
}

pub async fn set_thikr_count(
    state: &AppState,
    category: &str,
    id: &str,
    count: u32,
) -> Result<Option<ThikrItem>, String> {
    let category = validate_category(category)?;
    validate_item_id(id)?;
    state
        .counter_domain
        .set_count(category, id, count)
        .await
        .map_err(|e| e.to_string())
}

pub async fn reset_thikr(
    state: &AppState,
    category: &str,
    id: &str,
) -> Result<Option<ThikrItem>, String> {
    let category = validate_category(category)?;
    validate_item_id(id)?;
    state
        .counter_domain
        .reset(category, id)
        .await
        .map_err(|e| e.to_string())
}

/// 手动新增条目
pub async fn add_thikr(
    state: &AppState,
    category: &str,
    draft: ThikrDraft,
) -> Result<ThikrItem, String> {
    let category = validate_category(category)?;
    validate_draft(&draft)?;
    state
        .counter_domain
        .add(category, draft)
        .await
        .map_err(|e| e.to_string())
}

/// 编辑条目；未提供 currentCount 时保留当前进度
pub async fn edit_thikr(
    state: &AppState,
    category: &str,
    id: &str,
    patch: ThikrPatch,
) -> Result<Option<ThikrItem>, String> {
    let category = validate_category(category)?;
    validate_item_id(id)?;
    validate_patch(&patch)?;
    state
        .counter_domain
        .edit(category, id, patch)
        .await
        .map_err(|e| e.to_string())
}

pub async fn delete_thikr(state: &AppState, category: &str, id: &str) -> Result<bool, String> {
    let category = validate_category(category)?;
    validate_item_id(id)?;
    state
        .counter_domain
        .delete(category, id)
        .await
        .map_err(|e| e.to_string())
}

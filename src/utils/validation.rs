//! 输入验证工具函数
//!
//! 校验界面层传入的参数，避免无效数据进入列表

use crate::models::{Category, ThikrDraft, ThikrPatch};

/// 解析列表类别
///
/// # 参数
/// - `category`: 类别名称（morning / evening / scanned）
///
/// # 返回
/// - `Ok(Category)`: 验证通过
/// - `Err(String)`: 错误信息
pub fn validate_category(category: &str) -> Result<Category, String> {
    category.parse::<Category>().map_err(|e| {
        // 类别由界面固定传入，出现未知值说明调用方有缺陷
        tracing::error!("{}", e);
        e
    })
}

/// 验证条目ID非空
pub fn validate_item_id(id: &str) -> Result<(), String> {
    if id.trim().is_empty() {
        return Err("条目 ID 不能为空".to_string());
    }
    Ok(())
}

/// 验证新增草稿：文本必填，次数至少为1
pub fn validate_draft(draft: &ThikrDraft) -> Result<(), String> {
    if draft.text.trim().is_empty() {
        return Err("记念文本不能为空".to_string());
    }
    if draft.count < 1 {
        return Err(format!("无效的重复次数: {}", draft.count));
    }
    Ok(())
}

/// 验证编辑补丁中提供的字段
pub fn validate_patch(patch: &ThikrPatch) -> Result<(), String> {
    if let Some(text) = &patch.text {
        if text.trim().is_empty() {
            return Err("记念文本不能为空".to_string());
        }
    }
    if let Some(count) = patch.count {
        if count < 1 {
            return Err(format!("无效的重复次数: {}", count));
        }
    }
    Ok(())
}

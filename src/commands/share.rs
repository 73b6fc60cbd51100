//! 分享命令

use crate::share::{ShareOutcome, SharePayload};
use crate::AppState;

/// 分享应用
///
/// 所有渠道都失败时返回 `Exhausted`，不作为错误
pub async fn share_app(state: &AppState) -> Result<ShareOutcome, String> {
    Ok(state.share_domain.share_app().await)
}

/// 当前的分享内容（界面预览用）
pub async fn get_share_payload(state: &AppState) -> Result<SharePayload, String> {
    Ok(state.share_domain.payload().await)
}

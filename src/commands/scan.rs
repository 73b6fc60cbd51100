//! 图片扫描命令
//!
//! 失败时只返回面向用户的提示语，详细原因写入日志

use crate::models::{Category, ThikrItem};
use crate::scan::{ScanError, ScanImage};
use crate::AppState;

/// 识别图片字节（相机拍摄或从相册选择）
pub async fn scan_image(state: &AppState, bytes: Vec<u8>) -> Result<Vec<ThikrItem>, String> {
    let image = ScanImage::from_bytes(bytes).map_err(user_error)?;
    run_scan(state, image).await
}

/// 识别 data URL 形式的图片（网页外壳的 FileReader 输出）
pub async fn scan_image_base64(state: &AppState, data_url: &str) -> Result<Vec<ThikrItem>, String> {
    let image = ScanImage::from_data_url(data_url).map_err(user_error)?;
    run_scan(state, image).await
}

/// 最近一次扫描结果
pub async fn get_scanned(state: &AppState) -> Result<Vec<ThikrItem>, String> {
    state
        .counter_domain
        .list(Category::Scanned)
        .await
        .map_err(|e| e.to_string())
}

async fn run_scan(state: &AppState, image: ScanImage) -> Result<Vec<ThikrItem>, String> {
    tracing::info!("开始识别图片 ({}, {} 字节)", image.mime_type, image.bytes.len());
    state.scan_domain.scan(image).await.map_err(user_error)
}

fn user_error(e: ScanError) -> String {
    tracing::warn!("扫描请求失败: {}", e);
    e.user_message().to_string()
}

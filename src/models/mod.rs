// 数据模型模块 - 定义所有的数据结构

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// 重新导出其他模块的配置类型
pub use crate::llm::{GeminiConfig, LLMConfig, QwenConfig};

/// 列表类别（决定条目归属哪个集合，创建后不可更改）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Morning, // 早晨的记念
    Evening, // 傍晚的记念
    Scanned, // 图片识别得到的列表
}

impl Category {
    /// 全部类别（按首页展示顺序）
    pub const ALL: [Category; 3] = [Category::Morning, Category::Evening, Category::Scanned];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Evening => "evening",
            Self::Scanned => "scanned",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "morning" => Ok(Self::Morning),
            "evening" => Ok(Self::Evening),
            "scanned" => Ok(Self::Scanned),
            other => Err(format!("未知的列表类别: {}", other)),
        }
    }
}

/// 记念条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThikrItem {
    /// 集合内唯一ID，创建时分配，永不重新分配
    pub id: String,
    /// 记念文本
    pub text: String,
    /// 目标重复次数
    pub count: u32,
    /// 当前进度
    pub current_count: u32,
    /// 出处（可为空字符串）
    #[serde(default)]
    pub reference: String,
    /// 所属类别
    pub category: Category,
}

impl ThikrItem {
    /// 创建新条目（进度从0开始）
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        count: u32,
        reference: impl Into<String>,
        category: Category,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            count,
            current_count: 0,
            reference: reference.into(),
            category,
        }
    }

    /// 是否已完成（进度达到目标次数）
    pub fn is_completed(&self) -> bool {
        self.current_count >= self.count
    }

    /// 单条进度百分比，封顶100
    ///
    /// 目标次数为0的条目视为已完成
    pub fn progress_percent(&self) -> u8 {
        if self.count == 0 {
            return 100;
        }
        let percent = round_percent(self.current_count as u64, self.count as u64);
        percent.min(100) as u8
    }
}

/// 四舍五入计算百分比（与半数向上取整一致），分母必须大于0
pub(crate) fn round_percent(numerator: u64, denominator: u64) -> u64 {
    (200 * numerator + denominator) / (2 * denominator)
}

/// 新增条目的草稿
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThikrDraft {
    pub text: String,
    pub count: u32,
    #[serde(default)]
    pub reference: Option<String>,
}

/// 编辑条目的补丁（未提供的字段保持不变）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThikrPatch {
    pub text: Option<String>,
    pub count: Option<u32>,
    pub reference: Option<String>,
    /// 仅在调用方显式提供时覆盖进度
    pub current_count: Option<u32>,
}

/// 首页统计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressOverview {
    pub morning: u8,
    pub evening: u8,
    pub scanned: u8,
    /// 是否存在扫描结果（决定是否展示"最近一次扫描"卡片）
    pub has_scan: bool,
}

/// 应用配置（部分更新，None 表示不修改）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// LLM配置
    pub llm_config: Option<LLMConfig>,
    /// 分享设置
    pub share_settings: Option<ShareSettings>,
    /// 是否向界面推送日志
    pub log_broadcast: Option<bool>,
}

/// 持久化的应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedAppConfig {
    /// LLM配置
    #[serde(default)]
    pub llm_config: LLMConfig,
    /// 分享设置
    #[serde(default)]
    pub share_settings: ShareSettings,
    /// 是否向界面推送日志
    #[serde(default = "default_log_broadcast")]
    pub log_broadcast: bool,
}

fn default_log_broadcast() -> bool {
    true
}

impl Default for PersistedAppConfig {
    fn default() -> Self {
        Self {
            llm_config: LLMConfig::default(),
            share_settings: ShareSettings::default(),
            log_broadcast: default_log_broadcast(),
        }
    }
}

/// 分享设置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareSettings {
    /// 应用商店链接，上架前保持为空
    #[serde(default)]
    pub app_link: String,
    /// 旧式复制命令（程序 + 参数），为空时按平台自动选择
    #[serde(default)]
    pub legacy_copy_command: Option<Vec<String>>,
}

impl Default for ShareSettings {
    fn default() -> Self {
        Self {
            app_link: String::new(),
            legacy_copy_command: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse() {
        assert_eq!("morning".parse::<Category>().unwrap(), Category::Morning);
        assert_eq!("scanned".parse::<Category>().unwrap(), Category::Scanned);
        assert!("night".parse::<Category>().is_err());
        assert!("Morning".parse::<Category>().is_err());
    }

    #[test]
    fn test_item_serializes_camel_case() {
        let item = ThikrItem::new("morning-1", "سبحان الله", 3, "", Category::Morning);
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["currentCount"], 0);
        assert_eq!(json["category"], "morning");
        assert_eq!(json["reference"], "");
    }

    #[test]
    fn test_item_progress_percent() {
        let mut item = ThikrItem::new("e-1", "x", 3, "", Category::Evening);
        assert_eq!(item.progress_percent(), 0);
        assert!(!item.is_completed());

        item.current_count = 2;
        assert_eq!(item.progress_percent(), 67);

        item.current_count = 5;
        assert_eq!(item.progress_percent(), 100);
        assert!(item.is_completed());

        let zero = ThikrItem::new("e-2", "x", 0, "", Category::Evening);
        assert!(zero.is_completed());
        assert_eq!(zero.progress_percent(), 100);
    }

    #[test]
    fn test_round_percent_half_up() {
        assert_eq!(round_percent(1, 8), 13); // 12.5
        assert_eq!(round_percent(1, 3), 33);
        assert_eq!(round_percent(5, 20), 25);
    }
}

//! 列表存储
//!
//! 持有早晨、傍晚、扫描三个集合，是条目数据的唯一来源：
//! - 读取：快照、查找、进度统计
//! - 写入：计数、重置、增删改、整体替换
//!
//! 每次写操作都生成新的集合再整体换入（写时复制），
//! 不存在部分更新可见的中间状态。对未知ID的操作静默忽略。

pub mod seed;

use crate::models::{round_percent, Category, ProgressOverview, ThikrDraft, ThikrItem, ThikrPatch};

/// 计算集合的整体进度百分比（0-100）
///
/// 每条先把进度封顶到目标次数再求和，因此结果不会超过100。
/// 空集合或目标总数为0时返回0。
pub fn compute_progress(items: &[ThikrItem]) -> u8 {
    let total: u64 = items.iter().map(|item| item.count as u64).sum();
    if total == 0 {
        return 0;
    }

    let current: u64 = items
        .iter()
        .map(|item| item.current_count.min(item.count) as u64)
        .sum();

    round_percent(current, total) as u8
}

/// 三个集合的存储
#[derive(Debug, Clone, Default)]
pub struct ListStore {
    morning: Vec<ThikrItem>,
    evening: Vec<ThikrItem>,
    scanned: Vec<ThikrItem>,
    /// 最近一次分配ID使用的时间令牌（严格递增）
    last_token: i64,
}

impl ListStore {
    /// 创建空存储
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建带内置早晚列表的存储（扫描列表为空）
    pub fn seeded() -> Self {
        Self {
            morning: seed::builtin(Category::Morning),
            evening: seed::builtin(Category::Evening),
            scanned: Vec::new(),
            last_token: 0,
        }
    }

    /// 获取集合的只读视图
    pub fn items(&self, category: Category) -> &[ThikrItem] {
        match category {
            Category::Morning => &self.morning,
            Category::Evening => &self.evening,
            Category::Scanned => &self.scanned,
        }
    }

    /// 获取集合快照
    pub fn snapshot(&self, category: Category) -> Vec<ThikrItem> {
        self.items(category).to_vec()
    }

    pub fn find(&self, category: Category, id: &str) -> Option<&ThikrItem> {
        self.items(category).iter().find(|item| item.id == id)
    }

    /// 集合整体进度
    pub fn progress(&self, category: Category) -> u8 {
        compute_progress(self.items(category))
    }

    /// 首页统计
    pub fn overview(&self) -> ProgressOverview {
        ProgressOverview {
            morning: self.progress(Category::Morning),
            evening: self.progress(Category::Evening),
            scanned: self.progress(Category::Scanned),
            has_scan: !self.scanned.is_empty(),
        }
    }

    /// 设置当前进度（不做封顶，存储层只负责保存）
    pub fn set_count(&mut self, category: Category, id: &str, new_count: u32) -> Option<ThikrItem> {
        self.update_item(category, id, |item| ThikrItem {
            current_count: new_count,
            ..item.clone()
        })
    }

    /// 进度加一（不检查是否已完成）
    pub fn increment(&mut self, category: Category, id: &str) -> Option<ThikrItem> {
        let next = self.find(category, id)?.current_count.saturating_add(1);
        self.set_count(category, id, next)
    }

    /// 点击计数：仅在未完成时加一
    ///
    /// 条目不存在或已完成时返回 None
    pub fn advance(&mut self, category: Category, id: &str) -> Option<ThikrItem> {
        if self.find(category, id)?.is_completed() {
            return None;
        }
        self.increment(category, id)
    }

    /// 进度归零
    pub fn reset(&mut self, category: Category, id: &str) -> Option<ThikrItem> {
        self.set_count(category, id, 0)
    }

    /// 在集合末尾追加新条目
    pub fn add_item(&mut self, category: Category, draft: ThikrDraft) -> ThikrItem {
        let id = self.next_id(category);
        let item = ThikrItem::new(
            id,
            draft.text,
            draft.count.max(1),
            draft.reference.unwrap_or_default(),
            category,
        );

        let mut next = self.items(category).to_vec();
        next.push(item.clone());
        self.swap(category, next);
        item
    }

    /// 编辑条目，ID和类别保持不变，进度仅在补丁显式提供时覆盖
    pub fn edit_item(&mut self, category: Category, id: &str, patch: ThikrPatch) -> Option<ThikrItem> {
        self.update_item(category, id, |item| ThikrItem {
            id: item.id.clone(),
            text: patch.text.unwrap_or_else(|| item.text.clone()),
            count: patch.count.unwrap_or(item.count),
            current_count: patch.current_count.unwrap_or(item.current_count),
            reference: patch.reference.unwrap_or_else(|| item.reference.clone()),
            category: item.category,
        })
    }

    /// 删除条目，返回是否确实删除
    pub fn delete_item(&mut self, category: Category, id: &str) -> bool {
        let current = self.items(category);
        if !current.iter().any(|item| item.id == id) {
            return false;
        }

        let next: Vec<ThikrItem> = current.iter().filter(|item| item.id != id).cloned().collect();
        self.swap(category, next);
        true
    }

    /// 整体替换集合（扫描结果覆盖旧结果）
    pub fn replace(&mut self, category: Category, items: Vec<ThikrItem>) {
        self.swap(category, items);
    }

    fn update_item<F>(&mut self, category: Category, id: &str, update: F) -> Option<ThikrItem>
    where
        F: FnOnce(&ThikrItem) -> ThikrItem,
    {
        let current = self.items(category);
        let index = current.iter().position(|item| item.id == id)?;
        let updated = update(&current[index]);

        let mut next = current.to_vec();
        next[index] = updated.clone();
        self.swap(category, next);
        Some(updated)
    }

    fn swap(&mut self, category: Category, items: Vec<ThikrItem>) {
        match category {
            Category::Morning => self.morning = items,
            Category::Evening => self.evening = items,
            Category::Scanned => self.scanned = items,
        }
    }

    /// 分配 `<类别>-<毫秒令牌>` 形式的新ID
    fn next_id(&mut self, category: Category) -> String {
        loop {
            let now = chrono::Utc::now().timestamp_millis();
            self.last_token = now.max(self.last_token + 1);

            let id = format!("{}-{}", category, self.last_token);
            if self.find(category, &id).is_none() {
                return id;
            }
        }
    }
}

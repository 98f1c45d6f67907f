// ==========================================
// 保质期追踪 - 条目集合
// ==========================================
// 职责: 进程内的有序条目集合（无持久化）
// 红线: 显式持有，不使用全局状态
// 红线: 存储顺序即插入顺序；展示顺序由 engine::summary 派生
// ==========================================

use crate::domain::item::TrackedItem;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;

#[derive(Debug, Clone, Default)]
pub struct ItemStore {
    items: Vec<TrackedItem>,
}

impl ItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加条目（除生成的 id 外无唯一性约束）
    pub fn add(&mut self, item: TrackedItem) {
        tracing::debug!(item_id = %item.id(), "新增条目");
        self.items.push(item);
    }

    /// 按 id 移除条目
    ///
    /// # 返回
    /// - Ok(TrackedItem): 被移除的条目
    /// - Err(NotFound): id 不存在，集合不变
    pub fn remove(&mut self, id: &str) -> RepositoryResult<TrackedItem> {
        let index = self
            .items
            .iter()
            .position(|item| item.id() == id)
            .ok_or_else(|| RepositoryError::item_not_found(id))?;
        Ok(self.items.remove(index))
    }

    pub fn find_by_id(&self, id: &str) -> Option<&TrackedItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn find_by_id_mut(&mut self, id: &str) -> RepositoryResult<&mut TrackedItem> {
        self.items
            .iter_mut()
            .find(|item| item.id() == id)
            .ok_or_else(|| RepositoryError::item_not_found(id))
    }

    /// 按 id 整体替换（单次原子更新）
    pub fn replace(&mut self, item: TrackedItem) -> RepositoryResult<()> {
        let slot = self.find_by_id_mut(item.id())?;
        *slot = item;
        Ok(())
    }

    /// 按当前日期重算所有条目的派生天数
    pub fn refresh(&mut self, today: NaiveDate) {
        for item in &mut self.items {
            item.refresh(today);
        }
    }

    /// 按插入顺序返回
    pub fn list(&self) -> &[TrackedItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::item::ItemDraft;
    use crate::domain::types::StorageLocation;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()
    }

    fn item(id: &str, expiry: NaiveDate) -> TrackedItem {
        TrackedItem::new(
            id.to_string(),
            ItemDraft {
                name: format!("item-{}", id),
                category: "Test".to_string(),
                location: StorageLocation::Pantry,
                barcode: None,
                expiry_date: expiry,
            },
            today(),
        )
        .unwrap()
    }

    #[test]
    fn test_remove_exactly_one() {
        let mut store = ItemStore::new();
        store.add(item("a", today()));
        store.add(item("b", today()));
        store.add(item("c", today()));
        let before_c = store.find_by_id("c").cloned();

        let removed = store.remove("b").unwrap();
        assert_eq!(removed.id(), "b");
        assert_eq!(store.len(), 2);
        assert!(store.find_by_id("b").is_none());
        assert_eq!(store.find_by_id("c").cloned(), before_c);
    }

    #[test]
    fn test_remove_absent_changes_nothing() {
        let mut store = ItemStore::new();
        store.add(item("a", today()));
        let snapshot: Vec<TrackedItem> = store.list().to_vec();

        let result = store.remove("zzz");
        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
        assert_eq!(store.list(), snapshot.as_slice());
    }

    #[test]
    fn test_refresh_recomputes_all() {
        let mut store = ItemStore::new();
        store.add(item("a", NaiveDate::from_ymd_opt(2024, 7, 3).unwrap()));
        store.refresh(NaiveDate::from_ymd_opt(2024, 7, 4).unwrap());
        assert_eq!(store.list()[0].days_until_expiry(), -1);
    }

    #[test]
    fn test_replace_unknown_id() {
        let mut store = ItemStore::new();
        assert!(store.replace(item("x", today())).is_err());
        assert!(store.is_empty());
    }
}

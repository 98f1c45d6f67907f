// ==========================================
// 保质期追踪 - 追踪条目领域模型
// ==========================================
// 红线: days_until_expiry 是派生字段，只能通过重算得到
// 红线: original_expiry_date 只写一次（首次开封）
// 红线: 条目只能由开封转换修改，由"已用完"删除
// ==========================================

use crate::domain::types::{ExpiryStatus, OpenState, StorageLocation};
use crate::engine::expiry::days_until;
use chrono::NaiveDate;
use serde::Serialize;

/// 分类留空时的默认值
pub const DEFAULT_CATEGORY: &str = "Other";

// ==========================================
// ItemDraft - 新建条目的输入
// ==========================================
// 用途: 录入表单/扫码流程校验后的中间结构
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDraft {
    pub name: String,
    pub category: String,
    pub location: StorageLocation,
    pub barcode: Option<String>,
    pub expiry_date: NaiveDate,
}

/// 条目构造失败
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ItemDraftError {
    #[error("名称不能为空")]
    EmptyName,
}

// ==========================================
// TrackedItem - 追踪条目
// ==========================================
// 相互约束的字段均为私有，只读访问；修改走 engine::opening
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedItem {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) category: String,
    pub(crate) location: StorageLocation,
    pub(crate) barcode: Option<String>,
    pub(crate) added_date: NaiveDate,

    // ===== 到期信息 =====
    pub(crate) expiry_date: NaiveDate, // 有效到期日（展示与排序口径）
    pub(crate) original_expiry_date: Option<NaiveDate>, // 开封前声明的到期日
    pub(crate) opened_date: Option<NaiveDate>,
    pub(crate) use_within_days: Option<u32>,
    pub(crate) days_until_expiry: i64, // 派生: expiry_date - today
}

impl TrackedItem {
    /// 由草稿创建条目
    ///
    /// # 参数
    /// - id: 不透明唯一标识
    /// - draft: 已校验的输入
    /// - today: 创建时的当前日期（即 added_date）
    pub fn new(id: String, draft: ItemDraft, today: NaiveDate) -> Result<Self, ItemDraftError> {
        let name = draft.name.trim().to_string();
        if name.is_empty() {
            return Err(ItemDraftError::EmptyName);
        }

        let category = match draft.category.trim() {
            "" => DEFAULT_CATEGORY.to_string(),
            c => c.to_string(),
        };

        let barcode = draft
            .barcode
            .map(|b| b.trim().to_string())
            .filter(|b| !b.is_empty());

        Ok(Self {
            id,
            name,
            category,
            location: draft.location,
            barcode,
            added_date: today,
            expiry_date: draft.expiry_date,
            original_expiry_date: None,
            opened_date: None,
            use_within_days: None,
            days_until_expiry: days_until(draft.expiry_date, today),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn location(&self) -> StorageLocation {
        self.location
    }

    pub fn barcode(&self) -> Option<&str> {
        self.barcode.as_deref()
    }

    pub fn added_date(&self) -> NaiveDate {
        self.added_date
    }

    pub fn expiry_date(&self) -> NaiveDate {
        self.expiry_date
    }

    pub fn original_expiry_date(&self) -> Option<NaiveDate> {
        self.original_expiry_date
    }

    pub fn opened_date(&self) -> Option<NaiveDate> {
        self.opened_date
    }

    pub fn use_within_days(&self) -> Option<u32> {
        self.use_within_days
    }

    pub fn days_until_expiry(&self) -> i64 {
        self.days_until_expiry
    }

    pub fn open_state(&self) -> OpenState {
        if self.opened_date.is_some() {
            OpenState::Opened
        } else {
            OpenState::Unopened
        }
    }

    pub fn status(&self, warning_days: i64) -> ExpiryStatus {
        ExpiryStatus::classify(self.days_until_expiry, warning_days)
    }

    pub fn is_expired(&self) -> bool {
        self.days_until_expiry < 0
    }

    /// 按给定日期重算派生天数
    pub fn refresh(&mut self, today: NaiveDate) {
        self.days_until_expiry = days_until(self.expiry_date, today);
    }

    /// 设置有效到期日并同步重算派生天数
    pub(crate) fn set_effective_expiry(&mut self, expiry_date: NaiveDate, today: NaiveDate) {
        self.expiry_date = expiry_date;
        self.refresh(today);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn draft(name: &str, category: &str, expiry: NaiveDate) -> ItemDraft {
        ItemDraft {
            name: name.to_string(),
            category: category.to_string(),
            location: StorageLocation::Fridge,
            barcode: Some("  ".to_string()),
            expiry_date: expiry,
        }
    }

    #[test]
    fn test_new_item_derives_days_and_defaults() {
        let today = date(2024, 7, 1);
        let item = TrackedItem::new("1".into(), draft("Milk", "", date(2024, 7, 3)), today).unwrap();

        assert_eq!(item.days_until_expiry(), 2);
        assert_eq!(item.category(), DEFAULT_CATEGORY);
        assert_eq!(item.barcode(), None);
        assert_eq!(item.added_date(), today);
        assert_eq!(item.open_state(), OpenState::Unopened);
        assert_eq!(item.original_expiry_date(), None);
    }

    #[test]
    fn test_new_item_rejects_blank_name() {
        let result = TrackedItem::new("1".into(), draft("   ", "Dairy", date(2024, 7, 3)), date(2024, 7, 1));
        assert_eq!(result, Err(ItemDraftError::EmptyName));
    }

    #[test]
    fn test_refresh_tracks_current_date() {
        let mut item =
            TrackedItem::new("1".into(), draft("Milk", "Dairy", date(2024, 7, 3)), date(2024, 7, 1)).unwrap();
        item.refresh(date(2024, 7, 5));
        assert_eq!(item.days_until_expiry(), -2);
        assert!(item.is_expired());
        assert_eq!(item.status(3), ExpiryStatus::Expired);
    }

    #[test]
    fn test_serialize_camel_case() {
        let item =
            TrackedItem::new("1".into(), draft("Milk", "Dairy", date(2024, 7, 3)), date(2024, 7, 1)).unwrap();
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["daysUntilExpiry"], 2);
        assert_eq!(json["expiryDate"], "2024-07-03");
        assert_eq!(json["location"], "fridge");
    }
}

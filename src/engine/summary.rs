// ==========================================
// 保质期追踪 - 列表视图与汇总
// ==========================================
// 职责: 展示排序、即将到期/已过期计数、到期提示文案
// 红线: 排序与计数每次从实时集合重算，不缓存、不持久化
// ==========================================

use crate::domain::item::TrackedItem;
use crate::domain::types::ExpiryStatus;
use crate::i18n::{t, t_with_args};
use serde::{Deserialize, Serialize};

/// 即将到期的阈值（含已过期）
pub const EXPIRING_SOON_MAX_DAYS: i64 = 1;

// ==========================================
// ExpirySummary - 汇总计数
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExpirySummary {
    pub total: usize,
    /// days_until_expiry <= 1（包含已过期）
    pub expiring_soon: usize,
    /// days_until_expiry < 0
    pub expired: usize,
}

impl ExpirySummary {
    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a TrackedItem>) -> Self {
        items.into_iter().fold(Self::default(), |mut acc, item| {
            let days = item.days_until_expiry();
            acc.total += 1;
            if days <= EXPIRING_SOON_MAX_DAYS {
                acc.expiring_soon += 1;
            }
            if days < 0 {
                acc.expired += 1;
            }
            acc
        })
    }

    /// 汇总行文案（"N items expiring soon • M expired"）
    pub fn message(&self) -> String {
        t_with_args(
            "summary.line",
            &[
                ("soon", &self.expiring_soon.to_string()),
                ("expired", &self.expired.to_string()),
            ],
        )
    }
}

/// 展示排序: 按 days_until_expiry 升序，相等时保持原顺序（稳定排序）
pub fn sort_for_display<'a>(items: impl IntoIterator<Item = &'a TrackedItem>) -> Vec<&'a TrackedItem> {
    let mut sorted: Vec<&TrackedItem> = items.into_iter().collect();
    sorted.sort_by_key(|item| item.days_until_expiry());
    sorted
}

/// 条目到期提示（"Milk expires tomorrow"）
pub fn expiry_message(item: &TrackedItem) -> String {
    let name = item.name();
    match item.days_until_expiry() {
        d if d < 0 => t_with_args("item.expired", &[("name", name)]),
        0 => t_with_args("item.expires_today", &[("name", name)]),
        1 => t_with_args("item.expires_tomorrow", &[("name", name)]),
        d => t_with_args("item.expires_in", &[("name", name), ("days", &d.to_string())]),
    }
}

/// 列表中的短标签（"Expires tomorrow"）
pub fn expiry_label(days_until_expiry: i64) -> String {
    match days_until_expiry {
        d if d < 0 => t("label.expired"),
        0 => t("label.expires_today"),
        1 => t("label.expires_tomorrow"),
        d => t_with_args("label.expires_in", &[("days", &d.to_string())]),
    }
}

/// 开封信息行；未开封返回 None
pub fn opened_detail(item: &TrackedItem) -> Option<String> {
    let opened_date = item.opened_date()?;
    let mut line = t_with_args("item.opened_on", &[("date", &opened_date.to_string())]);
    if let Some(days) = item.use_within_days() {
        line.push_str(&format!(
            " ({})",
            t_with_args("item.use_within", &[("days", &days.to_string())])
        ));
    }
    Some(line)
}

/// 按到期状态分组计数（用于颜色/徽标）
pub fn count_by_status<'a>(
    items: impl IntoIterator<Item = &'a TrackedItem>,
    warning_days: i64,
) -> Vec<(ExpiryStatus, usize)> {
    let mut counts = vec![
        (ExpiryStatus::Expired, 0),
        (ExpiryStatus::Critical, 0),
        (ExpiryStatus::Warning, 0),
        (ExpiryStatus::Fresh, 0),
    ];
    for item in items {
        let status = item.status(warning_days);
        if let Some(entry) = counts.iter_mut().find(|(s, _)| *s == status) {
            entry.1 += 1;
        }
    }
    counts
}

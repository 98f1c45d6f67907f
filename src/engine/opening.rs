// ==========================================
// 保质期追踪 - 开封转换引擎
// ==========================================
// 状态: Unopened → Opened（终态，无逆向转换）
// 红线: 开封只能缩短保质期，不能延长
// 红线: original_expiry_date 只在首次开封时写入
// 红线: 非法天数输入不改变任何状态
// ==========================================
// 转换效果（单次原子更新）:
// 1) original_expiry_date 未设置时取当前 expiry_date
// 2) opened_date = 开封日快照
// 3) use_within_days = 用户输入的正整数
// 4) candidate = opened_date + use_within_days
// 5) expiry_date = min(candidate, original_expiry_date)
// 6) 按新 expiry_date 重算 days_until_expiry
// ==========================================

use crate::domain::item::TrackedItem;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use tracing::instrument;

// ==========================================
// UseWithinDays - 开封后可用天数
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct UseWithinDays(NonZeroU32);

/// 开封天数输入不是正整数
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("开封后可用天数必须为正整数: {input}")]
pub struct InvalidUseWithinDays {
    pub input: String,
}

impl UseWithinDays {
    pub fn new(days: u32) -> Option<Self> {
        NonZeroU32::new(days).map(Self)
    }

    /// 解析用户输入（去除首尾空白后必须为正整数）
    pub fn parse(input: &str) -> Result<Self, InvalidUseWithinDays> {
        input
            .trim()
            .parse::<i64>()
            .ok()
            .and_then(|v| u32::try_from(v).ok())
            .and_then(Self::new)
            .ok_or_else(|| InvalidUseWithinDays {
                input: input.to_string(),
            })
    }

    pub fn get(&self) -> u32 {
        self.0.get()
    }
}

impl TryFrom<u32> for UseWithinDays {
    type Error = InvalidUseWithinDays;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| InvalidUseWithinDays {
            input: value.to_string(),
        })
    }
}

impl From<UseWithinDays> for u32 {
    fn from(value: UseWithinDays) -> Self {
        value.get()
    }
}

// ==========================================
// OpenOutcome - 开封结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OpenOutcome {
    /// 转换成功
    Opened {
        previous_expiry: NaiveDate,
        effective_expiry: NaiveDate,
        days_until_expiry: i64,
    },
    /// 已开封，拒绝转换；带回原开封日期
    AlreadyOpened { opened_date: NaiveDate },
    /// 天数输入非法，静默忽略
    Ignored { input: String },
}

// ==========================================
// OpeningEngine - 开封转换引擎
// ==========================================
#[derive(Debug, Default)]
pub struct OpeningEngine;

impl OpeningEngine {
    pub fn new() -> Self {
        Self
    }

    /// 以原始文本输入执行开封
    ///
    /// 守卫先于输入解析: 已开封的条目无论输入如何都返回 AlreadyOpened
    #[instrument(skip(self, item), fields(item_id = %item.id))]
    pub fn open(&self, item: &mut TrackedItem, input: &str, opened_on: NaiveDate) -> OpenOutcome {
        if let Some(opened_date) = item.opened_date {
            tracing::debug!(%opened_date, "条目已开封，拒绝重复开封");
            return OpenOutcome::AlreadyOpened { opened_date };
        }

        match UseWithinDays::parse(input) {
            Ok(days) => self.open_with(item, days, opened_on),
            Err(e) => {
                tracing::debug!("忽略开封请求: {}", e);
                OpenOutcome::Ignored {
                    input: input.to_string(),
                }
            }
        }
    }

    /// 以已校验天数执行开封
    pub fn open_with(
        &self,
        item: &mut TrackedItem,
        use_within: UseWithinDays,
        opened_on: NaiveDate,
    ) -> OpenOutcome {
        if let Some(opened_date) = item.opened_date {
            return OpenOutcome::AlreadyOpened { opened_date };
        }

        // 在副本上完成全部步骤，最后整体替换
        let mut next = item.clone();
        let previous_expiry = next.expiry_date;

        let original = *next.original_expiry_date.get_or_insert(previous_expiry);
        next.opened_date = Some(opened_on);
        next.use_within_days = Some(use_within.get());

        let effective = match opened_on.checked_add_days(Days::new(u64::from(use_within.get()))) {
            Some(candidate) => candidate.min(original),
            None => original,
        };
        next.set_effective_expiry(effective, opened_on);

        let outcome = OpenOutcome::Opened {
            previous_expiry,
            effective_expiry: effective,
            days_until_expiry: next.days_until_expiry,
        };
        *item = next;

        tracing::info!(
            use_within_days = use_within.get(),
            %previous_expiry,
            effective_expiry = %effective,
            "条目已开封"
        );
        outcome
    }
}

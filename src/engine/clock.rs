// ==========================================
// 保质期追踪 - 时钟
// ==========================================
// 职责: 提供"今天"的快照，便于测试注入固定日期
// ==========================================

use chrono::{Local, NaiveDate};
use std::sync::Mutex;

/// 当前日期来源
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// 系统本地日期
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// 可手动推进的固定日期
#[derive(Debug)]
pub struct FixedClock {
    today: Mutex<NaiveDate>,
}

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today: Mutex::new(today),
        }
    }

    pub fn set(&self, today: NaiveDate) {
        match self.today.lock() {
            Ok(mut guard) => *guard = today,
            Err(poisoned) => *poisoned.into_inner() = today,
        }
    }

    /// 向后推进若干天
    pub fn advance_days(&self, days: i64) {
        let next = self.today() + chrono::Duration::days(days);
        self.set(next);
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        match self.today.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

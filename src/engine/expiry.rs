// ==========================================
// 保质期追踪 - 到期天数计算
// ==========================================
// 口径: (到期日零点 - 今日零点) 的毫秒差 / 一天毫秒数，向上取整
// 红线: 负数保留（表示已过期），不做截断到 0
// ==========================================

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

/// 一天的毫秒数
pub const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// 手工录入日期的唯一格式
pub const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";

/// 到期日输入解析错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExpiryParseError {
    #[error("到期日为空")]
    Empty,

    #[error("到期日格式错误（应为YYYY-MM-DD）: {input}")]
    Malformed { input: String },
}

/// 计算两个时刻之间的到期天数
///
/// 两端先截断到零点，再对毫秒差做向上取整除法。
pub fn days_between(expiry: NaiveDateTime, today: NaiveDateTime) -> i64 {
    let expiry_midnight = expiry.date().and_time(NaiveTime::MIN);
    let today_midnight = today.date().and_time(NaiveTime::MIN);
    let diff_ms = (expiry_midnight - today_midnight).num_milliseconds();
    ceil_div(diff_ms, MILLIS_PER_DAY)
}

/// 日期口径的到期天数（无时间分量）
pub fn days_until(expiry: NaiveDate, today: NaiveDate) -> i64 {
    days_between(expiry.and_time(NaiveTime::MIN), today.and_time(NaiveTime::MIN))
}

/// 对录入文本计算到期天数
///
/// 空输入返回 0；格式错误返回错误而不是静默归零
pub fn days_until_input(input: &str, today: NaiveDate) -> Result<i64, ExpiryParseError> {
    match parse_expiry_date(input) {
        Ok(expiry) => Ok(days_until(expiry, today)),
        Err(ExpiryParseError::Empty) => Ok(0),
        Err(e) => Err(e),
    }
}

/// 严格解析 YYYY-MM-DD
///
/// 只接受 4 位年 + 2 位月 + 2 位日，前后空白会被忽略
pub fn parse_expiry_date(input: &str) -> Result<NaiveDate, ExpiryParseError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(ExpiryParseError::Empty);
    }

    let malformed = || ExpiryParseError::Malformed {
        input: input.to_string(),
    };

    if !has_date_shape(s) {
        return Err(malformed());
    }

    NaiveDate::parse_from_str(s, DATE_INPUT_FORMAT).map_err(|_| malformed())
}

/// 是否为 dddd-dd-dd 形状（不校验日期本身是否存在）
pub fn has_date_shape(input: &str) -> bool {
    let bytes = input.trim().as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

// 除数为正；负余数时截断方向已是向上取整
fn ceil_div(n: i64, d: i64) -> i64 {
    let q = n / d;
    if n % d > 0 {
        q + 1
    } else {
        q
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_same_day_is_zero() {
        assert_eq!(days_until(date(2024, 7, 1), date(2024, 7, 1)), 0);
    }

    #[test]
    fn test_past_expiry_stays_negative() {
        assert_eq!(days_until(date(2024, 6, 29), date(2024, 7, 1)), -2);
    }

    #[test]
    fn test_future_expiry() {
        assert_eq!(days_until(date(2024, 7, 3), date(2024, 7, 1)), 2);
        // 跨月跨年
        assert_eq!(days_until(date(2025, 1, 1), date(2024, 12, 31)), 1);
        assert_eq!(days_until(date(2024, 3, 1), date(2024, 2, 28)), 2);
    }

    #[test]
    fn test_time_of_day_is_truncated() {
        let expiry = date(2024, 7, 3).and_hms_opt(0, 30, 0).unwrap();
        let today = date(2024, 7, 1).and_hms_opt(23, 59, 59).unwrap();
        assert_eq!(days_between(expiry, today), 2);

        let expiry = date(2024, 6, 30).and_hms_opt(23, 0, 0).unwrap();
        let today = date(2024, 7, 1).and_hms_opt(1, 0, 0).unwrap();
        assert_eq!(days_between(expiry, today), -1);
    }

    #[test]
    fn test_ceil_div() {
        assert_eq!(ceil_div(MILLIS_PER_DAY + 1, MILLIS_PER_DAY), 2);
        assert_eq!(ceil_div(-MILLIS_PER_DAY - 1, MILLIS_PER_DAY), -1);
        assert_eq!(ceil_div(0, MILLIS_PER_DAY), 0);
    }

    #[test]
    fn test_input_empty_defaults_to_zero() {
        assert_eq!(days_until_input("", date(2024, 7, 1)), Ok(0));
        assert_eq!(days_until_input("   ", date(2024, 7, 1)), Ok(0));
        assert_eq!(days_until_input("2024-07-11", date(2024, 7, 1)), Ok(10));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(parse_expiry_date("2024-7-1").is_err());
        assert!(parse_expiry_date("2024/07/01").is_err());
        assert!(parse_expiry_date("2024-02-30").is_err());
        assert!(parse_expiry_date("tomorrow").is_err());
        assert_eq!(parse_expiry_date(" 2024-07-20 "), Ok(date(2024, 7, 20)));
    }

    #[test]
    fn test_date_shape() {
        assert!(has_date_shape("2024-02-30"));
        assert!(has_date_shape(" 2024-07-20 "));
        assert!(!has_date_shape("Yogurt"));
        assert!(!has_date_shape("2024-7-1"));
    }
}

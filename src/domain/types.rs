// ==========================================
// 保质期追踪 - 领域类型定义
// ==========================================
// 职责: 存放位置、到期状态、开封状态等枚举
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 存放位置 (Storage Location)
// ==========================================
// 序列化格式: lowercase (与录入表单一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageLocation {
    #[default]
    Fridge, // 冷藏
    Pantry,  // 常温储物柜
    Freezer, // 冷冻
}

impl StorageLocation {
    pub const ALL: [StorageLocation; 3] = [
        StorageLocation::Fridge,
        StorageLocation::Pantry,
        StorageLocation::Freezer,
    ];

    /// 首字母大写的展示名（Fridge / Pantry / Freezer）
    pub fn label(&self) -> &'static str {
        match self {
            StorageLocation::Fridge => "Fridge",
            StorageLocation::Pantry => "Pantry",
            StorageLocation::Freezer => "Freezer",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageLocation::Fridge => "fridge",
            StorageLocation::Pantry => "pantry",
            StorageLocation::Freezer => "freezer",
        }
    }
}

impl fmt::Display for StorageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 无法识别的存放位置
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("未知的存放位置: {0}（可选 fridge/pantry/freezer）")]
pub struct UnknownLocation(pub String);

impl FromStr for StorageLocation {
    type Err = UnknownLocation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fridge" => Ok(StorageLocation::Fridge),
            "pantry" => Ok(StorageLocation::Pantry),
            "freezer" => Ok(StorageLocation::Freezer),
            _ => Err(UnknownLocation(s.to_string())),
        }
    }
}

// ==========================================
// 到期状态 (Expiry Status)
// ==========================================
// 顺序: Expired < Critical < Warning < Fresh（越靠前越紧急）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpiryStatus {
    Expired,  // 已过期 (<0)
    Critical, // 今天/明天到期 (<=1)
    Warning,  // 临期 (<=warning_days)
    Fresh,    // 新鲜
}

impl ExpiryStatus {
    /// 根据剩余天数分级
    ///
    /// warning_days 小于 1 时按 1 处理，Critical 区间总是存在
    pub fn classify(days_until_expiry: i64, warning_days: i64) -> Self {
        if days_until_expiry < 0 {
            ExpiryStatus::Expired
        } else if days_until_expiry <= 1 {
            ExpiryStatus::Critical
        } else if days_until_expiry <= warning_days.max(1) {
            ExpiryStatus::Warning
        } else {
            ExpiryStatus::Fresh
        }
    }
}

impl fmt::Display for ExpiryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpiryStatus::Expired => write!(f, "EXPIRED"),
            ExpiryStatus::Critical => write!(f, "CRITICAL"),
            ExpiryStatus::Warning => write!(f, "WARNING"),
            ExpiryStatus::Fresh => write!(f, "FRESH"),
        }
    }
}

// ==========================================
// 开封状态 (Open State)
// ==========================================
// 单向: Unopened → Opened，无逆向转换
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OpenState {
    Unopened,
    Opened,
}

impl fmt::Display for OpenState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpenState::Unopened => write!(f, "UNOPENED"),
            OpenState::Opened => write!(f, "OPENED"),
        }
    }
}

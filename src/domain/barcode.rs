// ==========================================
// 保质期追踪 - 条码领域模型
// ==========================================
// 用途: 扫码能力产出的解码结果
// 说明: 条码内容视为不透明字符串，不做校验位检查
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// 条码制式（扫码能力启用的码型）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BarcodeFormat {
    Qr,
    #[serde(rename = "ean-13")]
    Ean13,
    #[serde(rename = "ean-8")]
    Ean8,
    UpcA,
    UpcE,
    #[serde(rename = "code-128")]
    Code128,
    #[serde(rename = "code-39")]
    Code39,
    Unknown,
}

impl fmt::Display for BarcodeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BarcodeFormat::Qr => "qr",
            BarcodeFormat::Ean13 => "ean-13",
            BarcodeFormat::Ean8 => "ean-8",
            BarcodeFormat::UpcA => "upc-a",
            BarcodeFormat::UpcE => "upc-e",
            BarcodeFormat::Code128 => "code-128",
            BarcodeFormat::Code39 => "code-39",
            BarcodeFormat::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

/// 单个解码结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarcodeResult {
    pub value: String,
    pub format: BarcodeFormat,
}

impl BarcodeResult {
    pub fn new(value: impl Into<String>, format: BarcodeFormat) -> Self {
        Self {
            value: value.into(),
            format,
        }
    }

    /// 空白值不可用（解码器偶尔回调空串）
    pub fn is_usable(&self) -> bool {
        !self.value.trim().is_empty()
    }
}

/// 一次解码回调携带的一批结果
pub type DecodeBatch = Vec<BarcodeResult>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_serde_matches_display() {
        for format in [
            BarcodeFormat::Qr,
            BarcodeFormat::Ean13,
            BarcodeFormat::Ean8,
            BarcodeFormat::UpcA,
            BarcodeFormat::UpcE,
            BarcodeFormat::Code128,
            BarcodeFormat::Code39,
        ] {
            let json = serde_json::to_string(&format).unwrap();
            assert_eq!(json, format!("\"{}\"", format));
        }
    }

    #[test]
    fn test_blank_value_not_usable() {
        assert!(!BarcodeResult::new("  ", BarcodeFormat::Ean13).is_usable());
        assert!(BarcodeResult::new("4006381333931", BarcodeFormat::Ean13).is_usable());
    }
}

// ==========================================
// 保质期追踪 - 录入表单
// ==========================================
// 职责: 收集手工/扫码录入的字段，提交时校验并生成草稿
// 红线: 名称与到期日为必填；校验失败不产生任何条目
// 决策: 到期日格式错误直接拒绝保存，不静默归零
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::capture::{
    BarcodeCapture, ScanOutcome, ScanSession, SIMULATED_CATEGORY, SIMULATED_PRODUCT_NAME,
};
use crate::config::ConfigManager;
use crate::domain::barcode::BarcodeResult;
use crate::domain::item::ItemDraft;
use crate::domain::types::StorageLocation;
use crate::engine::expiry::{parse_expiry_date, ExpiryParseError};
use crate::i18n::{t, t_with_args};
use serde::{Deserialize, Serialize};

/// 录入表单（所有文本字段保持用户原样输入）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryForm {
    pub barcode: String,
    pub name: String,
    pub category: String,
    pub location: StorageLocation,
    /// YYYY-MM-DD
    pub expiry_date: String,
}

impl EntryForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// 按配置初始化默认存放位置
    pub fn with_defaults(config: &ConfigManager) -> Self {
        Self {
            location: config.default_location(),
            ..Self::default()
        }
    }

    /// 扫码结果写入条码字段
    pub fn apply_scan(&mut self, result: &BarcodeResult) {
        self.barcode = result.value.trim().to_string();
    }

    /// 模拟扫码的占位商品信息（只填空白字段）
    pub fn prefill_simulated_product(&mut self) {
        if self.name.trim().is_empty() {
            self.name = SIMULATED_PRODUCT_NAME.to_string();
        }
        if self.category.trim().is_empty() {
            self.category = SIMULATED_CATEGORY.to_string();
        }
    }

    /// 设置存放位置（文本输入）
    pub fn set_location_text(&mut self, input: &str) -> ApiResult<()> {
        self.location = input.parse().map_err(|_| {
            ApiError::InvalidInput(t_with_args("form.invalid_location", &[("input", input)]))
        })?;
        Ok(())
    }

    /// 校验并生成草稿
    ///
    /// # 返回
    /// - Ok(ItemDraft): 可用于创建条目
    /// - Err(ValidationError): 名称或到期日缺失
    /// - Err(InvalidInput): 到期日无法解析
    pub fn validate(&self) -> ApiResult<ItemDraft> {
        if self.name.trim().is_empty() || self.expiry_date.trim().is_empty() {
            return Err(ApiError::ValidationError(t("form.required_fields")));
        }

        let expiry_date = parse_expiry_date(&self.expiry_date).map_err(|e| match e {
            ExpiryParseError::Empty => ApiError::ValidationError(t("form.required_fields")),
            ExpiryParseError::Malformed { input } => {
                ApiError::InvalidInput(t_with_args("form.invalid_date", &[("input", &input)]))
            }
        })?;

        let barcode = match self.barcode.trim() {
            "" => None,
            b => Some(b.to_string()),
        };

        Ok(ItemDraft {
            name: self.name.trim().to_string(),
            category: self.category.trim().to_string(),
            location: self.location,
            barcode,
            expiry_date,
        })
    }

    /// 清空输入（保留存放位置）
    pub fn reset(&mut self) {
        *self = Self {
            location: self.location,
            ..Self::default()
        };
    }

    /// 运行一次扫码会话，成功时写入条码字段
    ///
    /// 权限/设备缺失以 CaptureUnavailable 返回，表单不变
    pub async fn scan_with(
        &mut self,
        session: &ScanSession,
        capture: &dyn BarcodeCapture,
    ) -> ApiResult<ScanOutcome> {
        let outcome = session.run(capture).await?;
        if let ScanOutcome::Scanned(result) = &outcome {
            self.apply_scan(result);
        }
        Ok(outcome)
    }
}

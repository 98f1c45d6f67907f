// ==========================================
// 保质期追踪 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换下层错误为用户可读的消息
// 分类:
// - 校验错误: 缺少必填项，阻止保存
// - 非法转换: 重复开封，带回已有开封日期
// - 扫码不可用: 权限/设备缺失，本次会话终止
// （非法天数输入不是错误，见 OpenResult::Ignored）
// ==========================================

use crate::capture::CaptureError;
use crate::i18n::t_with_args;
use crate::repository::error::RepositoryError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入错误
    // ==========================================
    /// 校验失败，消息已本地化
    #[error("数据验证失败: {0}")]
    ValidationError(String),

    #[error("无效输入: {0}")]
    InvalidInput(String),

    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("资源未找到: {0}")]
    NotFound(String),

    /// id 前缀匹配到多个条目
    #[error("id 前缀不唯一: {input}（匹配 {matches} 个条目）")]
    AmbiguousId { input: String, matches: usize },

    #[error("无效的状态转换: {item_name} 已于 {opened_date} 开封")]
    AlreadyOpened {
        item_id: String,
        item_name: String,
        opened_date: NaiveDate,
    },

    // ==========================================
    // 外部能力错误
    // ==========================================
    #[error("扫码不可用: {0}")]
    CaptureUnavailable(#[from] CaptureError),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { id, .. } => ApiError::NotFound(id),
        }
    }
}

impl ApiError {
    /// 错误代码（返回给前端）
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::ValidationError(_) => "VALIDATION_ERROR",
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::AmbiguousId { .. } => "AMBIGUOUS_ID",
            ApiError::AlreadyOpened { .. } => "ALREADY_OPENED",
            ApiError::CaptureUnavailable(CaptureError::PermissionDenied) => "CAMERA_PERMISSION_DENIED",
            ApiError::CaptureUnavailable(CaptureError::DeviceUnavailable) => "CAMERA_UNAVAILABLE",
            ApiError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// 面向用户的提示（已本地化）
    pub fn user_message(&self) -> String {
        match self {
            ApiError::ValidationError(msg) | ApiError::InvalidInput(msg) => msg.clone(),
            ApiError::NotFound(id) => t_with_args("item.not_found", &[("id", id)]),
            ApiError::AmbiguousId { input, matches } => t_with_args(
                "item.ambiguous_id",
                &[("id", input), ("count", &matches.to_string())],
            ),
            ApiError::AlreadyOpened { opened_date, .. } => {
                t_with_args("item.already_opened", &[("date", &opened_date.to_string())])
            }
            ApiError::CaptureUnavailable(e) => e.user_message(),
            ApiError::InternalError(_) => self.to_string(),
        }
    }

    /// 转换为错误响应
    pub fn to_response(&self) -> ErrorResponse {
        let details = match self {
            ApiError::AlreadyOpened {
                item_id,
                opened_date,
                ..
            } => Some(serde_json::json!({
                "item_id": item_id,
                "opened_date": opened_date,
            })),
            ApiError::CaptureUnavailable(e) => Some(serde_json::json!({
                "can_retry_permission": e.can_retry_permission(),
            })),
            _ => None,
        };

        ErrorResponse {
            code: self.code().to_string(),
            message: self.user_message(),
            details,
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

/// 错误响应（返回给前端）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// 错误代码
    pub code: String,

    /// 错误消息
    pub message: String,

    /// 详细信息（可选）
    pub details: Option<serde_json::Value>,
}

/// 将ApiError转换为JSON字符串
pub fn map_api_error(err: &ApiError) -> String {
    serde_json::to_string(&err.to_response()).unwrap_or_else(|_| err.to_string())
}

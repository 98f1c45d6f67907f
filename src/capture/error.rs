// ==========================================
// 保质期追踪 - 扫码能力错误类型
// ==========================================
// 红线: 权限缺失/设备缺失对本次会话是终态，不自动重试
// ==========================================

use crate::i18n::t;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureError {
    #[error("相机权限未授予")]
    PermissionDenied,

    #[error("未找到相机设备")]
    DeviceUnavailable,
}

impl CaptureError {
    /// 面向用户的提示（已本地化）
    pub fn user_message(&self) -> String {
        match self {
            CaptureError::PermissionDenied => t("capture.permission_required"),
            CaptureError::DeviceUnavailable => t("capture.no_device"),
        }
    }

    /// 用户可否通过重新授权恢复（否则只能取消）
    pub fn can_retry_permission(&self) -> bool {
        matches!(self, CaptureError::PermissionDenied)
    }
}

// ==========================================
// 保质期追踪 - 扫码会话
// ==========================================
// 职责: 在扫码能力之上保证"每次会话只采纳第一次解码"
// 红线: 采纳第一次解码后会话立即失活，突发回调也不会二次采纳
// 红线: 权限/设备缺失直接返回，不重试、不超时
// ==========================================
// 流程:
// 1) 查询权限；未授予时自动请求一次
// 2) 仍未授予 → PermissionDenied（用户可重新授权或取消）
// 3) 无设备 → DeviceUnavailable
// 4) 激活能力，消费解码流直到首次采纳 / 流结束 / close()
// 5) 返回前总是停用能力
// ==========================================

use crate::capture::error::CaptureError;
use crate::domain::barcode::{BarcodeResult, DecodeBatch};
use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Notify;
use tracing::instrument;

/// 相机权限状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CameraPermission {
    Granted,
    Denied,
    NotDetermined,
}

// ==========================================
// BarcodeCapture - 扫码能力抽象
// ==========================================

/// 外部扫码能力（相机 + 解码器）
///
/// activate 返回的流即解码回调：每个元素是一次回调携带的一批结果
#[async_trait]
pub trait BarcodeCapture: Send + Sync {
    async fn permission_status(&self) -> CameraPermission;

    async fn request_permission(&self) -> CameraPermission;

    fn has_device(&self) -> bool;

    fn activate(&self) -> BoxStream<'static, DecodeBatch>;

    fn deactivate(&self);
}

/// 会话结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScanOutcome {
    Scanned(BarcodeResult),
    Cancelled,
}

// ==========================================
// ScanSession - 单次扫码会话
// ==========================================
#[derive(Debug, Default)]
pub struct ScanSession {
    active: AtomicBool,
    closed: AtomicBool,
    close_signal: Notify,
}

impl ScanSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// 置为激活（由 run 调用；自行驱动回调的调用方也可直接使用）
    pub fn arm(&self) {
        if !self.closed.load(Ordering::Acquire) {
            self.active.store(true, Ordering::Release);
        }
    }

    /// 处理一次解码回调
    ///
    /// 只看批次中的第一个结果；空值不采纳且不失活。
    /// 采纳与失活是同一次 compare_exchange，并发回调最多一个成功。
    pub fn accept(&self, batch: &[BarcodeResult]) -> Option<BarcodeResult> {
        let first = batch.first()?;
        if !first.is_usable() {
            tracing::debug!("忽略空白解码结果");
            return None;
        }

        self.active
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| first.clone())
    }

    /// 用户取消/关闭
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.active.store(false, Ordering::Release);
        self.close_signal.notify_one();
    }

    /// 运行会话直到首次采纳或取消
    #[instrument(skip(self, capture))]
    pub async fn run(&self, capture: &dyn BarcodeCapture) -> Result<ScanOutcome, CaptureError> {
        Self::ensure_ready(capture).await?;

        if self.closed.load(Ordering::Acquire) {
            return Ok(ScanOutcome::Cancelled);
        }

        let mut feed = capture.activate();
        self.arm();
        tracing::debug!("扫码会话已激活");

        let outcome = loop {
            tokio::select! {
                _ = self.close_signal.notified() => break ScanOutcome::Cancelled,
                next = feed.next() => match next {
                    Some(batch) => {
                        if let Some(result) = self.accept(&batch) {
                            break ScanOutcome::Scanned(result);
                        }
                    }
                    None => break ScanOutcome::Cancelled,
                },
            }
        };

        self.active.store(false, Ordering::Release);
        capture.deactivate();

        match &outcome {
            ScanOutcome::Scanned(result) => {
                tracing::info!(value = %result.value, format = %result.format, "扫码成功")
            }
            ScanOutcome::Cancelled => tracing::info!("扫码会话已取消"),
        }
        Ok(outcome)
    }

    async fn ensure_ready(capture: &dyn BarcodeCapture) -> Result<(), CaptureError> {
        let mut permission = capture.permission_status().await;
        if permission != CameraPermission::Granted {
            tracing::info!(?permission, "请求相机权限");
            permission = capture.request_permission().await;
        }
        if permission != CameraPermission::Granted {
            tracing::warn!(?permission, "相机权限未授予，会话终止");
            return Err(CaptureError::PermissionDenied);
        }
        if !capture.has_device() {
            tracing::warn!("未找到相机设备，会话终止");
            return Err(CaptureError::DeviceUnavailable);
        }
        Ok(())
    }
}

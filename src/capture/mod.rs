// ==========================================
// 保质期追踪 - 扫码能力边界
// ==========================================
// 职责: 抽象外部扫码能力（权限/设备/激活/解码回调），
//       并保证每次会话只采纳第一次解码
// 说明: 条码解码本身完全由外部能力完成
// ==========================================

pub mod error;
pub mod session;
pub mod simulated;

pub use error::CaptureError;
pub use session::{BarcodeCapture, CameraPermission, ScanOutcome, ScanSession};
pub use simulated::{
    random_barcode, SimulatedCapture, SIMULATED_CATEGORY, SIMULATED_PRODUCT_NAME,
};

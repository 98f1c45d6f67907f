// ==========================================
// 保质期追踪 - 领域模型层
// ==========================================
// 职责: 定义领域实体与类型
// 红线: 不含存储逻辑，不含扫码逻辑
// ==========================================

pub mod barcode;
pub mod item;
pub mod types;

// 重导出核心类型
pub use barcode::{BarcodeFormat, BarcodeResult, DecodeBatch};
pub use item::{ItemDraft, ItemDraftError, TrackedItem, DEFAULT_CATEGORY};
pub use types::{ExpiryStatus, OpenState, StorageLocation, UnknownLocation};

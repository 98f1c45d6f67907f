// ==========================================
// 保质期追踪 - 核心库
// ==========================================
// 职责: 记录食品到期日，开封后按"N 天内用完"缩短有效期
// 分层: domain → engine → repository → capture → api → app
// 系统定位: 单用户、内存集合，不做持久化
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "en");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 到期规则
pub mod engine;

// 数据仓储层 - 内存集合
pub mod repository;

// 扫码层 - 相机能力与会话
pub mod capture;

// 配置层
pub mod config;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 用户操作
pub mod api;

// 应用层 - 命令行前端
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域
pub use domain::{
    BarcodeFormat, BarcodeResult, ExpiryStatus, ItemDraft, OpenState, StorageLocation,
    TrackedItem,
};

// 引擎
pub use engine::{Clock, ExpirySummary, FixedClock, OpeningEngine, SystemClock, UseWithinDays};

// 扫码
pub use capture::{BarcodeCapture, CaptureError, ScanOutcome, ScanSession, SimulatedCapture};

// API
pub use api::{ApiError, ApiResult, EntryForm, ItemApi, OpenResult};

// 应用
pub use app::AppState;
pub use config::ConfigManager;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "Best Before Tracker";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}

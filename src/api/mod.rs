// ==========================================
// 保质期追踪 - API 层
// ==========================================
// 职责: 提供用户操作接口，供命令行/界面调用
// ==========================================

pub mod entry_form;
pub mod error;
pub mod item_api;

// 重导出核心类型
pub use entry_form::EntryForm;
pub use error::{map_api_error, ApiError, ApiResult, ErrorResponse};
pub use item_api::{ItemApi, OpenResult};

// ==========================================
// 保质期追踪 - 数据仓储层
// ==========================================
// 职责: 条目集合的增删查
// 存储: 仅进程内存，随应用生命周期存在
// ==========================================

pub mod error;
pub mod item_store;

pub use error::{RepositoryError, RepositoryResult};
pub use item_store::ItemStore;

// ==========================================
// 保质期追踪 - 应用层
// ==========================================
// 职责: 应用状态组装与命令行前端
// ==========================================

pub mod cli;
pub mod state;

pub use cli::{run, run_with, Cli, CliReply};
pub use state::AppState;

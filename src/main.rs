// ==========================================
// 保质期追踪 - 命令行主入口
// ==========================================
// 启动顺序: 日志 → 配置 → 语言 → 应用状态 → 交互循环
// ==========================================

use anyhow::Context;
use best_before_tracker::app::{self, AppState};
use best_before_tracker::config::ConfigManager;
use best_before_tracker::{i18n, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志系统
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} v{}", best_before_tracker::APP_NAME, best_before_tracker::VERSION);
    tracing::info!("==================================================");

    let config = ConfigManager::load().context("无法加载配置")?;
    i18n::set_locale(&config.locale());

    let state = AppState::new(config).context("无法初始化AppState")?;
    tracing::info!("AppState初始化成功");

    app::run(state).await
}

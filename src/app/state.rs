// ==========================================
// 保质期追踪 - 应用状态
// ==========================================
// 职责: 组装配置、时钟与 API 实例，供前端（命令行）使用
// ==========================================

use std::sync::Arc;

use chrono::{Days, NaiveDate};

use crate::api::{ApiResult, ItemApi};
use crate::config::ConfigManager;
use crate::domain::item::ItemDraft;
use crate::domain::types::StorageLocation;
use crate::engine::clock::{Clock, SystemClock};

/// 应用状态
pub struct AppState {
    /// 生效配置
    pub config: ConfigManager,

    /// 条目API
    pub item_api: ItemApi,
}

impl AppState {
    /// 创建新的AppState实例（系统时钟）
    ///
    /// # 参数
    /// - config: 已加载的配置
    ///
    /// # 返回
    /// - Ok(AppState): 应用状态实例
    /// - Err(ApiError): 示例条目预置失败
    pub fn new(config: ConfigManager) -> ApiResult<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// 指定时钟创建（测试用固定日期）
    pub fn with_clock(config: ConfigManager, clock: Arc<dyn Clock>) -> ApiResult<Self> {
        tracing::info!(
            locale = %config.locale(),
            warning_days = config.warning_days(),
            "初始化AppState"
        );

        let mut state = Self {
            item_api: ItemApi::new(clock, config.clone()),
            config,
        };

        if state.config.seed_demo_items() {
            state.seed_demo_items()?;
        }

        Ok(state)
    }

    /// 预置示例条目（牛奶 +2 天、面包 +5 天）
    fn seed_demo_items(&mut self) -> ApiResult<()> {
        let today = self.item_api.today();
        let demo = [
            ("Milk", "Dairy", StorageLocation::Fridge, 2),
            ("Bread", "Bakery", StorageLocation::Pantry, 5),
        ];

        for (name, category, location, offset) in demo {
            self.item_api.add_draft(ItemDraft {
                name: name.to_string(),
                category: category.to_string(),
                location,
                barcode: None,
                expiry_date: offset_date(today, offset),
            })?;
        }

        tracing::info!("已预置示例条目: {}", demo.len());
        Ok(())
    }
}

fn offset_date(today: NaiveDate, days: u64) -> NaiveDate {
    today.checked_add_days(Days::new(days)).unwrap_or(today)
}

// ==========================================
// 保质期追踪 - 引擎层
// ==========================================
// 职责: 纯规则计算（到期天数、开封转换、排序汇总）
// 红线: 引擎不持有集合，不做输入输出
// ==========================================

pub mod clock;
pub mod events;
pub mod expiry;
pub mod opening;
pub mod summary;

// 重导出核心引擎
pub use clock::{Clock, FixedClock, SystemClock};
pub use events::{
    ItemEvent, ItemEventPublisher, ItemEventType, OptionalEventPublisher, RecordingEventPublisher,
};
pub use expiry::{
    days_between, days_until, days_until_input, has_date_shape, parse_expiry_date, ExpiryParseError,
};
pub use opening::{InvalidUseWithinDays, OpenOutcome, OpeningEngine, UseWithinDays};
pub use summary::{count_by_status, sort_for_display, ExpirySummary, EXPIRING_SOON_MAX_DAYS};

// ==========================================
// 保质期追踪 - 条目事件发布
// ==========================================
// 职责: 定义条目变更事件发布 trait，供界面刷新订阅
// 说明: Engine 层定义 trait，外层（界面/测试）实现
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::sync::{Arc, Mutex};

// ==========================================
// 条目事件类型
// ==========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemEventType {
    /// 新增条目
    Added,
    /// 标记开封
    Opened,
    /// 已用完（移除）
    Removed,
}

impl ItemEventType {
    pub fn as_str(&self) -> &str {
        match self {
            ItemEventType::Added => "Added",
            ItemEventType::Opened => "Opened",
            ItemEventType::Removed => "Removed",
        }
    }
}

/// 条目事件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemEvent {
    pub item_id: String,
    pub event_type: ItemEventType,
    pub occurred_on: NaiveDate,
}

impl ItemEvent {
    pub fn new(item_id: impl Into<String>, event_type: ItemEventType, occurred_on: NaiveDate) -> Self {
        Self {
            item_id: item_id.into(),
            event_type,
            occurred_on,
        }
    }
}

// ==========================================
// 事件发布 Trait
// ==========================================

/// 条目事件发布者
///
/// 发布失败不影响触发它的用户操作
pub trait ItemEventPublisher: Send + Sync {
    fn publish(&self, event: ItemEvent) -> Result<(), Box<dyn Error + Send + Sync>>;
}

/// 记录所有事件（测试与调试用）
#[derive(Debug, Default)]
pub struct RecordingEventPublisher {
    events: Mutex<Vec<ItemEvent>>,
}

impl RecordingEventPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ItemEvent> {
        match self.events.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl ItemEventPublisher for RecordingEventPublisher {
    fn publish(&self, event: ItemEvent) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.events
            .lock()
            .map_err(|e| format!("锁获取失败: {}", e))?
            .push(event);
        Ok(())
    }
}

/// 可选的事件发布者包装
///
/// 简化 Option<Arc<dyn ItemEventPublisher>> 的使用
#[derive(Clone, Default)]
pub struct OptionalEventPublisher {
    inner: Option<Arc<dyn ItemEventPublisher>>,
}

impl OptionalEventPublisher {
    pub fn with_publisher(publisher: Arc<dyn ItemEventPublisher>) -> Self {
        Self {
            inner: Some(publisher),
        }
    }

    pub fn none() -> Self {
        Self { inner: None }
    }

    /// 发布事件；失败只记录警告
    pub fn publish(&self, event: ItemEvent) {
        if let Some(publisher) = &self.inner {
            let event_type = event.event_type;
            let item_id = event.item_id.clone();
            if let Err(e) = publisher.publish(event) {
                tracing::warn!(
                    "事件发布失败: item_id={}, event_type={}, error={}",
                    item_id,
                    event_type.as_str(),
                    e
                );
            }
        }
    }
}

impl std::fmt::Debug for OptionalEventPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OptionalEventPublisher")
            .field("enabled", &self.inner.is_some())
            .finish()
    }
}

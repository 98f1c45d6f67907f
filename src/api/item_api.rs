// ==========================================
// 保质期追踪 - 条目 API
// ==========================================
// 职责: 用户操作入口（新增、开封、已用完、列表、汇总）
// 红线: 每次只处理一个操作；所有"今天"来自同一个 Clock
// 红线: 列表与汇总前先按当前日期重算派生天数
// ==========================================

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::api::entry_form::EntryForm;
use crate::api::error::{ApiError, ApiResult};
use crate::config::ConfigManager;
use crate::domain::item::{ItemDraft, TrackedItem};
use crate::engine::clock::Clock;
use crate::engine::events::{ItemEvent, ItemEventPublisher, ItemEventType, OptionalEventPublisher};
use crate::engine::opening::{OpenOutcome, OpeningEngine};
use crate::engine::summary::{sort_for_display, ExpirySummary};
use crate::repository::ItemStore;

/// 开封操作结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OpenResult {
    /// 已开封；item 为更新后的条目
    Opened {
        item: TrackedItem,
        previous_expiry: NaiveDate,
    },
    /// 天数输入非法，未做任何修改
    Ignored,
}

// ==========================================
// ItemApi - 条目 API
// ==========================================
pub struct ItemApi {
    store: ItemStore,
    clock: Arc<dyn Clock>,
    opening_engine: OpeningEngine,
    publisher: OptionalEventPublisher,
    config: ConfigManager,
}

impl ItemApi {
    /// 创建新的ItemApi实例
    ///
    /// # 参数
    /// - clock: "今天"的来源
    /// - config: 配置管理器
    pub fn new(clock: Arc<dyn Clock>, config: ConfigManager) -> Self {
        Self {
            store: ItemStore::new(),
            clock,
            opening_engine: OpeningEngine::new(),
            publisher: OptionalEventPublisher::none(),
            config,
        }
    }

    pub fn with_publisher(mut self, publisher: Arc<dyn ItemEventPublisher>) -> Self {
        self.publisher = OptionalEventPublisher::with_publisher(publisher);
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn config(&self) -> &ConfigManager {
        &self.config
    }

    /// 新表单（带配置默认值）
    pub fn new_form(&self) -> EntryForm {
        EntryForm::with_defaults(&self.config)
    }

    // ==========================================
    // 写操作
    // ==========================================

    /// 从录入表单新增条目
    ///
    /// # 返回
    /// - Ok(TrackedItem): 新条目
    /// - Err(ValidationError/InvalidInput): 表单校验失败，集合不变
    pub fn add_from_form(&mut self, form: &EntryForm) -> ApiResult<TrackedItem> {
        let draft = form.validate()?;
        self.add_draft(draft)
    }

    /// 以草稿新增条目
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub fn add_draft(&mut self, mut draft: ItemDraft) -> ApiResult<TrackedItem> {
        if draft.category.trim().is_empty() {
            draft.category = self.config.default_category();
        }

        let today = self.today();
        let item = TrackedItem::new(Uuid::now_v7().to_string(), draft, today)
            .map_err(|e| ApiError::ValidationError(e.to_string()))?;

        info!(
            item_id = %item.id(),
            expiry_date = %item.expiry_date(),
            days_until_expiry = item.days_until_expiry(),
            "新增条目"
        );
        self.store.add(item.clone());
        self.publisher
            .publish(ItemEvent::new(item.id(), ItemEventType::Added, today));
        Ok(item)
    }

    /// 标记开封
    ///
    /// # 参数
    /// - id: 条目 id
    /// - use_within_input: 用户输入的"开封后 N 天内用完"
    ///
    /// # 返回
    /// - Ok(Opened): 转换成功
    /// - Ok(Ignored): 天数输入非法，静默忽略
    /// - Err(AlreadyOpened): 已开封，带回原开封日期
    /// - Err(NotFound): id 不存在
    #[instrument(skip(self))]
    pub fn open_item(&mut self, id: &str, use_within_input: &str) -> ApiResult<OpenResult> {
        let mut item = self
            .store
            .find_by_id(id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(id.to_string()))?;

        let today = self.today();
        match self.opening_engine.open(&mut item, use_within_input, today) {
            OpenOutcome::Opened {
                previous_expiry, ..
            } => {
                self.store.replace(item.clone())?;
                self.publisher
                    .publish(ItemEvent::new(id, ItemEventType::Opened, today));
                Ok(OpenResult::Opened {
                    item,
                    previous_expiry,
                })
            }
            OpenOutcome::AlreadyOpened { opened_date } => Err(ApiError::AlreadyOpened {
                item_id: item.id().to_string(),
                item_name: item.name().to_string(),
                opened_date,
            }),
            OpenOutcome::Ignored { input } => {
                debug!(%input, "开封天数非法，未修改");
                Ok(OpenResult::Ignored)
            }
        }
    }

    /// 标记已用完（移除）
    #[instrument(skip(self))]
    pub fn mark_used(&mut self, id: &str) -> ApiResult<TrackedItem> {
        let removed = self.store.remove(id)?;
        info!(item_id = %id, name = %removed.name(), "条目已用完");
        self.publisher
            .publish(ItemEvent::new(id, ItemEventType::Removed, self.today()));
        Ok(removed)
    }

    // ==========================================
    // 查询接口
    // ==========================================

    /// 按当前日期重算派生天数
    pub fn refresh(&mut self) {
        let today = self.today();
        self.store.refresh(today);
    }

    /// 按 id 查询
    pub fn get(&mut self, id: &str) -> ApiResult<TrackedItem> {
        self.refresh();
        self.store
            .find_by_id(id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(id.to_string()))
    }

    /// 按完整 id、唯一前缀或唯一后缀查找条目 id
    ///
    /// # 返回
    /// - Err(NotFound): 没有匹配
    /// - Err(AmbiguousId): 匹配到多个条目
    pub fn resolve_id(&self, input: &str) -> ApiResult<String> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ApiError::NotFound(input.to_string()));
        }
        if let Some(item) = self.store.find_by_id(input) {
            return Ok(item.id().to_string());
        }

        let matches: Vec<&str> = self
            .store
            .list()
            .iter()
            .map(|item| item.id())
            .filter(|id| id.starts_with(input) || id.ends_with(input))
            .collect();

        match matches.as_slice() {
            [] => Err(ApiError::NotFound(input.to_string())),
            [id] => Ok(id.to_string()),
            _ => Err(ApiError::AmbiguousId {
                input: input.to_string(),
                matches: matches.len(),
            }),
        }
    }

    /// 展示列表（按剩余天数升序）
    pub fn list_for_display(&mut self) -> Vec<TrackedItem> {
        self.refresh();
        sort_for_display(self.store.list())
            .into_iter()
            .cloned()
            .collect()
    }

    /// 汇总计数
    pub fn summary(&mut self) -> ExpirySummary {
        self.refresh();
        ExpirySummary::from_items(self.store.list())
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

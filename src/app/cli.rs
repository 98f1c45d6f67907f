// ==========================================
// 保质期追踪 - 命令行前端
// ==========================================
// 职责: 解析一行命令 → 调用 ItemApi → 返回本地化文本
// 红线: 一次只执行一条命令（同一时刻至多一个写操作）
// 红线: API 错误统一以 user_message 输出（已本地化）
// ==========================================

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::api::{ApiError, ApiResult, EntryForm, OpenResult};
use crate::app::state::AppState;
use crate::capture::{BarcodeCapture, ScanOutcome, ScanSession, SimulatedCapture};
use crate::domain::item::TrackedItem;
use crate::engine::expiry::has_date_shape;
use crate::engine::summary::{count_by_status, expiry_label, expiry_message, opened_detail};
use crate::i18n::{set_locale, t, t_with_args, SUPPORTED_LOCALES};

/// 单条命令的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliReply {
    Output(String),
    Quit,
}

// ==========================================
// Cli - 命令解释器
// ==========================================
pub struct Cli {
    state: AppState,
    /// 扫码得到、尚未被 add 使用的条码
    pending_form: EntryForm,
    capture: Option<Arc<dyn BarcodeCapture>>,
}

impl Cli {
    pub fn new(state: AppState) -> Self {
        let pending_form = state.item_api.new_form();
        Self {
            state,
            pending_form,
            capture: None,
        }
    }

    /// 使用指定的扫码能力（否则每次 scan 使用模拟相机）
    pub fn with_capture(mut self, capture: Arc<dyn BarcodeCapture>) -> Self {
        self.capture = Some(capture);
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    /// 执行一行命令
    pub async fn handle_line(&mut self, line: &str) -> CliReply {
        let tokens = split_args(line);
        let command = match tokens.first() {
            Some(c) => c.to_lowercase(),
            None => return CliReply::Output(String::new()),
        };
        let args: Vec<&str> = tokens[1..].iter().map(String::as_str).collect();

        let result = match command.as_str() {
            "quit" | "exit" | "q" => return CliReply::Quit,
            "help" | "?" => Ok(t("cli.help").trim_end().to_string()),
            "add" => self.add(&args),
            "scan" => self.scan(&args).await,
            "list" | "ls" => self.list(&args),
            "summary" => Ok(self.summary()),
            "show" => self.show(&args),
            "open" => self.open(&args),
            "used" | "rm" => self.used(&args),
            "locale" => Ok(self.locale(&args)),
            "config" => self
                .state
                .config
                .get_config_snapshot()
                .map_err(|e| ApiError::InternalError(e.to_string())),
            other => Ok(t_with_args("cli.unknown_command", &[("command", other)])),
        };

        CliReply::Output(result.unwrap_or_else(|e| {
            tracing::debug!(code = e.code(), "命令执行失败: {}", e);
            e.user_message()
        }))
    }

    // ==========================================
    // 命令实现
    // ==========================================

    /// add <名称...> <YYYY-MM-DD> [分类] [位置] [条码]
    ///
    /// 名称可含空格：第一个日期形状的参数之前的词组成名称；
    /// 名称省略时使用扫码预填的名称
    fn add(&mut self, args: &[&str]) -> ApiResult<String> {
        let Some((name_words, expiry, rest)) = split_add_args(args) else {
            return Ok(usage("add <name...> <YYYY-MM-DD> [category] [location] [barcode]"));
        };

        let mut form = self.pending_form.clone();
        if !name_words.is_empty() {
            form.name = name_words.join(" ");
        }
        form.expiry_date = expiry.to_string();
        if let Some(category) = rest.first() {
            form.category = category.to_string();
        }
        if let Some(location) = rest.get(1) {
            form.set_location_text(location)?;
        }
        if let Some(barcode) = rest.get(2) {
            form.barcode = barcode.to_string();
        }

        let item = self.state.item_api.add_from_form(&form)?;
        self.pending_form.reset();

        Ok(format!(
            "{} [{}]\n{}",
            t_with_args("form.item_added", &[("name", item.name())]),
            item.id(),
            expiry_message(&item)
        ))
    }

    async fn scan(&mut self, args: &[&str]) -> ApiResult<String> {
        let simulated = self.capture.is_none() || !args.is_empty();
        let capture: Arc<dyn BarcodeCapture> = match (&self.capture, args.first()) {
            (_, Some(code)) => Arc::new(SimulatedCapture::new().with_code(code)),
            (Some(capture), None) => capture.clone(),
            (None, None) => Arc::new(SimulatedCapture::new()),
        };

        let session = ScanSession::new();
        let outcome = self
            .pending_form
            .scan_with(&session, capture.as_ref())
            .await?;

        let text = match outcome {
            ScanOutcome::Scanned(result) => {
                if simulated {
                    self.pending_form.prefill_simulated_product();
                }
                t_with_args("capture.scanned", &[("value", &result.value)])
            }
            ScanOutcome::Cancelled => t("capture.cancelled"),
        };
        Ok(match args.first() {
            Some(_) => text,
            None => format!("{}\n{}", t("capture.point_camera"), text),
        })
    }

    fn list(&mut self, args: &[&str]) -> ApiResult<String> {
        let items = self.state.item_api.list_for_display();

        if args.contains(&"--json") {
            return serde_json::to_string_pretty(&items)
                .map_err(|e| ApiError::InternalError(e.to_string()));
        }

        if items.is_empty() {
            return Ok(t("summary.empty"));
        }

        let warning_days = self.state.config.warning_days();
        let ids = short_ids(&items);
        let lines: Vec<String> = items
            .iter()
            .zip(&ids)
            .map(|(item, id)| {
                format!(
                    "{:<8} {:<20} {:<8} {:<10} {:<9} {}",
                    id,
                    item.name(),
                    item.location().label(),
                    item.expiry_date(),
                    item.status(warning_days).to_string(),
                    expiry_label(item.days_until_expiry())
                )
            })
            .collect();
        Ok(lines.join("\n"))
    }

    fn summary(&mut self) -> String {
        let summary = self.state.item_api.summary();
        if summary.total == 0 {
            return t("summary.empty");
        }

        let warning_days = self.state.config.warning_days();
        let items = self.state.item_api.list_for_display();
        let breakdown: Vec<String> = count_by_status(&items, warning_days)
            .into_iter()
            .map(|(status, count)| format!("{} {}", status, count))
            .collect();
        format!("{}\n{}", summary.message(), breakdown.join(" | "))
    }

    fn show(&mut self, args: &[&str]) -> ApiResult<String> {
        let Some(prefix) = args.first() else {
            return Ok(usage("show <id>"));
        };
        let id = self.resolve_id(prefix)?;
        let item = self.state.item_api.get(&id)?;
        Ok(describe(&item))
    }

    fn open(&mut self, args: &[&str]) -> ApiResult<String> {
        let Some(prefix) = args.first() else {
            return Ok(usage("open <id> [days]"));
        };
        let id = self.resolve_id(prefix)?;
        let days = match args.get(1) {
            Some(d) => d.to_string(),
            None => self.state.config.default_use_within_days().to_string(),
        };

        match self.state.item_api.open_item(&id, &days)? {
            OpenResult::Opened { item, .. } => Ok(format!(
                "{}\n{}",
                t_with_args(
                    "item.opened",
                    &[("name", item.name()), ("date", &item.expiry_date().to_string())]
                ),
                expiry_message(&item)
            )),
            OpenResult::Ignored => Ok(t("item.open_ignored")),
        }
    }

    fn used(&mut self, args: &[&str]) -> ApiResult<String> {
        let Some(prefix) = args.first() else {
            return Ok(usage("used <id>"));
        };
        let id = self.resolve_id(prefix)?;
        let removed = self.state.item_api.mark_used(&id)?;
        Ok(t_with_args("item.used", &[("name", removed.name())]))
    }

    fn locale(&self, args: &[&str]) -> String {
        match args.first() {
            Some(code) if set_locale(code) => t("common.success"),
            _ => usage(&format!("locale <{}>", SUPPORTED_LOCALES.join("|"))),
        }
    }

    fn resolve_id(&self, input: &str) -> ApiResult<String> {
        self.state.item_api.resolve_id(input)
    }
}

// ==========================================
// 输出格式
// ==========================================

fn usage(text: &str) -> String {
    t_with_args("cli.usage", &[("usage", text)])
}

/// 列表中显示的短 id 最小长度
const SHORT_ID_MIN_LEN: usize = 8;

/// 列表中显示的短 id: 取 id 末尾（v7 的随机段），至少 8 位，
/// 加长到在当前列表中可被 resolve_id 唯一识别为止
fn short_ids(items: &[TrackedItem]) -> Vec<&str> {
    items
        .iter()
        .map(|item| {
            let id = item.id();
            (SHORT_ID_MIN_LEN..id.len())
                .filter_map(|len| id.get(id.len() - len..))
                .find(|suffix| {
                    items.iter().all(|other| {
                        other.id() == id
                            || !(other.id().starts_with(suffix) || other.id().ends_with(suffix))
                    })
                })
                .unwrap_or(id)
        })
        .collect()
}

/// 按空白切分，双引号内的空白保留
fn split_args(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    tokens.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }
    if has_token {
        tokens.push(current);
    }
    tokens
}

/// 拆分 add 参数为 (名称词组, 到期日, 其余参数)
///
/// 到期日取第一个日期形状的参数；没有时取第一个含数字的参数，
/// 再没有则取第二个参数（交给表单校验报错）
fn split_add_args<'a>(args: &'a [&'a str]) -> Option<(&'a [&'a str], &'a str, &'a [&'a str])> {
    let at = args
        .iter()
        .position(|a| has_date_shape(a))
        .or_else(|| {
            args.iter()
                .skip(1)
                .position(|a| a.chars().any(|c| c.is_ascii_digit()))
                .map(|i| i + 1)
        })
        .or(if args.len() >= 2 { Some(1) } else { None })?;

    Some((&args[..at], args[at], &args[at + 1..]))
}

fn describe(item: &TrackedItem) -> String {
    let mut lines = vec![
        format!("{} ({})", item.name(), item.id()),
        format!("  {} / {}", item.category(), item.location().label()),
        format!("  {}", expiry_message(item)),
    ];
    if let Some(barcode) = item.barcode() {
        lines.push(format!("  # {}", barcode));
    }
    if let Some(detail) = opened_detail(item) {
        lines.push(format!("  {}", detail));
    }
    lines.join("\n")
}

// ==========================================
// 交互循环
// ==========================================

/// 从标准输入逐行读取命令，直到 quit 或输入结束
pub async fn run(state: AppState) -> anyhow::Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    run_with(Cli::new(state), stdin, stdout).await
}

/// 指定输入输出运行（测试用内存缓冲）
pub async fn run_with<R, W>(mut cli: Cli, input: R, mut output: W) -> anyhow::Result<()>
where
    R: AsyncBufReadExt + Unpin,
    W: AsyncWrite + Unpin,
{
    output
        .write_all(format!("{}\n{}\n", t("common.app_title"), cli.summary()).as_bytes())
        .await?;

    let mut lines = input.lines();
    loop {
        output.write_all(b"> ").await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match cli.handle_line(&line).await {
            CliReply::Output(text) if text.is_empty() => {}
            CliReply::Output(text) => {
                output.write_all(text.as_bytes()).await?;
                output.write_all(b"\n").await?;
            }
            CliReply::Quit => break,
        }
    }

    output
        .write_all(format!("{}\n", t("cli.bye")).as_bytes())
        .await?;
    output.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_args_keeps_quoted_spaces() {
        assert_eq!(
            split_args(r#"add "Greek Yogurt"  2024-07-05 """#),
            vec!["add", "Greek Yogurt", "2024-07-05", ""]
        );
        assert!(split_args("   ").is_empty());
    }

    #[test]
    fn test_split_add_args() {
        let args = ["Greek", "Yogurt", "2024-07-05", "Dairy"];
        let (name, expiry, rest) = split_add_args(&args).unwrap();
        assert_eq!(name, ["Greek", "Yogurt"]);
        assert_eq!(expiry, "2024-07-05");
        assert_eq!(rest, ["Dairy"]);

        let args = ["Greek", "Yogurt", "05/07/2024"];
        let (name, expiry, _) = split_add_args(&args).unwrap();
        assert_eq!(name, ["Greek", "Yogurt"]);
        assert_eq!(expiry, "05/07/2024");

        let args = ["2024-07-05"];
        let (name, expiry, _) = split_add_args(&args).unwrap();
        assert!(name.is_empty());
        assert_eq!(expiry, "2024-07-05");

        assert!(split_add_args(&["Milk"]).is_none());
    }
}

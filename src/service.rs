// src/service.rs

//! 日志服务：写入、分页查询与清空。
//!
//! 所有对存储的访问都在一个专用的后台线程上按提交顺序执行。
//! 写入与清空是"发出即忘"的：调用方拿不到任何成功或失败的信号，
//! 失败只会出现在诊断日志和可选的失败回调里。

use crate::db::LOGS_TABLE;
use crate::error::{LogbookError, Result};
use crate::models::{Level, LogEntry, LogPage};
use crate::store::{RowStore, Value};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};
use tokio::sync::{mpsc, oneshot};

/// 发出即忘的操作种类，用于失败回调
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    AddLog,
    ClearLogs,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::AddLog => f.write_str("add_log"),
            Operation::ClearLogs => f.write_str("clear_logs"),
        }
    }
}

type FailureHook = Box<dyn Fn(Operation, &LogbookError) + Send>;

enum Command {
    Insert {
        level: Level,
        content: String,
    },
    Clear,
    Fetch {
        page: u32,
        page_size: u32,
        level: Option<String>,
        reply: oneshot::Sender<Result<LogPage>>,
    },
}

/// 日志服务句柄
///
/// 丢弃句柄会关闭队列，后台线程处理完剩余命令后退出；
/// 需要确认所有写入已落盘时调用 [`LogService::shutdown`]。
pub struct LogService {
    tx: mpsc::UnboundedSender<Command>,
    worker: JoinHandle<()>,
}

impl fmt::Debug for LogService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogService")
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}

impl LogService {
    /// 启动后台线程，接管存储
    pub fn start<S: RowStore + 'static>(store: S) -> Result<Self> {
        Self::spawn(Box::new(store), None)
    }

    /// 同 [`LogService::start`]，额外注册一个失败回调：
    /// 写入或清空失败时在后台线程上调用
    pub fn with_failure_hook<S, F>(store: S, hook: F) -> Result<Self>
    where
        S: RowStore + 'static,
        F: Fn(Operation, &LogbookError) + Send + 'static,
    {
        Self::spawn(Box::new(store), Some(Box::new(hook)))
    }

    fn spawn(store: Box<dyn RowStore>, hook: Option<FailureHook>) -> Result<Self> {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = thread::Builder::new()
            .name("logbook-store".to_string())
            .spawn(move || run_worker(store, rx, hook))?;
        Ok(LogService { tx, worker })
    }

    /// 写入一条日志（发出即忘）
    pub fn add_log(&self, content: impl Into<String>, level: Level) {
        self.submit(
            Operation::AddLog,
            Command::Insert {
                level,
                content: content.into(),
            },
        );
    }

    /// 清空全部日志（发出即忘）
    pub fn clear_logs(&self) {
        self.submit(Operation::ClearLogs, Command::Clear);
    }

    fn submit(&self, op: Operation, command: Command) {
        if self.tx.send(command).is_err() {
            log::error!("{} dropped: log service has shut down", op);
        }
    }

    /// 分页查询日志，按创建时间倒序
    ///
    /// `page` 从 1 开始；`level` 为 `None` 或空字符串时不过滤，
    /// 否则与存储的级别逐字比较。
    pub async fn fetch_logs(
        &self,
        page: u32,
        page_size: u32,
        level: Option<&str>,
    ) -> Result<LogPage> {
        check_window(page, page_size)?;

        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::Fetch {
                page,
                page_size,
                level: level.map(str::to_string),
                reply,
            })
            .map_err(|_| LogbookError::ServiceClosed)?;
        rx.await.map_err(|_| LogbookError::ServiceClosed)?
    }

    /// 关闭队列，等待后台线程处理完所有已提交的命令
    pub fn shutdown(self) {
        let LogService { tx, worker } = self;
        drop(tx);
        if worker.join().is_err() {
            log::error!("log service worker panicked");
        }
    }
}

fn run_worker(
    mut store: Box<dyn RowStore>,
    mut rx: mpsc::UnboundedReceiver<Command>,
    hook: Option<FailureHook>,
) {
    let report = |op: Operation, err: &LogbookError| {
        log::error!("{} failed: {}", op, err);
        if let Some(hook) = &hook {
            // 回调 panic 不能拖垮后台线程
            if panic::catch_unwind(AssertUnwindSafe(|| hook(op, err))).is_err() {
                log::error!("failure hook panicked while reporting {}", op);
            }
        }
    };

    while let Some(command) = rx.blocking_recv() {
        match command {
            Command::Insert { level, content } => {
                let values = [Value::Text(level.as_str().to_string()), Value::Text(content)];
                if let Err(e) = store.insert(LOGS_TABLE, &["level", "content"], &values) {
                    report(Operation::AddLog, &e);
                }
            }
            Command::Clear => match store.delete_data(LOGS_TABLE, "", &[]) {
                Ok(count) => log::debug!("cleared {} log entries", count),
                Err(e) => report(Operation::ClearLogs, &e),
            },
            Command::Fetch {
                page,
                page_size,
                level,
                reply,
            } => {
                let result = query_page(store.as_mut(), page, page_size, level.as_deref());
                if let Err(e) = &result {
                    log::error!("fetch_logs failed: {}", e);
                }
                // 调用方可能已放弃等待
                let _ = reply.send(result);
            }
        }
    }
    log::debug!("log service worker stopped");
}

fn check_window(page: u32, page_size: u32) -> Result<()> {
    if page == 0 || page_size == 0 {
        return Err(LogbookError::InvalidInput(format!(
            "page and page size must be at least 1 (got page {}, page size {})",
            page, page_size
        )));
    }
    Ok(())
}

/// 先查总数，再查当前页。总数查询失败时不会发出分页查询。
pub fn query_page(
    store: &mut dyn RowStore,
    page: u32,
    page_size: u32,
    level: Option<&str>,
) -> Result<LogPage> {
    check_window(page, page_size)?;

    let (where_clause, mut args) = match level.filter(|l| !l.is_empty()) {
        Some(l) => {
            if !Level::is_known(l) {
                log::warn!("filtering logs by unknown level {:?}; no entries will match", l);
            }
            (" WHERE level = ?", vec![Value::Text(l.to_string())])
        }
        None => ("", Vec::new()),
    };

    let count_sql = format!("SELECT COUNT(*) AS total FROM {}{}", LOGS_TABLE, where_clause);
    let rows = store.select_custom(&count_sql, &args)?;
    let total = match rows.first().and_then(|r| r.get("total")) {
        Some(Value::Integer(n)) => u64::try_from(*n).unwrap_or(0),
        _ => 0,
    };

    // 超出 i64 的偏移量一定越过末尾，截断后结果同样为空页
    let offset = i64::try_from(u64::from(page - 1) * u64::from(page_size)).unwrap_or(i64::MAX);
    let page_sql = format!(
        "SELECT * FROM {}{} ORDER BY createTime DESC, id DESC LIMIT ? OFFSET ?",
        LOGS_TABLE, where_clause
    );
    args.push(Value::Integer(i64::from(page_size)));
    args.push(Value::Integer(offset));

    let data = store
        .select_custom(&page_sql, &args)?
        .iter()
        .map(LogEntry::from_record)
        .collect::<Result<Vec<_>>>()?;

    Ok(LogPage { total, data })
}

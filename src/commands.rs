// src/commands.rs

use chrono::{DateTime, Local, NaiveDateTime, Utc};
use logbook::{Level, LogEntry, LogPage, LogService, LogbookError, Result, SqliteStore};
use std::env;
use std::io::{self, Read, Write};
use std::path::Path;
use std::process::Command;

/// 处理 'init' 命令
pub fn handle_init(db_path: &Path) -> Result<()> {
    SqliteStore::open(db_path)?;
    println!("✓ Database ready at: {}", db_path.display());
    Ok(())
}

/// 从编辑器读取日志内容
fn read_from_editor() -> Result<String> {
    let temp_file = tempfile::NamedTempFile::new()?;
    let editor = env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());
    let status = Command::new(&editor).arg(temp_file.path()).status()?;

    if !status.success() {
        return Err(LogbookError::EditorError);
    }
    let mut buf = String::new();
    temp_file.reopen()?.read_to_string(&mut buf)?;
    Ok(buf)
}

/// 处理 'log' 命令
pub fn handle_log(db_path: &Path, message: Option<String>, level: &str) -> Result<()> {
    let level: Level = level.parse()?;
    let content = match message {
        Some(msg) => msg,
        None => read_from_editor()?,
    };

    if content.trim().is_empty() {
        eprintln!("Empty log, skipped.");
        return Ok(());
    }

    let service = LogService::start(SqliteStore::open(db_path)?)?;
    service.add_log(content, level);
    // 写入是发出即忘的，退出前等待队列清空
    service.shutdown();

    println!("✓ Log queued.");
    Ok(())
}

/// 格式化数据库中的 UTC 时间为本地时间；无法解析时原样返回
pub fn format_create_time(raw: &str) -> String {
    match NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        Ok(naive) => DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc)
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        Err(_) => raw.to_string(),
    }
}

fn print_entry(entry: &LogEntry) {
    println!(
        "[{}] {} {:<5}",
        entry.id,
        format_create_time(&entry.create_time),
        entry.level
    );
    println!("{}", entry.content.trim_end());
    println!("{}", "─".repeat(40));
}

/// 打开数据库并查询一页；`level` 原样作为精确匹配条件
pub async fn fetch_page(
    db_path: &Path,
    page: u32,
    page_size: u32,
    level: Option<&str>,
) -> Result<LogPage> {
    let service = LogService::start(SqliteStore::open(db_path)?)?;
    let result = service.fetch_logs(page, page_size, level).await;
    service.shutdown();
    result
}

/// 处理 'get' 命令
pub async fn handle_get(
    db_path: &Path,
    page: u32,
    page_size: u32,
    level: Option<String>,
) -> Result<()> {
    let logs = fetch_page(db_path, page, page_size, level.as_deref()).await?;

    if logs.data.is_empty() {
        println!("No logs found.");
    }
    for entry in &logs.data {
        print_entry(entry);
    }
    println!(
        "Page {}/{}, total {}",
        page,
        logs.page_count(page_size),
        logs.total
    );
    Ok(())
}

/// 处理 'clear' 命令
pub fn handle_clear(db_path: &Path, yes: bool) -> Result<()> {
    if !yes {
        print!("Permanently delete all log entries? (y/N): ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let service = LogService::start(SqliteStore::open(db_path)?)?;
    service.clear_logs();
    service.shutdown();

    println!("✓ Logs cleared.");
    Ok(())
}

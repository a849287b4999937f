// src/models.rs

use crate::error::{LogbookError, Result};
use crate::store::{Record, Value};
use std::fmt;
use std::str::FromStr;

/// 日志级别（封闭枚举，缺省为 INFO）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Level {
    #[default]
    Info,
    Warn,
    Error,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Info, Level::Warn, Level::Error];

    /// 数据库中存储的字符串形式
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }

    /// 判断字符串是否恰好是某个已知级别（区分大小写，与存储值逐字比较）
    pub fn is_known(s: &str) -> bool {
        Self::ALL.iter().any(|l| l.as_str() == s)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = LogbookError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INFO" => Ok(Level::Info),
            "WARN" | "WARNING" => Ok(Level::Warn),
            "ERROR" => Ok(Level::Error),
            _ => Err(LogbookError::InvalidInput(format!(
                "Unknown level '{}', expected one of INFO, WARN, ERROR",
                s
            ))),
        }
    }
}

/// 一条已写入的日志
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub id: i64,
    /// 原样保存存储层中的级别字符串
    pub level: String,
    pub content: String,
    pub create_time: String, // 由数据库生成，格式 YYYY-MM-DD HH:MM:SS.sss (UTC)
}

impl LogEntry {
    /// 从 `SELECT * FROM logs` 的一行记录构造
    pub fn from_record(record: &Record) -> Result<Self> {
        Ok(LogEntry {
            id: integer_field(record, "id")?,
            level: text_field(record, "level")?,
            content: text_field(record, "content")?,
            create_time: text_field(record, "createTime")?,
        })
    }
}

fn integer_field(record: &Record, name: &str) -> Result<i64> {
    match record.get(name) {
        Some(Value::Integer(i)) => Ok(*i),
        other => Err(LogbookError::InvalidInput(format!(
            "Column '{}' is not an integer: {:?}",
            name, other
        ))),
    }
}

fn text_field(record: &Record, name: &str) -> Result<String> {
    match record.get(name) {
        Some(Value::Text(s)) => Ok(s.clone()),
        other => Err(LogbookError::InvalidInput(format!(
            "Column '{}' is not text: {:?}",
            name, other
        ))),
    }
}

/// 分页查询结果：总数与当前页数据
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogPage {
    pub total: u64,
    pub data: Vec<LogEntry>,
}

impl LogPage {
    /// 按给定页大小计算总页数（至少为 1）
    pub fn page_count(&self, page_size: u32) -> u64 {
        let size = u64::from(page_size.max(1));
        self.total.div_ceil(size).max(1)
    }
}

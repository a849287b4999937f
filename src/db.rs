// src/db.rs

use crate::error::{LogbookError, Result};
use crate::store::{check_identifier, Record, RowStore, Value};
use rusqlite::{params_from_iter, Connection};
use std::path::{Path, PathBuf};

/// 日志表名
pub const LOGS_TABLE: &str = "logs";

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS logs (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        level TEXT NOT NULL DEFAULT 'INFO',
        content TEXT NOT NULL,
        createTime TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now'))
    );
    CREATE INDEX IF NOT EXISTS idx_logs_level_time ON logs (level, createTime);
";

/// 获取数据库文件的标准路径 (~/.config/logbook/logbook.db)
pub fn default_db_path() -> Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or(LogbookError::HomeDirNotFound)?;
    Ok(home_dir.join(".config/logbook/logbook.db"))
}

/// 基于 SQLite 的行存储
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// 打开（必要时创建）数据库文件，并确保表结构存在
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        log::debug!("opened log database at {}", path.display());
        Self::with_connection(conn)
    }

    /// 内存数据库，主要用于测试
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(SqliteStore { conn })
    }
}

impl RowStore for SqliteStore {
    fn insert(&mut self, table: &str, columns: &[&str], values: &[Value]) -> Result<()> {
        if columns.len() != values.len() {
            return Err(LogbookError::InvalidInput(format!(
                "{} columns but {} values",
                columns.len(),
                values.len()
            )));
        }
        let table = check_identifier(table)?;
        let names = columns
            .iter()
            .map(|c| check_identifier(c))
            .collect::<Result<Vec<_>>>()?;
        let placeholders = vec!["?"; values.len()].join(",");
        let query = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table,
            names.join(","),
            placeholders
        );

        self.conn.execute(&query, params_from_iter(values))?;
        Ok(())
    }

    fn select_custom(&mut self, sql: &str, params: &[Value]) -> Result<Vec<Record>> {
        let mut stmt = self.conn.prepare(sql)?;
        let names: Vec<String> = stmt.column_names().iter().map(|s| s.to_string()).collect();

        let rows = stmt
            .query_map(params_from_iter(params), |row| {
                let mut record = Record::with_capacity(names.len());
                for (i, name) in names.iter().enumerate() {
                    record.insert(name.clone(), row.get::<_, Value>(i)?);
                }
                Ok(record)
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn delete_data(
        &mut self,
        table: &str,
        where_clause: &str,
        where_args: &[Value],
    ) -> Result<usize> {
        let table = check_identifier(table)?;
        let query = if where_clause.trim().is_empty() {
            format!("DELETE FROM {}", table)
        } else {
            format!("DELETE FROM {} WHERE {}", table, where_clause)
        };

        let count = self.conn.execute(&query, params_from_iter(where_args))?;
        Ok(count)
    }
}

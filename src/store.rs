// src/store.rs

use crate::error::{LogbookError, Result};
use std::collections::HashMap;

pub use rusqlite::types::Value;

/// 查询结果中的一行：列名 -> 值
pub type Record = HashMap<String, Value>;

/// 行存储：对命名表的插入、查询与删除
///
/// 日志服务只通过这三个操作访问存储，存储层自己负责写入的串行化。
pub trait RowStore: Send {
    /// 追加一行
    fn insert(&mut self, table: &str, columns: &[&str], values: &[Value]) -> Result<()>;

    /// 执行参数化查询，返回全部结果行
    fn select_custom(&mut self, sql: &str, params: &[Value]) -> Result<Vec<Record>>;

    /// 删除满足条件的行；条件为空时删除全部行。返回删除的行数
    fn delete_data(&mut self, table: &str, where_clause: &str, where_args: &[Value])
        -> Result<usize>;
}

/// 校验表名/列名只包含普通标识符字符，避免拼接进 SQL 时被注入
pub fn check_identifier(name: &str) -> Result<&str> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    if valid {
        Ok(name)
    } else {
        Err(LogbookError::InvalidIdentifier(name.to_string()))
    }
}

// src/lib.rs

//! logbook: 保存在本地 SQLite 数据库中的应用日志，支持按级别过滤和分页查询。

pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod service;
pub mod store;

pub use db::SqliteStore;
pub use error::{LogbookError, Result};
pub use models::{Level, LogEntry, LogPage};
pub use service::{LogService, Operation};
pub use store::{Record, RowStore, Value};

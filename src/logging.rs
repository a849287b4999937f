// src/logging.rs

use crate::config::LoggingConfig;
use log::LevelFilter;

/// 解析诊断日志级别，无法识别时退回 warn
pub fn parse_level_filter(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Warn,
    }
}

/// 初始化诊断日志（输出到 stderr）
///
/// `--verbose` / `--quiet` 优先于配置文件；RUST_LOG 仍然生效。
pub fn init_logging(config: &LoggingConfig, verbose: bool, quiet: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Error
    } else {
        parse_level_filter(&config.level)
    };

    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp_millis()
        .try_init();
}

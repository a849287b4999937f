// tests/failure_tests.rs
//
// Query sequencing and failure handling, using a scripted in-memory RowStore.

use logbook::service::query_page;
use logbook::{Level, LogService, LogbookError, Operation, Record, Result, RowStore, Value};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Script {
    calls: Vec<String>,
    fail_count: bool,
    fail_page: bool,
    fail_writes: bool,
    count_rows: Vec<Record>,
    page_rows: Vec<Record>,
}

#[derive(Clone, Default)]
struct MockStore(Arc<Mutex<Script>>);

fn storage_error() -> LogbookError {
    LogbookError::Sql(rusqlite::Error::InvalidQuery)
}

impl RowStore for MockStore {
    fn insert(&mut self, table: &str, columns: &[&str], _values: &[Value]) -> Result<()> {
        let mut s = self.0.lock().unwrap();
        s.calls.push(format!("insert {} {}", table, columns.join(",")));
        if s.fail_writes {
            return Err(storage_error());
        }
        Ok(())
    }

    fn select_custom(&mut self, sql: &str, params: &[Value]) -> Result<Vec<Record>> {
        let mut s = self.0.lock().unwrap();
        s.calls.push(format!("select {} {:?}", sql, params));
        if sql.contains("COUNT(*)") {
            if s.fail_count {
                return Err(storage_error());
            }
            Ok(s.count_rows.clone())
        } else {
            if s.fail_page {
                return Err(storage_error());
            }
            Ok(s.page_rows.clone())
        }
    }

    fn delete_data(&mut self, table: &str, where_clause: &str, _args: &[Value]) -> Result<usize> {
        let mut s = self.0.lock().unwrap();
        s.calls.push(format!("delete {} [{}]", table, where_clause));
        if s.fail_writes {
            return Err(storage_error());
        }
        Ok(0)
    }
}

fn row(id: i64, level: &str, content: &str) -> Record {
    let mut r = Record::new();
    r.insert("id".into(), Value::Integer(id));
    r.insert("level".into(), Value::Text(level.into()));
    r.insert("content".into(), Value::Text(content.into()));
    r.insert("createTime".into(), Value::Text("2024-01-01 00:00:00.000".into()));
    r
}

fn total_row(n: i64) -> Record {
    let mut r = Record::new();
    r.insert("total".into(), Value::Integer(n));
    r
}

#[test]
fn count_query_runs_before_page_query() {
    let mut store = MockStore::default();
    {
        let mut s = store.0.lock().unwrap();
        s.count_rows = vec![total_row(3)];
        s.page_rows = vec![row(2, "ERROR", "fail")];
    }

    let page = query_page(&mut store, 2, 1, None).unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].content, "fail");

    let calls = store.0.lock().unwrap().calls.clone();
    assert_eq!(calls.len(), 2);
    assert!(calls[0].contains("COUNT(*)"));
    assert!(calls[1].contains("ORDER BY createTime DESC, id DESC LIMIT ? OFFSET ?"));
    // LIMIT 1 OFFSET 1
    assert!(calls[1].ends_with("[Integer(1), Integer(1)]"));
}

#[test]
fn level_filter_is_a_bound_parameter_in_both_queries() {
    let mut store = MockStore::default();
    query_page(&mut store, 3, 10, Some("ERROR' OR '1'='1")).unwrap();

    let calls = store.0.lock().unwrap().calls.clone();
    for call in &calls {
        assert!(call.contains("WHERE level = ?"));
        assert!(call.contains("Text(\"ERROR' OR '1'='1\")"));
    }
    assert!(calls[1].ends_with("Integer(10), Integer(20)]"));
}

#[test]
fn empty_count_result_means_zero_total() {
    let mut store = MockStore::default();
    let page = query_page(&mut store, 1, 10, None).unwrap();
    assert_eq!(page.total, 0);
    assert!(page.data.is_empty());
}

#[test]
fn count_failure_skips_page_query() {
    let mut store = MockStore::default();
    store.0.lock().unwrap().fail_count = true;

    let err = query_page(&mut store, 1, 10, None).unwrap_err();
    assert!(matches!(err, LogbookError::Sql(_)));

    let calls = store.0.lock().unwrap().calls.clone();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].contains("COUNT(*)"));
}

#[tokio::test]
async fn fetch_logs_propagates_page_query_failure() {
    let store = MockStore::default();
    {
        let mut s = store.0.lock().unwrap();
        s.count_rows = vec![total_row(5)];
        s.fail_page = true;
    }

    let service = LogService::start(store.clone()).unwrap();
    let result = service.fetch_logs(1, 10, None).await;
    assert!(matches!(result, Err(LogbookError::Sql(_))));
    assert_eq!(store.0.lock().unwrap().calls.len(), 2);
}

#[tokio::test]
async fn fetch_logs_rejects_when_count_fails() {
    let store = MockStore::default();
    store.0.lock().unwrap().fail_count = true;

    let service = LogService::start(store.clone()).unwrap();
    assert!(service.fetch_logs(1, 10, Some("INFO")).await.is_err());
    assert_eq!(store.0.lock().unwrap().calls.len(), 1);
}

#[test]
fn write_failures_reach_the_hook_and_never_the_caller() {
    let store = MockStore::default();
    store.0.lock().unwrap().fail_writes = true;

    let failures = Arc::new(Mutex::new(Vec::new()));
    let sink = failures.clone();
    let service = LogService::with_failure_hook(store.clone(), move |op, err| {
        sink.lock().unwrap().push((op, err.to_string()));
    })
    .unwrap();

    // 两个调用都不返回任何结果，也不会 panic
    service.add_log("lost", Level::Error);
    service.clear_logs();
    service.shutdown();

    let failures = failures.lock().unwrap();
    assert_eq!(failures.len(), 2);
    assert_eq!(failures[0].0, Operation::AddLog);
    assert_eq!(failures[1].0, Operation::ClearLogs);

    let calls = store.0.lock().unwrap().calls.clone();
    assert_eq!(calls, ["insert logs level,content", "delete logs []"]);
}

#[test]
fn successful_writes_do_not_call_the_hook() {
    let store = MockStore::default();
    let failures = Arc::new(Mutex::new(0usize));
    let sink = failures.clone();
    let service = LogService::with_failure_hook(store, move |_, _| {
        *sink.lock().unwrap() += 1;
    })
    .unwrap();

    service.add_log("fine", Level::Info);
    service.clear_logs();
    service.shutdown();

    assert_eq!(*failures.lock().unwrap(), 0);
}

#[test]
fn query_text_has_where_only_when_filtering() {
    let mut store = MockStore::default();
    query_page(&mut store, 1, 10, None).unwrap();
    query_page(&mut store, 1, 10, Some("WARN")).unwrap();

    let calls = store.0.lock().unwrap().calls.clone();
    assert_eq!(calls[0], "select SELECT COUNT(*) AS total FROM logs []");
    assert_eq!(
        calls[1],
        "select SELECT * FROM logs ORDER BY createTime DESC, id DESC LIMIT ? OFFSET ? \
         [Integer(10), Integer(0)]"
    );
    assert_eq!(
        calls[2],
        "select SELECT COUNT(*) AS total FROM logs WHERE level = ? [Text(\"WARN\")]"
    );
    assert!(calls[3].starts_with("select SELECT * FROM logs WHERE level = ? ORDER BY"));
}

#[test]
fn oversized_offset_is_clamped() {
    let mut store = MockStore::default();
    store.0.lock().unwrap().count_rows = vec![total_row(1)];

    let page = query_page(&mut store, u32::MAX, u32::MAX, None).unwrap();
    assert_eq!(page.total, 1);

    let calls = store.0.lock().unwrap().calls.clone();
    assert!(calls[1].ends_with(&format!("[Integer({}), Integer({})]", u32::MAX, i64::MAX)));
}

#[tokio::test]
async fn panicking_hook_does_not_stop_the_service() {
    let store = MockStore::default();
    store.0.lock().unwrap().fail_writes = true;

    let service = LogService::with_failure_hook(store.clone(), |_, _| {
        panic!("hook blew up");
    })
    .unwrap();

    service.add_log("lost", Level::Error);
    service.clear_logs();

    // 后台线程仍然存活，查询照常返回
    let page = service.fetch_logs(1, 10, None).await.unwrap();
    assert_eq!(page.total, 0);

    let calls = store.0.lock().unwrap().calls.clone();
    assert_eq!(calls.len(), 4);
    assert_eq!(calls[0], "insert logs level,content");
    assert_eq!(calls[1], "delete logs []");
}

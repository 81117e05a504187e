//! Integration tests for complete table plugin workflows.
//!
//! These tests drive a typed table through the same request maps osquery
//! sends, both directly and through the extension handler.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::approx_constant
)]

use osquery_table::plugin::{
    Field, GenerateError, OsqueryPlugin, QueryContext, RowDefinition, TablePlugin,
};
use osquery_table::{
    CallContext, ExtensionHandler, ExtensionPluginRequest, ExtensionPluginResponse,
    ExtensionStatus, TableError,
};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Default)]
struct ExampleRow {
    text: String,
    integer: i32,
    big_int: i64,
    double: f64,
}

impl RowDefinition for ExampleRow {
    fn fields(&self) -> Vec<Field> {
        vec![
            Field::new("text", self.text.as_str()),
            Field::new("integer", self.integer),
            Field::new("big_int", self.big_int),
            Field::new("double", self.double),
        ]
    }
}

fn example_row() -> ExampleRow {
    ExampleRow {
        text: "hello world".to_string(),
        integer: 123,
        big_int: -1234567890,
        double: 3.14159,
    }
}

fn request(pairs: &[(&str, &str)]) -> ExtensionPluginRequest {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn expected_routes() -> ExtensionPluginResponse {
    vec![
        map(&[("id", "column"), ("name", "text"), ("type", "TEXT"), ("op", "0")]),
        map(&[("id", "column"), ("name", "integer"), ("type", "INTEGER"), ("op", "0")]),
        map(&[("id", "column"), ("name", "big_int"), ("type", "BIGINT"), ("op", "0")]),
        map(&[("id", "column"), ("name", "double"), ("type", "DOUBLE"), ("op", "0")]),
    ]
}

#[test]
fn test_table_plugin() {
    let seen: Arc<Mutex<Option<QueryContext>>> = Arc::new(Mutex::new(None));
    let seen_in_generator = Arc::clone(&seen);

    let plugin = TablePlugin::new(
        "mock",
        ExampleRow::default(),
        move |_: &CallContext, query: &QueryContext| -> Result<Vec<ExampleRow>, GenerateError> {
            *seen_in_generator.lock().expect("lock") = Some(query.clone());
            Ok(vec![example_row()])
        },
    )
    .expect("plugin should build");

    // Basic methods
    assert_eq!(plugin.registry_name(), "table");
    assert_eq!(plugin.name(), "mock");
    assert_eq!(plugin.ping(), ExtensionStatus::new(0, "OK".to_string(), None));
    assert_eq!(plugin.routes(), expected_routes());

    // Explicit columns action
    let ctx = CallContext::background();
    let resp = plugin.call(&ctx, &request(&[("action", "columns")])).unwrap();
    assert_eq!(resp, expected_routes());
    assert!(seen.lock().unwrap().is_none());

    // Good action and context
    let resp = plugin
        .call(&ctx, &request(&[("action", "generate"), ("context", "{}")]))
        .unwrap();
    assert_eq!(seen.lock().unwrap().clone(), Some(QueryContext::new()));
    assert_eq!(
        resp,
        vec![map(&[
            ("text", "hello world"),
            ("integer", "123"),
            ("big_int", "-1234567890"),
            ("double", "3.14159"),
        ])]
    );
}

#[test]
fn test_table_plugin_errors() {
    let called = Arc::new(AtomicBool::new(false));
    let called_in_generator = Arc::clone(&called);

    let plugin = TablePlugin::new(
        "mock",
        ExampleRow::default(),
        move |_: &CallContext, _: &QueryContext| -> Result<Vec<ExampleRow>, GenerateError> {
            called_in_generator.store(true, Ordering::SeqCst);
            Err("foobar".into())
        },
    )
    .expect("plugin should build");
    let ctx = CallContext::background();

    // Bad actions
    assert!(plugin.call(&ctx, &ExtensionPluginRequest::new()).is_err());
    assert!(!called.load(Ordering::SeqCst));
    assert!(plugin.call(&ctx, &request(&[("action", "bad")])).is_err());
    assert!(!called.load(Ordering::SeqCst));

    // Good action, malformed context
    let err = plugin
        .call(&ctx, &request(&[("action", "generate"), ("context", "{[]}")]))
        .unwrap_err();
    assert!(matches!(err, TableError::ContextParse(_)));
    assert!(!called.load(Ordering::SeqCst));

    // Good action, generator fails
    let err = plugin
        .call(&ctx, &request(&[("action", "generate"), ("context", "{}")]))
        .unwrap_err();
    assert!(called.load(Ordering::SeqCst));
    assert_eq!(err.to_string(), "error generating table: foobar");
}

#[test]
fn test_handle_call_reports_errors_in_status() {
    let plugin = TablePlugin::new(
        "mock",
        ExampleRow::default(),
        |_: &CallContext, _: &QueryContext| -> Result<Vec<ExampleRow>, GenerateError> {
            Err("disk unavailable".into())
        },
    )
    .unwrap();

    let resp = plugin.handle_call(
        &CallContext::background(),
        request(&[("action", "generate"), ("context", "{}")]),
    );
    let status = resp.status.expect("status is always set");
    assert_eq!(status.code, Some(1));
    assert_eq!(
        status.message.as_deref(),
        Some("error generating table: disk unavailable")
    );
    assert_eq!(resp.response, Some(vec![]));
}

#[test]
fn test_routes_follow_declaration_order() {
    struct Wide;

    impl RowDefinition for Wide {
        fn fields(&self) -> Vec<Field> {
            (0..12)
                .map(|i| Field::new(format!("c{i:02}"), i64::from(i)))
                .collect()
        }
    }

    let plugin = TablePlugin::new(
        "wide",
        Wide,
        |_: &CallContext, _: &QueryContext| -> Result<Vec<Wide>, GenerateError> { Ok(vec![]) },
    )
    .unwrap();

    let names: Vec<String> = plugin
        .routes()
        .iter()
        .map(|r| r.get("name").cloned().unwrap_or_default())
        .collect();
    let expected: Vec<String> = (0..12).map(|i| format!("c{i:02}")).collect();
    assert_eq!(names, expected);
    assert!(plugin
        .routes()
        .iter()
        .all(|r| r.get("type").map(String::as_str) == Some("BIGINT")));
}

#[test]
fn test_concurrent_calls_are_independent() {
    let calls = Arc::new(AtomicUsize::new(0));
    let calls_in_generator = Arc::clone(&calls);

    let plugin = TablePlugin::new(
        "concurrent",
        ExampleRow::default(),
        move |_: &CallContext, query: &QueryContext| -> Result<Vec<ExampleRow>, GenerateError> {
            calls_in_generator.fetch_add(1, Ordering::SeqCst);
            let text = query
                .get("text")
                .and_then(|l| l.iter().next())
                .map(|c| c.expression().to_string())
                .unwrap_or_default();
            Ok(vec![ExampleRow {
                text,
                ..ExampleRow::default()
            }])
        },
    )
    .unwrap();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let plugin = plugin.clone();
            thread::spawn(move || {
                let context = format!(
                    r#"{{"constraints":[{{"name":"text","list":[{{"op":2,"expr":"thread-{i}"}}],"affinity":"TEXT"}}]}}"#
                );
                let resp = plugin
                    .call(
                        &CallContext::background(),
                        &request(&[("action", "generate"), ("context", context.as_str())]),
                    )
                    .unwrap();
                (i, resp)
            })
        })
        .collect();

    for handle in handles {
        let (i, resp) = handle.join().expect("thread should not panic");
        assert_eq!(resp.len(), 1);
        assert_eq!(resp[0].get("text"), Some(&format!("thread-{i}")));
    }
    assert_eq!(calls.load(Ordering::SeqCst), 8);
}

#[test]
fn test_extension_handler_end_to_end() {
    let table = TablePlugin::new(
        "mock",
        ExampleRow::default(),
        |ctx: &CallContext, _: &QueryContext| -> Result<Vec<ExampleRow>, GenerateError> {
            if ctx.is_cancelled() {
                return Err("shutting down".into());
            }
            Ok(vec![example_row()])
        },
    )
    .unwrap();

    let plugins: Vec<Arc<dyn OsqueryPlugin>> = vec![Arc::new(table)];
    let handler = ExtensionHandler::new(plugins).unwrap();

    let registry = handler.extension_registry();
    assert_eq!(
        registry.get("table").and_then(|t| t.get("mock")),
        Some(&expected_routes())
    );

    let resp = handler
        .handle_call(
            "table",
            "mock",
            request(&[("action", "generate"), ("context", "{}")]),
        )
        .unwrap();
    assert_eq!(resp.status.and_then(|s| s.code), Some(0));
    assert_eq!(resp.response.map(|r| r.len()), Some(1));

    handler.handle_shutdown();
    let resp = handler
        .handle_call(
            "table",
            "mock",
            request(&[("action", "generate"), ("context", "{}")]),
        )
        .unwrap();
    let status = resp.status.unwrap();
    assert_eq!(status.code, Some(1));
    assert_eq!(
        status.message.as_deref(),
        Some("error generating table: shutting down")
    );
}

use super::*;
use parking_lot::Mutex;
use rpc::{request_tag, FakeResponse, FakeTransport, SessionConfig};
use serde_json::json;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("transmission-rpc").chain(args.iter().copied())).unwrap()
}

fn client_answering(result: &'static str) -> SessionClient {
    let fake = FakeTransport::new();
    fake.respond_always(move |req| FakeResponse::echo(req, result, json!({ "version": "4.0.5" })));
    SessionClient::new(SessionConfig::new("http://127.0.0.1:9091"), Arc::new(fake)).unwrap()
}

/// Collects formatted log output in memory.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn prints_reply_arguments_by_default() {
    let client = client_answering("success");

    let output = call(&client, &parse(&["session-get"])).await.unwrap();

    let printed: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(printed, json!({ "version": "4.0.5" }));
}

#[tokio::test]
async fn envelope_flag_prints_whole_reply() {
    let client = client_answering("success");

    let output = call(&client, &parse(&["session-get", "--envelope"])).await.unwrap();

    let printed: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(printed, json!({ "arguments": { "version": "4.0.5" }, "result": "success", "tag": 1 }));
}

#[tokio::test]
async fn method_arguments_are_sent_as_given() {
    let fake = FakeTransport::new();
    fake.respond_always(|req| FakeResponse::echo(req, "success", json!({})));
    let client = SessionClient::new(SessionConfig::new("http://127.0.0.1:9091"), Arc::new(fake.clone())).unwrap();

    call(&client, &parse(&["torrent-get", r#"{"ids":[3]}"#])).await.unwrap();

    let sent: Value = serde_json::from_slice(&fake.requests()[0].body).unwrap();
    assert_eq!(sent["method"], "torrent-get");
    assert_eq!(sent["arguments"], json!({ "ids": [3] }));
}

#[tokio::test]
async fn invalid_arguments_json_is_rejected_before_sending() {
    let fake = FakeTransport::new();
    let client = SessionClient::new(SessionConfig::new("http://127.0.0.1:9091"), Arc::new(fake.clone())).unwrap();

    let error = call(&client, &parse(&["torrent-get", "{ids:"])).await.unwrap_err();

    assert!(error.to_string().contains("not valid JSON"));
    assert!(fake.requests().is_empty());
}

#[tokio::test]
async fn rejected_reply_keeps_rpc_error_as_cause() {
    let client = client_answering("duplicate torrent");

    let error = call(&client, &parse(&["torrent-add"])).await.unwrap_err();

    assert_eq!(error.to_string(), "'torrent-add' request failed");
    let cause = error.downcast_ref::<RpcError>().unwrap();
    assert_eq!(cause.response().unwrap().result, "duplicate torrent");
}

#[test]
fn log_rejected_records_carried_envelope() {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();
    let error = RpcError::Unsuccessful {
        response: Box::new(rpc::ResponseEnvelope {
            arguments: serde_json::Map::new(),
            result: "invalid or corrupt torrent file".to_string(),
            tag: rpc::Tag::new(7),
        }),
    };

    tracing::subscriber::with_default(subscriber, || log_rejected(&error));

    let text = logs.text();
    assert!(text.contains("daemon response rejected"));
    assert!(text.contains("invalid or corrupt torrent file"));
    assert!(text.contains("tag=7"));
}

#[test]
fn log_rejected_ignores_errors_without_envelope() {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        log_rejected(&RpcError::RetriesExhausted { tries: 3 });
    });

    assert!(logs.text().is_empty());
}

#[tokio::test]
async fn consecutive_calls_use_fresh_tags() {
    let fake = FakeTransport::new();
    fake.respond_always(|req| FakeResponse::echo(req, "success", json!({})));
    let client = SessionClient::new(SessionConfig::new("http://127.0.0.1:9091"), Arc::new(fake.clone())).unwrap();

    call(&client, &parse(&["session-get"])).await.unwrap();
    call(&client, &parse(&["session-get", "--envelope"])).await.unwrap();

    let tags: Vec<_> = fake.requests().iter().filter_map(request_tag).collect();
    assert_eq!(tags, vec![rpc::Tag::new(1), rpc::Tag::new(2)]);
}

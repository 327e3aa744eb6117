#![allow(clippy::unwrap_used)]
#![allow(clippy::indexing_slicing)]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::{TimeZone, Utc};

use client::{KeyValueStore, MemoryStore, PendingWrite, SyncClient};
use common::constants::{OUTBOX_KEY, REPORTS_KEY};
use common::{Category, Report, ReportId};

fn report(id: &str, ts_secs: i64) -> Report {
    Report {
        id: ReportId::try_from(id).unwrap(),
        month: "Ogos".to_string(),
        year: "2026".to_string(),
        pppk_name: "ZAITON BINTI MANAN".to_string(),
        category: Category::Usahawan,
        entrepreneur_name: "Bengkel Jahitan Mawar".to_string(),
        debit: 500.0,
        credit: 120.0,
        net_income: 380.0,
        document_url: None,
        submitted_at: Utc.timestamp_opt(ts_secs, 0).unwrap(),
    }
}

fn ids(reports: &[Report]) -> Vec<&str> {
    reports.iter().map(|r| r.id.as_str()).collect()
}

/// Serves one canned HTTP response per expected request, in order, then
/// returns the raw requests it saw.
fn spawn_server(responses: Vec<String>) -> (String, thread::JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = thread::spawn(move || {
        let mut seen = Vec::new();
        for response in responses {
            let (mut stream, _) = listener.accept().unwrap();
            seen.push(read_request(&mut stream));
            stream.write_all(response.as_bytes()).unwrap();
        }
        seen
    });
    (format!("http://{addr}/"), handle)
}

fn json_response(body: &str) -> String {
    format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
}

fn status_response(status_line: &str) -> String {
    format!("HTTP/1.1 {status_line}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")
}

fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0_u8; 1024];
    loop {
        let n = stream.read(&mut chunk).unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(header_end) = find_header_end(&buf) {
            let headers = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
            let content_length = headers
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).to_string()
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

/// An endpoint that refuses connections: the transport-exception path.
fn dead_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/")
}

fn build_client(endpoint: &str, store: Arc<dyn KeyValueStore>) -> SyncClient {
    SyncClient::builder(endpoint)
        .timeout(Duration::from_secs(5))
        .build(store)
        .unwrap()
}

#[test]
fn fetch_sorts_descending_and_refreshes_cache() {
    let rows = vec![report("old", 100), report("new", 300), report("mid", 200)];
    let body = serde_json::to_string(&rows).unwrap();
    let (endpoint, server) = spawn_server(vec![json_response(&body)]);

    let store = Arc::new(MemoryStore::new());
    let sync = build_client(&endpoint, store.clone());

    let snapshot = sync.reports().fetch();
    assert!(snapshot.live);
    assert_eq!(ids(&snapshot.reports), ["new", "mid", "old"]);

    // The cache now holds the sorted sequence verbatim.
    let cached: Vec<Report> =
        serde_json::from_str(&store.get(REPORTS_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(cached, snapshot.reports);

    let requests = server.join().unwrap();
    assert!(requests[0].starts_with("GET /?t="), "cache buster missing");
}

#[test]
fn fetch_offline_serves_last_cached_collection() {
    let rows = vec![report("a", 200), report("b", 100)];
    let body = serde_json::to_string(&rows).unwrap();
    let (endpoint, server) = spawn_server(vec![json_response(&body)]);

    let store = Arc::new(MemoryStore::new());
    build_client(&endpoint, store.clone()).reports().fetch();
    server.join().unwrap();

    // Same store, unreachable remote: exactly the cached rows, not live.
    let offline = build_client(&dead_endpoint(), store);
    let snapshot = offline.reports().fetch();
    assert!(!snapshot.live);
    assert_eq!(ids(&snapshot.reports), ["a", "b"]);
}

#[test]
fn fetch_offline_with_no_cache_is_empty() {
    let sync = build_client(&dead_endpoint(), Arc::new(MemoryStore::new()));
    let snapshot = sync.reports().fetch();
    assert!(!snapshot.live);
    assert!(snapshot.reports.is_empty());
}

#[test]
fn fetch_failure_never_clobbers_cache() {
    let store = Arc::new(MemoryStore::new());
    let seeded = serde_json::to_string(&vec![report("kept", 100)]).unwrap();
    store.set(REPORTS_KEY, &seeded).unwrap();

    // Non-success status.
    let (endpoint, server) = spawn_server(vec![status_response("500 Internal Server Error")]);
    let snapshot = build_client(&endpoint, store.clone()).reports().fetch();
    server.join().unwrap();
    assert!(!snapshot.live);
    assert_eq!(ids(&snapshot.reports), ["kept"]);

    // Malformed payload.
    let (endpoint, server) = spawn_server(vec![json_response("this is not json")]);
    let snapshot = build_client(&endpoint, store.clone()).reports().fetch();
    server.join().unwrap();
    assert!(!snapshot.live);
    assert_eq!(ids(&snapshot.reports), ["kept"]);

    assert_eq!(store.get(REPORTS_KEY).unwrap().unwrap(), seeded);
}

#[test]
fn add_dispatched_leaves_cache_untouched() {
    let (endpoint, server) = spawn_server(vec![status_response("200 OK")]);
    let store = Arc::new(MemoryStore::new());
    let sync = build_client(&endpoint, store.clone());

    let submitted = report("fresh", 400);
    sync.reports().add(submitted.clone()).unwrap();
    let requests = server.join().unwrap();

    // The write went out as a POST of the report body...
    assert!(requests[0].starts_with("POST /"));
    assert!(requests[0].contains("\"fresh\""));

    // ...but the cache is not assumed updated; the report is pending instead.
    assert_eq!(store.get(REPORTS_KEY).unwrap(), None);
    let pending = sync.reports().pending();
    assert_eq!(pending, vec![PendingWrite::Submit(submitted)]);
}

#[test]
fn add_offline_prepends_to_cache() {
    let store = Arc::new(MemoryStore::new());
    let seeded = serde_json::to_string(&vec![report("earlier", 100)]).unwrap();
    store.set(REPORTS_KEY, &seeded).unwrap();

    let sync = build_client(&dead_endpoint(), store.clone());
    let submitted = report("fresh", 400);
    sync.reports().add(submitted.clone()).unwrap();

    let cached: Vec<Report> =
        serde_json::from_str(&store.get(REPORTS_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(cached.first(), Some(&submitted));
    assert_eq!(ids(&cached), ["fresh", "earlier"]);
}

#[test]
fn delete_offline_removes_present_id_and_ignores_absent() {
    let store = Arc::new(MemoryStore::new());
    let seeded = serde_json::to_string(&vec![report("x123", 200), report("keep", 100)]).unwrap();
    store.set(REPORTS_KEY, &seeded).unwrap();

    let sync = build_client(&dead_endpoint(), store.clone());
    sync.reports()
        .delete_by_id(&ReportId::try_from("x123").unwrap())
        .unwrap();

    let cached: Vec<Report> =
        serde_json::from_str(&store.get(REPORTS_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(ids(&cached), ["keep"]);

    // Absent id: no error, cache unchanged.
    sync.reports()
        .delete_by_id(&ReportId::try_from("never-existed").unwrap())
        .unwrap();
    let cached: Vec<Report> =
        serde_json::from_str(&store.get(REPORTS_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(ids(&cached), ["keep"]);
}

#[test]
fn delete_dispatched_sends_action_payload() {
    let (endpoint, server) = spawn_server(vec![status_response("200 OK")]);
    let store = Arc::new(MemoryStore::new());
    let sync = build_client(&endpoint, store.clone());

    sync.reports()
        .delete_by_id(&ReportId::try_from("x123").unwrap())
        .unwrap();
    let requests = server.join().unwrap();
    assert!(requests[0].contains(r#""action":"delete""#));
    assert!(requests[0].contains(r#""id":"x123""#));

    // Dispatch does not touch the cache; the retract is pending.
    assert_eq!(store.get(REPORTS_KEY).unwrap(), None);
    assert!(matches!(
        sync.reports().pending().first(),
        Some(PendingWrite::Retract { id }) if id.as_str() == "x123"
    ));
}

#[test]
fn fetch_confirms_observed_submit() {
    let submitted = report("fresh", 400);
    let remote_after = serde_json::to_string(&vec![submitted.clone(), report("old", 100)]).unwrap();
    let (endpoint, server) = spawn_server(vec![
        status_response("200 OK"),
        json_response(&remote_after),
    ]);

    let store = Arc::new(MemoryStore::new());
    let sync = build_client(&endpoint, store);

    sync.reports().add(submitted.clone()).unwrap();
    assert_eq!(sync.reports().pending().len(), 1);

    // Remote truth now contains the row: the pending submit is confirmed.
    let snapshot = sync.reports().fetch();
    server.join().unwrap();
    assert!(snapshot.live);
    assert_eq!(ids(&snapshot.reports), ["fresh", "old"]);
    assert!(sync.reports().pending().is_empty());
}

#[test]
fn fetch_keeps_unobserved_submit_visible() {
    // The dispatch looked fine, but the remote store silently dropped the
    // row. The report stays pending and visible instead of vanishing.
    let submitted = report("fresh", 400);
    let remote_after = serde_json::to_string(&vec![report("old", 100)]).unwrap();
    let (endpoint, server) = spawn_server(vec![
        status_response("200 OK"),
        json_response(&remote_after),
    ]);

    let store = Arc::new(MemoryStore::new());
    let sync = build_client(&endpoint, store);

    sync.reports().add(submitted.clone()).unwrap();
    let snapshot = sync.reports().fetch();
    server.join().unwrap();

    assert_eq!(ids(&snapshot.reports), ["fresh", "old"]);
    assert_eq!(sync.reports().pending(), vec![PendingWrite::Submit(submitted)]);
}

#[test]
fn offline_delete_stays_hidden_across_live_fetches() {
    let store = Arc::new(MemoryStore::new());
    let seeded = serde_json::to_string(&vec![report("x123", 200), report("keep", 100)]).unwrap();
    store.set(REPORTS_KEY, &seeded).unwrap();

    // Admin deletes while offline.
    let offline = build_client(&dead_endpoint(), store.clone());
    offline
        .reports()
        .delete_by_id(&ReportId::try_from("x123").unwrap())
        .unwrap();

    // The remote store never saw the delete; its truth still carries x123.
    // The pending retract keeps it hidden.
    let remote_truth = serde_json::to_string(&vec![report("x123", 200), report("keep", 100)]).unwrap();
    let remote_after = serde_json::to_string(&vec![report("keep", 100)]).unwrap();
    let (endpoint, server) = spawn_server(vec![
        json_response(&remote_truth),
        json_response(&remote_after),
    ]);
    let sync = build_client(&endpoint, store.clone());

    let snapshot = sync.reports().fetch();
    assert!(snapshot.live);
    assert_eq!(ids(&snapshot.reports), ["keep"]);
    assert_eq!(sync.reports().pending().len(), 1);

    // Once remote truth drops the row, the retract is confirmed.
    let snapshot = sync.reports().fetch();
    server.join().unwrap();
    assert_eq!(ids(&snapshot.reports), ["keep"]);
    assert!(sync.reports().pending().is_empty());
    assert_eq!(store.get(OUTBOX_KEY).unwrap().unwrap(), "[]");
}

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use bytes::Bytes;
use common::{call, request, Captured, Refusing, Traced};
use tollgate::middleware::logging::{self, Options, Setting};
use tollgate::{handler_fn, Body, Handler, Method, ResponseWriter, StatusCode};

fn everything(sink: &Captured) -> Options {
    Options::builder().sink(sink.clone()).all().build()
}

fn reply(status: StatusCode, body: &'static str) -> impl Handler {
    handler_fn(move |_req, res| Box::pin(async move {
        res.set_status(status);
        res.write(body.as_bytes()).unwrap();
    }))
}

/// Extracts `N` from the `- Duration: Nµs` line.
fn logged_micros(log: &str) -> u128 {
    let line = log.lines()
        .find_map(|l| l.strip_prefix("- Duration: "))
        .unwrap_or_else(|| panic!("no duration in {log:?}"));
    line.strip_suffix("µs").unwrap().parse().unwrap()
}

#[tokio::test]
async fn logs_request_and_response_fields() {
    let rows = [
        (Method::GET, "/test/endpoint/get", StatusCode::OK, "OK"),
        (Method::POST, "/test/endpoint/post", StatusCode::CREATED, "Created"),
        (Method::PUT, "/test/endpoint/put", StatusCode::ACCEPTED, "OK"),
        (Method::DELETE, "/test/endpoint/delete", StatusCode::OK, "OK"),
        (Method::OPTIONS, "/test/endpoint/notfound", StatusCode::NOT_FOUND, "Not found"),
    ];

    for (method, url, status, body) in rows {
        let sink = Captured::default();
        let app = reply(status, body).with(logging::middleware(everything(&sink)));

        let res = call(&app, request(method.clone(), url, Body::empty())).await;
        assert_eq!(res.status(), status);
        assert_eq!(res.text(), body);

        let log = sink.joined();
        assert!(log.contains(method.as_str()), "{method}: {log}");
        assert!(log.contains(url), "{url}: {log}");
        assert!(log.contains(&format!("- Status: {}", status.as_u16())), "{log}");
        assert!(log.contains(&format!("- Content length: {}", body.len())), "{log}");
        assert!(log.contains(&format!("- Body: {body}")), "{log}");
        assert!(log.contains("µs"), "{log}");
    }
}

#[tokio::test]
async fn get_x_scenario() {
    let sink = Captured::default();
    let app = reply(StatusCode::OK, "OK").with(logging::middleware(everything(&sink)));

    let res = call(&app, request(Method::GET, "/x", Body::empty())).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text(), "OK");

    let entries = sink.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(
        entries[0],
        "# Request\n- Method: GET\n- URL: /x\n- Content length: 0\n- Body: "
    );
    assert!(entries[1].starts_with("# Response\n- Duration: "));
    assert!(entries[1].ends_with("µs\n- Status: 200\n- Content length: 2\n- Body: OK"));
}

#[tokio::test]
async fn disabled_fields_are_omitted() {
    let sink = Captured::default();
    let options = Options::new([
        Setting::Sink(Arc::new(sink.clone())),
        Setting::Method(true),
        Setting::Status(true),
    ]);
    let app = reply(StatusCode::ACCEPTED, "queued").with(logging::middleware(options));

    call(&app, request(Method::POST, "/jobs", "payload")).await;

    assert_eq!(sink.entries(), ["# Request\n- Method: POST", "# Response\n- Status: 202"]);
}

#[tokio::test]
async fn body_read_failure_short_circuits() {
    let sink = Captured::default();
    let called = Arc::new(AtomicBool::new(false));
    let handler = {
        let called = Arc::clone(&called);
        handler_fn(move |_req, _res| {
            let called = Arc::clone(&called);
            Box::pin(async move { called.store(true, Ordering::SeqCst) })
        })
    };
    let app = handler.with(logging::middleware(everything(&sink)));

    let broken = Body::from_stream(futures::stream::iter(vec![
        Err::<Bytes, _>(std::io::Error::other("refused to read")),
    ]));
    let res = call(&app, request(Method::GET, "/test/endpoint/error", broken)).await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(res.text().contains("error"), "{}", res.text());
    assert!(res.text().contains("refused to read"));
    assert!(sink.joined().contains("error"));
    assert_eq!(sink.entries(), ["Error: error reading request body: refused to read"]);
    assert!(!called.load(Ordering::SeqCst));
}

#[tokio::test]
async fn body_read_is_skipped_when_bodies_are_off() {
    let sink = Captured::default();
    let app = reply(StatusCode::OK, "fine")
        .with(logging::middleware(Options::builder().sink(sink.clone()).method(true).build()));

    let broken = Body::from_stream(futures::stream::iter(vec![
        Err::<Bytes, _>(std::io::Error::other("refused to read")),
    ]));
    let res = call(&app, request(Method::GET, "/", broken)).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert!(!sink.joined().contains("error"));
}

#[tokio::test]
async fn durations_are_logged_in_microseconds() {
    let sleeps = [
        Duration::from_nanos(1),
        Duration::from_micros(1),
        Duration::from_millis(1),
        Duration::from_millis(20),
    ];

    for sleep in sleeps {
        let sink = Captured::default();
        let app = handler_fn(move |_req, _res| Box::pin(async move {
            tokio::time::sleep(sleep).await;
        }))
        .with(logging::middleware(Options::builder().sink(sink.clone()).duration(true).build()));

        call(&app, request(Method::GET, "/test/endpoint/duration", Body::empty())).await;

        let logged = logged_micros(&sink.joined());
        assert!(logged >= sleep.as_micros(), "slept {sleep:?}, logged {logged}µs");
    }
}

#[tokio::test]
async fn only_the_last_write_is_logged() {
    let sink = Captured::default();
    let app = handler_fn(|_req, res| Box::pin(async move {
        res.set_status(StatusCode::OK);
        res.write(b"first chunk, ").unwrap();
        res.write(b"last").unwrap();
    }))
    .with(logging::middleware(everything(&sink)));

    let res = call(&app, request(Method::GET, "/chunks", Body::empty())).await;
    assert_eq!(res.text(), "first chunk, last");

    let response_block = &sink.entries()[1];
    assert!(response_block.contains("- Content length: 4"), "{response_block}");
    assert!(response_block.ends_with("- Body: last"), "{response_block}");
}

#[tokio::test]
async fn status_is_logged_as_500_unless_set_explicitly() {
    let sink = Captured::default();
    let app = handler_fn(|_req, res| Box::pin(async move {
        res.write(b"implicit").unwrap();
    }))
    .with(logging::middleware(Options::builder().sink(sink.clone()).status(true).build()));

    let res = call(&app, request(Method::GET, "/implicit", Body::empty())).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(sink.entries()[1], "# Response\n- Status: 500");
}

#[tokio::test]
async fn drained_body_is_logged_and_still_reaches_the_handler() {
    let sink = Captured::default();
    let echo = handler_fn(|mut req, res| Box::pin(async move {
        let body = req.take_body().collect().await.unwrap();
        res.set_status(StatusCode::OK);
        res.write(&body).unwrap();
    }));
    let app = echo.with(logging::middleware(everything(&sink)));

    let res = call(&app, request(Method::POST, "/echo", r#"{"name":"alice"}"#)).await;
    assert_eq!(res.text(), r#"{"name":"alice"}"#);

    let entries = sink.entries();
    assert!(entries[0].contains("- Content length: 16"), "{}", entries[0]);
    assert!(entries[0].ends_with(r#"- Body: {"name":"alice"}"#), "{}", entries[0]);
    assert!(entries[1].ends_with(r#"- Body: {"name":"alice"}"#), "{}", entries[1]);
}

#[tokio::test]
async fn unknown_request_length_is_logged_as_minus_one() {
    let sink = Captured::default();
    let app = reply(StatusCode::OK, "ok")
        .with(logging::middleware(Options::builder().sink(sink.clone()).content_lengths(true).build()));

    let streamed = Body::from_stream(futures::stream::iter(vec![
        Ok::<_, std::io::Error>(Bytes::from_static(b"chunk")),
    ]));
    call(&app, request(Method::POST, "/stream", streamed)).await;

    assert_eq!(sink.entries()[0], "# Request\n- Content length: -1");
}

#[tokio::test]
async fn declared_content_length_wins() {
    let sink = Captured::default();
    let app = reply(StatusCode::OK, "ok")
        .with(logging::middleware(Options::builder().sink(sink.clone()).content_lengths(true).build()));

    let req = http::Request::post("/upload")
        .header("content-length", "5")
        .body(Body::from("hello"))
        .unwrap();
    call(&app, tollgate::Request::from(req)).await;

    assert_eq!(sink.entries()[0], "# Request\n- Content length: 5");
}

#[tokio::test]
async fn absolute_uris_log_only_path_and_query() {
    let sink = Captured::default();
    let app = reply(StatusCode::OK, "ok")
        .with(logging::middleware(Options::builder().sink(sink.clone()).url(true).build()));

    call(&app, request(Method::GET, "http://example.com:8080/x?y=1", Body::empty())).await;
    call(&app, request(Method::CONNECT, "example.com:443", Body::empty())).await;

    assert_eq!(sink.entries()[0], "# Request\n- URL: /x?y=1");
    assert_eq!(sink.entries()[2], "# Request\n- URL: /");
}

#[tokio::test]
async fn failing_error_write_is_reported() {
    let traced = Traced::default();
    let _guard = traced.install();
    let sink = Captured::default();
    let app = reply(StatusCode::OK, "unreachable").with(logging::middleware(everything(&sink)));

    let broken = Body::from_stream(futures::stream::iter(vec![
        Err::<Bytes, _>(std::io::Error::other("refused to read")),
    ]));
    let mut res = Refusing::default();
    app.serve(request(Method::POST, "/upload", broken), &mut res).await;

    assert_eq!(res.status, Some(StatusCode::INTERNAL_SERVER_ERROR));
    assert_eq!(sink.entries(), ["Error: error reading request body: refused to read"]);
    let output = traced.output();
    assert!(output.contains("failed to write error response"), "{output}");
}

//! Minimal tollgate example: a few JSON endpoints behind logging and panic
//! recovery.
//!
//! Run with:
//!   RUST_LOG=info cargo run --example basic
//!
//! Try:
//!   curl http://localhost:3000/users/42
//!   curl -X POST http://localhost:3000/users -d '{"name":"alice"}'
//!   curl http://localhost:3000/panic

use http::HeaderValue;
use tollgate::middleware::{logging, recovery};
use tollgate::{handler_fn, ContentType, Handler, Router, Server, StatusCode};

#[tokio::main]
async fn main() -> Result<(), tollgate::Error> {
    tracing_subscriber::fmt::init();

    let get_user = handler_fn(|req, res| Box::pin(async move {
        let id = req.param("id").unwrap_or("unknown");
        let body = format!(r#"{{"id":"{id}","name":"alice"}}"#);
        res.content_type(ContentType::Json);
        res.set_status(StatusCode::OK);
        let _ = res.write(body.as_bytes());
    }));

    // POST /users echoes the payload the logging middleware already buffered.
    let create_user = handler_fn(|mut req, res| Box::pin(async move {
        let body = match req.take_body().collect().await {
            Ok(body) if !body.is_empty() => body,
            _ => return res.set_status(StatusCode::BAD_REQUEST),
        };
        res.content_type(ContentType::Json);
        res.headers_mut().insert("location", HeaderValue::from_static("/users/99"));
        res.set_status(StatusCode::CREATED);
        let _ = res.write(&body);
    }));

    let explode = handler_fn(|req, _res| Box::pin(async move {
        if *req.method() == tollgate::Method::GET {
            panic!("this endpoint always panics");
        }
    }));

    let app = Router::new()
        .get("/users/{id}", get_user)
        .post("/users", create_user)
        .get("/panic", explode)
        .with(logging::middleware(logging::Options::builder().all().build()))
        .with(recovery::middleware(recovery::Options::builder().stack_trace(true).build()));

    Server::bind(([0, 0, 0, 0], 3000).into()).serve(app).await
}

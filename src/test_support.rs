//! Shared helpers for router tests: a stand-in Gemini server and request/response shortcuts.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use axum::{
    body::{to_bytes, Body, Bytes},
    http::{header, Request, StatusCode, Uri},
    response::Response,
    Router,
};
use serde_json::Value;
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub path: String,
    pub query: Option<String>,
    pub body: Value,
}

/// Answers every request with a fixed status and body, recording what it saw.
pub struct MockGemini {
    base_url: String,
    hits: Arc<AtomicUsize>,
    last: Arc<Mutex<Option<SeenRequest>>>,
}

impl MockGemini {
    pub async fn spawn(status: StatusCode, body: String) -> Self {
        let hits = Arc::new(AtomicUsize::new(0));
        let last = Arc::new(Mutex::new(None));

        let app = {
            let hits = hits.clone();
            let last = last.clone();
            Router::new().fallback(move |uri: Uri, payload: Bytes| {
                let hits = hits.clone();
                let last = last.clone();
                let body = body.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    *last.lock().unwrap() = Some(SeenRequest {
                        path: uri.path().to_string(),
                        query: uri.query().map(str::to_string),
                        body: serde_json::from_slice(&payload).unwrap_or(Value::Null),
                    });
                    (status, body)
                }
            })
        };

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url: format!("http://{addr}"),
            hits,
            last,
        }
    }

    /// A base URL whose port has nothing listening.
    pub async fn unreachable() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        Self {
            base_url: format!("http://{addr}"),
            hits: Arc::new(AtomicUsize::new(0)),
            last: Arc::new(Mutex::new(None)),
        }
    }

    pub fn base_url(&self) -> String {
        self.base_url.clone()
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<SeenRequest> {
        self.last.lock().unwrap().clone()
    }
}

pub fn post_json(body: Value) -> Request<Body> {
    Request::post("/api/generate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn read_json(res: Response) -> Value {
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

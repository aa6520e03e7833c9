// Each integration test binary uses a different subset of these helpers.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use serde_json::Value;
use time::UtcOffset;
use tower::ServiceExt;

use alerta_server::app::build_router;
use alerta_server::configs::{Push, Storage};
use alerta_server::tests::{MockPushTransport, setup_test_db};

pub struct MockApp {
    pub router: Router,
    pub storage: Arc<Storage>,
    pub transport: Arc<MockPushTransport>,
}

impl MockApp {
    pub async fn new() -> Self {
        Self::with_transport(MockPushTransport::default()).await
    }

    pub async fn with_transport(transport: MockPushTransport) -> Self {
        let storage = setup_test_db().await;
        let transport = Arc::new(transport);

        let push = Push {
            endpoint: String::from("http://localhost/unused"),
            project_id: String::from("test"),
            client_email: String::from("push@test.iam.gserviceaccount.com"),
            private_key: String::from("unused"),
            token_uri: String::from("http://localhost/token"),
            title: String::from("Alerta de Movimento"),
            timeout_ms: 500,
        };

        let router = build_router(storage.clone(), transport.clone(), &push, UtcOffset::UTC);

        Self {
            router,
            storage,
            transport,
        }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response<Body> {
        let builder = Request::builder().uri(uri).method(method);

        let request = match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.router.clone().oneshot(request).await.unwrap()
    }
}

pub async fn read_json(response: Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    serde_json::from_slice(&body).unwrap()
}

pub async fn read_text(response: Response<Body>) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    String::from_utf8(body.to_vec()).unwrap()
}

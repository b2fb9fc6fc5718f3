//! Integration tests for the Gaspass client.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p gaspass-integration-tests
//! ```
//!
//! No external services are needed: every test starts in-process axum
//! servers on ephemeral ports that stand in for the Data Access API,
//! Telegram and `EmailJS`.
//!
//! # Test Categories
//!
//! - `api_client` - Response decoding and error mapping
//! - `checkout_channels` - Channel payloads, partial failure and timeouts
//! - `cart_checkout` - Browse, fill a file-backed cart and check out

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::Router;
use serde_json::{Value, json};

/// A running mock server.
#[derive(Debug, Clone, Copy)]
pub struct MockServer {
    pub addr: SocketAddr,
}

impl MockServer {
    /// Serve `router` on an ephemeral local port until the test runtime
    /// shuts down.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start(router: Router) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local address");
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        Self { addr }
    }

    /// `http://<addr><path>`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }
}

/// An address nothing listens on.
///
/// # Panics
///
/// Panics if no local port can be bound.
pub async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local address");
    drop(listener);
    format!("http://{addr}")
}

/// Requests captured by a mock handler, in arrival order.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    requests: Arc<Mutex<Vec<Recorded>>>,
}

/// One captured request.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub path: String,
    pub query: Option<String>,
    pub body: Value,
}

impl Recorder {
    /// Store a request.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    pub fn record(&self, path: &str, query: Option<&str>, body: Value) {
        self.requests.lock().expect("recorder lock").push(Recorded {
            path: path.to_string(),
            query: query.map(String::from),
            body,
        });
    }

    /// Everything captured so far.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[must_use]
    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().expect("recorder lock").clone()
    }
}

/// A product as the Data Access API serializes it.
#[must_use]
pub fn product_json(id: i32, name: &str, price: &str, stock: i32) -> Value {
    json!({
        "id": id,
        "name": name,
        "price": price,
        "description": format!("{name} description"),
        "image": format!("{}.png", name.to_lowercase()),
        "category": 2,
        "rating": "4.5",
        "stock": stock,
        "featured": true,
        "category_name": "Audio"
    })
}

//! In-process dispatcher served over real TCP.

#![allow(clippy::expect_used)] // Test infrastructure fails loudly on setup errors

use axum::Router;
use order_api_web::{OrderHandler, register_handlers};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// The dispatcher router bound to `127.0.0.1` on an ephemeral port.
///
/// Dropping the server aborts it; [`TestServer::shutdown`] stops it
/// gracefully and waits for in-flight requests.
#[derive(Debug)]
pub struct TestServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl TestServer {
    /// Registers `handler` and serves the resulting router.
    ///
    /// # Panics
    ///
    /// Panics if registration fails or no local port can be bound.
    pub async fn spawn<H: OrderHandler>(handler: H) -> Self {
        let router = register_handlers(handler).expect("embedded Order API should register");
        Self::serve(router).await
    }

    /// Serves an already built router.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn serve(router: Router) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("should bind an ephemeral port");
        let addr = listener.local_addr().expect("bound listener has an address");
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let result = axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await;
            if let Err(e) = result {
                tracing::error!(error = %e, "test server stopped");
            }
        });

        tracing::debug!(%addr, "test server listening");
        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
            task: Some(task),
        }
    }

    /// Socket address the server listens on.
    #[must_use]
    pub const fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// `http://127.0.0.1:<port>/`
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    /// Stops accepting connections and waits for the server task.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

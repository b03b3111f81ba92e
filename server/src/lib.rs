//! # Order API Server
//!
//! Process shell around the dispatcher: configuration, request tracing,
//! and graceful shutdown. The only application logic is
//! [`LoggingOrderHandler`], which logs each accepted order.

pub mod config;
pub mod handler;

use axum::Router;
use order_api_web::{OrderHandler, RegisterError};
use std::future::Future;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub use config::{ConfigError, DEFAULT_LOG_FILTER, ServerConfig};
pub use handler::LoggingOrderHandler;

/// The server's router: the dispatcher for [`LoggingOrderHandler`] with
/// request tracing.
///
/// # Errors
///
/// Returns a [`RegisterError`] if the embedded document fails to compile.
pub fn build_app() -> Result<Router, RegisterError> {
    build_app_with(LoggingOrderHandler)
}

/// Same as [`build_app`] with a different handler.
///
/// # Errors
///
/// Returns a [`RegisterError`] if the embedded document fails to compile.
pub fn build_app_with<H: OrderHandler>(handler: H) -> Result<Router, RegisterError> {
    Ok(order_api_web::register_handlers(handler)?.layer(TraceLayer::new_for_http()))
}

/// Serves `app` on `listener` until `shutdown` resolves, then drains
/// in-flight requests.
///
/// # Errors
///
/// Returns an I/O error if the server fails while accepting connections.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "Server listening");
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

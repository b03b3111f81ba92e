//! # Order API Testing
//!
//! Testing utilities and helpers for the Order API.
//!
//! This crate provides:
//! - [`RecordingHandler`]: an [`OrderHandler`](order_api_web::OrderHandler)
//!   that captures every dispatched call
//! - [`TestServer`]: the dispatcher served on an ephemeral local port
//! - Fixtures for the canonical order and an address nothing listens on
//!
//! ## Example
//!
//! ```ignore
//! use order_api_testing::{RecordingHandler, TestServer, fixtures};
//!
//! #[tokio::test]
//! async fn test_create_order() {
//!     let handler = RecordingHandler::new();
//!     let server = TestServer::spawn(handler.clone()).await;
//!
//!     // ... send PUT {server.base_url()}order/234578 ...
//!
//!     let call = handler.last_call().unwrap();
//!     assert_eq!(call.id, fixtures::ORDER_ID);
//!     server.shutdown().await;
//! }
//! ```

mod recording;
mod server;

pub use recording::{RecordedCall, RecordingHandler};
pub use server::TestServer;

/// Canonical test data.
pub mod fixtures {
    use order_api_core::{Order, OrderItem};

    /// Order id used by the example client.
    pub const ORDER_ID: &str = "234578";

    /// Price used by the example client.
    pub const ORDER_PRICE: i64 = 14;

    /// `{"item": "Tea Table Green", "price": 14}`
    #[must_use]
    pub const fn green_tea_table() -> Order {
        Order::new()
            .with_item(OrderItem::TeaTableGreen)
            .with_price(ORDER_PRICE)
    }

    /// Base URL on the loopback interface that refuses connections.
    ///
    /// Port 9 (discard) is not served on test machines.
    #[must_use]
    pub fn unreachable_base_url() -> String {
        "http://127.0.0.1:9/".to_string()
    }
}

/// Installs a fmt subscriber that writes through the test harness.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_test_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use order_api_core::OrderItem;

    #[test]
    fn test_green_tea_table_fixture() {
        let order = fixtures::green_tea_table();
        assert_eq!(order.item, Some(OrderItem::TeaTableGreen));
        assert_eq!(order.price, Some(14));
    }

    #[test]
    fn test_init_test_tracing_is_idempotent() {
        init_test_tracing();
        init_test_tracing();
    }
}

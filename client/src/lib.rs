//! # Order API Client
//!
//! Invokes `PUT /order/{id}` against a running Order API server. The route,
//! method and content type come from the same embedded definition the
//! dispatcher is built from.
//!
//! ## Example
//!
//! ```no_run
//! use order_api_client::OrderClient;
//! use order_api_core::{Order, OrderItem};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OrderClient::new("http://localhost:8088")?;
//!
//!     let order = Order::new()
//!         .with_item(OrderItem::TeaTableGreen)
//!         .with_price(14);
//!
//!     let response = client.put_order_id("234578", &order).await?;
//!     println!("{}", response.status_code());
//!     Ok(())
//! }
//! ```
//!
//! A non-2xx status is a completed exchange and comes back as a
//! [`PutOrderIdResponse`]; only transport failures are [`ClientError`]s.

pub mod client;
pub mod error;
pub mod response;

// Re-export main types for convenience
pub use client::OrderClient;
pub use error::ClientError;
pub use response::{CORRELATION_ID_HEADER, ErrorResponse, PutOrderIdResponse};

/// Base URL used when `ORDER_API_BASE_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8088";

/// Environment variable holding the server base URL.
pub const BASE_URL_ENV: &str = "ORDER_API_BASE_URL";

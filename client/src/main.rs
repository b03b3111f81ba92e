//! Example Order API invocation.
//!
//! Sends one order to the configured server and prints the status code.

use anyhow::Context;
use order_api_client::{BASE_URL_ENV, DEFAULT_BASE_URL, OrderClient};
use order_api_core::{Order, OrderItem};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const ORDER_ID: &str = "234578";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "order_api_client=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let base_url = std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    let client = OrderClient::new(&base_url)?;

    let order = Order::new()
        .with_item(OrderItem::TeaTableGreen)
        .with_price(14);

    let response = client
        .put_order_id(ORDER_ID, &order)
        .await
        .with_context(|| format!("PUT order {ORDER_ID} to {base_url}"))?;

    if let Some(error) = response.error_body() {
        tracing::warn!(code = %error.code, message = %error.message, details = ?error.details, "order rejected");
    }

    println!("{}", response.status_code());
    Ok(())
}

//! The server's order handler.

use async_trait::async_trait;
use order_api_core::Order;
use order_api_web::{OrderHandler, RequestContext, WebResult};

/// Accepts every valid order and logs it.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingOrderHandler;

#[async_trait]
impl OrderHandler for LoggingOrderHandler {
    async fn put_order_id(&self, ctx: RequestContext, id: String, order: Order) -> WebResult<()> {
        tracing::info!(
            correlation_id = %ctx.correlation_id,
            %id,
            %order,
            "order received"
        );
        Ok(())
    }
}

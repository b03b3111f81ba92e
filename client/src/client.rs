//! Order API client implementation

use crate::{error::ClientError, response::PutOrderIdResponse};
use order_api_core::{
    DefinitionError, HttpMethod, JSON_CONTENT_TYPE, Order, PUT_ORDER_ID, PathTemplate, order_api,
};
use reqwest::{Client, Method, StatusCode, Url, header::CONTENT_TYPE};
use tracing::instrument;

/// Client for the Order API.
///
/// The request path and method come from the embedded API definition, so the
/// client always agrees with the dispatcher on the route.
///
/// # Example
///
/// ```no_run
/// use order_api_client::OrderClient;
/// use order_api_core::{Order, OrderItem};
///
/// # async fn example() -> Result<(), order_api_client::ClientError> {
/// let client = OrderClient::new("http://localhost:8088")?;
/// let order = Order::new().with_item(OrderItem::TeaTableGreen).with_price(14);
///
/// let response = client.put_order_id("234578", &order).await?;
/// println!("{}", response.status_code());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct OrderClient {
    client: Client,
    base_url: Url,
    method: Method,
    path: PathTemplate,
    success: StatusCode,
}

impl OrderClient {
    /// Create a client for the server at `base_url`.
    ///
    /// The URL must be `http` or `https`; a trailing `/` is added if missing
    /// so that a base path such as `http://host/api` is kept.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidBaseUrl`] for an unusable URL and
    /// [`ClientError::Definition`] if the embedded document fails to compile
    /// or declares an unusable success status.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base_url = normalize_base_url(base_url)?;

        let operation = order_api()?
            .operation(PUT_ORDER_ID)
            .ok_or_else(|| ClientError::MissingOperation(PUT_ORDER_ID.to_string()))?;

        let success = StatusCode::from_u16(operation.success_status()).map_err(|_| {
            DefinitionError::InvalidResponseStatus {
                operation: operation.id().to_string(),
                status: operation.success_status().to_string(),
            }
        })?;

        Ok(Self {
            client: Client::new(),
            base_url,
            method: reqwest_method(operation.method()),
            path: operation.path().clone(),
            success,
        })
    }

    /// Replace the underlying HTTP client (timeouts, TLS, pooling).
    #[must_use]
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// The normalized base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Full URL of the order with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Definition`] if `id` is empty, `.` or `..`
    /// (URL resolution would turn those into a different route), or if the
    /// path template has a variable other than `id`.
    pub fn order_url(&self, id: &str) -> Result<Url, ClientError> {
        let path = self.path.render(|name| (name == "id").then_some(id))?;
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ClientError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }

    /// Send `PUT /order/{id}` once.
    ///
    /// Absent order fields are left out of the body. Whatever status the
    /// server answers with is returned as a [`PutOrderIdResponse`].
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Definition`] for an id that cannot be sent as
    /// one path segment, [`ClientError::Encode`] if the body cannot be
    /// serialized and [`ClientError::Transport`] if no response was received.
    #[instrument(skip(self, order), fields(base_url = %self.base_url))]
    pub async fn put_order_id(&self, id: &str, order: &Order) -> Result<PutOrderIdResponse, ClientError> {
        let url = self.order_url(id)?;
        let body = serde_json::to_vec(order)?;

        tracing::debug!(%url, %order, "sending order");

        let response = self
            .client
            .request(self.method.clone(), url)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        tracing::debug!(status = status.as_u16(), "order response");
        Ok(PutOrderIdResponse::new(status, self.success, headers, body.to_vec()))
    }
}

fn normalize_base_url(raw: &str) -> Result<Url, ClientError> {
    let invalid = |reason: String| ClientError::InvalidBaseUrl {
        url: raw.to_string(),
        reason,
    };

    let mut url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!(
            "scheme must be http or https, got {}",
            url.scheme()
        )));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("URL cannot be a base".to_string()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

const fn reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Post => Method::POST,
        HttpMethod::Delete => Method::DELETE,
        HttpMethod::Patch => Method::PATCH,
    }
}

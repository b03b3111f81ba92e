//! In-memory tests of the `PUT /order/{id}` dispatcher.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    response::Response,
};
use order_api_core::{ApiDefinition, Order, OrderItem};
use order_api_testing::{RecordingHandler, fixtures, init_test_tracing};
use order_api_web::{CORRELATION_ID_HEADER, ErrorBody, RegisterError, register_handlers, register_handlers_with};
use std::sync::Arc;
use tower::ServiceExt;

fn app(handler: &RecordingHandler) -> Router {
    init_test_tracing();
    register_handlers(handler.clone()).unwrap()
}

fn put_json(path: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn error_body(response: Response) -> ErrorBody {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).expect("error responses carry a JSON body")
}

#[tokio::test]
async fn test_put_order_dispatches_to_handler() {
    let handler = RecordingHandler::new();

    let response = app(&handler)
        .oneshot(put_json("/order/234578", r#"{"item":"Tea Table Green","price":14}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(bytes.is_empty());

    let call = handler.last_call().unwrap();
    assert_eq!(call.id, fixtures::ORDER_ID);
    assert_eq!(call.order, fixtures::green_tea_table());
    assert_eq!(handler.call_count(), 1);
}

#[tokio::test]
async fn test_absent_and_null_fields_are_accepted() {
    let handler = RecordingHandler::new();
    let app = app(&handler);

    for body in ["{}", r#"{"price":-3}"#, r#"{"item":"Tea Table White","price":null}"#] {
        let response = app.clone().oneshot(put_json("/order/9", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED, "body {body}");
    }

    let orders: Vec<Order> = handler.calls().into_iter().map(|c| c.order).collect();
    assert_eq!(
        orders,
        vec![
            Order::new(),
            Order::new().with_price(-3),
            Order::new().with_item(OrderItem::TeaTableWhite),
        ]
    );
}

#[tokio::test]
async fn test_unknown_item_is_rejected_without_calling_handler() {
    let handler = RecordingHandler::new();

    let response = app(&handler)
        .oneshot(put_json("/order/1", r#"{"item":"Nonexistent Item"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = error_body(response).await;
    assert_eq!(body.code, "VALIDATION_ERROR");
    assert_eq!(body.details.len(), 1);
    assert!(body.details[0].contains("Nonexistent Item"));
    assert_eq!(handler.call_count(), 0);
}

#[tokio::test]
async fn test_every_violation_is_reported() {
    let handler = RecordingHandler::new();

    let response = app(&handler)
        .oneshot(put_json("/order/1", r#"{"item":7,"price":"fourteen"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_body(response).await.details.len(), 2);
    assert_eq!(handler.call_count(), 0);
}

#[tokio::test]
async fn test_malformed_body_does_not_stop_dispatcher() {
    let handler = RecordingHandler::new();
    let app = app(&handler);

    let response = app
        .clone()
        .oneshot(put_json("/order/1", r#"{"item": "Tea Table Green""#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_body(response).await.code, "MALFORMED_BODY");

    let response = app
        .oneshot(put_json("/order/2", r#"{"price":14}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(handler.last_call().unwrap().id, "2");
}

#[tokio::test]
async fn test_empty_body_is_rejected() {
    let handler = RecordingHandler::new();

    let response = app(&handler).oneshot(put_json("/order/1", "")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_body(response).await.code, "BAD_REQUEST");
    assert_eq!(handler.call_count(), 0);
}

#[tokio::test]
async fn test_wrong_content_type_is_unsupported() {
    let handler = RecordingHandler::new();

    let request = Request::builder()
        .method("PUT")
        .uri("/order/1")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from(r#"{"price":14}"#))
        .unwrap();
    let response = app(&handler).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(error_body(response).await.code, "UNSUPPORTED_MEDIA_TYPE");
    assert_eq!(handler.call_count(), 0);
}

#[tokio::test]
async fn test_json_content_type_parameters_are_allowed() {
    let handler = RecordingHandler::new();

    let request = Request::builder()
        .method("PUT")
        .uri("/order/1")
        .header(header::CONTENT_TYPE, "application/json; charset=utf-8")
        .body(Body::from(r#"{"price":14}"#))
        .unwrap();
    let response = app(&handler).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let handler = RecordingHandler::new();

    let response = app(&handler)
        .oneshot(put_json("/orders/1", "{}"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = error_body(response).await;
    assert_eq!(body.code, "NOT_FOUND");
    assert!(body.message.contains("/orders/1"));
}

#[tokio::test]
async fn test_undeclared_method_is_not_allowed() {
    let handler = RecordingHandler::new();

    let request = Request::builder()
        .method("GET")
        .uri("/order/1")
        .body(Body::empty())
        .unwrap();
    let response = app(&handler).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(handler.call_count(), 0);
}

#[tokio::test]
async fn test_correlation_id_reaches_handler_and_response() {
    let handler = RecordingHandler::new();
    let id = "0f1e2d3c-4b5a-4978-8695-a4b3c2d1e0f9";

    let request = Request::builder()
        .method("PUT")
        .uri("/order/1")
        .header(header::CONTENT_TYPE, "application/json")
        .header(CORRELATION_ID_HEADER, id)
        .body(Body::from("{}"))
        .unwrap();
    let response = app(&handler).oneshot(request).await.unwrap();

    assert_eq!(response.headers().get(CORRELATION_ID_HEADER).unwrap(), id);
    assert_eq!(handler.last_call().unwrap().correlation_id.to_string(), id);
}

#[tokio::test]
async fn test_handler_error_is_propagated() {
    let handler = RecordingHandler::failing(StatusCode::CONFLICT, "order 1 already exists");

    let response = app(&handler)
        .oneshot(put_json("/order/1", "{}"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = error_body(response).await;
    assert_eq!(body.code, "HANDLER_FAILED");
    assert_eq!(body.message, "order 1 already exists");
}

#[tokio::test]
async fn test_percent_encoded_id_is_decoded() {
    let handler = RecordingHandler::new();

    let response = app(&handler)
        .oneshot(put_json("/order/a%2Fb%20c", "{}"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(handler.last_call().unwrap().id, "a/b c");
}

#[tokio::test]
async fn test_register_with_definition_lacking_operation() {
    let yaml = r"
openapi: 3.0.3
info:
  title: Empty
  version: 0.0.1
paths: {}
";
    let definition = ApiDefinition::from_yaml(yaml).unwrap();

    let err = register_handlers_with(&definition, Arc::new(RecordingHandler::new())).unwrap_err();

    assert!(matches!(err, RegisterError::MissingOperation(ref id) if id == "PutOrderId"));
}

#[tokio::test]
async fn test_register_with_operation_lacking_request_body() {
    let yaml = r"
openapi: 3.0.3
info:
  title: Orders
  version: 0.0.1
paths:
  /order/{id}:
    put:
      operationId: PutOrderId
      parameters:
        - name: id
          in: path
          required: true
          schema:
            type: string
      responses:
        '201':
          description: Created
";
    let definition = ApiDefinition::from_yaml(yaml).unwrap();

    let err = register_handlers_with(&definition, Arc::new(RecordingHandler::new())).unwrap_err();

    assert!(matches!(err, RegisterError::MissingRequestBody(ref id) if id == "PutOrderId"));
}

#[tokio::test]
async fn test_oversized_body_is_payload_too_large() {
    let handler = RecordingHandler::new();
    let body = format!(r#"{{"item":"{}"}}"#, "x".repeat(3 * 1024 * 1024));

    let response = app(&handler)
        .oneshot(put_json("/order/1", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(error_body(response).await.code, "PAYLOAD_TOO_LARGE");
    assert_eq!(handler.call_count(), 0);
}

#[tokio::test]
async fn test_register_with_custom_success_status() {
    let yaml = r"
openapi: 3.0.3
info:
  title: Orders
  version: 2.0.0
paths:
  /v2/order/{id}:
    put:
      operationId: PutOrderId
      parameters:
        - name: id
          in: path
          required: true
          schema:
            type: string
      requestBody:
        required: true
        content:
          application/json:
            schema:
              type: object
              additionalProperties: false
              properties:
                price:
                  type: integer
      responses:
        '202':
          description: Accepted
";
    let definition = ApiDefinition::from_yaml(yaml).unwrap();
    let handler = RecordingHandler::new();
    let app = register_handlers_with(&definition, Arc::new(handler.clone())).unwrap();

    let response = app
        .clone()
        .oneshot(put_json("/v2/order/5", r#"{"price":1}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let response = app
        .oneshot(put_json("/v2/order/5", r#"{"price":1,"note":"x"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(handler.call_count(), 1);
}

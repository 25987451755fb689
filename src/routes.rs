//! HTTP router construction.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::{handlers, middleware, services::balance_service::BalanceService};

/// Build the application router around a balance service.
pub fn router(service: BalanceService) -> Router {
    // Routes that need a caller identity
    let api_routes = Router::new()
        .route(
            "/api/v1/balances",
            post(handlers::balances::create_balance).get(handlers::balances::list_balances),
        )
        .route(
            "/api/v1/balances/{id}",
            get(handlers::balances::get_balance)
                .patch(handlers::balances::update_balance)
                .delete(handlers::balances::delete_balance),
        )
        .route_layer(axum_middleware::from_fn(
            middleware::identity::identity_middleware,
        ));

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::{
        middleware::identity::USER_ID_HEADER, repositories::memory::MemoryBalanceStore,
    };

    fn app() -> (Router, Arc<MemoryBalanceStore>) {
        let store = Arc::new(MemoryBalanceStore::new());
        (router(BalanceService::new(store.clone())), store)
    }

    fn request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(USER_ID_HEADER, Uuid::new_v4().to_string());

        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let res = app.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn create(app: &Router, name: &str, initial_value: i64) -> Value {
        let (status, body) = send(
            app,
            request(
                "POST",
                "/api/v1/balances",
                Some(json!({ "name": name, "initialValue": initial_value })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body
    }

    #[tokio::test]
    async fn create_then_update_reports_used_value() {
        let (app, _) = app();

        let created = create(&app, "Travel", 1000).await;
        assert_eq!(created["initialValue"], 1000);
        assert_eq!(created["remainingValue"], 1000);
        assert_eq!(created["usedValue"], 0);

        let uri = format!("/api/v1/balances/{}", created["id"].as_str().unwrap());
        let (status, updated) = send(
            &app,
            request("PATCH", &uri, Some(json!({ "remainingValue": 400 }))),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["initialValue"], 1000);
        assert_eq!(updated["remainingValue"], 400);
        assert_eq!(updated["usedValue"], 600);
    }

    #[tokio::test]
    async fn list_uses_default_page_and_reports_total() {
        let (app, _) = app();
        for i in 0..17 {
            create(&app, &format!("Balance {i}"), 5).await;
        }

        let (status, body) = send(&app, request("GET", "/api/v1/balances", None)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["items"].as_array().unwrap().len(), 15);
        assert_eq!(body["total"], 17);
    }

    #[tokio::test]
    async fn list_applies_query_string() {
        let (app, _) = app();
        create(&app, "Travel", 5).await;
        create(&app, "Groceries", 5).await;

        let (status, body) = send(
            &app,
            request("GET", "/api/v1/balances?page=1&size=5&query=Groc", None),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 1);
        assert_eq!(body["items"][0]["name"], "Groceries");
    }

    #[tokio::test]
    async fn list_rejects_page_zero() {
        let (app, _) = app();

        let (status, body) = send(&app, request("GET", "/api/v1/balances?page=0", None)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "invalid_request");
    }

    #[tokio::test]
    async fn list_reports_unparseable_params_as_json() {
        let (app, _) = app();

        let (status, body) = send(&app, request("GET", "/api/v1/balances?page=abc", None)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "invalid_request");
        assert!(body["error"]["message"].as_str().is_some());
    }

    #[tokio::test]
    async fn get_unknown_balance_is_404() {
        let (app, _) = app();
        let uri = format!("/api/v1/balances/{}", Uuid::new_v4());

        let (status, body) = send(&app, request("GET", &uri, None)).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "balance_not_found");
    }

    #[tokio::test]
    async fn delete_without_payments_is_204_and_gone() {
        let (app, _) = app();
        let created = create(&app, "Old", 10).await;
        let uri = format!("/api/v1/balances/{}", created["id"].as_str().unwrap());

        let (status, _) = send(&app, request("DELETE", &uri, None)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, request("GET", &uri, None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_with_payment_is_409_and_kept() {
        let (app, store) = app();
        let created = create(&app, "Rent", 900).await;
        let id = created["id"].as_str().unwrap();
        store.add_payment(Uuid::parse_str(id).unwrap(), 300);
        let uri = format!("/api/v1/balances/{id}");

        let (status, body) = send(&app, request("DELETE", &uri, None)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(
            body["error"]["message"],
            "This user is already linked with a payment"
        );

        let (status, _) = send(&app, request("GET", &uri, None)).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_identity_is_401() {
        let (app, _) = app();
        let req = Request::builder()
            .method("GET")
            .uri("/api/v1/balances")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(&app, req).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "unauthorized");
    }

    #[tokio::test]
    async fn malformed_identity_is_401() {
        let (app, _) = app();
        let req = Request::builder()
            .method("GET")
            .uri("/api/v1/balances")
            .header(USER_ID_HEADER, "not-a-uuid")
            .body(Body::empty())
            .unwrap();

        let (status, _) = send(&app, req).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn health_does_not_need_identity() {
        let (app, _) = app();
        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(&app, req).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }
}

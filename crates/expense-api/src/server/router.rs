//! Axum router construction.

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::{handlers, middleware, state::AppState};

/// Build the application [`Router`] with all routes and middleware attached.
///
/// Basic authentication wraps every route, the fallback included, so an
/// unauthenticated request is rejected before routing.
pub fn build(state: AppState) -> Router {
    Router::new()
        .route(
            "/expenses",
            post(handlers::create_expense).get(handlers::list_expenses),
        )
        .route(
            "/expenses/:id",
            get(handlers::get_expense).put(handlers::update_expense),
        )
        .fallback(handlers::not_found)
        .layer(from_fn_with_state(
            state.credentials.clone(),
            middleware::require_basic_auth,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::middleware::{Credentials, BASIC_CHALLENGE};
    use crate::store::MockExpenseStore;
    use axum::{
        body::Body,
        http::{
            header::{AUTHORIZATION, WWW_AUTHENTICATE},
            HeaderValue, Request, StatusCode,
        },
    };
    use axum_test::TestServer;
    use common::{protocol::ErrorResponse, Expense, ExpenseInput};
    use serde_json::json;
    use std::sync::Arc;
    use tower::ServiceExt;

    /// `admin:admin`
    const ADMIN: &str = "Basic YWRtaW46YWRtaW4=";

    fn app(store: MockExpenseStore) -> Router {
        build(AppState::new(
            Arc::new(store),
            Credentials::new("admin", "admin"),
        ))
    }

    /// A store that fails the test if any method is called.
    fn untouched_store() -> MockExpenseStore {
        let mut store = MockExpenseStore::new();
        store.expect_create().never();
        store.expect_find_by_id().never();
        store.expect_list().never();
        store.expect_update().never();
        store
    }

    fn admin() -> HeaderValue {
        HeaderValue::from_static(ADMIN)
    }

    #[tokio::test]
    async fn every_route_requires_credentials() {
        let requests = [
            ("POST", "/expenses"),
            ("GET", "/expenses"),
            ("GET", "/expenses/1"),
            ("PUT", "/expenses/1"),
            ("GET", "/unknown"),
        ];

        for (method, uri) in requests {
            let req = Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap();
            let resp = app(untouched_store()).oneshot(req).await.unwrap();
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");
            assert_eq!(resp.headers()[WWW_AUTHENTICATE], BASIC_CHALLENGE);
        }
    }

    #[tokio::test]
    async fn wrong_password_is_rejected_before_storage() {
        let server = TestServer::new(app(untouched_store())).unwrap();

        // admin:wrongpassword
        let resp = server
            .get("/expenses")
            .add_header(
                AUTHORIZATION,
                HeaderValue::from_static("Basic YWRtaW46d3JvbmdwYXNzd29yZA=="),
            )
            .await;

        assert_eq!(resp.status_code(), StatusCode::UNAUTHORIZED);
        assert!(resp.text().is_empty());
    }

    #[tokio::test]
    async fn authenticated_request_reaches_handler() {
        let mut store = MockExpenseStore::new();
        store.expect_list().times(1).returning(|| Ok(Vec::new()));
        let server = TestServer::new(app(store)).unwrap();

        let resp = server.get("/expenses").add_header(AUTHORIZATION, admin()).await;

        assert_eq!(resp.status_code(), StatusCode::OK);
        assert_eq!(resp.json::<serde_json::Value>(), json!([]));
    }

    #[tokio::test]
    async fn create_then_read_round_trip() {
        let mut store = MockExpenseStore::new();
        store
            .expect_create()
            .returning(|input: &ExpenseInput| Ok(input.clone().with_id(42)));
        store
            .expect_find_by_id()
            .withf(|id| id == "42")
            .returning(|_| {
                Ok(Some(Expense {
                    id: 42,
                    title: "buy a new phone".into(),
                    amount: 39000.0,
                    note: "buy a new phone".into(),
                    tags: vec!["gadget".into(), "shopping".into()],
                }))
            });
        let server = TestServer::new(app(store)).unwrap();

        let created = server
            .post("/expenses")
            .add_header(AUTHORIZATION, admin())
            .json(&json!({
                "title": "buy a new phone",
                "amount": 39000,
                "note": "buy a new phone",
                "tags": ["gadget", "shopping"]
            }))
            .await;
        assert_eq!(created.status_code(), StatusCode::CREATED);
        let created = created.json::<Expense>();
        assert_ne!(created.id, 0);

        let fetched = server
            .get(&format!("/expenses/{}", created.id))
            .add_header(AUTHORIZATION, admin())
            .await;
        assert_eq!(fetched.status_code(), StatusCode::OK);
        assert_eq!(fetched.json::<Expense>(), created);
    }

    #[tokio::test]
    async fn unknown_route_returns_404_when_authenticated() {
        let req = Request::builder()
            .uri("/unknown")
            .header(AUTHORIZATION, ADMIN)
            .body(Body::empty())
            .unwrap();
        let resp = app(untouched_store()).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn not_found_body_is_an_error_message() {
        let server = TestServer::new(app(untouched_store())).unwrap();
        let resp = server.get("/nope").add_header(AUTHORIZATION, admin()).await;
        assert_eq!(resp.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            resp.json::<ErrorResponse>().message,
            "the requested resource does not exist"
        );
    }
}

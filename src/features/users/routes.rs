use crate::features::users::handlers::user_handler;
use crate::features::users::services::UserService;
use axum::{routing::get, Router};
use std::sync::Arc;

pub fn routes(service: Arc<UserService>) -> Router {
    Router::new()
        .route(
            "/api/users",
            get(user_handler::list_users).post(user_handler::create_user),
        )
        .route("/api/users/assignees", get(user_handler::list_assignees))
        .route(
            "/api/users/{id}",
            get(user_handler::get_user)
                .put(user_handler::update_user)
                .delete(user_handler::delete_user),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::users::models::{UserRole, UserStatus};
    use crate::features::users::repositories::InMemoryUserRepository;
    use crate::shared::test_helpers::user;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    fn app() -> Router {
        routes(Arc::new(UserService::new(Arc::new(
            InMemoryUserRepository::with_users(vec![
                user(1, "Son Heungmin", UserRole::Fixer, UserStatus::Active),
                user(2, "Hong Gildong", UserRole::Tester, UserStatus::Active),
            ]),
        ))))
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_assignees_route_is_not_shadowed_by_id() {
        let response = app()
            .oneshot(Request::get("/api/users/assignees").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
        assert_eq!(body["data"][0]["name"], "Son Heungmin");
        assert_eq!(body["data"][0]["role"], "Fixer");
    }

    #[tokio::test]
    async fn test_create_user_validates_email() {
        let request = Request::post("/api/users")
            .header("content-type", "application/json")
            .body(Body::from(
                r#"{"role": "Tester", "name": "Kim", "email": "nope"}"#,
            ))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_user() {
        let request = Request::post("/api/users")
            .header("content-type", "application/json")
            .body(Body::from(
                r#"{"role": "관리자", "name": "Kim Minjae", "email": "kim@example.com"}"#,
            ))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = body_json(response).await;
        assert_eq!(body["data"]["user_id"], 3);
        assert_eq!(body["data"]["role"], "Admin");
        assert_eq!(body["data"]["status"], "Active");
    }
}

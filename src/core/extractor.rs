use axum::{
    body::Body,
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Request},
    http::request::Parts,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;

use crate::core::error::AppError;
use crate::features::users::models::UserRole;
use crate::shared::constants::ACTOR_ROLE_HEADER;

/// Custom JSON extractor that provides consistent error responses
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppJsonRejection;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(value) => Ok(Self(value.0)),
            Err(rejection) => Err(AppJsonRejection(rejection)),
        }
    }
}

pub struct AppJsonRejection(JsonRejection);

impl IntoResponse for AppJsonRejection {
    fn into_response(self) -> Response {
        let message = match self.0 {
            JsonRejection::JsonDataError(err) => format!("Invalid JSON data: {}", err),
            JsonRejection::JsonSyntaxError(err) => format!("Invalid JSON syntax: {}", err),
            JsonRejection::MissingJsonContentType(err) => {
                format!("Missing JSON content type: {}", err)
            }
            _ => "Failed to parse JSON body".to_string(),
        };

        AppError::BadRequest(message).into_response()
    }
}

/// Role of the caller, taken from the `X-Actor-Role` header.
///
/// There is no authentication layer; a missing or unknown role is treated as
/// a tester, the least privileged role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorRole(pub UserRole);

impl ActorRole {
    pub fn from_header(raw: Option<&str>) -> Self {
        Self(
            raw.and_then(|value| value.parse::<UserRole>().ok())
                .unwrap_or(UserRole::Tester),
        )
    }
}

impl<S> FromRequestParts<S> for ActorRole
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(ACTOR_ROLE_HEADER)
            .and_then(|value| value.to_str().ok());

        Ok(Self::from_header(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_role_from_header() {
        assert_eq!(ActorRole::from_header(Some("관리자")).0, UserRole::Admin);
        assert_eq!(ActorRole::from_header(Some("조치자")).0, UserRole::Fixer);
        assert_eq!(ActorRole::from_header(Some(" admin ")).0, UserRole::Admin);
        assert_eq!(ActorRole::from_header(Some("qa")).0, UserRole::Qa);
        assert_eq!(ActorRole::from_header(Some("root")).0, UserRole::Tester);
        assert_eq!(ActorRole::from_header(None).0, UserRole::Tester);
    }
}

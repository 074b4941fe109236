use axum::{
    body::Body,
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts, Query, Request,
    },
    http::request::Parts,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;

use crate::core::error::AppError;
use crate::shared::constants::ACCOUNT_ID_HEADER;
use crate::shared::validation::EXTERNAL_ID_REGEX;

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

/// Query-string extractor whose rejections use the error envelope
pub struct AppQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for AppQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Query::<T>::from_request_parts(parts, state)
            .await
            .map(|value| Self(value.0))
            .map_err(|rejection: QueryRejection| {
                AppError::BadRequest(format!("Invalid query parameters: {}", rejection.body_text()))
            })
    }
}

/// Account acting on the request, from the `X-Account-Id` header
///
/// Absent for anonymous calls; recorded in audit fields only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Actor(pub Option<String>);

impl Actor {
    pub fn account_id(&self) -> Option<String> {
        self.0.clone()
    }
}

impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(ACCOUNT_ID_HEADER) else {
            return Ok(Actor(None));
        };

        let account_id = value
            .to_str()
            .map_err(|_| AppError::BadRequest("Invalid X-Account-Id header".to_string()))?
            .trim();

        if account_id.is_empty() {
            return Ok(Actor(None));
        }
        if !EXTERNAL_ID_REGEX.is_match(account_id) {
            return Err(AppError::BadRequest(format!(
                "Invalid X-Account-Id header: '{}'",
                account_id
            )));
        }

        Ok(Actor(Some(account_id.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request as HttpRequest;

    async fn extract(header: Option<&str>) -> Result<Actor, AppError> {
        let mut builder = HttpRequest::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header(ACCOUNT_ID_HEADER, value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        Actor::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_actor_from_header() {
        assert_eq!(
            extract(Some("acc-42")).await.unwrap(),
            Actor(Some("acc-42".to_string()))
        );
        assert_eq!(extract(None).await.unwrap(), Actor(None));
        assert_eq!(extract(Some("  ")).await.unwrap(), Actor(None));
    }

    #[tokio::test]
    async fn test_actor_rejects_bad_ids() {
        assert!(matches!(
            extract(Some("a/b")).await,
            Err(AppError::BadRequest(_))
        ));
    }
}

//! User context middleware
//!
//! Reads the optional `X-User-Id` header so task queries can be narrowed to
//! one user's tasks. This is a filter only, not authentication.

use axum::{
    extract::Request,
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::AppError;

/// Header carrying the caller's user id
pub const USER_ID_HEADER: &str = "x-user-id";

/// Which user's tasks a request is about; `None` means all users
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UserContext(pub Option<i64>);

impl UserContext {
    pub fn user_id(&self) -> Option<i64> {
        self.0
    }

    /// Parse the user id header. Absent is fine; present but not an integer is not.
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, AppError> {
        let Some(value) = headers.get(USER_ID_HEADER) else {
            return Ok(UserContext(None));
        };

        value
            .to_str()
            .ok()
            .and_then(|v| v.trim().parse::<i64>().ok())
            .map(|id| UserContext(Some(id)))
            .ok_or_else(|| AppError::Validation {
                field: "X-User-Id".to_string(),
                message: "X-User-Id must be an integer user id".to_string(),
            })
    }
}

/// Middleware that resolves the user context once and stores it in request extensions
pub async fn user_context_middleware(mut request: Request, next: Next) -> Response {
    match UserContext::from_headers(request.headers()) {
        Ok(context) => {
            if let Some(user_id) = context.user_id() {
                tracing::debug!(user_id, "Request scoped to user");
            }
            request.extensions_mut().insert(context);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for UserContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Routes without the middleware still get the header honoured
        match parts.extensions.get::<UserContext>() {
            Some(context) => Ok(*context),
            None => UserContext::from_headers(&parts.headers),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_missing_header_means_all_users() {
        let headers = HeaderMap::new();
        assert_eq!(UserContext::from_headers(&headers).unwrap(), UserContext(None));
    }

    #[test]
    fn test_parses_user_id() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_static(" 42 "));
        assert_eq!(
            UserContext::from_headers(&headers).unwrap().user_id(),
            Some(42)
        );
    }

    #[test]
    fn test_rejects_malformed_user_id() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_static("alice"));
        match UserContext::from_headers(&headers) {
            Err(AppError::Validation { field, .. }) => assert_eq!(field, "X-User-Id"),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}

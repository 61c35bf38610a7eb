//! Authentication extractors.
//!
//! Handlers opt into authentication by taking [`RequireAuth`] or
//! [`RequireAdmin`] as an argument. The token is read from the
//! `Authorization: Bearer` header first, falling back to a `token` cookie;
//! when both are present the header wins.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::error::AppError;
use crate::models::Identity;
use crate::services::auth::AuthError;
use crate::state::AppState;

/// Extractor that requires a valid bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn me(RequireAuth(identity): RequireAuth) -> impl IntoResponse {
///     Json(identity)
/// }
/// ```
pub struct RequireAuth(pub Identity);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(parts).ok_or(AppError::Auth(AuthError::MissingCredentials))?;
        let identity = state.tokens().verify(&token)?;

        Ok(Self(identity))
    }
}

/// Extractor that requires a valid bearer token with the admin role.
///
/// Rejects with 401 when unauthenticated and 403 when authenticated as a
/// non-admin.
pub struct RequireAdmin(pub Identity);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireAuth(identity) = RequireAuth::from_request_parts(parts, state).await?;

        if !identity.is_admin() {
            return Err(AppError::Forbidden(
                "Only admins can access this resource".to_owned(),
            ));
        }

        Ok(Self(identity))
    }
}

/// Pull the token out of the request, header before cookie.
fn extract_token(parts: &Parts) -> Option<String> {
    if let Some(token) = bearer_token(parts) {
        return Some(token);
    }

    cookie_token(parts)
}

fn bearer_token(parts: &Parts) -> Option<String> {
    let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();

    if token.is_empty() {
        return None;
    }

    Some(token.to_owned())
}

fn cookie_token(parts: &Parts) -> Option<String> {
    let value = parts.headers.get(header::COOKIE)?.to_str().ok()?;

    value
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == "token")
        .map(|(_, token)| token.to_owned())
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri("/api/orders");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_bearer_header_extracted() {
        let parts = parts(&[("authorization", "Bearer abc.def")]);
        assert_eq!(extract_token(&parts).as_deref(), Some("abc.def"));
    }

    #[test]
    fn test_cookie_fallback() {
        let parts = parts(&[("cookie", "theme=dark; token=abc.def; lang=en")]);
        assert_eq!(extract_token(&parts).as_deref(), Some("abc.def"));
    }

    #[test]
    fn test_header_wins_over_cookie() {
        let parts = parts(&[
            ("authorization", "Bearer from-header"),
            ("cookie", "token=from-cookie"),
        ]);
        assert_eq!(extract_token(&parts).as_deref(), Some("from-header"));
    }

    #[test]
    fn test_missing_credentials() {
        assert_eq!(extract_token(&parts(&[])), None);
        assert_eq!(extract_token(&parts(&[("authorization", "Basic abc")])), None);
        assert_eq!(extract_token(&parts(&[("authorization", "Bearer ")])), None);
        assert_eq!(extract_token(&parts(&[("cookie", "token=")])), None);
    }
}

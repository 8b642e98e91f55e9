use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};

use crate::auth::Claims;
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated principal resolved from the bearer token.
///
/// Handlers take `Option<AuthUser>`; `None` means no principal could be
/// resolved and the workflow answers 401 before touching the database.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: String,
    pub email: Option<String>,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = extract_jwt_from_headers(&parts.headers).map_err(|msg| {
            tracing::debug!("No principal: {}", msg);
            ApiError::unauthorized()
        })?;

        let claims = state.auth.validate_jwt(&token).map_err(|e| {
            tracing::debug!("No principal: {}", e);
            ApiError::unauthorized()
        })?;

        if claims.sub.trim().is_empty() {
            return Err(ApiError::unauthorized());
        }

        Ok(AuthUser::from(claims))
    }
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, &'static str> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or("Missing Authorization header")?;

    let auth_str = auth_header.to_str().map_err(|_| "Invalid Authorization header format")?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token");
        }
        Ok(token.trim().to_string())
    } else {
        Err("Authorization header must use Bearer token format")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn extracts_bearer_tokens() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(extract_jwt_from_headers(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn rejects_other_schemes() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Basic Zm9vOmJhcg=="));
        assert!(extract_jwt_from_headers(&headers).is_err());

        headers.insert("authorization", HeaderValue::from_static("Bearer   "));
        assert!(extract_jwt_from_headers(&headers).is_err());

        assert!(extract_jwt_from_headers(&HeaderMap::new()).is_err());
    }
}

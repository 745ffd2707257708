//! Middleware de autenticação

use axum::{
    extract::{FromRequestParts, Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use sfera_auth_core::{Claims, TokenService};
use tracing::{debug, warn};

/// Extrator dos Claims já validados
///
/// Só funciona em rotas atrás do `auth_middleware`, que injeta os
/// claims nas extensões da requisição.
pub struct AuthClaims(pub Claims);

impl<S> FromRequestParts<S> for AuthClaims
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthClaims)
            .ok_or((
                StatusCode::UNAUTHORIZED,
                "Missing claims in request extensions (auth_middleware may not have run)",
            ))
    }
}

/// Middleware de autenticação JWT
///
/// Valida o token do cabeçalho Authorization e injeta os claims na
/// requisição.
pub async fn auth_middleware(
    State(token_service): State<TokenService>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok());

    match auth_header {
        Some(header) if header.starts_with("Bearer ") => {
            let token = &header[7..];
            debug!("Validating JWT token");

            match token_service.validate_token(token) {
                Ok(claims) => {
                    debug!(user_id = %claims.sub, "Token validated successfully");

                    let mut request = request;
                    request.extensions_mut().insert(claims);

                    Ok(next.run(request).await)
                }
                Err(e) => {
                    warn!(error = %e, "Token validation failed");
                    Err(StatusCode::UNAUTHORIZED)
                }
            }
        }
        _ => {
            warn!("Missing or invalid authorization header");
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        middleware,
        routing::get,
    };
    use sfera_common::UserId;
    use tower::ServiceExt;

    async fn handler() -> impl axum::response::IntoResponse {
        "OK"
    }

    fn app(token_service: TokenService) -> Router {
        Router::new()
            .route("/", get(handler))
            .layer(middleware::from_fn_with_state(
                token_service,
                auth_middleware,
            ))
    }

    #[tokio::test]
    async fn test_auth_middleware_valid_token() {
        let token_service = TokenService::new("test_secret", 3600);
        let token = token_service
            .generate_token(UserId(1), "Admin", "admin@sferati.com.br", "admin")
            .unwrap();

        let req = Request::builder()
            .uri("/")
            .header("Authorization", format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();

        let response = app(token_service).oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_auth_middleware_invalid_token() {
        let token_service = TokenService::new("test_secret", 3600);

        let req = Request::builder()
            .uri("/")
            .header("Authorization", "Bearer invalid_token")
            .body(Body::empty())
            .unwrap();

        let response = app(token_service).oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_auth_middleware_missing_header() {
        let token_service = TokenService::new("test_secret", 3600);

        let req = Request::builder().uri("/").body(Body::empty()).unwrap();

        let response = app(token_service).oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_auth_middleware_expired_token() {
        let token_service = TokenService::new("test_secret", -3600);
        let token = token_service
            .generate_token(UserId(1), "Admin", "admin@sferati.com.br", "admin")
            .unwrap();

        let req = Request::builder()
            .uri("/")
            .header("Authorization", format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();

        let response = app(token_service).oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}

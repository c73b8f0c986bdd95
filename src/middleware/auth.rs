use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::Config;
use crate::services::auth_service::{ROLE_ADMIN, ROLE_CLIENT};
use crate::services::AuthService;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Client,
    Admin,
}

#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
}

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
}

pub fn is_admin(role: &Role) -> bool {
    matches!(role, Role::Admin)
}

fn parse_role(role_str: &str) -> Role {
    match role_str {
        ROLE_ADMIN => Role::Admin,
        ROLE_CLIENT => Role::Client,
        _ => Role::Client,
    }
}

// Middleware pour exposer AppState dans les extensions
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    request.extensions_mut().insert(state);
    next.run(request).await
}

// Extracteur de l'utilisateur authentifié (client ou admin)
#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let app_state = parts.extensions.get::<AppState>().cloned().ok_or_else(|| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Internal server error"})),
            )
                .into_response()
        })?;

        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"error": "Missing authorization header"})),
                )
                    .into_response()
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "Invalid authorization header format"})),
            )
                .into_response()
        })?;

        let auth_service = AuthService::new(app_state.config);
        let claims = auth_service.verify_token(token).map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "Invalid or expired token"})),
            )
                .into_response()
        })?;

        if claims.token_type != "session" {
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "Invalid token type"})),
            )
                .into_response());
        }

        let id = Uuid::parse_str(&claims.sub).map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "Invalid subject in token"})),
            )
                .into_response()
        })?;

        let role = parse_role(&claims.role);

        Ok(AuthUser { id, role })
    }
}

//! Authentication middleware for JWT token validation and role guards

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use tracing::{debug, warn};

use crate::{error::ApiError, models::AuthUser, state::AppState};

/// Validate the bearer token and insert the caller into the request extensions
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or(ApiError::Unauthorized)?;

    let claims = state
        .jwt_service
        .validate_token(bearer.token())
        .map_err(|e| {
            debug!("Rejected bearer token: {}", e);
            ApiError::Unauthorized
        })?;

    req.extensions_mut().insert(AuthUser::from(claims));

    Ok(next.run(req).await)
}

/// Allow admins and managers only. Runs after `auth_middleware`.
pub async fn require_staff(req: Request, next: Next) -> Result<Response, ApiError> {
    let user = current_user(&req)?;
    if !user.role.is_staff() {
        warn!("User {} ({}) denied staff access", user.id, user.role.as_str());
        return Err(ApiError::Forbidden);
    }

    Ok(next.run(req).await)
}

/// Allow admins only. Runs after `auth_middleware`.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, ApiError> {
    let user = current_user(&req)?;
    if user.role != crate::models::Role::Admin {
        warn!("User {} ({}) denied admin access", user.id, user.role.as_str());
        return Err(ApiError::Forbidden);
    }

    Ok(next.run(req).await)
}

fn current_user(req: &Request) -> Result<&AuthUser, ApiError> {
    req.extensions()
        .get::<AuthUser>()
        .ok_or(ApiError::Unauthorized)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(ApiError::Unauthorized)
    }
}

//! Login and token verification

use axum::extract::State;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult, JsonBody},
    models::{AuthUser, Role, User, UserProfile},
    password::verify_password,
    response::ApiResponse,
    state::{AppState, BOOTSTRAP_ADMIN_ID},
};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
    pub user: UserProfile,
}

fn issue_token(state: &AppState, user: UserProfile) -> ApiResult<LoginResponse> {
    let token = state
        .jwt_service
        .generate_token(user.id, &user.email, user.role)
        .map_err(|e| {
            error!("Failed to sign token: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(LoginResponse {
        token,
        token_type: "Bearer",
        expires_in: state.jwt_service.token_expiry(),
        user,
    })
}

/// Exchange email and password for a bearer token
pub async fn login(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> ApiResult<ApiResponse<LoginResponse>> {
    let email = request.email.trim();
    if email.is_empty() || request.password.is_empty() {
        return Err(ApiError::validation("Email and password are required"));
    }

    match state.user_repository.find_by_email(email).await {
        Ok(found) => {
            let user = check_credentials(found, &request.password)?;

            if let Err(e) = state.user_repository.touch_last_login(user.id).await {
                warn!("Failed to record login time for {}: {}", user.id, e);
            }

            info!("User {} logged in", user.id);
            let response = issue_token(&state, UserProfile::from(&user))?;
            Ok(ApiResponse::ok(response).with_message("Login successful"))
        }
        Err(e) => {
            let Some(admin) = state
                .bootstrap_admin
                .as_ref()
                .filter(|admin| admin.matches_email(email))
            else {
                return Err(e.into());
            };

            if !admin.verify(&request.password) {
                warn!("Failed bootstrap admin login");
                return Err(ApiError::InvalidCredentials);
            }

            warn!("User lookup failed ({}), logging in the bootstrap admin", e);
            let response = issue_token(&state, admin.profile())?;
            Ok(ApiResponse::ok(response).with_message("Login successful"))
        }
    }
}

/// Accept a stored account only when it is active and the password matches
fn check_credentials(user: Option<User>, password: &str) -> ApiResult<User> {
    match user {
        Some(user) if user.is_active && verify_password(password, &user.password_hash) => {
            Ok(user)
        }
        Some(user) => {
            warn!("Failed login for user {}", user.id);
            Err(ApiError::InvalidCredentials)
        }
        None => {
            debug!("Failed login for unknown email");
            Err(ApiError::InvalidCredentials)
        }
    }
}

/// The user behind the bearer token
pub async fn verify(
    State(state): State<AppState>,
    caller: AuthUser,
) -> ApiResult<ApiResponse<UserProfile>> {
    match state.user_repository.find_by_id(caller.id).await {
        Ok(Some(user)) if user.is_active => Ok(ApiResponse::ok(UserProfile::from(&user))),
        Ok(Some(_)) => Err(ApiError::Unauthorized),
        Ok(None) => match state.bootstrap_admin.as_ref() {
            Some(admin) if caller.id == BOOTSTRAP_ADMIN_ID => Ok(ApiResponse::ok(admin.profile())),
            _ => Err(ApiError::Unauthorized),
        },
        Err(e) => {
            warn!("User lookup failed ({}), answering from token claims", e);
            Ok(ApiResponse::ok(profile_from_claims(&state, caller)))
        }
    }
}

fn profile_from_claims(state: &AppState, caller: AuthUser) -> UserProfile {
    match state.bootstrap_admin.as_ref() {
        Some(admin) if caller.id == BOOTSTRAP_ADMIN_ID => admin.profile(),
        _ => UserProfile {
            id: caller.id,
            name: caller.email.clone(),
            email: caller.email,
            role: caller.role,
        },
    }
}

/// Id to record as `created_by`; the bootstrap admin has no user row
pub fn actor_id(caller: &AuthUser) -> Option<Uuid> {
    (caller.id != BOOTSTRAP_ADMIN_ID && caller.role == Role::Admin).then_some(caller.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::hash_password;
    use chrono::Utc;

    fn user(password: &str, is_active: bool) -> User {
        User {
            id: Uuid::new_v4(),
            email: "fishmonger@example.com".to_string(),
            name: "Fishmonger".to_string(),
            password_hash: hash_password(password).unwrap(),
            role: Role::Manager,
            is_active,
            created_by: None,
            last_login_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_active_user_with_matching_password_is_accepted() {
        let account = user("catch-of-the-day", true);
        let id = account.id;

        let accepted = check_credentials(Some(account), "catch-of-the-day").unwrap();
        assert_eq!(accepted.id, id);
    }

    #[test]
    fn test_wrong_password_is_rejected() {
        let result = check_credentials(Some(user("catch-of-the-day", true)), "low-tide");
        assert!(matches!(result, Err(ApiError::InvalidCredentials)));
    }

    #[test]
    fn test_inactive_user_cannot_log_in() {
        let result = check_credentials(Some(user("catch-of-the-day", false)), "catch-of-the-day");
        assert!(matches!(result, Err(ApiError::InvalidCredentials)));
    }

    #[test]
    fn test_unknown_email_is_rejected() {
        assert!(matches!(
            check_credentials(None, "catch-of-the-day"),
            Err(ApiError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_bootstrap_admin_is_never_recorded_as_creator() {
        let bootstrap = AuthUser {
            id: BOOTSTRAP_ADMIN_ID,
            email: "admin@example.com".to_string(),
            role: Role::Admin,
        };
        let admin = AuthUser {
            id: Uuid::new_v4(),
            ..bootstrap.clone()
        };

        assert_eq!(actor_id(&bootstrap), None);
        assert_eq!(actor_id(&admin), Some(admin.id));
    }
}

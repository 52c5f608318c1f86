//! Admin user management (admins only)

use axum::extract::{Path, State};
use tracing::info;
use uuid::Uuid;

use super::Deleted;
use crate::{
    error::{ApiError, ApiResult, JsonBody, QueryParams},
    models::{AuthUser, NewUser, Page, Pagination, Role, UpdateUser, User},
    password::hash_password,
    repositories::UserRecord,
    response::ApiResponse,
    routes::auth::actor_id,
    state::AppState,
    validation::{validate_email, validate_name, validate_password},
};

pub async fn list_users(
    State(state): State<AppState>,
    QueryParams(pagination): QueryParams<Pagination>,
) -> ApiResult<ApiResponse<Page<User>>> {
    let users = state.user_repository.list(&pagination).await?;
    Ok(ApiResponse::ok(users))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<ApiResponse<User>> {
    let user = state
        .user_repository
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;

    Ok(ApiResponse::ok(user))
}

pub async fn create_user(
    State(state): State<AppState>,
    caller: AuthUser,
    JsonBody(new_user): JsonBody<NewUser>,
) -> ApiResult<ApiResponse<User>> {
    let email = new_user.email.trim().to_lowercase();
    let name = new_user.name.trim().to_string();
    validate_email(&email).map_err(ApiError::Validation)?;
    validate_name("Name", &name).map_err(ApiError::Validation)?;
    validate_password(&new_user.password).map_err(ApiError::Validation)?;

    let record = UserRecord {
        email,
        name,
        password_hash: hash_password(&new_user.password)?,
        role: new_user.role.unwrap_or(Role::Customer),
        is_active: new_user.is_active.unwrap_or(true),
    };

    let user = state
        .user_repository
        .create(&record, actor_id(&caller))
        .await?;

    info!("User {} created user {}", caller.id, user.id);
    Ok(ApiResponse::created(user).with_message("User created"))
}

pub async fn update_user(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
    JsonBody(update): JsonBody<UpdateUser>,
) -> ApiResult<ApiResponse<User>> {
    let existing = state
        .user_repository
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;

    check_self_update(&caller, id, &update)?;

    let mut record = UserRecord::from(&existing);

    if let Some(email) = update.email {
        let email = email.trim().to_lowercase();
        validate_email(&email).map_err(ApiError::Validation)?;
        record.email = email;
    }

    if let Some(name) = update.name {
        let name = name.trim().to_string();
        validate_name("Name", &name).map_err(ApiError::Validation)?;
        record.name = name;
    }

    if let Some(password) = update.password {
        validate_password(&password).map_err(ApiError::Validation)?;
        record.password_hash = hash_password(&password)?;
    }

    if let Some(role) = update.role {
        record.role = role;
    }

    if let Some(is_active) = update.is_active {
        record.is_active = is_active;
    }

    let user = state
        .user_repository
        .update(id, &record)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;

    info!("User {} updated user {}", caller.id, user.id);
    Ok(ApiResponse::ok(user).with_message("User updated"))
}

pub async fn delete_user(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<ApiResponse<Deleted>> {
    if caller.id == id {
        return Err(ApiError::validation("You cannot delete your own account"));
    }

    if !state.user_repository.delete(id).await? {
        return Err(ApiError::not_found("User"));
    }

    info!("User {} deleted user {}", caller.id, id);
    Ok(ApiResponse::ok(Deleted { id }).with_message("User deleted"))
}

/// Admins may not lock themselves out
fn check_self_update(caller: &AuthUser, id: Uuid, update: &UpdateUser) -> ApiResult<()> {
    if caller.id != id {
        return Ok(());
    }

    if update.is_active == Some(false) {
        return Err(ApiError::validation("You cannot deactivate your own account"));
    }

    if update.role.is_some_and(|role| role != Role::Admin) {
        return Err(ApiError::validation("You cannot remove your own admin role"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            email: "admin@example.com".to_string(),
            role: Role::Admin,
        }
    }

    #[test]
    fn test_admin_cannot_lock_themselves_out() {
        let caller = admin();
        let deactivate = UpdateUser {
            is_active: Some(false),
            ..Default::default()
        };
        let demote = UpdateUser {
            role: Some(Role::Manager),
            ..Default::default()
        };

        assert!(check_self_update(&caller, caller.id, &deactivate).is_err());
        assert!(check_self_update(&caller, caller.id, &demote).is_err());
        assert!(check_self_update(&caller, Uuid::new_v4(), &deactivate).is_ok());
        assert!(
            check_self_update(
                &caller,
                caller.id,
                &UpdateUser {
                    name: Some("Head Fishmonger".to_string()),
                    ..Default::default()
                }
            )
            .is_ok()
        );
    }
}

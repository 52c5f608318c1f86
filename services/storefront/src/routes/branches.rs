//! Public branch endpoints

use axum::{
    Router,
    extract::{Path, State},
    routing::get,
};
use common::{Fetched, with_fallback};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    fallback_data,
    models::Branch,
    response::ApiResponse,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/branches", get(list_branches))
        .route("/branches/:id", get(get_branch))
}

/// Active branches in display order
pub async fn list_branches(State(state): State<AppState>) -> ApiResponse<Vec<Branch>> {
    let fetched = with_fallback("branches", state.branch_repository.list(true), || {
        let mut branches: Vec<Branch> = fallback_data::branches()
            .into_iter()
            .filter(|b| b.is_active)
            .collect();
        branches.sort_by(|a, b| (a.sort_order, &a.name).cmp(&(b.sort_order, &b.name)));
        branches
    })
    .await;

    ApiResponse::from_fetched(fetched)
}

pub async fn get_branch(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<ApiResponse<Branch>> {
    let fetched = with_fallback(
        "branch by id",
        state.branch_repository.find_by_id(id, true),
        || {
            fallback_data::branches()
                .into_iter()
                .find(|b| b.id == id && b.is_active)
        },
    )
    .await;

    let source = fetched.source;
    let branch = fetched.data.ok_or_else(|| ApiError::not_found("Branch"))?;

    Ok(ApiResponse::from_fetched(Fetched {
        data: branch,
        source,
    }))
}

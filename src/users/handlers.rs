use axum::{extract::State, http::StatusCode, Json};
use tracing::{error, info, instrument};

use super::extract::{Payload, UserIdParam};
use super::model::{NewUser, User};
use crate::{error::ApiError, state::AppState};

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    let users = state.users.list().await.map_err(|e| {
        error!(error = %e, "list users failed");
        ApiError::Internal("Error fetching users")
    })?;
    Ok(Json(users))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    UserIdParam(user_id): UserIdParam,
) -> Result<Json<User>, ApiError> {
    match state.users.get(user_id).await {
        Ok(Some(user)) => Ok(Json(user)),
        Ok(None) => Err(ApiError::NotFound),
        Err(e) => {
            error!(error = %e, %user_id, "get user failed");
            Err(ApiError::Internal("Error fetching user"))
        }
    }
}

#[instrument(skip(state, body))]
pub async fn create_user(
    State(state): State<AppState>,
    Payload(body): Payload<NewUser>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let user = state.users.insert(body).await.map_err(|e| {
        error!(error = %e, "create user failed");
        ApiError::Internal("Error creating user")
    })?;
    info!(user_id = user.user_id, "user created");
    Ok((StatusCode::CREATED, Json(user)))
}

/// Full replace: every mutable column is taken from the body.
#[instrument(skip(state, body))]
pub async fn update_user(
    State(state): State<AppState>,
    UserIdParam(user_id): UserIdParam,
    Payload(body): Payload<NewUser>,
) -> Result<Json<User>, ApiError> {
    state.users.update(user_id, &body).await.map_err(|e| {
        error!(error = %e, %user_id, "update user failed");
        ApiError::Internal("Error updating user")
    })?;
    info!(%user_id, "user updated");
    Ok(Json(body.with_id(user_id)))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    UserIdParam(user_id): UserIdParam,
) -> Result<StatusCode, ApiError> {
    state.users.delete(user_id).await.map_err(|e| {
        error!(error = %e, %user_id, "delete user failed");
        ApiError::Internal("Error deleting user")
    })?;
    info!(%user_id, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}

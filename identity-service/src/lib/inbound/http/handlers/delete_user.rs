use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserDirectoryPort;
use crate::inbound::http::router::AppState;

pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<ApiSuccess<DeleteUserResponseData>, ApiError> {
    let user_id = UserId::from_string(&user_id)
        .map_err(|e| ApiError::UnprocessableEntity(e.to_string()))?;

    state.user_service.delete_user(&user_id).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        DeleteUserResponseData {
            message: "User deleted".to_string(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteUserResponseData {
    pub message: String,
}

//! Correspondence API handlers.
//!
//! Each handler takes the caller from the bearer token and delegates to
//! [`CorrespondenceService`]; error kinds become HTTP statuses in [`ApiError`].

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::correspondence::{
    CorrespondencePreview, CorrespondenceService, CorrespondenceView, MessageView,
    StartCorrespondence,
};
use crate::web::dto::{
    ApiResponse, EditCorrespondenceRequest, MessageRequest, StartCorrespondenceRequest,
    ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::middleware::AuthUser;

use super::AppState;

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// GET /api/correspondences - List the caller's correspondences.
pub async fn list_correspondences(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> ApiResult<Vec<CorrespondencePreview>> {
    let service = CorrespondenceService::new(&state.db);
    let list = service.list_for_user(auth.user_id()).await?;
    Ok(Json(ApiResponse::new(list)))
}

/// GET /api/correspondences/:id - Get a correspondence with its messages.
pub async fn get_correspondence(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<CorrespondenceView> {
    let service = CorrespondenceService::new(&state.db);
    let view = service.get_with_messages(id, auth.user_id()).await?;
    Ok(Json(ApiResponse::new(view)))
}

/// POST /api/correspondences - Start a correspondence.
pub async fn start_correspondence(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<StartCorrespondenceRequest>,
) -> ApiResult<CorrespondencePreview> {
    let request = StartCorrespondence::new(req.name, req.message.text, req.participant_ids);
    let service = CorrespondenceService::new(&state.db);
    let preview = service
        .start_correspondence(&request, auth.user_id())
        .await?;
    Ok(Json(ApiResponse::new(preview)))
}

/// PUT /api/correspondences/:id - Rename a correspondence.
pub async fn edit_correspondence(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<EditCorrespondenceRequest>,
) -> ApiResult<CorrespondencePreview> {
    let service = CorrespondenceService::new(&state.db);
    let preview = service.edit(id, &req.name, auth.user_id()).await?;
    Ok(Json(ApiResponse::new(preview)))
}

/// DELETE /api/correspondences/:id - Delete a correspondence.
pub async fn delete_correspondence(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<CorrespondencePreview> {
    let service = CorrespondenceService::new(&state.db);
    let preview = service.delete(id, auth.user_id()).await?;
    Ok(Json(ApiResponse::new(preview)))
}

/// POST /api/correspondences/:id/users/:user_id - Add a member.
pub async fn add_user(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path((id, user_id)): Path<(i64, i64)>,
) -> ApiResult<CorrespondencePreview> {
    let service = CorrespondenceService::new(&state.db);
    let preview = service.add_user(id, user_id, auth.user_id()).await?;
    Ok(Json(ApiResponse::new(preview)))
}

/// DELETE /api/correspondences/:id/users/:user_id - Remove a member.
pub async fn remove_user(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path((id, user_id)): Path<(i64, i64)>,
) -> ApiResult<CorrespondencePreview> {
    let service = CorrespondenceService::new(&state.db);
    let preview = service.remove_user(id, user_id, auth.user_id()).await?;
    Ok(Json(ApiResponse::new(preview)))
}

/// POST /api/correspondences/:id/messages - Send a message.
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<MessageRequest>,
) -> ApiResult<MessageView> {
    let service = CorrespondenceService::new(&state.db);
    let message = service.send_message(id, &req.text, auth.user_id()).await?;
    Ok(Json(ApiResponse::new(message)))
}

/// PUT /api/correspondences/messages/:message_id - Edit a message.
pub async fn edit_message(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(message_id): Path<i64>,
    ValidatedJson(req): ValidatedJson<MessageRequest>,
) -> ApiResult<MessageView> {
    let service = CorrespondenceService::new(&state.db);
    let message = service
        .edit_message(message_id, &req.text, auth.user_id())
        .await?;
    Ok(Json(ApiResponse::new(message)))
}

/// DELETE /api/correspondences/messages/:message_id - Delete a message.
pub async fn delete_message(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(message_id): Path<i64>,
) -> ApiResult<MessageView> {
    let service = CorrespondenceService::new(&state.db);
    let message = service.delete_message(message_id, auth.user_id()).await?;
    Ok(Json(ApiResponse::new(message)))
}

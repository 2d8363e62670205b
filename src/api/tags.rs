//! Tag admin endpoints
//!
//! - GET    /admin/api/tags          - list tags (alphabetical)
//! - POST   /admin/api/tags          - create a tag
//! - GET    /admin/api/tags/{slug}   - get a tag
//! - PUT    /admin/api/tags/{slug}   - update a tag
//! - DELETE /admin/api/tags/{slug}   - delete a tag

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::api::middleware::{ApiError, AppState};
use crate::models::{CreateTagInput, Tag, UpdateTagInput};
use crate::services::TagServiceError;

/// Response for a single tag
#[derive(Debug, Serialize)]
pub struct TagResponse {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

impl From<Tag> for TagResponse {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
            slug: tag.slug,
        }
    }
}

/// Response for the tag list
#[derive(Debug, Serialize)]
pub struct TagListResponse {
    pub tags: Vec<TagResponse>,
}

impl From<TagServiceError> for ApiError {
    fn from(err: TagServiceError) -> Self {
        match err {
            TagServiceError::NotFound(_) => ApiError::not_found(err.to_string()),
            TagServiceError::Validation(_) => ApiError::validation_error(err.to_string()),
            TagServiceError::Duplicate(_) => ApiError::conflict(err.to_string()),
            TagServiceError::Internal(inner) => {
                tracing::error!(error = %inner, "Tag operation failed");
                ApiError::internal_error("Tag operation failed")
            }
        }
    }
}

/// Build the tags router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tags).post(create_tag))
        .route("/{slug}", get(get_tag).put(update_tag).delete(delete_tag))
}

async fn list_tags(State(state): State<AppState>) -> Result<Json<TagListResponse>, ApiError> {
    let tags = state.tag_service.list().await?;
    Ok(Json(TagListResponse {
        tags: tags.into_iter().map(Into::into).collect(),
    }))
}

async fn create_tag(
    State(state): State<AppState>,
    Json(input): Json<CreateTagInput>,
) -> Result<(StatusCode, Json<TagResponse>), ApiError> {
    let tag = state.tag_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(tag.into())))
}

async fn get_tag(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<TagResponse>, ApiError> {
    let tag = state.tag_service.get_by_slug(&slug).await?;
    Ok(Json(tag.into()))
}

async fn update_tag(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(input): Json<UpdateTagInput>,
) -> Result<Json<TagResponse>, ApiError> {
    let tag = state.tag_service.update(&slug, input).await?;
    Ok(Json(tag.into()))
}

async fn delete_tag(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.tag_service.delete(&slug).await?;
    Ok(StatusCode::NO_CONTENT)
}

//! Post admin endpoints
//!
//! Post slugs are only unique within a month, so individual posts are
//! addressed by id:
//! - GET    /admin/api/posts        - paged list (newest first, then title)
//! - POST   /admin/api/posts        - create a post
//! - GET    /admin/api/posts/{id}   - get a post with tags and startups
//! - PUT    /admin/api/posts/{id}   - update a post
//! - DELETE /admin/api/posts/{id}   - delete a post

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::middleware::{ApiError, AppState};
use crate::api::startups::StartupResponse;
use crate::api::tags::TagResponse;
use crate::models::{CreatePostInput, ListParams, Post, UpdatePostInput};
use crate::services::PostServiceError;

/// Query parameters for the post list
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    25
}

/// Create request: post fields plus optional associations
#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    #[serde(flatten)]
    pub input: CreatePostInput,
    #[serde(default)]
    pub tag_ids: Option<Vec<i64>>,
    #[serde(default)]
    pub startup_ids: Option<Vec<i64>>,
}

/// Update request: changed fields plus optional association replacement
#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    #[serde(flatten)]
    pub input: UpdatePostInput,
    #[serde(default)]
    pub tag_ids: Option<Vec<i64>>,
    #[serde(default)]
    pub startup_ids: Option<Vec<i64>>,
}

/// Response for a single post
#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub text: String,
    pub pub_date: NaiveDate,
    /// Display label, e.g. `"Django Training on 2013-01-18"`
    pub label: String,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        let label = post.to_string();
        Self {
            id: post.id,
            title: post.title,
            slug: post.slug,
            text: post.text,
            pub_date: post.pub_date,
            label,
        }
    }
}

/// Response for the paged post list
#[derive(Debug, Serialize)]
pub struct PostListResponse {
    pub posts: Vec<PostResponse>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
}

/// Detail response with associations included
#[derive(Debug, Serialize)]
pub struct PostDetailResponse {
    #[serde(flatten)]
    pub post: PostResponse,
    pub tags: Vec<TagResponse>,
    pub startups: Vec<StartupResponse>,
}

impl From<PostServiceError> for ApiError {
    fn from(err: PostServiceError) -> Self {
        match err {
            PostServiceError::NotFound(_) => ApiError::not_found(err.to_string()),
            PostServiceError::Validation(_) => ApiError::validation_error(err.to_string()),
            PostServiceError::DuplicateSlug { .. } => ApiError::conflict(err.to_string()),
            PostServiceError::Internal(inner) => {
                tracing::error!(error = %inner, "Post operation failed");
                ApiError::internal_error("Post operation failed")
            }
        }
    }
}

/// Build the posts router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_posts).post(create_post))
        .route("/{id}", get(get_post).put(update_post).delete(delete_post))
}

async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<PostListResponse>, ApiError> {
    let params = ListParams::new(query.page, query.per_page);
    let result = state.post_service.list_paged(&params).await?;

    let total = result.total;
    let page = result.page;
    let per_page = result.per_page;
    let total_pages = result.total_pages();
    Ok(Json(PostListResponse {
        posts: result.items.into_iter().map(Into::into).collect(),
        total,
        page,
        per_page,
        total_pages,
    }))
}

async fn create_post(
    State(state): State<AppState>,
    Json(request): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostResponse>), ApiError> {
    let post = state
        .post_service
        .create(request.input, request.tag_ids, request.startup_ids)
        .await?;
    Ok((StatusCode::CREATED, Json(post.into())))
}

async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PostDetailResponse>, ApiError> {
    let post = state.post_service.get(id).await?;
    let tags = state.post_service.tags_for(post.id).await?;
    let startups = state.post_service.startups_for(post.id).await?;

    Ok(Json(PostDetailResponse {
        post: post.into(),
        tags: tags.into_iter().map(Into::into).collect(),
        startups: startups.into_iter().map(Into::into).collect(),
    }))
}

async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdatePostRequest>,
) -> Result<Json<PostResponse>, ApiError> {
    let post = state
        .post_service
        .update(id, request.input, request.tag_ids, request.startup_ids)
        .await?;
    Ok(Json(post.into()))
}

async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.post_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

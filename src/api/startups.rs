//! Startup admin endpoints
//!
//! - GET    /admin/api/startups          - paged list (alphabetical)
//! - POST   /admin/api/startups          - create a startup
//! - GET    /admin/api/startups/{slug}   - get a startup with tags and news
//! - PUT    /admin/api/startups/{slug}   - update a startup
//! - DELETE /admin/api/startups/{slug}   - delete a startup (news cascades)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::middleware::{ApiError, AppState};
use crate::api::news_links::NewsLinkResponse;
use crate::api::tags::TagResponse;
use crate::models::{CreateStartupInput, ListParams, Startup, UpdateStartupInput};
use crate::services::StartupServiceError;

/// Query parameters for the startup list
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

/// Create request: startup fields plus optional tag associations
#[derive(Debug, Deserialize)]
pub struct CreateStartupRequest {
    #[serde(flatten)]
    pub input: CreateStartupInput,
    #[serde(default)]
    pub tag_ids: Option<Vec<i64>>,
}

/// Update request: changed fields plus optional tag replacement
#[derive(Debug, Deserialize)]
pub struct UpdateStartupRequest {
    #[serde(flatten)]
    pub input: UpdateStartupInput,
    #[serde(default)]
    pub tag_ids: Option<Vec<i64>>,
}

/// Response for a single startup
#[derive(Debug, Serialize)]
pub struct StartupResponse {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub founded_date: NaiveDate,
    pub contact: String,
    pub website: String,
}

impl From<Startup> for StartupResponse {
    fn from(startup: Startup) -> Self {
        Self {
            id: startup.id,
            name: startup.name,
            slug: startup.slug,
            description: startup.description,
            founded_date: startup.founded_date,
            contact: startup.contact,
            website: startup.website,
        }
    }
}

/// Response for the paged startup list
#[derive(Debug, Serialize)]
pub struct StartupListResponse {
    pub startups: Vec<StartupResponse>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
}

/// Detail response with tags and news links included
#[derive(Debug, Serialize)]
pub struct StartupDetailResponse {
    #[serde(flatten)]
    pub startup: StartupResponse,
    pub tags: Vec<TagResponse>,
    pub news_links: Vec<NewsLinkResponse>,
}

impl From<StartupServiceError> for ApiError {
    fn from(err: StartupServiceError) -> Self {
        match err {
            StartupServiceError::NotFound(_) => ApiError::not_found(err.to_string()),
            StartupServiceError::Validation(_) => ApiError::validation_error(err.to_string()),
            StartupServiceError::DuplicateSlug(_) => ApiError::conflict(err.to_string()),
            StartupServiceError::Internal(inner) => {
                tracing::error!(error = %inner, "Startup operation failed");
                ApiError::internal_error("Startup operation failed")
            }
        }
    }
}

/// Build the startups router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_startups).post(create_startup))
        .route(
            "/{slug}",
            get(get_startup).put(update_startup).delete(delete_startup),
        )
}

async fn list_startups(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<StartupListResponse>, ApiError> {
    let params = ListParams::new(query.page, query.per_page);
    let result = state.startup_service.list_paged(&params).await?;

    let total = result.total;
    let page = result.page;
    let per_page = result.per_page;
    let total_pages = result.total_pages();
    Ok(Json(StartupListResponse {
        startups: result.items.into_iter().map(Into::into).collect(),
        total,
        page,
        per_page,
        total_pages,
    }))
}

async fn create_startup(
    State(state): State<AppState>,
    Json(request): Json<CreateStartupRequest>,
) -> Result<(StatusCode, Json<StartupResponse>), ApiError> {
    let startup = state
        .startup_service
        .create(request.input, request.tag_ids)
        .await?;
    Ok((StatusCode::CREATED, Json(startup.into())))
}

async fn get_startup(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<StartupDetailResponse>, ApiError> {
    let startup = state.startup_service.get_by_slug(&slug).await?;
    let tags = state.startup_service.tags_for(startup.id).await?;
    let news_links = state.news_link_service.list(&slug).await?;

    Ok(Json(StartupDetailResponse {
        startup: startup.into(),
        tags: tags.into_iter().map(Into::into).collect(),
        news_links: news_links.into_iter().map(Into::into).collect(),
    }))
}

async fn update_startup(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(request): Json<UpdateStartupRequest>,
) -> Result<Json<StartupResponse>, ApiError> {
    let startup = state
        .startup_service
        .update(&slug, request.input, request.tag_ids)
        .await?;
    Ok(Json(startup.into()))
}

async fn delete_startup(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.startup_service.delete(&slug).await?;
    Ok(StatusCode::NO_CONTENT)
}

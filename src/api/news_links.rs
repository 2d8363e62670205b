//! News link admin endpoints
//!
//! News links are addressed through their owning startup:
//! - GET    /admin/api/startups/{slug}/news              - list (newest first)
//! - POST   /admin/api/startups/{slug}/news              - create
//! - GET    /admin/api/startups/{slug}/news/{news_slug}  - get
//! - PUT    /admin/api/startups/{slug}/news/{news_slug}  - update
//! - DELETE /admin/api/startups/{slug}/news/{news_slug}  - delete

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::Serialize;

use crate::api::middleware::{ApiError, AppState};
use crate::models::{CreateNewsLinkInput, NewsLink, UpdateNewsLinkInput};
use crate::services::NewsLinkServiceError;

/// Response for a single news link
#[derive(Debug, Serialize)]
pub struct NewsLinkResponse {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub pub_date: NaiveDate,
    pub link: String,
    pub startup_id: i64,
}

impl From<NewsLink> for NewsLinkResponse {
    fn from(link: NewsLink) -> Self {
        Self {
            id: link.id,
            name: link.name,
            slug: link.slug,
            pub_date: link.pub_date,
            link: link.link,
            startup_id: link.startup_id,
        }
    }
}

/// Response for the news link list
#[derive(Debug, Serialize)]
pub struct NewsLinkListResponse {
    pub news_links: Vec<NewsLinkResponse>,
}

/// Detail response with the startup-qualified label included
#[derive(Debug, Serialize)]
pub struct NewsLinkDetailResponse {
    #[serde(flatten)]
    pub news_link: NewsLinkResponse,
    /// Display label, e.g. `"JamBon Software: Series A announced"`
    pub label: String,
}

impl From<NewsLinkServiceError> for ApiError {
    fn from(err: NewsLinkServiceError) -> Self {
        match err {
            NewsLinkServiceError::StartupNotFound(_) | NewsLinkServiceError::NotFound(_) => {
                ApiError::not_found(err.to_string())
            }
            NewsLinkServiceError::Validation(_) => ApiError::validation_error(err.to_string()),
            NewsLinkServiceError::DuplicateSlug(_) => ApiError::conflict(err.to_string()),
            NewsLinkServiceError::Internal(inner) => {
                tracing::error!(error = %inner, "News link operation failed");
                ApiError::internal_error("News link operation failed")
            }
        }
    }
}

/// Build the news link router (nested under /startups)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{slug}/news", get(list_news_links).post(create_news_link))
        .route(
            "/{slug}/news/{news_slug}",
            get(get_news_link).put(update_news_link).delete(delete_news_link),
        )
}

async fn list_news_links(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<NewsLinkListResponse>, ApiError> {
    let links = state.news_link_service.list(&slug).await?;
    Ok(Json(NewsLinkListResponse {
        news_links: links.into_iter().map(Into::into).collect(),
    }))
}

async fn create_news_link(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(input): Json<CreateNewsLinkInput>,
) -> Result<(StatusCode, Json<NewsLinkResponse>), ApiError> {
    let link = state.news_link_service.create(&slug, input).await?;
    Ok((StatusCode::CREATED, Json(link.into())))
}

async fn get_news_link(
    State(state): State<AppState>,
    Path((slug, news_slug)): Path<(String, String)>,
) -> Result<Json<NewsLinkDetailResponse>, ApiError> {
    let (startup, link) = state.news_link_service.get(&slug, &news_slug).await?;
    let label = link.label(&startup);
    Ok(Json(NewsLinkDetailResponse {
        news_link: link.into(),
        label,
    }))
}

async fn update_news_link(
    State(state): State<AppState>,
    Path((slug, news_slug)): Path<(String, String)>,
    Json(input): Json<UpdateNewsLinkInput>,
) -> Result<Json<NewsLinkResponse>, ApiError> {
    let link = state
        .news_link_service
        .update(&slug, &news_slug, input)
        .await?;
    Ok(Json(link.into()))
}

async fn delete_news_link(
    State(state): State<AppState>,
    Path((slug, news_slug)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    state.news_link_service.delete(&slug, &news_slug).await?;
    Ok(StatusCode::NO_CONTENT)
}

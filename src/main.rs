//! Startuporg - a startup tracker and blog with an admin HTTP API

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use startuporg::{
    api::{self, AppState},
    config::Config,
    db::{
        self,
        repositories::{
            SqlxNewsLinkRepository, SqlxPostRepository, SqlxStartupRepository, SqlxTagRepository,
        },
    },
    services::{NewsLinkService, PostService, StartupService, TagService},
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "startuporg=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting startuporg...");

    let config = Config::load(Path::new("config.yml"))?;
    tracing::info!("Configuration loaded");

    let pool = db::create_pool(&config.database).await?;
    tracing::info!(url = %config.database.url, "Database connected");

    db::migrations::run_migrations(&pool).await?;
    tracing::info!("Database migrations completed");

    // Repositories
    let tag_repo = SqlxTagRepository::boxed(pool.clone());
    let startup_repo = SqlxStartupRepository::boxed(pool.clone());
    let news_link_repo = SqlxNewsLinkRepository::boxed(pool.clone());
    let post_repo = SqlxPostRepository::boxed(pool.clone());

    // Services
    let tag_service = Arc::new(TagService::new(tag_repo.clone()));
    let startup_service = Arc::new(StartupService::new(startup_repo.clone(), tag_repo.clone()));
    let news_link_service = Arc::new(NewsLinkService::new(news_link_repo, startup_repo.clone()));
    let post_service = Arc::new(PostService::new(post_repo, tag_repo, startup_repo));

    let state = AppState {
        pool,
        tag_service,
        startup_service,
        news_link_service,
        post_service,
        admin_token: Arc::new(config.admin.token.clone()),
    };

    let app = api::build_router(state, &config.server.cors_origin);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

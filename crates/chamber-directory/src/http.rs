/// HTML directory page over HTTP.
///
/// `GET /directory?category=&tier=&q=&sort=` renders the filtered view, and
/// `GET /health` answers "ok".
use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    response::Html,
    routing::get,
};
use serde::Deserialize;
use tracing::info;

use crate::controller::DirectoryController;
use crate::engine::{Criteria, SearchFields};
use crate::error::AppError;
use crate::html::directory_page;
use crate::render::{RenderConfig, ViewSurface};
use crate::store::RecordStore;

#[derive(Clone)]
pub struct PageState {
    pub store: Arc<RecordStore>,
    pub fields: SearchFields,
    pub render_config: RenderConfig,
}

#[derive(Debug, Default, Deserialize)]
pub struct DirectoryQuery {
    pub category: Option<String>,
    pub tier: Option<String>,
    pub q: Option<String>,
    pub sort: Option<String>,
}

pub fn router(state: PageState) -> Router {
    Router::new()
        .route("/directory", get(directory))
        .route("/health", get(health))
        .with_state(state)
}

pub async fn serve(addr: &str, state: PageState) -> Result<(), AppError> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %addr, "directory page listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn directory(
    State(state): State<PageState>,
    Query(query): Query<DirectoryQuery>,
) -> Html<String> {
    let criteria = Criteria::from_params(
        query.category.as_deref(),
        query.tier.as_deref(),
        query.q.as_deref(),
        query.sort.as_deref(),
    );
    let controller = DirectoryController::with_criteria(
        state.store,
        criteria,
        state.fields,
        ViewSurface::default(),
        state.render_config,
    );
    Html(directory_page(controller.surface().snapshot()))
}

async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> PageState {
        PageState {
            store: Arc::new(RecordStore::fallback()),
            fields: SearchFields::default(),
            render_config: RenderConfig::default(),
        }
    }

    #[tokio::test]
    async fn page_reflects_query_parameters() {
        let query = DirectoryQuery {
            category: Some("Marketing".to_string()),
            ..Default::default()
        };
        let Html(page) = directory(State(state()), Query(query)).await;
        assert!(page.contains("1 business found"));
        assert!(page.contains("Cactus Creative Agency"));
        assert!(!page.contains("Arizona Solar Pros"));
    }

    #[tokio::test]
    async fn empty_page_shows_fallback_notice() {
        let query = DirectoryQuery {
            q: Some("no such business".to_string()),
            ..Default::default()
        };
        let Html(page) = directory(State(state()), Query(query)).await;
        assert!(page.contains("0 businesses found"));
        assert!(page.contains("Unable to load the full directory"));
    }

    #[tokio::test]
    async fn health_is_ok() {
        assert_eq!(health().await, "ok");
    }
}

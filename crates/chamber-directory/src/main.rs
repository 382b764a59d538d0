mod application;
mod config;
mod controller;
mod engine;
mod error;
mod html;
mod http;
mod live;
mod model;
mod quiet;
mod render;
mod server;
mod spotlight;
mod store;
mod visits;

use std::sync::Arc;

use rmcp::{ServiceExt, transport::stdio};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use chamber_common::fetch::Fetcher;
use chamber_common::redis::RedisStore;
use config::Config;
use controller::DirectoryController;
use engine::SearchFields;
use live::LiveDirectory;
use render::{RenderConfig, ViewSurface};
use server::DirectoryServer;
use store::RecordStore;
use visits::VisitTracker;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting chamber-directory MCP server");

    let config = Config::from_env()?;
    info!(
        data_source = %config.data_source,
        redis = config.redis_url.is_some(),
        search_quiet_ms = config.search_quiet.as_millis() as u64,
        search_address = config.search_address,
        "configuration loaded"
    );

    let fetcher = Fetcher::new(config.fetch_timeout)?;
    let store = Arc::new(RecordStore::load(&config.data_source, &fetcher).await);
    info!(
        members = store.len(),
        fallback = store.is_fallback(),
        fingerprint = store.fingerprint().unwrap_or("none"),
        "directory ready"
    );
    if store.is_empty() {
        warn!("member data contains no members");
    }

    let redis = RedisStore::new(config.redis_url.as_deref(), "chamber:v1:");
    if redis.is_available().await {
        info!("redis connected");
    } else {
        info!("redis unavailable, visits will not be remembered");
    }
    let visits = Arc::new(VisitTracker::new(redis));

    let fields = SearchFields::default().with_address(config.search_address);
    let render_config = RenderConfig::default();

    let controller = DirectoryController::new(
        Arc::clone(&store),
        fields,
        ViewSurface::default(),
        render_config.clone(),
    );
    let live = LiveDirectory::spawn(controller, config.search_quiet);

    if let Some(addr) = config.http_addr.clone() {
        let state = http::PageState {
            store: Arc::clone(&store),
            fields,
            render_config: render_config.clone(),
        };
        tokio::spawn(async move {
            if let Err(e) = http::serve(&addr, state).await {
                tracing::error!(error = %e, "directory page server stopped");
            }
        });
    }

    let server = DirectoryServer::new(store, fields, render_config, live, visits);

    if let Some(addr) = config.mcp_tcp_addr.as_deref() {
        let listener = TcpListener::bind(addr).await?;
        info!(listen_addr = %addr, "MCP server ready, serving on TCP");
        loop {
            let (stream, peer) = listener.accept().await?;
            let server = server.clone();
            tokio::spawn(async move {
                tracing::info!(peer = %peer, "MCP client connected");
                let service = server.serve(stream).await.inspect_err(|e| {
                    tracing::error!(error = %e, "MCP server error");
                })?;
                service.waiting().await?;
                tracing::info!(peer = %peer, "MCP client disconnected");
                Ok::<(), anyhow::Error>(())
            });
        }
    } else {
        info!("MCP server ready, serving on stdio");
        let service = server.serve(stdio()).await.inspect_err(|e| {
            tracing::error!(error = %e, "MCP server error");
        })?;
        service.waiting().await?;
        info!("MCP server shut down");
    }
    Ok(())
}

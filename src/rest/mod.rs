use std::{net::SocketAddr, sync::Arc};

use axum::{routing::get, Router};

use crate::{seo::Site, storage::Storage};

mod handlers;
mod models;

use handlers::{
    health, not_found, overview_page, profile_page, trpc_method_not_supported, trpc_mutation,
    trpc_query,
};

#[derive(Clone)]
pub struct AppState<S: Storage> {
    pub storage: S,
    pub started_at: std::time::SystemTime,
    pub site: Arc<Site>,
}

pub fn router<S: Storage + Clone + Send + Sync + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/health", get(health::<S>))
        .route(
            "/trpc/:procedure",
            get(trpc_query::<S>)
                .post(trpc_mutation::<S>)
                .fallback(trpc_method_not_supported),
        )
        .route("/profile/:locale", get(overview_page::<S>))
        .route("/profile/:locale/:page", get(profile_page::<S>))
        .fallback(not_found)
        .with_state(state)
}

pub async fn serve<S: Storage + Clone + Send + Sync + 'static>(
    addr: SocketAddr,
    storage: S,
    site: Site,
    shutdown: tokio_util::sync::CancellationToken,
) -> anyhow::Result<()> {
    log::info!("🌐 REST service on http://{}", addr);

    let app = router(AppState {
        storage,
        started_at: std::time::SystemTime::now(),
        site: Arc::new(site),
    });

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.cancelled().await;
            log::info!("🛑 REST shutdown requested");
        })
        .await?;
    log::info!("👋 REST server exited");
    Ok(())
}

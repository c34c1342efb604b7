//! Web server for the search UI.
//!
//! Serves the search page, handles the search-form redirects, and submits
//! collection changes to the store backend.

mod handlers;
mod routes;
pub mod templates;

pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::client::{PermanodeStore, StoreClient};
use crate::config::Settings;

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PermanodeStore>,
}

impl AppState {
    pub fn new(settings: &Settings) -> Self {
        Self {
            store: Arc::new(StoreClient::new(settings)),
        }
    }

    /// State backed by an arbitrary store, used by tests.
    pub fn with_store(store: Arc<dyn PermanodeStore>) -> Self {
        Self { store }
    }
}

/// Start the web server.
pub async fn serve(settings: &Settings) -> anyhow::Result<()> {
    let state = AppState::new(settings);
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.host, settings.port).parse()?;
    tracing::info!("Starting server at http://{}", addr);
    tracing::info!("Store backend at {}", settings.store_url);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

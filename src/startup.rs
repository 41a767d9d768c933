use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use crate::{
    AppSettings, BlobStore, PgRecordStore, RecordStore, S3BlobStore, admin_session,
    init_tracing, no_route, storage_objects, user_management,
};

/// Everything a handler needs, constructed once at startup and injected via
/// axum `State`. No ambient singletons.
#[derive(Clone)]
pub struct AppState {
    pub settings: AppSettings,
    pub blobs: Arc<dyn BlobStore>,
    pub records: Arc<dyn RecordStore>,
}

//---------------------------------------server---------------------------------------
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(storage_objects(state.clone()))
        .merge(user_management())
        .merge(admin_session())
        .fallback(no_route)
        .with_state(state)
}

async fn start_app_server(address: &str, router: Router) -> anyhow::Result<()> {
    let listener = TcpListener::bind(address).await?;
    info!(address, "gateway listening");
    axum::serve(listener, router).await?;
    Ok(())
}

pub async fn run() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let settings = AppSettings::load()?;
    init_tracing(
        &settings.app.name,
        &settings.app.filter_directive(),
        &settings.app.log_directory,
    )?;

    let blobs = S3BlobStore::connect(&settings.storage, &settings.secrets.storage).await;
    let records = PgRecordStore::connect(&settings.database).await?;

    let address = settings.app.address();
    let state = AppState {
        settings,
        blobs: Arc::new(blobs),
        records: Arc::new(records),
    };
    let router = build_router(state);
    start_app_server(&address, router).await?;
    Ok(())
}

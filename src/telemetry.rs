//! Development : "blobgate=debug,warn"
//!
//! Production  : "blobgate=info,warn"
use once_cell::sync::OnceCell;
use tracing::subscriber::set_global_default;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::LogTracer;
use tracing_subscriber::{
    EnvFilter, Registry,
    fmt::{self},
    layer::SubscriberExt,
};

static GUARD: OnceCell<WorkerGuard> = OnceCell::new();

pub fn init_tracing(app_name: &str, env_filter: &str, logs_directory: &str) -> anyhow::Result<()> {
    LogTracer::init()?;

    // RUST_LOG env variable wins over the configured directive
    let env_filter = EnvFilter::try_from_default_env().unwrap_or(EnvFilter::new(env_filter));

    // ---- file json logger ----
    let file_appender = rolling::daily(logs_directory, "gateway.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
    GUARD
        .set(guard)
        .map_err(|_| anyhow::anyhow!("tracing already initialized"))?;

    let bunyan_layer = BunyanFormattingLayer::new(app_name.into(), file_writer);

    // ---- stdout json logger ----
    let stdout_layer = fmt::layer().json();

    let subscriber = Registry::default()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(bunyan_layer)
        .with(stdout_layer);

    set_global_default(subscriber)?;
    Ok(())
}

// Framework bootstrap for the guest list service.

use crate::frameworks::config::Settings;
use crate::interface_adapters::clients::SheetClient;
use crate::interface_adapters::routes;
use crate::interface_adapters::state::{AppState, StateSettings, SystemClock};

use std::io::Result;
use std::net::SocketAddr;
use std::sync::Arc;

fn init_runtime() {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

pub async fn run(listener: tokio::net::TcpListener, settings: Settings) -> Result<()> {
    let address = listener.local_addr()?;
    let state = build_state(&settings)?;

    // Initial fetch, like opening the page; it must not hold up serving.
    let sync = state.sync.clone();
    tokio::spawn(async move {
        sync.refresh().await;
    });

    let app = routes::app(state);
    tracing::info!(%address, "listening");

    // Serve app and report errors rather than panicking
    axum::serve(listener, app).await.inspect_err(|e| {
        tracing::error!(error = %e, "server error");
    })
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let settings = Settings::load().map_err(|e| {
        tracing::error!(error = %e, "invalid configuration");
        std::io::Error::other(e.to_string())
    })?;
    let address = SocketAddr::new(settings.bind_ip, settings.http_port);

    // Bind TCP listener with error handling
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    run(listener, settings).await
}

fn build_state(settings: &Settings) -> Result<Arc<AppState>> {
    let client = SheetClient::new(
        &settings.sheet_api_url,
        settings.schema.clone(),
        settings.sheet_timeout,
    )
    .map_err(|e| std::io::Error::other(format!("failed to initialize sheet client: {e}")))?;
    tracing::debug!(
        sheet_api_url = %settings.sheet_api_url,
        name_field = ?settings.schema.name_field,
        body_shape = ?settings.schema.body_shape,
        "sheet client configured"
    );

    Ok(Arc::new(AppState::new(
        Arc::new(client),
        Arc::new(SystemClock),
        StateSettings {
            normalizer: settings.normalizer,
            refresh_delay: settings.refresh_delay,
            feedback_display_for: settings.feedback_display_for,
            max_upload_bytes: settings.max_upload_bytes,
        },
    )))
}

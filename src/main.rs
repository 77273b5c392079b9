mod ai;
mod app;
mod bmi;
mod coach;
mod config;
mod error;
mod meals;
mod progress;
mod state;
mod store;

use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "fitcoach=debug,axum=info,tower_http=info";

/// `RUST_LOG` picks the filter; `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => builder.with_target(false).json().init(),
        _ => builder.init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    // a missing GEMINI_API_KEY stops the process here
    let app_state = state::AppState::init().map_err(|e| {
        tracing::error!(error = %e, "failed to initialize AI client");
        e
    })?;
    let (host, port) = (app_state.config.host.clone(), app_state.config.port);

    let app = app::build_app(app_state);
    app::serve(app, &host, port).await
}

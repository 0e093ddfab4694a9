//! run-coach server entry point

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use run_coach::config;
use run_coach::server::{router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  dotenvy::dotenv().ok();

  tracing_subscriber::registry()
    .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with(tracing_subscriber::fmt::layer())
    .init();

  tracing::info!("Starting run-coach v{}", env!("CARGO_PKG_VERSION"));

  let state = Arc::new(AppState::from_env());
  let app = router(state);

  let addr = format!("0.0.0.0:{}", config::server_port());
  let listener = tokio::net::TcpListener::bind(&addr).await?;
  tracing::info!("listening on {}", addr);

  axum::serve(listener, app).await?;

  Ok(())
}

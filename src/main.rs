use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use carcare_realtime::{
    handlers,
    state::{AppConfig, AppState},
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("carcare_realtime=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env();
    let bind_addr = config.bind_addr.clone();

    let app_state = AppState::new(config).await?;
    let app = handlers::router(Arc::new(app_state));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("CarCare realtime listening on {}", bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

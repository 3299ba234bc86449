use anyhow::Context;
use tracing_subscriber::EnvFilter;

use cinematch_api::api::{create_router, AppState};
use cinematch_api::catalog::Catalog;
use cinematch_api::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cinematch_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    if config.huggingface_api_key.is_none() {
        tracing::warn!("HUGGINGFACE_API_KEY is not set; chat requests will fail");
    }

    let catalog = Catalog::load(config.catalog_path.as_deref())?;
    tracing::info!(
        movies = catalog.len(),
        source = config.catalog_path.as_deref().unwrap_or("builtin"),
        "Movie catalog loaded"
    );

    let app = create_router(AppState::from_config(&config, catalog));

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    tracing::info!(address = %address, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

use std::sync::Arc;

use cinema::{AppState, catalog::Catalog, config::Config, db, routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,cinema=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Config::from_env()?;

    let db = db::connect_catalog(&config.database_url).await?;
    if config.seed_data {
        db::seed_catalog(&db).await?;
    }

    let state = Arc::new(AppState::new(&config, Catalog::new(db)));
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}

use std::io;

use cinema::{box_office::BoxOffice, config::Config, db, menu::Menu};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // The menu owns stdout, so logs go to stderr and stay quiet by default.
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string()))
        .init();

    let config = Config::from_env()?;

    let db = db::connect_box_office(&config.box_office_database_url).await?;
    if config.seed_data {
        db::seed_box_office(&db).await?;
    }

    let stdin = io::stdin();
    let mut menu = Menu::new(BoxOffice::new(db), stdin.lock(), io::stdout());
    menu.run().await?;

    tracing::info!("box office session finished");
    Ok(())
}

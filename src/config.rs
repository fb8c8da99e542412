use std::net::SocketAddr;

use anyhow::Context;

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,
    pub box_office_database_url: String,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub seed_data: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 =
            std::env::var("PORT").unwrap_or_else(|_| "8080".to_string()).parse().context("PORT")?;

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://cinema.db?mode=rwc".to_string());

        let box_office_database_url = std::env::var("BOX_OFFICE_DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://box-office.db?mode=rwc".to_string());

        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set, using the development secret");
            "change-me".to_string()
        });

        let token_ttl_hours: i64 = std::env::var("TOKEN_TTL_HOURS")
            .unwrap_or_else(|_| "24".to_string())
            .parse()
            .context("TOKEN_TTL_HOURS")?;

        let seed_data = std::env::var("SEED_DATA")
            .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "0" | "false" | "no"))
            .unwrap_or(true);

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            database_url,
            box_office_database_url,
            jwt_secret,
            token_ttl_hours,
            seed_data,
        })
    }
}

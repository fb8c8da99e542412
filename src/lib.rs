pub mod auth;
pub mod box_office;
pub mod catalog;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod menu;
pub mod models;
pub mod report;
pub mod routes;

use std::sync::Arc;

use crate::{auth::TokenIssuer, catalog::Catalog, config::Config};

#[derive(Clone)]
pub struct AppState {
    pub catalog: Catalog,
    pub tokens: Arc<TokenIssuer>,
}

impl AppState {
    pub fn new(config: &Config, catalog: Catalog) -> Self {
        let tokens = TokenIssuer::new(config.jwt_secret.as_bytes(), config.token_ttl_hours);
        Self { catalog, tokens: Arc::new(tokens) }
    }
}

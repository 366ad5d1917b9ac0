// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::Parser;
use printhunt::{
    api::{start_server, AppState},
    cli::Cli,
    config::AppConfig,
};
use std::{env, sync::Arc};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let mut config = AppConfig::from_env()?;
    cli.apply(&mut config);
    config.validate()?;
    let addr = config.listen_addr()?;

    info!(
        "Starting {} (timeout {}s, popular TTL {}s, image TTL {}s, thingiverse API: {})",
        printhunt::version::get_version_string(),
        config.search.upstream_timeout_secs,
        config.search.popular_cache_ttl_secs,
        config.image.cache_ttl_secs,
        if config.search.thingiverse_api_token.is_some() {
            "enabled"
        } else {
            "disabled"
        }
    );

    let state = Arc::new(AppState::from_config(&config)?);
    start_server(state, addr).await
}

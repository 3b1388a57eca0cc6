/// Creator Hub - admin backend for a creator-streaming platform
///
/// Authenticated REST API over creator profiles, live status, analytics
/// counters, site settings and subscription records.

mod account;
mod analytics;
mod api;
mod auth;
mod avatar_store;
mod config;
mod context;
mod creators;
mod db;
mod error;
mod metrics;
mod server;
mod settings;
mod subscriptions;

use config::{LoggingConfig, ServerConfig};
use context::AppContext;
use error::ApiResult;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ApiResult<()> {
    let config = ServerConfig::from_env()?;

    init_tracing(&config.logging);

    print_banner();

    let ctx = AppContext::new(config).await?;

    if let Some(admin) = ctx
        .accounts
        .ensure_bootstrap_admin(&ctx.config.authentication.bootstrap_admin)
        .await?
    {
        tracing::info!(username = %admin.username, "seeded initial super admin");
    }

    server::serve(ctx).await?;

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_new(&logging.level)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(logging.json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!logging.json).then(|| tracing_subscriber::fmt::layer()))
        .init();
}

fn print_banner() {
    println!(
        r#"
   ______                __                __  __      __
  / ____/_______  ____ _/ /_____  _____   / / / /_  __/ /_
 / /   / ___/ _ \/ __ `/ __/ __ \/ ___/  / /_/ / / / / __ \
/ /___/ /  /  __/ /_/ / /_/ /_/ / /     / __  / /_/ / /_/ /
\____/_/   \___/\__,_/\__/\____/_/     /_/ /_/\__,_/_.___/

        Creator Hub admin API v{}
        "#,
        env!("CARGO_PKG_VERSION")
    );
}

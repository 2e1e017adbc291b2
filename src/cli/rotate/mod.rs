//! Rotate command - adds a signing key to the configured store

use chrono::{DateTime, Utc};
use clap::Args;
use tracing::info;

use crate::config::AppConfig;
use crate::domain::{offset_by_seconds, DomainError};
use crate::infrastructure::logging;
use crate::AppBuilder;

#[derive(Debug, Args)]
pub struct RotateArgs {
    /// Lifetime of the new key in seconds
    #[arg(long, default_value_t = 3600, value_parser = clap::value_parser!(i64).range(1..))]
    pub ttl_seconds: i64,
}

impl RotateArgs {
    /// Expiry of the new key when created at `now`
    pub fn expires_at(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>, DomainError> {
        offset_by_seconds(now, self.ttl_seconds)
    }
}

/// Generate one key expiring `ttl_seconds` from now
pub async fn run(args: RotateArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&config.logging);

    if config.database.is_memory() {
        anyhow::bail!("rotate needs a persistent database; database.url is \"memory\"");
    }
    config.keys.bootstrap = false;

    let app = AppBuilder::new(config).build().await?;
    let expires_at = args.expires_at(app.clock.now())?;
    let kid = app.key_store.create(expires_at).await?;

    info!(%kid, %expires_at, "Signing key created");
    println!("{}", kid);
    Ok(())
}

use std::sync::Arc;

use anyhow::Result;
use tbm_core::Config;
use tbm_telemetry::install as init_telemetry;

#[tokio::main]
async fn main() -> Result<()> {
    init_telemetry("tbm-relay")?;
    let config = Arc::new(Config::load());
    tracing::debug!(?config, "configuration loaded");
    tbm_relay::run(config).await
}

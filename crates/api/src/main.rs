use std::sync::Arc;

use anyhow::Context;

use dealership_api::app;
use dealership_infra::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("invalid configuration")?;
    dealership_observability::init(config.log_format);

    let services = Arc::new(app::services::build_services(&config));
    let router = app::build_app(services);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(
        addr = %listener.local_addr()?,
        lock_timeout_ms = config.lock_timeout.as_millis() as u64,
        seeded = config.vin_seed.is_some(),
        "listening"
    );

    axum::serve(listener, router).await?;
    Ok(())
}

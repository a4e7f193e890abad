use anyhow::Context;

use keystone_api::{app, config::ApiConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    keystone_observability::init();

    let config = ApiConfig::from_env().context("failed to load configuration")?;
    tracing::info!(
        access_ttl_secs = config.auth.access_ttl.as_secs(),
        refresh_ttl_secs = config.auth.refresh_ttl.as_secs(),
        refresh_role_policy = ?config.auth.refresh_role_policy,
        "token configuration loaded"
    );

    let services = app::services::AppServices::from_config(&config.auth);
    let app = app::build_app(services, config.frontend_origin.clone());

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}

//! Dialogflow fulfillment webhook answering trash pickup and building permit questions.

mod config;
mod dialogflow;
mod routes;

use std::future;
use std::sync::Arc;

use anyhow::Result;
use civicbot_core::{backend::Backends, service::FulfillmentService};
use civicbot_provider_permits as permits;
use civicbot_provider_waste as waste;
use clap::Parser;
use reqwest::Client;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();
    init_tracing(&config);

    // HTTP + service setup
    let mut client_builder = Client::builder().user_agent("civicbot/0.1");
    if let Some(timeout) = config.http_timeout() {
        client_builder = client_builder.timeout(timeout);
    }
    let client = client_builder.build()?;

    let backends = Backends::new(
        waste::port(client.clone(), config.waste_base_url.clone()),
        permits::port(client, config.permits_endpoint.clone()),
    );
    for (source, url) in backends.endpoints() {
        info!(source, url, "Data source configured");
    }
    let service = Arc::new(FulfillmentService::new(Arc::new(backends)));

    let listener = TcpListener::bind(config.bind).await?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        address = %config.bind,
        "Webhook listening"
    );

    axum::serve(listener, routes::router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Webhook shut down");
    Ok(())
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_err| EnvFilter::new(config.log_directive()));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);

    if config.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "Failed to listen for shutdown signal");
        future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}

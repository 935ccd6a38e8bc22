//! EDI Gateway Server
//!
//! Accepts shipment transactions over HTTP, stores them in `PostgreSQL`,
//! publishes each one to RedPanda, and serves an EDI 856 report.
//!
//! This binary:
//! - Loads configuration from the environment (and `.env`)
//! - Connects to `PostgreSQL` and creates the schema if needed
//! - Creates the RedPanda producer
//! - Installs the Prometheus recorder
//! - Serves `POST /inbound`, `GET /outbound` and `GET /metrics`
//!
//! Any failure before the listener is up is fatal.
//!
//! # Usage
//!
//! ```bash
//! # Start infrastructure
//! docker compose up -d
//!
//! # Run server
//! cargo run --bin edi-gateway
//! ```

mod config;
mod telemetry;

use anyhow::Context;
use config::Config;
use edi_gateway_core::environment::{SystemClock, UuidGenerator};
use edi_gateway_core::gateway::Gateway;
use edi_gateway_postgres::PostgresTransactionStore;
use edi_gateway_redpanda::RedpandaPublisher;
use edi_gateway_web::{AppState, GatewayMetrics, build_router_with_body_limit};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env();
    telemetry::init(&config.server.log_level);

    tracing::info!(
        redpanda = %config.redpanda.brokers,
        topic = %config.redpanda.topic,
        "Starting EDI gateway"
    );

    let metrics = GatewayMetrics::install().context("Failed to install metrics recorder")?;

    let store = PostgresTransactionStore::connect_with(
        &config.postgres.url,
        &config.postgres.pool_settings(),
    )
    .await
    .context("Failed to connect to database")?;
    store
        .ensure_schema()
        .await
        .context("Failed to create transaction schema")?;

    let publisher = RedpandaPublisher::builder()
        .brokers(&config.redpanda.brokers)
        .topic(&config.redpanda.topic)
        .producer_acks(&config.redpanda.acks)
        .batch_bytes(config.redpanda.batch_bytes)
        .max_message_bytes(config.redpanda.max_message_bytes)
        .timeout(config.redpanda.message_timeout())
        .build()
        .context("Failed to create RedPanda producer")?;

    let gateway = Gateway::new(
        Arc::new(store),
        Arc::new(publisher),
        Arc::new(SystemClock),
        Arc::new(UuidGenerator),
    );
    let app = build_router_with_body_limit(
        AppState::new(gateway, metrics),
        config.server.body_limit(),
    );

    let address = config.server.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;

    tracing::info!(%address, "Server running");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

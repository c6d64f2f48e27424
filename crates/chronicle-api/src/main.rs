//! Chronicle API server entry point.

use std::sync::Arc;

use chronicle_api::config::ApiConfig;
use chronicle_api::error::AppError;
use chronicle_api::event_log::AppEventLog;
use chronicle_api::state::AppState;
use chronicle_bus::broadcast::BroadcastBus;
use chronicle_core::clock::SystemClock;
use chronicle_core::event_log::StoredEvent;
use chronicle_event_store::in_memory_event_log::InMemoryEventLog;
use chronicle_event_store::pg_event_log::PgEventLog;
use chronicle_event_store::schema;
use sqlx::postgres::PgPoolOptions;
use tokio::sync::broadcast::Receiver;
use tokio::sync::broadcast::error::RecvError;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Chronicle API server");

    let config = ApiConfig::from_env()?;
    let addr = config.socket_addr()?;

    let log = match &config.database_url {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(database_url)
                .await?;
            schema::ensure_schema(&pool).await?;
            AppEventLog::Postgres(PgEventLog::new(pool))
        }
        None => AppEventLog::InMemory(InMemoryEventLog::new()),
    };
    tracing::info!(event_log = log.kind(), "event log ready");

    let bus = BroadcastBus::new(config.bus_capacity);
    tokio::spawn(trace_published_events(bus.subscribe()));

    let app_state = AppState::new(log, bus, Arc::new(SystemClock));

    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    let app = chronicle_api::app(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}

/// Logs every event published on the bus until it closes.
async fn trace_published_events(mut events: Receiver<StoredEvent>) {
    loop {
        match events.recv().await {
            Ok(event) => tracing::debug!(
                event_id = %event.event_id,
                aggregate_id = %event.aggregate_id,
                event_type = %event.event_type,
                sequence_number = event.sequence_number,
                "event published"
            ),
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "event trace subscriber lagged");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

//! Fleetbook Server — Reservation and Payment Reconciliation Engine
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tokio::sync::watch;
use tracing;
use tracing_subscriber::{fmt, EnvFilter};

use fleetbook_core::config::AppConfig;
use fleetbook_core::error::AppError;
use fleetbook_core::traits::EventSink;
use fleetbook_database::store::{BookingStore, PgBookingStore};
use fleetbook_service::{ChannelEventSink, ReconciliationService, ReservationService};
use fleetbook_worker::ExpiryReaper;

#[tokio::main]
async fn main() {
    let env = std::env::var("FLEETBOOK_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Fleetbook v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    let db = fleetbook_database::DatabasePool::connect(&config.database).await?;
    fleetbook_database::migration::run_migrations(db.pool()).await?;

    let store: Arc<dyn BookingStore> = Arc::new(PgBookingStore::new(db.pool().clone()));

    // ── Step 2: Event sink and drain task ────────────────────────
    let (sink, mut event_rx) = ChannelEventSink::new();
    let events: Arc<dyn EventSink> = Arc::new(sink);

    // Stand-in delivery loop: notification and compensation consumers
    // read from here. Events are logged structurally so an operator can
    // act on escalations even without a downstream consumer wired up.
    let drain_handle = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            tracing::info!(
                event_id = %event.id,
                payload = %serde_json::to_string(&event.payload).unwrap_or_default(),
                "Domain event"
            );
        }
        tracing::debug!("Event channel closed, drain task exiting");
    });

    // ── Step 3: Services ─────────────────────────────────────────
    let reservations = ReservationService::new(
        Arc::clone(&store),
        Arc::clone(&events),
        config.booking.clone(),
    );
    let reconciler = ReconciliationService::new(
        Arc::clone(&store),
        reservations.clone(),
        Arc::clone(&events),
    );

    // ── Step 4: Shutdown channel ─────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // ── Step 5: Start expiry reaper ──────────────────────────────
    let reaper_handle = if config.worker.enabled {
        let reaper = ExpiryReaper::new(Arc::clone(&store), config.worker.clone());
        let reaper_cancel = shutdown_rx.clone();
        let handle = tokio::spawn(async move {
            reaper.run(reaper_cancel).await;
        });
        tracing::info!("Expiry reaper started");
        Some(handle)
    } else {
        tracing::info!("Expiry reaper disabled");
        None
    };

    // ── Step 6: Build and start HTTP server ──────────────────────
    let app_state = fleetbook_api::AppState::new(
        Arc::new(config.clone()),
        reservations,
        reconciler,
    );
    let app = fleetbook_api::build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("Fleetbook server listening on {}", addr);

    // ── Step 7: Graceful shutdown ────────────────────────────────
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        let _ = shutdown_tx.send(true);
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    // ── Step 8: Wait for background tasks ────────────────────────
    if let Some(handle) = reaper_handle {
        let _ = tokio::time::timeout(std::time::Duration::from_secs(30), handle).await;
    }

    drop(events);
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), drain_handle).await;

    db.close().await;
    tracing::info!("Fleetbook server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, router};
use medcard_core::{
    CoreConfig, PatientService, SqlitePatientStore, config::database_path_from_env_value,
};

/// Main entry point for the MedCard server
///
/// Opens the patient store, serves the REST API until Ctrl+C or SIGTERM, then closes the store.
///
/// # Environment Variables
/// - `MEDCARD_REST_ADDR`: REST server address (default: "0.0.0.0:5000")
/// - `MEDCARD_DB_PATH`: SQLite database file (default: "medical_records.db")
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the configuration is invalid or the store cannot be opened,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("medcard_run=info".parse()?)
                .add_directive("medcard_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("MEDCARD_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".into());
    let cfg = CoreConfig::new(database_path_from_env_value(
        std::env::var("MEDCARD_DB_PATH").ok(),
    ))?;

    tracing::info!("++ Opening patient store at {}", cfg.database_path().display());
    let store = Arc::new(SqlitePatientStore::open(cfg.database_path())?);
    let state = AppState::new(PatientService::new(store.clone()));

    tracing::info!("++ Starting MedCard REST on {}", addr);
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("-- Server stopped, closing patient store");
    match Arc::try_unwrap(store) {
        Ok(store) => store.close()?,
        Err(_) => tracing::warn!("patient store still shared at shutdown; dropping it"),
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        tracing::info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

use coffee_shop::api::{self, AppState};
use coffee_shop::config::Config;
use coffee_shop::order::OrderStore;
use dotenv::dotenv;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

/// Main entry point for the coffee shop service.
///
/// This function:
/// 1. Loads environment variables from .env file
/// 2. Creates the in-memory order store and the API router
/// 3. Serves HTTP on HOST:PORT until Ctrl-C or SIGTERM
#[tokio::main]
async fn main() {
    // Load .env first so RUST_LOG from it is honoured
    dotenv().ok();

    FmtSubscriber::builder()
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_target(false)
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .pretty()
        .init();

    info!("Starting coffee shop service");

    let addr = match Config::from_env() {
        Ok(config) => config.socket_addr().await,
        Err(e) => Err(e),
    };
    let addr = match addr {
        Ok(addr) => addr,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let app = api::create_router(AppState::new(OrderStore::new()));

    info!("Server listening on {}", addr);
    let server = axum::Server::try_bind(&addr).map(|builder| {
        builder
            .serve(app.into_make_service())
            .with_graceful_shutdown(shutdown_signal())
    });

    let result = match server {
        Ok(server) => server.await,
        Err(e) => Err(e),
    };
    if let Err(e) = result {
        error!("Server error: {}", e);
        std::process::exit(1);
    }

    info!("Server stopped");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
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

    info!("Shutdown signal received");
}

use tokio::net::TcpListener;
use todo_server::{app, Config, TodoStore};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let store = match TodoStore::connect(&config).await {
        Ok(store) => store,
        Err(e) => {
            tracing::error!(database_url = %config.database_url, error = %e, "failed to open database");
            std::process::exit(1);
        }
    };

    let addr = config.bind_addr();
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(%addr, error = %e, "failed to bind");
            std::process::exit(1);
        }
    };
    tracing::info!(%addr, "listening");

    let served = axum::serve(listener, app(store.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await;
    store.close().await;
    if let Err(e) = served {
        tracing::error!(error = %e, "server error");
        std::process::exit(1);
    }
    tracing::info!("shutdown complete");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

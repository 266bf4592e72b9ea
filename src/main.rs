use std::net::SocketAddr;

use lang_portal_backend::config::Config;
use lang_portal_backend::db::Database;
use lang_portal_backend::{create_app, logging, seed};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();

    let _log_guard = logging::init_tracing(&config.log_level);

    let db = match Database::from_env().await {
        Ok(db) => db,
        Err(err) => {
            tracing::error!(error = %err, "failed to open database");
            std::process::exit(1);
        }
    };

    if let Err(err) = db.init_schema().await {
        tracing::error!(error = %err, "failed to apply schema");
        std::process::exit(1);
    }

    if config.seed_on_startup {
        if let Err(err) = seed::seed_starter_data(&db).await {
            tracing::warn!(error = %err, "failed to seed starter data");
        }
    }

    tracing::info!(database = db.connection_string(), "database ready");

    let app = create_app(db);

    let addr = config.bind_addr();
    tracing::info!(%addr, "lang-portal backend listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("bind listener failed");

    let server = axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal());

    if let Err(err) = server.await {
        tracing::error!(error = %err, "server error");
    }

    tracing::info!("HTTP server stopped");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

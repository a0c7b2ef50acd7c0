use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use tavern_api::AppStateInner;
use tavern_api::generate::KoboldGenerator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tavern_server=debug,tavern_api=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let db_path = std::env::var("TAVERN_DB_PATH").unwrap_or_else(|_| "tavern.db".into());
    let llm_api = std::env::var("TAVERN_LLM_API")
        .unwrap_or_else(|_| "http://127.0.0.1:5001/api/v1/generate".into());
    let host = std::env::var("TAVERN_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("TAVERN_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;

    let db = tavern_db::Database::open(&PathBuf::from(&db_path))?;
    info!("Text generation via {}", llm_api);
    let state = AppStateInner::new(db, Arc::new(KoboldGenerator::new(llm_api)));

    let app = tavern_api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Tavern server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

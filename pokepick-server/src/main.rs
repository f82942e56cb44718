use std::io;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pokepick_server::config::ServerArgs;
use pokepick_server::{router, AppState};

const DEFAULT_FILTER: &str = "pokepick_server=info,tower_http=info";

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = ServerArgs::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(io::Error::other)?;

    let app = router(AppState::in_memory());
    let listener = tokio::net::TcpListener::bind(args.addr()).await?;
    info!(addr = %args.addr(), "server running");
    axum::serve(listener, app).await
}

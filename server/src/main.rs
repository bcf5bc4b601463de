use anyhow::Result;
use axum::Router;
use clap::Parser;
use cookbook_server::{build_app, ServerConfig};
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Catalog path (.json, .jsonl, or a directory of them)
    #[arg(long, default_value = "./catalog")]
    catalog: PathBuf,
    /// JSON engine config with the quantity limit and lookup tables
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory holding the serialized favorites and shopping list
    #[arg(long, default_value = "./prefs")]
    prefs: PathBuf,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let app: Router = build_app(ServerConfig { catalog: args.catalog, config: args.config, prefs: args.prefs })?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}

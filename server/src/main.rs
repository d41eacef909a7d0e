use anyhow::Result;
use axum::Router;
use clap::Parser;
use server::{build_app, seed_from_dir, AppState};
use std::net::SocketAddr;
use std::path::PathBuf;
use textlens_core::StopWordSets;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Directory of .txt files analysed at startup
    #[arg(long)]
    seed: Option<PathBuf>,
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

    let state = AppState::new(StopWordSets::default());
    if let Some(dir) = &args.seed {
        seed_from_dir(&state, dir)?;
    }
    let app: Router = build_app(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}

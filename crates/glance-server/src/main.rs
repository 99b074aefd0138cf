//! glance-server - vision API server binary.
//!
//! Wires the core service to an axum HTTP listener. The model backend is
//! the in-crate stub until a real inference engine is integrated.

mod http;

use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use glance_core::impls::StubEngine;
use glance_core::ports::VisionEngine;
use glance_core::{ServiceConfig, VisionService};

const DEFAULT_MODEL: &str = "MiaoshouAI/Florence-2-large-PromptGen-v2.0";

#[derive(Debug, Parser)]
#[command(name = "glance-server", about = "Serialized single-model vision inference service")]
struct Args {
    /// Host to listen on for HTTP requests
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on for HTTP requests
    #[arg(long, default_value_t = 54880)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    // TODO: replace with a real Florence-2 backend behind VisionEngine.
    let engine = Arc::new(StubEngine::new(DEFAULT_MODEL)) as Arc<dyn VisionEngine>;

    let (service, tasks) = VisionService::spawn(ServiceConfig::default(), engine);
    let app = http::router(service);

    let listener = TcpListener::bind((args.host.as_str(), args.port)).await?;
    info!(host = %args.host, port = args.port, model = DEFAULT_MODEL, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tasks.shutdown_and_join().await;
    Ok(())
}

async fn shutdown_signal() {
    // ignore errors: if the signal handler cannot install, run until killed
    let _ = tokio::signal::ctrl_c().await;
}

//! Ontology store HTTP server.
//!
//! Usage:
//!   ontology-server --schema ./ontology/schema.yaml --data-root ./data
//!
//! Every flag can also be set through its environment variable.

use anyhow::{Context, Result};
use clap::Parser;
use ontology_engine::{EngineConfig, OntologyEngine};
use ontology_server::build_router;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ontology-server")]
#[command(about = "Schema-driven ontology store over a JSON file tree")]
struct Args {
    /// Port for the HTTP API
    #[arg(short, long, env = "SERVER_PORT", default_value = "8080")]
    port: u16,

    /// Address to bind
    #[arg(long, env = "SERVER_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Path to the YAML schema document
    #[arg(short, long, env = "DSL_FILE_PATH", default_value = "./ontology/schema.yaml")]
    schema: PathBuf,

    /// Root directory for stored records
    #[arg(short, long, env = "DATA_ROOT_PATH", default_value = "./data")]
    data_root: PathBuf,

    /// Namespace directory to use instead of the schema's own
    #[arg(short, long, env = "ONTOLOGY_NAMESPACE")]
    namespace: Option<String>,

    /// Log filter, e.g. `info` or `ontology_storage=debug`
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let filter = EnvFilter::try_new(&args.log_level)
        .with_context(|| format!("invalid log filter '{}'", args.log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    info!("Ontology server starting...");

    let mut config = EngineConfig::new(&args.schema, &args.data_root);
    if let Some(namespace) = args.namespace.filter(|ns| !ns.is_empty()) {
        config = config.with_namespace(namespace);
    }
    let engine = tokio::task::spawn_blocking(move || OntologyEngine::open(config))
        .await
        .context("engine startup task failed")?
        .with_context(|| format!("failed to open ontology at {}", args.schema.display()))?;

    let schema = engine.schema().snapshot()?;
    info!(
        version = %schema.version,
        object_types = schema.object_types.len(),
        link_types = schema.link_types.len(),
        namespace = engine.namespace(),
        "Schema loaded"
    );

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", args.host, args.port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("HTTP API listening on {}", addr);

    axum::serve(listener, build_router(Arc::new(engine)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Ontology server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}

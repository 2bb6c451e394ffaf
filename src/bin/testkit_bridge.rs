//! testkit-bridge server binary
//!
//! Builds the handle table, registers the built-in handler namespaces, and
//! serves the dispatch protocol over HTTP until SIGINT/SIGTERM.

use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use testkit_bridge::context::ServerContext;
use testkit_bridge::dispatcher::Dispatcher;
use testkit_bridge::handlers;
use testkit_bridge::http::{run_http_server, HttpState};
use testkit_bridge::memory::Memory;
use testkit_bridge::metrics::Metrics;
use testkit_bridge::registry::HandlerRegistry;

#[derive(Parser, Debug)]
#[command(name = "testkit-bridge", version, about = "Remote-method dispatch server for test harnesses")]
struct Cli {
    /// Port to listen on
    #[arg(long, default_value_t = 8080)]
    port: u16,

    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    bind: String,

    /// Root directory for collaborator files (injected as the `directory`
    /// argument when callers omit it)
    #[arg(long, default_value = ".")]
    files_dir: PathBuf,

    /// Suffix appended to every handle, e.g. a host tag for multi-tenant
    /// deployments
    #[arg(long)]
    scope: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let local_addr: IpAddr = cli.bind.parse()?;

    let memory = match &cli.scope {
        Some(scope) => Memory::with_scope(scope.clone()),
        None => Memory::new(),
    };

    let mut registry = HandlerRegistry::new();
    handlers::register_builtins(&mut registry);
    info!(
        operations = registry.operation_count(),
        "Registered built-in handler namespaces"
    );

    let state = Arc::new(HttpState {
        dispatcher: Dispatcher::new(registry, Arc::new(memory)),
        context: ServerContext::new(cli.files_dir, local_addr),
        metrics: Metrics::new(),
    });

    info!("Starting testkit-bridge v{}", env!("CARGO_PKG_VERSION"));
    run_http_server(state, &cli.bind, cli.port).await
}

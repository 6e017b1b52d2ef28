//! Api / worker service entry point.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter, Registry};

use dual_env::api::{self, AppState};
use dual_env::cascade::{EffectiveEnvironment, EnvCascadeLoader, EnvLookup};
use dual_env::config::REPORTED_VARIABLES;
use dual_env::metrics;
use dual_env::service::{LoadedService, ServiceLayout, ServiceName};

type FilterHandle = reload::Handle<EnvFilter, Registry>;

/// Api and worker services with a tiered .env cascade.
#[derive(Parser, Debug)]
#[command(name = "dual-env")]
#[command(about = "Serve the resolved environment of the api or worker service")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Service to run.
    #[arg(short, long, value_enum, env = "DUAL_SERVICE", default_value_t = ServiceName::Api, global = true)]
    service: ServiceName,

    /// Installation root holding .env.base and apps/.
    #[arg(long, env = "DUAL_ROOT", default_value = ".", global = true)]
    root: PathBuf,

    /// Parent repository holding .dual/.local overrides.
    #[arg(long, env = "DUAL_CONTEXT_ROOT", global = true)]
    context_root: Option<PathBuf>,

    /// HTTP server port (overrides PORT).
    #[arg(short, long, global = true)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load the env cascade and serve it over HTTP (default).
    Serve,

    /// Print which env files were found and what they define.
    CheckEnv,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    let from_process = std::env::var_os("RUST_LOG").is_some();
    let filter = if args.verbose {
        EnvFilter::new("dual_env=debug,info")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let (filter, filter_handle) = reload::Layer::new(filter);
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();

    // RUST_LOG from an env file only applies when nothing else chose a filter
    let filter_handle = (!args.verbose && !from_process).then_some(filter_handle);

    match &args.command {
        Some(Command::CheckEnv) => cmd_check_env(&args),
        Some(Command::Serve) | None => {
            let handle = match metrics::install_recorder() {
                Ok(handle) => Some(handle),
                Err(e) => {
                    warn!("Metrics recorder unavailable: {}", e);
                    None
                }
            };
            metrics::init_metrics();
            cmd_serve(&args, handle, filter_handle).await
        }
    }
}

/// Build the layout from CLI arguments and load the cascade.
fn load_service(args: &Args) -> anyhow::Result<(ServiceLayout, LoadedService)> {
    let mut layout = ServiceLayout::new(&args.root, args.service)?;
    if let Some(context_root) = &args.context_root {
        layout = layout.with_context_root(context_root)?;
    }

    let loaded = layout
        .load(&EnvCascadeLoader::new(), EffectiveEnvironment::from_process())
        .map_err(|e| {
            error!("Failed to load environment: {}", e);
            e
        })?;

    Ok((layout, loaded))
}

/// Load the cascade and serve it until shutdown.
async fn cmd_serve(
    args: &Args,
    metrics_handle: Option<PrometheusHandle>,
    filter_handle: Option<FilterHandle>,
) -> anyhow::Result<()> {
    info!("=== {} service starting ===", args.service);

    let (_layout, loaded) = load_service(args)?;
    let LoadedService {
        environment,
        provenance,
        config,
    } = loaded;

    if let Some(handle) = filter_handle {
        match EnvFilter::try_new(&config.rust_log) {
            Ok(filter) => {
                if let Err(e) = handle.reload(filter) {
                    warn!("Failed to apply RUST_LOG={}: {}", config.rust_log, e);
                }
            }
            Err(e) => warn!("Ignoring invalid RUST_LOG={}: {}", config.rust_log, e),
        }
    }

    let port = config.effective_port(args.service, args.port);

    info!("=== Environment Variables ===");
    info!("PORT: {}", port);
    for name in REPORTED_VARIABLES {
        info!("{}: {}", name, environment.lookup(name).unwrap_or("<unset>"));
    }

    let mut state = AppState::new(args.service, port, environment, provenance);
    if let Some(handle) = metrics_handle {
        state = state.with_metrics(handle);
    }

    // Start HTTP server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!("{} service listening on {}", args.service, addr);
    info!("Visit http://localhost:{}/ to see environment info", port);

    api::serve(listener, state).await?;

    info!("{} service stopped", args.service);
    Ok(())
}

/// Print the cascade without starting the server.
fn cmd_check_env(args: &Args) -> anyhow::Result<()> {
    println!("======================================================================");
    println!("{} SERVICE - ENVIRONMENT CHECK", args.service.to_string().to_uppercase());
    println!("======================================================================");

    let (layout, loaded) = load_service(args)?;
    let LoadedService {
        environment,
        provenance,
        config,
    } = loaded;

    println!("Root: {}", layout.root.display());
    println!("----------------------------------------------------------------------");
    for loaded in provenance.iter() {
        let status = if loaded.parsed.existed { "found" } else { "missing" };
        println!(
            "  [{}] {} ({}): {}",
            loaded.source.tier,
            loaded.source.label,
            status,
            loaded.source.path.display()
        );
        for name in provenance.variables(loaded.source.tier) {
            println!("      {}", name);
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Resolved:");
    for name in REPORTED_VARIABLES {
        let tiers = provenance.defined_in(name);
        let origin = match tiers.last() {
            Some(tier) => provenance
                .get(*tier)
                .map(|loaded| loaded.source.label.clone())
                .unwrap_or_default(),
            None if environment.contains(name) => "inherited".to_string(),
            None => "unset".to_string(),
        };
        println!(
            "  {} = {} [{}]",
            name,
            environment.lookup(name).unwrap_or(""),
            origin
        );
    }

    println!(
        "  PORT = {}",
        config.effective_port(args.service, args.port)
    );
    println!("======================================================================");

    Ok(())
}

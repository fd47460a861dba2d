use std::sync::Arc;

use clap::Parser;

use spa_edge::config::{AppState, Config, RouterPolicy};
use spa_edge::{logger, server};

/// Edge router serving a single-page application
#[derive(Debug, Parser)]
#[command(name = "spa-edge", version, about)]
struct Args {
    /// Configuration file path, extension optional
    #[arg(short, long, default_value = "config")]
    config: String,

    /// Validate the configuration and exit
    #[arg(long)]
    check: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let cfg = Config::load_from(&args.config)?;

    if args.check {
        print_summary(&cfg)?;
        return Ok(());
    }

    logger::init(&cfg)?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_listener(addr, cfg.server.backlog)?;

    let state = Arc::new(AppState::from_config(cfg)?);
    logger::log_server_start(&addr, &state.config, &state.storage.describe());
    server::start_signal_handler(Arc::clone(&state.shutdown))?;

    // Connections are served with spawn_local
    let local = tokio::task::LocalSet::new();
    local.run_until(server::run(listener, state)).await;
    Ok(())
}

fn print_summary(cfg: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let policy = RouterPolicy::from_config(cfg).map_err(spa_edge::config::ConfigError::Invalid)?;
    println!("Configuration OK");
    println!("  listen:           {addr}");
    println!("  storage root:     {}", cfg.storage.root);
    println!("  root document:    {}", policy.root_document);
    println!("  asset extensions: {}", policy.asset_extension_count());
    println!("  missing assets:   {:?}", policy.missing_asset);
    println!(
        "  handoff endpoint: {}",
        policy.endpoints.handoff.as_deref().unwrap_or("disabled")
    );
    Ok(())
}

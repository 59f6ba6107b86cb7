use anyhow::{Context, Result};
use clap::Parser;
use evoplat_core::{init_logging, AppConfig};
use evoplat_lib::app::{run_local, Session, ShutdownManager};
use evoplat_lib::client::{channel_url, NetworkManager, OptimizationRequest, TaskClient};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Where populations come from
    #[arg(short, long, value_enum, default_value = "connect")]
    mode: Mode,

    /// Custom config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Join an existing task instead of creating one
    #[arg(long)]
    task_id: Option<String>,

    /// Population size (overrides the config)
    #[arg(long)]
    population: Option<usize>,

    /// Moves per candidate (overrides the config)
    #[arg(long)]
    dimension: Option<usize>,

    /// Seed for the offline population
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum Mode {
    Connect,
    Local,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_logging("info");
    let args = Args::parse();

    let mut config = AppConfig::load(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config))?;
    if let Some(size) = args.population {
        config.optimization.population_size = size;
    }
    if let Some(dimension) = args.dimension {
        config.optimization.dimension = dimension;
    }
    config.validate()?;
    tracing::info!(fingerprint = %config.fingerprint(), "Configuration loaded");

    match args.mode {
        Mode::Local => {
            let report = run_local(
                &config,
                config.optimization.population_size,
                config.optimization.dimension,
                args.seed,
            )?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Mode::Connect => {
            let task_id = match args.task_id {
                Some(id) => id,
                None => {
                    let client = TaskClient::new(&config.client)?;
                    let request = OptimizationRequest::from_config(&config.optimization);
                    client.create_task(&request).await?.task_id
                }
            };

            let url = channel_url(&config.client.ws_url, &task_id);
            let (network, inbound) = NetworkManager::connect(&url)
                .await
                .with_context(|| format!("Failed to open channel {url}"))?;

            let shutdown = Arc::new(ShutdownManager::new());
            shutdown.listen_for_ctrl_c();

            let session = Session::new(&config);
            let summary = session
                .run(inbound, network.sender(), shutdown.subscribe())
                .await;
            let state = network.get_state();
            if let Some(error) = state.last_error {
                tracing::warn!(error = %error, "Channel ended with an error");
            }
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}

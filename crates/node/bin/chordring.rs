use std::time::Duration;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use chordring_node::config::Config;
use chordring_node::config::DEFAULT_CONFIG_PATH;
use chordring_node::logging::init_logging;
use chordring_node::logging::LogLevel;
use chordring_node::simulation::SimulationEngine;
use chordring_node::util::build_version;

#[derive(Parser, Debug)]
#[command(about, version, author)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(long, default_value_t = LogLevel::Info, value_enum, env)]
    log_level: LogLevel,
}

#[derive(Subcommand, Debug)]
#[command(rename_all = "kebab-case")]
enum Command {
    #[command(about = "Writes a default ring configuration.")]
    Init(InitCommand),
    #[command(about = "Bootstraps the ring, drives it and prints a snapshot of every peer.")]
    Run(RunCommand),
    #[command(about = "Bootstraps the ring and resolves keys through it.")]
    Lookup(LookupCommand),
}

#[derive(Args, Debug)]
struct ConfigArgs {
    #[arg(
        long,
        short = 'c',
        env,
        default_value = DEFAULT_CONFIG_PATH,
        help = "Config file location"
    )]
    pub config: String,
}

#[derive(Args, Debug)]
struct InitCommand {
    #[arg(
        long,
        default_value = DEFAULT_CONFIG_PATH,
        help = "The location of config file"
    )]
    pub location: String,

    #[arg(long, help = "Bit width of the ring. If not provided, use 6")]
    pub bits: Option<u32>,
}

#[derive(Args, Debug)]
struct RunCommand {
    #[command(flatten)]
    config_args: ConfigArgs,

    #[arg(long, help = "Driver steps. If not provided, use steps in config file")]
    pub steps: Option<u64>,

    #[arg(
        long,
        help = "Drive each peer with its own stabilization timer instead of the step driver"
    )]
    pub timer: bool,
}

#[derive(Args, Debug)]
struct LookupCommand {
    #[command(flatten)]
    config_args: ConfigArgs,

    #[arg(required = true, help = "Keys to resolve")]
    pub keys: Vec<String>,
}

async fn bootstrap(config: &Config, steps: u64, timer: bool) -> anyhow::Result<SimulationEngine> {
    let mut engine = SimulationEngine::new(config.network.clone())?;
    engine.init_network(&config.peers).await?;
    tracing::info!("ring bootstrapped with {} peers", config.peers.len());

    if timer {
        let interval = Duration::from_millis(config.stabilize_interval_ms);
        let handles = engine.spawn_stabilizers(interval);
        tokio::time::sleep(interval.saturating_mul(steps as u32)).await;
        for h in handles {
            h.abort();
        }
    } else {
        engine
            .run(steps, Duration::from_millis(config.pace_ms))
            .await?;
    }
    tracing::info!("ring driven for {} steps", steps);

    for item in config.data.iter() {
        if let Err(e) = engine.store_data(&item.key, &item.value).await {
            tracing::warn!("failed to store {}: {}", item.key, e);
        }
    }
    Ok(engine)
}

async fn run(args: RunCommand) -> anyhow::Result<()> {
    let config = Config::read_fs(args.config_args.config.as_str())?;
    let steps = args.steps.unwrap_or(config.steps);
    let engine = bootstrap(&config, steps, args.timer).await?;
    let inspect = engine.inspect().await;
    println!("{}", serde_json::to_string_pretty(&inspect)?);
    Ok(())
}

async fn lookup(args: LookupCommand) -> anyhow::Result<()> {
    let config = Config::read_fs(args.config_args.config.as_str())?;
    let engine = bootstrap(&config, config.steps, false).await?;
    for key in args.keys.iter() {
        match engine.lookup_data(key).await? {
            Some(value) => println!("{}: {}", key, value),
            None => println!("{}: not found", key),
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level);
    tracing::debug!("chordring {}", build_version());

    match cli.command {
        Command::Init(args) => {
            let mut config = Config::default();
            if let Some(bits) = args.bits {
                config.network.bits = bits;
                let size = 1u64 << bits.min(63);
                config.peers.retain(|p| *p < size);
            }
            let path = config.write_fs(args.location.as_str())?;
            println!("Your config file has saved to: {}", path);
            Ok(())
        }
        Command::Run(args) => run(args).await,
        Command::Lookup(args) => lookup(args).await,
    }
}

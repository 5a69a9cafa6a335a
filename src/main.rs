#[cfg(not(feature = "std"))]
fn main() {}

#[cfg(feature = "std")]
use subsim_bot::{init_logging, BotNode, BotTuning, GameSummary, TcpTransport, TurnController};

#[cfg(feature = "std")]
use clap::Parser;
#[cfg(feature = "std")]
use rand::rngs::SmallRng;
#[cfg(feature = "std")]
use rand::SeedableRng;
#[cfg(feature = "std")]
use tokio::time::Duration;

/// Autonomous submarine bot for the SubSim game server.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[cfg(feature = "std")]
struct Cli {
    /// Player name to join the game with.
    #[arg(long, default_value = "Nautilus")]
    name: String,
    #[arg(long, default_value = "localhost")]
    host: String,
    #[arg(long, default_value_t = 9555)]
    port: u16,
    /// Log every line sent and received.
    #[arg(long)]
    debug: bool,
    #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
    seed: Option<u64>,
    /// Give up when the server is silent for this long. Blocks forever if unset.
    #[arg(long)]
    read_timeout_secs: Option<u64>,
    /// Probability of retargeting onto a larger object within range.
    #[arg(long)]
    larger_target_accept: Option<f64>,
    /// Probability of switching between equally fresh contacts.
    #[arg(long)]
    tie_accept: Option<f64>,
    /// Print the final results as JSON.
    #[arg(long)]
    json: bool,
}

#[cfg(feature = "std")]
#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    match run(cli).await {
        Ok(()) => {}
        Err(e) => {
            eprintln!("ERROR: {e:#}");
            std::process::exit(1);
        }
    }
}

#[cfg(feature = "std")]
async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut tuning = BotTuning::default();
    if let Some(p) = cli.larger_target_accept {
        tuning.larger_target_accept = p;
    }
    if let Some(p) = cli.tie_accept {
        tuning.tie_accept = p;
    }
    tuning.validate()?;

    let mut rng = if let Some(s) = cli.seed {
        log::info!("Using fixed seed: {} (game will be reproducible)", s);
        SmallRng::seed_from_u64(s)
    } else {
        let mut seed_rng = rand::rng();
        SmallRng::from_rng(&mut seed_rng)
    };

    log::info!("Server Host:Port  : {}:{}", cli.host, cli.port);
    let mut tcp = TcpTransport::connect((cli.host.as_str(), cli.port)).await?;
    tcp.set_read_timeout(cli.read_timeout_secs.map(Duration::from_secs));

    let controller = TurnController::new(cli.name, tuning);
    let mut node = BotNode::new(controller, Box::new(tcp));
    let summary = node.run(&mut rng).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

#[cfg(feature = "std")]
fn print_summary(summary: &GameSummary) {
    println!(
        "Game {} after {} turns",
        summary.status, summary.turn_count
    );
    for player in &summary.players {
        println!("  {:<20} {}", player.name, player.score);
    }
}

//! Round replay CLI
//!
//! Loads a config and an event script, replays the round and prints what
//! everybody ended up knowing.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use game_events::load_script;
use round_sim::{default_config_toml, ReportWriter, RoundConfig, RoundError, RoundRunner};

/// Command line arguments for the replay
#[derive(Parser, Debug)]
#[command(name = "round_sim")]
#[command(about = "Replays a hidden-role round through the knowledge engine")]
struct Args {
    /// TOML config file (defaults to round.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSONL event script to replay
    #[arg(long, required_unless_present = "print_default_config")]
    script: Option<PathBuf>,

    /// Seed for drawing impostors
    #[arg(long)]
    seed: Option<u64>,

    /// Fixed impostor ids, comma separated
    #[arg(long, value_delimiter = ',')]
    impostors: Option<Vec<usize>>,

    /// Where to write meeting reports
    #[arg(long)]
    report: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Print the default configuration and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if args.print_default_config {
        print!("{}", default_config_toml());
        return ExitCode::SUCCESS;
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), RoundError> {
    let mut config = RoundConfig::load_or_default(args.config.as_deref())?;
    apply_overrides(&mut config, &args);
    init_logging(&config.output.log_level, args.verbose);

    let Some(script) = args.script else {
        return Ok(());
    };
    let events = load_script(&script)?;
    tracing::info!(events = events.len(), script = %script.display(), "loaded event script");

    let writer = ReportWriter::new(&config.output.report_path)?;
    let mut runner = RoundRunner::new(&config)?.with_writer(writer);
    let summary = runner.run(events)?;

    println!("Round Replay");
    println!("============");
    println!("Real world: {}", summary.real_world);
    println!("Events applied: {}", summary.events_applied);
    println!("Meetings: {}", summary.meetings);
    println!("Outcome: {:?}", summary.outcome);
    println!();
    for agent in &summary.final_report.report.agents {
        println!(
            "  agent {}: impostors {:?}, crewmates {:?}, suspects {:?}",
            agent.agent, agent.known_impostors, agent.known_crewmates, agent.suspects
        );
    }
    println!();
    println!("Reports written to {}", config.output.report_path);

    Ok(())
}

fn apply_overrides(config: &mut RoundConfig, args: &Args) {
    if let Some(seed) = args.seed {
        config.game.seed = seed;
    }
    if let Some(impostors) = &args.impostors {
        config.game.num_impostors = impostors.len();
        config.game.impostors = impostors.clone();
    }
    if let Some(report) = &args.report {
        config.output.report_path = report.display().to_string();
    }
}

fn init_logging(level: &str, verbose: bool) {
    let log_level = if verbose { "debug" } else { level };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();
}

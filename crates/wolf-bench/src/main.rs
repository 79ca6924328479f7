use std::path::PathBuf;

use clap::Parser;

use wolf_bench::arena::ArenaRunner;
use wolf_bench::config::{BenchConfig, ResolvedOutputs};
use wolf_bench::logging::init_logging;

/// Self-play arena for the werewolf agents.
#[derive(Debug, Parser)]
#[command(
    name = "wolf-bench",
    author,
    version,
    about = "Deterministic werewolf self-play arena"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/arena.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of games to play.
    #[arg(long, value_name = "GAMES")]
    games: Option<usize>,

    /// Override the RNG seed for role deals and tie breaks.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Override the table size (5 or 15).
    #[arg(long, value_name = "COUNT")]
    players: Option<usize>,

    /// Exit after validating the configuration (no games are played).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = BenchConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(games) = cli.games {
        config.games.count = games;
    }

    if let Some(seed) = cli.seed {
        config.games.seed = Some(seed);
    }

    if let Some(players) = cli.players {
        config.games.players = players;
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let run_id = config.run_id.clone();
    let games = config.games.count;
    let players = config.games.players;

    println!(
        "Loaded configuration '{run_id}': {games} game{} at a {players}-player table",
        if games == 1 { "" } else { "s" }
    );

    let _logging_guard = init_logging(&config.logging, &outputs, &run_id)?;
    let runner = ArenaRunner::new(config, outputs)?;

    if cli.validate_only {
        println!("Validation-only mode: no games played.");
        return Ok(());
    }

    let summary = runner.run()?;
    println!(
        "Arena complete for '{run_id}': {} games ({} village / {} werewolf wins) -> {} rows at {}",
        summary.games_played,
        summary.village_wins,
        summary.werewolf_wins,
        summary.rows_written,
        summary.jsonl_path.display()
    );
    println!("Summary table: {}", summary.summary_path.display());
    if let Some(telemetry_path) = summary.telemetry_path.as_ref() {
        println!("Telemetry log: {}", telemetry_path.display());
    }

    Ok(())
}

mod game;
mod summary;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng, rngs::StdRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};
use wolf_bot::{EngineError, SeriesPlayer};
use wolf_core::model::{Agent, Alignment, GameSetting, Role};
use wolf_core::stats::HistoricalSignal;

use crate::config::{BenchConfig, ResolvedOutputs};

pub use game::GameRecord;
pub use summary::{RunTally, SeatTally};

/// Self-play arena: every seat is a [`SeriesPlayer`] that keeps its
/// statistics for the whole run.
pub struct ArenaRunner {
    config: BenchConfig,
    outputs: ResolvedOutputs,
    setting: GameSetting,
    logging_enabled: bool,
}

/// Summary details returned after a run.
#[derive(Debug)]
pub struct RunSummary {
    pub games_played: usize,
    pub rows_written: usize,
    pub village_wins: u32,
    pub werewolf_wins: u32,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
    pub telemetry_path: Option<PathBuf>,
}

impl ArenaRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: BenchConfig, outputs: ResolvedOutputs) -> Result<Self, ArenaError> {
        let mut setting = GameSetting::standard(config.games.players);
        if setting.role_pool().len() != config.games.players {
            return Err(ArenaError::TableSize {
                players: config.games.players,
            });
        }
        setting.talk_turns = config.games.talk_turns;
        setting.max_day = config.games.max_days;

        Ok(Self {
            logging_enabled: config.logging.structured,
            config,
            outputs,
            setting,
        })
    }

    pub fn setting(&self) -> &GameSetting {
        &self.setting
    }

    /// Play every game, streaming one JSONL row per game to disk.
    pub fn run(&self) -> Result<RunSummary, ArenaError> {
        ensure_dir(&self.outputs.dir)?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut rng = StdRng::seed_from_u64(self.config.games.seed.unwrap_or(0));
        let mut players: Vec<SeriesPlayer> = (0..self.setting.player_num)
            .map(|_| SeriesPlayer::from_env(rng.next_u64()))
            .collect();
        let mut tally = RunTally::default();
        let mut rows_written = 0usize;

        for game_index in 0..self.config.games.count {
            let game_seed = rng.next_u64();
            let mut game_rng = StdRng::seed_from_u64(game_seed);
            let mut roles = self.setting.role_pool();
            roles.shuffle(&mut game_rng);

            let record =
                game::play_game(&mut players, &roles, &self.setting, &mut game_rng, game_index)?;
            tally.record(&record);
            self.log_game(game_index, &record);

            let row = GameLogRow::new(&self.config.run_id, game_index, game_seed, &record, &players);
            serde_json::to_writer(&mut writer, &row)?;
            writer.write_all(b"\n")?;
            rows_written += 1;
        }
        writer.flush()?;

        for (seat, player) in Agent::roster(players.len()).into_iter().zip(&players) {
            tally.set_final_signal(seat, player.signal());
        }
        tally.write_markdown(&self.outputs.summary_md, &self.config.run_id)?;

        let telemetry_path = self
            .logging_enabled
            .then(|| self.outputs.telemetry_dir().join("telemetry.jsonl"));

        Ok(RunSummary {
            games_played: self.config.games.count,
            rows_written,
            village_wins: tally.village_wins(),
            werewolf_wins: tally.werewolf_wins(),
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
            telemetry_path,
        })
    }

    fn log_game(&self, game_index: usize, record: &GameRecord) {
        if !self.logging_enabled || !tracing::enabled!(Level::INFO) {
            return;
        }
        let survivors = record
            .survivors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        event!(
            target: "wolf_bench::game",
            Level::INFO,
            run_id = %self.config.run_id,
            game_index = game_index as u64,
            winner = %record.winner,
            days = record.days,
            talks = record.talks as u64,
            survivors = %survivors,
        );
    }
}

fn ensure_dir(dir: &Path) -> Result<(), ArenaError> {
    if !dir.as_os_str().is_empty() {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

#[derive(Serialize)]
struct SeatRow {
    seat: Agent,
    role: Role,
    alive: bool,
    won: bool,
    signal: HistoricalSignal,
}

#[derive(Serialize)]
struct GameLogRow {
    run_id: String,
    game_id: String,
    game_index: usize,
    game_seed: u64,
    players: usize,
    winner: Alignment,
    days: u32,
    talks: usize,
    executed: Vec<Agent>,
    attacked: Vec<Agent>,
    seats: Vec<SeatRow>,
}

impl GameLogRow {
    fn new(
        run_id: &str,
        game_index: usize,
        game_seed: u64,
        record: &GameRecord,
        players: &[SeriesPlayer],
    ) -> Self {
        let seats = record
            .roles
            .iter()
            .zip(players)
            .map(|((seat, role), player)| SeatRow {
                seat: *seat,
                role: *role,
                alive: record.survivors.contains(seat),
                won: role.alignment() == record.winner,
                signal: player.signal(),
            })
            .collect();
        Self {
            run_id: run_id.to_string(),
            game_id: format!("G{game_index:05}"),
            game_index,
            game_seed,
            players: record.roles.len(),
            winner: record.winner,
            days: record.days,
            talks: record.talks,
            executed: record.executed.clone(),
            attacked: record.attacked.clone(),
            seats,
        }
    }
}

#[derive(Debug, Error)]
pub enum ArenaError {
    #[error("engine for {seat} failed: {source}")]
    Engine {
        seat: Agent,
        #[source]
        source: EngineError,
    },
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("no role composition for {players} players")]
    TableSize { players: usize },
    #[error("game execution failed: {message}")]
    Game { message: String },
}

impl ArenaError {
    fn game(message: String) -> Self {
        ArenaError::Game { message }
    }
}

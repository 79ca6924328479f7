use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

const SUPPORTED_PLAYERS: [usize; 2] = [5, 15];
const GAMES_FILE: &str = "games.jsonl";
const SUMMARY_FILE: &str = "summary.md";

/// Arena run description, loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BenchConfig {
    pub run_id: String,
    pub games: GamesConfig,
    /// Output directory; `{run_id}` is substituted.
    #[serde(default = "default_out_dir")]
    pub out_dir: String,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BenchConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();
        let raw = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            source,
            path: path.clone(),
        })?;
        let cfg: BenchConfig =
            serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
                source,
                path: path.clone(),
            })?;
        cfg.validate()
            .map_err(|source| ConfigError::Invalid { path, source })?;
        Ok(cfg)
    }

    /// Checks everything the arena relies on. Call again after CLI overrides.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let run_id_ok = !self.run_id.is_empty()
            && self
                .run_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
        if !run_id_ok {
            return Err(ValidationError::RunId(self.run_id.clone()));
        }
        if self.out_dir.trim().is_empty() {
            return Err(ValidationError::EmptyOutDir);
        }
        self.games.validate()
    }

    pub fn resolved_outputs(&self) -> ResolvedOutputs {
        let dir = PathBuf::from(self.out_dir.replace("{run_id}", &self.run_id));
        ResolvedOutputs {
            jsonl: dir.join(GAMES_FILE),
            summary_md: dir.join(SUMMARY_FILE),
            dir,
        }
    }
}

/// How many games to play and at which table size.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GamesConfig {
    pub count: usize,
    pub seed: Option<u64>,
    #[serde(default = "default_players")]
    pub players: usize,
    #[serde(default = "default_talk_turns")]
    pub talk_turns: u32,
    #[serde(default = "default_max_days")]
    pub max_days: u32,
}

impl GamesConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.count == 0 {
            return Err(ValidationError::NoGames);
        }
        if !SUPPORTED_PLAYERS.contains(&self.players) {
            return Err(ValidationError::TableSize(self.players));
        }
        if self.talk_turns == 0 || self.max_days == 0 {
            return Err(ValidationError::EmptySchedule {
                talk_turns: self.talk_turns,
                max_days: self.max_days,
            });
        }
        Ok(())
    }
}

fn default_players() -> usize {
    5
}

fn default_talk_turns() -> u32 {
    3
}

fn default_max_days() -> u32 {
    10
}

fn default_out_dir() -> String {
    "bench/out/{run_id}".to_string()
}

/// Structured telemetry is off unless asked for.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub structured: bool,
    #[serde(default)]
    pub level: LogLevel,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

/// Where a run writes its artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputs {
    pub dir: PathBuf,
    pub jsonl: PathBuf,
    pub summary_md: PathBuf,
}

impl ResolvedOutputs {
    /// Directory that receives `telemetry.jsonl`.
    pub fn telemetry_dir(&self) -> &Path {
        &self.dir
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("run_id {0:?} must be non-empty ASCII alphanumerics, '.', '_' or '-'")]
    RunId(String),
    #[error("games.count must be greater than zero")]
    NoGames,
    #[error("games.players = {0}; supported table sizes are 5 and 15")]
    TableSize(usize),
    #[error("games need at least one talk turn and one day (talk_turns = {talk_turns}, max_days = {max_days})")]
    EmptySchedule { talk_turns: u32, max_days: u32 },
    #[error("out_dir must not be empty")]
    EmptyOutDir,
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASIC_YAML: &str = r#"
run_id: "village_smoke"
games:
  count: 12
  seed: 99
logging:
  structured: true
  level: debug
"#;

    fn parse(yaml: &str) -> BenchConfig {
        serde_yaml::from_str(yaml).expect("parse yaml")
    }

    #[test]
    fn defaults_fill_the_games_block_and_outputs() {
        let cfg = parse(BASIC_YAML);
        cfg.validate().expect("validate");

        assert_eq!(cfg.games.players, 5);
        assert_eq!(cfg.games.talk_turns, 3);
        assert_eq!(cfg.games.max_days, 10);
        assert_eq!(Level::from(cfg.logging.level), Level::DEBUG);

        let outputs = cfg.resolved_outputs();
        assert_eq!(
            outputs.jsonl,
            PathBuf::from("bench/out/village_smoke/games.jsonl")
        );
        assert_eq!(outputs.telemetry_dir(), Path::new("bench/out/village_smoke"));
    }

    #[test]
    fn rejects_unsupported_table_size() {
        let cfg = parse(&BASIC_YAML.replace("seed: 99", "seed: 99\n  players: 9"));
        assert_eq!(cfg.validate(), Err(ValidationError::TableSize(9)));
    }

    #[test]
    fn rejects_empty_schedule_and_zero_games() {
        let cfg = parse(&BASIC_YAML.replace("count: 12", "count: 0"));
        assert_eq!(cfg.validate(), Err(ValidationError::NoGames));

        let cfg = parse(&BASIC_YAML.replace("seed: 99", "seed: 99\n  max_days: 0"));
        assert!(matches!(
            cfg.validate(),
            Err(ValidationError::EmptySchedule { max_days: 0, .. })
        ));
    }

    #[test]
    fn rejects_run_id_with_spaces() {
        let cfg = parse(&BASIC_YAML.replace("village_smoke", "village smoke"));
        assert!(matches!(cfg.validate(), Err(ValidationError::RunId(_))));
    }

    #[test]
    fn logging_block_is_optional() {
        let yaml = BASIC_YAML.split("logging:").next().unwrap_or_default();
        let cfg = parse(yaml);
        cfg.validate().expect("valid");
        assert!(!cfg.logging.structured);
        assert_eq!(cfg.logging.level, LogLevel::Info);
    }

    #[test]
    fn unknown_level_is_a_parse_error() {
        let yaml = BASIC_YAML.replace("level: debug", "level: verbose");
        assert!(serde_yaml::from_str::<BenchConfig>(&yaml).is_err());
    }

    #[test]
    fn missing_file_reports_its_path() {
        let err = BenchConfig::from_path("does/not/exist.yaml").expect_err("missing");
        assert!(matches!(
            err,
            ConfigError::Read { ref path, .. } if path == Path::new("does/not/exist.yaml")
        ));
    }
}

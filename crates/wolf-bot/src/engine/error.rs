use core::fmt;
use thiserror::Error;
use wolf_core::model::Role;

/// Role-specific actions that only some engines support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Divine,
    Guard,
    Attack,
    Whisper,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Action::Divine => "divine",
            Action::Guard => "guard",
            Action::Attack => "attack",
            Action::Whisper => "whisper",
        };
        f.write_str(label)
    }
}

/// Dispatcher defects. Game-state ambiguity never ends up here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("{role} engine cannot {action}")]
    Unsupported { role: Role, action: Action },
    #[error("{role} engine used before initialize")]
    NotInitialized { role: Role },
    #[error("no game in progress")]
    NoActiveGame,
    #[error("game info does not name the playing agent or its role")]
    MissingSelf,
    #[error("{expected} engine was handed a game as {actual}")]
    RoleMismatch { expected: Role, actual: Role },
}

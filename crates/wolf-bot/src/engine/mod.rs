//! Role engines behind a single lifecycle interface.
//!
//! Every engine builds on [`VillagerEngine`]: it owns the belief table, the
//! claim ledger and the talk interpreter for the current game. Specialised
//! roles add their own knowledge (divinations, identifications, the werewolf
//! pack) and override the actions their role can take.

mod bodyguard;
mod error;
mod medium;
mod seer;
#[cfg(test)]
mod testutil;
mod villager;
mod werewolf;

pub use bodyguard::BodyguardEngine;
pub use error::{Action, EngineError};
pub use medium::MediumEngine;
pub use seer::SeerEngine;
pub use villager::{GameState, SharedParser, VillagerEngine, VotePlan};
pub use werewolf::WerewolfEngine;

use wolf_core::content::Content;
use wolf_core::model::{Agent, GameInfo, GameSetting, Role};
use wolf_core::stats::{HistoricalSignal, OutcomeStatistics};

/// Handed to the engine when a game ends.
#[derive(Debug, Clone, Copy)]
pub struct FinishReport<'a> {
    pub statistics: &'a OutcomeStatistics,
    pub signal: HistoricalSignal,
    pub games_completed: u32,
}

/// Lifecycle every role engine exposes to the dispatcher.
///
/// Optional actions default to [`EngineError::Unsupported`]; a role asked to do
/// something outside its role is a dispatcher bug and must surface.
pub trait RoleEngine {
    fn role(&self) -> Role;

    fn initialize(
        &mut self,
        info: &GameInfo,
        setting: &GameSetting,
        signal: HistoricalSignal,
    ) -> Result<(), EngineError>;

    fn day_start(&mut self) -> Result<(), EngineError>;

    fn update(&mut self, info: &GameInfo) -> Result<(), EngineError>;

    fn talk(&mut self) -> Result<Content, EngineError>;

    fn vote(&mut self) -> Result<Agent, EngineError>;

    fn divine(&mut self) -> Result<Agent, EngineError> {
        Err(unsupported(self.role(), Action::Divine))
    }

    fn guard(&mut self) -> Result<Agent, EngineError> {
        Err(unsupported(self.role(), Action::Guard))
    }

    fn attack(&mut self) -> Result<Agent, EngineError> {
        Err(unsupported(self.role(), Action::Attack))
    }

    fn whisper(&mut self) -> Result<Content, EngineError> {
        Err(unsupported(self.role(), Action::Whisper))
    }

    fn finish(&mut self, report: &FinishReport<'_>);
}

fn unsupported(role: Role, action: Action) -> EngineError {
    EngineError::Unsupported { role, action }
}

use super::outcome::OutcomeStatistics;
use crate::belief::argmax;
use crate::model::{Agent, Alignment};
use serde::Serialize;

/// Agents with the best historical win rate on each side.
///
/// Empty until the corresponding table has at least one finished game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HistoricalSignal {
    pub strongest_village: Option<Agent>,
    pub strongest_werewolf: Option<Agent>,
}

impl HistoricalSignal {
    pub const NONE: HistoricalSignal = HistoricalSignal {
        strongest_village: None,
        strongest_werewolf: None,
    };

    pub fn from_statistics(stats: &OutcomeStatistics) -> Self {
        Self {
            strongest_village: argmax(&stats.table(Alignment::Village).win_share()),
            strongest_werewolf: argmax(&stats.table(Alignment::Werewolf).win_share()),
        }
    }

    pub fn strongest(&self, alignment: Alignment) -> Option<Agent> {
        match alignment {
            Alignment::Village => self.strongest_village,
            Alignment::Werewolf => self.strongest_werewolf,
        }
    }
}

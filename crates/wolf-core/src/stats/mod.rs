//! Win/loss bookkeeping carried across a series of games.

mod outcome;
mod signal;

pub use outcome::{OutcomeStatistics, OutcomeTable, StatsContext, WinLoss, detect_winner};
pub use signal::HistoricalSignal;

//! Reading the public talk log into claims.

mod interpreter;
mod ledger;

pub use interpreter::{ConsumeOutcome, TalkInterpreter};
pub use ledger::{ClaimLedger, ObservedVotes};

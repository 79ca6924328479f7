use super::ledger::ClaimLedger;
use crate::content::{Claim, ClaimKind, ContentParser, ParseError};
use crate::model::{Agent, Judge, Talk};
use crate::stats::HistoricalSignal;

/// Result of one pass over the talk log.
#[derive(Debug, Default)]
pub struct ConsumeOutcome {
    /// Statements past the cursor, including our own and unparseable ones.
    pub examined: usize,
    pub claims: Vec<Claim>,
    pub rejected: Vec<(usize, ParseError)>,
    /// The log was shorter than the cursor and the cursor was pulled back.
    pub clamped: bool,
}

/// Incremental reader over the current day's talk log.
#[derive(Debug, Clone, Default)]
pub struct TalkInterpreter {
    cursor: usize,
}

impl TalkInterpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The talk log restarts every day.
    pub fn begin_day(&mut self) {
        self.cursor = 0;
    }

    /// Processes every statement at or after the cursor exactly once.
    pub fn consume_new(
        &mut self,
        talks: &[Talk],
        me: Agent,
        parser: &dyn ContentParser,
        signal: HistoricalSignal,
        ledger: &mut ClaimLedger,
    ) -> ConsumeOutcome {
        let mut outcome = ConsumeOutcome::default();
        if talks.len() < self.cursor {
            self.cursor = talks.len();
            outcome.clamped = true;
            return outcome;
        }

        for (offset, talk) in talks[self.cursor..].iter().enumerate() {
            outcome.examined += 1;
            if talk.agent == me {
                continue;
            }
            let content = match parser.parse(&talk.text) {
                Ok(content) => content,
                Err(err) => {
                    outcome.rejected.push((self.cursor + offset, err));
                    continue;
                }
            };
            let Some(claim) = Claim::from_talk(talk, &content) else {
                continue;
            };
            record_claim(ledger, talk, claim, signal);
            outcome.claims.push(claim);
        }

        self.cursor = talks.len();
        outcome
    }
}

fn record_claim(ledger: &mut ClaimLedger, talk: &Talk, claim: Claim, signal: HistoricalSignal) {
    match claim.kind {
        ClaimKind::RoleClaim { role } => ledger.record_comingout(claim.speaker, role),
        ClaimKind::DivinationResult { target, result } => {
            ledger.record_divination(Judge::new(claim.speaker, talk.day, target, result));
        }
        ClaimKind::IdentificationResult { target, result } => {
            ledger.record_identification(Judge::new(claim.speaker, talk.day, target, result));
        }
        ClaimKind::VoteDeclaration { subject, target } => {
            let votes = ledger.observed_votes_mut();
            if Some(subject) == signal.strongest_village {
                votes.village.push(target);
            } else if Some(subject) == signal.strongest_werewolf {
                votes.werewolf.push(target);
            }
        }
    }
}

use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::{BTreeMap, BTreeSet};
use wolf_core::content::Content;
use wolf_core::model::{Agent, Species};
use wolf_core::talk::ClaimLedger;

/// Agents that reported `me` as a werewolf. Only meaningful for a human viewer.
pub fn fake_seers(ledger: &ClaimLedger, me: Agent) -> Vec<Agent> {
    let mut fakes: Vec<Agent> = ledger
        .werewolf_reports()
        .filter(|judge| judge.target == me)
        .map(|judge| judge.agent)
        .collect();
    fakes.sort();
    fakes.dedup();
    fakes
}

/// Werewolf verdicts from reporters outside `fake`.
pub fn reported_wolves(ledger: &ClaimLedger, fake: &[Agent]) -> Vec<Agent> {
    let mut wolves: Vec<Agent> = ledger
        .werewolf_reports()
        .filter(|judge| !fake.contains(&judge.agent))
        .map(|judge| judge.target)
        .collect();
    wolves.sort();
    wolves.dedup();
    wolves
}

/// Reporters whose divination or identification disagrees with one of our own.
pub fn contradicting_reporters(ledger: &ClaimLedger, own: &BTreeMap<Agent, Species>) -> Vec<Agent> {
    let mut liars: Vec<Agent> = ledger
        .divination_reports()
        .iter()
        .chain(ledger.identification_reports())
        .filter(|judge| own.get(&judge.target).is_some_and(|result| *result != judge.result))
        .map(|judge| judge.agent)
        .collect();
    liars.sort();
    liars.dedup();
    liars
}

/// First non-empty tier of the village precedence: alive fake seers, then
/// alive agents reported as werewolves by trusted sources.
pub fn village_candidates(ledger: &ClaimLedger, me: Agent, alive: &BTreeSet<Agent>) -> Vec<Agent> {
    let fake = fake_seers(ledger, me);
    let exposed = alive_others(&fake, me, alive);
    if !exposed.is_empty() {
        return exposed;
    }
    alive_others(&reported_wolves(ledger, &fake), me, alive)
}

pub fn is_still_valid(candidate: Agent, alive: &BTreeSet<Agent>, candidates: &[Agent]) -> bool {
    alive.contains(&candidate) && candidates.contains(&candidate)
}

fn alive_others(agents: &[Agent], me: Agent, alive: &BTreeSet<Agent>) -> Vec<Agent> {
    agents
        .iter()
        .copied()
        .filter(|agent| *agent != me && alive.contains(agent))
        .collect()
}

/// Everything the vote chain looks at for one decision.
#[derive(Debug, Clone, Copy)]
pub struct VoteInput<'a> {
    pub me: Agent,
    pub alive: &'a BTreeSet<Agent>,
    /// Candidate set produced by the engine's precedence tiers.
    pub candidates: &'a [Agent],
    /// Vote declarations of the historically strongest ally this round.
    pub followed_votes: &'a [Agent],
    /// Historically strongest agent of the opposing side.
    pub strongest_rival: Option<Agent>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteSource {
    Kept,
    Random,
    FollowedVote,
    StrongestAgent,
    Unresolved,
}

impl VoteSource {
    pub const fn label(self) -> &'static str {
        match self {
            VoteSource::Kept => "kept",
            VoteSource::Random => "random_candidate",
            VoteSource::FollowedVote => "followed_vote",
            VoteSource::StrongestAgent => "strongest_agent",
            VoteSource::Unresolved => "unresolved",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteDecision {
    pub target: Option<Agent>,
    pub source: VoteSource,
}

/// Sticky vote candidate for the current round.
#[derive(Debug, Clone, Default)]
pub struct VoteDecider {
    candidate: Option<Agent>,
    declared: Option<Agent>,
}

impl VoteDecider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets the candidate and the last declaration; called at day start.
    pub fn reset(&mut self) {
        self.candidate = None;
        self.declared = None;
    }

    pub fn candidate(&self) -> Option<Agent> {
        self.candidate
    }

    pub fn decide<R: Rng + ?Sized>(&mut self, input: VoteInput<'_>, rng: &mut R) -> VoteDecision {
        let usable = |agent: Agent| agent != input.me && input.alive.contains(&agent);
        let candidates: Vec<Agent> = input.candidates.iter().copied().filter(|a| usable(*a)).collect();

        let decision = if !candidates.is_empty() {
            match self.candidate {
                Some(current) if is_still_valid(current, input.alive, &candidates) => VoteDecision {
                    target: Some(current),
                    source: VoteSource::Kept,
                },
                _ => VoteDecision {
                    target: candidates.choose(rng).copied(),
                    source: VoteSource::Random,
                },
            }
        } else if let Some(target) = input.followed_votes.iter().rev().copied().find(|a| usable(*a)) {
            VoteDecision {
                target: Some(target),
                source: VoteSource::FollowedVote,
            }
        } else if let Some(target) = input.strongest_rival.filter(|a| usable(*a)) {
            VoteDecision {
                target: Some(target),
                source: VoteSource::StrongestAgent,
            }
        } else {
            match self.candidate.filter(|a| usable(*a)) {
                Some(current) => VoteDecision {
                    target: Some(current),
                    source: VoteSource::Kept,
                },
                None => VoteDecision {
                    target: None,
                    source: VoteSource::Unresolved,
                },
            }
        };

        self.candidate = decision.target;
        decision
    }

    /// `VOTE` for a new target, `Skip` when the declaration would repeat.
    pub fn statement(&mut self, decision: VoteDecision) -> Content {
        match decision.target {
            Some(target) if self.declared != Some(target) => {
                self.declared = Some(target);
                Content::vote(target)
            }
            _ => Content::Skip,
        }
    }

    /// Target for the actual vote; stale candidates are dropped, self is the last resort.
    pub fn final_vote(&mut self, me: Agent, alive: &BTreeSet<Agent>) -> Agent {
        if let Some(current) = self.candidate {
            if current != me && alive.contains(&current) {
                return current;
            }
            self.candidate = None;
        }
        me
    }
}

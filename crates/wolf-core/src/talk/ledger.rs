use crate::model::{Agent, Judge, Role, Species};
use std::collections::BTreeMap;

/// Vote declarations made this round by the historically strongest agents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservedVotes {
    /// Targets declared by the strongest village-aligned agent, oldest first.
    pub village: Vec<Agent>,
    /// Targets declared by the strongest werewolf-aligned agent, oldest first.
    pub werewolf: Vec<Agent>,
}

impl ObservedVotes {
    pub fn clear(&mut self) {
        self.village.clear();
        self.werewolf.clear();
    }
}

/// Everything other agents have claimed so far in the current game.
#[derive(Debug, Clone, Default)]
pub struct ClaimLedger {
    comingout_map: BTreeMap<Agent, Role>,
    divination_reports: Vec<Judge>,
    identification_reports: Vec<Judge>,
    observed_votes: ObservedVotes,
}

impl ClaimLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears all claims; called when a new game starts.
    pub fn reset(&mut self) {
        self.comingout_map.clear();
        self.divination_reports.clear();
        self.identification_reports.clear();
        self.observed_votes.clear();
    }

    /// Drops the round-scoped vote observations.
    pub fn begin_round(&mut self) {
        self.observed_votes.clear();
    }

    pub fn record_comingout(&mut self, speaker: Agent, role: Role) {
        self.comingout_map.insert(speaker, role);
    }

    pub fn record_divination(&mut self, judge: Judge) {
        self.divination_reports.push(judge);
    }

    pub fn record_identification(&mut self, judge: Judge) {
        self.identification_reports.push(judge);
    }

    pub fn observed_votes_mut(&mut self) -> &mut ObservedVotes {
        &mut self.observed_votes
    }

    pub fn observed_votes(&self) -> &ObservedVotes {
        &self.observed_votes
    }

    pub fn comingout_map(&self) -> &BTreeMap<Agent, Role> {
        &self.comingout_map
    }

    pub fn claimed_role(&self, agent: Agent) -> Option<Role> {
        self.comingout_map.get(&agent).copied()
    }

    /// Agents whose latest self-declaration is `role`, in seat order.
    pub fn claimants_of(&self, role: Role) -> Vec<Agent> {
        self.comingout_map
            .iter()
            .filter(|(_, claimed)| **claimed == role)
            .map(|(agent, _)| *agent)
            .collect()
    }

    pub fn divination_reports(&self) -> &[Judge] {
        &self.divination_reports
    }

    pub fn identification_reports(&self) -> &[Judge] {
        &self.identification_reports
    }

    pub fn werewolf_reports(&self) -> impl Iterator<Item = &Judge> {
        self.divination_reports
            .iter()
            .filter(|judge| judge.result == Species::Werewolf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_comingout_wins() {
        let mut ledger = ClaimLedger::new();
        ledger.record_comingout(Agent::new(2), Role::Seer);
        ledger.record_comingout(Agent::new(3), Role::Seer);
        ledger.record_comingout(Agent::new(2), Role::Medium);
        assert_eq!(ledger.claimants_of(Role::Seer), vec![Agent::new(3)]);
        assert_eq!(ledger.claimed_role(Agent::new(2)), Some(Role::Medium));
    }

    #[test]
    fn begin_round_keeps_reports() {
        let mut ledger = ClaimLedger::new();
        ledger.record_divination(Judge::new(
            Agent::new(2),
            1,
            Agent::new(3),
            Species::Werewolf,
        ));
        ledger.observed_votes_mut().village.push(Agent::new(4));
        ledger.begin_round();
        assert!(ledger.observed_votes().village.is_empty());
        assert_eq!(ledger.werewolf_reports().count(), 1);

        ledger.reset();
        assert!(ledger.divination_reports().is_empty());
    }
}

use super::config::BeliefConfig;
use crate::model::{Agent, Role, RoleSet, Species};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone)]
struct Row {
    active: bool,
    /// Our own verdict on this agent. A werewolf verdict is final.
    judged: Option<Species>,
    /// Werewolf certainty that came from someone else's report.
    reported: bool,
    probs: BTreeMap<Role, f64>,
}

impl Row {
    fn confirmed_werewolf(&self) -> bool {
        self.judged == Some(Species::Werewolf)
    }
}

/// Probability model over hidden roles for every agent in the current game.
#[derive(Debug, Clone)]
pub struct RoleBelief {
    me: Agent,
    player_count: usize,
    config: BeliefConfig,
    rows: BTreeMap<Agent, Row>,
}

impl RoleBelief {
    /// Fresh table: prior everywhere, self row pinned to its true role.
    pub fn initialize(
        agents: &[Agent],
        me: Agent,
        my_role: Role,
        role_set: RoleSet,
        config: BeliefConfig,
    ) -> Self {
        let rows = agents
            .iter()
            .map(|agent| {
                let probs = role_set
                    .roles()
                    .iter()
                    .map(|role| {
                        let value = if *agent != me {
                            config.prior
                        } else if *role == my_role {
                            1.0
                        } else {
                            0.0
                        };
                        (*role, value)
                    })
                    .collect();
                let row = Row {
                    active: true,
                    judged: None,
                    reported: false,
                    probs,
                };
                (*agent, row)
            })
            .collect();

        Self {
            me,
            player_count: agents.len(),
            config,
            rows,
        }
    }

    /// `None` for unknown agents, roles outside the game, or eliminated rows.
    pub fn prob(&self, agent: Agent, role: Role) -> Option<f64> {
        let row = self.rows.get(&agent)?;
        if !row.active {
            return None;
        }
        row.probs.get(&role).copied()
    }

    /// Marks rows of agents that are no longer alive as undefined.
    pub fn on_round_start(&mut self, alive: &BTreeSet<Agent>) {
        for (agent, row) in self.rows.iter_mut() {
            if *agent != self.me && !alive.contains(agent) {
                row.active = false;
            }
        }
    }

    /// Our own divination or identification. Overrides any hearsay on the row.
    pub fn apply_divination_result(&mut self, target: Agent, result: Species) {
        let shift = self.config.human_shift(self.player_count);
        let Some(row) = self.writable_row(target) else {
            return;
        };
        match result {
            Species::Werewolf => {
                row.judged = Some(Species::Werewolf);
                row.reported = false;
                set_if_present(row, Role::Werewolf, 1.0);
                set_if_present(row, Role::Villager, 0.0);
            }
            Species::Human => {
                if row.confirmed_werewolf() {
                    return;
                }
                row.judged = Some(Species::Human);
                row.reported = false;
                set_if_present(row, Role::Werewolf, 0.0);
                set_if_present(row, Role::Villager, shift);
            }
        }
    }

    /// Werewolf verdict claimed by another agent. Ignored on rows we judged
    /// ourselves and undone by [`RoleBelief::withdraw_report`].
    pub fn apply_reported_werewolf(&mut self, target: Agent) {
        let Some(row) = self.writable_row(target) else {
            return;
        };
        if row.judged.is_some() {
            return;
        }
        row.reported = true;
        set_if_present(row, Role::Werewolf, 1.0);
        set_if_present(row, Role::Villager, 0.0);
    }

    /// Resets a reported row to the prior once its source is no longer trusted.
    pub fn withdraw_report(&mut self, target: Agent) {
        let prior = self.config.prior;
        let Some(row) = self.writable_row(target) else {
            return;
        };
        if !row.reported {
            return;
        }
        row.reported = false;
        set_if_present(row, Role::Werewolf, prior);
        set_if_present(row, Role::Villager, prior);
    }

    /// Active agents currently carrying a reported werewolf verdict.
    pub fn reported_werewolves(&self) -> Vec<Agent> {
        self.rows
            .iter()
            .filter(|(_, row)| row.active && row.reported)
            .map(|(agent, _)| *agent)
            .collect()
    }

    /// Raises suspicion on an agent whose divination report contradicts what we know.
    pub fn apply_claimed_werewolf_suspicion(&mut self, agent: Agent) {
        let suspicion = self.config.suspicion;
        let Some(row) = self.writable_row(agent) else {
            return;
        };
        if row.judged.is_none() {
            set_if_present(row, Role::Werewolf, suspicion);
        }
    }

    /// Certainty that `agent` is a werewolf, without touching its villager column.
    pub fn mark_werewolf(&mut self, agent: Agent) {
        let Some(row) = self.writable_row(agent) else {
            return;
        };
        if row.judged != Some(Species::Human) {
            set_if_present(row, Role::Werewolf, 1.0);
        }
    }

    /// Pins a role learned from an authoritative source (e.g. a fellow werewolf).
    pub fn pin_role(&mut self, agent: Agent, role: Role) {
        let Some(row) = self.writable_row(agent) else {
            return;
        };
        for (candidate, value) in row.probs.iter_mut() {
            *value = if *candidate == role { 1.0 } else { 0.0 };
        }
        row.judged = Some(role.species());
        row.reported = false;
    }

    fn writable_row(&mut self, agent: Agent) -> Option<&mut Row> {
        if agent == self.me {
            return None;
        }
        self.rows.get_mut(&agent).filter(|row| row.active)
    }
}

fn set_if_present(row: &mut Row, role: Role, value: f64) {
    if let Some(slot) = row.probs.get_mut(&role) {
        *slot = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agents(count: u8) -> Vec<Agent> {
        (1..=count).map(Agent::new).collect()
    }

    fn small_belief() -> RoleBelief {
        RoleBelief::initialize(
            &agents(5),
            Agent::new(1),
            Role::Villager,
            RoleSet::for_players(5),
            BeliefConfig::default(),
        )
    }

    #[test]
    fn initializes_uniform_prior_and_pins_self() {
        let belief = small_belief();
        assert_eq!(belief.prob(Agent::new(1), Role::Villager), Some(1.0));
        assert_eq!(belief.prob(Agent::new(1), Role::Werewolf), Some(0.0));
        assert_eq!(belief.prob(Agent::new(3), Role::Seer), Some(0.5));
        assert_eq!(belief.prob(Agent::new(3), Role::Medium), None);
    }

    #[test]
    fn werewolf_result_latches_the_row() {
        let mut belief = small_belief();
        let target = Agent::new(2);
        belief.apply_divination_result(target, Species::Werewolf);
        assert_eq!(belief.prob(target, Role::Werewolf), Some(1.0));
        let villager_after = belief.prob(target, Role::Villager);

        belief.apply_divination_result(target, Species::Human);
        belief.apply_claimed_werewolf_suspicion(target);
        assert_eq!(belief.prob(target, Role::Werewolf), Some(1.0));
        assert_eq!(belief.prob(target, Role::Villager), villager_after);
    }

    #[test]
    fn human_result_shift_depends_on_table_size() {
        let mut small = small_belief();
        small.apply_divination_result(Agent::new(2), Species::Human);
        assert_eq!(small.prob(Agent::new(2), Role::Villager), Some(0.7));
        assert_eq!(small.prob(Agent::new(2), Role::Werewolf), Some(0.0));

        let mut large = RoleBelief::initialize(
            &agents(15),
            Agent::new(1),
            Role::Seer,
            RoleSet::for_players(15),
            BeliefConfig::default(),
        );
        large.apply_divination_result(Agent::new(2), Species::Human);
        assert_eq!(large.prob(Agent::new(2), Role::Villager), Some(0.9));
    }

    #[test]
    fn eliminated_rows_become_undefined() {
        let mut belief = small_belief();
        let alive: BTreeSet<Agent> = [1, 2, 3].into_iter().map(Agent::new).collect();
        belief.on_round_start(&alive);
        assert_eq!(belief.prob(Agent::new(4), Role::Werewolf), None);
        assert_eq!(belief.prob(Agent::new(5), Role::Villager), None);

        belief.apply_divination_result(Agent::new(4), Species::Werewolf);
        assert_eq!(belief.prob(Agent::new(4), Role::Werewolf), None);
    }

    #[test]
    fn no_update_touches_the_self_row() {
        let mut belief = small_belief();
        let me = Agent::new(1);
        belief.apply_divination_result(me, Species::Werewolf);
        belief.apply_claimed_werewolf_suspicion(me);
        belief.mark_werewolf(me);
        belief.pin_role(me, Role::Seer);
        belief.on_round_start(&BTreeSet::new());
        assert_eq!(belief.prob(Agent::new(1), Role::Villager), Some(1.0));
        assert_eq!(belief.prob(me, Role::Werewolf), Some(0.0));
    }

    #[test]
    fn own_human_result_outranks_a_report() {
        let mut belief = small_belief();
        let target = Agent::new(2);
        belief.apply_divination_result(target, Species::Human);
        belief.apply_reported_werewolf(target);
        belief.apply_claimed_werewolf_suspicion(target);
        assert_eq!(belief.prob(target, Role::Werewolf), Some(0.0));
        assert_eq!(belief.prob(target, Role::Villager), Some(0.7));
        assert!(belief.reported_werewolves().is_empty());
    }

    #[test]
    fn withdrawn_report_returns_to_prior() {
        let mut belief = small_belief();
        let target = Agent::new(3);
        belief.apply_reported_werewolf(target);
        assert_eq!(belief.prob(target, Role::Werewolf), Some(1.0));
        assert_eq!(belief.reported_werewolves(), vec![target]);

        belief.withdraw_report(target);
        assert_eq!(belief.prob(target, Role::Werewolf), Some(0.5));
        assert_eq!(belief.prob(target, Role::Villager), Some(0.5));
        assert!(belief.reported_werewolves().is_empty());
    }

    #[test]
    fn own_result_clears_an_earlier_report() {
        let mut belief = small_belief();
        let target = Agent::new(4);
        belief.apply_reported_werewolf(target);
        belief.apply_divination_result(target, Species::Human);
        belief.withdraw_report(target);
        assert_eq!(belief.prob(target, Role::Werewolf), Some(0.0));
        assert_eq!(belief.prob(target, Role::Villager), Some(0.7));
    }
}

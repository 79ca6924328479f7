use super::signal::HistoricalSignal;
use crate::belief::normalized_column;
use crate::model::{Agent, Alignment, GameInfo, Role, Status};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WinLoss {
    pub wins: u32,
    pub losses: u32,
}

impl WinLoss {
    pub fn games(&self) -> u32 {
        self.wins + self.losses
    }
}

/// Win/lose counters per agent for one alignment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeTable {
    counts: BTreeMap<Agent, WinLoss>,
}

impl OutcomeTable {
    pub fn with_agents(agents: &[Agent]) -> Self {
        Self {
            counts: agents.iter().map(|agent| (*agent, WinLoss::default())).collect(),
        }
    }

    pub fn get(&self, agent: Agent) -> WinLoss {
        self.counts.get(&agent).copied().unwrap_or_default()
    }

    pub fn record(&mut self, agent: Agent, won: bool) {
        let entry = self.counts.entry(agent).or_default();
        if won {
            entry.wins += 1;
        } else {
            entry.losses += 1;
        }
    }

    pub fn agents(&self) -> impl Iterator<Item = Agent> + '_ {
        self.counts.keys().copied()
    }

    /// `wins / (wins + losses)` per agent; undefined for agents with no games.
    pub fn win_rates(&self) -> BTreeMap<Agent, Option<f64>> {
        self.counts
            .iter()
            .map(|(agent, counts)| {
                let rate = match counts.games() {
                    0 => None,
                    games => Some(f64::from(counts.wins) / f64::from(games)),
                };
                (*agent, rate)
            })
            .collect()
    }

    /// Win rates normalized over the column so they sum to one.
    pub fn win_share(&self) -> BTreeMap<Agent, Option<f64>> {
        normalized_column(&self.win_rates())
    }
}

/// Outcome tables for both alignments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeStatistics {
    werewolf: OutcomeTable,
    village: OutcomeTable,
}

impl OutcomeStatistics {
    pub fn with_agents(agents: &[Agent]) -> Self {
        Self {
            werewolf: OutcomeTable::with_agents(agents),
            village: OutcomeTable::with_agents(agents),
        }
    }

    pub fn table(&self, alignment: Alignment) -> &OutcomeTable {
        match alignment {
            Alignment::Werewolf => &self.werewolf,
            Alignment::Village => &self.village,
        }
    }

    /// Adds one game: each agent counts in the table of its true alignment.
    pub fn record(&mut self, final_roles: &BTreeMap<Agent, Role>, winner: Alignment) {
        for (agent, role) in final_roles {
            let alignment = role.alignment();
            let won = alignment == winner;
            match alignment {
                Alignment::Werewolf => self.werewolf.record(*agent, won),
                Alignment::Village => self.village.record(*agent, won),
            }
        }
    }

    /// Total games an agent has been counted in, across both tables.
    pub fn games_for(&self, agent: Agent) -> u32 {
        self.werewolf.get(agent).games() + self.village.get(agent).games()
    }
}

/// Statistics shared by every game of a series, initialized on first use.
#[derive(Debug, Clone, Default)]
pub struct StatsContext {
    stats: OutcomeStatistics,
    signal: HistoricalSignal,
    initialized: bool,
}

impl StatsContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates empty tables the first time; later calls keep what was recorded.
    pub fn ensure_initialized(&mut self, agents: &[Agent]) -> bool {
        if self.initialized {
            return false;
        }
        self.stats = OutcomeStatistics::with_agents(agents);
        self.signal = HistoricalSignal::NONE;
        self.initialized = true;
        true
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn record(&mut self, final_roles: &BTreeMap<Agent, Role>, winner: Alignment) {
        self.stats.record(final_roles, winner);
        self.signal = HistoricalSignal::from_statistics(&self.stats);
    }

    pub fn statistics(&self) -> &OutcomeStatistics {
        &self.stats
    }

    /// Signal computed after the last recorded game.
    pub fn signal(&self) -> HistoricalSignal {
        self.signal
    }
}

/// Winner as seen from a revealed snapshot; `None` while roles are still hidden.
pub fn detect_winner(info: &GameInfo) -> Option<Alignment> {
    if !info.all_roles_revealed() {
        return None;
    }
    let werewolf_side_alive = info.status_map.iter().any(|(agent, status)| {
        *status == Status::Alive
            && info
                .role_map
                .get(agent)
                .is_some_and(|role| role.alignment() == Alignment::Werewolf)
    });
    Some(if werewolf_side_alive {
        Alignment::Werewolf
    } else {
        Alignment::Village
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roles() -> BTreeMap<Agent, Role> {
        [
            (1, Role::Villager),
            (2, Role::Seer),
            (3, Role::Werewolf),
            (4, Role::Possessed),
            (5, Role::Villager),
        ]
        .into_iter()
        .map(|(idx, role)| (Agent::new(idx), role))
        .collect()
    }

    #[test]
    fn records_into_aligned_table() {
        let mut stats = OutcomeStatistics::with_agents(&Agent::roster(5));
        stats.record(&roles(), Alignment::Village);

        assert_eq!(
            stats.table(Alignment::Village).get(Agent::new(1)),
            WinLoss { wins: 1, losses: 0 }
        );
        assert_eq!(
            stats.table(Alignment::Werewolf).get(Agent::new(3)),
            WinLoss { wins: 0, losses: 1 }
        );
        assert_eq!(stats.table(Alignment::Werewolf).get(Agent::new(1)).games(), 0);
        for agent in Agent::roster(5) {
            assert_eq!(stats.games_for(agent), 1);
        }
    }

    #[test]
    fn win_rates_undefined_without_games() {
        let mut table = OutcomeTable::with_agents(&Agent::roster(3));
        table.record(Agent::new(2), true);
        table.record(Agent::new(2), false);
        table.record(Agent::new(3), true);
        let rates = table.win_rates();
        assert_eq!(rates[&Agent::new(1)], None);
        assert_eq!(rates[&Agent::new(2)], Some(0.5));
        assert_eq!(rates[&Agent::new(3)], Some(1.0));

        let share = table.win_share();
        assert_eq!(share[&Agent::new(1)], None);
        assert!((share[&Agent::new(3)].unwrap() - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn no_signal_before_first_game_finishes() {
        let mut ctx = StatsContext::new();
        assert!(ctx.ensure_initialized(&Agent::roster(5)));
        assert_eq!(ctx.signal(), HistoricalSignal::NONE);

        ctx.record(&roles(), Alignment::Werewolf);
        assert!(!ctx.ensure_initialized(&Agent::roster(5)));
        assert_eq!(ctx.statistics().games_for(Agent::new(1)), 1);
        let signal = ctx.signal();
        assert_eq!(signal.strongest_werewolf, Some(Agent::new(3)));
        assert_eq!(signal.strongest_village, None);
    }

    fn revealed_info(dead: &[u8]) -> GameInfo {
        let agent_list = Agent::roster(5);
        GameInfo {
            day: 3,
            me: Some(Agent::new(1)),
            status_map: agent_list
                .iter()
                .map(|agent| {
                    let status = if dead.contains(&agent.index()) {
                        Status::Dead
                    } else {
                        Status::Alive
                    };
                    (*agent, status)
                })
                .collect(),
            role_map: roles(),
            agent_list,
            ..GameInfo::default()
        }
    }

    #[test]
    fn winner_requires_full_reveal() {
        let mut info = revealed_info(&[3, 4]);
        assert_eq!(detect_winner(&info), Some(Alignment::Village));
        info.role_map.remove(&Agent::new(5));
        assert_eq!(detect_winner(&info), None);
    }

    #[test]
    fn alive_possessed_counts_for_werewolves() {
        let info = revealed_info(&[3]);
        assert_eq!(detect_winner(&info), Some(Alignment::Werewolf));
    }
}

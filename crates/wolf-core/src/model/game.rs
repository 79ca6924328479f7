use super::agent::Agent;
use super::role::{Role, Species};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Alive,
    Dead,
}

/// Result of a divination or identification, own or reported by someone else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Judge {
    pub agent: Agent,
    pub day: u32,
    pub target: Agent,
    pub result: Species,
}

impl Judge {
    pub const fn new(agent: Agent, day: u32, target: Agent, result: Species) -> Self {
        Self {
            agent,
            day,
            target,
            result,
        }
    }
}

/// One raw public statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Talk {
    pub idx: usize,
    pub day: u32,
    pub turn: u32,
    pub agent: Agent,
    pub text: String,
}

/// Fixed parameters of one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSetting {
    pub player_num: usize,
    pub role_num_map: BTreeMap<Role, usize>,
    pub talk_turns: u32,
    pub max_day: u32,
}

impl GameSetting {
    /// Standard composition for a 5 or 15 player table.
    pub fn standard(player_num: usize) -> Self {
        let composition: &[(Role, usize)] = if player_num == 5 {
            &[
                (Role::Villager, 2),
                (Role::Seer, 1),
                (Role::Possessed, 1),
                (Role::Werewolf, 1),
            ]
        } else {
            &[
                (Role::Villager, 8),
                (Role::Seer, 1),
                (Role::Medium, 1),
                (Role::Bodyguard, 1),
                (Role::Possessed, 1),
                (Role::Werewolf, 3),
            ]
        };
        Self {
            player_num,
            role_num_map: composition.iter().copied().collect(),
            talk_turns: 3,
            max_day: 10,
        }
    }

    /// Every role in the composition, repeated by count.
    pub fn role_pool(&self) -> Vec<Role> {
        self.role_num_map
            .iter()
            .flat_map(|(role, count)| std::iter::repeat_n(*role, *count))
            .collect()
    }
}

/// Snapshot of the game as seen by one agent. Missing fields decode as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameInfo {
    pub day: u32,
    pub me: Option<Agent>,
    pub agent_list: Vec<Agent>,
    pub status_map: BTreeMap<Agent, Status>,
    /// Roles known to the viewer; complete only once the game is over.
    pub role_map: BTreeMap<Agent, Role>,
    pub talk_list: Vec<Talk>,
    pub whisper_list: Vec<Talk>,
    pub divine_result: Option<Judge>,
    pub medium_result: Option<Judge>,
    pub executed_agent: Option<Agent>,
    pub attacked_agent: Option<Agent>,
}

impl GameInfo {
    pub fn my_role(&self) -> Option<Role> {
        self.me.and_then(|me| self.role_map.get(&me).copied())
    }

    pub fn is_alive(&self, agent: Agent) -> bool {
        self.status_map.get(&agent) == Some(&Status::Alive)
    }

    pub fn alive_agents(&self) -> Vec<Agent> {
        self.agent_list
            .iter()
            .copied()
            .filter(|agent| self.is_alive(*agent))
            .collect()
    }

    pub fn alive_others(&self) -> Vec<Agent> {
        self.alive_agents()
            .into_iter()
            .filter(|agent| Some(*agent) != self.me)
            .collect()
    }

    pub fn all_roles_revealed(&self) -> bool {
        !self.agent_list.is_empty()
            && self
                .agent_list
                .iter()
                .all(|agent| self.role_map.contains_key(agent))
    }
}

use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    Villager,
    Seer,
    Medium,
    Bodyguard,
    Possessed,
    Werewolf,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::Villager,
        Role::Seer,
        Role::Medium,
        Role::Bodyguard,
        Role::Werewolf,
        Role::Possessed,
    ];

    pub const fn alignment(self) -> Alignment {
        match self {
            Role::Werewolf | Role::Possessed => Alignment::Werewolf,
            _ => Alignment::Village,
        }
    }

    /// What a divination of this role reveals.
    pub const fn species(self) -> Species {
        match self {
            Role::Werewolf => Species::Werewolf,
            _ => Species::Human,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Villager => "VILLAGER",
            Role::Seer => "SEER",
            Role::Medium => "MEDIUM",
            Role::Bodyguard => "BODYGUARD",
            Role::Possessed => "POSSESSED",
            Role::Werewolf => "WEREWOLF",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .iter()
            .copied()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Species {
    Human,
    Werewolf,
}

impl Species {
    pub const fn as_str(self) -> &'static str {
        match self {
            Species::Human => "HUMAN",
            Species::Werewolf => "WEREWOLF",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Species {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "HUMAN" => Ok(Species::Human),
            "WEREWOLF" => Ok(Species::Werewolf),
            _ => Err(()),
        }
    }
}

/// Which side of the game a role plays for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    Village,
    Werewolf,
}

impl Alignment {
    pub const fn opposite(self) -> Alignment {
        match self {
            Alignment::Village => Alignment::Werewolf,
            Alignment::Werewolf => Alignment::Village,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Alignment::Village => "villagers",
            Alignment::Werewolf => "werewolves",
        }
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Roles that can appear in a game of a given size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleSet {
    roles: Vec<Role>,
}

impl RoleSet {
    pub const SMALL_GAME_PLAYERS: usize = 5;

    pub fn for_players(player_count: usize) -> Self {
        let roles = if player_count == Self::SMALL_GAME_PLAYERS {
            vec![Role::Villager, Role::Seer, Role::Possessed, Role::Werewolf]
        } else {
            Role::ALL.to_vec()
        };
        Self { roles }
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn contains(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn possessed_is_werewolf_aligned_but_human() {
        assert_eq!(Role::Possessed.alignment(), Alignment::Werewolf);
        assert_eq!(Role::Possessed.species(), Species::Human);
        assert_eq!(Role::Werewolf.species(), Species::Werewolf);
        assert_eq!(Role::Bodyguard.alignment(), Alignment::Village);
    }

    #[test]
    fn small_games_use_reduced_role_set() {
        let small = RoleSet::for_players(5);
        assert_eq!(small.roles().len(), 4);
        assert!(!small.contains(Role::Medium));
        assert_eq!(RoleSet::for_players(15).roles().len(), 6);
    }

    #[test]
    fn role_names_round_trip_through_protocol_text() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
        assert_eq!("seer".parse::<Role>(), Ok(Role::Seer));
    }
}

use std::env;

/// Constants used by the belief updates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeliefConfig {
    /// Initial probability for every (agent, role) pair outside the self row.
    pub prior: f64,
    /// Villager probability after a human divination in a 5-player game.
    pub human_shift_small: f64,
    /// Villager probability after a human divination in larger games.
    pub human_shift_large: f64,
    /// Werewolf probability assigned to agents that accused us falsely.
    pub suspicion: f64,
}

impl Default for BeliefConfig {
    fn default() -> Self {
        Self {
            prior: 0.5,
            human_shift_small: 0.7,
            human_shift_large: 0.9,
            suspicion: 0.8,
        }
    }
}

impl BeliefConfig {
    pub fn from_env() -> Self {
        Self::from_reader(|key| env::var(key).ok())
    }

    pub fn from_reader<F>(mut read: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let base = Self::default();
        let mut probability = |key: &str, fallback: f64| {
            read(key)
                .and_then(|raw| raw.trim().parse::<f64>().ok())
                .filter(|value| value.is_finite())
                .map(|value| value.clamp(0.0, 1.0))
                .unwrap_or(fallback)
        };

        Self {
            prior: probability("WOLF_BELIEF_PRIOR", base.prior),
            human_shift_small: probability("WOLF_BELIEF_HUMAN_SMALL", base.human_shift_small),
            human_shift_large: probability("WOLF_BELIEF_HUMAN_LARGE", base.human_shift_large),
            suspicion: probability("WOLF_BELIEF_SUSPICION", base.suspicion),
        }
    }

    /// Villager shift for a human result; small tables shift less.
    pub fn human_shift(&self, player_count: usize) -> f64 {
        if player_count <= crate::model::RoleSet::SMALL_GAME_PLAYERS {
            self.human_shift_small
        } else {
            self.human_shift_large
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_when_unset() {
        let config = BeliefConfig::from_reader(|_| None);
        assert_eq!(config, BeliefConfig::default());
    }

    #[test]
    fn overrides_are_clamped_and_garbage_ignored() {
        let mut vars = HashMap::new();
        vars.insert("WOLF_BELIEF_SUSPICION", "1.7");
        vars.insert("WOLF_BELIEF_PRIOR", "not-a-number");
        vars.insert("WOLF_BELIEF_HUMAN_SMALL", "0.6");

        let config = BeliefConfig::from_reader(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.suspicion, 1.0);
        assert_eq!(config.prior, 0.5);
        assert!((config.human_shift_small - 0.6).abs() < f64::EPSILON);
    }

    #[test]
    fn shift_depends_on_game_size() {
        let config = BeliefConfig::default();
        assert_eq!(config.human_shift(5), 0.7);
        assert_eq!(config.human_shift(15), 0.9);
    }
}

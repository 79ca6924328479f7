use crate::policy::ComingoutSchedule;

/// Behaviour switches read from the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BotFeatures {
    co_day: u32,
    follow_strong: bool,
}

impl BotFeatures {
    pub const fn new(co_day: u32, follow_strong: bool) -> Self {
        Self {
            co_day,
            follow_strong,
        }
    }

    pub fn from_env() -> Self {
        Self::from_reader(|key| std::env::var(key).ok())
    }

    /// Day on which seer and medium reveal themselves if nothing forced it earlier.
    pub const fn co_day(self) -> u32 {
        self.co_day
    }

    /// Whether empty candidate sets fall back on the historical signal.
    pub const fn follow_strong(self) -> bool {
        self.follow_strong
    }

    pub(crate) fn from_reader<F>(mut read: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let co_day = read("WOLF_CO_DAY")
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .filter(|day| *day >= 1)
            .unwrap_or(ComingoutSchedule::DEFAULT_DAY);

        let follow_strong = read("WOLF_VOTE_FOLLOW_STRONG")
            .map(|raw| !matches!(raw.trim(), "0" | "false" | "FALSE" | "off" | "OFF"))
            .unwrap_or(true);

        Self {
            co_day,
            follow_strong,
        }
    }
}

impl Default for BotFeatures {
    fn default() -> Self {
        Self::new(ComingoutSchedule::DEFAULT_DAY, true)
    }
}

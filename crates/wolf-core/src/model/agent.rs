use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

/// Seat identifier handed out by the game server. Indices start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Agent(u8);

impl Agent {
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    pub const fn index(self) -> u8 {
        self.0
    }

    /// Agents `Agent[01]..=Agent[count]` in seat order.
    pub fn roster(count: usize) -> Vec<Agent> {
        (1..=count.min(u8::MAX as usize))
            .map(|idx| Agent(idx as u8))
            .collect()
    }
}

impl fmt::Display for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Agent[{:02}]", self.0)
    }
}

impl FromStr for Agent {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let inner = s
            .trim()
            .strip_prefix("Agent[")
            .and_then(|rest| rest.strip_suffix(']'))
            .ok_or(())?;
        match inner.parse::<u8>() {
            Ok(0) | Err(_) => Err(()),
            Ok(idx) => Ok(Agent(idx)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Agent;

    #[test]
    fn display_pads_to_two_digits() {
        assert_eq!(Agent::new(3).to_string(), "Agent[03]");
        assert_eq!(Agent::new(12).to_string(), "Agent[12]");
    }

    #[test]
    fn parses_protocol_names() {
        assert_eq!("Agent[07]".parse::<Agent>(), Ok(Agent::new(7)));
        assert_eq!("Agent[7]".parse::<Agent>(), Ok(Agent::new(7)));
        assert!("Agent[00]".parse::<Agent>().is_err());
        assert!("agent7".parse::<Agent>().is_err());
    }

    #[test]
    fn roster_is_one_based() {
        let roster = Agent::roster(5);
        assert_eq!(roster.first(), Some(&Agent::new(1)));
        assert_eq!(roster.last(), Some(&Agent::new(5)));
    }
}

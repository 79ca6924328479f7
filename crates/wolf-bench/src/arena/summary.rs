use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use wolf_core::model::{Agent, Alignment};
use wolf_core::stats::HistoricalSignal;

use super::game::GameRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeatTally {
    pub village_games: u32,
    pub village_wins: u32,
    pub werewolf_games: u32,
    pub werewolf_wins: u32,
    pub survived: u32,
}

impl SeatTally {
    pub fn games(&self) -> u32 {
        self.village_games + self.werewolf_games
    }

    pub fn wins(&self) -> u32 {
        self.village_wins + self.werewolf_wins
    }
}

/// Running totals over a whole arena run.
#[derive(Debug, Clone, Default)]
pub struct RunTally {
    seats: BTreeMap<Agent, SeatTally>,
    village_wins: u32,
    werewolf_wins: u32,
    total_days: u64,
    games: u32,
    final_signals: BTreeMap<Agent, HistoricalSignal>,
}

impl RunTally {
    pub fn record(&mut self, record: &GameRecord) {
        self.games += 1;
        self.total_days += u64::from(record.days);
        match record.winner {
            Alignment::Village => self.village_wins += 1,
            Alignment::Werewolf => self.werewolf_wins += 1,
        }

        for (agent, role) in &record.roles {
            let seat = self.seats.entry(*agent).or_default();
            let won = role.alignment() == record.winner;
            match role.alignment() {
                Alignment::Village => {
                    seat.village_games += 1;
                    seat.village_wins += u32::from(won);
                }
                Alignment::Werewolf => {
                    seat.werewolf_games += 1;
                    seat.werewolf_wins += u32::from(won);
                }
            }
            seat.survived += u32::from(record.survivors.contains(agent));
        }
    }

    /// Signal each seat ended the run with, as reported by its own statistics.
    pub fn set_final_signal(&mut self, seat: Agent, signal: HistoricalSignal) {
        self.final_signals.insert(seat, signal);
    }

    pub fn seat(&self, agent: Agent) -> SeatTally {
        self.seats.get(&agent).copied().unwrap_or_default()
    }

    pub fn village_wins(&self) -> u32 {
        self.village_wins
    }

    pub fn werewolf_wins(&self) -> u32 {
        self.werewolf_wins
    }

    pub fn games(&self) -> u32 {
        self.games
    }

    pub fn render_markdown(&self, run_id: &str) -> String {
        let mut out = String::new();
        out.push_str(&format!("# Arena Summary: {run_id}\n\n"));
        let avg_days = if self.games == 0 {
            0.0
        } else {
            self.total_days as f64 / f64::from(self.games)
        };
        out.push_str(&format!(
            "Games: {games} | Village wins: {village} | Werewolf wins: {werewolf} | Avg days: {avg_days:.2}\n\n",
            games = self.games,
            village = self.village_wins,
            werewolf = self.werewolf_wins,
        ));
        out.push_str("| Seat | Games | Win % | Village W/G | Werewolf W/G | Survived | Sees strongest village | Sees strongest werewolf |\n");
        out.push_str("|------|-------|-------|-------------|--------------|----------|------------------------|-------------------------|\n");

        for (agent, seat) in &self.seats {
            let win_rate = if seat.games() == 0 {
                0.0
            } else {
                f64::from(seat.wins()) / f64::from(seat.games())
            };
            let signal = self.final_signals.get(agent).copied().unwrap_or_default();
            out.push_str(&format!(
                "| {agent} | {games} | {win:.1}% | {vw}/{vg} | {ww}/{wg} | {survived} | {sv} | {sw} |\n",
                games = seat.games(),
                win = win_rate * 100.0,
                vw = seat.village_wins,
                vg = seat.village_games,
                ww = seat.werewolf_wins,
                wg = seat.werewolf_games,
                survived = seat.survived,
                sv = label(signal.strongest_village),
                sw = label(signal.strongest_werewolf),
            ));
        }
        out
    }

    pub fn write_markdown(&self, path: impl AsRef<Path>, run_id: &str) -> std::io::Result<()> {
        fs::write(path.as_ref(), self.render_markdown(run_id))
    }
}

fn label(agent: Option<Agent>) -> String {
    agent.map(|a| a.to_string()).unwrap_or_else(|| "-".to_string())
}

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{Level, event};
use wolf_bot::{EngineError, SeriesPlayer};
use wolf_core::model::{
    Agent, Alignment, GameInfo, GameSetting, Judge, Role, Species, Status, Talk,
};

use super::ArenaError;

/// Everything the arena knows about one finished game.
#[derive(Debug, Clone)]
pub struct GameRecord {
    pub winner: Alignment,
    pub days: u32,
    pub roles: BTreeMap<Agent, Role>,
    pub survivors: Vec<Agent>,
    pub executed: Vec<Agent>,
    pub attacked: Vec<Agent>,
    pub talks: usize,
}

/// Authoritative board state; players only ever see `view()` of it.
struct World {
    agents: Vec<Agent>,
    roles: BTreeMap<Agent, Role>,
    status: BTreeMap<Agent, Status>,
    day: u32,
    talk_list: Vec<Talk>,
    whisper_list: Vec<Talk>,
    divine_result: Option<Judge>,
    medium_result: Option<Judge>,
    executed: Option<Agent>,
    attacked: Option<Agent>,
}

impl World {
    fn new(roles: BTreeMap<Agent, Role>) -> Self {
        let agents: Vec<Agent> = roles.keys().copied().collect();
        let status = agents.iter().map(|a| (*a, Status::Alive)).collect();
        Self {
            agents,
            roles,
            status,
            day: 1,
            talk_list: Vec::new(),
            whisper_list: Vec::new(),
            divine_result: None,
            medium_result: None,
            executed: None,
            attacked: None,
        }
    }

    fn role_of(&self, agent: Agent) -> Option<Role> {
        self.roles.get(&agent).copied()
    }

    fn is_alive(&self, agent: Agent) -> bool {
        self.status.get(&agent) == Some(&Status::Alive)
    }

    fn alive(&self) -> Vec<Agent> {
        self.agents
            .iter()
            .copied()
            .filter(|agent| self.is_alive(*agent))
            .collect()
    }

    fn alive_with(&self, role: Role) -> Vec<Agent> {
        self.alive()
            .into_iter()
            .filter(|agent| self.role_of(*agent) == Some(role))
            .collect()
    }

    fn kill(&mut self, agent: Agent) {
        self.status.insert(agent, Status::Dead);
    }

    /// Game over when no werewolf is left or werewolves match the rest.
    fn winner(&self) -> Option<Alignment> {
        let alive = self.alive();
        let wolves = alive
            .iter()
            .filter(|agent| self.role_of(**agent).map(Role::species) == Some(Species::Werewolf))
            .count();
        if wolves == 0 {
            Some(Alignment::Village)
        } else if wolves >= alive.len() - wolves {
            Some(Alignment::Werewolf)
        } else {
            None
        }
    }

    /// What `me` is allowed to know. `reveal` opens every role for the final update.
    fn view(&self, me: Agent, reveal: bool) -> GameInfo {
        let my_role = self.role_of(me);
        let is_wolf = my_role == Some(Role::Werewolf);
        let role_map = self
            .roles
            .iter()
            .filter(|(agent, role)| {
                reveal || **agent == me || (is_wolf && **role == Role::Werewolf)
            })
            .map(|(agent, role)| (*agent, *role))
            .collect();

        GameInfo {
            day: self.day,
            me: Some(me),
            agent_list: self.agents.clone(),
            status_map: self.status.clone(),
            role_map,
            talk_list: self.talk_list.clone(),
            whisper_list: if is_wolf {
                self.whisper_list.clone()
            } else {
                Vec::new()
            },
            divine_result: self.divine_result.filter(|_| my_role == Some(Role::Seer)),
            medium_result: self.medium_result.filter(|_| my_role == Some(Role::Medium)),
            executed_agent: self.executed,
            attacked_agent: self.attacked,
        }
    }
}

/// Deals `roles` to the seats in order and plays until a side wins.
pub(crate) fn play_game(
    players: &mut [SeriesPlayer],
    roles: &[Role],
    setting: &GameSetting,
    rng: &mut StdRng,
    game_index: usize,
) -> Result<GameRecord, ArenaError> {
    let seats = Agent::roster(roles.len());
    let mut world = World::new(seats.iter().copied().zip(roles.iter().copied()).collect());
    let mut executed = Vec::new();
    let mut attacked = Vec::new();
    let mut talks = 0usize;

    for seat in &seats {
        let view = world.view(*seat, false);
        seat_call(*seat, seat_player(players, *seat)?.initialize(&view, setting))?;
    }

    let mut winner = None;
    for day in 1..=setting.max_day {
        world.day = day;
        world.talk_list.clear();
        world.whisper_list.clear();
        for seat in &seats {
            let view = world.view(*seat, false);
            let player = seat_player(players, *seat)?;
            seat_call(*seat, player.update(&view))?;
            seat_call(*seat, player.day_start())?;
        }

        for turn in 0..setting.talk_turns {
            for seat in world.alive() {
                let view = world.view(seat, false);
                let player = seat_player(players, seat)?;
                seat_call(seat, player.update(&view))?;
                let content = seat_call(seat, player.talk())?;
                world.talk_list.push(Talk {
                    idx: world.talk_list.len(),
                    day,
                    turn,
                    agent: seat,
                    text: content.to_string(),
                });
                talks += 1;
            }
        }

        let mut ballots = Vec::new();
        for seat in world.alive() {
            let view = world.view(seat, false);
            let player = seat_player(players, seat)?;
            seat_call(seat, player.update(&view))?;
            ballots.push(seat_call(seat, player.vote())?);
        }
        world.executed = None;
        world.attacked = None;
        if let Some(target) = plurality(&ballots, &world.alive(), rng) {
            world.kill(target);
            world.executed = Some(target);
            executed.push(target);
            log_death(game_index, day, "executed", target, world.role_of(target));
        }
        if let Some(side) = world.winner() {
            winner = Some(side);
            break;
        }

        night(&mut world, players, day, game_index, rng, &mut attacked)?;
        if let Some(side) = world.winner() {
            winner = Some(side);
            break;
        }
    }
    let winner = winner.unwrap_or(Alignment::Village);

    for seat in &seats {
        let view = world.view(*seat, true);
        let player = seat_player(players, *seat)?;
        seat_call(*seat, player.update(&view))?;
        seat_call(*seat, player.finish())?;
    }

    Ok(GameRecord {
        winner,
        days: world.day,
        roles: world.roles.clone(),
        survivors: world.alive(),
        executed,
        attacked,
        talks,
    })
}

fn night(
    world: &mut World,
    players: &mut [SeriesPlayer],
    day: u32,
    game_index: usize,
    rng: &mut StdRng,
    attacked: &mut Vec<Agent>,
) -> Result<(), ArenaError> {
    world.medium_result = match (world.alive_with(Role::Medium).first(), world.executed) {
        (Some(medium), Some(target)) => world
            .role_of(target)
            .map(|role| Judge::new(*medium, day, target, role.species())),
        _ => None,
    };

    for seer in world.alive_with(Role::Seer) {
        let view = world.view(seer, false);
        let player = seat_player(players, seer)?;
        seat_call(seer, player.update(&view))?;
        let target = seat_call(seer, player.divine())?;
        world.divine_result = world
            .role_of(target)
            .map(|role| Judge::new(seer, day, target, role.species()));
    }

    let mut guarded = None;
    for guard in world.alive_with(Role::Bodyguard) {
        let view = world.view(guard, false);
        let player = seat_player(players, guard)?;
        seat_call(guard, player.update(&view))?;
        guarded = Some(seat_call(guard, player.guard())?);
    }

    let wolves = world.alive_with(Role::Werewolf);
    for wolf in &wolves {
        let view = world.view(*wolf, false);
        let player = seat_player(players, *wolf)?;
        seat_call(*wolf, player.update(&view))?;
        let content = seat_call(*wolf, player.whisper())?;
        world.whisper_list.push(Talk {
            idx: world.whisper_list.len(),
            day,
            turn: 0,
            agent: *wolf,
            text: content.to_string(),
        });
    }
    let mut ballots = Vec::new();
    for wolf in &wolves {
        ballots.push(seat_call(*wolf, seat_player(players, *wolf)?.attack())?);
    }
    let prey: Vec<Agent> = world
        .alive()
        .into_iter()
        .filter(|agent| world.role_of(*agent) != Some(Role::Werewolf))
        .collect();
    if let Some(target) = plurality(&ballots, &prey, rng) {
        if guarded == Some(target) {
            event!(target: "wolf_bench::game", Level::DEBUG, game_index, day, target = %target, "attack guarded");
        } else {
            world.kill(target);
            world.attacked = Some(target);
            attacked.push(target);
            log_death(game_index, day, "attacked", target, world.role_of(target));
        }
    }
    Ok(())
}

/// Most voted eligible agent, ties broken uniformly at random.
fn plurality(ballots: &[Agent], eligible: &[Agent], rng: &mut StdRng) -> Option<Agent> {
    let mut counts: BTreeMap<Agent, usize> = BTreeMap::new();
    for ballot in ballots.iter().filter(|agent| eligible.contains(agent)) {
        *counts.entry(*ballot).or_default() += 1;
    }
    let top = counts.values().copied().max()?;
    let leaders: Vec<Agent> = counts
        .into_iter()
        .filter(|(_, count)| *count == top)
        .map(|(agent, _)| agent)
        .collect();
    leaders.choose(rng).copied()
}

fn seat_player(players: &mut [SeriesPlayer], seat: Agent) -> Result<&mut SeriesPlayer, ArenaError> {
    (seat.index() as usize)
        .checked_sub(1)
        .and_then(|idx| players.get_mut(idx))
        .ok_or_else(|| ArenaError::game(format!("no player seated at {seat}")))
}

fn seat_call<T>(seat: Agent, result: Result<T, EngineError>) -> Result<T, ArenaError> {
    result.map_err(|source| ArenaError::Engine { seat, source })
}

fn log_death(game_index: usize, day: u32, cause: &'static str, target: Agent, role: Option<Role>) {
    if !tracing::enabled!(target: "wolf_bench::game", Level::DEBUG) {
        return;
    }
    let role = role.map(|role| role.to_string()).unwrap_or_default();
    event!(
        target: "wolf_bench::game",
        Level::DEBUG,
        game_index = game_index as u64,
        day,
        cause,
        target = %target,
        role = %role,
    );
}

//! Cross-game player: picks the engine for the dealt role and keeps the
//! win/loss tables that survive from one game to the next.

use crate::engine::{
    BodyguardEngine, EngineError, FinishReport, MediumEngine, RoleEngine, SeerEngine,
    SharedParser, VillagerEngine, WerewolfEngine,
};
use crate::features::BotFeatures;
use std::sync::Arc;
use tracing::{Level, event};
use wolf_core::belief::BeliefConfig;
use wolf_core::content::{Content, ProtocolParser};
use wolf_core::model::{Agent, Alignment, GameInfo, GameSetting, Role};
use wolf_core::stats::{HistoricalSignal, OutcomeStatistics, StatsContext, detect_winner};

/// One engine per role, reused across games.
pub struct RoleEngines {
    villager: VillagerEngine,
    seer: SeerEngine,
    medium: MediumEngine,
    bodyguard: BodyguardEngine,
    possessed: VillagerEngine,
    werewolf: WerewolfEngine,
}

impl RoleEngines {
    pub fn new(
        seed: u64,
        features: BotFeatures,
        belief_config: BeliefConfig,
        parser: SharedParser,
    ) -> Self {
        let seeded = |offset: u64| seed.wrapping_mul(0x9E37_79B9_7F4A_7C15).wrapping_add(offset);
        Self {
            villager: VillagerEngine::with_role(
                Role::Villager,
                seeded(0),
                features,
                belief_config,
                Arc::clone(&parser),
            ),
            seer: SeerEngine::with_config(seeded(1), features, belief_config, Arc::clone(&parser)),
            medium: MediumEngine::with_config(
                seeded(2),
                features,
                belief_config,
                Arc::clone(&parser),
            ),
            bodyguard: BodyguardEngine::with_config(
                seeded(3),
                features,
                belief_config,
                Arc::clone(&parser),
            ),
            possessed: VillagerEngine::with_role(
                Role::Possessed,
                seeded(4),
                features,
                belief_config,
                Arc::clone(&parser),
            ),
            werewolf: WerewolfEngine::with_config(seeded(5), features, belief_config, parser),
        }
    }

    pub fn engine(&self, role: Role) -> &dyn RoleEngine {
        match role {
            Role::Villager => &self.villager,
            Role::Seer => &self.seer,
            Role::Medium => &self.medium,
            Role::Bodyguard => &self.bodyguard,
            Role::Possessed => &self.possessed,
            Role::Werewolf => &self.werewolf,
        }
    }

    pub fn engine_mut(&mut self, role: Role) -> &mut dyn RoleEngine {
        match role {
            Role::Villager => &mut self.villager,
            Role::Seer => &mut self.seer,
            Role::Medium => &mut self.medium,
            Role::Bodyguard => &mut self.bodyguard,
            Role::Possessed => &mut self.possessed,
            Role::Werewolf => &mut self.werewolf,
        }
    }
}

/// What the game server talks to for a whole series of games.
pub struct SeriesPlayer {
    engines: RoleEngines,
    stats: StatsContext,
    active: Option<Role>,
    outcome_recorded: bool,
    finish_reported: bool,
    games_completed: u32,
    last_info: Option<GameInfo>,
}

impl SeriesPlayer {
    pub fn new(seed: u64) -> Self {
        Self::with_config(
            seed,
            BotFeatures::default(),
            BeliefConfig::default(),
            Arc::new(ProtocolParser),
        )
    }

    /// Reads `WOLF_*` knobs for both the belief constants and the bot switches.
    pub fn from_env(seed: u64) -> Self {
        Self::with_config(
            seed,
            BotFeatures::from_env(),
            BeliefConfig::from_env(),
            Arc::new(ProtocolParser),
        )
    }

    pub fn with_config(
        seed: u64,
        features: BotFeatures,
        belief_config: BeliefConfig,
        parser: SharedParser,
    ) -> Self {
        Self {
            engines: RoleEngines::new(seed, features, belief_config, parser),
            stats: StatsContext::new(),
            active: None,
            outcome_recorded: false,
            finish_reported: false,
            games_completed: 0,
            last_info: None,
        }
    }

    pub fn statistics(&self) -> &OutcomeStatistics {
        self.stats.statistics()
    }

    pub fn signal(&self) -> HistoricalSignal {
        self.stats.signal()
    }

    pub fn games_completed(&self) -> u32 {
        self.games_completed
    }

    pub fn active_role(&self) -> Option<Role> {
        self.active
    }

    pub fn outcome_recorded(&self) -> bool {
        self.outcome_recorded
    }

    pub fn engines(&self) -> &RoleEngines {
        &self.engines
    }

    pub fn initialize(&mut self, info: &GameInfo, setting: &GameSetting) -> Result<(), EngineError> {
        let role = info.my_role().ok_or(EngineError::MissingSelf)?;
        let fresh = self.stats.ensure_initialized(&info.agent_list);
        self.active = Some(role);
        self.outcome_recorded = false;
        self.finish_reported = false;
        self.last_info = Some(info.clone());

        let signal = self.stats.signal();
        if tracing::enabled!(Level::DEBUG) {
            event!(
                target: "wolf_bot::series",
                Level::DEBUG,
                me = ?info.me,
                role = %role,
                game = self.games_completed + 1,
                fresh_tables = fresh,
                strongest_village = ?signal.strongest_village,
                strongest_werewolf = ?signal.strongest_werewolf,
                "game start"
            );
        }
        self.engines.engine_mut(role).initialize(info, setting, signal)
    }

    pub fn update(&mut self, info: &GameInfo) -> Result<(), EngineError> {
        self.last_info = Some(info.clone());
        self.record_outcome(info);
        self.active_engine()?.update(info)
    }

    pub fn day_start(&mut self) -> Result<(), EngineError> {
        self.active_engine()?.day_start()
    }

    pub fn talk(&mut self) -> Result<Content, EngineError> {
        self.active_engine()?.talk()
    }

    pub fn vote(&mut self) -> Result<Agent, EngineError> {
        self.active_engine()?.vote()
    }

    pub fn divine(&mut self) -> Result<Agent, EngineError> {
        self.active_engine()?.divine()
    }

    pub fn guard(&mut self) -> Result<Agent, EngineError> {
        self.active_engine()?.guard()
    }

    pub fn attack(&mut self) -> Result<Agent, EngineError> {
        self.active_engine()?.attack()
    }

    pub fn whisper(&mut self) -> Result<Content, EngineError> {
        self.active_engine()?.whisper()
    }

    /// Closes the current game. Repeated calls are no-ops.
    pub fn finish(&mut self) -> Result<(), EngineError> {
        let role = self.active.ok_or(EngineError::NoActiveGame)?;
        if self.finish_reported {
            return Ok(());
        }
        if let Some(info) = self.last_info.take() {
            self.record_outcome(&info);
        }
        self.finish_reported = true;
        self.games_completed += 1;

        let report = FinishReport {
            statistics: self.stats.statistics(),
            signal: self.stats.signal(),
            games_completed: self.games_completed,
        };
        event!(
            target: "wolf_bot::series",
            Level::INFO,
            role = %role,
            games_completed = self.games_completed,
            outcome_recorded = self.outcome_recorded,
            strongest_village = ?report.signal.strongest_village,
            strongest_werewolf = ?report.signal.strongest_werewolf,
            "game finished"
        );
        self.engines.engine_mut(role).finish(&report);
        Ok(())
    }

    fn active_engine(&mut self) -> Result<&mut dyn RoleEngine, EngineError> {
        let role = self.active.ok_or(EngineError::NoActiveGame)?;
        Ok(self.engines.engine_mut(role))
    }

    /// Records the game once, as soon as a snapshot reveals every role.
    fn record_outcome(&mut self, info: &GameInfo) -> Option<Alignment> {
        if self.outcome_recorded {
            return None;
        }
        let winner = detect_winner(info)?;
        self.stats.record(&info.role_map, winner);
        self.outcome_recorded = true;
        event!(
            target: "wolf_bot::series",
            Level::INFO,
            me = ?info.me,
            winner = %winner,
            day = info.day,
            "outcome recorded"
        );
        Some(winner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wolf_core::model::Status;

    fn info(me: u8, roles: &[Role]) -> GameInfo {
        let agent_list = Agent::roster(roles.len());
        let me = Agent::new(me);
        GameInfo {
            day: 1,
            me: Some(me),
            status_map: agent_list.iter().map(|a| (*a, Status::Alive)).collect(),
            role_map: [(me, roles[me.index() as usize - 1])].into_iter().collect(),
            agent_list,
            ..GameInfo::default()
        }
    }

    fn reveal(info: &mut GameInfo, roles: &[Role]) {
        for (agent, role) in info.agent_list.iter().zip(roles) {
            info.role_map.insert(*agent, *role);
        }
    }

    const ROLES: [Role; 5] = [
        Role::Villager,
        Role::Seer,
        Role::Villager,
        Role::Possessed,
        Role::Werewolf,
    ];

    #[test]
    fn dispatches_to_the_engine_for_the_dealt_role() {
        let mut player = SeriesPlayer::new(1);
        player
            .initialize(&info(2, &ROLES), &GameSetting::standard(5))
            .unwrap();
        assert_eq!(player.active_role(), Some(Role::Seer));
        assert!(player.divine().is_ok());
        assert!(player.attack().is_err());
    }

    #[test]
    fn revealed_snapshot_is_recorded_exactly_once() {
        let mut player = SeriesPlayer::new(1);
        let mut game = info(1, &ROLES);
        player.initialize(&game, &GameSetting::standard(5)).unwrap();
        player.update(&game).unwrap();
        assert!(!player.outcome_recorded());

        game.status_map.insert(Agent::new(5), Status::Dead);
        game.status_map.insert(Agent::new(4), Status::Dead);
        reveal(&mut game, &ROLES);
        player.update(&game).unwrap();
        player.update(&game).unwrap();
        player.finish().unwrap();
        player.finish().unwrap();

        assert_eq!(player.games_completed(), 1);
        let stats = player.statistics();
        assert_eq!(stats.table(Alignment::Village).get(Agent::new(1)).wins, 1);
        assert_eq!(stats.table(Alignment::Werewolf).get(Agent::new(5)).losses, 1);
        assert_eq!(stats.games_for(Agent::new(3)), 1);
        assert_eq!(player.signal().strongest_village, Some(Agent::new(1)));
    }

    #[test]
    fn finish_without_revealed_roles_records_nothing() {
        let mut player = SeriesPlayer::new(1);
        player
            .initialize(&info(3, &ROLES), &GameSetting::standard(5))
            .unwrap();
        player.finish().unwrap();
        assert_eq!(player.games_completed(), 1);
        assert_eq!(player.statistics().games_for(Agent::new(3)), 0);
        assert_eq!(player.signal(), HistoricalSignal::NONE);
    }

    #[test]
    fn calls_before_any_game_are_errors() {
        let mut player = SeriesPlayer::new(1);
        assert_eq!(player.talk(), Err(EngineError::NoActiveGame));
        assert_eq!(player.finish(), Err(EngineError::NoActiveGame));
    }

    #[test]
    fn missing_role_is_rejected() {
        let mut player = SeriesPlayer::new(1);
        let mut game = info(1, &ROLES);
        game.role_map.clear();
        assert_eq!(
            player.initialize(&game, &GameSetting::standard(5)),
            Err(EngineError::MissingSelf)
        );
    }
}

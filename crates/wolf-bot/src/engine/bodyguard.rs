use super::{EngineError, FinishReport, RoleEngine, SharedParser, VillagerEngine};
use crate::features::BotFeatures;
use rand::seq::SliceRandom;
use std::sync::Arc;
use tracing::{Level, event};
use wolf_core::belief::BeliefConfig;
use wolf_core::content::{Content, ProtocolParser};
use wolf_core::model::{Agent, GameInfo, GameSetting, Role};
use wolf_core::stats::HistoricalSignal;

/// Villager talk and vote; guards the historically strongest village agent.
pub struct BodyguardEngine {
    base: VillagerEngine,
}

impl BodyguardEngine {
    pub fn new(seed: u64) -> Self {
        Self::with_config(
            seed,
            BotFeatures::default(),
            BeliefConfig::default(),
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
            base: VillagerEngine::with_role(Role::Bodyguard, seed, features, belief_config, parser),
        }
    }
}

impl RoleEngine for BodyguardEngine {
    fn role(&self) -> Role {
        Role::Bodyguard
    }

    fn initialize(
        &mut self,
        info: &GameInfo,
        setting: &GameSetting,
        signal: HistoricalSignal,
    ) -> Result<(), EngineError> {
        self.base.start_game(info, setting, signal)
    }

    fn day_start(&mut self) -> Result<(), EngineError> {
        self.base.begin_day()
    }

    fn update(&mut self, info: &GameInfo) -> Result<(), EngineError> {
        self.base.absorb(info).map(|_| ())
    }

    fn talk(&mut self) -> Result<Content, EngineError> {
        let plan = self.base.village_plan()?;
        self.base.vote_talk(&plan)
    }

    fn vote(&mut self) -> Result<Agent, EngineError> {
        let plan = self.base.village_plan()?;
        self.base.cast_vote(&plan)
    }

    fn guard(&mut self) -> Result<Agent, EngineError> {
        let (state, rng) = self.base.split_mut()?;
        let others = state.info.alive_others();
        let target = state
            .signal
            .strongest_village
            .filter(|agent| others.contains(agent))
            .or_else(|| others.choose(rng).copied())
            .unwrap_or(state.me);
        event!(
            target: "wolf_bot::engine",
            Level::DEBUG,
            me = %state.me,
            day = state.day(),
            target = %target,
            "guard target"
        );
        Ok(target)
    }

    fn finish(&mut self, report: &FinishReport<'_>) {
        self.base.record_finish(report);
    }
}

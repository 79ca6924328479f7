use super::{EngineError, FinishReport, RoleEngine, SharedParser, VillagerEngine, VotePlan};
use crate::features::BotFeatures;
use crate::policy::{ComingoutSchedule, ReportQueue, choose_divination_target};
use std::sync::Arc;
use tracing::{Level, event};
use wolf_core::belief::BeliefConfig;
use wolf_core::content::{Content, ProtocolParser};
use wolf_core::model::{Agent, GameInfo, GameSetting, Judge, Role, Species};
use wolf_core::stats::HistoricalSignal;

pub struct SeerEngine {
    base: VillagerEngine,
    schedule: ComingoutSchedule,
    reports: ReportQueue,
    not_divined: Vec<Agent>,
    werewolves: Vec<Agent>,
    last_judge: Option<Judge>,
}

impl SeerEngine {
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
            base: VillagerEngine::with_role(Role::Seer, seed, features, belief_config, parser),
            schedule: ComingoutSchedule::new(features.co_day()),
            reports: ReportQueue::default(),
            not_divined: Vec::new(),
            werewolves: Vec::new(),
            last_judge: None,
        }
    }

    pub fn base(&self) -> &VillagerEngine {
        &self.base
    }

    pub fn found_werewolves(&self) -> &[Agent] {
        &self.werewolves
    }

    pub fn not_divined(&self) -> &[Agent] {
        &self.not_divined
    }

    /// Folds tonight's divination into belief and the report queue, once per judge.
    fn absorb_divination(&mut self) -> Result<(), EngineError> {
        let state = self.base.state_mut()?;
        let Some(judge) = state.info.divine_result else {
            return Ok(());
        };
        if self.last_judge == Some(judge) {
            return Ok(());
        }
        self.last_judge = Some(judge);

        self.reports.push(judge);
        self.not_divined.retain(|agent| *agent != judge.target);
        state.record_own_result(judge);
        if judge.result == Species::Werewolf && !self.werewolves.contains(&judge.target) {
            self.werewolves.push(judge.target);
        }

        event!(
            target: "wolf_bot::divine",
            Level::INFO,
            me = %state.me,
            day = judge.day,
            target = %judge.target,
            result = %judge.result,
            queued = self.reports.len() as u64,
            "divination result"
        );
        Ok(())
    }

    /// Alive found werewolves first, then alive agents claiming our role.
    fn plan(&self) -> Result<VotePlan, EngineError> {
        let state = self.base.state()?;
        let mut candidates = state.alive_others_in(&self.werewolves);
        if candidates.is_empty() {
            candidates = state.alive_others_in(&state.ledger.claimants_of(Role::Seer));
        }
        Ok(VotePlan::village(candidates))
    }
}

impl RoleEngine for SeerEngine {
    fn role(&self) -> Role {
        Role::Seer
    }

    fn initialize(
        &mut self,
        info: &GameInfo,
        setting: &GameSetting,
        signal: HistoricalSignal,
    ) -> Result<(), EngineError> {
        self.base.start_game(info, setting, signal)?;
        self.schedule.reset();
        self.reports.clear();
        self.not_divined = info.alive_others();
        self.werewolves.clear();
        self.last_judge = None;
        Ok(())
    }

    fn day_start(&mut self) -> Result<(), EngineError> {
        self.base.begin_day()?;
        self.absorb_divination()
    }

    fn update(&mut self, info: &GameInfo) -> Result<(), EngineError> {
        self.base.absorb(info)?;
        let claimants = self.base.state()?.ledger.claimants_of(Role::Seer);
        self.not_divined.retain(|agent| !claimants.contains(agent));
        Ok(())
    }

    fn talk(&mut self) -> Result<Content, EngineError> {
        let (me, day) = {
            let state = self.base.state()?;
            (state.me, state.day())
        };
        if self.schedule.should_come_out(day, !self.werewolves.is_empty()) {
            event!(
                target: "wolf_bot::comingout",
                Level::INFO,
                me = %me,
                role = %Role::Seer,
                day,
                found = self.werewolves.len() as u64,
            );
            return Ok(Content::comingout(me, Role::Seer));
        }
        if self.schedule.is_done() {
            if let Some(judge) = self.reports.pop() {
                return Ok(Content::divined(judge.target, judge.result));
            }
        }
        let plan = self.plan()?;
        self.base.vote_talk(&plan)
    }

    fn vote(&mut self) -> Result<Agent, EngineError> {
        let plan = self.plan()?;
        self.base.cast_vote(&plan)
    }

    fn divine(&mut self) -> Result<Agent, EngineError> {
        let (state, rng) = self.base.split_mut()?;
        let pool = state.alive_others_in(&self.not_divined);
        let target = choose_divination_target(state.signal.strongest_village, &pool, state.me, rng);
        event!(
            target: "wolf_bot::divine",
            Level::INFO,
            me = %state.me,
            day = state.day(),
            target = %target,
            pool = pool.len() as u64,
            "divination target"
        );
        Ok(target)
    }

    fn finish(&mut self, report: &FinishReport<'_>) {
        self.base.record_finish(report);
    }
}

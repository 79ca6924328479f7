use super::{EngineError, FinishReport, RoleEngine, SharedParser, VillagerEngine, VotePlan};
use crate::features::BotFeatures;
use crate::policy::{ComingoutSchedule, ReportQueue};
use std::sync::Arc;
use tracing::{Level, event};
use wolf_core::belief::BeliefConfig;
use wolf_core::content::{Content, ProtocolParser};
use wolf_core::model::{Agent, GameInfo, GameSetting, Judge, Role, Species};
use wolf_core::stats::HistoricalSignal;

/// Seer-shaped engine for the medium: identifications instead of divinations.
pub struct MediumEngine {
    base: VillagerEngine,
    schedule: ComingoutSchedule,
    reports: ReportQueue,
    found_werewolf: bool,
    last_judge: Option<Judge>,
}

impl MediumEngine {
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
            base: VillagerEngine::with_role(Role::Medium, seed, features, belief_config, parser),
            schedule: ComingoutSchedule::new(features.co_day()),
            reports: ReportQueue::default(),
            found_werewolf: false,
            last_judge: None,
        }
    }

    pub fn base(&self) -> &VillagerEngine {
        &self.base
    }

    fn absorb_identification(&mut self) -> Result<(), EngineError> {
        let state = self.base.state_mut()?;
        let Some(judge) = state.info.medium_result else {
            return Ok(());
        };
        if self.last_judge == Some(judge) {
            return Ok(());
        }
        self.last_judge = Some(judge);
        self.reports.push(judge);
        self.found_werewolf |= judge.result == Species::Werewolf;
        state.record_own_result(judge);

        event!(
            target: "wolf_bot::comingout",
            Level::DEBUG,
            me = %state.me,
            day = judge.day,
            target = %judge.target,
            result = %judge.result,
            "identification result"
        );
        Ok(())
    }

    /// Other alive medium claimants are lying; otherwise the village default.
    fn plan(&self) -> Result<VotePlan, EngineError> {
        let state = self.base.state()?;
        let rivals = state.alive_others_in(&state.ledger.claimants_of(Role::Medium));
        if rivals.is_empty() {
            self.base.village_plan()
        } else {
            Ok(VotePlan::village(rivals))
        }
    }
}

impl RoleEngine for MediumEngine {
    fn role(&self) -> Role {
        Role::Medium
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
        self.found_werewolf = false;
        self.last_judge = None;
        Ok(())
    }

    fn day_start(&mut self) -> Result<(), EngineError> {
        self.base.begin_day()?;
        self.absorb_identification()
    }

    fn update(&mut self, info: &GameInfo) -> Result<(), EngineError> {
        self.base.absorb(info).map(|_| ())
    }

    fn talk(&mut self) -> Result<Content, EngineError> {
        let (me, day) = {
            let state = self.base.state()?;
            (state.me, state.day())
        };
        if self.schedule.should_come_out(day, self.found_werewolf) {
            event!(
                target: "wolf_bot::comingout",
                Level::INFO,
                me = %me,
                role = %Role::Medium,
                day,
            );
            return Ok(Content::comingout(me, Role::Medium));
        }
        if self.schedule.is_done() {
            if let Some(judge) = self.reports.pop() {
                return Ok(Content::identified(judge.target, judge.result));
            }
        }
        let plan = self.plan()?;
        self.base.vote_talk(&plan)
    }

    fn vote(&mut self) -> Result<Agent, EngineError> {
        let plan = self.plan()?;
        self.base.cast_vote(&plan)
    }

    fn finish(&mut self, report: &FinishReport<'_>) {
        self.base.record_finish(report);
    }
}

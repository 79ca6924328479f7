use super::{
    EngineError, FinishReport, GameState, RoleEngine, SharedParser, VillagerEngine, VotePlan,
};
use crate::features::BotFeatures;
use rand::seq::SliceRandom;
use std::sync::Arc;
use tracing::{Level, event};
use wolf_core::belief::BeliefConfig;
use wolf_core::content::{Content, ProtocolParser};
use wolf_core::model::{Agent, Alignment, GameInfo, GameSetting, Role};
use wolf_core::stats::HistoricalSignal;

/// Knows its pack from the role map; votes and attacks outside of it.
pub struct WerewolfEngine {
    base: VillagerEngine,
    pack: Vec<Agent>,
}

impl WerewolfEngine {
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
            base: VillagerEngine::with_role(Role::Werewolf, seed, features, belief_config, parser),
            pack: Vec::new(),
        }
    }

    pub fn base(&self) -> &VillagerEngine {
        &self.base
    }

    /// Every werewolf in the role map, self included.
    pub fn pack(&self) -> &[Agent] {
        &self.pack
    }

    fn outsiders(&self, state: &GameState) -> Vec<Agent> {
        state
            .info
            .alive_others()
            .into_iter()
            .filter(|agent| !self.pack.contains(agent))
            .collect()
    }

    /// Agents that called a pack member a werewolf, then seer claimants.
    fn plan(&self) -> Result<VotePlan, EngineError> {
        let state = self.base.state()?;
        let outsiders = self.outsiders(state);
        let mut accusers: Vec<Agent> = state
            .ledger
            .werewolf_reports()
            .filter(|judge| self.pack.contains(&judge.target))
            .map(|judge| judge.agent)
            .filter(|agent| outsiders.contains(agent))
            .collect();
        accusers.sort();
        accusers.dedup();

        let candidates = if accusers.is_empty() {
            state
                .ledger
                .claimants_of(Role::Seer)
                .into_iter()
                .filter(|agent| outsiders.contains(agent))
                .collect()
        } else {
            accusers
        };

        Ok(VotePlan {
            candidates,
            side: Alignment::Werewolf,
            exclude: self.pack.clone(),
            last_resort: outsiders,
        })
    }
}

impl RoleEngine for WerewolfEngine {
    fn role(&self) -> Role {
        Role::Werewolf
    }

    fn initialize(
        &mut self,
        info: &GameInfo,
        setting: &GameSetting,
        signal: HistoricalSignal,
    ) -> Result<(), EngineError> {
        self.base.start_game(info, setting, signal)?;
        self.pack = info
            .role_map
            .iter()
            .filter(|(_, role)| **role == Role::Werewolf)
            .map(|(agent, _)| *agent)
            .collect();

        let state = self.base.state_mut()?;
        for agent in &self.pack {
            state.belief.pin_role(*agent, Role::Werewolf);
        }
        event!(
            target: "wolf_bot::engine",
            Level::DEBUG,
            me = %state.me,
            pack = self.pack.len() as u64,
            "werewolf pack known"
        );
        Ok(())
    }

    fn day_start(&mut self) -> Result<(), EngineError> {
        self.base.begin_day()
    }

    fn update(&mut self, info: &GameInfo) -> Result<(), EngineError> {
        self.base.absorb(info).map(|_| ())
    }

    fn talk(&mut self) -> Result<Content, EngineError> {
        let plan = self.plan()?;
        self.base.vote_talk(&plan)
    }

    fn vote(&mut self) -> Result<Agent, EngineError> {
        let plan = self.plan()?;
        self.base.cast_vote(&plan)
    }

    fn attack(&mut self) -> Result<Agent, EngineError> {
        let outsiders = self.outsiders(self.base.state()?);
        let (state, rng) = self.base.split_mut()?;
        let target = state
            .signal
            .strongest_village
            .filter(|agent| outsiders.contains(agent))
            .or_else(|| outsiders.choose(rng).copied())
            .unwrap_or(state.me);
        event!(
            target: "wolf_bot::engine",
            Level::DEBUG,
            me = %state.me,
            day = state.day(),
            target = %target,
            "attack target"
        );
        Ok(target)
    }

    fn whisper(&mut self) -> Result<Content, EngineError> {
        Ok(Content::Skip)
    }

    fn finish(&mut self, report: &FinishReport<'_>) {
        self.base.record_finish(report);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testutil::{kill, say, table};

    fn pack_table() -> GameInfo {
        let mut info = table(15, 1, Role::Werewolf);
        info.role_map.insert(Agent::new(5), Role::Werewolf);
        info.role_map.insert(Agent::new(9), Role::Werewolf);
        info
    }

    fn started(signal: HistoricalSignal) -> (WerewolfEngine, GameInfo) {
        let info = pack_table();
        let mut engine = WerewolfEngine::new(21);
        engine
            .initialize(&info, &GameSetting::standard(15), signal)
            .unwrap();
        engine.day_start().unwrap();
        (engine, info)
    }

    fn in_pack(agent: Agent) -> bool {
        [1, 5, 9].contains(&agent.index())
    }

    #[test]
    fn pack_is_pinned_in_belief() {
        let (engine, _) = started(HistoricalSignal::NONE);
        assert_eq!(engine.pack(), &[Agent::new(1), Agent::new(5), Agent::new(9)]);
        let belief = &engine.base().state().unwrap().belief;
        assert_eq!(belief.prob(Agent::new(5), Role::Werewolf), Some(1.0));
        assert_eq!(belief.prob(Agent::new(5), Role::Villager), Some(0.0));
        assert_eq!(belief.prob(Agent::new(2), Role::Werewolf), Some(0.5));
    }

    #[test]
    fn votes_for_whoever_exposed_a_packmate() {
        let (mut engine, mut info) = started(HistoricalSignal::NONE);
        say(&mut info, 3, "DIVINED Agent[05] WEREWOLF");
        engine.update(&info).unwrap();
        assert_eq!(engine.talk().unwrap(), Content::vote(Agent::new(3)));
        assert_eq!(engine.vote().unwrap(), Agent::new(3));
    }

    #[test]
    fn repeat_accusers_are_listed_once() {
        let (mut engine, mut info) = started(HistoricalSignal::NONE);
        say(&mut info, 3, "DIVINED Agent[05] WEREWOLF");
        say(&mut info, 4, "DIVINED Agent[09] WEREWOLF");
        say(&mut info, 3, "DIVINED Agent[09] WEREWOLF");
        engine.update(&info).unwrap();
        let plan = engine.plan().unwrap();
        assert_eq!(plan.candidates, vec![Agent::new(3), Agent::new(4)]);
    }

    #[test]
    fn follows_strongest_werewolf_declaration_but_never_into_the_pack() {
        let signal = HistoricalSignal {
            strongest_village: None,
            strongest_werewolf: Some(Agent::new(5)),
        };
        let (mut engine, mut info) = started(signal);
        say(&mut info, 5, "VOTE Agent[12]");
        engine.update(&info).unwrap();
        assert_eq!(engine.talk().unwrap(), Content::vote(Agent::new(12)));

        say(&mut info, 5, "VOTE Agent[09]");
        engine.update(&info).unwrap();
        assert_eq!(engine.vote().unwrap(), Agent::new(12));
    }

    #[test]
    fn targets_strongest_village_agent_when_nothing_else_is_known() {
        let signal = HistoricalSignal {
            strongest_village: Some(Agent::new(7)),
            strongest_werewolf: None,
        };
        let (mut engine, _) = started(signal);
        assert_eq!(engine.talk().unwrap(), Content::vote(Agent::new(7)));
        assert_eq!(engine.attack().unwrap(), Agent::new(7));
    }

    #[test]
    fn vote_and_attack_stay_outside_the_pack() {
        let (mut engine, mut info) = started(HistoricalSignal::NONE);
        kill(&mut info, 2);
        engine.update(&info).unwrap();
        for _ in 0..20 {
            let vote = engine.vote().unwrap();
            assert!(!in_pack(vote));
            assert_ne!(vote, Agent::new(2));
            let attack = engine.attack().unwrap();
            assert!(!in_pack(attack));
            assert_ne!(attack, Agent::new(2));
        }
    }

    #[test]
    fn whisper_is_skip_and_divine_unsupported() {
        let (mut engine, _) = started(HistoricalSignal::NONE);
        assert_eq!(engine.whisper().unwrap(), Content::Skip);
        assert!(engine.divine().is_err());
    }
}

use super::{EngineError, FinishReport, RoleEngine};
use crate::features::BotFeatures;
use crate::policy::{
    VoteDecider, VoteDecision, VoteInput, contradicting_reporters, fake_seers, reported_wolves,
    village_candidates,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{Level, event};
use wolf_core::belief::{BeliefConfig, RoleBelief};
use wolf_core::content::{Content, ContentParser, ProtocolParser};
use wolf_core::model::{Agent, Alignment, GameInfo, GameSetting, Judge, Role, RoleSet, Species};
use wolf_core::stats::HistoricalSignal;
use wolf_core::talk::{ClaimLedger, ConsumeOutcome, TalkInterpreter};

pub type SharedParser = Arc<dyn ContentParser + Send + Sync>;

/// Per-game state, rebuilt by every `initialize` so nothing leaks between games.
#[derive(Debug)]
pub struct GameState {
    pub info: GameInfo,
    pub setting: GameSetting,
    pub me: Agent,
    pub my_role: Role,
    pub belief: RoleBelief,
    pub ledger: ClaimLedger,
    pub interpreter: TalkInterpreter,
    pub signal: HistoricalSignal,
    pub voter: VoteDecider,
    /// Verdicts from our own divinations or identifications.
    pub own_results: BTreeMap<Agent, Species>,
}

impl GameState {
    pub fn day(&self) -> u32 {
        self.info.day
    }

    pub fn alive(&self) -> BTreeSet<Agent> {
        self.info.alive_agents().into_iter().collect()
    }

    pub fn alive_others_in(&self, agents: &[Agent]) -> Vec<Agent> {
        agents
            .iter()
            .copied()
            .filter(|agent| *agent != self.me && self.info.is_alive(*agent))
            .collect()
    }

    /// Folds one of our own results into belief; it outranks any report about
    /// the same agent.
    pub fn record_own_result(&mut self, judge: Judge) {
        self.own_results.insert(judge.target, judge.result);
        self.belief.apply_divination_result(judge.target, judge.result);
        self.refresh_suspicions();
    }

    /// Re-derives claim-based belief from the whole ledger.
    fn refresh_suspicions(&mut self) {
        if self.my_role.species() == Species::Werewolf {
            return;
        }
        let fake = fake_seers(&self.ledger, self.me);
        let reported: BTreeSet<Agent> = reported_wolves(&self.ledger, &fake)
            .into_iter()
            .filter(|agent| !self.own_results.contains_key(agent))
            .collect();
        for agent in self.belief.reported_werewolves() {
            if !reported.contains(&agent) {
                self.belief.withdraw_report(agent);
            }
        }

        for agent in self.alive_others_in(&fake) {
            self.belief.apply_claimed_werewolf_suspicion(agent);
        }
        if self.my_role == Role::Villager {
            for agent in &fake {
                self.belief.mark_werewolf(*agent);
            }
        }
        let liars = contradicting_reporters(&self.ledger, &self.own_results);
        for agent in self.alive_others_in(&liars) {
            self.belief.apply_claimed_werewolf_suspicion(agent);
        }
        for agent in reported {
            self.belief.apply_reported_werewolf(agent);
        }
    }
}

/// Input to one vote decision: the candidate set and whose lead to follow
/// when it is empty.
#[derive(Debug, Clone)]
pub struct VotePlan {
    pub candidates: Vec<Agent>,
    pub side: Alignment,
    /// Never voted for, even through the fallback chain.
    pub exclude: Vec<Agent>,
    /// Tried only when the whole chain came back empty.
    pub last_resort: Vec<Agent>,
}

impl VotePlan {
    pub fn village(candidates: Vec<Agent>) -> Self {
        Self {
            candidates,
            side: Alignment::Village,
            exclude: Vec::new(),
            last_resort: Vec::new(),
        }
    }
}

/// Plain villager; also the shared base of every other role engine.
pub struct VillagerEngine {
    role: Role,
    features: BotFeatures,
    belief_config: BeliefConfig,
    parser: SharedParser,
    rng: StdRng,
    game: Option<GameState>,
}

impl VillagerEngine {
    pub fn new(seed: u64) -> Self {
        Self::with_role(
            Role::Villager,
            seed,
            BotFeatures::default(),
            BeliefConfig::default(),
            Arc::new(ProtocolParser),
        )
    }

    pub fn with_role(
        role: Role,
        seed: u64,
        features: BotFeatures,
        belief_config: BeliefConfig,
        parser: SharedParser,
    ) -> Self {
        Self {
            role,
            features,
            belief_config,
            parser,
            rng: StdRng::seed_from_u64(seed),
            game: None,
        }
    }

    pub fn features(&self) -> BotFeatures {
        self.features
    }

    pub fn state(&self) -> Result<&GameState, EngineError> {
        self.game
            .as_ref()
            .ok_or(EngineError::NotInitialized { role: self.role })
    }

    pub fn state_mut(&mut self) -> Result<&mut GameState, EngineError> {
        let role = self.role;
        self.game
            .as_mut()
            .ok_or(EngineError::NotInitialized { role })
    }

    pub(crate) fn split_mut(&mut self) -> Result<(&mut GameState, &mut StdRng), EngineError> {
        let role = self.role;
        let game = self
            .game
            .as_mut()
            .ok_or(EngineError::NotInitialized { role })?;
        Ok((game, &mut self.rng))
    }

    pub(crate) fn start_game(
        &mut self,
        info: &GameInfo,
        setting: &GameSetting,
        signal: HistoricalSignal,
    ) -> Result<(), EngineError> {
        let me = info.me.ok_or(EngineError::MissingSelf)?;
        let my_role = info.my_role().ok_or(EngineError::MissingSelf)?;
        if my_role != self.role {
            return Err(EngineError::RoleMismatch {
                expected: self.role,
                actual: my_role,
            });
        }

        let belief = RoleBelief::initialize(
            &info.agent_list,
            me,
            my_role,
            RoleSet::for_players(info.agent_list.len()),
            self.belief_config,
        );
        self.game = Some(GameState {
            info: info.clone(),
            setting: setting.clone(),
            me,
            my_role,
            belief,
            ledger: ClaimLedger::new(),
            interpreter: TalkInterpreter::new(),
            signal,
            voter: VoteDecider::new(),
            own_results: BTreeMap::new(),
        });

        event!(
            target: "wolf_bot::engine",
            Level::DEBUG,
            me = %me,
            role = %my_role,
            players = info.agent_list.len(),
            strongest_village = ?signal.strongest_village,
            strongest_werewolf = ?signal.strongest_werewolf,
            "game initialized"
        );
        Ok(())
    }

    pub(crate) fn begin_day(&mut self) -> Result<(), EngineError> {
        let state = self.state_mut()?;
        state.interpreter.begin_day();
        state.ledger.begin_round();
        state.voter.reset();
        let alive = state.alive();
        state.belief.on_round_start(&alive);
        Ok(())
    }

    /// Stores the new snapshot and folds unseen talk into the ledger and belief.
    pub(crate) fn absorb(&mut self, info: &GameInfo) -> Result<ConsumeOutcome, EngineError> {
        let parser = Arc::clone(&self.parser);
        let state = self.state_mut()?;
        state.info = info.clone();
        let outcome = state.interpreter.consume_new(
            &info.talk_list,
            state.me,
            parser.as_ref(),
            state.signal,
            &mut state.ledger,
        );

        if outcome.clamped {
            tracing::warn!(
                target: "wolf_bot::talk",
                me = %state.me,
                day = info.day,
                log_len = info.talk_list.len(),
                "talk log shorter than the read cursor; cursor clamped"
            );
        }
        for (idx, err) in &outcome.rejected {
            event!(
                target: "wolf_bot::talk",
                Level::DEBUG,
                me = %state.me,
                day = info.day,
                idx = *idx as u64,
                error = %err,
                "ignoring unparseable statement"
            );
        }

        if !outcome.claims.is_empty() {
            state.refresh_suspicions();
        }
        Ok(outcome)
    }

    /// Default village precedence: fake seers, then trusted werewolf reports.
    pub fn village_plan(&self) -> Result<VotePlan, EngineError> {
        let state = self.state()?;
        let alive = state.alive();
        Ok(VotePlan::village(village_candidates(
            &state.ledger,
            state.me,
            &alive,
        )))
    }

    /// Runs the vote chain and turns it into a declaration (or `Skip`).
    pub fn vote_talk(&mut self, plan: &VotePlan) -> Result<Content, EngineError> {
        let features = self.features;
        let role = self.role;
        let (state, rng) = self.split_mut()?;
        let decision = decide_vote(state, rng, features, plan);
        log_vote_decision(state, role, plan, decision, "talk");
        Ok(state.voter.statement(decision))
    }

    /// Runs the vote chain once more and returns the ballot target.
    pub fn cast_vote(&mut self, plan: &VotePlan) -> Result<Agent, EngineError> {
        let features = self.features;
        let role = self.role;
        let (state, rng) = self.split_mut()?;
        let decision = decide_vote(state, rng, features, plan);
        log_vote_decision(state, role, plan, decision, "vote");
        let alive = state.alive();
        Ok(state.voter.final_vote(state.me, &alive))
    }

    pub(crate) fn record_finish(&self, report: &FinishReport<'_>) {
        event!(
            target: "wolf_bot::engine",
            Level::DEBUG,
            role = %self.role,
            games_completed = report.games_completed,
            strongest_village = ?report.signal.strongest_village,
            strongest_werewolf = ?report.signal.strongest_werewolf,
            "game finished"
        );
    }
}

fn decide_vote(
    state: &mut GameState,
    rng: &mut StdRng,
    features: BotFeatures,
    plan: &VotePlan,
) -> VoteDecision {
    let alive = state.alive();
    let me = state.me;
    let allowed = |agent: &Agent| !plan.exclude.contains(agent);

    let (followed, strongest_rival) = if features.follow_strong() {
        let observed = state.ledger.observed_votes();
        let votes = match plan.side {
            Alignment::Village => &observed.village,
            Alignment::Werewolf => &observed.werewolf,
        };
        let followed: Vec<Agent> = votes.iter().copied().filter(allowed).collect();
        let rival = state.signal.strongest(plan.side.opposite()).filter(allowed);
        (followed, rival)
    } else {
        (Vec::new(), None)
    };

    let decision = state.voter.decide(
        VoteInput {
            me,
            alive: &alive,
            candidates: &plan.candidates,
            followed_votes: &followed,
            strongest_rival,
        },
        rng,
    );
    if decision.target.is_some() || plan.last_resort.is_empty() {
        return decision;
    }
    state.voter.decide(
        VoteInput {
            me,
            alive: &alive,
            candidates: &plan.last_resort,
            followed_votes: &[],
            strongest_rival: None,
        },
        rng,
    )
}

fn log_vote_decision(
    state: &GameState,
    role: Role,
    plan: &VotePlan,
    decision: VoteDecision,
    phase: &str,
) {
    if !tracing::enabled!(Level::INFO) {
        return;
    }

    let candidates = plan
        .candidates
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",");
    let target = decision
        .target
        .map(|agent| agent.to_string())
        .unwrap_or_default();

    event!(
        target: "wolf_bot::vote",
        Level::INFO,
        me = %state.me,
        role = %role,
        day = state.day(),
        phase,
        candidates = %candidates,
        target = %target,
        source = decision.source.label(),
    );
}

impl RoleEngine for VillagerEngine {
    fn role(&self) -> Role {
        self.role
    }

    fn initialize(
        &mut self,
        info: &GameInfo,
        setting: &GameSetting,
        signal: HistoricalSignal,
    ) -> Result<(), EngineError> {
        self.start_game(info, setting, signal)
    }

    fn day_start(&mut self) -> Result<(), EngineError> {
        self.begin_day()
    }

    fn update(&mut self, info: &GameInfo) -> Result<(), EngineError> {
        self.absorb(info).map(|_| ())
    }

    fn talk(&mut self) -> Result<Content, EngineError> {
        let plan = self.village_plan()?;
        self.vote_talk(&plan)
    }

    fn vote(&mut self) -> Result<Agent, EngineError> {
        let plan = self.village_plan()?;
        self.cast_vote(&plan)
    }

    fn finish(&mut self, report: &FinishReport<'_>) {
        self.record_finish(report);
    }
}

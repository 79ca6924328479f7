pub mod engine;
pub mod features;
pub mod policy;
pub mod series;

pub use engine::{
    Action, BodyguardEngine, EngineError, FinishReport, MediumEngine, RoleEngine, SeerEngine,
    SharedParser, VillagerEngine, VotePlan, WerewolfEngine,
};
pub use features::BotFeatures;
pub use policy::{VoteDecider, VoteDecision, VoteSource};
pub use series::{RoleEngines, SeriesPlayer};

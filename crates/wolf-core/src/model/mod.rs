pub mod agent;
pub mod game;
pub mod role;

pub use agent::Agent;
pub use game::{GameInfo, GameSetting, Judge, Status, Talk};
pub use role::{Alignment, Role, RoleSet, Species};

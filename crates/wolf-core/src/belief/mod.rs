//! Per-game probability that each agent holds each role.
//!
//! This module is composed of:
//! - `table`: the [`RoleBelief`] table and its update rules.
//! - `config`: tunable shift constants (`BeliefConfig`), env-overridable.
//! - `column`: pure column helpers (sum, normalize, argmax).

mod column;
mod config;
mod table;

pub use column::{argmax, column_sum, normalized_column};
pub use config::BeliefConfig;
pub use table::RoleBelief;

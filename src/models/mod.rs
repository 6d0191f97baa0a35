//! Core data models for the mastery statistics engine.

mod grade;
mod ids;
mod overall;
mod region;
mod summoner;
mod tier;
mod view;

pub use grade::*;
pub use ids::*;
pub use overall::*;
pub use region::*;
pub use summoner::*;
pub use tier::*;
pub use view::*;

/// Literal the upstream service uses for "no value" in string fields
/// (unranked tier, missing division, ungraded champion).
pub const RAW_NULL_SENTINEL: &str = "null";

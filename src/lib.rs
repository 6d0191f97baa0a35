//! # Master Stats
//!
//! A champion mastery statistics service with an in-process summoner cache.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (regions, tiers, grades, statistics, views)
//! - **source**: Upstream clients (Riot API, Data Dragon static data)
//! - **catalog**: Champion lookup table loaded once at startup
//! - **cache**: Bounded LRU summoner cache with coalesced fetches
//! - **calculate**: Statistics shaping and derived views
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod cache;
pub mod calculate;
pub mod catalog;
pub mod config;
pub mod models;
pub mod source;

pub use models::*;

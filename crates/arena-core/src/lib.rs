//! Streme Arena Core Library
//!
//! Shared functionality for the arena server:
//! - Data model for agents, submissions, competitions and cached metrics
//! - Whole-document JSON store with seed-on-first-access
//! - Identity and API key generation
//! - Configuration resolution and hierarchy
//! - Common error types

pub mod config;
pub mod error;
pub mod ids;
pub mod models;
mod queries;
pub mod store;
pub mod tracing_init;

pub use config::ArenaConfig;
pub use error::{Error, Result};
pub use models::{
    Agent, AgentStatus, Competition, CompetitionStatus, Database, PrizeTier, SortKey, Submission,
    TokenMetrics,
};
pub use store::Store;

//! Document export pipeline.
//!
//! One request flows Renderer → Governor(Engine) → artifact; see
//! `orchestrator` for the coordinator, `engine` for the browser adapter,
//! `pool` for the bounded surface pool, and `governor` for the deadline and
//! size budgets.

pub mod engine;
pub mod error;
pub mod governor;
pub mod handlers;
pub mod options;
pub mod orchestrator;
pub mod pool;

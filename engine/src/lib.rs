//! # steer-engine
//!
//! The single entry point for resolving file events. An [`Engine`] owns the
//! steering rule and hook registries, reloads them together, and answers
//! "what applies to this change?" with an [`ActivationResult`].
//!
//! ```text
//! file event ──▶ Engine::resolve ──▶ Snapshot ──┬─▶ RuleRegistry::rules_for
//!                                               └─▶ HookRegistry::hooks_for
//! ```
//!
//! Per-file problems (bad front matter, invalid hook JSON, malformed globs)
//! never fail a load; they are kept as diagnostics on the snapshot and
//! logged with `tracing`. Only an unreadable or slow root fails
//! [`Engine::reload`], and then the previous snapshot stays in force.

mod config;
mod engine;
mod snapshot;
mod state;

pub use config::EngineConfig;
pub use engine::Engine;
pub use snapshot::{ActivationResult, Snapshot};
pub use state::EngineState;

pub use steer_core::{ActivationRequest, EventKind, LoadError};

//! # steer
//!
//! Façade crate that re-exports everything from [`steer_core`] plus the rule,
//! hook, and engine crates behind features. Pull this crate into an editor
//! integration or agent host to decide which steering documents to include
//! and which hooks to fire when a file changes.
//!
//! ## What's inside?
//!
//! - [`PatternSet`] and [`ActivationRequest`] for matching workspace paths.
//! - `rules`: [`SteeringRule`](rules::SteeringRule) documents loaded from
//!   Markdown files with YAML front matter.
//! - `hooks`: [`Hook`](hooks::Hook) definitions loaded from `*.kiro.hook`
//!   JSON files.
//! - `engine` (default): [`Engine`], which loads both and resolves events
//!   against an atomically swapped snapshot.
//!
//! ## Example
//!
//! ```rust
//! use futures_lite::future::block_on;
//! use steer::{ActivationRequest, Engine, EngineConfig};
//!
//! let workspace = tempfile::tempdir()?;
//! let steering = workspace.path().join(".kiro/steering");
//! std::fs::create_dir_all(&steering)?;
//! std::fs::write(
//!     steering.join("csharp.md"),
//!     "---\ndescription: C# conventions\ninclusion: fileMatch\nfileMatchPattern: \"*.cs\"\n---\nUse file-scoped namespaces.\n",
//! )?;
//!
//! let engine = Engine::new(EngineConfig::for_workspace(workspace.path()));
//! block_on(engine.reload())?;
//!
//! let result = engine.resolve(&ActivationRequest::edited("src/Program.cs"));
//! assert_eq!(result.rule_ids(), ["csharp"]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use steer_core::*;

#[cfg(feature = "rules")]
pub use steer_rules as rules;

#[cfg(feature = "hooks")]
pub use steer_hooks as hooks;

#[cfg(feature = "engine")]
pub use steer_engine::{ActivationResult, Engine, EngineConfig, EngineState, Snapshot};

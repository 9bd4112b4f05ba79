//! # steer-core
//!
//! Building blocks shared by the steering rule and hook registries:
//!
//! - [`PatternSet`] compiles glob lists once and matches normalized paths.
//! - [`ActivationRequest`] and [`EventKind`] describe the file event being resolved.
//! - [`LoadError`], [`FileError`] and [`Diagnostic`] split failures into
//!   "the whole load failed" and "one file was skipped".
//! - [`list_files`] collects candidate files under a root, and [`with_deadline`]
//!   bounds a whole root load in time.
//!
//! ```rust
//! use steer_core::{MatchOptions, PatternSet};
//!
//! let razor = PatternSet::compile(["*.razor", "*.razor.cs"], MatchOptions::default())?;
//! assert!(razor.matches("Components/Counter.razor"));
//! assert!(!razor.matches("Counter.ts"));
//! # Ok::<(), steer_core::PatternError>(())
//! ```

mod error;
mod event;
pub mod path;
mod pattern;
mod walk;

pub use error::{Diagnostic, FileError, LoadError};
pub use event::{ActivationRequest, EventKind, UnknownEventKind};
pub use pattern::{MatchOptions, PatternError, PatternSet, split_pattern_list};
pub use walk::{DEFAULT_WALK_TIMEOUT, list_files, with_deadline};

//! Hooks for steer.
//!
//! A hook is a JSON file (`*.kiro.hook`) that asks the host to do something
//! when a matching file changes: send the assistant a prompt, or run a
//! command.
//!
//! ```json
//! {
//!   "enabled": true,
//!   "name": "Sync docs",
//!   "description": "Update docs when C# files change",
//!   "version": "1",
//!   "when": { "type": "fileEdited", "patterns": ["**/*.cs"] },
//!   "then": { "type": "askAgent", "prompt": "Update the XML docs." }
//! }
//! ```
//!
//! | `when.type` | Fires on |
//! |-------------|----------|
//! | `fileEdited` | [`EventKind::Edited`](steer_core::EventKind::Edited) |
//! | `fileSaved` | [`EventKind::Saved`](steer_core::EventKind::Saved) |
//! | `fileCreated` | [`EventKind::Created`](steer_core::EventKind::Created) |
//! | `manual` / `userTriggered` | never from a file event; see [`HookRegistry::manual_hooks`] |

mod hook;
mod loader;
mod registry;

pub use hook::{Action, Hook, Trigger};
pub use loader::{HookLoader, LoadedHooks};
pub use registry::HookRegistry;

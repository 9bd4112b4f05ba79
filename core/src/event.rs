//! File-system events fed to the resolver.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::path::normalize;

/// The kind of change observed on a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// The file's contents changed in the editor.
    Edited,
    /// The file was written to disk.
    Saved,
    /// The file was created.
    Created,
}

impl EventKind {
    /// Lowercase name of the event.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Edited => "edited",
            Self::Saved => "saved",
            Self::Created => "created",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing an unknown event name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown event kind '{0}', expected edited, saved or created")]
pub struct UnknownEventKind(pub String);

impl FromStr for EventKind {
    type Err = UnknownEventKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "edited" | "edit" => Ok(Self::Edited),
            "saved" | "save" => Ok(Self::Saved),
            "created" | "create" => Ok(Self::Created),
            _ => Err(UnknownEventKind(s.to_string())),
        }
    }
}

/// A single file event to resolve.
///
/// The path is normalized to forward-slash form on construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActivationRequest {
    changed_path: String,
    event_kind: EventKind,
}

impl ActivationRequest {
    /// Create a request for `path` with the given event kind.
    pub fn new(path: impl AsRef<str>, event_kind: EventKind) -> Self {
        Self {
            changed_path: normalize(path.as_ref()),
            event_kind,
        }
    }

    /// Shorthand for an [`EventKind::Edited`] request.
    pub fn edited(path: impl AsRef<str>) -> Self {
        Self::new(path, EventKind::Edited)
    }

    /// Shorthand for an [`EventKind::Saved`] request.
    pub fn saved(path: impl AsRef<str>) -> Self {
        Self::new(path, EventKind::Saved)
    }

    /// Shorthand for an [`EventKind::Created`] request.
    pub fn created(path: impl AsRef<str>) -> Self {
        Self::new(path, EventKind::Created)
    }

    /// The normalized path that changed.
    #[must_use]
    pub fn changed_path(&self) -> &str {
        &self.changed_path
    }

    /// What happened to the file.
    #[must_use]
    pub const fn event_kind(&self) -> EventKind {
        self.event_kind
    }
}

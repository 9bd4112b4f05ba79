//! Engine lifecycle.

/// Where the engine is in its load lifecycle.
///
/// ```text
/// Unloaded ─▶ Loading ─▶ Ready ⇄ Reloading
///                │
///                └─▶ Failed ─▶ Loading
/// ```
///
/// A failed reload returns to `Ready` and keeps serving the previous
/// snapshot. `Failed` means no load has ever succeeded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum EngineState {
    /// Nothing has been loaded yet.
    #[default]
    Unloaded,
    /// The first load is in progress.
    Loading,
    /// A snapshot is published.
    Ready,
    /// A snapshot is published and a replacement is being built.
    Reloading,
    /// The first load failed; there is no snapshot.
    Failed,
}

impl EngineState {
    /// Lowercase name of the state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unloaded => "unloaded",
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Reloading => "reloading",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for EngineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Engine configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use steer_core::{DEFAULT_WALK_TIMEOUT, MatchOptions};
use steer_hooks::HookLoader;
use steer_rules::RuleLoader;

/// Configuration for where rules and hooks live and how they match.
///
/// Deserializes from camelCase JSON:
///
/// ```json
/// {
///   "steeringRoots": [".kiro/steering"],
///   "hookRoots": [".kiro/hooks"],
///   "caseSensitive": false,
///   "walkTimeoutMs": 2000
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Directories searched recursively for `*.md` steering files, in order.
    pub steering_roots: Vec<PathBuf>,

    /// Directories searched recursively for `*.kiro.hook` files, in order.
    pub hook_roots: Vec<PathBuf>,

    /// Compare paths against patterns case-sensitively.
    pub case_sensitive: bool,

    /// Time limit for walking and reading a single root.
    #[serde(rename = "walkTimeoutMs", with = "duration_ms")]
    pub walk_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            steering_roots: Vec::new(),
            hook_roots: Vec::new(),
            case_sensitive: true,
            walk_timeout: DEFAULT_WALK_TIMEOUT,
        }
    }
}

impl EngineConfig {
    /// Creates a new configuration with no roots.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration for a workspace using the `.kiro/steering` and
    /// `.kiro/hooks` layout.
    #[must_use]
    pub fn for_workspace(workspace: impl AsRef<Path>) -> Self {
        let kiro = workspace.as_ref().join(".kiro");
        Self::default()
            .with_steering_root(kiro.join("steering"))
            .with_hook_root(kiro.join("hooks"))
    }

    /// Adds a steering root.
    #[must_use]
    pub fn with_steering_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.steering_roots.push(root.into());
        self
    }

    /// Adds a hook root.
    #[must_use]
    pub fn with_hook_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.hook_roots.push(root.into());
        self
    }

    /// Sets case sensitivity for pattern matching.
    #[must_use]
    pub const fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Sets the per-root load timeout.
    #[must_use]
    pub const fn with_walk_timeout(mut self, timeout: Duration) -> Self {
        self.walk_timeout = timeout;
        self
    }

    /// Match options derived from this configuration.
    #[must_use]
    pub const fn match_options(&self) -> MatchOptions {
        MatchOptions {
            case_sensitive: self.case_sensitive,
        }
    }

    pub(crate) fn rule_loader(&self) -> RuleLoader {
        self.steering_roots
            .iter()
            .fold(RuleLoader::new(), |loader, root| loader.add_path(root))
            .with_match_options(self.match_options())
            .with_timeout(self.walk_timeout)
    }

    pub(crate) fn hook_loader(&self) -> HookLoader {
        self.hook_roots
            .iter()
            .fold(HookLoader::new(), |loader, root| loader.add_path(root))
            .with_match_options(self.match_options())
            .with_timeout(self.walk_timeout)
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

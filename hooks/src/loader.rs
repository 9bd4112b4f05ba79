//! Hook loader for reading `*.kiro.hook` files from the filesystem.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_fs as afs;
use steer_core::{
    DEFAULT_WALK_TIMEOUT, Diagnostic, LoadError, MatchOptions, list_files, path, with_deadline,
};

use crate::Hook;

const HOOK_SUFFIX: &str = ".kiro.hook";

/// Loads hooks from one or more root directories.
#[derive(Debug, Clone)]
pub struct HookLoader {
    paths: Vec<PathBuf>,
    options: MatchOptions,
    timeout: Duration,
}

impl Default for HookLoader {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            options: MatchOptions::default(),
            timeout: DEFAULT_WALK_TIMEOUT,
        }
    }
}

/// Hooks read by [`HookLoader::load_all`], plus the files that were skipped.
#[derive(Debug, Default)]
pub struct LoadedHooks {
    /// Parsed hooks in load order.
    pub hooks: Vec<Hook>,
    /// Files that failed validation.
    pub diagnostics: Vec<Diagnostic>,
}

impl HookLoader {
    /// Create a new hook loader with no paths.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a root directory to search for hook files.
    #[must_use]
    pub fn add_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.paths.push(path.into());
        self
    }

    /// Set how `when.patterns` globs compare paths.
    #[must_use]
    pub const fn with_match_options(mut self, options: MatchOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the time limit for loading each root, file reads included.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The configured roots.
    #[must_use]
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Load all hooks from all configured roots.
    ///
    /// Invalid files are skipped and reported in [`LoadedHooks::diagnostics`].
    ///
    /// # Errors
    ///
    /// Returns an error if a root cannot be walked, or if walking and reading
    /// one root takes longer than the timeout.
    pub async fn load_all(&self) -> Result<LoadedHooks, LoadError> {
        let mut loaded = LoadedHooks::default();

        for root in &self.paths {
            with_deadline(root, self.timeout, self.load_root(root, &mut loaded)).await?;
        }

        Ok(loaded)
    }

    async fn load_root(&self, root: &Path, loaded: &mut LoadedHooks) -> Result<(), LoadError> {
        for file in list_files(root, HOOK_SUFFIX).await? {
            match self.load_file(root, &file).await {
                Ok(hook) => {
                    tracing::debug!(
                        id = %hook.id,
                        trigger = hook.trigger.as_str(),
                        enabled = hook.enabled,
                        "loaded hook"
                    );
                    loaded.hooks.push(hook);
                }
                Err(diagnostic) => loaded.diagnostics.push(diagnostic),
            }
        }
        Ok(())
    }

    async fn load_file(&self, root: &Path, file: &Path) -> Result<Hook, Diagnostic> {
        let content = afs::read_to_string(file)
            .await
            .map_err(|err| Diagnostic::new(file, err))?;

        let id = path::relative_id(root, file, HOOK_SUFFIX);
        Hook::parse(id, file, &content, self.options).map_err(|err| Diagnostic::new(file, err))
    }
}

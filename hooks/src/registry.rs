//! Hook registry for storing and querying hooks.

use std::collections::HashMap;
use std::sync::Arc;

use steer_core::{Diagnostic, EventKind, FileError, LoadError};

use crate::{Hook, HookLoader, Trigger};

/// Registry of loaded hooks.
///
/// Matching hooks are independent: every hook that fires on an event is
/// returned, in load order.
#[derive(Debug, Default)]
pub struct HookRegistry {
    hooks: Vec<Arc<Hook>>,
    index: HashMap<String, usize>,
    diagnostics: Vec<Diagnostic>,
}

impl HookRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every hook the loader can find.
    ///
    /// # Errors
    ///
    /// Returns an error only if a root cannot be walked.
    pub async fn load_all(loader: &HookLoader) -> Result<Self, LoadError> {
        let loaded = loader.load_all().await?;
        let mut registry = Self {
            diagnostics: loaded.diagnostics,
            ..Self::default()
        };

        for hook in loaded.hooks {
            let path = hook.path.clone();
            if let Err(err) = registry.register(hook) {
                registry.diagnostics.push(Diagnostic::new(path, err));
            }
        }

        for diagnostic in &registry.diagnostics {
            tracing::warn!(path = %diagnostic.path.display(), error = %diagnostic.error, "skipped hook file");
        }

        Ok(registry)
    }

    /// Register a hook directly.
    ///
    /// # Errors
    ///
    /// Returns [`FileError::DuplicateId`] if a hook with the same id exists.
    pub fn register(&mut self, hook: Hook) -> Result<(), FileError> {
        if self.index.contains_key(&hook.id) {
            return Err(FileError::DuplicateId(hook.id));
        }
        self.index.insert(hook.id.clone(), self.hooks.len());
        self.hooks.push(Arc::new(hook));
        Ok(())
    }

    /// Get a hook by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Arc<Hook>> {
        self.index.get(id).map(|&i| &self.hooks[i])
    }

    /// All hooks, enabled or not, in load order.
    #[must_use]
    pub fn all(&self) -> &[Arc<Hook>] {
        &self.hooks
    }

    /// Number of registered hooks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Check if registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Enabled hooks that fire on an event of `kind` on `path`.
    #[must_use]
    pub fn hooks_for(&self, path: &str, kind: EventKind) -> Vec<Arc<Hook>> {
        self.hooks
            .iter()
            .filter(|hook| hook.fires_on(path, kind))
            .cloned()
            .collect()
    }

    /// Enabled hooks the user runs by hand.
    #[must_use]
    pub fn manual_hooks(&self) -> Vec<Arc<Hook>> {
        self.hooks
            .iter()
            .filter(|hook| hook.enabled && hook.trigger == Trigger::Manual)
            .cloned()
            .collect()
    }

    /// Files skipped during the load that built this registry.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

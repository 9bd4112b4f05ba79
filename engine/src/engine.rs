//! The resolution engine.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use async_lock::Mutex as AsyncMutex;
use futures_lite::future;
use steer_core::{ActivationRequest, LoadError};
use steer_hooks::{Hook, HookRegistry};
use steer_rules::{RuleRegistry, SteeringRule};

use crate::{ActivationResult, EngineConfig, EngineState, Snapshot};

/// Resolves file events to the steering rules and hooks that apply.
///
/// The engine publishes registries as immutable [`Snapshot`]s. Readers copy
/// the current `Arc` and resolve against it, so [`Engine::resolve`] can run
/// on any number of threads while [`Engine::reload`] builds the next
/// snapshot.
///
/// # Example
///
/// ```rust,ignore
/// let engine = Engine::new(EngineConfig::for_workspace("."));
/// engine.reload().await?;
///
/// let result = engine.resolve(&ActivationRequest::edited("src/Program.cs"));
/// for rule in &result.matched_rules {
///     println!("include {}", rule.id);
/// }
/// ```
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    current: RwLock<Option<Arc<Snapshot>>>,
    state: Mutex<EngineState>,
    reload_gate: AsyncMutex<()>,
}

impl Engine {
    /// Create an engine in the [`EngineState::Unloaded`] state.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            current: RwLock::new(None),
            state: Mutex::new(EngineState::Unloaded),
            reload_gate: AsyncMutex::new(()),
        }
    }

    /// The configuration this engine loads from.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> EngineState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The published snapshot, if any load has succeeded.
    #[must_use]
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of snapshots published so far.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.snapshot().map_or(0, |snapshot| snapshot.generation())
    }

    /// Resolve a file event.
    ///
    /// Never fails: before the first successful load, or when nothing
    /// matches, the result is empty.
    #[must_use]
    pub fn resolve(&self, request: &ActivationRequest) -> ActivationResult {
        self.snapshot()
            .map(|snapshot| snapshot.resolve(request))
            .unwrap_or_default()
    }

    /// Rules that are only included on explicit request.
    #[must_use]
    pub fn manual_rules(&self) -> Vec<Arc<SteeringRule>> {
        self.snapshot()
            .map(|snapshot| snapshot.rules().manual_rules())
            .unwrap_or_default()
    }

    /// Enabled hooks the user runs by hand.
    #[must_use]
    pub fn manual_hooks(&self) -> Vec<Arc<Hook>> {
        self.snapshot()
            .map(|snapshot| snapshot.hooks().manual_hooks())
            .unwrap_or_default()
    }

    /// Look up a rule by id.
    #[must_use]
    pub fn rule(&self, id: &str) -> Option<Arc<SteeringRule>> {
        self.snapshot()?.rules().get(id).cloned()
    }

    /// Look up a hook by id.
    #[must_use]
    pub fn hook(&self, id: &str) -> Option<Arc<Hook>> {
        self.snapshot()?.hooks().get(id).cloned()
    }

    /// Load both registries and publish them as a new snapshot.
    ///
    /// Rules and hooks are loaded concurrently. The new snapshot replaces the
    /// current one only if both loads succeed; files that fail to parse do
    /// not count as failures and are kept as diagnostics. Concurrent calls
    /// are serialized.
    ///
    /// # Errors
    ///
    /// Returns the [`LoadError`] of whichever registry failed. The previous
    /// snapshot, if any, stays published.
    pub async fn reload(&self) -> Result<(), LoadError> {
        let _gate = self.reload_gate.lock().await;

        let previous = self.snapshot();
        let mut guard = StateGuard::new(self, previous.is_some());

        let rule_loader = self.config.rule_loader();
        let hook_loader = self.config.hook_loader();
        let loaded = future::zip(
            RuleRegistry::load_all(&rule_loader),
            HookRegistry::load_all(&hook_loader),
        )
        .await;

        match loaded {
            (Ok(rules), Ok(hooks)) => {
                let generation = previous.map_or(0, |snapshot| snapshot.generation()) + 1;
                let snapshot = Arc::new(Snapshot::new(rules, hooks, generation));

                tracing::info!(
                    generation,
                    rules = snapshot.rules().len(),
                    hooks = snapshot.hooks().len(),
                    diagnostics = snapshot.diagnostics().count(),
                    "published registry snapshot"
                );

                *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(snapshot);
                guard.settle(EngineState::Ready);
                Ok(())
            }
            (Err(err), _) | (_, Err(err)) => {
                let stale = previous.is_some();
                tracing::warn!(error = %err, stale, "registry reload failed");
                guard.settle(if stale {
                    EngineState::Ready
                } else {
                    EngineState::Failed
                });
                Err(err)
            }
        }
    }

    fn set_state(&self, state: EngineState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }
}

/// Moves the engine into `Loading`/`Reloading` for the duration of a reload.
///
/// If the reload future is dropped before it settles, the state the engine
/// was in beforehand is restored.
struct StateGuard<'a> {
    engine: &'a Engine,
    restore: Option<EngineState>,
}

impl<'a> StateGuard<'a> {
    fn new(engine: &'a Engine, has_snapshot: bool) -> Self {
        let before = engine.state();
        let restore = if has_snapshot {
            EngineState::Ready
        } else if before == EngineState::Failed {
            EngineState::Failed
        } else {
            EngineState::Unloaded
        };

        engine.set_state(if has_snapshot {
            EngineState::Reloading
        } else {
            EngineState::Loading
        });

        Self {
            engine,
            restore: Some(restore),
        }
    }

    fn settle(&mut self, state: EngineState) {
        self.restore = None;
        self.engine.set_state(state);
    }
}

impl Drop for StateGuard<'_> {
    fn drop(&mut self) {
        if let Some(state) = self.restore.take() {
            tracing::debug!(state = %state, "reload cancelled");
            self.engine.set_state(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_lite::future::block_on;
    use std::fs;
    use std::path::Path;
    use std::time::Duration;
    use tempfile::tempdir;

    fn write(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent");
        }
        fs::write(path, content).expect("write file");
    }

    #[test]
    fn test_unloaded_engine_resolves_to_nothing() {
        let engine = Engine::new(EngineConfig::new());
        assert_eq!(engine.state(), EngineState::Unloaded);
        assert!(engine.resolve(&ActivationRequest::edited("a.cs")).is_empty());
        assert!(engine.manual_rules().is_empty());
        assert_eq!(engine.generation(), 0);
    }

    #[test]
    fn test_first_load_moves_to_ready() {
        let dir = tempdir().expect("create temp dir");
        write(
            &dir.path().join(".kiro/steering/general.md"),
            "---\ndescription: General\ninclusion: always\n---\n",
        );

        let engine = Engine::new(EngineConfig::for_workspace(dir.path()));
        block_on(engine.reload()).expect("load");

        assert_eq!(engine.state(), EngineState::Ready);
        assert_eq!(engine.generation(), 1);
        assert!(engine.rule("general").is_some());
        assert_eq!(
            engine.resolve(&ActivationRequest::edited("x.ts")).rule_ids(),
            vec!["general"]
        );
    }

    #[test]
    fn test_failed_first_load_is_terminal_until_retried() {
        let dir = tempdir().expect("create temp dir");
        let not_a_dir = dir.path().join("steering");
        write(&not_a_dir, "a file, not a directory");

        let engine = Engine::new(EngineConfig::new().with_steering_root(&not_a_dir));
        let result = block_on(engine.reload());

        assert!(matches!(result, Err(LoadError::Io { .. })));
        assert_eq!(engine.state(), EngineState::Failed);
        assert!(engine.snapshot().is_none());

        fs::remove_file(&not_a_dir).expect("remove file");
        block_on(engine.reload()).expect("retry succeeds");
        assert_eq!(engine.state(), EngineState::Ready);
    }

    #[test]
    fn test_cancelled_reload_restores_ready() {
        let dir = tempdir().expect("create temp dir");
        write(
            &dir.path().join(".kiro/steering/general.md"),
            "---\ndescription: General\ninclusion: always\n---\n",
        );
        let engine = Engine::new(EngineConfig::for_workspace(dir.path()));
        block_on(engine.reload()).expect("load");

        let polled = block_on(future::poll_once(engine.reload()));
        assert!(polled.is_none(), "reload should still be reading the disk");

        assert_eq!(engine.state(), EngineState::Ready);
        assert_eq!(engine.generation(), 1);
        block_on(engine.reload()).expect("reload after cancellation");
        assert_eq!(engine.generation(), 2);
    }

    #[test]
    fn test_cancelled_first_load_restores_unloaded() {
        let dir = tempdir().expect("create temp dir");
        write(
            &dir.path().join(".kiro/steering/general.md"),
            "---\ndescription: General\ninclusion: always\n---\n",
        );
        let engine = Engine::new(EngineConfig::for_workspace(dir.path()));

        let polled = block_on(future::poll_once(engine.reload()));
        assert!(polled.is_none(), "load should still be reading the disk");

        assert_eq!(engine.state(), EngineState::Unloaded);
        assert!(engine.snapshot().is_none());
    }

    #[test]
    fn test_walk_timeout_fails_the_load() {
        let dir = tempdir().expect("create temp dir");
        write(
            &dir.path().join("steering/general.md"),
            "---\ndescription: General\ninclusion: always\n---\n",
        );

        let engine = Engine::new(
            EngineConfig::new()
                .with_steering_root(dir.path().join("steering"))
                .with_walk_timeout(Duration::ZERO),
        );

        assert!(matches!(
            block_on(engine.reload()),
            Err(LoadError::Timeout { .. })
        ));
        assert_eq!(engine.state(), EngineState::Failed);
    }
}

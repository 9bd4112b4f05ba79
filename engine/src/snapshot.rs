//! Immutable registry snapshots and activation results.

use std::sync::Arc;

use steer_core::{ActivationRequest, Diagnostic};
use steer_hooks::{Hook, HookRegistry};
use steer_rules::{RuleRegistry, SteeringRule};

/// The rules and hooks that apply to one file event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivationResult {
    /// Matching steering rules, in load order.
    pub matched_rules: Vec<Arc<SteeringRule>>,
    /// Enabled hooks that fire on the event, in load order.
    pub matched_hooks: Vec<Arc<Hook>>,
}

impl ActivationResult {
    /// Whether nothing applies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matched_rules.is_empty() && self.matched_hooks.is_empty()
    }

    /// Ids of the matched rules.
    #[must_use]
    pub fn rule_ids(&self) -> Vec<&str> {
        self.matched_rules.iter().map(|r| r.id.as_str()).collect()
    }

    /// Ids of the matched hooks.
    #[must_use]
    pub fn hook_ids(&self) -> Vec<&str> {
        self.matched_hooks.iter().map(|h| h.id.as_str()).collect()
    }
}

/// A rule registry and hook registry published together by one load.
#[derive(Debug)]
pub struct Snapshot {
    rules: RuleRegistry,
    hooks: HookRegistry,
    generation: u64,
}

impl Snapshot {
    pub(crate) const fn new(rules: RuleRegistry, hooks: HookRegistry, generation: u64) -> Self {
        Self {
            rules,
            hooks,
            generation,
        }
    }

    /// Resolve a file event against this snapshot.
    #[must_use]
    pub fn resolve(&self, request: &ActivationRequest) -> ActivationResult {
        let path = request.changed_path();
        ActivationResult {
            matched_rules: self.rules.rules_for(path),
            matched_hooks: self.hooks.hooks_for(path, request.event_kind()),
        }
    }

    /// The steering rules in this snapshot.
    #[must_use]
    pub const fn rules(&self) -> &RuleRegistry {
        &self.rules
    }

    /// The hooks in this snapshot.
    #[must_use]
    pub const fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    /// How many snapshots were published before and including this one.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Every file skipped while building this snapshot.
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.rules
            .diagnostics()
            .iter()
            .chain(self.hooks.diagnostics())
    }
}

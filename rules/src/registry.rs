//! Rule registry for storing and querying steering rules.

use std::collections::HashMap;
use std::sync::Arc;

use steer_core::{Diagnostic, FileError, LoadError};

use crate::{Inclusion, RuleLoader, SteeringRule};

/// Registry of loaded steering rules.
///
/// Rules keep the order they were loaded in; every query returns them in
/// that order.
///
/// # Example
///
/// ```rust,ignore
/// let loader = RuleLoader::new().add_path("./.kiro/steering");
/// let registry = RuleRegistry::load_all(&loader).await?;
///
/// for rule in registry.rules_for("src/Program.cs") {
///     println!("{}: {}", rule.id, rule.description);
/// }
/// ```
#[derive(Debug, Default)]
pub struct RuleRegistry {
    rules: Vec<Arc<SteeringRule>>,
    index: HashMap<String, usize>,
    diagnostics: Vec<Diagnostic>,
}

impl RuleRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every rule the loader can find.
    ///
    /// Files that fail to parse, and files whose id was already taken by an
    /// earlier root, are left out and recorded in [`Self::diagnostics`].
    ///
    /// # Errors
    ///
    /// Returns an error only if a root cannot be walked.
    pub async fn load_all(loader: &RuleLoader) -> Result<Self, LoadError> {
        let loaded = loader.load_all().await?;
        let mut registry = Self {
            diagnostics: loaded.diagnostics,
            ..Self::default()
        };

        for rule in loaded.rules {
            let path = rule.path.clone();
            if let Err(err) = registry.register(rule) {
                registry.diagnostics.push(Diagnostic::new(path, err));
            }
        }

        for diagnostic in &registry.diagnostics {
            tracing::warn!(path = %diagnostic.path.display(), error = %diagnostic.error, "skipped steering file");
        }

        Ok(registry)
    }

    /// Register a rule directly.
    ///
    /// # Errors
    ///
    /// Returns [`FileError::DuplicateId`] if a rule with the same id exists.
    pub fn register(&mut self, rule: SteeringRule) -> Result<(), FileError> {
        if self.index.contains_key(&rule.id) {
            return Err(FileError::DuplicateId(rule.id));
        }
        self.index.insert(rule.id.clone(), self.rules.len());
        self.rules.push(Arc::new(rule));
        Ok(())
    }

    /// Get a rule by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Arc<SteeringRule>> {
        self.index.get(id).map(|&i| &self.rules[i])
    }

    /// Check if a rule exists.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All rules, in load order.
    #[must_use]
    pub fn all(&self) -> &[Arc<SteeringRule>] {
        &self.rules
    }

    /// Number of registered rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules that apply to a file event on `path`.
    ///
    /// Returns every `always` rule and every `fileMatch` rule whose patterns
    /// match, in load order. `manual` rules are never returned.
    #[must_use]
    pub fn rules_for(&self, path: &str) -> Vec<Arc<SteeringRule>> {
        self.rules
            .iter()
            .filter(|rule| rule.applies_to(path))
            .cloned()
            .collect()
    }

    /// Rules that are only included on explicit request.
    #[must_use]
    pub fn manual_rules(&self) -> Vec<Arc<SteeringRule>> {
        self.rules
            .iter()
            .filter(|rule| rule.inclusion == Inclusion::Manual)
            .cloned()
            .collect()
    }

    /// Files skipped during the load that built this registry.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_lite::future::block_on;
    use std::fs;
    use steer_core::{MatchOptions, PatternSet};
    use tempfile::tempdir;

    fn make_rule(id: &str, inclusion: Inclusion, patterns: &[&str]) -> SteeringRule {
        SteeringRule {
            id: id.to_string(),
            path: format!("/steering/{id}.md").into(),
            description: format!("{id} description"),
            inclusion,
            patterns: PatternSet::compile(patterns, MatchOptions::default()).unwrap(),
            content: String::new(),
        }
    }

    fn ids(rules: &[Arc<SteeringRule>]) -> Vec<&str> {
        rules.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = RuleRegistry::new();
        registry
            .register(make_rule("general", Inclusion::Always, &[]))
            .unwrap();

        assert!(registry.contains("general"));
        assert_eq!(
            registry.get("general").map(|r| r.id.as_str()),
            Some("general")
        );
        assert!(registry.get("nonexistent").is_none());
    }

    #[test]
    fn test_duplicate_id_is_rejected() {
        let mut registry = RuleRegistry::new();
        registry
            .register(make_rule("dup", Inclusion::Always, &[]))
            .unwrap();

        let err = registry
            .register(make_rule("dup", Inclusion::Manual, &[]))
            .unwrap_err();
        assert!(matches!(err, FileError::DuplicateId(id) if id == "dup"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_always_rules_apply_everywhere() {
        let mut registry = RuleRegistry::new();
        registry
            .register(make_rule("general", Inclusion::Always, &[]))
            .unwrap();

        assert_eq!(ids(&registry.rules_for("anything.cs")), vec!["general"]);
        assert_eq!(ids(&registry.rules_for("readme.md")), vec!["general"]);
    }

    #[test]
    fn test_rules_for_keeps_load_order() {
        let mut registry = RuleRegistry::new();
        registry
            .register(make_rule("razor", Inclusion::FileMatch, &["*.razor", "*.razor.cs"]))
            .unwrap();
        registry
            .register(make_rule("general", Inclusion::Always, &[]))
            .unwrap();
        registry
            .register(make_rule("release", Inclusion::Manual, &[]))
            .unwrap();
        registry
            .register(make_rule("csharp", Inclusion::FileMatch, &["*.cs"]))
            .unwrap();

        assert_eq!(
            ids(&registry.rules_for("Counter.razor.cs")),
            vec!["razor", "general", "csharp"]
        );
        assert_eq!(ids(&registry.rules_for("Counter.ts")), vec!["general"]);
    }

    #[test]
    fn test_manual_rules_are_separate() {
        let mut registry = RuleRegistry::new();
        registry
            .register(make_rule("release", Inclusion::Manual, &[]))
            .unwrap();
        registry
            .register(make_rule("general", Inclusion::Always, &[]))
            .unwrap();

        assert_eq!(ids(&registry.manual_rules()), vec!["release"]);
        assert!(!ids(&registry.rules_for("CHANGELOG.md")).contains(&"release"));
    }

    #[test]
    fn test_load_all_collects_diagnostics() {
        let dir = tempdir().expect("create temp dir");
        fs::write(
            dir.path().join("good.md"),
            "---\ndescription: Good\ninclusion: always\n---\n",
        )
        .expect("write");
        fs::write(
            dir.path().join("bad.md"),
            "---\ndescription: Bad\ninclusion: fileMatch\n---\n",
        )
        .expect("write");

        let loader = RuleLoader::new().add_path(dir.path());
        let registry = block_on(RuleRegistry::load_all(&loader)).expect("load registry");

        assert_eq!(registry.len(), 1);
        assert!(registry.contains("good"));
        assert_eq!(registry.diagnostics().len(), 1);
    }

    #[test]
    fn test_duplicate_ids_across_roots() {
        let first = tempdir().expect("create temp dir");
        let second = tempdir().expect("create temp dir");
        let rule = "---\ndescription: Shared\ninclusion: always\n---\n";
        fs::write(first.path().join("shared.md"), rule).expect("write");
        fs::write(second.path().join("shared.md"), rule).expect("write");

        let loader = RuleLoader::new()
            .add_path(first.path())
            .add_path(second.path());
        let registry = block_on(RuleRegistry::load_all(&loader)).expect("load registry");

        assert_eq!(registry.len(), 1);
        assert!(registry.get("shared").unwrap().path.starts_with(first.path()));
        assert!(matches!(
            registry.diagnostics()[0].error,
            FileError::DuplicateId(_)
        ));
    }
}

//! Rule loader for reading steering files from the filesystem.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_fs as afs;
use steer_core::{
    DEFAULT_WALK_TIMEOUT, Diagnostic, LoadError, MatchOptions, list_files, path, with_deadline,
};

use crate::SteeringRule;

const RULE_SUFFIX: &str = ".md";

/// Loads steering rules from one or more root directories.
///
/// # Example
///
/// ```rust,ignore
/// let loader = RuleLoader::new()
///     .add_path("./.kiro/steering")
///     .add_path("~/.kiro/steering");
///
/// let loaded = loader.load_all().await?;
/// for diagnostic in &loaded.diagnostics {
///     eprintln!("skipped {diagnostic}");
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RuleLoader {
    paths: Vec<PathBuf>,
    options: MatchOptions,
    timeout: Duration,
}

impl Default for RuleLoader {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            options: MatchOptions::default(),
            timeout: DEFAULT_WALK_TIMEOUT,
        }
    }
}

/// Rules read by [`RuleLoader::load_all`], plus the files that were skipped.
#[derive(Debug, Default)]
pub struct LoadedRules {
    /// Parsed rules in load order.
    pub rules: Vec<SteeringRule>,
    /// Files that failed to parse.
    pub diagnostics: Vec<Diagnostic>,
}

impl RuleLoader {
    /// Create a new rule loader with no paths.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a root directory to search for `*.md` steering files.
    ///
    /// Roots are searched recursively, in the order they were added.
    #[must_use]
    pub fn add_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.paths.push(path.into());
        self
    }

    /// Set how `fileMatchPattern` globs compare paths.
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

    /// Load all rules from all configured roots.
    ///
    /// Files are read root by root, in path order within each root. A file
    /// that cannot be read or parsed is skipped and reported in
    /// [`LoadedRules::diagnostics`].
    ///
    /// # Errors
    ///
    /// Returns an error if a root cannot be walked, or if walking and reading
    /// one root takes longer than the timeout.
    pub async fn load_all(&self) -> Result<LoadedRules, LoadError> {
        let mut loaded = LoadedRules::default();

        for root in &self.paths {
            with_deadline(root, self.timeout, self.load_root(root, &mut loaded)).await?;
        }

        Ok(loaded)
    }

    async fn load_root(&self, root: &Path, loaded: &mut LoadedRules) -> Result<(), LoadError> {
        for file in list_files(root, RULE_SUFFIX).await? {
            match self.load_file(root, &file).await {
                Ok(rule) => {
                    tracing::debug!(id = %rule.id, inclusion = rule.inclusion.as_str(), "loaded steering rule");
                    loaded.rules.push(rule);
                }
                Err(diagnostic) => loaded.diagnostics.push(diagnostic),
            }
        }
        Ok(())
    }

    async fn load_file(&self, root: &Path, file: &Path) -> Result<SteeringRule, Diagnostic> {
        let content = afs::read_to_string(file)
            .await
            .map_err(|err| Diagnostic::new(file, err))?;

        let id = path::relative_id(root, file, RULE_SUFFIX);
        SteeringRule::parse(id, file, &content, self.options)
            .map_err(|err| Diagnostic::new(file, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_lite::future::block_on;
    use std::fs;
    use tempfile::{TempDir, tempdir};
    use steer_core::FileError;

    fn always_rule(description: &str) -> String {
        format!("---\ndescription: {description}\ninclusion: always\n---\n\nBody.\n")
    }

    fn prepare_loader() -> (TempDir, RuleLoader) {
        let dir = tempdir().expect("create temp dir");
        let loader = RuleLoader::new().add_path(dir.path());
        (dir, loader)
    }

    #[test]
    fn test_load_rules_recursively() {
        let (dir, loader) = prepare_loader();
        fs::create_dir(dir.path().join("dotnet")).expect("create subdir");
        fs::write(dir.path().join("general.md"), always_rule("General")).expect("write rule");
        fs::write(
            dir.path().join("dotnet/csharp.md"),
            "---\ndescription: C#\nfileMatchPattern: \"*.cs\"\ninclusion: fileMatch\n---\n",
        )
        .expect("write rule");

        let loaded = block_on(loader.load_all()).expect("load rules");

        let ids: Vec<_> = loaded.rules.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["dotnet/csharp", "general"]);
        assert!(loaded.diagnostics.is_empty());
    }

    #[test]
    fn test_non_markdown_files_are_ignored() {
        let (dir, loader) = prepare_loader();
        fs::write(dir.path().join("notes.txt"), "not a rule").expect("write");
        fs::write(dir.path().join("rule.md"), always_rule("Rule")).expect("write");

        let loaded = block_on(loader.load_all()).expect("load rules");
        assert_eq!(loaded.rules.len(), 1);
    }

    #[test]
    fn test_malformed_file_is_isolated() {
        let (dir, loader) = prepare_loader();
        fs::write(dir.path().join("a.md"), always_rule("A")).expect("write");
        fs::write(dir.path().join("broken.md"), "no front matter").expect("write");
        fs::write(dir.path().join("c.md"), always_rule("C")).expect("write");

        let loaded = block_on(loader.load_all()).expect("bad file does not fail the load");

        assert_eq!(loaded.rules.len(), 2);
        assert_eq!(loaded.diagnostics.len(), 1);
        assert!(loaded.diagnostics[0].path.ends_with("broken.md"));
        assert!(matches!(
            loaded.diagnostics[0].error,
            FileError::MalformedFrontMatter(_)
        ));
    }

    #[test]
    fn test_roots_load_in_order() {
        let first = tempdir().expect("create temp dir");
        let second = tempdir().expect("create temp dir");
        fs::write(first.path().join("z.md"), always_rule("Z")).expect("write");
        fs::write(second.path().join("a.md"), always_rule("A")).expect("write");

        let loader = RuleLoader::new()
            .add_path(first.path())
            .add_path(second.path());
        let loaded = block_on(loader.load_all()).expect("load rules");

        let ids: Vec<_> = loaded.rules.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["z", "a"]);
    }

    #[test]
    fn test_timeout_covers_the_whole_root() {
        let (dir, loader) = prepare_loader();
        let loader = loader.with_timeout(Duration::ZERO);
        fs::write(dir.path().join("rule.md"), always_rule("Rule")).expect("write");

        let result = block_on(loader.load_all());
        assert!(matches!(result, Err(LoadError::Timeout { .. })));
    }

    #[test]
    fn test_missing_root_loads_nothing() {
        let dir = tempdir().expect("create temp dir");
        let loader = RuleLoader::new().add_path(dir.path().join("missing"));

        let loaded = block_on(loader.load_all()).expect("missing root is empty");
        assert!(loaded.rules.is_empty());
        assert!(loaded.diagnostics.is_empty());
    }

    #[test]
    fn test_match_options_reach_patterns() {
        let (dir, loader) = prepare_loader();
        let loader = loader.with_match_options(MatchOptions::case_insensitive());
        fs::write(
            dir.path().join("cs.md"),
            "---\ndescription: C#\nfileMatchPattern: \"*.cs\"\ninclusion: fileMatch\n---\n",
        )
        .expect("write");

        let loaded = block_on(loader.load_all()).expect("load rules");
        assert!(loaded.rules[0].applies_to("PROGRAM.CS"));
    }
}

//! Hook types and JSON schema validation.

use std::path::PathBuf;

use serde::Deserialize;
use steer_core::{EventKind, FileError, MatchOptions, PatternSet};

/// What causes a hook to fire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// A matching file was edited.
    FileEdited(PatternSet),
    /// A matching file was saved.
    FileSaved(PatternSet),
    /// A matching file was created.
    FileCreated(PatternSet),
    /// The user runs the hook by hand.
    Manual,
}

impl Trigger {
    /// The file event this trigger listens for, if any.
    #[must_use]
    pub const fn event_kind(&self) -> Option<EventKind> {
        match self {
            Self::FileEdited(_) => Some(EventKind::Edited),
            Self::FileSaved(_) => Some(EventKind::Saved),
            Self::FileCreated(_) => Some(EventKind::Created),
            Self::Manual => None,
        }
    }

    /// The globs a file event must match.
    #[must_use]
    pub const fn patterns(&self) -> Option<&PatternSet> {
        match self {
            Self::FileEdited(patterns) | Self::FileSaved(patterns) | Self::FileCreated(patterns) => {
                Some(patterns)
            }
            Self::Manual => None,
        }
    }

    /// Whether an event of `kind` on `path` fires this trigger.
    #[must_use]
    pub fn fires_on(&self, path: &str, kind: EventKind) -> bool {
        self.event_kind() == Some(kind) && self.patterns().is_some_and(|p| p.matches(path))
    }

    /// The `when.type` spelling of this trigger.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FileEdited(_) => "fileEdited",
            Self::FileSaved(_) => "fileSaved",
            Self::FileCreated(_) => "fileCreated",
            Self::Manual => "manual",
        }
    }
}

/// What the host should do when a hook fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Send a prompt to the assistant.
    AskAgent {
        /// Prompt template, passed through verbatim.
        prompt: String,
    },
    /// Run a shell command.
    RunCommand {
        /// Command template, passed through verbatim.
        command: String,
    },
}

/// A hook loaded from a `*.kiro.hook` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hook {
    /// Path of the file relative to its hook root, without `.kiro.hook`.
    pub id: String,
    /// File the hook was loaded from.
    pub path: PathBuf,
    /// Display name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Schema version declared by the file.
    pub version: String,
    /// Disabled hooks are kept but never fire.
    pub enabled: bool,
    /// When the hook fires.
    pub trigger: Trigger,
    /// What firing asks the host to do.
    pub action: Action,
}

#[derive(Debug, Deserialize)]
struct RawHook {
    enabled: bool,
    name: String,
    description: String,
    version: String,
    when: RawWhen,
    then: RawThen,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum RawWhen {
    FileEdited { patterns: Vec<String> },
    FileSaved { patterns: Vec<String> },
    FileCreated { patterns: Vec<String> },
    #[serde(alias = "userTriggered")]
    Manual {},
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum RawThen {
    AskAgent {
        prompt: String,
    },
    RunCommand {
        #[serde(default)]
        command: Option<String>,
        #[serde(default)]
        prompt: Option<String>,
    },
}

impl Hook {
    /// Parse a hook from the contents of a `*.kiro.hook` file.
    ///
    /// ```json
    /// {
    ///   "enabled": true,
    ///   "name": "Sync docs",
    ///   "description": "Update docs when C# files change",
    ///   "version": "1",
    ///   "when": { "type": "fileEdited", "patterns": ["**/*.cs"] },
    ///   "then": { "type": "askAgent", "prompt": "Update the XML docs." }
    /// }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`FileError::SchemaValidation`] for invalid JSON, missing
    /// fields, unknown `when.type`/`then.type` values, or a file trigger
    /// without patterns. Returns [`FileError::PatternSyntax`] if a pattern
    /// does not compile.
    pub fn parse(
        id: impl Into<String>,
        path: impl Into<PathBuf>,
        content: &str,
        options: MatchOptions,
    ) -> Result<Self, FileError> {
        let raw: RawHook = serde_json::from_str(content)
            .map_err(|err| FileError::SchemaValidation(err.to_string()))?;

        let trigger = match raw.when {
            RawWhen::FileEdited { patterns } => {
                Trigger::FileEdited(compile("fileEdited", &patterns, options)?)
            }
            RawWhen::FileSaved { patterns } => {
                Trigger::FileSaved(compile("fileSaved", &patterns, options)?)
            }
            RawWhen::FileCreated { patterns } => {
                Trigger::FileCreated(compile("fileCreated", &patterns, options)?)
            }
            RawWhen::Manual {} => Trigger::Manual,
        };

        let action = match raw.then {
            RawThen::AskAgent { prompt } => Action::AskAgent { prompt },
            RawThen::RunCommand { command, prompt } => Action::RunCommand {
                command: command.or(prompt).ok_or_else(|| {
                    FileError::SchemaValidation(
                        "runCommand requires a 'command' field".to_string(),
                    )
                })?,
            },
        };

        Ok(Self {
            id: id.into(),
            path: path.into(),
            name: raw.name,
            description: raw.description,
            version: raw.version,
            enabled: raw.enabled,
            trigger,
            action,
        })
    }

    /// Whether an event of `kind` on `path` fires this hook.
    ///
    /// Disabled hooks never fire.
    #[must_use]
    pub fn fires_on(&self, path: &str, kind: EventKind) -> bool {
        self.enabled && self.trigger.fires_on(path, kind)
    }
}

fn compile(
    trigger: &str,
    patterns: &[String],
    options: MatchOptions,
) -> Result<PatternSet, FileError> {
    let compiled = PatternSet::compile(patterns, options)?;
    if compiled.is_empty() {
        return Err(FileError::SchemaValidation(format!(
            "'when.patterns' must not be empty for {trigger}"
        )));
    }
    Ok(compiled)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Result<Hook, FileError> {
        Hook::parse("test", "/hooks/test.kiro.hook", content, MatchOptions::default())
    }

    const EDIT_HOOK: &str = r#"{
        "enabled": true,
        "name": "Sync docs",
        "description": "Update docs when C# files change",
        "version": "1",
        "when": { "type": "fileEdited", "patterns": ["*.cs"] },
        "then": { "type": "askAgent", "prompt": "Update the XML docs." }
    }"#;

    #[test]
    fn test_parse_file_edited_hook() {
        let hook = parse(EDIT_HOOK).unwrap();
        assert_eq!(hook.name, "Sync docs");
        assert!(hook.enabled);
        assert_eq!(hook.trigger.event_kind(), Some(EventKind::Edited));
        assert_eq!(
            hook.action,
            Action::AskAgent {
                prompt: "Update the XML docs.".to_string()
            }
        );
        assert!(hook.fires_on("src/Foo.cs", EventKind::Edited));
        assert!(!hook.fires_on("src/Foo.cs", EventKind::Saved));
        assert!(!hook.fires_on("src/Foo.ts", EventKind::Edited));
    }

    #[test]
    fn test_disabled_hook_never_fires() {
        let content = EDIT_HOOK.replace("\"enabled\": true", "\"enabled\": false");
        let hook = parse(&content).unwrap();
        assert!(!hook.enabled);
        assert!(!hook.fires_on("Foo.cs", EventKind::Edited));
    }

    #[test]
    fn test_run_command_hook() {
        let content = r#"{
            "enabled": true,
            "name": "Format",
            "description": "Run dotnet format on save",
            "version": "1",
            "when": { "type": "fileSaved", "patterns": ["**/*.cs"] },
            "then": { "type": "runCommand", "command": "dotnet format" }
        }"#;
        let hook = parse(content).unwrap();
        assert_eq!(hook.trigger.as_str(), "fileSaved");
        assert_eq!(
            hook.action,
            Action::RunCommand {
                command: "dotnet format".to_string()
            }
        );
    }

    #[test]
    fn test_run_command_accepts_prompt_field() {
        let content = r#"{
            "enabled": true, "name": "n", "description": "d", "version": "1",
            "when": { "type": "fileCreated", "patterns": ["*.ts"] },
            "then": { "type": "runCommand", "prompt": "npm run lint" }
        }"#;
        let hook = parse(content).unwrap();
        assert_eq!(
            hook.action,
            Action::RunCommand {
                command: "npm run lint".to_string()
            }
        );
    }

    #[test]
    fn test_manual_hook() {
        let content = r#"{
            "enabled": true, "name": "n", "description": "d", "version": "1",
            "when": { "type": "userTriggered" },
            "then": { "type": "askAgent", "prompt": "Review the diff." }
        }"#;
        let hook = parse(content).unwrap();
        assert_eq!(hook.trigger, Trigger::Manual);
        assert!(!hook.fires_on("anything", EventKind::Edited));
    }

    #[test]
    fn test_missing_when_is_schema_error() {
        let content = r#"{
            "enabled": true, "name": "n", "description": "d", "version": "1",
            "then": { "type": "askAgent", "prompt": "p" }
        }"#;
        let err = parse(content).unwrap_err();
        assert!(matches!(err, FileError::SchemaValidation(ref msg) if msg.contains("when")));
    }

    #[test]
    fn test_unknown_types_are_rejected() {
        let unknown_when = EDIT_HOOK.replace("fileEdited", "fileDeleted");
        assert!(matches!(
            parse(&unknown_when),
            Err(FileError::SchemaValidation(_))
        ));

        let unknown_then = EDIT_HOOK.replace("askAgent", "sendEmail");
        assert!(matches!(
            parse(&unknown_then),
            Err(FileError::SchemaValidation(_))
        ));
    }

    #[test]
    fn test_file_trigger_needs_patterns() {
        let content = EDIT_HOOK.replace(r#"["*.cs"]"#, "[]");
        assert!(matches!(parse(&content), Err(FileError::SchemaValidation(_))));
    }

    #[test]
    fn test_bad_glob_is_pattern_error() {
        let content = EDIT_HOOK.replace(r#"["*.cs"]"#, r#"["src/[oops"]"#);
        assert!(matches!(parse(&content), Err(FileError::PatternSyntax(_))));
    }

    #[test]
    fn test_brace_glob_is_pattern_error() {
        let content = EDIT_HOOK.replace(r#"["*.cs"]"#, r#"["**/*.{ts,tsx}"]"#);
        assert!(matches!(parse(&content), Err(FileError::PatternSyntax(_))));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            parse("{ not json"),
            Err(FileError::SchemaValidation(_))
        ));
    }
}

//! Steering rule types and front matter parsing.

use std::path::PathBuf;

use serde::Deserialize;
use steer_core::{FileError, MatchOptions, PatternSet, split_pattern_list};

/// When a steering rule is pulled into the assistant's context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Inclusion {
    /// Included for every file event.
    Always,
    /// Included when the changed file matches one of the rule's patterns.
    FileMatch,
    /// Included only when the user asks for it explicitly.
    Manual,
}

impl Inclusion {
    /// Parse the value of the `inclusion` front matter key.
    ///
    /// Only the exact spellings `always`, `fileMatch` and `manual` are
    /// accepted.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "always" => Some(Self::Always),
            "fileMatch" => Some(Self::FileMatch),
            "manual" => Some(Self::Manual),
            _ => None,
        }
    }

    /// The front matter spelling of this mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::FileMatch => "fileMatch",
            Self::Manual => "manual",
        }
    }
}

/// A steering rule loaded from a Markdown file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SteeringRule {
    /// Path of the file relative to its steering root, without `.md`.
    pub id: String,
    /// File the rule was loaded from.
    pub path: PathBuf,
    /// Human-readable description.
    pub description: String,
    /// Activation policy.
    pub inclusion: Inclusion,
    /// Compiled `fileMatchPattern` globs; empty unless `inclusion` is `FileMatch`.
    pub patterns: PatternSet,
    /// The Markdown body (everything after the front matter).
    pub content: String,
}

impl SteeringRule {
    /// Parse a steering rule from file content.
    ///
    /// The file format is:
    /// ```markdown
    /// ---
    /// description: C# coding conventions
    /// fileMatchPattern: "*.cs", "*.csproj"
    /// inclusion: fileMatch
    /// ---
    ///
    /// # C# Style
    /// ...
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`FileError::MalformedFrontMatter`] if the front matter is
    /// missing, lacks `description` or `inclusion`, names an unknown
    /// inclusion mode, or is `fileMatch` without patterns.
    /// Returns [`FileError::PatternSyntax`] if a pattern does not compile.
    pub fn parse(
        id: impl Into<String>,
        path: impl Into<PathBuf>,
        content: &str,
        options: MatchOptions,
    ) -> Result<Self, FileError> {
        let (yaml, body) = split_front_matter(content)?;
        let front_matter = FrontMatter::parse(yaml);

        let description = front_matter
            .description
            .filter(|d| !d.trim().is_empty())
            .ok_or_else(|| malformed("missing 'description'"))?;

        let inclusion_name = front_matter
            .inclusion
            .ok_or_else(|| malformed("missing 'inclusion'"))?;
        let inclusion = Inclusion::from_name(&inclusion_name).ok_or_else(|| {
            malformed(format!(
                "unknown inclusion '{inclusion_name}', expected always, fileMatch or manual"
            ))
        })?;

        let patterns = if inclusion == Inclusion::FileMatch {
            let patterns = PatternSet::compile(&front_matter.file_match_pattern, options)?;
            if patterns.is_empty() {
                return Err(malformed("inclusion 'fileMatch' requires a non-empty 'fileMatchPattern'"));
            }
            patterns
        } else {
            PatternSet::default()
        };

        Ok(Self {
            id: id.into(),
            path: path.into(),
            description,
            inclusion,
            patterns,
            content: body.to_string(),
        })
    }

    /// Whether a file event on `path` activates this rule.
    #[must_use]
    pub fn applies_to(&self, path: &str) -> bool {
        match self.inclusion {
            Inclusion::Always => true,
            Inclusion::FileMatch => self.patterns.matches(path),
            Inclusion::Manual => false,
        }
    }
}

/// Front matter keys the resolver reads. Other keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatter {
    /// `description`
    pub description: Option<String>,
    /// `inclusion`
    pub inclusion: Option<String>,
    /// `fileMatchPattern`, split into individual globs.
    pub file_match_pattern: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFrontMatter {
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    inclusion: Option<String>,
    #[serde(default)]
    file_match_pattern: Option<PatternField>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PatternField {
    One(String),
    Many(Vec<String>),
}

impl FrontMatter {
    /// Parse the text between the `---` delimiters.
    ///
    /// Well-formed YAML is read with `serde_yaml`. Steering files often write
    /// pattern lists that are not valid YAML (`"*.cs", "*.csproj"` or a bare
    /// `*.cs`), so anything YAML rejects is read again line by line as
    /// `key: value` pairs.
    #[must_use]
    pub fn parse(yaml: &str) -> Self {
        match serde_yaml::from_str::<RawFrontMatter>(yaml) {
            Ok(raw) => Self {
                description: raw.description,
                inclusion: raw.inclusion,
                file_match_pattern: match raw.file_match_pattern {
                    Some(PatternField::One(list)) => split_pattern_list(&list),
                    Some(PatternField::Many(items)) => items,
                    None => Vec::new(),
                },
            },
            Err(err) => {
                tracing::trace!(error = %err, "front matter is not strict YAML, using line parser");
                Self::parse_lines(yaml)
            }
        }
    }

    fn parse_lines(yaml: &str) -> Self {
        let mut front_matter = Self::default();
        // Set after a bare `fileMatchPattern:` so following `- item` lines are collected.
        let mut in_pattern_list = false;

        for line in yaml.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if in_pattern_list {
                if let Some(item) = line.strip_prefix('-') {
                    let item = unquote(item.trim());
                    if !item.is_empty() {
                        front_matter.file_match_pattern.push(item.to_string());
                    }
                    continue;
                }
                in_pattern_list = false;
            }

            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();

            match key.trim() {
                "description" => front_matter.description = Some(unquote(value).to_string()),
                "inclusion" => front_matter.inclusion = Some(unquote(value).to_string()),
                "fileMatchPattern" => {
                    let items = split_pattern_list(value);
                    in_pattern_list = items.is_empty();
                    front_matter.file_match_pattern.extend(items);
                }
                _ => {}
            }
        }

        front_matter
    }
}

fn split_front_matter(content: &str) -> Result<(&str, &str), FileError> {
    let content = content.trim_start_matches('\u{feff}').trim_start();

    let mut lines = content.split_inclusive('\n');
    let opening = lines.next().unwrap_or_default();
    if opening.trim_end() != "---" {
        return Err(malformed("missing front matter delimiter '---'"));
    }

    let start = opening.len();
    let mut offset = start;
    for line in lines {
        if line.trim_end_matches(['\r', '\n']) == "---" {
            let yaml = &content[start..offset];
            let body = content[offset + line.len()..].trim();
            return Ok((yaml, body));
        }
        offset += line.len();
    }

    Err(malformed("unterminated front matter"))
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

fn malformed(reason: impl Into<String>) -> FileError {
    FileError::MalformedFrontMatter(reason.into())
}

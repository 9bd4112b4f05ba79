//! Glob matching for steering rule and hook patterns.
//!
//! Patterns are compiled once, when the file that declares them is loaded,
//! so a malformed glob is reported against that file instead of silently
//! never matching.
//!
//! | Token | Matches |
//! |-------|---------|
//! | `*` | any run of characters inside one path segment |
//! | `?` | one character inside one path segment |
//! | `**` | zero or more whole segments (must be a segment on its own) |
//! | `[abc]`, `[!a-z]` | one character from (or outside) the class |
//!
//! Brace alternation (`*.{ts,tsx}`) is not supported and fails to compile;
//! list the alternatives as separate patterns instead.
//!
//! A pattern without any `/` is matched against the last segment of the
//! path, so `*.razor` matches both `Counter.razor` and
//! `Components/Counter.razor`.

use thiserror::Error;

use crate::path::normalize;

/// A glob that could not be compiled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid glob '{pattern}' at position {position}: {message}")]
pub struct PatternError {
    /// The pattern as written.
    pub pattern: String,
    /// Byte offset of the offending token.
    pub position: usize,
    /// What went wrong.
    pub message: String,
}

/// Options controlling how paths are compared against patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOptions {
    /// Compare path characters case-sensitively.
    pub case_sensitive: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            case_sensitive: true,
        }
    }
}

impl MatchOptions {
    /// Case-insensitive matching, for hosts on case-insensitive filesystems.
    #[must_use]
    pub const fn case_insensitive() -> Self {
        Self {
            case_sensitive: false,
        }
    }

    const fn to_glob(self) -> glob::MatchOptions {
        glob::MatchOptions {
            case_sensitive: self.case_sensitive,
            require_literal_separator: true,
            require_literal_leading_dot: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CompiledGlob {
    source: String,
    pattern: glob::Pattern,
    basename: bool,
}

/// An ordered set of compiled globs.
///
/// A path matches the set when it matches any member. The empty set matches
/// nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternSet {
    globs: Vec<CompiledGlob>,
    options: MatchOptions,
}

impl PatternSet {
    /// Compile a list of globs.
    ///
    /// Separators are normalized to `/` before compiling and blank entries are
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns the first [`PatternError`] encountered.
    pub fn compile<I, S>(patterns: I, options: MatchOptions) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut globs = Vec::new();

        for raw in patterns {
            let raw = raw.as_ref().trim();
            if raw.is_empty() {
                continue;
            }

            let source = normalize(raw);
            if let Some(position) = raw.find(['{', '}']) {
                return Err(PatternError {
                    pattern: raw.to_string(),
                    position,
                    message: "brace alternation is not supported".to_string(),
                });
            }
            let pattern = glob::Pattern::new(&source).map_err(|err| PatternError {
                pattern: raw.to_string(),
                position: err.pos,
                message: err.msg.to_string(),
            })?;

            globs.push(CompiledGlob {
                basename: !source.contains('/'),
                source,
                pattern,
            });
        }

        Ok(Self { globs, options })
    }

    /// Whether `path` matches any glob in the set.
    ///
    /// `path` is normalized the same way patterns are, so callers may pass
    /// Windows-style paths.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        if self.globs.is_empty() {
            return false;
        }

        let path = normalize(path);
        let file_name = path.rsplit('/').next().unwrap_or(path.as_str());
        let options = self.options.to_glob();

        self.globs.iter().any(|glob| {
            let candidate = if glob.basename { file_name } else { &path };
            glob.pattern.matches_with(candidate, options)
        })
    }

    /// The normalized patterns, in declaration order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.globs.iter().map(|glob| glob.source.as_str())
    }

    /// Number of globs in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.globs.len()
    }

    /// Whether the set has no globs (and therefore matches nothing).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.globs.is_empty()
    }

    /// The options this set was compiled with.
    #[must_use]
    pub const fn options(&self) -> MatchOptions {
        self.options
    }
}

/// Split a pattern list written as a single scalar into individual globs.
///
/// Steering files write lists in several ways, all of which are accepted:
///
/// ```text
/// "*.cs", "*.csproj"
/// '*.ts, *.tsx'
/// *.astro
/// ["*.md", "docs/**/*.mdx"]
/// ```
///
/// Entries are split on commas; surrounding whitespace and quotes are
/// stripped from each entry, and empty entries are dropped.
#[must_use]
pub fn split_pattern_list(raw: &str) -> Vec<String> {
    let mut raw = raw.trim();
    if let Some(inner) = raw.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
        raw = inner;
    }

    raw.split(',')
        .map(|token| token.trim().trim_matches(['"', '\'']).trim())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

//! Path normalization and identifier derivation.

use std::path::{Component, Path};

/// Normalize a path or pattern to forward-slash form.
///
/// Backslashes become `/`, runs of `/` collapse to one, and leading `./`
/// segments are dropped.
#[must_use]
pub fn normalize(raw: &str) -> String {
    let replaced = raw.trim().replace('\\', "/");
    let mut out = String::with_capacity(replaced.len());

    for ch in replaced.chars() {
        if ch == '/' && out.ends_with('/') {
            continue;
        }
        out.push(ch);
    }

    let mut trimmed = out.as_str();
    while let Some(rest) = trimmed.strip_prefix("./") {
        trimmed = rest;
    }

    trimmed.to_string()
}

/// Derive a stable identifier for `file` relative to `root`.
///
/// The identifier is the relative path in forward-slash form with `suffix`
/// removed, e.g. `dotnet/csharp-style` for `<root>/dotnet/csharp-style.md`.
#[must_use]
pub fn relative_id(root: &Path, file: &Path, suffix: &str) -> String {
    let relative = file.strip_prefix(root).unwrap_or(file);
    let joined = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/");

    joined
        .strip_suffix(suffix)
        .map_or_else(|| joined.clone(), str::to_string)
}

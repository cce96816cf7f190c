//! Path normalization.
//!
//! Every entry is identified by its root-relative path with `/` separators,
//! no leading `./` and no trailing separator. This form is used for glob
//! matching, sorting and rendering, so it must be produced in one place.

use std::path::{Component, Path};

/// Normalizes a path to forward-slash form.
///
/// `.` components are dropped, backslashes are treated as separators and
/// non-UTF-8 names are converted lossily.
pub fn normalize_path<P: AsRef<Path>>(path: P) -> String {
    let mut parts: Vec<String> = Vec::new();
    for component in path.as_ref().components() {
        match component {
            Component::CurDir => {}
            Component::RootDir | Component::Prefix(_) => {}
            Component::ParentDir => parts.push("..".to_string()),
            Component::Normal(name) => {
                let name = name.to_string_lossy();
                // A Windows-style path handed to a Unix build arrives as one component.
                parts.extend(
                    name.split('\\')
                        .filter(|s| !s.is_empty() && *s != ".")
                        .map(str::to_string),
                );
            }
        }
    }
    parts.join("/")
}

/// Returns the normalized path of `path` relative to `root`, or `None` when
/// `path` does not live under `root`.
pub fn relative_to(root: &Path, path: &Path) -> Option<String> {
    path.strip_prefix(root).ok().map(normalize_path)
}

/// Escapes glob metacharacters so `path` matches only itself.
pub fn glob_literal(path: &str) -> String {
    let mut escaped = String::with_capacity(path.len());
    for ch in path.chars() {
        match ch {
            '*' | '?' | '[' | ']' | '{' | '}' => {
                escaped.push('[');
                escaped.push(ch);
                escaped.push(']');
            }
            _ => escaped.push(ch),
        }
    }
    escaped
}

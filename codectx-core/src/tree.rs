//! Folder-tree projection of the selected paths.

use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Indentation added per tree level.
const INDENT: &str = "  ";

#[derive(Debug, Default)]
struct TreeNode {
    is_directory: bool,
    children: BTreeMap<String, TreeNode>,
}

impl TreeNode {
    fn insert(&mut self, path: &str) {
        let parts: Vec<&str> = path.split('/').filter(|part| !part.is_empty()).collect();
        let mut node = self;
        for (index, part) in parts.iter().enumerate() {
            let child = node.children.entry((*part).to_string()).or_default();
            if index + 1 < parts.len() {
                child.is_directory = true;
            }
            node = child;
        }
    }

    fn render(&self, indent: &str, remaining_depth: usize, lines: &mut Vec<String>) {
        if remaining_depth == 0 {
            return;
        }
        let mut entries: Vec<(&String, &TreeNode)> = self.children.iter().collect();
        // Directories first, then byte order within each kind.
        entries.sort_by(|(a_name, a), (b_name, b)| match (a.is_directory, b.is_directory) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => a_name.cmp(b_name),
        });

        for (name, child) in entries {
            if child.is_directory {
                lines.push(format!("{}{}/", indent, name));
                child.render(&format!("{}{}", indent, INDENT), remaining_depth - 1, lines);
            } else {
                lines.push(format!("{}{}", indent, name));
            }
        }
    }
}

/// Renders `paths` (normalized, `/`-separated) as an indented listing.
///
/// At most `max_depth` levels are shown; `0` yields no lines and `1` only the
/// top level. Directory lines end with `/`.
///
/// ```
/// use codectx_core::build_tree;
///
/// let lines = build_tree(&["a.txt", "src/c.txt"], 4);
/// assert_eq!(lines, vec!["src/", "  c.txt", "a.txt"]);
/// ```
pub fn build_tree<S: AsRef<str>>(paths: &[S], max_depth: usize) -> Vec<String> {
    let mut root = TreeNode {
        is_directory: true,
        children: BTreeMap::new(),
    };
    for path in paths {
        root.insert(path.as_ref());
    }
    let mut lines = Vec::new();
    root.render("", max_depth, &mut lines);
    lines
}

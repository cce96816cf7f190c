//! redaction - Pattern-based masking of secrets in text.
//!
//! [`redact`] is pure and total: it runs the block rules in table order,
//! replacing each match with [`REDACTION_MARKER`], then the key-value rule,
//! which keeps the key and operator and masks only the value.
//!
//! The streaming pipeline additionally needs to know where rule matches lie
//! so it never splits one across two writes; see [`protected_spans`] and
//! [`open_block_start`].
//!
//! License: MIT OR APACHE 2.0

pub mod rules;

use regex::{Captures, NoExpand};
use std::borrow::Cow;
use std::ops::Range;

pub use rules::{CompiledRule, CompiledRules, RuleKind, BUILTIN, BUILTIN_RULES, REDACTION_MARKER};

impl CompiledRules {
    /// Applies every rule to `text` and returns the masked result.
    pub fn redact(&self, text: &str) -> String {
        let mut output = text.to_string();
        for rule in &self.rules {
            let replaced = match rule.kind {
                RuleKind::Block => rule.regex.replace_all(&output, NoExpand(REDACTION_MARKER)),
                RuleKind::KeyValue => rule.regex.replace_all(&output, |caps: &Captures| {
                    format!("{}{}{}", &caps[1], &caps[2], REDACTION_MARKER)
                }),
            };
            if let Cow::Owned(masked) = replaced {
                output = masked;
            }
        }
        output
    }

    /// Byte ranges of every rule match in `text`, sorted by start.
    ///
    /// Each rule is matched against the unmodified input, so ranges from
    /// different rules may overlap.
    pub fn protected_spans(&self, text: &str) -> Vec<Range<usize>> {
        let mut spans: Vec<Range<usize>> = self
            .rules
            .iter()
            .flat_map(|rule| rule.regex.find_iter(text).map(|m| m.range()))
            .collect();
        spans.sort_by_key(|span| (span.start, span.end));
        spans
    }

    /// Start of the first PEM header in `text` that is not part of a complete
    /// PEM block.
    pub fn open_block_start(&self, text: &str) -> Option<usize> {
        let closed: Vec<Range<usize>> = self.pem_block.find_iter(text).map(|m| m.range()).collect();
        self.pem_header
            .find_iter(text)
            .map(|header| header.start())
            .find(|start| !closed.iter().any(|block| block.contains(start)))
    }
}

/// Masks secrets in `text` using the built-in rule table.
///
/// # Examples
///
/// ```
/// use codectx_core::redaction::redact;
///
/// assert_eq!(redact("API_KEY=supersecret"), "API_KEY=[REDACTED]");
/// ```
pub fn redact(text: &str) -> String {
    BUILTIN.redact(text)
}

/// Byte ranges of built-in rule matches in `text`.
pub fn protected_spans(text: &str) -> Vec<Range<usize>> {
    BUILTIN.protected_spans(text)
}

/// Start of an unterminated PEM block in `text`, if any.
pub fn open_block_start(text: &str) -> Option<usize> {
    BUILTIN.open_block_start(text)
}

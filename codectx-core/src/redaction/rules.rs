//! rules.rs - The built-in redaction rule table and its compiled form.
//!
//! The table is fixed at build time. It is compiled once into a global,
//! shared [`CompiledRules`] and never mutated afterwards.
//!
//! License: MIT OR APACHE 2.0

use lazy_static::lazy_static;
use log::debug;
use regex::{Regex, RegexBuilder};

/// Literal substituted for detected sensitive content.
pub const REDACTION_MARKER: &str = "[REDACTED]";

/// How a rule's match is replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// The whole match becomes the marker.
    Block,
    /// Capture groups 1 (key) and 2 (operator) are kept, the value becomes
    /// the marker.
    KeyValue,
}

/// A single rule definition as written in the table.
#[derive(Debug, Clone, Copy)]
pub struct RedactionRule {
    /// Unique identifier for the rule (e.g., "aws_access_key").
    pub name: &'static str,
    /// The regex pattern string.
    pub pattern: &'static str,
    pub kind: RuleKind,
}

/// A PEM key block, non-greedy across the body.
const PEM_BLOCK_PATTERN: &str = r"(?s)-----BEGIN [^-\r\n]+-----.*?-----END [^-\r\n]+-----";

/// Opening line of a PEM block, used to hold back streamed text until the
/// block is closed.
const PEM_HEADER_PATTERN: &str = r"-----BEGIN [^-\r\n]+-----";

/// Block rules run first, in table order, then the key-value rule.
pub const BUILTIN_RULES: &[RedactionRule] = &[
    RedactionRule {
        name: "pem_block",
        pattern: PEM_BLOCK_PATTERN,
        kind: RuleKind::Block,
    },
    RedactionRule {
        name: "aws_access_key",
        pattern: r"\bAKIA[0-9A-Z]{16}\b",
        kind: RuleKind::Block,
    },
    RedactionRule {
        name: "aws_session_key",
        pattern: r"\bASIA[0-9A-Z]{16}\b",
        kind: RuleKind::Block,
    },
    RedactionRule {
        name: "slack_token",
        pattern: r"\bxox[baprs]-[A-Za-z0-9-]{10,}\b",
        kind: RuleKind::Block,
    },
    RedactionRule {
        name: "github_token",
        pattern: r"\b(?:ghp|gho|ghu|ghs|ghr)_[A-Za-z0-9]{36}\b",
        kind: RuleKind::Block,
    },
    RedactionRule {
        name: "github_fine_grained_token",
        pattern: r"\bgithub_pat_[A-Za-z0-9_]{22,}\b",
        kind: RuleKind::Block,
    },
    RedactionRule {
        name: "stripe_secret_key",
        pattern: r"\b(?:sk_live|sk_test)_[A-Za-z0-9]{20,}\b",
        kind: RuleKind::Block,
    },
    RedactionRule {
        name: "jwt",
        pattern: r"\beyJ[A-Za-z0-9_-]+\.[A-Za-z0-9_-]+\.[A-Za-z0-9_-]+\b",
        kind: RuleKind::Block,
    },
    RedactionRule {
        name: "key_value",
        // An existing marker is consumed whole so text after it is kept on a second pass.
        pattern: r#"(?i)\b(api_key|apikey|token|secret|password|passphrase|key)\b([ \t]*[:=][ \t]*)(?:\[REDACTED\]|['"]?[^'"\s]+['"]?)"#,
        kind: RuleKind::KeyValue,
    },
];

/// Represents a single compiled redaction rule.
#[derive(Debug)]
pub struct CompiledRule {
    /// The compiled regular expression used for matching.
    pub regex: Regex,
    /// The unique name of the redaction rule.
    pub name: &'static str,
    pub kind: RuleKind,
}

/// All compiled rules, in application order.
#[derive(Debug)]
pub struct CompiledRules {
    pub rules: Vec<CompiledRule>,
    /// A complete PEM block.
    pub pem_block: Regex,
    /// A PEM header on its own.
    pub pem_header: Regex,
}

/// Compiles a rule list. Fails on the first invalid pattern.
pub fn compile_rules(rules: &[RedactionRule]) -> Result<CompiledRules, regex::Error> {
    debug!("Starting compilation of {} rules.", rules.len());
    let mut compiled = Vec::with_capacity(rules.len());
    for rule in rules {
        let regex = RegexBuilder::new(rule.pattern)
            .size_limit(10 * (1 << 20)) // 10 MB limit for compiled regex
            .build()?;
        debug!(target: "codectx_core::redaction", "Rule '{}' compiled successfully.", rule.name);
        compiled.push(CompiledRule {
            regex,
            name: rule.name,
            kind: rule.kind,
        });
    }
    Ok(CompiledRules {
        rules: compiled,
        pem_block: Regex::new(PEM_BLOCK_PATTERN)?,
        pem_header: Regex::new(PEM_HEADER_PATTERN)?,
    })
}

lazy_static! {
    /// The built-in table, compiled once for the whole process.
    // The table is a constant covered by tests, so a failure here is a build defect.
    pub static ref BUILTIN: CompiledRules =
        compile_rules(BUILTIN_RULES).expect("built-in redaction rules must compile");
}

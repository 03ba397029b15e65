//! Heuristic textual lint over a transaction's `data` field.
//!
//! This is a substring match on text, not bytecode analysis: compiled code for a
//! `selfdestruct` does not contain that word, so a clean scan proves nothing. It catches
//! source fragments and annotated payloads that were pasted where bytecode belongs.

use lazy_static::lazy_static;
use regex::Regex;

#[derive(Debug, Clone)]
pub struct LintPattern {
    pub name: &'static str,
    pub description: &'static str,
    regex: Regex,
}

impl LintPattern {
    pub fn new(name: &'static str, description: &'static str, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self { name, description, regex: Regex::new(pattern)? })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintFinding {
    pub pattern: &'static str,
    pub description: &'static str,
}

lazy_static! {
    static ref BUILTIN_PATTERNS: Vec<LintPattern> = vec![
        LintPattern::new("selfdestruct", "self-destruct operation", r"(?i)selfdestruct").unwrap(),
        LintPattern::new(
            "delegatecall-to-zero",
            "delegatecall to a null address",
            r"(?i)delegatecall.*(0x0+\b|address\(0\))",
        )
        .unwrap(),
        LintPattern::new("tx-origin", "authorization via tx.origin", r"(?i)tx\.origin").unwrap(),
    ];
}

#[derive(Debug, Clone)]
pub struct TextualLint {
    patterns: Vec<LintPattern>,
}

impl Default for TextualLint {
    fn default() -> Self {
        Self { patterns: BUILTIN_PATTERNS.clone() }
    }
}

impl TextualLint {
    pub fn new(patterns: Vec<LintPattern>) -> Self {
        Self { patterns }
    }

    pub fn patterns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.patterns.iter().map(|p| p.name)
    }

    /// Returns one finding per pattern that matches anywhere in `text`.
    pub fn scan(&self, text: &str) -> Vec<LintFinding> {
        self.patterns
            .iter()
            .filter(|p| p.regex.is_match(text))
            .map(|p| LintFinding { pattern: p.name, description: p.description })
            .collect()
    }
}

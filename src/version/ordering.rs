//! Loose ordering of free-form version strings
//!
//! Versions are split into runs of digits, runs of lowercase letters and any
//! other characters, dropping the `.` separators. Digit runs compare as
//! integers, everything else compares as text, and a number always sorts
//! below text so that any two versions can be compared.
//!
//! The ordering is best effort: `1.0.0rc1` sorts *above* `1.0.0` because the
//! longer sequence wins once the common prefix is equal.

use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Placeholder version used when nothing is known about a package
pub const ZERO_VERSION: &str = "0.0.0";

static COMPONENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+|[a-z]+|\.").expect("component pattern is valid"));

/// Digit run compared by numeric value, whatever its length
#[derive(Debug, Clone, PartialEq, Eq)]
struct Digits(String);

impl Digits {
    fn new(run: &str) -> Self {
        let trimmed = run.trim_start_matches('0');
        if trimmed.is_empty() {
            Self("0".to_string())
        } else {
            Self(trimmed.to_string())
        }
    }
}

impl Ord for Digits {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for Digits {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Variant order matters: numbers sort below text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Token {
    Number(Digits),
    Text(String),
}

/// A version string with its loose comparison key
#[derive(Debug, Clone)]
pub struct LooseVersion {
    original: String,
    tokens: Vec<Token>,
}

impl LooseVersion {
    pub fn parse(version: &str) -> Self {
        let mut tokens = Vec::new();
        let mut last = 0;

        for component in COMPONENT_RE.find_iter(version) {
            if component.start() > last {
                tokens.push(Token::Text(version[last..component.start()].to_string()));
            }
            last = component.end();

            let run = component.as_str();
            if run == "." {
                continue;
            }
            if run.as_bytes()[0].is_ascii_digit() {
                tokens.push(Token::Number(Digits::new(run)));
            } else {
                tokens.push(Token::Text(run.to_string()));
            }
        }

        if last < version.len() {
            tokens.push(Token::Text(version[last..].to_string()));
        }

        Self {
            original: version.to_string(),
            tokens,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.original
    }
}

impl PartialEq for LooseVersion {
    fn eq(&self, other: &Self) -> bool {
        self.tokens == other.tokens
    }
}

impl Eq for LooseVersion {}

impl Ord for LooseVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.tokens.cmp(&other.tokens)
    }
}

impl PartialOrd for LooseVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for LooseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

/// Compare two version strings with the loose ordering
pub fn compare_loose(a: &str, b: &str) -> Ordering {
    LooseVersion::parse(a).cmp(&LooseVersion::parse(b))
}

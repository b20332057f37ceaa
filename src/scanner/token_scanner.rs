use crate::error::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which substrings count as a timing value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternMode {
    /// Digits, a literal decimal point, digits (`12.34`).
    #[default]
    Strict,
    /// Digits, any single character, digits (`12.34`, but also `12a34`).
    Loose,
}

impl PatternMode {
    pub fn regex(&self) -> &'static str {
        match self {
            PatternMode::Strict => r"\d+\.\d+",
            PatternMode::Loose => r"\d+.\d+",
        }
    }
}

impl fmt::Display for PatternMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternMode::Strict => write!(f, "strict"),
            PatternMode::Loose => write!(f, "loose"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenMatch {
    Found(String),
    NotFound,
}

pub struct TokenScanner {
    mode: PatternMode,
    pattern: Regex,
}

impl TokenScanner {
    pub fn new(mode: PatternMode) -> Result<Self> {
        let pattern = Regex::new(mode.regex())?;
        Ok(Self { mode, pattern })
    }

    pub fn mode(&self) -> PatternMode {
        self.mode
    }

    /// Returns the leftmost match on the line, verbatim.
    pub fn scan(&self, line: &str) -> TokenMatch {
        match self.pattern.find(line) {
            Some(m) => TokenMatch::Found(m.as_str().to_string()),
            None => TokenMatch::NotFound,
        }
    }
}

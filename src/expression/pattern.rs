//! LIKE and REGEXP patterns.
//!
//! A [`Pattern`] keeps its source text and compiles the regex on first use.
//! Compile failures are reported from [`Pattern::is_match`], never at parse
//! time.

use crate::expression::{ExpressionError, ExpressionResult};
use regex::Regex;
use std::sync::OnceLock;

/// Translate a SQL LIKE pattern into an anchored regex.
///
/// `%` matches any run of characters, `_` exactly one character; everything
/// else is matched literally. Wildcards also match newlines.
pub fn like_to_regex(pattern: &str) -> String {
    let mut regex = String::with_capacity(pattern.len() + 8);
    regex.push_str("(?s)^");

    let mut literal = [0u8; 4];
    for ch in pattern.chars() {
        match ch {
            '%' => regex.push_str(".*"),
            '_' => regex.push('.'),
            _ => regex.push_str(&regex::escape(ch.encode_utf8(&mut literal))),
        }
    }

    regex.push('$');
    regex
}

/// A regex pattern attached to a LIKE or REGEXP node
#[derive(Debug, Clone)]
pub struct Pattern {
    /// Pattern text as written in the expression
    source: String,
    /// Regex the source translates to
    regex: String,
    compiled: OnceLock<Result<Regex, regex::Error>>,
}

impl Pattern {
    /// Create a pattern from a LIKE wildcard string
    pub fn like(source: impl Into<String>) -> Self {
        let source = source.into();
        let regex = like_to_regex(&source);
        Self::with_regex(source, regex)
    }

    /// Create a pattern from a raw regular expression
    pub fn regexp(source: impl Into<String>) -> Self {
        let source = source.into();
        let regex = source.clone();
        Self::with_regex(source, regex)
    }

    fn with_regex(source: String, regex: String) -> Self {
        Self {
            source,
            regex,
            compiled: OnceLock::new(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Match the whole pattern against a string, compiling it if needed
    pub fn is_match(&self, haystack: &str) -> ExpressionResult<bool> {
        let compiled = self.compiled.get_or_init(|| {
            log::trace!("compiling pattern {}", self.regex);
            Regex::new(&self.regex)
        });

        match compiled {
            Ok(regex) => Ok(regex.is_match(haystack)),
            Err(err) => Err(ExpressionError::InvalidRegexp {
                pattern: self.source.clone(),
                message: err.to_string(),
            }),
        }
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.regex == other.regex
    }
}

// Cursor - byte-offset scanner over raw filter input

use super::error::{ParseError, ParseResult};

/// Longest excerpt of remaining input quoted in error messages
const SNIPPET_LEN: usize = 20;

pub struct Cursor<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(input: &'a str) -> Self {
        Self::at(input, 0)
    }

    /// Create a cursor starting at a byte offset into `input`
    pub fn at(input: &'a str, position: usize) -> Self {
        Cursor {
            input,
            position: position.min(input.len()),
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_eof(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Remaining unparsed input
    pub fn rest(&self) -> &'a str {
        &self.input[self.position..]
    }

    /// Skip spaces and tabs; no other whitespace separates tokens
    pub fn skip_whitespace(&mut self) {
        let rest = self.rest();
        let trimmed = rest.trim_start_matches(|c: char| c == ' ' || c == '\t');
        self.position += rest.len() - trimmed.len();
    }

    /// Consume `s` if the input continues with it
    pub fn match_str(&mut self, s: &str) -> bool {
        self.skip_whitespace();
        if self.rest().starts_with(s) {
            self.position += s.len();
            true
        } else {
            false
        }
    }

    /// Consume a keyword if it appears at a word boundary.
    ///
    /// The keyword must be followed by a space, tab, parenthesis or the end
    /// of input, so `AND` never matches the start of `ANDroid`.
    pub fn match_keyword(&mut self, keyword: &str) -> bool {
        self.skip_whitespace();
        let rest = self.rest();
        if !rest.starts_with(keyword) {
            return false;
        }

        match rest[keyword.len()..].chars().next() {
            None | Some(' ') | Some('\t') | Some('(') | Some(')') => {
                self.position += keyword.len();
                true
            }
            Some(_) => false,
        }
    }

    /// Read a field name made of ASCII letters, digits and underscores
    pub fn read_identifier(&mut self) -> &'a str {
        self.skip_whitespace();
        self.take_while(|b| b.is_ascii_alphanumeric() || b == b'_')
    }

    /// Read a single-quoted string, returning its contents without quotes.
    ///
    /// There is no escape syntax; the first closing quote ends the string.
    pub fn read_quoted(&mut self) -> ParseResult<&'a str> {
        self.skip_whitespace();
        let start = self.position;
        let rest = self.rest();
        if !rest.starts_with('\'') {
            return Err(ParseError::ExpectedToken {
                expected: "quoted string",
                position: start,
                found: self.describe_next(),
            });
        }

        match rest[1..].find('\'') {
            Some(end) => {
                self.position += end + 2;
                Ok(&rest[1..end + 1])
            }
            None => Err(ParseError::UnterminatedString { position: start }),
        }
    }

    /// Read a greedy run of digits, dots and minus signs
    pub fn read_number(&mut self) -> &'a str {
        self.skip_whitespace();
        self.take_while(|b| b.is_ascii_digit() || b == b'.' || b == b'-')
    }

    /// Next byte without consuming it
    pub fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.position).copied()
    }

    /// Describe the upcoming input for error messages
    pub fn describe_next(&self) -> String {
        let rest = self.rest();
        if rest.is_empty() {
            return "end of input".to_string();
        }

        let snippet: String = rest.chars().take(SNIPPET_LEN).collect();
        if snippet.len() < rest.len() {
            format!("'{}...'", snippet)
        } else {
            format!("'{}'", snippet)
        }
    }

    fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> &'a str {
        let start = self.position;
        let len = self.input.as_bytes()[start..]
            .iter()
            .take_while(|b| pred(**b))
            .count();
        self.position += len;
        &self.input[start..self.position]
    }
}

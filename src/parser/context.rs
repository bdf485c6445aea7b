//! Context tokens for transverse queries.
//!
//! A token such as `ca.t` describes the letters already on the board around an
//! open cell along the perpendicular axis: `CA` before it, `T` after it. The
//! `.` marks the cell itself.

use std::fmt;
use std::str::FromStr;

use nom::character::complete::{alpha0, char};
use nom::combinator::all_consuming;
use nom::Parser;

use super::pattern::PResult;
use crate::errors::ParseError;
use crate::letters::{word_value, Letter};

/// Perpendicular neighbours of one open cell, stored uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ContextToken {
    before: String,
    after: String,
}

impl ContextToken {
    #[must_use]
    pub fn new(before: &str, after: &str) -> Self {
        ContextToken {
            before: before.to_ascii_uppercase(),
            after: after.to_ascii_uppercase(),
        }
    }

    #[must_use]
    pub fn before(&self) -> &str {
        &self.before
    }

    #[must_use]
    pub fn after(&self) -> &str {
        &self.after
    }

    /// A bare `.`: the cell has no perpendicular neighbours, so no crossword forms.
    #[must_use]
    pub fn is_bare(&self) -> bool {
        self.before.is_empty() && self.after.is_empty()
    }

    /// The perpendicular word formed when `letter` fills the cell.
    #[must_use]
    pub fn crossword_with(&self, letter: Letter) -> String {
        let mut word = String::with_capacity(self.before.len() + self.after.len() + 1);
        word.push_str(&self.before);
        word.push(letter.symbol());
        word.push_str(&self.after);
        word
    }

    /// Face value of the neighbouring letters.
    #[must_use]
    pub fn neighbour_value(&self) -> u32 {
        word_value(&self.before) + word_value(&self.after)
    }
}

impl fmt::Display for ContextToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.before, self.after)
    }
}

fn context_token(input: &'_ str) -> PResult<'_, (&'_ str, char, &'_ str)> {
    all_consuming((alpha0, char('.'), alpha0)).parse(input)
}

impl FromStr for ContextToken {
    type Err = Box<ParseError>;

    /// Parse `[a-zA-Z]*\.[a-zA-Z]*`.
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match context_token(token) {
            Ok((_, (before, _, after))) => Ok(ContextToken::new(before, after)),
            Err(_) => Err(Box::new(ParseError::InvalidContextToken { token: token.to_string() })),
        }
    }
}

/// Parse a list of context tokens, one per open cell in pattern order.
///
/// # Errors
///
/// Returns `ParseError::InvalidContextToken` for the first malformed token.
pub fn parse_context_tokens<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<ContextToken>, Box<ParseError>> {
    tokens.iter().map(|t| t.as_ref().parse()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_before_and_after() {
        let ctx: ContextToken = "as.da".parse().unwrap();
        assert_eq!(ctx.before(), "AS");
        assert_eq!(ctx.after(), "DA");
        assert_eq!(ctx.to_string(), "AS.DA");
    }

    #[test]
    fn test_parse_one_sided() {
        let ctx: ContextToken = "ca.".parse().unwrap();
        assert_eq!((ctx.before(), ctx.after()), ("CA", ""));
        let ctx: ContextToken = ".AT".parse().unwrap();
        assert_eq!((ctx.before(), ctx.after()), ("", "AT"));
    }

    #[test]
    fn test_bare_dot() {
        let ctx: ContextToken = ".".parse().unwrap();
        assert!(ctx.is_bare());
        assert_eq!(ctx.neighbour_value(), 0);
    }

    #[test]
    fn test_rejects_malformed_tokens() {
        for bad in ["cat", "c..t", "", "c.a.t", "ca.t!", "c a.t", "1.a"] {
            let err = bad.parse::<ContextToken>().unwrap_err();
            assert!(
                matches!(*err, ParseError::InvalidContextToken { ref token } if token == bad),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_crossword_with() {
        let ctx = ContextToken::new("ca", "t");
        assert_eq!(ctx.crossword_with(Letter::S), "CAST");
        assert_eq!(ctx.neighbour_value(), 5);
    }

    #[test]
    fn test_parse_context_tokens() {
        let tokens = parse_context_tokens(&["ca.t", "."]).unwrap();
        assert_eq!(tokens.len(), 2);
        assert!(tokens[1].is_bare());
        assert!(parse_context_tokens(&["ca.t", "nope"]).is_err());
    }
}

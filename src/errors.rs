//! Error types for parsing operations with error codes and helpful messages.
//!
//! # Error Codes
//!
//! Each error variant has a unique code (E001-E009) for documentation lookup:
//!
//! - E001: `InvalidPoolChar` (Character not allowed in a pool spec)
//! - E002: `DanglingCount` (Count with no letter after it)
//! - E003: `EmptyPool` (Empty pool spec)
//! - E004: `ParseIntError` (Tile count does not fit)
//! - E005: `InvalidPatternChar` (Character not allowed in a pattern)
//! - E006: `InvalidContextToken` (Malformed context token)
//! - E007: `ContextCountMismatch` (Context tokens do not line up with open cells)
//! - E008: `RegexError` (Prefilter regex failed to compile)
//! - E009: `NomError` (Low-level nom parser error)
//!
//! # Examples
//!
//! ```
//! use tilescan::errors::ParseError;
//! use tilescan::pool::LetterPool;
//!
//! match "2!a".parse::<LetterPool>() {
//!     Err(e) => {
//!         assert_eq!(e.code(), "E001");
//!         println!("{}", e.display_detailed());
//!     }
//!     Ok(_) => unreachable!(),
//! }
//! ```

use nom::error::{ErrorKind, ParseError as NomParseError};
use std::num::ParseIntError;

/// Custom error type for parsing operations
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid character '{invalid_char}' at position {position} in pool \"{spec}\"")]
    InvalidPoolChar { spec: String, position: usize, invalid_char: char },

    #[error("Count with no letter at the end of pool \"{spec}\"")]
    DanglingCount { spec: String },

    #[error("Empty pool string")]
    EmptyPool,

    #[error("int-parsing error: {0}")]
    ParseIntError(#[from] ParseIntError),

    #[error("Invalid character '{invalid_char}' at position {position} in pattern \"{pattern}\"")]
    InvalidPatternChar { pattern: String, position: usize, invalid_char: char },

    #[error("Invalid context token \"{token}\"")]
    InvalidContextToken { token: String },

    #[error("context count mismatch: pattern has {expected} open cell(s) but {found} context token(s) were given")]
    ContextCountMismatch { expected: usize, found: usize },

    #[error("Invalid regex pattern: {0}")]
    RegexError(#[from] fancy_regex::Error),

    // nom parser error (lowest level)
    #[error("nom parser error: {0:?}")]
    NomError(ErrorKind),
}

impl From<ParseIntError> for Box<ParseError> {
    fn from(pie: ParseIntError) -> Self {
        Box::new(ParseError::ParseIntError(pie))
    }
}

impl From<Box<fancy_regex::Error>> for Box<ParseError> {
    fn from(e: Box<fancy_regex::Error>) -> Self {
        Box::new(ParseError::RegexError(*e))
    }
}

impl<'a> NomParseError<&'a str> for Box<ParseError> {
    fn from_error_kind(_input: &'a str, kind: ErrorKind) -> Self {
        Box::new(ParseError::NomError(kind))
    }

    fn append(_input: &'a str, _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

impl ParseError {
    /// Returns the error code for this error variant
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            ParseError::InvalidPoolChar { .. } => "E001",
            ParseError::DanglingCount { .. } => "E002",
            ParseError::EmptyPool => "E003",
            ParseError::ParseIntError(_) => "E004",
            ParseError::InvalidPatternChar { .. } => "E005",
            ParseError::InvalidContextToken { .. } => "E006",
            ParseError::ContextCountMismatch { .. } => "E007",
            ParseError::RegexError(_) => "E008",
            ParseError::NomError(_) => "E009",
        }
    }

    /// Returns a short description of this error type (for documentation)
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            ParseError::InvalidPoolChar { .. } => "Character not allowed in a pool spec",
            ParseError::DanglingCount { .. } => "Count with no letter after it",
            ParseError::EmptyPool => "Empty pool spec",
            ParseError::ParseIntError(_) => "Tile count does not fit",
            ParseError::InvalidPatternChar { .. } => "Character not allowed in a pattern",
            ParseError::InvalidContextToken { .. } => "Malformed context token",
            ParseError::ContextCountMismatch { .. } => "Context tokens do not line up with open cells",
            ParseError::RegexError(_) => "Prefilter regex failed to compile",
            ParseError::NomError(_) => "Low-level nom parser error",
        }
    }

    /// Returns detailed explanation of this error type (for documentation)
    #[must_use]
    pub fn details(&self) -> &'static str {
        match self {
            ParseError::InvalidPoolChar { .. } => "A pool spec is a run of tokens, each an optional decimal count followed by one letter or '*'. Any other character is rejected.",
            ParseError::DanglingCount { .. } => "The pool spec ends with a number that is not followed by a letter, so it is unclear which tile the count belongs to.",
            ParseError::EmptyPool => "At least one tile is needed to form any word.",
            ParseError::ParseIntError(_) => "A tile count in the pool spec could not be read as a 32-bit unsigned integer.",
            ParseError::InvalidPatternChar { .. } => "Patterns may contain '.', '#', '!', letters, and a '/' at either end. Any other character, or a '/' in the middle, is rejected.",
            ParseError::InvalidContextToken { .. } => "A context token is the letters before the cell, one '.', then the letters after it. Either side may be empty.",
            ParseError::ContextCountMismatch { .. } => "Transverse queries take exactly one context token per open cell ('.', '#' or '!'), in pattern order.",
            ParseError::RegexError(_) => "The regex rendered from a compiled pattern was rejected by the regex engine. This is an internal error.",
            ParseError::NomError(_) => "The parser combinators failed without a more specific error. This is an internal error.",
        }
    }

    /// Returns a helpful suggestion or example for this error
    #[must_use]
    pub fn help(&self) -> Option<&'static str> {
        match self {
            ParseError::InvalidPoolChar { .. } => Some("Example: '2a1b3c*' is two A, one B, three C and a blank"),
            ParseError::DanglingCount { .. } => Some("Put the letter after its count, e.g. '3e' rather than 'e3'"),
            ParseError::EmptyPool => Some("Example: 'aeinrst' or '2e*'"),
            ParseError::InvalidPatternChar { .. } => Some("Use '.' for an open cell, '#' for double letter, '!' for triple letter, uppercase for board letters and lowercase for tiles you must play"),
            ParseError::InvalidContextToken { .. } => Some("Example: 'ca.t' means C and A above the cell and T below it"),
            ParseError::ContextCountMismatch { .. } => Some("Pass one context token per open cell; use '.' for a cell with no neighbours"),
            _ => None,
        }
    }

    /// Formats the error with code and optional help text
    #[must_use]
    pub fn display_detailed(&self) -> String {
        format_error_with_code_and_help(&self.to_string(), self.code(), self.help())
    }
}

/// Helper function to format error messages with code and optional help text
pub(crate) fn format_error_with_code_and_help(base_msg: &str, code: &str, help: Option<&str>) -> String {
    if let Some(help_text) = help {
        format!("{base_msg} ({code})\n{help_text}")
    } else {
        format!("{base_msg} ({code})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_errors() -> Vec<ParseError> {
        vec![
            ParseError::InvalidPoolChar { spec: "2!a".to_string(), position: 1, invalid_char: '!' },
            ParseError::DanglingCount { spec: "a3".to_string() },
            ParseError::EmptyPool,
            ParseError::ParseIntError("x".parse::<u32>().unwrap_err()),
            ParseError::InvalidPatternChar { pattern: "|.A".to_string(), position: 0, invalid_char: '|' },
            ParseError::InvalidContextToken { token: "cat".to_string() },
            ParseError::ContextCountMismatch { expected: 2, found: 1 },
            ParseError::NomError(ErrorKind::Char),
        ]
    }

    #[test]
    fn test_error_codes_and_help() {
        let err = ParseError::EmptyPool;
        assert_eq!(err.code(), "E003");
        assert!(err.help().is_some());
        let detailed = err.display_detailed();
        assert!(detailed.contains("E003"));
        assert!(detailed.contains("Example"));
    }

    /// Test that all `ParseError` variants have unique error codes
    #[test]
    fn test_all_error_codes_are_unique() {
        let mut codes = std::collections::HashSet::new();
        for err in sample_errors() {
            let code = err.code();
            assert!(code.starts_with("E0"), "Error code '{}' should start with 'E0'", code);
            assert_eq!(code.len(), 4);
            assert!(codes.insert(code), "Duplicate error code found: {}", code);
        }
        assert_eq!(codes.len(), 8);
    }

    #[test]
    fn test_help_text_adds_information() {
        for err in sample_errors() {
            if let Some(help_text) = err.help() {
                assert!(help_text.len() > 10, "Help text for {:?} should be substantial", err);
                assert_ne!(help_text, err.to_string());
            }
            assert!(!err.description().is_empty());
            assert!(!err.details().is_empty());
        }
    }

    #[test]
    fn test_messages_include_offending_input() {
        let err = ParseError::InvalidPoolChar { spec: "2!a".to_string(), position: 1, invalid_char: '!' };
        let msg = err.to_string();
        assert!(msg.contains('!'));
        assert!(msg.contains("position 1"));
        assert!(msg.contains("2!a"));

        let err = ParseError::ContextCountMismatch { expected: 3, found: 1 };
        let detailed = err.display_detailed();
        assert!(detailed.contains("context count mismatch"));
        assert!(detailed.contains('3') && detailed.contains('1'));
        assert!(detailed.contains("E007"));
    }
}

//! Generate error code documentation from the error enums themselves.
//!
//! Codes, descriptions, details and help text are read straight from the
//! `code()`, `description()`, `details()` and `help()` methods of
//! `ParseError`, `QueryError` and `LexiconError`.
//!
//! Run with:
//! ```bash
//! cargo run --bin generate_error_docs > docs/ERROR_CODES.md
//! ```

use tilescan::errors::ParseError;
use tilescan::lexicon::LexiconError;
use tilescan::query::QueryError;

/// Macro to generate error documentation for any error type
/// with `code()`, `description()`, `details()`, `help()`, and `display_detailed()` methods
macro_rules! generate_error_docs {
    ($errors:expr) => {
        for error in $errors {
            println!("### {}: {}\n", error.code(), error.description());
            println!("**Details:** {}\n", error.details());

            if let Some(help_text) = error.help() {
                println!("**How to fix:**");
                println!("```");
                println!("{help_text}");
                println!("```\n");
            }

            println!("**Example error message:**");
            println!("```");
            println!("{error}");
            println!("```\n");

            println!("**Detailed format:**");
            println!("```");
            println!("{}", error.display_detailed());
            println!("```\n");

            println!("---\n");
        }
    };
}

/// One sample of every `ParseError` variant, in code order.
fn all_parse_error_variants() -> Vec<ParseError> {
    let mut errors = vec![
        ParseError::InvalidPoolChar { spec: "2!a".to_string(), position: 1, invalid_char: '!' },
        ParseError::DanglingCount { spec: "ab3".to_string() },
        ParseError::EmptyPool,
    ];
    if let Err(e) = "99999999999".parse::<u32>() {
        errors.push(ParseError::ParseIntError(e));
    }
    errors.extend([
        ParseError::InvalidPatternChar { pattern: "..?".to_string(), position: 2, invalid_char: '?' },
        ParseError::InvalidContextToken { token: "cat".to_string() },
        ParseError::ContextCountMismatch { expected: 2, found: 1 },
    ]);
    if let Err(e) = fancy_regex::Regex::new("[AB") {
        errors.push(ParseError::RegexError(e));
    }
    errors.push(ParseError::NomError(nom::error::ErrorKind::Digit));
    errors
}

/// One sample of every `QueryError` variant, in code order.
fn all_query_error_variants() -> Vec<QueryError> {
    vec![
        QueryError::ParseFailure(Box::new(ParseError::EmptyPool)),
        QueryError::Shortfall { missing: 2, wildcards: 1 },
        QueryError::NoValidCrossword { position: 0, context: "Q.Q".to_string() },
    ]
}

/// One sample of every `LexiconError` variant, in code order.
fn all_lexicon_error_variants() -> Vec<LexiconError> {
    let mut errors = vec![
        LexiconError::Io {
            path: "words.txt".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "No such file or directory"),
        },
        LexiconError::InvalidWord { line: 3, word: "don't".to_string() },
        LexiconError::VersionMismatch { expected: 1, found: 2 },
        LexiconError::ChecksumMismatch { recorded: "0f3a".to_string(), computed: "9b2c".to_string() },
    ];
    if let Err(e) = serde_json::from_str::<serde_json::Value>("{\"version\": 1,") {
        errors.push(LexiconError::Json(e));
    }
    errors.push(LexiconError::AlreadyExists { path: "words.json".to_string() });
    errors
}

fn main() {
    println!("# Error Code Reference\n");
    println!("**⚠️ This document is auto-generated from the source code. Do not edit manually.**\n");

    println!("## Table of Contents\n");
    println!("- [Query Errors (Q001–Q003)](#query-errors)");
    println!("- [Parse Errors (E001–E009)](#parse-errors)");
    println!("- [Lexicon Errors (L001–L006)](#lexicon-errors)");
    println!("- [How to Use Error Codes](#how-to-use-error-codes)\n");

    println!("## Query Errors\n");
    println!("Top-level errors from building or running a query. Q001 wraps a parse error; Q002 and Q003 mean no word can match.\n");
    generate_error_docs!(all_query_error_variants());

    println!("## Parse Errors\n");
    println!("Errors that occur when parsing pool specs, patterns or context tokens.\n");
    generate_error_docs!(all_parse_error_variants());

    println!("## Lexicon Errors\n");
    println!("Errors that occur when loading, converting or saving word lists.\n");
    generate_error_docs!(all_lexicon_error_variants());

    println!("\n## How to Use Error Codes\n");
    println!("When you see an error like:\n");
    println!("```");
    println!("Error: Empty pool string (E003)");
    println!("Example: 'aeinrst' or '2e*'");
    println!("```\n");
    println!("1. Note the error code (e.g., `E003`)");
    println!("2. Look it up in this document for detailed explanation");
    println!("3. Follow the suggested resolution steps\n");

    println!("## Error Display Formats\n");
    println!("### Simple Format");
    println!("```");
    println!("Error: <message>");
    println!("```\n");
    println!("### Detailed Format (via `display_detailed()`)");
    println!("```");
    println!("<message> (<code>)");
    println!("<help text if available>");
    println!("```\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_codes(codes: Vec<&'static str>, prefix: char, count: usize) {
        let expected: Vec<String> = (1..=count).map(|n| format!("{prefix}{n:03}")).collect();
        assert_eq!(codes, expected);
    }

    #[test]
    fn test_every_parse_error_code_is_documented_once() {
        assert_codes(all_parse_error_variants().iter().map(ParseError::code).collect(), 'E', 9);
    }

    #[test]
    fn test_every_query_error_code_is_documented_once() {
        assert_codes(all_query_error_variants().iter().map(QueryError::code).collect(), 'Q', 3);
    }

    #[test]
    fn test_every_lexicon_error_code_is_documented_once() {
        assert_codes(all_lexicon_error_variants().iter().map(LexiconError::code).collect(), 'L', 6);
    }
}

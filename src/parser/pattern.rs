use crate::errors::ParseError;
use crate::letters::Letter;
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::satisfy,
    combinator::{map, map_opt, opt},
    IResult,
    Parser,
};
use std::fmt;
use std::str::FromStr;

/// Parser result type: input, output, with our custom `ParseError`
pub type PResult<'a, O> = IResult<&'a str, O, Box<ParseError>>;

/// Represents a single parsed cell of a pattern string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternPart {
    Open(u32),       // '.', '#', '!': open cell scored x1, x2, x3
    Board(Letter),   // 'A': letter already on the board
    Drawn(Letter),   // 'a': letter that must be played from the pool
}

impl PatternPart {
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self, PatternPart::Open(_))
    }

    fn symbol(&self) -> char {
        match self {
            PatternPart::Open(2) => '#',
            PatternPart::Open(3) => '!',
            PatternPart::Open(_) => '.',
            PatternPart::Board(letter) => letter.symbol(),
            PatternPart::Drawn(letter) => letter.symbol().to_ascii_lowercase(),
        }
    }
}

/// The cells of a pattern plus its `/` anchors.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedPattern {
    pub parts: Vec<PatternPart>,
    /// Leading `/`: the word must start at the first cell.
    pub anchored_start: bool,
    /// Trailing `/`: the word must end at the last cell.
    pub anchored_end: bool,
}

impl ParsedPattern {
    /// Number of cells (anchors excluded).
    #[must_use]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// A pattern with no cells asks for whole words built from the pool alone.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    #[must_use]
    pub fn open_count(&self) -> usize {
        self.parts.iter().filter(|part| part.is_open()).count()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PatternPart> {
        self.parts.iter()
    }
}

impl<'a> IntoIterator for &'a ParsedPattern {
    type Item = &'a PatternPart;
    type IntoIter = std::slice::Iter<'a, PatternPart>;
    fn into_iter(self) -> Self::IntoIter { self.iter() }
}

impl fmt::Display for ParsedPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.anchored_start {
            write!(f, "/")?;
        }
        for part in self {
            write!(f, "{}", part.symbol())?;
        }
        if self.anchored_end {
            write!(f, "/")?;
        }
        Ok(())
    }
}

impl FromStr for ParsedPattern {
    type Err = Box<ParseError>;

    /// Parse a pattern string (`(/)?([.#!A-Za-z])*(/)?`).
    ///
    /// The empty string is valid and yields a pattern with no cells.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (mut rest, start) = anchor(raw).map_err(|_| invalid_char(raw, raw))?;
        let mut pattern = ParsedPattern { anchored_start: start.is_some(), ..Default::default() };

        while !rest.is_empty() {
            // a '/' is only an anchor as the very last character
            if rest == "/" {
                pattern.anchored_end = true;
                break;
            }
            match pattern_part(rest) {
                Ok((next, part)) => {
                    pattern.parts.push(part);
                    rest = next;
                }
                Err(nom::Err::Failure(e)) => return Err(e),
                Err(_) => return Err(invalid_char(raw, rest)),
            }
        }

        Ok(pattern)
    }
}

fn invalid_char(raw: &str, rest: &str) -> Box<ParseError> {
    Box::new(ParseError::InvalidPatternChar {
        pattern: raw.to_string(),
        position: raw.len() - rest.len(),
        invalid_char: rest.chars().next().unwrap_or('?'),
    })
}

// === Token parsers ===

fn anchor(input: &'_ str) -> PResult<'_, Option<&'_ str>> {
    opt(tag("/")).parse(input)
}
fn single(input: &'_ str) -> PResult<'_, PatternPart> { parser_one_char_inner(input, ".", PatternPart::Open(1)) }
fn double(input: &'_ str) -> PResult<'_, PatternPart> { parser_one_char_inner(input, "#", PatternPart::Open(2)) }
fn triple(input: &'_ str) -> PResult<'_, PatternPart> { parser_one_char_inner(input, "!", PatternPart::Open(3)) }

// single-char tokens share the same shape
fn parser_one_char_inner<'a>(
    input: &'a str,
    tag_str: &'static str,
    pattern_part: PatternPart,
) -> PResult<'a, PatternPart> {
    map(tag(tag_str), move |_| pattern_part).parse(input)
}

fn board_letter(input: &'_ str) -> PResult<'_, PatternPart> {
    map(
        map_opt(satisfy(|c| c.is_ascii_uppercase()), Letter::from_char),
        PatternPart::Board,
    )
    .parse(input)
}

fn drawn_letter(input: &'_ str) -> PResult<'_, PatternPart> {
    map(
        map_opt(satisfy(|c| c.is_ascii_lowercase()), Letter::from_char),
        PatternPart::Drawn,
    )
    .parse(input)
}

fn pattern_part(input: &'_ str) -> PResult<'_, PatternPart> {
    alt((single, double, triple, board_letter, drawn_letter)).parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> ParsedPattern {
        s.parse::<ParsedPattern>().unwrap()
    }

    #[test]
    fn test_parse_open_cells() {
        assert_eq!(
            parse(".#!").parts,
            vec![PatternPart::Open(1), PatternPart::Open(2), PatternPart::Open(3)]
        );
    }

    #[test]
    fn test_parse_board_and_drawn_letters() {
        assert_eq!(
            parse("Ab").parts,
            vec![PatternPart::Board(Letter::A), PatternPart::Drawn(Letter::B)]
        );
    }

    #[test]
    fn test_parse_anchors() {
        let p = parse("/..A/");
        assert!(p.anchored_start);
        assert!(p.anchored_end);
        assert_eq!(p.len(), 3);

        let p = parse("/AB");
        assert!(p.anchored_start && !p.anchored_end);

        let p = parse("AB/");
        assert!(!p.anchored_start && p.anchored_end);
    }

    #[test]
    fn test_parse_empty_pattern() {
        let p = parse("");
        assert!(p.is_empty());
        assert!(!p.anchored_start && !p.anchored_end);

        let p = parse("//");
        assert!(p.is_empty());
        assert!(p.anchored_start && p.anchored_end);

        assert!(parse("/").anchored_start);
    }

    #[test]
    fn test_open_count() {
        assert_eq!(parse("..A..#!s./").open_count(), 7);
        assert_eq!(parse("ABc").open_count(), 0);
    }

    #[test]
    fn test_parse_rejects_bar_anchor() {
        let err = "|..A".parse::<ParsedPattern>().unwrap_err();
        assert!(matches!(*err, ParseError::InvalidPatternChar { position: 0, invalid_char: '|', .. }));
    }

    #[test]
    fn test_parse_rejects_inner_slash() {
        let err = "A/B".parse::<ParsedPattern>().unwrap_err();
        assert!(matches!(*err, ParseError::InvalidPatternChar { position: 1, invalid_char: '/', .. }));
        assert!("A//".parse::<ParsedPattern>().is_err());
    }

    #[test]
    fn test_parse_rejects_other_chars() {
        for bad in ["a*b", "A B", "a1", "é", "@", ".\t."] {
            assert!(bad.parse::<ParsedPattern>().is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_display_round_trips() {
        for s in ["/..A..#!s./", "", "ab", "//", "/x"] {
            assert_eq!(parse(s).to_string(), s);
        }
    }
}

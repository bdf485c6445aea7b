//! `pool`: the multiset of tiles a player can draw on.
//!
//! A [`LetterPool`] is parsed from a compact spec string such as `"2a1b3c*"`
//! (two A, one B, three C, one wildcard). Counts are never negative.
//!
//! While a pattern is compiled, lowercase (drawn) letters are taken out of a
//! crate-private [`WorkingPool`] whose counts may dip below zero. The shortfall
//! must then be covered by wildcards before the pool is handed to the scanner;
//! see [`WorkingPool::reconcile`].

use std::fmt;
use std::str::FromStr;

use nom::character::complete::{digit1, satisfy};
use nom::combinator::{map_opt, opt};
use nom::sequence::pair;
use nom::{IResult, Parser};
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::errors::ParseError;
use crate::letters::{Letter, LetterSet, LETTER_COUNT};

/// Parser result type: input, output, with our custom `ParseError`
type PResult<'a, O> = IResult<&'a str, O, Box<ParseError>>;

/// Counts of each tile available to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct LetterPool {
    counts: [u32; LETTER_COUNT],
}

impl LetterPool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a pool from `(letter, count)` pairs; repeated letters add up.
    pub fn from_counts<I: IntoIterator<Item = (Letter, u32)>>(counts: I) -> Self {
        let mut pool = Self::new();
        for (letter, count) in counts {
            pool.add(letter, count);
        }
        pool
    }

    #[must_use]
    pub fn get(&self, letter: Letter) -> u32 {
        self.counts[letter.index()]
    }

    pub fn add(&mut self, letter: Letter, count: u32) {
        let slot = &mut self.counts[letter.index()];
        *slot = slot.saturating_add(count);
    }

    /// Use up one `letter` tile. Returns `false` (and changes nothing) if none is left.
    pub fn take(&mut self, letter: Letter) -> bool {
        let slot = &mut self.counts[letter.index()];
        if *slot == 0 {
            false
        } else {
            *slot -= 1;
            true
        }
    }

    #[must_use]
    pub fn wildcards(&self) -> u32 {
        self.get(Letter::Wild)
    }

    /// Total number of tiles, wildcards included.
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().map(|&c| c as usize).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Tiles with a non-zero count, in catalog order (wildcard last).
    pub fn iter(&self) -> impl Iterator<Item = (Letter, u32)> + '_ {
        Letter::ALL
            .iter()
            .map(|&letter| (letter, self.get(letter)))
            .filter(|&(_, count)| count > 0)
    }

    /// Letters an open cell may take: everything if a wildcard is present,
    /// otherwise exactly the real letters in the pool.
    #[must_use]
    pub fn candidate_class(&self) -> LetterSet {
        if self.wildcards() > 0 {
            LetterSet::alphabet()
        } else {
            self.iter().map(|(letter, _)| letter).collect()
        }
    }

    /// Draw `n` tiles at random from a full standard bag, without replacement.
    ///
    /// Each tile is as likely as any other, so letters turn up in proportion
    /// to their [`Letter::supply`]. Asking for more tiles than the bag holds
    /// empties the bag.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, n: usize) -> Self {
        let bag: Vec<Letter> = Letter::ALL
            .iter()
            .flat_map(|&letter| std::iter::repeat_n(letter, letter.supply() as usize))
            .collect();

        let mut pool = Self::new();
        for &letter in bag.choose_multiple(rng, n.min(bag.len())) {
            pool.add(letter, 1);
        }
        pool
    }

    /// Tiles requested beyond what a standard bag holds, with the excess.
    #[must_use]
    pub fn exceeds_standard_bag(&self) -> Vec<(Letter, u32)> {
        self.iter()
            .filter(|&(letter, count)| count > letter.supply())
            .map(|(letter, count)| (letter, count - letter.supply()))
            .collect()
    }
}

impl fmt::Display for LetterPool {
    /// Canonical spec form, e.g. `2AB3C*`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (letter, count) in self.iter() {
            if count > 1 {
                write!(f, "{count}")?;
            }
            write!(f, "{letter}")?;
        }
        Ok(())
    }
}

// one pool token: optional count, then a letter or '*'
fn pool_token(input: &'_ str) -> PResult<'_, (Option<&'_ str>, Letter)> {
    pair(
        opt(digit1),
        map_opt(satisfy(|c| c == '*' || c.is_ascii_alphabetic()), Letter::from_char),
    )
    .parse(input)
}

impl FromStr for LetterPool {
    type Err = Box<ParseError>;

    /// Parse a pool spec string (`((\d+)?[A-Za-z*])+`).
    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        if spec.is_empty() {
            return Err(Box::new(ParseError::EmptyPool));
        }

        let mut pool = LetterPool::new();
        let mut rest = spec;

        while !rest.is_empty() {
            match pool_token(rest) {
                Ok((next, (digits, letter))) => {
                    let count = match digits {
                        Some(digits) => digits.parse::<u32>()?,
                        None => 1,
                    };
                    pool.add(letter, count);
                    rest = next;
                }
                Err(nom::Err::Failure(e)) => return Err(e),
                Err(_) => {
                    let after_digits = rest.trim_start_matches(|c: char| c.is_ascii_digit());
                    return Err(Box::new(match after_digits.chars().next() {
                        None => ParseError::DanglingCount { spec: spec.to_string() },
                        Some(invalid_char) => ParseError::InvalidPoolChar {
                            spec: spec.to_string(),
                            position: spec.len() - after_digits.len(),
                            invalid_char,
                        },
                    }));
                }
            }
        }

        Ok(pool)
    }
}

/// The pool could not cover the letters a pattern forces the player to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortfall {
    /// Drawn letters missing from the pool.
    pub missing: u32,
    /// Wildcards that were available to stand in for them.
    pub wildcards: u32,
}

/// Signed working copy of a pool, only used while compiling a pattern.
#[derive(Debug, Clone)]
pub(crate) struct WorkingPool {
    counts: [i64; LETTER_COUNT],
}

impl WorkingPool {
    /// Commit one `letter` tile to a fixed cell; may go negative.
    pub(crate) fn draw(&mut self, letter: Letter) {
        self.counts[letter.index()] -= 1;
    }

    /// Letters requested beyond supply.
    pub(crate) fn shortfall(&self) -> u32 {
        let missing: i64 = self.counts.iter().filter(|&&c| c < 0).map(|&c| -c).sum();
        u32::try_from(missing).unwrap_or(u32::MAX)
    }

    /// Cover every negative count with a wildcard, yielding a pool with no
    /// negative counts, or report that there are not enough wildcards.
    pub(crate) fn reconcile(mut self) -> Result<LetterPool, Shortfall> {
        let missing = self.shortfall();
        let wild = &mut self.counts[Letter::Wild.index()];
        let wildcards = u32::try_from(*wild).unwrap_or(0);
        if missing > wildcards {
            return Err(Shortfall { missing, wildcards });
        }
        *wild -= i64::from(missing);

        let mut pool = LetterPool::new();
        for letter in Letter::ALL {
            let count = self.counts[letter.index()].max(0);
            pool.add(letter, u32::try_from(count).unwrap_or(u32::MAX));
        }
        Ok(pool)
    }
}

impl From<&LetterPool> for WorkingPool {
    fn from(pool: &LetterPool) -> Self {
        let mut counts = [0i64; LETTER_COUNT];
        for (slot, &count) in counts.iter_mut().zip(pool.counts.iter()) {
            *slot = i64::from(count);
        }
        WorkingPool { counts }
    }
}

//! The fixed letter catalog: 26 letters plus the wildcard tile.
//!
//! Point values and bag supply counts are static tables indexed by the
//! letter's discriminant. Nothing here is ever mutated.

use std::fmt;
use std::ops::RangeInclusive;

// Character-set constants
pub(crate) const ALPHABET_SIZE: usize = 26;
/// Number of distinct tiles (26 letters + wildcard).
pub const LETTER_COUNT: usize = ALPHABET_SIZE + 1;
pub(crate) const UPPERCASE_ALPHABET: RangeInclusive<char> = 'A'..='Z';
pub(crate) const WILD_CHAR: char = '*';

const LETTER_VALUES: [u32; LETTER_COUNT] = [
    1, 3, 3, 2, 1, 4, 2, 4, 1, 8, 5, 1, 3, // A-M
    1, 1, 3, 10, 1, 1, 1, 1, 4, 4, 8, 4, 10, // N-Z
    0, // *
];

const LETTER_SUPPLY: [u32; LETTER_COUNT] = [
    9, 2, 2, 4, 12, 2, 3, 2, 9, 1, 1, 4, 2, // A-M
    6, 8, 2, 1, 6, 4, 6, 4, 2, 2, 1, 2, 1, // N-Z
    2, // *
];

/// A single tile face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Letter {
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,
    Wild,
}

impl Letter {
    /// Every tile, wildcard last.
    pub const ALL: [Letter; LETTER_COUNT] = [
        Letter::A, Letter::B, Letter::C, Letter::D, Letter::E, Letter::F, Letter::G,
        Letter::H, Letter::I, Letter::J, Letter::K, Letter::L, Letter::M, Letter::N,
        Letter::O, Letter::P, Letter::Q, Letter::R, Letter::S, Letter::T, Letter::U,
        Letter::V, Letter::W, Letter::X, Letter::Y, Letter::Z, Letter::Wild,
    ];

    /// Parse one tile symbol. Letters are case-insensitive; `*` is the wildcard.
    #[must_use]
    pub fn from_char(c: char) -> Option<Letter> {
        if c == WILD_CHAR {
            Some(Letter::Wild)
        } else if c.is_ascii_alphabetic() {
            Some(Letter::ALL[(c.to_ascii_uppercase() as u8 - b'A') as usize])
        } else {
            None
        }
    }

    /// Like [`Letter::from_char`] but only accepts uppercase `A`-`Z` (lexicon alphabet).
    #[must_use]
    pub fn from_word_byte(b: u8) -> Option<Letter> {
        if UPPERCASE_ALPHABET.contains(&char::from(b)) {
            Some(Letter::ALL[(b - b'A') as usize])
        } else {
            None
        }
    }

    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            Letter::Wild => WILD_CHAR,
            letter => (b'A' + letter as u8) as char,
        }
    }

    /// Point value of the tile. Wildcards are always worth 0.
    #[must_use]
    pub fn value(self) -> u32 {
        LETTER_VALUES[self.index()]
    }

    /// How many of this tile a standard bag holds.
    #[must_use]
    pub fn supply(self) -> u32 {
        LETTER_SUPPLY[self.index()]
    }

    #[must_use]
    pub fn is_wild(self) -> bool {
        self == Letter::Wild
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Sum of the face values of an uppercase word. Non-letters count as 0.
#[must_use]
pub fn word_value(word: &str) -> u32 {
    word.bytes()
        .filter_map(Letter::from_word_byte)
        .map(Letter::value)
        .sum()
}

/// A set of the 26 real letters, used as a per-cell character class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct LetterSet(u32);

impl LetterSet {
    const FULL_MASK: u32 = (1 << ALPHABET_SIZE) - 1;

    #[must_use]
    pub const fn empty() -> Self {
        LetterSet(0)
    }

    #[must_use]
    pub const fn alphabet() -> Self {
        LetterSet(Self::FULL_MASK)
    }

    pub fn insert(&mut self, letter: Letter) {
        if !letter.is_wild() {
            self.0 |= 1 << letter.index();
        }
    }

    #[must_use]
    pub fn contains(self, letter: Letter) -> bool {
        !letter.is_wild() && self.0 & (1 << letter.index()) != 0
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub fn is_alphabet(self) -> bool {
        self.0 == Self::FULL_MASK
    }

    #[must_use]
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Members in alphabetical order.
    pub fn iter(self) -> impl Iterator<Item = Letter> {
        Letter::ALL[..ALPHABET_SIZE]
            .iter()
            .copied()
            .filter(move |&letter| self.contains(letter))
    }

    /// Keep only the members for which `keep` returns true.
    #[must_use]
    pub fn retain(self, mut keep: impl FnMut(Letter) -> bool) -> Self {
        self.iter().filter(|&letter| keep(letter)).collect()
    }
}

impl FromIterator<Letter> for LetterSet {
    fn from_iter<I: IntoIterator<Item = Letter>>(iter: I) -> Self {
        let mut set = LetterSet::empty();
        for letter in iter {
            set.insert(letter);
        }
        set
    }
}

impl fmt::Display for LetterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for letter in self.iter() {
            write!(f, "{letter}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_values() {
        assert_eq!(Letter::A.value(), 1);
        assert_eq!(Letter::D.value(), 2);
        assert_eq!(Letter::K.value(), 5);
        assert_eq!(Letter::J.value(), 8);
        assert_eq!(Letter::X.value(), 8);
        assert_eq!(Letter::Q.value(), 10);
        assert_eq!(Letter::Z.value(), 10);
        assert_eq!(Letter::Wild.value(), 0);
    }

    #[test]
    fn test_total_bag_supply() {
        let total: u32 = Letter::ALL.iter().map(|l| l.supply()).sum();
        assert_eq!(total, 100);
        assert_eq!(Letter::E.supply(), 12);
        assert_eq!(Letter::Wild.supply(), 2);
    }

    #[test]
    fn test_from_char_is_case_insensitive() {
        assert_eq!(Letter::from_char('a'), Some(Letter::A));
        assert_eq!(Letter::from_char('A'), Some(Letter::A));
        assert_eq!(Letter::from_char('z'), Some(Letter::Z));
        assert_eq!(Letter::from_char('*'), Some(Letter::Wild));
        assert_eq!(Letter::from_char('!'), None);
        assert_eq!(Letter::from_char('1'), None);
        assert_eq!(Letter::from_char('é'), None);
    }

    #[test]
    fn test_from_word_byte_only_uppercase() {
        assert_eq!(Letter::from_word_byte(b'Q'), Some(Letter::Q));
        assert_eq!(Letter::from_word_byte(b'q'), None);
        assert_eq!(Letter::from_word_byte(b'*'), None);
        assert_eq!(Letter::from_word_byte(b'@'), None);
        assert_eq!(Letter::from_word_byte(b'['), None);
        assert_eq!(Letter::from_word_byte(0xC9), None);
    }

    #[test]
    fn test_symbols_match_alphabet() {
        for (letter, c) in Letter::ALL.iter().zip(UPPERCASE_ALPHABET) {
            assert_eq!(letter.symbol(), c);
            assert_eq!(Letter::from_char(c), Some(*letter));
        }
        assert_eq!(Letter::Wild.to_string(), "*");
    }

    #[test]
    fn test_word_value() {
        assert_eq!(word_value("CAT"), 5);
        assert_eq!(word_value("QUIZ"), 22);
        assert_eq!(word_value(""), 0);
    }

    #[test]
    fn test_letter_set_basics() {
        let mut set = LetterSet::empty();
        assert!(set.is_empty());
        set.insert(Letter::C);
        set.insert(Letter::A);
        set.insert(Letter::Wild);
        assert_eq!(set.len(), 2);
        assert!(set.contains(Letter::A));
        assert!(!set.contains(Letter::B));
        assert!(!set.contains(Letter::Wild));
        assert_eq!(set.to_string(), "AC");
    }

    #[test]
    fn test_letter_set_alphabet() {
        let all = LetterSet::alphabet();
        assert!(all.is_alphabet());
        assert_eq!(all.len(), ALPHABET_SIZE);
        assert_eq!(all.iter().count(), 26);
        let vowels = all.retain(|l| "AEIOU".contains(l.symbol()));
        assert_eq!(vowels.to_string(), "AEIOU");
    }
}

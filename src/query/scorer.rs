//! Tile feasibility and scoring for matched windows and whole words.
//!
//! Open cells are filled greedily, highest multiplier first: a real tile if
//! one is left, otherwise a wildcard. Since a wildcard is worth 0 wherever it
//! goes, handing real tiles to the biggest multipliers first can only raise
//! the total, so the greedy order gives the best score.

use std::cmp::Reverse;

use crate::letters::{Letter, LETTER_COUNT};
use crate::pool::LetterPool;

use super::compile::{CompiledPattern, Slot};
use super::SecondaryMatch;

/// Score of one feasible window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Scored {
    pub(crate) score: u32,
    /// Crosswords in cell order.
    pub(crate) secondaries: Vec<SecondaryMatch>,
}

/// Take a real `letter` tile, else a wildcard. `None` when both are gone.
fn take_tile(pool: &mut LetterPool, letter: Letter) -> Option<Letter> {
    if pool.take(letter) {
        Some(letter)
    } else if pool.take(Letter::Wild) {
        Some(Letter::Wild)
    } else {
        None
    }
}

/// Check that the pool can fill the open cells of the window at `start` and
/// score it. `None` means the window is infeasible.
pub(crate) fn score_window(compiled: &CompiledPattern, word: &str, start: usize) -> Option<Scored> {
    let window = word.as_bytes().get(start..start + compiled.len())?;

    // quick rejection on tile count alone
    if window.len() - compiled.fixed_count > compiled.pool.total() {
        return None;
    }

    let mut cells: Vec<(u32, usize, Letter)> = Vec::with_capacity(compiled.open_count());
    for (position, (slot, &b)) in compiled.slots.iter().zip(window).enumerate() {
        if let Slot::Open { multiplier, .. } = slot {
            cells.push((*multiplier, position, Letter::from_word_byte(b)?));
        }
    }

    // multiplier first; position breaks ties so results are reproducible
    cells.sort_unstable_by_key(|&(multiplier, position, _)| Reverse((multiplier, position)));

    let mut pool = compiled.pool;
    let mut score = compiled.fixed_value;
    let mut secondaries = Vec::new();

    for (multiplier, position, letter) in cells {
        let tile = take_tile(&mut pool, letter)?;
        score += tile.value() * multiplier;

        if let Slot::Open { context: Some(ctx), .. } = &compiled.slots[position] {
            secondaries.push((
                position,
                SecondaryMatch {
                    crossword: ctx.crossword_with(letter),
                    score: tile.value() + ctx.neighbour_value(),
                },
            ));
        }
    }

    secondaries.sort_unstable_by_key(|(position, _)| *position);

    Some(Scored {
        score,
        secondaries: secondaries.into_iter().map(|(_, secondary)| secondary).collect(),
    })
}

/// Score `word` built from the pool alone (no pattern cells).
///
/// Wildcards go to the cheapest letters: required letters are served in
/// descending value order, alphabetical among equals.
pub(crate) fn score_whole_word(pool: &LetterPool, word: &str) -> Option<u32> {
    if word.len() > pool.total() {
        return None;
    }

    let mut required = [0u32; LETTER_COUNT];
    for b in word.bytes() {
        required[Letter::from_word_byte(b)?.index()] += 1;
    }

    let mut letters: Vec<Letter> = Letter::ALL
        .iter()
        .copied()
        .filter(|letter| required[letter.index()] > 0)
        .collect();
    letters.sort_by_key(|letter| Reverse(letter.value()));

    let mut pool = *pool;
    let mut score = 0;
    for letter in letters {
        for _ in 0..required[letter.index()] {
            score += take_tile(&mut pool, letter)?.value();
        }
    }

    Some(score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ContextToken;
    use crate::query::compile::compile;

    fn compiled(pattern: &str, pool: &str) -> CompiledPattern {
        compile(&pattern.parse().unwrap(), &pool.parse().unwrap(), None).unwrap()
    }

    fn score(pattern: &str, pool: &str, word: &str, start: usize) -> Option<u32> {
        score_window(&compiled(pattern, pool), word, start).map(|s| s.score)
    }

    #[test]
    fn test_plain_cells_score_face_value() {
        assert_eq!(score("..", "ab", "AB", 0), Some(4));
    }

    #[test]
    fn test_multipliers_apply_to_open_cells() {
        // C x2 + A x3 + T
        assert_eq!(score("#!.", "act", "CAT", 0), Some(6 + 3 + 1));
    }

    #[test]
    fn test_real_tile_goes_to_highest_multiplier() {
        // the real tile lands on the triple cell, the wildcard covers the other letter
        assert_eq!(score("!.", "a*", "AB", 0), Some(3));
        assert_eq!(score(".!", "b*", "AB", 0), Some(9));
    }

    #[test]
    fn test_wildcard_fills_missing_letter() {
        assert_eq!(score("...", "ca*", "CAT", 0), Some(4));
        assert_eq!(score("...", "ca", "CAT", 0), None);
    }

    #[test]
    fn test_repeated_letters_consume_the_pool() {
        assert_eq!(score("..", "a", "AA", 0), None);
        assert_eq!(score("..", "2a", "AA", 0), Some(2));
    }

    #[test]
    fn test_fixed_letters_count_once() {
        // Q on the board, U drawn, I and T from the pool
        assert_eq!(score("Qu..", "uit", "QUIT", 0), Some(10 + 1 + 1 + 1));
    }

    #[test]
    fn test_board_letters_do_not_use_tiles() {
        assert_eq!(score("C.T", "a", "CAT", 0), Some(5));
    }

    #[test]
    fn test_quick_rejection_on_tile_count() {
        assert_eq!(score("A..", "b", "ABB", 0), None);
    }

    #[test]
    fn test_window_offset() {
        assert_eq!(score(".", "s", "CATS", 3), Some(1));
        assert_eq!(score(".", "s", "CATS", 4), None);
    }

    #[test]
    fn test_secondaries_in_cell_order() {
        let pattern = "!.".parse().unwrap();
        let pool = "ab".parse().unwrap();
        let contexts = vec![ContextToken::new("x", ""), ContextToken::new("", "e")];
        let compiled = compile(&pattern, &pool, Some(&contexts)).unwrap();
        let scored = score_window(&compiled, "AB", 0).unwrap();
        assert_eq!(scored.score, 3 + 3);
        assert_eq!(
            scored.secondaries,
            vec![
                SecondaryMatch { crossword: "XA".to_string(), score: 9 },
                SecondaryMatch { crossword: "BE".to_string(), score: 4 },
            ]
        );
    }

    #[test]
    fn test_secondary_with_wildcard_scores_neighbours_only() {
        let pattern = ".".parse().unwrap();
        let pool = "*".parse().unwrap();
        let contexts = vec![ContextToken::new("ca", "t")];
        let compiled = compile(&pattern, &pool, Some(&contexts)).unwrap();
        let scored = score_window(&compiled, "S", 0).unwrap();
        assert_eq!(scored.score, 0);
        assert_eq!(scored.secondaries[0].crossword, "CAST");
        assert_eq!(scored.secondaries[0].score, 5);
    }

    #[test]
    fn test_whole_word_uses_wildcard_on_cheapest_letter() {
        let pool: LetterPool = "ab*".parse().unwrap();
        assert_eq!(score_whole_word(&pool, "AB"), Some(4));
        assert_eq!(score_whole_word(&pool, "ABZ"), Some(4));
        assert_eq!(score_whole_word(&pool, "ABZQ"), None);

        // Z is served before A, so the wildcard ends up on the second A
        let pool: LetterPool = "az*".parse().unwrap();
        assert_eq!(score_whole_word(&pool, "ZAA"), Some(11));
    }

    #[test]
    fn test_whole_word_rejects_long_words_and_lowercase() {
        let pool: LetterPool = "2*".parse().unwrap();
        assert_eq!(score_whole_word(&pool, "ABC"), None);
        assert_eq!(score_whole_word(&pool, "ab"), None);
        assert_eq!(score_whole_word(&pool, "AB"), Some(0));
    }
}

use fancy_regex::Regex;

use crate::letters::Letter;

use super::compile::{CompiledPattern, Slot};
use super::prefilter::build_prefilter;

/// Cheap whole-word check run before the window scan.
#[derive(Debug, Clone)]
pub(crate) struct WindowMatcher {
    prefilter: Option<Regex>,
}

impl WindowMatcher {
    pub(crate) fn new(compiled: &CompiledPattern) -> Self {
        WindowMatcher { prefilter: build_prefilter(compiled) }
    }

    /// `false` only if `word` cannot hold any window. Regex runtime errors
    /// (backtrack limits) count as "maybe" so they never drop a match.
    pub(crate) fn may_match(&self, word: &str) -> bool {
        match &self.prefilter {
            Some(re) => re.is_match(word).unwrap_or(true),
            None => true,
        }
    }
}

/// Does the window of `word` starting at `start` satisfy every cell?
fn window_fits(compiled: &CompiledPattern, word: &[u8], start: usize) -> bool {
    compiled
        .slots
        .iter()
        .zip(&word[start..start + compiled.len()])
        .all(|(slot, &b)| match (slot, Letter::from_word_byte(b)) {
            (_, None) => false,
            (Slot::Fixed { letter, .. }, Some(actual)) => *letter == actual,
            (Slot::Open { class, .. }, Some(actual)) => class.contains(actual),
        })
}

/// The first window start at or after `from` that satisfies the cells and
/// anchors, if any. Windows may overlap.
pub(crate) fn next_window_start(compiled: &CompiledPattern, word: &str, from: usize) -> Option<usize> {
    let bytes = word.as_bytes();
    let len = compiled.len();
    if len == 0 || len > bytes.len() {
        return None;
    }

    let last = bytes.len() - len;
    let (lo, hi) = match (compiled.anchored_start, compiled.anchored_end) {
        (true, true) if last != 0 => return None,
        (true, _) => (0, 0),
        (false, true) => (last, last),
        (false, false) => (0, last),
    };

    (lo.max(from)..=hi).find(|&start| window_fits(compiled, bytes, start))
}

/// Every window start in `word`, in increasing order.
#[cfg(test)]
pub(crate) fn window_starts<'w>(
    compiled: &'w CompiledPattern,
    word: &'w str,
) -> impl Iterator<Item = usize> + 'w {
    let mut from = 0;
    std::iter::from_fn(move || {
        let start = next_window_start(compiled, word, from)?;
        from = start + 1;
        Some(start)
    })
}

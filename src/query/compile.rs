//! Turn a parsed pattern and a pool into per-cell constraints.
//!
//! Compilation happens once per query. It commits lowercase (drawn) letters
//! to their cells, pays for any shortfall with wildcards, and derives the
//! character class every open cell starts from.

use log::debug;

use crate::errors::ParseError;
use crate::letters::{Letter, LetterSet};
use crate::parser::{ContextToken, ParsedPattern, PatternPart};
use crate::pool::{LetterPool, WorkingPool};

use super::QueryError;

/// One compiled cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Slot {
    /// Predetermined letter; `drawn` if it comes out of the pool.
    Fixed { letter: Letter, drawn: bool },
    /// Cell filled from the pool, scored at `multiplier`.
    Open {
        multiplier: u32,
        class: LetterSet,
        context: Option<ContextToken>,
    },
}

#[derive(Debug, Clone)]
pub(crate) struct CompiledPattern {
    pub(crate) slots: Vec<Slot>,
    pub(crate) anchored_start: bool,
    pub(crate) anchored_end: bool,
    /// Pool left after drawn letters were committed; never negative.
    pub(crate) pool: LetterPool,
    pub(crate) fixed_count: usize,
    /// Face value of all fixed cells, counted once.
    pub(crate) fixed_value: u32,
}

impl CompiledPattern {
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn open_count(&self) -> usize {
        self.slots.len() - self.fixed_count
    }
}

/// Compile `pattern` against `pool`.
///
/// `contexts` is `None` for linear queries. For transverse queries it must
/// hold exactly one token per open cell, in pattern order; bare `.` tokens
/// leave their cell without a crossword.
///
/// # Errors
///
/// - `QueryError::ParseFailure` wrapping `ContextCountMismatch` when the
///   token count does not match the open cells.
/// - `QueryError::Shortfall` when the drawn letters need more wildcards than
///   the pool holds.
pub(crate) fn compile(
    pattern: &ParsedPattern,
    pool: &LetterPool,
    contexts: Option<&[ContextToken]>,
) -> Result<CompiledPattern, QueryError> {
    if let Some(contexts) = contexts {
        let expected = pattern.open_count();
        if contexts.len() != expected {
            return Err(QueryError::ParseFailure(Box::new(ParseError::ContextCountMismatch {
                expected,
                found: contexts.len(),
            })));
        }
    }

    let class = pool.candidate_class();
    let mut contexts = contexts.unwrap_or_default().iter();
    let mut working = WorkingPool::from(pool);
    let mut slots = Vec::with_capacity(pattern.len());
    let mut fixed_value = 0;

    for part in pattern {
        let slot = match *part {
            PatternPart::Open(multiplier) => Slot::Open {
                multiplier,
                class,
                context: contexts.next().filter(|ctx| !ctx.is_bare()).cloned(),
            },
            PatternPart::Board(letter) => Slot::Fixed { letter, drawn: false },
            PatternPart::Drawn(letter) => {
                working.draw(letter);
                Slot::Fixed { letter, drawn: true }
            }
        };
        if let Slot::Fixed { letter, .. } = slot {
            fixed_value += letter.value();
        }
        slots.push(slot);
    }

    let drawn = slots.iter().filter(|slot| matches!(slot, Slot::Fixed { drawn: true, .. })).count();
    debug!(
        "compiled pattern \"{pattern}\": {} cell(s), {} open, {drawn} drawn, shortfall {}",
        slots.len(),
        pattern.open_count(),
        working.shortfall()
    );

    let pool = working.reconcile()?;
    let fixed_count = slots.len() - pattern.open_count();

    Ok(CompiledPattern {
        slots,
        anchored_start: pattern.anchored_start,
        anchored_end: pattern.anchored_end,
        pool,
        fixed_count,
        fixed_value,
    })
}

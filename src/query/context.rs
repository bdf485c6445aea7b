use log::debug;

use crate::lexicon::Lexicon;

use super::compile::{CompiledPattern, Slot};
use super::QueryError;

/// Restrict every context-bearing open cell to the letters that complete a
/// lexicon word across it.
///
/// The narrowing depends only on the pool, the context and the lexicon, so it
/// runs once per execution rather than once per candidate word.
///
/// # Errors
///
/// `QueryError::NoValidCrossword` for the first cell left with no letters; no
/// word can then match the query.
pub(crate) fn narrow_classes<L: Lexicon + ?Sized>(
    compiled: &mut CompiledPattern,
    lexicon: &L,
) -> Result<(), QueryError> {
    for (position, slot) in compiled.slots.iter_mut().enumerate() {
        if let Slot::Open { class, context: Some(ctx), .. } = slot {
            let narrowed = class.retain(|letter| lexicon.contains(&ctx.crossword_with(letter)));
            debug!("cell {position} ({ctx}): {} -> {}", class.len(), narrowed);
            if narrowed.is_empty() {
                return Err(QueryError::NoValidCrossword {
                    position,
                    context: ctx.to_string(),
                });
            }
            *class = narrowed;
        }
    }
    Ok(())
}

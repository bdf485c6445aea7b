//! Find lexicon words that fit a run of board cells, given a pool of letter
//! tiles, and score them.
//!
//! The entry points are [`query::LinearQuery`] and [`query::TransverseQuery`];
//! any [`lexicon::Lexicon`] (a `HashSet` of words, or a loaded
//! [`lexicon::WordList`]) can be searched.

pub mod errors;
pub mod letters;
pub mod lexicon;
pub mod log;
pub mod parser;
pub mod pool;
pub mod query;

pub use letters::{Letter, LetterSet};
pub use lexicon::{Lexicon, WordList};
pub use pool::LetterPool;
pub use query::{LinearQuery, QueryError, QueryMatch, TransverseQuery, TransverseQueryMatch};

//! Linear and transverse queries against a lexicon.
//!
//! # Error Handling
//!
//! Queries use [`QueryError`] with three variants:
//!
//! - Q001: `ParseFailure` (Pool, pattern or context failed to parse (wraps [`ParseError`]))
//! - Q002: `Shortfall` (Drawn letters need more wildcards than the pool has)
//! - Q003: `NoValidCrossword` (No pool letter completes a crossword at some cell)
//!
//! Q002 and Q003 mean "no word can ever match"; [`QueryError::is_unsatisfiable`]
//! lets callers report them as an empty result rather than bad input.
//!
//! # Examples
//!
//! ## Linear query
//!
//! ```
//! use std::collections::HashSet;
//! use tilescan::query::LinearQuery;
//!
//! let lexicon: HashSet<&str> = HashSet::from(["CAT", "CART", "ACT"]);
//! let query = LinearQuery::new("/C.", "2a*".parse()?)?;
//!
//! let mut words: Vec<String> = query.execute(&lexicon).map(|m| m.word).collect();
//! words.sort();
//! assert_eq!(words, vec!["CART", "CAT"]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Transverse query
//!
//! ```
//! use std::collections::HashSet;
//! use tilescan::query::TransverseQuery;
//!
//! let lexicon: HashSet<&str> = HashSet::from(["AS", "CAST", "CAT"]);
//! let query = TransverseQuery::new("/A.", &["ca.t"], "st".parse()?)?;
//!
//! let found: Vec<_> = query.execute(&lexicon).collect();
//! assert_eq!(found.len(), 1);
//! assert_eq!(found[0].primary.word, "AS");
//! assert_eq!(found[0].secondaries[0].crossword, "CAST");
//! assert_eq!(found[0].total_score(), 2 + 6);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod compile;
mod context;
mod matcher;
mod prefilter;
mod scorer;

use std::fmt;
use std::iter::Map;
use std::sync::Arc;

use log::debug;

use crate::errors::ParseError;
use crate::lexicon::Lexicon;
use crate::parser::{parse_context_tokens, ContextToken, ParsedPattern};
use crate::pool::{LetterPool, Shortfall};

use compile::{compile, CompiledPattern};
use matcher::{next_window_start, WindowMatcher};
use scorer::{score_whole_word, score_window, Scored};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Unified error type for building and running queries.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// The pool, pattern or context tokens could not be parsed.
    #[error("parse failure: {0}")]
    ParseFailure(#[from] Box<ParseError>),

    /// Lowercase letters in the pattern need more tiles than the pool holds,
    /// even with every wildcard spent.
    #[error("pattern needs {missing} tile(s) the pool lacks, with only {wildcards} wildcard(s) to cover them")]
    Shortfall { missing: u32, wildcards: u32 },

    /// No candidate letter forms a lexicon word with the context at a cell.
    #[error("no pool letter completes a word across cell {position} (context \"{context}\")")]
    NoValidCrossword { position: usize, context: String },
}

impl From<Shortfall> for QueryError {
    fn from(s: Shortfall) -> Self {
        QueryError::Shortfall { missing: s.missing, wildcards: s.wildcards }
    }
}

impl QueryError {
    /// True when the inputs were well-formed but no word can ever match.
    #[must_use]
    pub fn is_unsatisfiable(&self) -> bool {
        !matches!(self, QueryError::ParseFailure(_))
    }

    /// Returns the error code for this error variant
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            QueryError::ParseFailure(_) => "Q001",
            QueryError::Shortfall { .. } => "Q002",
            QueryError::NoValidCrossword { .. } => "Q003",
        }
    }

    /// Returns a short description of this error type (for documentation)
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            QueryError::ParseFailure(_) => "Pool, pattern or context failed to parse",
            QueryError::Shortfall { .. } => "Drawn letters need more wildcards than the pool has",
            QueryError::NoValidCrossword { .. } => "No pool letter completes a crossword at some cell",
        }
    }

    /// Returns detailed explanation of this error type (for documentation)
    #[must_use]
    pub fn details(&self) -> &'static str {
        match self {
            QueryError::ParseFailure(_) => "One of the query inputs could not be parsed. This wraps an underlying ParseError (see Parse Errors section for specific error codes).",
            QueryError::Shortfall { .. } => "Every lowercase letter in the pattern is a tile that must come out of the pool. When the pool is short of those letters and has too few wildcards to stand in, no word can match, so the lexicon is not scanned.",
            QueryError::NoValidCrossword { .. } => "For a transverse query, each open cell with neighbours must form a lexicon word across the board. If no letter the pool can supply does that, no word can match.",
        }
    }

    /// Returns a helpful suggestion for this error
    #[must_use]
    pub fn help(&self) -> Option<&'static str> {
        match self {
            QueryError::Shortfall { .. } => Some("Add the missing tiles or wildcards to the pool, or use uppercase for letters already on the board"),
            QueryError::NoValidCrossword { .. } => Some("Check the context tokens; use '.' for a cell with no neighbours"),
            QueryError::ParseFailure(_) => None, // ParseError has its own help
        }
    }

    /// Formats the error with code and optional help text
    #[must_use]
    pub fn display_detailed(&self) -> String {
        match self {
            QueryError::ParseFailure(pe) => {
                format!("{}\n  caused by: {}", self.code(), pe.display_detailed())
            }
            _ => crate::errors::format_error_with_code_and_help(&self.to_string(), self.code(), self.help()),
        }
    }
}

/// A word that fits the query, with its score.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryMatch {
    pub word: String,
    pub score: u32,
    /// Index of the first pattern cell within `word` (0 for pool-only queries).
    pub start_offset: usize,
}

impl fmt::Display for QueryMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.word, self.score)
    }
}

/// A perpendicular word formed across one open cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SecondaryMatch {
    pub crossword: String,
    pub score: u32,
}

impl fmt::Display for SecondaryMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.crossword, self.score)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransverseQueryMatch {
    pub primary: QueryMatch,
    /// One entry per open cell with neighbours, in cell order.
    pub secondaries: Vec<SecondaryMatch>,
}

impl TransverseQueryMatch {
    fn new(word: &str, start_offset: usize, scored: Scored) -> Self {
        TransverseQueryMatch {
            primary: QueryMatch { word: word.to_string(), score: scored.score, start_offset },
            secondaries: scored.secondaries,
        }
    }

    /// Primary score plus every crossword score.
    #[must_use]
    pub fn total_score(&self) -> u32 {
        self.primary.score + self.secondaries.iter().map(|s| s.score).sum::<u32>()
    }

    fn into_primary(self) -> QueryMatch {
        self.primary
    }
}

impl fmt::Display for TransverseQueryMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.primary.word, self.total_score())?;
        if !self.secondaries.is_empty() {
            let crosswords: Vec<String> = self.secondaries.iter().map(ToString::to_string).collect();
            write!(f, " ({} + {})", self.primary.score, crosswords.join(", "))?;
        }
        Ok(())
    }
}

/// Anything that can be put in a ranked result list.
pub trait Ranked {
    fn rank_score(&self) -> u32;
    fn rank_word(&self) -> &str;
    fn rank_offset(&self) -> usize;
}

impl Ranked for QueryMatch {
    fn rank_score(&self) -> u32 { self.score }
    fn rank_word(&self) -> &str { &self.word }
    fn rank_offset(&self) -> usize { self.start_offset }
}

impl Ranked for TransverseQueryMatch {
    fn rank_score(&self) -> u32 { self.total_score() }
    fn rank_word(&self) -> &str { &self.primary.word }
    fn rank_offset(&self) -> usize { self.primary.start_offset }
}

/// Sort best first: score, then longer words, then alphabetical, then offset.
///
/// The tail keys make the order total, so ranking a sharded (unordered)
/// result set is deterministic.
pub fn rank_matches<T: Ranked>(matches: &mut [T]) {
    matches.sort_by(|a, b| {
        b.rank_score()
            .cmp(&a.rank_score())
            .then_with(|| b.rank_word().len().cmp(&a.rank_word().len()))
            .then_with(|| a.rank_word().cmp(b.rank_word()))
            .then_with(|| a.rank_offset().cmp(&b.rank_offset()))
    });
}

/// What to do with each lexicon word.
#[derive(Debug, Clone)]
enum Plan {
    /// Empty pattern: the whole word must come from the pool.
    WholeWord(LetterPool),
    /// Scan the word for windows matching the compiled cells.
    Windows { compiled: CompiledPattern, matcher: WindowMatcher },
}

impl Plan {
    fn new(compiled: CompiledPattern) -> Self {
        if compiled.len() == 0 {
            Plan::WholeWord(compiled.pool)
        } else {
            let matcher = WindowMatcher::new(&compiled);
            Plan::Windows { compiled, matcher }
        }
    }
}

/// Lazy stream of matches, pulled one lexicon word at a time.
///
/// Nothing is buffered beyond the word currently being scanned, so dropping
/// the iterator early stops all work.
pub struct Matches<'a> {
    plan: Option<Arc<Plan>>,
    words: Box<dyn Iterator<Item = &'a str> + 'a>,
    /// Word being scanned and the next window start to try.
    current: Option<(&'a str, usize)>,
}

impl<'a> Matches<'a> {
    fn new(plan: Arc<Plan>, words: Box<dyn Iterator<Item = &'a str> + 'a>) -> Self {
        Matches { plan: Some(plan), words, current: None }
    }

    fn empty() -> Self {
        Matches { plan: None, words: Box::new(std::iter::empty()), current: None }
    }
}

impl Iterator for Matches<'_> {
    type Item = TransverseQueryMatch;

    fn next(&mut self) -> Option<Self::Item> {
        let Matches { plan, words, current } = self;
        let plan = plan.as_deref()?;

        loop {
            if let (Some((word, from)), Plan::Windows { compiled, .. }) = (*current, plan) {
                match next_window_start(compiled, word, from) {
                    Some(start) => {
                        *current = Some((word, start + 1));
                        if let Some(scored) = score_window(compiled, word, start) {
                            return Some(TransverseQueryMatch::new(word, start, scored));
                        }
                        continue;
                    }
                    None => *current = None,
                }
            }

            let word = words.next()?;
            match plan {
                Plan::WholeWord(pool) => {
                    if let Some(score) = score_whole_word(pool, word) {
                        let scored = Scored { score, secondaries: Vec::new() };
                        return Some(TransverseQueryMatch::new(word, 0, scored));
                    }
                }
                Plan::Windows { matcher, .. } => {
                    if matcher.may_match(word) {
                        *current = Some((word, 0));
                    }
                }
            }
        }
    }
}

/// Matches of a linear query.
pub type LinearMatches<'a> = Map<Matches<'a>, fn(TransverseQueryMatch) -> QueryMatch>;

/// Run `plan` over the lexicon split across rayon workers. Order is unspecified.
#[cfg(feature = "parallel")]
fn execute_plan_parallel<L: Lexicon + ?Sized>(plan: &Arc<Plan>, lexicon: &L) -> Vec<TransverseQueryMatch> {
    let words: Vec<&str> = lexicon.words().collect();
    words
        .par_iter()
        .flat_map_iter(|&word| Matches::new(Arc::clone(plan), Box::new(std::iter::once(word))))
        .collect()
}

/// A search along one axis with no perpendicular constraints.
#[derive(Debug, Clone)]
pub struct LinearQuery {
    pattern: ParsedPattern,
    pool: LetterPool,
    plan: Arc<Plan>,
}

impl LinearQuery {
    /// Parse `pattern` and compile it against `pool`.
    ///
    /// # Errors
    ///
    /// `QueryError::ParseFailure` for a malformed pattern and
    /// `QueryError::Shortfall` when the pattern can never be satisfied.
    pub fn new(pattern: &str, pool: LetterPool) -> Result<Self, QueryError> {
        Self::from_parts(pattern.parse()?, pool)
    }

    /// # Errors
    ///
    /// `QueryError::Shortfall` when the pattern can never be satisfied.
    pub fn from_parts(pattern: ParsedPattern, pool: LetterPool) -> Result<Self, QueryError> {
        let compiled = compile(&pattern, &pool, None)?;
        Ok(LinearQuery { plan: Arc::new(Plan::new(compiled)), pattern, pool })
    }

    #[must_use]
    pub fn pattern(&self) -> &ParsedPattern {
        &self.pattern
    }

    #[must_use]
    pub fn pool(&self) -> &LetterPool {
        &self.pool
    }

    /// Lazily yield every match in `lexicon`. A word may match at several offsets.
    pub fn execute<'a, L: Lexicon + ?Sized>(&self, lexicon: &'a L) -> LinearMatches<'a> {
        Matches::new(Arc::clone(&self.plan), lexicon.words())
            .map(TransverseQueryMatch::into_primary as fn(TransverseQueryMatch) -> QueryMatch)
    }

    /// Like [`LinearQuery::execute`] but sharded across threads; rank the result
    /// with [`rank_matches`] for a deterministic order.
    #[cfg(feature = "parallel")]
    pub fn execute_parallel<L: Lexicon + ?Sized>(&self, lexicon: &L) -> Vec<QueryMatch> {
        execute_plan_parallel(&self.plan, lexicon)
            .into_iter()
            .map(TransverseQueryMatch::into_primary)
            .collect()
    }
}

/// A linear query whose open cells also form words across the board.
#[derive(Debug, Clone)]
pub struct TransverseQuery {
    pattern: ParsedPattern,
    contexts: Vec<ContextToken>,
    pool: LetterPool,
    compiled: CompiledPattern,
}

impl TransverseQuery {
    /// Parse `pattern` and one context token per open cell, and compile them
    /// against `pool`.
    ///
    /// # Errors
    ///
    /// `QueryError::ParseFailure` for malformed input or a context count that
    /// does not match the open cells; `QueryError::Shortfall` when the pattern
    /// can never be satisfied.
    pub fn new<S: AsRef<str>>(pattern: &str, contexts: &[S], pool: LetterPool) -> Result<Self, QueryError> {
        Self::from_parts(pattern.parse()?, parse_context_tokens(contexts)?, pool)
    }

    /// # Errors
    ///
    /// See [`TransverseQuery::new`].
    pub fn from_parts(
        pattern: ParsedPattern,
        contexts: Vec<ContextToken>,
        pool: LetterPool,
    ) -> Result<Self, QueryError> {
        let compiled = compile(&pattern, &pool, Some(&contexts))?;
        Ok(TransverseQuery { pattern, contexts, pool, compiled })
    }

    #[must_use]
    pub fn pattern(&self) -> &ParsedPattern {
        &self.pattern
    }

    #[must_use]
    pub fn contexts(&self) -> &[ContextToken] {
        &self.contexts
    }

    #[must_use]
    pub fn pool(&self) -> &LetterPool {
        &self.pool
    }

    fn resolve<L: Lexicon + ?Sized>(&self, lexicon: &L) -> Result<Arc<Plan>, QueryError> {
        let mut compiled = self.compiled.clone();
        context::narrow_classes(&mut compiled, lexicon)?;
        Ok(Arc::new(Plan::new(compiled)))
    }

    /// Narrow the crossword cells against `lexicon`, then lazily yield matches.
    ///
    /// # Errors
    ///
    /// `QueryError::NoValidCrossword` when some cell has no usable letter; the
    /// lexicon is then never scanned.
    pub fn try_execute<'a, L: Lexicon + ?Sized>(&self, lexicon: &'a L) -> Result<Matches<'a>, QueryError> {
        Ok(Matches::new(self.resolve(lexicon)?, lexicon.words()))
    }

    /// Like [`TransverseQuery::try_execute`], but an unsatisfiable query simply
    /// yields nothing.
    pub fn execute<'a, L: Lexicon + ?Sized>(&self, lexicon: &'a L) -> Matches<'a> {
        self.try_execute(lexicon).unwrap_or_else(|e| {
            debug!("transverse query \"{}\" has no matches: {e}", self.pattern);
            Matches::empty()
        })
    }

    /// Sharded variant of [`TransverseQuery::execute`]; order is unspecified.
    #[cfg(feature = "parallel")]
    pub fn execute_parallel<L: Lexicon + ?Sized>(&self, lexicon: &L) -> Vec<TransverseQueryMatch> {
        match self.resolve(lexicon) {
            Ok(plan) => execute_plan_parallel(&plan, lexicon),
            Err(e) => {
                debug!("transverse query \"{}\" has no matches: {e}", self.pattern);
                Vec::new()
            }
        }
    }
}

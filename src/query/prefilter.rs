use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

use fancy_regex::Regex;
use log::warn;

use crate::errors::ParseError;

use super::compile::{CompiledPattern, Slot};

/// Global, lazily initialized cache of compiled regexes.
///
/// - `OnceLock` ensures the cache is created at most once, on first use.
/// - The `Mutex` is held only for lookups and inserts; compilation happens
///   outside the lock, with a double-check before inserting.
/// - `Regex` clones are cheap (internally ref-counted).
static REGEX_CACHE: OnceLock<Mutex<HashMap<String, Regex>>> = OnceLock::new();

/// Return a compiled `Regex` for `pattern`, caching the result.
pub(crate) fn get_regex(pattern: &str) -> Result<Regex, Box<fancy_regex::Error>> {
    let cache = REGEX_CACHE.get_or_init(|| Mutex::new(HashMap::new()));

    // check cache first; if lock is poisoned, recover and continue
    if let Ok(guard) = cache.lock() {
        if let Some(re) = guard.get(pattern).cloned() {
            return Ok(re);
        }
    }

    let compiled = Regex::new(pattern)?;

    // if lock is poisoned, we still return the compiled regex (but don't cache it)
    if let Ok(mut guard) = cache.lock() {
        if let Some(existing) = guard.get(pattern).cloned() {
            return Ok(existing);
        }
        guard.insert(pattern.to_string(), compiled.clone());
    }
    Ok(compiled)
}

/// Render compiled cells as a regex that matches a word iff it holds at least
/// one window satisfying every cell (ignoring tile counts).
///
/// - fixed cells become their letter
/// - open cells become a class, `[A-Z]` when every letter is allowed
/// - anchors become `^` / `$`
pub(crate) fn render_slots_to_regex(compiled: &CompiledPattern) -> String {
    let mut regex_str = String::new();

    if compiled.anchored_start {
        regex_str.push('^');
    }
    for slot in &compiled.slots {
        match slot {
            Slot::Fixed { letter, .. } => regex_str.push(letter.symbol()),
            Slot::Open { class, .. } if class.is_alphabet() => regex_str.push_str("[A-Z]"),
            Slot::Open { class, .. } => {
                regex_str.push('[');
                regex_str.extend(class.iter().map(|l| l.symbol()));
                regex_str.push(']');
            }
        }
    }
    if compiled.anchored_end {
        regex_str.push('$');
    }

    regex_str
}

/// Build the prefilter for `compiled`. A prefilter that does not compile is
/// dropped: it only ever saves work, so scanning without one is still correct.
pub(crate) fn build_prefilter(compiled: &CompiledPattern) -> Option<Regex> {
    let regex_str = render_slots_to_regex(compiled);
    match get_regex(&regex_str) {
        Ok(re) => Some(re),
        Err(e) => {
            let e: Box<ParseError> = e.into();
            warn!("prefilter \"{regex_str}\" dropped: {}", e.display_detailed());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::compile::compile;

    fn compiled(pattern: &str, pool: &str) -> CompiledPattern {
        compile(&pattern.parse().unwrap(), &pool.parse().unwrap(), None).unwrap()
    }

    #[test]
    fn test_render_classes_and_letters() {
        assert_eq!(render_slots_to_regex(&compiled(".Ab", "tab")), "[ABT]AB");
    }

    #[test]
    fn test_render_wildcard_pool_as_full_alphabet() {
        assert_eq!(render_slots_to_regex(&compiled("/#E/", "a*")), "^[A-Z]E$");
    }

    #[test]
    fn test_prefilter_rejects_words_without_window() {
        let re = build_prefilter(&compiled("/.T", "ac")).unwrap();
        assert!(re.is_match("AT").unwrap());
        assert!(!re.is_match("CATS").unwrap());
        assert!(re.is_match("CT").unwrap());
    }

    #[test]
    fn test_get_regex_caches() {
        let a = get_regex("^[AB]C$").unwrap();
        let b = get_regex("^[AB]C$").unwrap();
        assert_eq!(a.as_str(), b.as_str());
        assert!(get_regex("(?P<broken").is_err());
    }
}

//! `bench_local.rs`: quick local timing runner (no Criterion)
//!
//! - Loads the word list once, then runs each (pool, pattern) case several
//!   times and reports the median.
//! - Every match is drained and ranked, so the timing covers the full scan.
//!
//! Run with:
//! ```bash
//! cargo run --bin bench_local --release -- -w words.json -r 5
//! ```
//!
//! It's quick and convenient, not statistically rigorous. One warm-up run per
//! case is done and not included in timing.

use clap::Parser;
use std::hint::black_box;
use std::time::Instant;

use tilescan::lexicon::{Lexicon, LoadMode, WordList};
use tilescan::pool::LetterPool;
use tilescan::query::{rank_matches, LinearQuery, QueryError, TransverseQuery};

/// Load a word list once, then time several queries against it.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Word list to search (plain text, or JSON made by `tilescan prepare`)
    #[arg(short, long, env = "TILESCAN_WORDLIST")]
    wordlist: String,

    /// Number of repeats per case (use >1 to reduce noise; median is reported)
    #[arg(short = 'r', long = "repeats", default_value_t = 1)]
    num_repeats: usize,

    /// Print up to this many top matches per case (0 = print none)
    #[arg(short = 'p', long = "print", default_value_t = 0)]
    print_limit: usize,
}

/// A benchmark case. `contexts` is empty for linear queries.
#[derive(Clone)]
struct Case {
    pool: &'static str,
    pattern: &'static str,
    contexts: &'static [&'static str],
}

impl Case {
    fn name(&self) -> String {
        if self.contexts.is_empty() {
            format!("{} \"{}\"", self.pool, self.pattern)
        } else {
            format!("{} \"{}\" [{}]", self.pool, self.pattern, self.contexts.join(" "))
        }
    }

    /// Run the query and return ranked `WORD SCORE` lines.
    fn run<L: Lexicon + ?Sized>(&self, lexicon: &L) -> Result<Vec<String>, QueryError> {
        let pool: LetterPool = self.pool.parse()?;
        if self.contexts.is_empty() {
            let mut found: Vec<_> = LinearQuery::new(self.pattern, pool)?.execute(lexicon).collect();
            rank_matches(&mut found);
            Ok(found.iter().map(ToString::to_string).collect())
        } else {
            let query = TransverseQuery::new(self.pattern, self.contexts, pool)?;
            let mut found: Vec<_> = query.execute(lexicon).collect();
            rank_matches(&mut found);
            Ok(found.iter().map(ToString::to_string).collect())
        }
    }
}

fn get_cases() -> Vec<Case> {
    vec![
        Case { pool: "aeinrst", pattern: "", contexts: &[] },
        Case { pool: "aeinrs*", pattern: "", contexts: &[] },
        Case { pool: "aeinrst", pattern: ".......", contexts: &[] },
        Case { pool: "2e*qtu", pattern: "/Q", contexts: &[] },
        Case { pool: "abcdefg", pattern: "..!.#", contexts: &[] },
        Case { pool: "2*", pattern: "Z..", contexts: &[] },
        Case { pool: "aeirst*", pattern: ".E..", contexts: &[] },
        Case { pool: "adeorst", pattern: "...", contexts: &["ca.t", ".", "o.e"] },
        Case { pool: "aeiostu*", pattern: "/..", contexts: &["as.da", "."] },
    ]
}

/// Small helper: robust central tendency for small samples.
fn median(mut xs: Vec<f64>) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.sort_by(f64::total_cmp);
    let n = xs.len();
    if n % 2 == 1 {
        xs[n / 2]
    } else {
        0.5 * (xs[n / 2 - 1] + xs[n / 2])
    }
}

const MAX_NAME_LEN: usize = 40;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load the word list once. This I/O is *not* included in per-case timing.
    eprintln!("Loading word list from: {}", cli.wordlist);
    let t_load = Instant::now();
    let word_list = WordList::load_from_path(&cli.wordlist, LoadMode::Safe)?;
    eprintln!("Loaded {} words in {:.3}s", word_list.len(), t_load.elapsed().as_secs_f64());

    let cases = get_cases();
    let mut summary: Vec<(String, f64, usize)> = Vec::with_capacity(cases.len());

    for (idx, case) in cases.iter().enumerate() {
        let name = case.name();
        eprintln!("\n[{:02}] {}", idx + 1, name);

        if let Err(e) = case.run(&word_list) {
            eprintln!("  ✗ Warm-up failed: {}", e.display_detailed());
            continue;
        }

        let mut times = Vec::with_capacity(cli.num_repeats);
        let mut last_found: Vec<String> = Vec::new();

        for rep in 0..cli.num_repeats {
            let t_solve = Instant::now();
            let found = match case.run(black_box(&word_list)) {
                Ok(found) => found,
                Err(e) => {
                    eprintln!("  ✗ Run {}/{} failed: {e}", rep + 1, cli.num_repeats);
                    continue;
                }
            };
            let solve_secs = t_solve.elapsed().as_secs_f64();

            times.push(solve_secs);
            last_found = black_box(found);

            eprintln!(
                "  run {:>2}/{:>2}: {:.3}s ({} matches)",
                rep + 1,
                cli.num_repeats,
                solve_secs,
                last_found.len()
            );
        }

        let med = median(times);

        for line in last_found.iter().take(cli.print_limit) {
            println!("{line}");
        }

        eprintln!("  → median {med:.3}s over {} run(s)", cli.num_repeats);
        summary.push((name, med, last_found.len()));
    }

    eprintln!("\n==== Summary ====");
    eprintln!("{:<MAX_NAME_LEN$} | {:>10} | {:>9}", "case", "median (s)", "# matches");
    eprintln!("{:-<MAX_NAME_LEN$}-+-{:-<10}-+-{:-<9}", "", "", "");
    for (name, med, num_found) in &summary {
        let display = if name.chars().count() > MAX_NAME_LEN {
            format!("{}…", name.chars().take(MAX_NAME_LEN - 1).collect::<String>())
        } else {
            name.clone()
        };
        eprintln!("{display:<MAX_NAME_LEN$} | {med:>10.3} | {num_found:>9}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median() {
        assert_eq!(median(vec![]), 0.0);
        assert_eq!(median(vec![3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(vec![4.0, 1.0, 2.0, 3.0]), 2.5);
    }

    #[test]
    fn test_cases_are_well_formed() {
        let lexicon: std::collections::HashSet<&str> = std::collections::HashSet::new();
        for case in get_cases() {
            assert!(case.run(&lexicon).is_ok(), "case {} failed to build", case.name());
        }
    }
}

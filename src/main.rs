use std::fmt::Display;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;

use tilescan::lexicon::{LexiconError, LoadMode, WordList};
use tilescan::pool::LetterPool;
use tilescan::query::{rank_matches, LinearQuery, QueryError, TransverseQuery};

/// Tiles on a full rack.
const RACK_SIZE: usize = 7;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")");

/// Find lexicon words that can be played from a pool of letter tiles
#[derive(Parser, Debug)]
#[command(author, version = VERSION, about, long_about = None)]
struct Cli {
    /// Word list to search (plain text, or JSON made by `prepare`)
    #[arg(short, long, env = "TILESCAN_WORDLIST", global = true)]
    wordlist: Option<PathBuf>,

    /// Trust a plain-text word list as-is (no uppercasing or validation)
    #[arg(long, global = true)]
    unsafe_load: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search along one axis, e.g. `linear 2ab*e /..T`
    Linear {
        /// Tile pool, e.g. "2a1b3c*" ('*' is a wildcard)
        pool: String,

        /// Pattern of board cells; omit to search whole words from the pool
        #[arg(default_value = "")]
        query: String,

        /// Print only the top NUM results (0 = all)
        #[arg(short = 'n', long, default_value_t = 0, value_name = "NUM")]
        num: usize,
    },

    /// Search with crosswords formed through the open cells
    Transverse {
        /// Tile pool, e.g. "2a1b3c*" ('*' is a wildcard)
        pool: String,

        /// Pattern of board cells
        query: String,

        /// Neighbours of each open cell in order, e.g. "ca.t"; "." for none
        #[arg(short = 'c', long = "context")]
        contexts: Vec<String>,

        /// Print only the top NUM results (0 = all)
        #[arg(short = 'n', long, default_value_t = 0, value_name = "NUM")]
        num: usize,
    },

    /// Draw a random rack from a standard 100-tile bag and print its pool spec
    Rack {
        /// Number of tiles to draw
        #[arg(short = 'n', long, default_value_t = RACK_SIZE, value_name = "NUM")]
        size: usize,

        /// Seed the draw so it can be repeated
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Convert a raw dictionary into a checksummed JSON word list
    Prepare {
        /// Input dictionary, one headword per line
        input: PathBuf,

        /// Output file (default: INPUT with a .json extension)
        output: Option<PathBuf>,

        /// Skip the first NUM header lines
        #[arg(long, default_value_t = 0, value_name = "NUM")]
        skip: usize,

        /// Description text
        #[arg(long, default_value = "", value_name = "TEXT")]
        desc: String,

        /// Date text
        #[arg(long, default_value = "", value_name = "TEXT")]
        date: String,
    },
}

/// Entry point of the tilescan CLI.
///
/// Delegates to [`try_main`], catching any errors and printing them
/// in a user-friendly way before exiting with code 1.
fn main() -> ExitCode {
    let debug_enabled = std::env::var("TILESCAN_DEBUG").is_ok();
    tilescan::log::init_logger(debug_enabled);

    if let Err(e) = try_main() {
        if let Some(query_err) = e.downcast_ref::<QueryError>() {
            eprintln!("Error: {}", query_err.display_detailed());
        } else if let Some(lexicon_err) = e.downcast_ref::<LexiconError>() {
            eprintln!("Error: {}", lexicon_err.display_detailed());
        } else {
            eprintln!("Error: {e}");
        }
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn try_main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mode = if cli.unsafe_load { LoadMode::Fast } else { LoadMode::Safe };

    match cli.command {
        Command::Linear { pool, query, num } => {
            let pool = parse_pool(&pool)?;
            let query = LinearQuery::new(&query, pool)?;
            let word_list = load_word_list(cli.wordlist.as_deref(), mode)?;

            let t_solve = Instant::now();
            let mut found: Vec<_> = query.execute(&word_list).collect();
            rank_matches(&mut found);
            log::info!("Found {} match(es) in {:.3}s", found.len(), t_solve.elapsed().as_secs_f64());

            write_ranked(&mut io::stdout().lock(), &found, num)?;
        }
        Command::Transverse { pool, query, contexts, num } => {
            let pool = parse_pool(&pool)?;
            let query = TransverseQuery::new(&query, &contexts, pool)?;
            let word_list = load_word_list(cli.wordlist.as_deref(), mode)?;

            let t_solve = Instant::now();
            let mut found: Vec<_> = match query.try_execute(&word_list) {
                Ok(matches) => matches.collect(),
                Err(e) if e.is_unsatisfiable() => {
                    log::info!("{e}");
                    Vec::new()
                }
                Err(e) => return Err(e.into()),
            };
            rank_matches(&mut found);
            log::info!("Found {} match(es) in {:.3}s", found.len(), t_solve.elapsed().as_secs_f64());

            write_ranked(&mut io::stdout().lock(), &found, num)?;
        }
        Command::Rack { size, seed } => {
            println!("{}", draw_rack(size, seed));
        }
        Command::Prepare { input, output, skip, desc, date } => {
            prepare(&input, output, skip, &desc, &date)?;
        }
    }

    Ok(())
}

/// Parse a pool spec, warning about tiles a standard bag could not supply.
fn parse_pool(spec: &str) -> Result<LetterPool, QueryError> {
    let pool: LetterPool = spec.parse()?;
    for (letter, excess) in pool.exceeds_standard_bag() {
        log::warn!("pool has {excess} more {letter} tile(s) than a standard bag");
    }
    Ok(pool)
}

fn load_word_list(path: Option<&Path>, mode: LoadMode) -> Result<WordList, Box<dyn std::error::Error>> {
    let path = path.ok_or("no word list given (use --wordlist or set TILESCAN_WORDLIST)")?;
    log::info!("Loading word list from {}", path.display());
    Ok(WordList::load_from_path(path, mode)?)
}

/// Write ranked matches one per line. A non-zero `num` keeps the top `num`
/// and always ends with a count of the rest, even when that count is 0.
fn write_ranked<T: Display, W: Write>(out: &mut W, found: &[T], num: usize) -> io::Result<()> {
    let shown = if num == 0 { found.len() } else { num.min(found.len()) };
    for m in &found[..shown] {
        writeln!(out, "{m}")?;
    }
    if num > 0 {
        writeln!(out, "({} more result(s)...)", found.len() - shown)?;
    }
    Ok(())
}

fn draw_rack(size: usize, seed: Option<u64>) -> LetterPool {
    match seed {
        Some(seed) => LetterPool::random(&mut StdRng::seed_from_u64(seed), size),
        None => LetterPool::random(&mut rand::rng(), size),
    }
}

fn prepare(input: &Path, output: Option<PathBuf>, skip: usize, desc: &str, date: &str) -> Result<(), LexiconError> {
    let output = output.unwrap_or_else(|| input.with_extension("json"));
    if output.exists() {
        return Err(LexiconError::AlreadyExists { path: output.display().to_string() });
    }

    log::info!("Reading dictionary {}", input.display());
    let contents = std::fs::read_to_string(input).map_err(|source| LexiconError::Io {
        path: input.display().to_string(),
        source,
    })?;
    let word_list = WordList::parse_dictionary(&contents, skip)?.with_meta(desc, date);
    log::info!("Loaded {} words, checksum {}", word_list.len(), word_list.meta().checksum);

    word_list.write_json_to_path(&output)?;
    log::info!("Wrote {}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn ranked(found: &[&str], num: usize) -> String {
        let mut out = Vec::new();
        write_ranked(&mut out, found, num).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_zero_limit_prints_everything_without_trailer() {
        assert_eq!(ranked(&["CAST 6", "CAT 5"], 0), "CAST 6\nCAT 5\n");
    }

    #[test]
    fn test_limit_prints_trailer_with_remaining_count() {
        assert_eq!(ranked(&["CAST 6", "CAT 5", "AT 2"], 1), "CAST 6\n(2 more result(s)...)\n");
        assert_eq!(ranked(&["CAST 6", "CAT 5"], 2), "CAST 6\nCAT 5\n(0 more result(s)...)\n");
        assert_eq!(ranked(&["CAST 6"], 5), "CAST 6\n(0 more result(s)...)\n");
        assert_eq!(ranked(&[], 3), "(0 more result(s)...)\n");
    }

    #[test]
    fn test_seeded_rack_repeats() {
        let rack = draw_rack(RACK_SIZE, Some(11));
        assert_eq!(rack.total(), RACK_SIZE);
        assert_eq!(draw_rack(RACK_SIZE, Some(11)), rack);
        assert_eq!(draw_rack(3, None).total(), 3);
    }

    #[test]
    fn test_rack_subcommand_parses() {
        let cli = Cli::try_parse_from(["tilescan", "rack", "-n", "9", "--seed", "4"]).unwrap();
        assert!(matches!(cli.command, Command::Rack { size: 9, seed: Some(4) }));
        let cli = Cli::try_parse_from(["tilescan", "rack"]).unwrap();
        assert!(matches!(cli.command, Command::Rack { size: RACK_SIZE, seed: None }));
    }
}

use clap::Parser;
use std::process::ExitCode;

use wordfinder::{execute_query, MatchResult, QueryOutput, ResultKind, WordIndex};

/// Wordfinder pattern and equation search
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The query to run (e.g., "c.t", "/act.", "A=(4:*);A;~A")
    query: String,

    /// Path to the wordlist file (one word per line)
    #[arg(short, long)]
    wordlist: String,

    /// Maximum number of results to return
    #[arg(short = 'n', long, default_value_t = 1000)]
    num_results: usize,

    /// Query timeout in seconds
    #[arg(short = 't', long, default_value_t = 120)]
    timeout_secs: u64,
}

/// Entry point of the wordfinder CLI.
///
/// Delegates to [`try_main`], catching any errors and printing them
/// before exiting with code 1.
fn main() -> ExitCode {
    // Set up logging
    let debug_enabled = std::env::var("WORDFINDER_DEBUG").is_ok();
    wordfinder::log::init_logger(debug_enabled);

    if let Err(e) = try_main() {
        eprintln!("Error: {e}");
        // Exit explicitly with a nonzero code so scripts can detect failure
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Core application logic for the wordfinder CLI.
///
/// Loads the wordlist (falling back to an empty index on failure, which the
/// engine reports as a "no wordlist" error), runs the query, and renders the
/// output as text.
fn try_main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let index = WordIndex::load_or_empty(&cli.wordlist);
    let timeout = std::time::Duration::from_secs(cli.timeout_secs);

    let output = execute_query(&cli.query, &index, cli.num_results, timeout);

    render(&output);

    match output.kind {
        ResultKind::Timeout | ResultKind::Error => Err(format!("query ended: {}", output.kind).into()),
        _ => Ok(()),
    }
}

/// Print a query output as text: diagnostics to stderr, results to stdout.
fn render(output: &QueryOutput) {
    for diagnostic in &output.diagnostics {
        eprintln!("warning: {}", diagnostic.display_detailed());
    }

    match (&output.kind, &output.results) {
        (ResultKind::Timeout, _) => {
            eprintln!(
                "Query timed out after {:.1}s; no results returned",
                output.elapsed.as_secs_f64()
            );
        }
        (ResultKind::Error, _) => {
            eprintln!("Query failed; no results returned");
        }
        (ResultKind::DefinitionOnly, _) => {
            println!("Variable definitions parsed; add a search clause to find words");
        }
        (kind, Some(results)) => {
            println!(
                "{} result(s) ({kind}) in {:.3}s",
                results.len(),
                output.elapsed.as_secs_f64()
            );
            for result in results {
                println!("{}", format_result(result));
            }
        }
        // a normal kind never carries None
        (_, None) => eprintln!("Query produced no result set"),
    }
}

fn format_result(result: &MatchResult) -> String {
    let mut line = match &result.secondary {
        Some(secondary) => format!("{} / {}", result.primary, secondary),
        None => result.primary.clone(),
    };
    if !result.bindings.is_empty() {
        let bound: Vec<String> =
            result.bindings.iter().map(|(name, value)| format!("{name}={value}")).collect();
        line.push_str(&format!("    ({})", bound.join(", ")));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_format_plain_result() {
        let r = MatchResult { primary: "cat".into(), secondary: None, bindings: BTreeMap::new() };
        assert_eq!(format_result(&r), "cat");
    }

    #[test]
    fn test_format_pair_with_bindings() {
        let r = MatchResult {
            primary: "pots".into(),
            secondary: Some("stop".into()),
            bindings: BTreeMap::from([('A', "po".to_string()), ('B', "ts".to_string())]),
        };
        assert_eq!(format_result(&r), "pots / stop    (A=po, B=ts)");
    }
}

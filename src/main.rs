use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use std::env;
use std::io::{self, Read};
use std::process;
use tracing::{error, info, warn, Level};

use scoresheet::parser::{self, Strategy};
use scoresheet::utils::{pdf, text};
use scoresheet::ParseResult;

const DEFAULT_MAX_CHARS: usize = 4000;

/// Prints a formatted box with the given lines
/// Empty strings create empty lines, other strings are centered within the box
fn print_box(lines: &[&str]) {
    const BOX_WIDTH: usize = 60;
    const CONTENT_WIDTH: usize = BOX_WIDTH - 4;

    eprintln!("\n\x1b[36m╔{}╗", "═".repeat(BOX_WIDTH - 2));

    for line in lines {
        if line.is_empty() {
            eprintln!("║{}║", " ".repeat(BOX_WIDTH - 2));
            continue;
        }
        let visible_len = strip_ansi_codes(line).chars().count();
        if visible_len < CONTENT_WIDTH {
            let total_padding = CONTENT_WIDTH - visible_len;
            let left_padding = total_padding / 2;
            let right_padding = total_padding - left_padding;
            eprintln!(
                "║  {}{}{}\x1b[36m║",
                " ".repeat(left_padding),
                line,
                " ".repeat(right_padding)
            );
        } else {
            eprintln!("║  {}\x1b[36m  ║", line);
        }
    }

    eprintln!("╚{}╝\x1b[0m\n", "═".repeat(BOX_WIDTH - 2));
}

/// Strips ANSI escape codes to calculate visible text length
fn strip_ansi_codes(text: &str) -> String {
    let mut result = String::new();
    let mut chars = text.chars();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' {
            if chars.next() == Some('[') {
                for c in chars.by_ref() {
                    if c.is_ascii_alphabetic() {
                        break;
                    }
                }
            }
        } else {
            result.push(ch);
        }
    }

    result
}

fn build_cli() -> Command {
    Command::new("scoresheet")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Parse quiz scoreboard text into structured team results")
        .long_about(
            "Reads text extracted from a quiz scoreboard PDF (or the PDF itself) and prints\n\
            the parsed teams as JSON on stdout.\n\
            Strategies:\n\
            - auto: probe the layout and fall back between parsers\n\
            - tabular: rank, name, flags and score on one line\n\
            - split: names block followed by a separate score block\n\
            - unified: [Name (flags)], 1. Name (flags) and Name (flags) rows",
        )
        .arg(
            Arg::new("input")
                .value_name("INPUT")
                .help("Text or PDF file to parse ('-' or omitted reads stdin)"),
        )
        .arg(
            Arg::new("strategy")
                .long("strategy")
                .short('s')
                .value_name("STRATEGY")
                .help("auto, tabular, split or unified (env: SCORESHEET_STRATEGY)")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("pdf")
                .long("pdf")
                .help("Treat the input as a PDF even without a %PDF- header")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("preview")
                .long("preview")
                .help("Print the diagnostics preview (line sample + summary) instead of the result")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("max-chars")
                .long("max-chars")
                .value_name("N")
                .help("Raw text characters kept in the preview (env: SCORESHEET_MAX_CHARS, default 4000)")
                .value_parser(clap::value_parser!(usize))
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("pretty")
                .long("pretty")
                .help("Pretty-print the JSON output")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .help("Only log errors and skip the summary box")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log per-step parser details")
                .action(clap::ArgAction::SetTrue),
        )
}

/// Reads the input and returns plain text, extracting it from PDF bytes when needed.
fn load_text(matches: &ArgMatches) -> Result<String> {
    let path = matches.get_one::<String>("input").filter(|p| p.as_str() != "-");

    let bytes = match path {
        Some(p) => std::fs::read(p).with_context(|| format!("failed to read {}", p))?,
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };

    if matches.get_flag("pdf") || pdf::is_pdf(&bytes) {
        info!(size = bytes.len(), "Extracting text from PDF input");
        return Ok(pdf::safe_extract_text(&bytes));
    }

    text::decode_to_utf8(&bytes).context("input is not decodable text")
}

fn resolve_strategy(matches: &ArgMatches) -> Result<Strategy> {
    match matches
        .get_one::<String>("strategy")
        .cloned()
        .or_else(|| env::var("SCORESHEET_STRATEGY").ok())
    {
        Some(raw) => Ok(raw.parse::<Strategy>()?),
        None => Ok(Strategy::Auto),
    }
}

fn resolve_max_chars(matches: &ArgMatches) -> usize {
    matches
        .get_one::<usize>("max-chars")
        .copied()
        .or_else(|| {
            env::var("SCORESHEET_MAX_CHARS")
                .ok()
                .and_then(|v| v.trim().parse().ok())
        })
        .unwrap_or(DEFAULT_MAX_CHARS)
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(out)
}

fn print_summary(result: &ParseResult, strategy: Strategy) {
    let teams = format!("Teams: {}   Players: {}", result.team_count, result.player_count);
    let used = format!("\x1b[90mStrategy: {}\x1b[0m", strategy);
    let status = if result.is_empty() {
        "\x1b[1m\x1b[31m No teams parsed \x1b[0m"
    } else {
        "\x1b[1m\x1b[32m Scoreboard parsed \x1b[0m"
    };
    print_box(&["", status, "", &teams, &used, ""]);
}

fn run(matches: &ArgMatches) -> Result<()> {
    let strategy = resolve_strategy(matches)?;
    let raw = load_text(matches)?;
    let pretty = matches.get_flag("pretty");

    let (used, result) = if matches.get_flag("preview") {
        let report = parser::preview(&raw, resolve_max_chars(matches), strategy);
        println!("{}", to_json(&report, pretty)?);
        let used = report.strategy.parse().unwrap_or(strategy);
        (used, report.parsed)
    } else {
        let (used, result) = parser::parse_detailed(&raw, strategy);
        println!("{}", to_json(&result, pretty)?);
        (used, result)
    };

    if result.is_empty() {
        warn!("No teams parsed; the document needs a manual look");
    }
    if !matches.get_flag("quiet") {
        print_summary(&result, used);
    }
    Ok(())
}

fn main() {
    let matches = build_cli().get_matches();

    // stdout carries the JSON; logs go to stderr.
    let level = if matches.get_flag("quiet") {
        Level::ERROR
    } else if matches.get_flag("verbose") {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .init();

    if let Err(e) = run(&matches) {
        error!("{:#}", e);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_ansi_sequences() {
        assert_eq!(strip_ansi_codes("\x1b[1m\x1b[31m Bold \x1b[0m"), " Bold ");
        assert_eq!(strip_ansi_codes("plain"), "plain");
    }

    #[test]
    fn cli_parses_strategy_and_flags() {
        let matches = build_cli()
            .try_get_matches_from(["scoresheet", "--strategy", "split", "--pretty", "board.txt"])
            .expect("valid args");
        assert_eq!(resolve_strategy(&matches).expect("strategy"), Strategy::Split);
        assert!(matches.get_flag("pretty"));
        assert_eq!(
            matches.get_one::<String>("input").map(String::as_str),
            Some("board.txt")
        );
    }

    #[test]
    fn cli_rejects_unknown_strategy() {
        let matches = build_cli()
            .try_get_matches_from(["scoresheet", "--strategy", "columns"])
            .expect("valid args");
        assert!(resolve_strategy(&matches).is_err());
    }

    #[test]
    fn max_chars_flag_wins() {
        let matches = build_cli()
            .try_get_matches_from(["scoresheet", "--max-chars", "120"])
            .expect("valid args");
        assert_eq!(resolve_max_chars(&matches), 120);
    }
}

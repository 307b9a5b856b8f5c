use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info};

use crate::model::ParseResult;
use crate::parser::normalize_newlines;
use crate::parser::split::parse_split;
use crate::parser::tabular::parse_tabular;
use crate::parser::unified::parse_unified;

/// Rank, a name that does not start with a digit, a flag group, then
/// something ending in an integer score.
static TABULAR_PROBE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*\d+\s+[^(\d\n][^(\n]*?\s*\(\s*[\d\sTV]+\s*\)\s+.*?-?\d+\s*$")
        .expect("Failed to create tabular_probe regex")
});

/// Column captions printed only by the single-line tabular engines.
const TABULAR_ENGINE_MARKERS: &[&str] = &["Team/player", "Time (s) Score"];

/// More than this many probe hits selects the tabular/split pair.
const TABULAR_PROBE_THRESHOLD: usize = 2;

/// Which parse strategy to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strategy {
    /// Probe the text and pick, falling back to the others on an empty result.
    #[default]
    Auto,
    /// Single-line rows with the score at the end.
    Tabular,
    /// Names block followed by a separate score block.
    Split,
    /// Bracket / ranked / loose `Name (flags)` rows.
    Unified,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Auto => "auto",
            Strategy::Tabular => "tabular",
            Strategy::Split => "split",
            Strategy::Unified => "unified",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown strategy '{0}' (expected auto, tabular, split or unified)")]
pub struct UnknownStrategy(pub String);

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Strategy::Auto),
            "tabular" => Ok(Strategy::Tabular),
            "split" => Ok(Strategy::Split),
            "unified" => Ok(Strategy::Unified),
            _ => Err(UnknownStrategy(s.to_string())),
        }
    }
}

/// Parses extracted scoreboard text, choosing the strategy automatically.
///
/// Never fails: text with nothing usable yields an empty result.
///
/// Only dense tabular text (or the tabular engine markers) routes to the
/// tabular/split pair. A short names-then-scores document such as
/// `1 Team (5)` lines followed by a score block is classified as unified, which
/// already finds the teams, so split alignment never runs and scores stay
/// unset. Use `parse_with(raw, Strategy::Split)` for that layout.
pub fn parse(raw: &str) -> ParseResult {
    parse_with(raw, Strategy::Auto)
}

/// Parses with a caller-selected strategy.
pub fn parse_with(raw: &str, strategy: Strategy) -> ParseResult {
    parse_detailed(raw, strategy).1
}

/// Parses and also reports which concrete strategy produced the result.
pub fn parse_detailed(raw: &str, strategy: Strategy) -> (Strategy, ParseResult) {
    if raw.trim().is_empty() {
        let used = match strategy {
            Strategy::Auto => Strategy::Unified,
            other => other,
        };
        return (used, ParseResult::empty());
    }

    let text = normalize_newlines(raw);
    let lines: Vec<&str> = text.split('\n').collect();

    let order: &[Strategy] = match strategy {
        Strategy::Auto if prefers_tabular(&text, &lines) => {
            info!("Detected tabular format");
            &[Strategy::Tabular, Strategy::Split, Strategy::Unified]
        }
        Strategy::Auto => {
            info!("Detected bracket/ranked/loose format");
            &[Strategy::Unified, Strategy::Tabular, Strategy::Split]
        }
        Strategy::Tabular => &[Strategy::Tabular],
        Strategy::Split => &[Strategy::Split],
        Strategy::Unified => &[Strategy::Unified],
    };

    for &candidate in order {
        let result = run(candidate, &text, &lines);
        if !result.is_empty() {
            info!(
                strategy = candidate.as_str(),
                teams = result.team_count,
                players = result.player_count,
                "Parsed scoreboard"
            );
            return (candidate, result);
        }
        debug!(strategy = candidate.as_str(), "Strategy found no teams");
    }

    (order[0], ParseResult::empty())
}

/// Picks between the tabular/split pair and the unified path without parsing.
pub fn select_strategy(raw: &str) -> Strategy {
    let text = normalize_newlines(raw);
    let lines: Vec<&str> = text.split('\n').collect();
    if prefers_tabular(&text, &lines) {
        Strategy::Tabular
    } else {
        Strategy::Unified
    }
}

/// Number of lines shaped like a full tabular row, counted up to one past the
/// threshold.
pub fn tabular_density(lines: &[&str]) -> usize {
    lines
        .iter()
        .filter(|l| TABULAR_PROBE.is_match(l))
        .take(TABULAR_PROBE_THRESHOLD + 1)
        .count()
}

fn prefers_tabular(text: &str, lines: &[&str]) -> bool {
    tabular_density(lines) > TABULAR_PROBE_THRESHOLD
        || TABULAR_ENGINE_MARKERS.iter().any(|m| text.contains(m))
}

fn run(strategy: Strategy, text: &str, lines: &[&str]) -> ParseResult {
    match strategy {
        Strategy::Tabular => ParseResult::from_teams(parse_tabular(lines)),
        Strategy::Split => parse_split(lines),
        // Auto is resolved by the caller; unified is the default path.
        Strategy::Unified | Strategy::Auto => parse_unified(text),
    }
}

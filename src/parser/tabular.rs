// Single-line rows: rank, name, optional flags, skipped numeric columns, score.
// Built for engines that print e.g. "1 Jeneral Knowledge (6T) 4 174.37 1967",
// where the middle numbers are keypad id and elapsed time.

use once_cell::sync::Lazy;
use tracing::debug;

use crate::model::{ParsedTeam, TeamCandidate};
use crate::parser::finalize::finalize;
use crate::parser::flags::extract_flags;
use crate::parser::noise::is_noise;
use crate::parser::rows::{is_flagged_whammy, LineMatcher, NameTrim};

static TABULAR_ROW: Lazy<LineMatcher> = Lazy::new(|| {
    LineMatcher::new(
        "tabular",
        r"(?xi)
        ^\s*
        (?P<rank>\d+)
        \s+
        (?P<name>[^(\n]+?)
        \s*
        (?:\(\s*(?P<flags>[\d\sTV]*)\s*\))?
        \s*
        (?:[\d.]+\s+)*
        (?P<score>-?\d+)
        \s*$",
        NameTrim::Dashes,
    )
});

/// Parses single-line rows, trusting only lines that match the full row shape.
pub fn parse_tabular(lines: &[&str]) -> Vec<ParsedTeam> {
    finalize(tabular_candidates(lines)).teams
}

fn tabular_candidates(lines: &[&str]) -> Vec<TeamCandidate> {
    let mut items: Vec<TeamCandidate> = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        let s = line.trim();
        if is_noise(s) {
            continue;
        }
        let Some(cap) = TABULAR_ROW.capture(s) else {
            continue;
        };
        if cap.name.is_empty() {
            continue;
        }

        let flags = extract_flags(cap.flags.as_deref().unwrap_or(""));
        if is_flagged_whammy(&cap.name, flags.players) {
            debug!(line = i, "Skipping Whammy placeholder row");
            continue;
        }

        let position = cap
            .rank
            .filter(|&r| r > 0)
            .unwrap_or(items.len() as u32 + 1);
        items.push(TeamCandidate {
            name: cap.name,
            score: cap.score,
            player_count: flags.players.unwrap_or(0),
            is_tournament: flags.is_tournament,
            is_visiting: flags.is_visiting,
            position: Some(position),
            source_line: i,
        });
    }

    debug!(rows = items.len(), "Tabular rows accepted");
    items
}

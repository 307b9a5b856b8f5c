// Split layout: team identities in one block, scores in a later block.

use once_cell::sync::Lazy;
use tracing::debug;

use crate::model::{ParseResult, TeamCandidate};
use crate::parser::align::align_scores;
use crate::parser::finalize::finalize;
use crate::parser::flags::extract_flags;
use crate::parser::noise::is_noise;
use crate::parser::rows::{is_bare_whammy, is_flagged_whammy, LineMatcher, NameTrim};

static TEAM_WITH_FLAGS: Lazy<LineMatcher> = Lazy::new(|| {
    LineMatcher::new(
        "split-flags",
        r"(?xi)
        ^\s*
        (?P<rank>\d+)?
        \s*
        (?P<name>[^(\n]+?)
        \s*\(\s*(?P<flags>[\d\sTV]*)\s*\)
        \s*$",
        NameTrim::Dashes,
    )
});

static LOOSE_TEAM_NAME: Lazy<LineMatcher> = Lazy::new(|| {
    LineMatcher::new(
        "split-loose",
        r"(?xi)
        ^\s*
        (?P<rank>\d+)?
        \s*
        (?P<name>[A-Za-z0-9\s-]{2,})
        \s*$",
        NameTrim::Dashes,
    )
});

/// Parses the names-then-scores layout.
///
/// Ranked teams come first in rank order, unranked ones follow in line order,
/// and positions are then renumbered `1..=n`. Lines must keep their blank
/// separators: the score column is located by splitting the joined text on
/// blank lines.
pub fn parse_split(lines: &[&str]) -> ParseResult {
    let mut result = finalize(discover_teams(lines));
    let outcome = align_scores(&lines.join("\n"), &mut result.teams);
    debug!(?outcome, teams = result.team_count, "Split-format score alignment");
    result
}

fn discover_teams(lines: &[&str]) -> Vec<TeamCandidate> {
    let mut found: Vec<TeamCandidate> = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        let s = line.trim();
        if is_noise(s) {
            continue;
        }

        if let Some(cap) = TEAM_WITH_FLAGS.capture(s) {
            if cap.name.is_empty() {
                continue;
            }
            let flags = extract_flags(cap.flags.as_deref().unwrap_or(""));
            if is_flagged_whammy(&cap.name, flags.players) {
                continue;
            }
            found.push(TeamCandidate {
                name: cap.name,
                score: None,
                player_count: flags.players.unwrap_or(0),
                is_tournament: flags.is_tournament,
                is_visiting: flags.is_visiting,
                position: cap.rank.filter(|&r| r > 0),
                source_line: i,
            });
            continue;
        }

        let Some(cap) = LOOSE_TEAM_NAME.capture(s) else {
            continue;
        };
        // Bare numbers are score-column entries, not names.
        if !cap.name.chars().any(|c| c.is_ascii_alphabetic()) || is_bare_whammy(&cap.name) {
            continue;
        }
        let lower = cap.name.to_lowercase();
        if found.iter().any(|t| t.name.to_lowercase() == lower) {
            continue;
        }
        found.push(TeamCandidate {
            name: cap.name,
            score: None,
            player_count: 0,
            is_tournament: false,
            is_visiting: false,
            position: cap.rank.filter(|&r| r > 0),
            source_line: i,
        });
    }

    debug!(candidates = found.len(), "Split-format team discovery");
    found
}

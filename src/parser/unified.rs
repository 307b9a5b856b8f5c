// Best-effort path for engines that print one team per line with a flag group:
// "[Name (5T)] 1200", "3. Name (4)", "3) Name (4) - 980" or "Name (6V)".

use once_cell::sync::Lazy;
use std::collections::HashSet;
use tracing::debug;

use crate::model::{ParseResult, ParsedTeam, TeamCandidate};
use crate::parser::align::align_scores_sized;
use crate::parser::finalize::{dedupe_by_name, renumber};
use crate::parser::flags::extract_flags;
use crate::parser::noise::is_noise;
use crate::parser::normalize_newlines;
use crate::parser::rows::{first_capture, prune_dense_page, LineMatcher, NameTrim};

/// Pattern tiers in priority order; the first one that matches a line wins.
static UNIFIED_MATCHERS: Lazy<Vec<LineMatcher>> = Lazy::new(|| {
    vec![
        LineMatcher::new(
            "bracket",
            r"(?x)
            ^\s*\[\s*(?P<name>.+?)\s*\(\s*(?P<flags>[\d\sTVtv]+)\s*\)\s*\]
            (?:\s+[-–—]?\s*(?P<score>-?\d+))?\s*$",
            NameTrim::Whitespace,
        ),
        LineMatcher::new(
            "ranked",
            r"(?x)
            ^\s*(?:(?P<rank>\d+)[.)]\s+)?
            (?P<name>[^(\[]+?)
            \s*\(\s*(?P<flags>[\d\sTVtv]+)\s*\)
            (?:\s+[-–—]?\s*(?P<score>-?\d+))?\s*$",
            NameTrim::Dashes,
        ),
        LineMatcher::new(
            "loose",
            r"(?x)
            ^\s*(?P<name>.+?)\s*\(\s*(?P<flags>[\d\sTVtv]+)\s*\)
            (?:\s+[-–—]?\s*(?P<score>-?\d+))?\s*$",
            NameTrim::Dashes,
        ),
    ]
});

/// Parses bracket, ranked and loose `Name (flags) score?` lines.
///
/// Lines without a flag group are ignored. Unranked rows are numbered by a
/// running counter over all accepted lines, and so are rows whose printed rank
/// exceeds the number of lines in the document. Duplicate positions move
/// forward to the next free slot. Missing scores come from the size-aware
/// aligner.
pub fn parse_unified(raw: &str) -> ParseResult {
    if raw.trim().is_empty() {
        return ParseResult::empty();
    }
    let text = normalize_newlines(raw);

    let lines: Vec<&str> = text.split('\n').collect();
    let max_rank = u32::try_from(lines.len()).unwrap_or(u32::MAX);

    let mut candidates: Vec<TeamCandidate> = Vec::new();
    let mut seq = 0u32;
    for (i, line) in lines.iter().enumerate() {
        let s = line.trim();
        if is_noise(s) {
            continue;
        }
        let Some((matcher, cap)) = first_capture(&UNIFIED_MATCHERS, s) else {
            continue;
        };
        let Some(flags_raw) = cap.flags.as_deref().filter(|f| !f.is_empty()) else {
            continue;
        };
        if cap.name.is_empty() {
            continue;
        }

        let flags = extract_flags(flags_raw);
        seq = seq.saturating_add(1);
        debug!(line = i, pattern = matcher.label, name = %cap.name, "Matched team row");
        candidates.push(TeamCandidate {
            name: cap.name,
            score: cap.score,
            player_count: flags.players.unwrap_or(0),
            is_tournament: flags.is_tournament,
            is_visiting: flags.is_visiting,
            position: Some(cap.rank.filter(|&r| r > 0 && r <= max_rank).unwrap_or(seq)),
            source_line: i,
        });
    }

    prune_dense_page(&mut candidates);
    let mut teams = assign_unique_positions(dedupe_by_name(candidates));

    let outcome = align_scores_sized(&text, &mut teams);
    debug!(?outcome, teams = teams.len(), "Unified score alignment");

    renumber(teams)
}

/// Resolves duplicate positions by walking forward to the next unused one,
/// wrapping to 1 past `u32::MAX`.
fn assign_unique_positions(candidates: Vec<TeamCandidate>) -> Vec<ParsedTeam> {
    let mut taken = HashSet::new();
    candidates
        .into_iter()
        .map(|c| {
            let mut position = c.position.unwrap_or(1);
            while !taken.insert(position) {
                position = position.checked_add(1).unwrap_or(1);
            }
            c.into_team(position)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bracket_ranked_and_loose_rows() {
        let raw = "Fall Quiz League\n\
                   [Quiz Ninjas (5T)] 1500\n\
                   2. Brain Freeze (4) - 1320\n\
                   3) The Know-Nothings (6V) 1100\n\
                   Late Arrivals (3)\n";
        let result = parse_unified(raw);
        assert_eq!(result.team_count, 4);

        let ninjas = &result.teams[0];
        assert_eq!(ninjas.name, "Quiz Ninjas");
        assert_eq!(ninjas.score, Some(1500));
        assert!(ninjas.is_tournament);

        assert_eq!(result.teams[1].name, "Brain Freeze");
        assert_eq!(result.teams[1].score, Some(1320));
        assert_eq!(result.teams[2].name, "The Know-Nothings");
        assert!(result.teams[2].is_visiting);
        assert_eq!(result.teams[3].name, "Late Arrivals");
        assert_eq!(result.teams[3].score, None);
        assert_eq!(result.player_count, 18);
    }

    #[test]
    fn lines_without_flags_are_ignored() {
        let result = parse_unified("Quiz Ninjas 1500\nBrain Freeze (4) 1320\n");
        assert_eq!(result.team_count, 1);
        assert_eq!(result.teams[0].name, "Brain Freeze");
    }

    #[test]
    fn duplicate_ranks_walk_forward() {
        let raw = "1. Alpha (3) 900\n1. Bravo (3) 800\n2. Charlie (3) 700\n";
        let result = parse_unified(raw);
        let names: Vec<_> = result.teams.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["Alpha", "Bravo", "Charlie"]);
        let positions: Vec<_> = result.teams.iter().map(|t| t.position).collect();
        assert_eq!(positions, [1, 2, 3]);
    }

    #[test]
    fn oversized_ranks_fall_back_to_line_order() {
        let raw = "4294967295. Alpha (3) 900\n4294967295. Bravo (3) 800\n";
        let result = parse_unified(raw);
        let rows: Vec<_> = result
            .teams
            .iter()
            .map(|t| (t.name.as_str(), t.position, t.score))
            .collect();
        assert_eq!(rows, [("Alpha", 1, Some(900)), ("Bravo", 2, Some(800))]);
    }

    #[test]
    fn position_walk_wraps_instead_of_overflowing() {
        let candidate = |name: &str, line| TeamCandidate {
            name: name.to_string(),
            score: None,
            player_count: 1,
            is_tournament: false,
            is_visiting: false,
            position: Some(u32::MAX),
            source_line: line,
        };
        let teams = assign_unique_positions(vec![candidate("Alpha", 0), candidate("Bravo", 1)]);
        let positions: Vec<_> = teams.iter().map(|t| t.position).collect();
        assert_eq!(positions, [u32::MAX, 1]);
    }

    #[test]
    fn duplicate_names_keep_first_row() {
        let result = parse_unified("Alpha (3) 900\nALPHA (5) 100\n");
        assert_eq!(result.team_count, 1);
        assert_eq!(result.teams[0].player_count, 3);
        assert_eq!(result.teams[0].score, Some(900));
    }

    #[test]
    fn separate_score_column_fills_missing_scores() {
        let raw = "1. Alpha (3)\n2. Bravo (4)\n3. Charlie (2T)\n\n1410\n1200\n990\n";
        let result = parse_unified(raw);
        let scores: Vec<_> = result.teams.iter().map(|t| t.score).collect();
        assert_eq!(scores, [Some(1410), Some(1200), Some(990)]);
    }

    #[test]
    fn windows_line_endings() {
        let result = parse_unified("Alpha (3) 900\r\nBravo (2) 800\r\n");
        assert_eq!(result.team_count, 2);
        assert_eq!(result.teams[1].name, "Bravo");
    }

    #[test]
    fn blank_input_is_empty() {
        assert_eq!(parse_unified(""), ParseResult::empty());
        assert_eq!(parse_unified("\n\n  \n"), ParseResult::empty());
    }
}

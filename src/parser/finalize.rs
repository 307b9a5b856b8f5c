use std::collections::HashSet;

use crate::model::{ParseResult, ParsedTeam, TeamCandidate};
use crate::parser::rows::prune_dense_page;

/// Orders candidates by explicit position (unranked last), then by source line.
pub(crate) fn sort_by_rank(candidates: &mut [TeamCandidate]) {
    candidates.sort_by_key(|c| (c.position.unwrap_or(u32::MAX), c.source_line));
}

/// Keeps the first candidate per case-insensitive name, in the current order.
pub(crate) fn dedupe_by_name(candidates: Vec<TeamCandidate>) -> Vec<TeamCandidate> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|c| seen.insert(c.name.to_lowercase()))
        .collect()
}

/// Final step shared by every strategy.
///
/// Drops dense-page placeholders, orders by rank then line, removes duplicate
/// names and renumbers positions to a gap-free `1..=n`.
pub(crate) fn finalize(mut candidates: Vec<TeamCandidate>) -> ParseResult {
    candidates.retain(|c| !c.name.trim().is_empty());
    prune_dense_page(&mut candidates);
    sort_by_rank(&mut candidates);

    let teams = dedupe_by_name(candidates)
        .into_iter()
        .zip(1u32..)
        .map(|(c, position)| c.into_team(position))
        .collect();

    ParseResult::from_teams(teams)
}

/// Orders teams whose positions are already unique and renumbers them `1..=n`.
pub(crate) fn renumber(mut teams: Vec<ParsedTeam>) -> ParseResult {
    teams.sort_by_key(|t| t.position);
    for (team, position) in teams.iter_mut().zip(1u32..) {
        team.position = position;
    }
    ParseResult::from_teams(teams)
}

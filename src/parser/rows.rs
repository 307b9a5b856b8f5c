// Line matchers and row-level guards shared by the parse strategies.

use regex::Regex;

use crate::model::TeamCandidate;

/// Above this many extracted rows, a page is treated as dense numeric text and
/// placeholder rows without players are dropped.
pub const DENSE_PAGE_LIMIT: usize = 60;

/// Fields pulled out of a single matched line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowCapture {
    pub rank: Option<u32>,
    pub name: String,
    pub flags: Option<String>,
    pub score: Option<i64>,
}

/// How the captured name is cleaned up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameTrim {
    /// Surrounding whitespace only.
    Whitespace,
    /// Surrounding whitespace and dash characters.
    Dashes,
}

/// One pattern tier: a compiled regex with `rank`, `name`, `flags` and `score`
/// groups, any of which may be absent from the pattern.
pub struct LineMatcher {
    pub label: &'static str,
    regex: Regex,
    trim: NameTrim,
}

impl LineMatcher {
    /// Compiles a built-in pattern. Only called from `Lazy` statics with
    /// literal patterns, so a bad pattern is a programming error.
    pub fn new(label: &'static str, pattern: &str, trim: NameTrim) -> Self {
        let regex = Regex::new(pattern)
            .unwrap_or_else(|e| panic!("Failed to compile {} pattern: {}", label, e));
        Self { label, regex, trim }
    }

    pub fn capture(&self, line: &str) -> Option<RowCapture> {
        let caps = self.regex.captures(line)?;
        let raw_name = caps.name("name").map_or("", |m| m.as_str());
        let name = match self.trim {
            NameTrim::Whitespace => raw_name.trim(),
            NameTrim::Dashes => trim_name(raw_name),
        };
        Some(RowCapture {
            rank: caps.name("rank").and_then(|m| m.as_str().parse().ok()),
            name: name.to_string(),
            flags: caps.name("flags").map(|m| m.as_str().to_string()),
            score: caps.name("score").and_then(|m| m.as_str().parse().ok()),
        })
    }
}

/// Tries each matcher in order and returns the first capture.
pub fn first_capture<'a>(
    matchers: &'a [LineMatcher],
    line: &str,
) -> Option<(&'a LineMatcher, RowCapture)> {
    matchers
        .iter()
        .find_map(|m| m.capture(line).map(|cap| (m, cap)))
}

pub fn trim_name(raw: &str) -> &str {
    raw.trim_matches(|c: char| matches!(c, ' ' | '\t' | '-' | '–' | '—'))
}

/// A "Whammy" row that carries a flag group but no recorded player count.
/// Names starting with `TEAM` are real teams.
pub fn is_flagged_whammy(name: &str, players: Option<u32>) -> bool {
    let upper = name.to_uppercase();
    upper.contains("WHAMMY") && players.is_none() && !upper.starts_with("TEAM")
}

/// A bare "Whammy" row without any flag group. Only `TEAM ` (with the
/// trailing space) exempts it, which is stricter than the flagged guard.
pub fn is_bare_whammy(name: &str) -> bool {
    let upper = name.to_uppercase();
    upper.contains("WHAMMY") && !upper.starts_with("TEAM ")
}

/// Empty names, names with no letters at all, and the Whammy placeholder.
pub fn is_placeholder_name(name: &str) -> bool {
    let name = name.trim();
    name.is_empty() || !name.chars().any(char::is_alphabetic) || is_bare_whammy(name)
}

/// Drops playerless placeholder rows once a page yields more rows than any
/// real scoreboard would.
pub(crate) fn prune_dense_page(candidates: &mut Vec<TeamCandidate>) {
    if candidates.len() <= DENSE_PAGE_LIMIT {
        return;
    }
    let before = candidates.len();
    candidates.retain(|c| !(c.player_count == 0 && is_placeholder_name(&c.name)));
    tracing::debug!(
        before,
        after = candidates.len(),
        "Pruned placeholder rows from dense page"
    );
}

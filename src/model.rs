use serde::{Deserialize, Serialize};

/// One team row of a parsed scoreboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedTeam {
    pub name: String,
    pub score: Option<i64>,
    #[serde(rename = "playerCount")]
    pub player_count: u32,
    #[serde(rename = "isTournament")]
    pub is_tournament: bool,
    #[serde(rename = "isVisiting")]
    pub is_visiting: bool,
    pub position: u32,
}

/// Aggregate returned by every parse strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseResult {
    pub teams: Vec<ParsedTeam>,
    #[serde(rename = "teamCount")]
    pub team_count: usize,
    #[serde(rename = "playerCount")]
    pub player_count: u64,
}

impl ParseResult {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds the aggregate from teams that are already ordered and numbered.
    pub fn from_teams(teams: Vec<ParsedTeam>) -> Self {
        let player_count = teams.iter().map(|t| u64::from(t.player_count)).sum();
        Self {
            team_count: teams.len(),
            player_count,
            teams,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}

/// Intermediate record shared by the strategies before finalization.
///
/// `position` stays `None` until a strategy assigns one; `source_line` is only
/// used as a tie-breaker and never leaves the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TeamCandidate {
    pub name: String,
    pub score: Option<i64>,
    pub player_count: u32,
    pub is_tournament: bool,
    pub is_visiting: bool,
    pub position: Option<u32>,
    pub source_line: usize,
}

impl TeamCandidate {
    pub fn into_team(self, position: u32) -> ParsedTeam {
        ParsedTeam {
            name: self.name,
            score: self.score,
            player_count: self.player_count,
            is_tournament: self.is_tournament,
            is_visiting: self.is_visiting,
            position,
        }
    }
}

/// One line of the diagnostics sample: its index, raw text, and whether the
/// noise classifier kept it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSample {
    pub i: usize,
    pub text: String,
    pub keep: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewSummary {
    #[serde(rename = "teamsFound")]
    pub teams_found: usize,
    #[serde(rename = "playersTotal")]
    pub players_total: u64,
}

/// Diagnostics payload: what the parser saw and what it produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsePreview {
    #[serde(rename = "rawLength")]
    pub raw_length: usize,
    #[serde(rename = "rawText")]
    pub raw_text: String,
    #[serde(rename = "lineCount")]
    pub line_count: usize,
    #[serde(rename = "lineSample")]
    pub line_sample: Vec<LineSample>,
    pub parsed: ParseResult,
    pub summary: PreviewSummary,
    pub strategy: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_camel_case_field_names() {
        let result = ParseResult::from_teams(vec![ParsedTeam {
            name: "Quiz Ninjas".to_string(),
            score: Some(1200),
            player_count: 5,
            is_tournament: true,
            is_visiting: false,
            position: 1,
        }]);
        let value = serde_json::to_value(&result).expect("serializable");
        assert_eq!(value["teamCount"], 1);
        assert_eq!(value["playerCount"], 5);
        let team = &value["teams"][0];
        assert_eq!(team["name"], "Quiz Ninjas");
        assert_eq!(team["score"], 1200);
        assert_eq!(team["playerCount"], 5);
        assert_eq!(team["isTournament"], true);
        assert_eq!(team["isVisiting"], false);
        assert_eq!(team["position"], 1);
    }

    #[test]
    fn missing_score_serializes_as_null() {
        let result = ParseResult::from_teams(vec![ParsedTeam {
            name: "Brain Freeze".to_string(),
            score: None,
            player_count: 0,
            is_tournament: false,
            is_visiting: false,
            position: 1,
        }]);
        let json = serde_json::to_string(&result).expect("serializable");
        assert!(json.contains("\"score\":null"));
    }

    #[test]
    fn empty_result_has_zero_counts() {
        let result = ParseResult::empty();
        assert!(result.is_empty());
        assert_eq!(result.team_count, 0);
        assert_eq!(result.player_count, 0);
    }
}

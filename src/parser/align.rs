// Score-column alignment.
//
// Some engines print team identities in one block and the score column in a
// later block. Both aligners split the text on blank lines, pick the segment
// that most looks like that score column and copy its numbers onto teams.
// They are tuned for different document shapes and are kept apart:
// - `align_scores`: ratio/header based, assigns in team order.
// - `align_scores_sized`: digit-length based, assigns by position.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::model::ParsedTeam;

static SEGMENT_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n").expect("Failed to create segment_break regex"));
static INT_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-+]?\d+$").expect("Failed to create int_line regex"));
static SIGNED_INT_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?\d+$").expect("Failed to create signed_int_line regex"));
static DECIMAL_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?\d+\.\d+$").expect("Failed to create decimal_line regex"));

const HEADER_MIN_INT_RATIO: f64 = 0.7;
const SIZED_MIN_INT_RATIO: f64 = 0.6;
const SIZED_MAX_DECIMAL_RATIO: f64 = 0.2;
const SIZED_MIN_SCORES: usize = 3;

/// What an alignment pass did. Alignment never fails the parse; when nothing
/// fits, teams are left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignOutcome {
    NoTeams,
    NoScoreBlock,
    Applied { assigned: usize, block_len: usize },
}

/// Non-blank, trimmed lines of each blank-line-delimited segment.
fn segments(text: &str) -> Vec<Vec<&str>> {
    SEGMENT_BREAK
        .split(text)
        .map(|seg| {
            seg.lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .collect::<Vec<_>>()
        })
        .filter(|lines| !lines.is_empty())
        .collect()
}

#[derive(Debug)]
struct RatioBlock {
    scores: Vec<i64>,
    has_header: bool,
}

fn classify_ratio_block(lines: &[&str]) -> Option<RatioBlock> {
    let has_header = lines.iter().take(2).any(|l| {
        let upper = l.to_uppercase();
        upper.contains("SCORE") || upper.contains("POINTS")
    });

    let scores: Vec<i64> = lines
        .iter()
        .filter(|l| INT_LINE.is_match(l))
        .filter_map(|l| l.parse().ok())
        .collect();

    let ratio = scores.len() as f64 / lines.len() as f64;
    (has_header || ratio >= HEADER_MIN_INT_RATIO).then_some(RatioBlock { scores, has_header })
}

/// Ratio-based aligner used by the split-block parser.
///
/// A segment is a score block if one of its first two lines names a score or
/// points column, or at least 70% of its lines are bare integers. The block
/// with the most integers wins (header breaks ties, then document order), and
/// its values go to `teams` in slice order.
pub fn align_scores(full_text: &str, teams: &mut [ParsedTeam]) -> AlignOutcome {
    if teams.is_empty() {
        return AlignOutcome::NoTeams;
    }

    let mut best: Option<RatioBlock> = None;
    for block in segments(full_text)
        .iter()
        .filter_map(|lines| classify_ratio_block(lines))
    {
        let better = match &best {
            None => true,
            Some(cur) => (block.scores.len(), block.has_header) > (cur.scores.len(), cur.has_header),
        };
        if better {
            best = Some(block);
        }
    }

    let Some(block) = best.filter(|b| !b.scores.is_empty()) else {
        debug!(teams = teams.len(), "No score block found");
        return AlignOutcome::NoScoreBlock;
    };

    let assigned = block.scores.len().min(teams.len());
    for (team, &score) in teams.iter_mut().zip(&block.scores) {
        team.score = Some(score);
    }
    debug!(
        teams = teams.len(),
        block_len = block.scores.len(),
        assigned,
        "Aligned score block by order"
    );
    AlignOutcome::Applied {
        assigned,
        block_len: block.scores.len(),
    }
}

#[derive(Debug)]
struct SizedBlock {
    scores: Vec<i64>,
    properly_sized: usize,
}

/// Keeps 2-digit and 3–4 digit integers as plausible scores. Decimals count
/// against the block; 1-digit and 5+ digit integers count as numeric but are
/// not kept.
fn classify_sized_block(lines: &[&str]) -> Option<SizedBlock> {
    let total = lines.len();
    let mut int_like = 0usize;
    let mut decimals = 0usize;
    let mut properly_sized = 0usize;
    let mut scores = Vec::new();

    for line in lines {
        if DECIMAL_LINE.is_match(line) {
            decimals += 1;
            continue;
        }
        if !SIGNED_INT_LINE.is_match(line) {
            continue;
        }
        int_like += 1;
        let digits = line.trim_start_matches('-').len();
        if !(2..=4).contains(&digits) {
            continue;
        }
        if let Ok(value) = line.parse::<i64>() {
            if digits >= 3 {
                properly_sized += 1;
            }
            scores.push(value);
        }
    }

    let qualifies = int_like as f64 / total as f64 >= SIZED_MIN_INT_RATIO
        && decimals as f64 / total as f64 <= SIZED_MAX_DECIMAL_RATIO;
    let enough = scores.len() >= SIZED_MIN_SCORES.max(total / 2);

    (qualifies && enough).then_some(SizedBlock {
        scores,
        properly_sized,
    })
}

/// Size-aware aligner used by the unified parser.
///
/// Picks the candidate block whose score count is closest to the team count,
/// preferring more 3–4 digit values, then document order. Only teams without a
/// score are touched: first by position (`position p` takes the `p`-th value),
/// then any still unset take leftover values in sequence.
pub fn align_scores_sized(full_text: &str, teams: &mut [ParsedTeam]) -> AlignOutcome {
    if teams.is_empty() {
        return AlignOutcome::NoTeams;
    }
    let team_count = teams.len();

    let mut best: Option<SizedBlock> = None;
    for block in segments(full_text)
        .iter()
        .filter_map(|lines| classify_sized_block(lines))
    {
        let key = |b: &SizedBlock| {
            (
                b.scores.len().abs_diff(team_count),
                std::cmp::Reverse(b.properly_sized),
            )
        };
        let better = match &best {
            None => true,
            Some(cur) => key(&block) < key(cur),
        };
        if better {
            best = Some(block);
        }
    }

    let Some(block) = best.filter(|b| !b.scores.is_empty()) else {
        debug!(teams = team_count, "No sized score block found");
        return AlignOutcome::NoScoreBlock;
    };

    let nums = &block.scores;
    let limit = nums.len().min(team_count);
    let mut assigned = 0usize;

    for team in teams.iter_mut().filter(|t| t.score.is_none()) {
        let p = team.position as usize;
        if (1..=limit).contains(&p) {
            team.score = Some(nums[p - 1]);
            assigned += 1;
        }
    }

    // Leftover pool: values past the positional range, handed out in order.
    let mut next = limit + 1;
    for team in teams.iter_mut().filter(|t| t.score.is_none()) {
        if next > nums.len() {
            break;
        }
        team.score = Some(nums[next - 1]);
        next += 1;
        assigned += 1;
    }

    debug!(
        teams = team_count,
        block_len = nums.len(),
        assigned,
        "Aligned sized score block by position"
    );
    AlignOutcome::Applied {
        assigned,
        block_len: nums.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn teams(names: &[&str]) -> Vec<ParsedTeam> {
        names
            .iter()
            .zip(1u32..)
            .map(|(name, position)| ParsedTeam {
                name: name.to_string(),
                score: None,
                player_count: 0,
                is_tournament: false,
                is_visiting: false,
                position,
            })
            .collect()
    }

    #[test]
    fn ratio_aligner_assigns_in_order() {
        let mut t = teams(&["Quiz Ninjas", "Brain Freeze"]);
        let text = "1 Quiz Ninjas (5)\n2 Brain Freeze (4T)\n\n1200\n980\n";
        let outcome = align_scores(text, &mut t);
        assert_eq!(
            outcome,
            AlignOutcome::Applied {
                assigned: 2,
                block_len: 2
            }
        );
        assert_eq!(t[0].score, Some(1200));
        assert_eq!(t[1].score, Some(980));
    }

    #[test]
    fn ratio_aligner_accepts_header_block() {
        let mut t = teams(&["A Team", "B Team", "C Team"]);
        let text = "A Team\nB Team\nC Team\n\nScore\n+40\n35\n";
        align_scores(text, &mut t);
        assert_eq!(t[0].score, Some(40));
        assert_eq!(t[1].score, Some(35));
        assert_eq!(t[2].score, None);
    }

    #[test]
    fn ratio_aligner_prefers_largest_block() {
        let mut t = teams(&["One", "Two"]);
        let text = "One\nTwo\n\n5\n6\n\n700\n600\n500\n";
        align_scores(text, &mut t);
        assert_eq!(t[0].score, Some(700));
        assert_eq!(t[1].score, Some(600));
    }

    #[test]
    fn ratio_aligner_without_block_leaves_scores_unset() {
        let mut t = teams(&["One", "Two"]);
        let outcome = align_scores("One\nTwo\n\nthanks for playing\n", &mut t);
        assert_eq!(outcome, AlignOutcome::NoScoreBlock);
        assert!(t.iter().all(|team| team.score.is_none()));
    }

    #[test]
    fn ratio_aligner_int_ratio_boundary() {
        let mut t = teams(&["One", "Two"]);
        let seven_of_ten = "100\n200\n300\n400\n500\n600\n700\ndnf\ndq\nn/a\n";
        assert_eq!(
            align_scores(seven_of_ten, &mut t),
            AlignOutcome::Applied {
                assigned: 2,
                block_len: 7
            }
        );
        assert_eq!(t[0].score, Some(100));

        let mut t = teams(&["One", "Two"]);
        let six_of_ten = "100\n200\n300\n400\n500\n600\ndnf\ndq\nn/a\nabs\n";
        assert_eq!(align_scores(six_of_ten, &mut t), AlignOutcome::NoScoreBlock);
        assert!(t.iter().all(|team| team.score.is_none()));
    }

    fn block(lines: &[&str]) -> String {
        lines.join("\n")
    }

    fn sized_applies(lines: &[&str]) -> bool {
        let mut t = teams(&["A", "B", "C"]);
        matches!(
            align_scores_sized(&block(lines), &mut t),
            AlignOutcome::Applied { .. }
        )
    }

    #[test]
    fn sized_aligner_int_ratio_boundary() {
        let words = ["dnf", "dq", "n/a", "abs", "void"];
        let mut inside = vec!["410", "390", "370", "350", "330", "310"];
        inside.extend_from_slice(&words[..4]);
        assert!(sized_applies(&inside));

        let mut outside = vec!["410", "390", "370", "350", "330"];
        outside.extend_from_slice(&words);
        assert!(!sized_applies(&outside));
    }

    #[test]
    fn sized_aligner_decimal_ratio_boundary() {
        let inside = [
            "410", "390", "370", "350", "330", "310", "290", "270", "12.5", "13.75",
        ];
        assert!(sized_applies(&inside));

        let outside = [
            "410", "390", "370", "350", "330", "310", "290", "12.5", "13.75", "99.1",
        ];
        assert!(!sized_applies(&outside));
    }

    #[test]
    fn sized_aligner_kept_count_boundary() {
        // Single-digit integers count as numeric but are not kept.
        let inside = ["410", "390", "370", "350", "330", "1", "2", "3", "4", "5"];
        assert!(sized_applies(&inside));

        let outside = ["410", "390", "370", "350", "1", "2", "3", "4", "5", "6"];
        assert!(!sized_applies(&outside));

        assert!(sized_applies(&["410", "390", "370", "7"]));
        assert!(!sized_applies(&["410", "390", "7", "8"]));
    }

    #[test]
    fn aligners_report_no_teams() {
        assert_eq!(align_scores("100\n200", &mut []), AlignOutcome::NoTeams);
        assert_eq!(align_scores_sized("100\n200", &mut []), AlignOutcome::NoTeams);
    }

    #[test]
    fn sized_aligner_prefers_block_matching_team_count() {
        let mut t = teams(&["A", "B", "C"]);
        let text = "header\n\n\
                    1500\n1400\n1300\n1200\n1100\n1000\n\n\
                    900\n800\n700\n";
        align_scores_sized(text, &mut t);
        assert_eq!(t[0].score, Some(900));
        assert_eq!(t[1].score, Some(800));
        assert_eq!(t[2].score, Some(700));
    }

    #[test]
    fn sized_aligner_rejects_decimal_heavy_blocks() {
        let mut t = teams(&["A", "B", "C"]);
        let text = "174.37\n120.00\n99.10\n1500\n1400\n";
        assert_eq!(align_scores_sized(text, &mut t), AlignOutcome::NoScoreBlock);
    }

    #[test]
    fn sized_aligner_needs_three_scores() {
        let mut t = teams(&["A", "B"]);
        assert_eq!(
            align_scores_sized("1200\n980\n", &mut t),
            AlignOutcome::NoScoreBlock
        );
    }

    #[test]
    fn sized_aligner_keeps_existing_scores_and_fills_by_position() {
        let mut t = teams(&["A", "B", "C"]);
        t[0].score = Some(5);
        let text = "310\n290\n270\n";
        let outcome = align_scores_sized(text, &mut t);
        assert_eq!(
            outcome,
            AlignOutcome::Applied {
                assigned: 2,
                block_len: 3
            }
        );
        assert_eq!(t[0].score, Some(5));
        assert_eq!(t[1].score, Some(290));
        assert_eq!(t[2].score, Some(270));
    }

    #[test]
    fn sized_aligner_fills_out_of_range_positions_from_leftovers() {
        let mut t = teams(&["A", "B", "C"]);
        t[2].position = 9;
        let text = "410\n320\n230\n140\n";
        align_scores_sized(text, &mut t);
        assert_eq!(t[0].score, Some(410));
        assert_eq!(t[1].score, Some(320));
        assert_eq!(t[2].score, Some(140));
    }
}

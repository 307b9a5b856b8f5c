// Diagnostics view of a parse: which lines the noise classifier kept, plus the
// parsed result and a short summary. Used to debug new quiz-engine layouts.

use crate::model::{LineSample, ParsePreview, PreviewSummary};
use crate::parser::dispatch::{parse_detailed, Strategy};
use crate::parser::noise::is_noise;
use crate::parser::normalize_newlines;
use crate::utils::text::truncate_chars;

/// Number of leading lines included in the keep/noise sample.
pub const PREVIEW_LINE_LIMIT: usize = 250;

pub fn preview(raw: &str, max_chars: usize, strategy: Strategy) -> ParsePreview {
    let text = normalize_newlines(raw);
    let lines: Vec<&str> = text.split('\n').collect();

    let line_sample = lines
        .iter()
        .take(PREVIEW_LINE_LIMIT)
        .enumerate()
        .map(|(i, line)| LineSample {
            i,
            text: line.to_string(),
            keep: !is_noise(line),
        })
        .collect();

    let (used, parsed) = parse_detailed(raw, strategy);

    ParsePreview {
        raw_length: raw.chars().count(),
        raw_text: truncate_chars(raw, max_chars).to_string(),
        line_count: lines.len(),
        line_sample,
        summary: PreviewSummary {
            teams_found: parsed.team_count,
            players_total: parsed.player_count,
        },
        parsed,
        strategy: used.to_string(),
    }
}

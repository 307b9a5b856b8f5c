// scoresheet: turns text extracted from quiz scoreboard PDFs into structured
// team results (name, score, player count, tournament/visiting flags, rank).

pub mod model;
pub mod parser;
pub mod utils;

pub use model::{LineSample, ParsePreview, ParseResult, ParsedTeam, PreviewSummary};
pub use parser::{parse, parse_detailed, parse_with, preview, Strategy};

pub mod align;
pub mod dispatch;
pub(crate) mod finalize;
pub mod flags;
pub mod noise;
pub mod preview;
pub(crate) mod rows;
pub mod split;
pub mod tabular;
pub mod unified;

pub use align::{align_scores, align_scores_sized, AlignOutcome};
pub use dispatch::{
    parse, parse_detailed, parse_with, select_strategy, tabular_density, Strategy,
    UnknownStrategy,
};
pub use flags::{extract_flags, Flags};
pub use noise::is_noise;
pub use preview::preview;
pub use split::parse_split;
pub use tabular::parse_tabular;
pub use unified::parse_unified;

/// Converts `\r\n` and lone `\r` line endings to `\n`.
pub fn normalize_newlines(raw: &str) -> String {
    raw.replace("\r\n", "\n").replace('\r', "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_all_line_endings() {
        assert_eq!(normalize_newlines("a\r\nb\rc\nd"), "a\nb\nc\nd");
    }
}

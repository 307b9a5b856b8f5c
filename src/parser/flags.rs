/// Player count and qualifier letters decoded from a flag token such as `(6T)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    pub players: Option<u32>,
    pub is_tournament: bool,
    pub is_visiting: bool,
}

/// Decodes a flag token.
///
/// Whitespace is ignored and case does not matter; surrounding parentheses are
/// optional. A leading digit run is the player count, and the letters right
/// after it carry the flags: `V` marks a visiting team and implies `T`.
/// Malformed input never fails, it just yields fewer fields.
pub fn extract_flags(token: &str) -> Flags {
    let compact: String = token
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect();
    let inner = compact.trim_start_matches('(').trim_end_matches(')');
    if inner.is_empty() {
        return Flags::default();
    }

    let digits_end = inner
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(inner.len());
    let (digits, rest) = inner.split_at(digits_end);
    let letters: &str = rest
        .find(|c: char| !c.is_ascii_alphabetic())
        .map_or(rest, |end| &rest[..end]);

    let players = if digits.is_empty() {
        None
    } else {
        digits.parse::<u32>().ok()
    };
    let is_visiting = letters.contains('V');
    let is_tournament = is_visiting || letters.contains('T');

    Flags {
        players,
        is_tournament,
        is_visiting,
    }
}

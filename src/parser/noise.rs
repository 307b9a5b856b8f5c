// Boilerplate detection for extracted scoreboard text.
// Every strategy consults this before trying its row patterns.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Mutex;

/// Column headers, page furniture and print metadata emitted by the quiz engines.
/// Matched as case-insensitive substrings.
const HEADER_KEYWORDS: &[&str] = &[
    "WEEK ENDING",
    "TOTAL",
    "VENUE",
    "TEAM NAME",
    "POINTS",
    "PLAYERS",
    "FALL",
    "LEADER BOARD",
    "TOURNAMENT",
    "GSP",
    "EVENT DETAILS",
    "QUIZZES",
    "PRINT DATE",
    "QUIZ DATE",
    "QUIZ FILE",
    "KEYPAD",
    "TIME (S)",
    "RANK",
    "SCORE",
    "PAGE 1",
];

const NOISE_CACHE_LIMIT: usize = 4096;

static NOISE_CACHE: Lazy<Mutex<HashMap<String, bool>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Returns true if the line is structural boilerplate rather than a data row.
///
/// Results are memoized per trimmed line. The cache is bounded and simply
/// cleared once full; a poisoned lock falls back to uncached classification.
pub fn is_noise(line: &str) -> bool {
    let key = line.trim();

    if let Ok(cache) = NOISE_CACHE.lock() {
        if let Some(&hit) = cache.get(key) {
            return hit;
        }
    }

    let verdict = classify(key);

    if let Ok(mut cache) = NOISE_CACHE.lock() {
        if cache.len() >= NOISE_CACHE_LIMIT {
            cache.clear();
        }
        cache.insert(key.to_string(), verdict);
    }

    verdict
}

fn classify(s: &str) -> bool {
    if s.is_empty() {
        return true;
    }

    let upper = s.to_uppercase();
    if looks_like_column_header(s, &upper) {
        return true;
    }
    if HEADER_KEYWORDS.iter().any(|kw| upper.contains(kw)) {
        return true;
    }

    // Only punctuation/symbols, or a lone digit or letter.
    if !s.chars().any(char::is_alphanumeric) {
        return true;
    }
    let mut chars = s.chars();
    if let (Some(only), None) = (chars.next(), chars.next()) {
        return only.is_ascii_digit() || only.is_alphabetic();
    }

    false
}

/// A run of keypad ids / column letters such as `A1 B2 C3 12 KEYPAD`.
fn looks_like_column_header(s: &str, upper: &str) -> bool {
    if !upper.contains("KEYPAD") {
        return false;
    }
    let tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.len() >= 3
        && tokens
            .iter()
            .all(|t| is_all_digits(t) || is_column_letter(t) || t.eq_ignore_ascii_case("KEYPAD"))
}

fn is_all_digits(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
}

fn is_column_letter(token: &str) -> bool {
    let bytes = token.as_bytes();
    match bytes {
        [letter] => letter.is_ascii_alphabetic(),
        [letter, digit] => letter.is_ascii_alphabetic() && digit.is_ascii_digit(),
        _ => false,
    }
}

// Text-file input handling: scoreboard dumps arrive from various exporters,
// not all of them UTF-8.

use anyhow::Result;

/// Decodes a text dump to UTF-8.
///
/// Order: BOM sniff, strict UTF-8, then a `chardetng` guess (typically
/// windows-1252 for older exporters). Decoding that needs replacement
/// characters is treated as an error.
pub fn decode_to_utf8(bytes: &[u8]) -> Result<String> {
    if let Some((enc, offset)) = encoding_rs::Encoding::for_bom(bytes) {
        let (cow, _used, had_errors) = enc.decode(&bytes[offset..]);
        if had_errors {
            anyhow::bail!("decoding as {} after BOM sniff produced errors", enc.name());
        }
        return Ok(cow.into_owned());
    }

    if let Ok(text) = std::str::from_utf8(bytes) {
        return Ok(text.to_string());
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(bytes, true);
    let enc = detector.guess(None, true);
    let (cow, _used, had_errors) = enc.decode(bytes);
    if had_errors {
        anyhow::bail!("decoding with detected charset '{}' produced errors", enc.name());
    }
    Ok(cow.into_owned())
}

/// Returns at most `max` characters of `s`, never splitting a character.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}

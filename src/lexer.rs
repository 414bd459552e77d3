//! Byte decoding and line normalisation for the AT response stream.

/// Decode raw modem bytes as UTF-8, dropping malformed sequences.
///
/// The wire format is ASCII in practice; anything undecodable is noise and
/// is discarded rather than failing the whole chunk.
pub fn decode_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).replace('\u{FFFD}', "")
}

/// Split decoded text into trimmed, normalised lines.
///
/// Lines are split on `\r\n`. Stray CR/LF inside a line is stripped, colons
/// become field separators and `", "` collapses to `","`. Blank lines and
/// bare `OK` acknowledgements carry no data and are dropped.
pub fn split_lines(text: &str) -> Vec<String> {
    text.split("\r\n")
        .map(normalize)
        .filter(|line| !line.is_empty() && line.as_str() != "OK")
        .collect()
}

fn normalize(line: &str) -> String {
    let line: String = line
        .trim()
        .chars()
        .filter(|c| *c != '\r' && *c != '\n')
        .collect();
    line.replace(':', ",").replace(", ", ",")
}

use eyre::{bail, eyre, Result};
use std::{fmt::Write, ops::Range};

/// Removes a leading `0x` / `0X` from a hex string, if present.
///
/// ```
/// use mimir_common::utils::strings::strip_hex_prefix;
///
/// assert_eq!(strip_hex_prefix("0xa9059cbb"), "a9059cbb");
/// assert_eq!(strip_hex_prefix("a9059cbb"), "a9059cbb");
/// ```
pub fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s)
}

/// Decodes a hex string into a vector of bytes
///
/// ```
/// use mimir_common::utils::strings::decode_hex;
///
/// let hex = "48656c6c6f20576f726c64"; // "Hello World" in hex
/// let result = decode_hex(hex).expect("should decode hex");
/// assert_eq!(result, vec![72, 101, 108, 108, 111, 32, 87, 111, 114, 108, 100]);
/// ```
pub fn decode_hex(s: &str) -> Result<Vec<u8>> {
    // normalize
    let s = strip_hex_prefix(s.trim());

    if s.is_empty() {
        return Ok(vec![]);
    }
    if s.len() % 2 != 0 {
        bail!("invalid hex string: odd number of digits in '{}'", s);
    }

    (0..s.len())
        .step_by(2)
        .map(|i| s.get(i..i + 2).and_then(|pair| u8::from_str_radix(pair, 16).ok()))
        .collect::<Option<Vec<u8>>>()
        .ok_or_else(|| eyre!("invalid hex string: {}", s))
}

/// Encodes a vector of bytes into a hex string
///
/// ```
/// use mimir_common::utils::strings::encode_hex;
///
/// let bytes = vec![72, 101, 108, 108, 111, 32, 87, 111, 114, 108, 100];
/// let result = encode_hex(&bytes);
/// assert_eq!(result, "48656c6c6f20576f726c64");
/// ```
pub fn encode_hex(s: &[u8]) -> String {
    s.iter().fold(String::with_capacity(s.len() * 2), |mut acc, b| {
        write!(acc, "{b:02x}").expect("unable to write");
        acc
    })
}

/// Encodes a vector of bytes into a `0x`-prefixed hex string
///
/// ```
/// use mimir_common::utils::strings::encode_hex_prefixed;
///
/// assert_eq!(encode_hex_prefixed(&[0xa9, 0x05, 0x9c, 0xbb]), "0xa9059cbb");
/// assert_eq!(encode_hex_prefixed(&[]), "0x");
/// ```
pub fn encode_hex_prefixed(s: &[u8]) -> String {
    format!("0x{}", encode_hex(s))
}

/// Finds balanced encapsulator in a string
///
/// ```
/// use mimir_common::utils::strings::find_balanced_encapsulator;
///
/// let s = "Hello (World)";
/// let result =
///     find_balanced_encapsulator(s, ('(', ')')).expect("should find balanced encapsulator");
/// assert_eq!(result, (7..12));
/// // extract the condition
/// let condition = &s[result];
/// assert_eq!(condition, "World");
/// ```
pub fn find_balanced_encapsulator(s: &str, encap: (char, char)) -> Result<Range<usize>> {
    let mut open = 0;
    let mut close = 0;
    let mut start = 0;
    let mut end = 0;
    for (i, c) in s.char_indices() {
        if c == encap.0 {
            if open == 0 {
                start = i;
            }
            open += 1;
        } else if c == encap.1 {
            close += 1;
        }
        if open == close && open > 0 {
            end = i;
            break;
        }
    }

    if !(open == close && end > start && open > 0) {
        bail!("string '{}' doesn't contain balanced encapsulator {}{}.", s, encap.0, encap.1);
    }

    Ok(start + 1..end)
}

/// Splits a string on `delimiter`, ignoring delimiters nested inside `()` or `[]` groups.
/// Empty input yields an empty list.
///
/// ```
/// use mimir_common::utils::strings::split_top_level;
///
/// let parts = split_top_level("uint256,(address,bool)[2],bytes", ',').expect("should split");
/// assert_eq!(parts, vec!["uint256", "(address,bool)[2]", "bytes"]);
/// ```
pub fn split_top_level(s: &str, delimiter: char) -> Result<Vec<&str>> {
    let mut parts = Vec::new();
    if s.is_empty() {
        return Ok(parts);
    }

    let mut depth: i32 = 0;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => {
                depth -= 1;
                if depth < 0 {
                    bail!("unbalanced closing '{}' at position {} in '{}'", c, i, s);
                }
            }
            _ if c == delimiter && depth == 0 => {
                parts.push(&s[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }

    if depth != 0 {
        bail!("unbalanced brackets in '{}'", s);
    }
    parts.push(&s[start..]);

    Ok(parts)
}

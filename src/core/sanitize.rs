// src/core/sanitize.rs

/// Collapse every run of whitespace (spaces, tabs, newlines, NBSP) into one
/// ASCII space and trim both ends.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// `normalize_ws` then lowercase. Used for header matching.
pub fn normalize_key(s: &str) -> String {
    normalize_ws(s).to_lowercase()
}

/// Decode character references: the common named ones plus `&#NN;` / `&#xNN;`.
/// The legacy names (`&nbsp`, `&amp`, `&lt`, `&gt`, `&quot`) also decode without
/// the trailing `;`. Anything unrecognised is left as written.
pub fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];

        // References are short; don't scan the whole remainder for ';'.
        let semi = tail.char_indices().take(12).find(|&(_, c)| c == ';').map(|(i, _)| i);
        let decoded = semi
            .and_then(|end| decode_one(&tail[1..end]).map(|ch| (ch, end + 1)))
            .or_else(|| decode_legacy(&tail[1..]));

        match decoded {
            Some((ch, consumed)) => {
                out.push(ch);
                rest = &tail[consumed..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_one(name: &str) -> Option<char> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        return char::from_u32(code);
    }
    match name {
        "nbsp" => Some('\u{a0}'),
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => None,
    }
}

/// Named reference written without `;`. Returns the char and the bytes
/// consumed, counting the leading `&`.
fn decode_legacy(after_amp: &str) -> Option<(char, usize)> {
    const LEGACY: [(&str, char); 5] =
        [("nbsp", '\u{a0}'), ("quot", '"'), ("amp", '&'), ("lt", '<'), ("gt", '>')];
    LEGACY
        .iter()
        .find(|(name, _)| after_amp.starts_with(name))
        .map(|&(name, ch)| (ch, name.len() + 1))
}

/// First signed integer (`-?\d+`) in `s`, if any.
/// Digit runs too long for i64 saturate rather than disappear.
pub fn first_int(s: &str) -> Option<i64> {
    let bytes = s.as_bytes();
    let start = bytes.iter().position(|b| b.is_ascii_digit())?;
    let negative = start > 0 && bytes[start - 1] == b'-';

    let mut value: i64 = 0;
    for &b in bytes[start..].iter().take_while(|b| b.is_ascii_digit()) {
        let digit = i64::from(b - b'0');
        value = value
            .checked_mul(10)
            .and_then(|v| if negative { v.checked_sub(digit) } else { v.checked_add(digit) })
            .unwrap_or(if negative { i64::MIN } else { i64::MAX });
    }
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_all_whitespace_kinds() {
        assert_eq!(normalize_ws("  CRN \n\t ?  "), "CRN ?");
        assert_eq!(normalize_ws("Full\u{a0}\u{a0}0"), "Full 0");
        assert_eq!(normalize_ws(" \r\n "), "");
    }

    #[test]
    fn key_is_lowercased() {
        assert_eq!(normalize_key(" Capacity\n ? "), "capacity ?");
    }

    #[test]
    fn decodes_named_and_numeric_references() {
        assert_eq!(decode_entities("A&amp;B"), "A&B");
        assert_eq!(decode_entities("1&nbsp;2"), "1\u{a0}2");
        assert_eq!(decode_entities("&#65;&#x42;&#X43;"), "ABC");
        assert_eq!(decode_entities("&lt;b&gt;"), "<b>");
    }

    #[test]
    fn leaves_unknown_references_alone() {
        assert_eq!(decode_entities("R&D"), "R&D");
        assert_eq!(decode_entities("&bogus; ok"), "&bogus; ok");
        assert_eq!(decode_entities("trailing &"), "trailing &");
        assert_eq!(decode_entities("&#xZZ;"), "&#xZZ;");
    }

    #[test]
    fn legacy_names_decode_without_semicolon() {
        assert_eq!(decode_entities("1&nbsp"), "1\u{a0}");
        assert_eq!(decode_entities("Avail&nbsp3"), "Avail\u{a0}3");
        assert_eq!(decode_entities("A&ampB &lt&gt &quotx"), "A&B <> \"x");
        assert_eq!(decode_entities("&nbsp;&nbsp"), "\u{a0}\u{a0}");
        assert_eq!(decode_entities("&amp x;"), "& x;");
    }

    #[test]
    fn first_int_picks_leftmost_signed_run() {
        assert_eq!(first_int("Avail 14"), Some(14));
        assert_eq!(first_int("Full 0"), Some(0));
        assert_eq!(first_int("-3 waitlisted"), Some(-3));
        assert_eq!(first_int("--5"), Some(-5));
        assert_eq!(first_int("13-5"), Some(13));
        assert_eq!(first_int("Full"), None);
        assert_eq!(first_int(""), None);
    }

    #[test]
    fn first_int_saturates() {
        assert_eq!(first_int("99999999999999999999999"), Some(i64::MAX));
        assert_eq!(first_int("-99999999999999999999999"), Some(i64::MIN));
    }
}

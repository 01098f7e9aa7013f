//! Python string literal decoding.
//!
//! Only plain literals have a value known before runtime. f-strings, bytes
//! and template strings return `None` so the caller can fall back to the raw
//! argument text.

/// Decode a single string literal token such as `"msg"`, `r'a\b'` or
/// `"""doc"""`. Returns `None` for non-plain literals.
pub fn decode_string_literal(text: &str) -> Option<String> {
    let prefix_len = text
        .char_indices()
        .find(|(_, c)| !c.is_ascii_alphabetic())
        .map(|(i, _)| i)?;
    let prefix = text[..prefix_len].to_ascii_lowercase();
    if !matches!(prefix.as_str(), "" | "r" | "u") {
        return None;
    }
    let raw = prefix == "r";

    let rest = &text[prefix_len..];
    let quote = ["\"\"\"", "'''", "\"", "'"]
        .into_iter()
        .find(|q| rest.starts_with(q))?;
    if rest.len() < quote.len() * 2 || !rest.ends_with(quote) {
        return None;
    }
    let body = &rest[quote.len()..rest.len() - quote.len()];

    if raw {
        Some(body.to_string())
    } else {
        Some(unescape(body))
    }
}

/// Decode an implicit concatenation (`"a" "b"`) part by part.
pub fn decode_concatenated<'a>(parts: impl IntoIterator<Item = &'a str>) -> Option<String> {
    let mut out = String::new();
    for part in parts {
        out.push_str(&decode_string_literal(part)?);
    }
    Some(out)
}

fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        let Some(next) = chars.next() else {
            out.push('\\');
            break;
        };
        match next {
            '\n' => {}
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'a' => out.push('\u{07}'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0C}'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'v' => out.push('\u{0B}'),
            '0'..='7' => {
                let mut digits = String::from(next);
                while digits.len() < 3 {
                    match chars.peek() {
                        Some(c @ '0'..='7') => {
                            digits.push(*c);
                            chars.next();
                        }
                        _ => break,
                    }
                }
                push_code_point(&mut out, &digits, 8, next);
            }
            'x' | 'u' | 'U' => {
                let width = match next {
                    'x' => 2,
                    'u' => 4,
                    _ => 8,
                };
                let digits: String = chars.clone().take(width).collect();
                if digits.len() == width && digits.chars().all(|c| c.is_ascii_hexdigit()) {
                    for _ in 0..width {
                        chars.next();
                    }
                    push_code_point(&mut out, &digits, 16, next);
                } else {
                    out.push('\\');
                    out.push(next);
                }
            }
            // Unknown escapes (including `\N{...}`) keep their backslash.
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }
    out
}

fn push_code_point(out: &mut String, digits: &str, radix: u32, marker: char) {
    match u32::from_str_radix(digits, radix).ok().and_then(char::from_u32) {
        Some(c) => out.push(c),
        None => {
            out.push('\\');
            if radix == 16 {
                out.push(marker);
            }
            out.push_str(digits);
        }
    }
}

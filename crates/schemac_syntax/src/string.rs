//! String literal values.

/// Resolves the escape sequences of a quoted string body (without quotes).
///
/// # Errors
///
/// Returns a message describing the first invalid escape.
pub fn unescape(raw: &str) -> Result<String, String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('/') => out.push('/'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('u') => {
                let code = read_hex4(&mut chars)?;
                let ch = if (0xD800..0xDC00).contains(&code) {
                    // High surrogate: a low surrogate escape must follow.
                    let low = match (chars.next(), chars.next()) {
                        (Some('\\'), Some('u')) => read_hex4(&mut chars)?,
                        _ => return Err("unpaired surrogate in unicode escape".into()),
                    };
                    if !(0xDC00..0xE000).contains(&low) {
                        return Err("unpaired surrogate in unicode escape".into());
                    }
                    char::from_u32(0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00))
                } else {
                    char::from_u32(code)
                };
                out.push(ch.ok_or_else(|| format!("invalid unicode escape `\\u{code:04X}`"))?);
            }
            Some(other) => return Err(format!("invalid escape sequence `\\{other}`")),
            None => return Err("unterminated escape sequence".into()),
        }
    }

    Ok(out)
}

fn read_hex4(chars: &mut std::str::Chars<'_>) -> Result<u32, String> {
    let digits: String = chars.by_ref().take(4).collect();
    if digits.len() != 4 {
        return Err("incomplete unicode escape".into());
    }
    u32::from_str_radix(&digits, 16).map_err(|_| format!("invalid unicode escape `\\u{digits}`"))
}

/// Computes the value of a block string body (without the triple quotes):
/// common indentation is removed and leading/trailing blank lines dropped.
#[must_use]
pub fn block_string_value(raw: &str) -> String {
    let raw = raw.replace("\\\"\"\"", "\"\"\"");
    let lines: Vec<&str> = raw.split("\r\n").flat_map(|l| l.split(['\n', '\r'])).collect();

    let common_indent = lines
        .iter()
        .skip(1)
        .filter_map(|line| {
            let indent = leading_whitespace(line);
            (indent < line.len()).then_some(indent)
        })
        .min();

    let mut trimmed: Vec<&str> = lines
        .iter()
        .enumerate()
        .map(|(i, line)| match common_indent {
            Some(indent) if i > 0 => line.get(indent..).unwrap_or(""),
            _ => line,
        })
        .collect();

    while trimmed.first().is_some_and(|l| is_blank(l)) {
        trimmed.remove(0);
    }
    while trimmed.last().is_some_and(|l| is_blank(l)) {
        trimmed.pop();
    }

    trimmed.join("\n")
}

fn leading_whitespace(line: &str) -> usize {
    line.bytes().take_while(|b| matches!(b, b' ' | b'\t')).count()
}

fn is_blank(line: &str) -> bool {
    leading_whitespace(line) == line.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unescape_simple() {
        assert_eq!(unescape(r#"a\"b\\c\/d\n"#).unwrap(), "a\"b\\c/d\n");
    }

    #[test]
    fn test_unescape_unicode() {
        assert_eq!(unescape(r"caf\u00e9").unwrap(), "café");
        assert_eq!(unescape(r"\uD83D\uDE00").unwrap(), "\u{1F600}");
    }

    #[test]
    fn test_unescape_errors() {
        assert!(unescape(r"\q").is_err());
        assert!(unescape(r"\u12").is_err());
        assert!(unescape(r"\uD83D").is_err());
    }

    #[test]
    fn test_block_string_dedent() {
        let raw = "\n    Hello,\n      World!\n\n    Yours,\n      GraphQL.\n  ";
        assert_eq!(
            block_string_value(raw),
            "Hello,\n  World!\n\nYours,\n  GraphQL."
        );
    }

    #[test]
    fn test_block_string_first_line_kept() {
        assert_eq!(block_string_value("First\n  second"), "First\nsecond");
        assert_eq!(block_string_value(r#"say \"""hi\""""#), r#"say """hi""""#);
    }
}

//! Line-oriented parser for the entity lump text.
//!
//! The lump is a sequence of brace-delimited groups of quoted key/value
//! pairs:
//!
//! ```text
//! {
//! "classname" "light"
//! "origin" "10 20 30"
//! }
//! ```
//!
//! The parser is pure: the same input always yields the same groups, in
//! encounter order, and nothing is carried across calls.

use thiserror::Error;

use crate::entity::CLASSNAME_KEY;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("Malformed entity line {line}: {content:?}")]
    MalformedLine { line: usize, content: String },

    #[error("Unterminated entity block opened at line {opened_at}")]
    UnterminatedGroup { opened_at: usize },
}

/// One brace-delimited group: the raw pairs in written order plus the
/// resolved classname.
///
/// Duplicate keys are retained here; last-write-wins happens when the pairs
/// are merged into an entity's map. The classname tracks the last
/// `"classname"` occurrence, consistent with that policy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawPropertyGroup {
    pub pairs: Vec<(String, String)>,
    pub class_name: Option<String>,
}

/// Decodes lump bytes and parses them into raw groups.
///
/// Entity lumps are NUL-terminated on disk; trailing NULs are dropped before
/// parsing. Bytes decode as UTF-8 with lossy replacement.
pub fn parse_lump_bytes(bytes: &[u8]) -> Result<Vec<RawPropertyGroup>, ParseError> {
    let text = String::from_utf8_lossy(bytes);
    parse_lump_str(text.trim_end_matches('\0'))
}

/// Parses entity lump text into raw groups.
///
/// Lines are compared after trimming surrounding whitespace: `{` opens a
/// group, `}` closes it, blank lines are skipped, and anything else outside
/// a group is ignored as an artifact of the source format. Interior lines
/// must be a quoted key, whitespace, and a quoted value; positions in errors
/// are 1-based.
pub fn parse_lump_str(text: &str) -> Result<Vec<RawPropertyGroup>, ParseError> {
    let mut groups = Vec::new();
    let mut current: Option<(usize, RawPropertyGroup)> = None;

    for (index, raw_line) in text.lines().enumerate() {
        let number = index + 1;
        let line = raw_line.trim();

        if line == "}" {
            // A close brace outside any group is ignored like other stray lines.
            if let Some((_, finished)) = current.take() {
                groups.push(finished);
            }
            continue;
        }

        match current.as_mut() {
            None => {
                if line == "{" {
                    current = Some((number, RawPropertyGroup::default()));
                }
            }
            Some((_, group)) => {
                if line.is_empty() {
                    continue;
                }
                let Some((key, value)) = parse_pair(line) else {
                    return Err(ParseError::MalformedLine {
                        line: number,
                        content: raw_line.to_string(),
                    });
                };
                if key == CLASSNAME_KEY {
                    group.class_name = Some(value.clone());
                }
                group.pairs.push((key, value));
            }
        }
    }

    if let Some((opened_at, _)) = current {
        return Err(ParseError::UnterminatedGroup { opened_at });
    }

    Ok(groups)
}

/// Parses one `"key" "value"` line (already trimmed). Escaped characters
/// inside the quotes are kept verbatim, backslash included.
fn parse_pair(line: &str) -> Option<(String, String)> {
    let (key, rest) = parse_quoted(line)?;

    // At least one whitespace character between key and value.
    let after = rest.trim_start();
    if after.len() == rest.len() {
        return None;
    }

    let (value, tail) = parse_quoted(after)?;
    if !tail.trim().is_empty() {
        return None;
    }

    Some((key.to_string(), value.to_string()))
}

/// Splits a leading double-quoted string off `input`, returning the content
/// between the quotes (unescaped, as written) and the remainder after the
/// closing quote.
fn parse_quoted(input: &str) -> Option<(&str, &str)> {
    let rest = input.strip_prefix('"')?;
    let mut escaped = false;
    for (index, ch) in rest.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '"' => return Some((&rest[..index], &rest[index + 1..])),
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE_LUMP: &str = r#"{
"classname" "worldspawn"
"message" "gut feeling"
}
{
"classname" "light"
"origin" "10 20 30"
}
"#;

    #[test]
    fn test_parse_groups_in_order() {
        let groups = parse_lump_str(SIMPLE_LUMP).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].class_name.as_deref(), Some("worldspawn"));
        assert_eq!(groups[1].class_name.as_deref(), Some("light"));
        assert_eq!(
            groups[1].pairs,
            vec![
                ("classname".to_string(), "light".to_string()),
                ("origin".to_string(), "10 20 30".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_is_deterministic() {
        let first = parse_lump_str(SIMPLE_LUMP).unwrap();
        let second = parse_lump_str(SIMPLE_LUMP).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_classname_last_occurrence_wins() {
        let groups = parse_lump_str(
            "{\n\"classname\" \"light\"\n\"classname\" \"light_environment\"\n}\n",
        )
        .unwrap();
        assert_eq!(groups[0].class_name.as_deref(), Some("light_environment"));
        // Both occurrences are retained in the raw pairs.
        assert_eq!(groups[0].pairs.len(), 2);
    }

    #[test]
    fn test_lines_outside_groups_are_ignored() {
        let groups = parse_lump_str(
            "stray artifact\n{\n\"classname\" \"worldspawn\"\n}\ntrailing garbage\n}\n",
        )
        .unwrap();
        assert_eq!(groups.len(), 1);
    }

    #[test]
    fn test_blank_lines_inside_groups_are_skipped() {
        let groups = parse_lump_str("{\n\n\"wait\" \"2\"\n\n}\n").unwrap();
        assert_eq!(groups[0].pairs.len(), 1);
    }

    #[test]
    fn test_empty_value_allowed() {
        let groups = parse_lump_str("{\n\"message\" \"\"\n}\n").unwrap();
        assert_eq!(groups[0].pairs[0], ("message".to_string(), String::new()));
    }

    #[test]
    fn test_indented_pairs_and_crlf() {
        let groups = parse_lump_str("{\r\n  \"angle\"   \"90\"  \r\n}\r\n").unwrap();
        assert_eq!(groups[0].pairs[0], ("angle".to_string(), "90".to_string()));
    }

    #[test]
    fn test_escaped_characters_stored_raw() {
        let groups = parse_lump_str("{\n\"message\" \"say \\\"hi\\\"\"\n}\n").unwrap();
        assert_eq!(groups[0].pairs[0].1, "say \\\"hi\\\"");
    }

    #[test]
    fn test_malformed_line_reports_position() {
        let result = parse_lump_str("{\n\"classname\" \"light\"\n\"origin\" 10 20 30\n}\n");
        assert_eq!(
            result,
            Err(ParseError::MalformedLine {
                line: 3,
                content: "\"origin\" 10 20 30".to_string(),
            })
        );
    }

    #[test]
    fn test_missing_separator_rejected() {
        let result = parse_lump_str("{\n\"key\"\"value\"\n}\n");
        assert!(matches!(
            result,
            Err(ParseError::MalformedLine { line: 2, .. })
        ));
    }

    #[test]
    fn test_trailing_content_rejected() {
        let result = parse_lump_str("{\n\"key\" \"value\" extra\n}\n");
        assert!(matches!(
            result,
            Err(ParseError::MalformedLine { line: 2, .. })
        ));
    }

    #[test]
    fn test_unterminated_group() {
        let result = parse_lump_str("{\n\"classname\" \"worldspawn\"\n");
        assert_eq!(result, Err(ParseError::UnterminatedGroup { opened_at: 1 }));
    }

    #[test]
    fn test_nul_terminated_bytes() {
        let groups = parse_lump_bytes(b"{\n\"classname\" \"worldspawn\"\n}\n\0\0\0").unwrap();
        assert_eq!(groups.len(), 1);
    }

    #[test]
    fn test_open_brace_inside_group_is_malformed() {
        let result = parse_lump_str("{\n{\n}\n}\n");
        assert!(matches!(
            result,
            Err(ParseError::MalformedLine { line: 2, .. })
        ));
    }
}

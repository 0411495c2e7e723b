//! Regular expression testing and replacement.
//!
//! Flags follow the usual single-letter convention: `i` case-insensitive,
//! `m` multi-line, `s` dot matches newline, `x` verbose, `g` global. Without
//! `g` only the first match is reported or replaced.

use ::regex::{Regex, RegexBuilder};
use serde::Serialize;

use super::{ToolError, ToolResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct Flags {
    pub case_insensitive: bool,
    pub multi_line: bool,
    pub dot_matches_new_line: bool,
    pub verbose: bool,
    pub global: bool,
}

impl Flags {
    pub fn parse(flags: &str) -> ToolResult<Self> {
        let mut parsed = Self::default();
        for flag in flags.chars() {
            match flag {
                'i' => parsed.case_insensitive = true,
                'm' => parsed.multi_line = true,
                's' => parsed.dot_matches_new_line = true,
                'x' => parsed.verbose = true,
                'g' => parsed.global = true,
                other => {
                    return Err(ToolError::Regex(format!("unknown flag '{other}'")));
                }
            }
        }
        Ok(parsed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Match {
    /// Byte offset of the match start
    pub index: usize,
    pub text: String,
    /// Capture groups 1..n; `None` for groups that did not participate
    pub groups: Vec<Option<String>>,
}

pub fn test(pattern: &str, flags: &str, text: &str) -> ToolResult<Vec<Match>> {
    let flags = Flags::parse(flags)?;
    let regex = compile(pattern, flags)?;
    let limit = if flags.global { usize::MAX } else { 1 };

    Ok(regex
        .captures_iter(text)
        .take(limit)
        .filter_map(|captures| {
            let whole = captures.get(0)?;
            Some(Match {
                index: whole.start(),
                text: whole.as_str().to_string(),
                groups: captures
                    .iter()
                    .skip(1)
                    .map(|group| group.map(|group| group.as_str().to_string()))
                    .collect(),
            })
        })
        .collect())
}

/// Replace matches; `$1` / `${name}` refer to capture groups.
pub fn replace(pattern: &str, flags: &str, text: &str, replacement: &str) -> ToolResult<String> {
    let flags = Flags::parse(flags)?;
    let regex = compile(pattern, flags)?;
    let limit = usize::from(!flags.global);
    Ok(regex.replacen(text, limit, replacement).into_owned())
}

fn compile(pattern: &str, flags: Flags) -> ToolResult<Regex> {
    if pattern.is_empty() {
        return Err(ToolError::Regex("pattern must not be empty".to_string()));
    }
    RegexBuilder::new(pattern)
        .case_insensitive(flags.case_insensitive)
        .multi_line(flags.multi_line)
        .dot_matches_new_line(flags.dot_matches_new_line)
        .ignore_whitespace(flags.verbose)
        .build()
        .map_err(|error| ToolError::Regex(error.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn first_match_without_global() {
        let matches = test(r"(\w+)@(\w+)\.com", "", "a@b.com c@d.com").unwrap();
        assert_eq!(
            matches,
            vec![Match {
                index: 0,
                text: "a@b.com".to_string(),
                groups: vec![Some("a".to_string()), Some("b".to_string())],
            }]
        );
    }

    #[test]
    fn global_returns_all_matches() {
        let matches = test(r"\d+", "g", "1 22 333").unwrap();
        let found: Vec<_> = matches.iter().map(|m| (m.index, m.text.as_str())).collect();
        assert_eq!(found, vec![(0, "1"), (2, "22"), (5, "333")]);
    }

    #[test]
    fn flags_change_matching() {
        assert!(test("hello", "", "HELLO").unwrap().is_empty());
        assert_eq!(test("hello", "i", "HELLO").unwrap().len(), 1);
        assert_eq!(test("^b", "gm", "a\nb\nb").unwrap().len(), 2);
        assert_eq!(test("a.b", "s", "a\nb").unwrap().len(), 1);
    }

    #[test]
    fn optional_group_is_none() {
        let matches = test("(a)|(b)", "", "b").unwrap();
        assert_eq!(matches[0].groups, vec![None, Some("b".to_string())]);
    }

    #[test]
    fn replace_respects_global() {
        assert_eq!(replace("o", "", "foo", "0").unwrap(), "f0o");
        assert_eq!(replace("o", "g", "foo", "0").unwrap(), "f00");
        assert_eq!(
            replace(r"(\w+)@(\w+)", "g", "a@b", "$2@$1").unwrap(),
            "b@a"
        );
    }

    #[test]
    fn invalid_patterns_and_flags_are_errors() {
        assert!(matches!(test("(", "", "x"), Err(ToolError::Regex(_))));
        assert!(matches!(test("a", "q", "a"), Err(ToolError::Regex(_))));
        assert!(matches!(test("", "", "a"), Err(ToolError::Regex(_))));
    }
}

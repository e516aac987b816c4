//! Wildcard pattern translation.
//!
//! `*` matches zero or more characters, `?` matches exactly one. Every
//! other character is literal. The result is anchored so that it matches
//! whole terms only.

use crate::error::{QueryError, Result};
use regex::Regex;

/// Translate a wildcard pattern into anchored regex source.
pub fn wildcard_to_regex(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    // (?s) so wildcards also span newlines inside a term
    out.push_str("(?s)^");
    for ch in pattern.chars() {
        match ch {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            '+' | '(' | ')' | '^' | '$' | '.' | '{' | '}' | '[' | ']' | '|' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
    out.push('$');
    out
}

/// Compile a wildcard pattern into a whole-term automaton.
pub fn compile_wildcard(pattern: &str) -> Result<Regex> {
    let source = wildcard_to_regex(pattern);
    log::debug!("compiling wildcard {:?} as {}", pattern, source);
    Regex::new(&source).map_err(|source| QueryError::PatternCompile {
        pattern: pattern.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translation() {
        assert_eq!(wildcard_to_regex("a.b*c?d"), r"(?s)^a\.b.*c.d$");
        assert_eq!(wildcard_to_regex(""), "(?s)^$");
    }

    #[test]
    fn test_escapes_every_metacharacter() {
        let meta = r"+()^$.{}[]|\";
        let re = compile_wildcard(meta).unwrap();
        assert!(re.is_match(meta));
        assert!(!re.is_match("x"));
    }

    #[test]
    fn test_wildcards_and_anchoring() {
        let re = compile_wildcard("a.b*c?d").unwrap();
        assert!(re.is_match("a.bXYc1d"));
        assert!(re.is_match("a.bc1d"));
        assert!(!re.is_match("ab*c?d"));
        assert!(!re.is_match("a.bXYc1dZ"));
        assert!(!re.is_match("Za.bXYc1d"));
        assert!(!re.is_match("aXbXYc1d"));
    }

    #[test]
    fn test_question_mark_is_one_character() {
        let re = compile_wildcard("caf?").unwrap();
        assert!(re.is_match("café"));
        assert!(!re.is_match("caf"));
        assert!(!re.is_match("cafés"));
    }

    #[test]
    fn test_star_alone_matches_everything() {
        let re = compile_wildcard("*").unwrap();
        assert!(re.is_match(""));
        assert!(re.is_match("anything at all"));
        assert!(re.is_match("multi\nline"));
    }

    #[test]
    fn test_other_characters_are_literal() {
        let re = compile_wildcard("a-b#c&d~e f").unwrap();
        assert!(re.is_match("a-b#c&d~e f"));
        assert!(!re.is_match("a-b#c&d~ef"));
    }

    #[test]
    fn test_recompiling_is_idempotent() {
        let a = compile_wildcard("te*t").unwrap();
        let b = compile_wildcard("te*t").unwrap();
        assert_eq!(a.as_str(), b.as_str());
    }
}

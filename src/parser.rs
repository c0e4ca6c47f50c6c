//! Token parser for the inline command syntax.
//!
//! The grammar is a single bracketed token embedded anywhere in free text:
//! `{name arg1 arg2}>`. Only the first leftmost match per call is considered.

use regex::Regex;

/// Pattern for one invocation token: non-greedy, non-empty inner run.
const TOKEN_PATTERN: &str = r"\{(.+?)\}>";

/// One parsed invocation, extracted from a single token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedInvocation {
    /// The exact matched substring, kept for the substitution step.
    pub token: String,
    /// Command name (first space-separated piece).
    pub name: String,
    /// Positional arguments, in order, as raw strings. No escaping, no
    /// quoting, no type coercion.
    pub args: Vec<String>,
}

/// Scans free-form text for the command-invocation pattern.
pub struct TokenParser {
    pattern: Regex,
}

impl TokenParser {
    pub fn new() -> Self {
        Self {
            // The pattern is a literal constant; it cannot fail to compile.
            pattern: Regex::new(TOKEN_PATTERN).expect("token pattern is valid"),
        }
    }

    /// Find the first invocation token in `text`.
    ///
    /// Returns `None` for blank text (short-circuit, no pattern match is
    /// attempted), for text without a token, and for a token whose command
    /// name is empty (e.g. `{ }>`).
    pub fn find_invocation(&self, text: &str) -> Option<ParsedInvocation> {
        if text.trim().is_empty() {
            return None;
        }

        let matched = self.pattern.find(text)?;
        let token = matched.as_str();

        let inner = token.trim();
        let inner = inner.strip_suffix('>').unwrap_or(inner);
        let inner = inner
            .strip_prefix('{')
            .and_then(|s| s.strip_suffix('}'))
            .unwrap_or(inner);

        let mut parts = inner.split(' ');
        let name = parts.next().unwrap_or_default();
        if name.is_empty() {
            return None;
        }

        Some(ParsedInvocation {
            token: token.to_string(),
            name: name.to_string(),
            args: parts.map(str::to_string).collect(),
        })
    }
}

impl Default for TokenParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Option<ParsedInvocation> {
        TokenParser::new().find_invocation(text)
    }

    #[test]
    fn blank_text_short_circuits() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("   \t  "), None);
    }

    #[test]
    fn text_without_token_yields_none() {
        assert_eq!(parse("just some prose"), None);
        assert_eq!(parse("{unclosed"), None);
        assert_eq!(parse("missing}> opener"), None);
        assert_eq!(parse("{}>"), None);
    }

    #[test]
    fn empty_command_name_yields_none() {
        assert_eq!(parse("{ }>"), None);
        assert_eq!(parse("{ args only}>"), None);
    }

    #[test]
    fn bare_command_without_args() {
        let inv = parse("before {info}> after").expect("invocation");
        assert_eq!(inv.token, "{info}>");
        assert_eq!(inv.name, "info");
        assert!(inv.args.is_empty());
    }

    #[test]
    fn arguments_split_on_single_spaces_in_order() {
        let inv = parse("{greet Alice Bob}>").expect("invocation");
        assert_eq!(inv.name, "greet");
        assert_eq!(inv.args, vec!["Alice".to_string(), "Bob".to_string()]);
    }

    #[test]
    fn consecutive_spaces_produce_empty_arguments() {
        // Raw strings, no normalization: double space means an empty argument.
        let inv = parse("{repeat 2  x}>").expect("invocation");
        assert_eq!(inv.args, vec!["2".to_string(), String::new(), "x".to_string()]);
    }

    #[test]
    fn only_first_match_is_considered() {
        let inv = parse("{first}> then {second}>").expect("invocation");
        assert_eq!(inv.name, "first");
    }

    #[test]
    fn non_greedy_inner_run() {
        let inv = parse("{a}> {b}>").expect("invocation");
        assert_eq!(inv.token, "{a}>");
    }
}

//! Query Translator: turns raw user input into a safe FTS5 MATCH
//! expression.
//!
//! Every whitespace-delimited unit ends up as a quoted phrase token, so
//! boolean operators and column filters in the input read as literals
//! instead of query syntax. Double-quoted spans in the input are kept
//! atomic and pass through unchanged.

use std::sync::OnceLock;

use regex::Regex;

/// Splits on whitespace runs while treating `"..."` spans as atomic.
fn separator_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"\s+|".*?""#).expect("separator regex"))
}

/// Escape a raw user query into an FTS5 MATCH expression.
///
/// Never fails: an odd number of `"` characters means a truncated quote,
/// which is healed by appending a closing `"` before tokenizing. Empty
/// tokens and the bare `""` token are dropped, so blank input produces an
/// empty expression.
pub fn escape_fts(q: &str) -> String {
    let mut query = q.to_string();
    if query.matches('"').count() % 2 == 1 {
        query.push('"');
    }

    // Split-with-captures: the text between separators plus the quoted
    // separators themselves, in input order.
    let mut bits: Vec<&str> = Vec::new();
    let mut last = 0;
    for sep in separator_re().find_iter(&query) {
        bits.push(&query[last..sep.start()]);
        if sep.as_str().starts_with('"') {
            bits.push(sep.as_str());
        }
        last = sep.end();
    }
    bits.push(&query[last..]);

    bits.iter()
        .filter(|bit| !bit.is_empty() && **bit != "\"\"")
        .map(|bit| {
            if bit.starts_with('"') {
                (*bit).to_string()
            } else {
                format!("\"{bit}\"")
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::escape_fts;

    #[test]
    fn quotes_every_bare_token() {
        assert_eq!(escape_fts("foo bar"), "\"foo\" \"bar\"");
    }

    #[test]
    fn preserves_quoted_spans() {
        assert_eq!(escape_fts("\"foo bar\" baz"), "\"foo bar\" \"baz\"");
        assert_eq!(escape_fts("a \"b c\" d"), "\"a\" \"b c\" \"d\"");
    }

    #[test]
    fn idempotent_on_well_formed_input() {
        let once = escape_fts("foo \"bar baz\" qux");
        assert_eq!(escape_fts(&once), once);
    }

    #[test]
    fn heals_unbalanced_quote() {
        assert_eq!(escape_fts("\"unterminated"), "\"unterminated\"");
        assert_eq!(escape_fts("a \"b c"), "\"a\" \"b c\"");
    }

    #[test]
    fn empty_inputs_produce_empty_expression() {
        assert_eq!(escape_fts(""), "");
        assert_eq!(escape_fts(" "), "");
        assert_eq!(escape_fts("\"\""), "");
        assert_eq!(escape_fts("  \t  "), "");
    }

    #[test]
    fn neutralizes_operator_injection() {
        // Operators and column filters become literal phrase tokens.
        assert_eq!(escape_fts("dogs OR cats"), "\"dogs\" \"OR\" \"cats\"");
        assert_eq!(
            escape_fts("episode_number: 5 NOT x"),
            "\"episode_number:\" \"5\" \"NOT\" \"x\""
        );
        assert_eq!(escape_fts("(a AND b)"), "\"(a\" \"AND\" \"b)\"");
    }

    #[test]
    fn collapses_whitespace_runs() {
        assert_eq!(escape_fts("  foo \t bar  "), "\"foo\" \"bar\"");
    }
}

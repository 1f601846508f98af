//! Token-stream helpers shared by the normalizer, validator, and inferrer
//!
//! The core works on sqlparser's token stream rather than a parsed AST:
//! clause scanning and projection splitting only need lexical structure,
//! and the tokenizer already handles comments, quoted strings, and
//! numbers per dialect.

use sqlparser::keywords::Keyword;
use sqlparser::tokenizer::{Token, TokenWithSpan, Tokenizer, TokenizerError, Whitespace};

use crate::dialect::SqlDialect;

/// Aggregate functions that require an explicit alias and map through the
/// fixed function-to-type table
pub(crate) const AGGREGATE_FUNCTIONS: &[&str] = &[
    "COUNT",
    "SUM",
    "AVG",
    "MIN",
    "MAX",
    "ARRAY_AGG",
    "OBJECT_AGG",
    "COLLECT_LIST",
    "LISTAGG",
];

/// Ranking window functions, always integral
pub(crate) const RANKING_FUNCTIONS: &[&str] = &["ROW_NUMBER", "RANK", "DENSE_RANK", "NTILE"];

/// Value window functions, typed by their first argument
pub(crate) const VALUE_WINDOW_FUNCTIONS: &[&str] = &["LAG", "LEAD", "FIRST_VALUE", "LAST_VALUE"];

/// Date/time functions returning a timestamp
pub(crate) const TIMESTAMP_FUNCTIONS: &[&str] = &[
    "CURRENT_TIMESTAMP",
    "NOW",
    "DATE_TRUNC",
    "TO_TIMESTAMP",
    "DATEADD",
    "DATE_ADD",
];

/// Date/time functions returning a date
pub(crate) const DATE_FUNCTIONS: &[&str] = &["TO_DATE", "CURRENT_DATE"];

/// Date-part extraction functions, integral results
pub(crate) const DATEPART_FUNCTIONS: &[&str] = &["EXTRACT", "DATEDIFF", "DATE_PART"];

/// String-producing scalar functions
pub(crate) const STRING_FUNCTIONS: &[&str] = &[
    "CONCAT", "UPPER", "LOWER", "TRIM", "SUBSTRING", "SUBSTR", "REPLACE", "LPAD", "RPAD",
];

/// Null-handling functions typed by their first argument
pub(crate) const FIRST_ARG_FUNCTIONS: &[&str] = &["COALESCE", "NVL", "IFNULL"];

/// Tokenize with the dialect's lexical rules, keeping source locations
pub(crate) fn tokenize(
    sql: &str,
    dialect: SqlDialect,
) -> Result<Vec<TokenWithSpan>, TokenizerError> {
    let tokenizer_dialect = dialect.tokenizer_dialect();
    Tokenizer::new(tokenizer_dialect.as_ref(), sql).tokenize_with_location()
}

pub(crate) fn is_whitespace(token: &Token) -> bool {
    matches!(token, Token::Whitespace(_) | Token::EOF)
}

pub(crate) fn is_comment(token: &Token) -> bool {
    matches!(
        token,
        Token::Whitespace(Whitespace::SingleLineComment { .. })
            | Token::Whitespace(Whitespace::MultiLineComment(_))
    )
}

/// Filter out whitespace, comments, and EOF
pub(crate) fn significant(tokens: &[TokenWithSpan]) -> Vec<&TokenWithSpan> {
    tokens.iter().filter(|t| !is_whitespace(&t.token)).collect()
}

/// Whether a token is the given unquoted keyword
pub(crate) fn is_keyword(token: &Token, keyword: Keyword) -> bool {
    matches!(token, Token::Word(w) if w.keyword == keyword && w.quote_style.is_none())
}

/// Upper-cased word value for case-insensitive function-name matching
pub(crate) fn word_upper(token: &Token) -> Option<String> {
    match token {
        Token::Word(w) if w.quote_style.is_none() => Some(w.value.to_uppercase()),
        _ => None,
    }
}

/// Deepest parenthesis nesting over the whole stream
pub(crate) fn max_paren_depth(tokens: &[&TokenWithSpan]) -> usize {
    let mut depth = 0usize;
    let mut max = 0usize;
    for t in tokens {
        match t.token {
            Token::LParen => {
                depth += 1;
                max = max.max(depth);
            }
            Token::RParen => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    max
}

/// Extract the top-level SELECT list: significant tokens between the
/// outermost SELECT and the matching top-level FROM (or end of input).
///
/// A leading DISTINCT/ALL qualifier is skipped. FROM inside parentheses
/// (e.g. `EXTRACT(year FROM ts)`) does not terminate the list.
pub(crate) fn select_list<'t>(sig: &[&'t TokenWithSpan]) -> Option<Vec<&'t TokenWithSpan>> {
    let mut depth = 0usize;
    let mut start = None;
    for (i, t) in sig.iter().enumerate() {
        match &t.token {
            Token::LParen => depth += 1,
            Token::RParen => depth = depth.saturating_sub(1),
            _ if depth == 0 && is_keyword(&t.token, Keyword::SELECT) => {
                start = Some(i + 1);
                break;
            }
            _ => {}
        }
    }
    let mut start = start?;

    // Skip the set quantifier if present
    if let Some(t) = sig.get(start) {
        if is_keyword(&t.token, Keyword::DISTINCT) || is_keyword(&t.token, Keyword::ALL) {
            start += 1;
        }
    }

    let mut list = Vec::new();
    let mut depth = 0usize;
    for t in &sig[start..] {
        match &t.token {
            Token::LParen => depth += 1,
            Token::RParen => depth = depth.saturating_sub(1),
            _ if depth == 0 && is_keyword(&t.token, Keyword::FROM) => break,
            _ if depth == 0 && matches!(t.token, Token::SemiColon) => break,
            _ => {}
        }
        list.push(*t);
    }
    Some(list)
}

/// Split a SELECT list at top-level commas
pub(crate) fn split_projections<'t>(list: &[&'t TokenWithSpan]) -> Vec<Vec<&'t TokenWithSpan>> {
    let mut projections = Vec::new();
    let mut current: Vec<&TokenWithSpan> = Vec::new();
    let mut depth = 0usize;
    for t in list {
        match &t.token {
            Token::LParen => {
                depth += 1;
                current.push(t);
            }
            Token::RParen => {
                depth = depth.saturating_sub(1);
                current.push(t);
            }
            Token::Comma if depth == 0 => {
                if !current.is_empty() {
                    projections.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(t),
        }
    }
    if !current.is_empty() {
        projections.push(current);
    }
    projections
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sig_tokens(sql: &str) -> Vec<TokenWithSpan> {
        tokenize(sql, SqlDialect::Snowflake).unwrap()
    }

    #[test]
    fn test_select_list_stops_at_top_level_from() {
        let tokens = sig_tokens("SELECT a, b FROM t WHERE x = 1");
        let sig = significant(&tokens);
        let list = select_list(&sig).unwrap();
        let rendered: Vec<String> = list.iter().map(|t| t.token.to_string()).collect();
        assert_eq!(rendered, vec!["a", ",", "b"]);
    }

    #[test]
    fn test_select_list_ignores_from_inside_extract() {
        let tokens = sig_tokens("SELECT EXTRACT(year FROM ts) AS y FROM t");
        let sig = significant(&tokens);
        let list = select_list(&sig).unwrap();
        // The EXTRACT arguments stay in the list; only the outer FROM ends it
        assert!(list.iter().any(|t| t.token.to_string() == "ts"));
        assert!(list.iter().any(|t| t.token.to_string() == "y"));
    }

    #[test]
    fn test_split_projections_respects_nesting() {
        let tokens = sig_tokens("COALESCE(a, b), SUM(x), c");
        let sig = significant(&tokens);
        let projections = split_projections(&sig);
        assert_eq!(projections.len(), 3);
        assert_eq!(projections[0].len(), 6); // COALESCE ( a , b )
    }

    #[test]
    fn test_max_paren_depth() {
        let tokens = sig_tokens("SUM(COALESCE(a, (b)))");
        let sig = significant(&tokens);
        assert_eq!(max_paren_depth(&sig), 3);
    }

    #[test]
    fn test_comments_are_whitespace() {
        let tokens = sig_tokens("SELECT a -- trailing\nFROM t");
        assert!(tokens.iter().any(|t| is_comment(&t.token)));
        let sig = significant(&tokens);
        assert!(sig.iter().all(|t| !is_comment(&t.token)));
    }
}

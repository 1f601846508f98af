//! Query normalization
//!
//! Produces the canonical text form used for error messages and
//! round-tripping: comments removed, whitespace runs collapsed, keywords
//! upper-cased. String literal contents are preserved verbatim because
//! the dialect tokenizer treats each literal as a single token.
//!
//! Normalization never rejects input; anything the tokenizer cannot
//! handle is returned trimmed, and rejection is left to the validator.

use sqlparser::keywords::Keyword;
use sqlparser::tokenizer::{Token, Word};

use crate::dialect::SqlDialect;
use crate::lex;

/// Normalize a query to its canonical single-line form.
///
/// Idempotent: normalizing an already-normalized query yields an
/// identical string.
pub fn normalize(sql: &str, dialect: SqlDialect) -> String {
    let tokens = match lex::tokenize(sql, dialect) {
        Ok(tokens) => tokens,
        Err(e) => {
            tracing::debug!(error = %e, "tokenization failed, returning trimmed input");
            return sql.trim().to_string();
        }
    };

    let mut out = String::new();
    let mut prev: Option<Token> = None;
    for t in tokens {
        if lex::is_whitespace(&t.token) {
            continue;
        }
        if let Some(ref p) = prev {
            if needs_space(p, &t.token) {
                out.push(' ');
            }
        }
        out.push_str(&render(&t.token));
        prev = Some(t.token);
    }
    out
}

/// Canonical text for a single token: unquoted keywords are upper-cased,
/// everything else renders as tokenized
fn render(token: &Token) -> String {
    match token {
        Token::Word(w) if w.quote_style.is_none() && w.keyword != Keyword::NoKeyword => {
            w.value.to_uppercase()
        }
        other => other.to_string(),
    }
}

fn needs_space(prev: &Token, next: &Token) -> bool {
    match next {
        Token::Comma | Token::RParen | Token::SemiColon | Token::Period => return false,
        _ => {}
    }
    match prev {
        Token::LParen | Token::Period => return false,
        _ => {}
    }
    // Function calls stay tight (`COUNT(`), clause keywords keep their
    // space (`FROM (`, `IN (`)
    if matches!(next, Token::LParen) {
        if let Token::Word(w) = prev {
            return is_clause_keyword(w);
        }
    }
    true
}

fn is_clause_keyword(word: &Word) -> bool {
    matches!(
        word.keyword,
        Keyword::SELECT
            | Keyword::FROM
            | Keyword::WHERE
            | Keyword::GROUP
            | Keyword::ORDER
            | Keyword::HAVING
            | Keyword::BY
            | Keyword::JOIN
            | Keyword::ON
            | Keyword::AND
            | Keyword::OR
            | Keyword::NOT
            | Keyword::IN
            | Keyword::AS
            | Keyword::THEN
            | Keyword::WHEN
            | Keyword::ELSE
            | Keyword::OVER
            | Keyword::EXISTS
            | Keyword::BETWEEN
            | Keyword::LIKE
            | Keyword::DISTINCT
            | Keyword::ALL
            | Keyword::UNION
            | Keyword::VALUES
            | Keyword::WITH
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn norm(sql: &str) -> String {
        normalize(sql, SqlDialect::Snowflake)
    }

    #[test]
    fn test_collapses_whitespace_and_uppercases_keywords() {
        let sql = "select\n    customer_id,\n    amount\nfrom   orders";
        assert_eq!(norm(sql), "SELECT customer_id, amount FROM orders");
    }

    #[test]
    fn test_strips_line_comments() {
        let sql = "SELECT a, -- the a column\n b FROM t";
        assert_eq!(norm(sql), "SELECT a, b FROM t");
    }

    #[test]
    fn test_strips_block_comments() {
        let sql = "SELECT /* projection */ a FROM t";
        assert_eq!(norm(sql), "SELECT a FROM t");
    }

    #[test]
    fn test_preserves_string_literal_contents() {
        let sql = "SELECT a FROM t WHERE note = 'keep -- this  spacing'";
        assert_eq!(
            norm(sql),
            "SELECT a FROM t WHERE note = 'keep -- this  spacing'"
        );
    }

    #[test]
    fn test_function_calls_stay_tight() {
        let sql = "SELECT count( * ) AS n, sum (amount) AS total FROM t";
        assert_eq!(norm(sql), "SELECT COUNT(*) AS n, SUM(amount) AS total FROM t");
    }

    #[test]
    fn test_idempotent() {
        let queries = [
            "select a,b from t",
            "SELECT COUNT(*) AS n FROM t GROUP BY a",
            "select case when x > 1 then 'hi' else 'lo' end as flag from t",
            "SELECT EXTRACT(year FROM ts) AS y FROM t",
        ];
        for q in queries {
            let once = norm(q);
            assert_eq!(norm(&once), once, "not idempotent for: {q}");
        }
    }

    #[test]
    fn test_untokenizable_input_returned_trimmed() {
        // Unterminated string literal cannot tokenize
        let sql = "  SELECT 'oops FROM t  ";
        assert_eq!(norm(sql), "SELECT 'oops FROM t");
    }

    #[test]
    fn test_qualified_names_stay_tight() {
        assert_eq!(norm("select orders . status from orders"), "SELECT orders.status FROM orders");
    }
}

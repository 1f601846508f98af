//! Structural validation policy
//!
//! The safety policy is an ordered list of tagged rules checked against
//! the token stream. Rules run in a fixed order and the first failure
//! wins, which keeps rejection reasons deterministic for callers and
//! tests. The wildcard and CTE rules are deliberate scope restrictions
//! for feature-store sources, not general SQL limitations.

use sqlparser::keywords::Keyword;
use sqlparser::tokenizer::{Token, TokenWithSpan};

use crate::dialect::SqlDialect;
use crate::error::{Span, ValidationError, ValidationErrorKind};
use crate::lex;

/// A single structural rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyRule {
    /// Reject queries that are empty after comment stripping
    NonEmpty,
    /// Reject `*` and `t.*` in the top-level SELECT list
    NoWildcard,
    /// Reject top-level WITH clauses
    NoCte,
    /// Reject statement terminators followed by further content
    SingleStatement,
    /// Require an explicit alias on aggregate calls in the SELECT list
    AggregateAlias,
    /// Reject heuristic injection markers
    NoUnsafePattern,
    /// Require the statement to begin with SELECT
    SelectOnly,
    /// Require a top-level FROM clause
    RequireFrom,
}

impl PolicyRule {
    /// The reason code this rule rejects with
    pub fn kind(&self) -> ValidationErrorKind {
        match self {
            PolicyRule::NonEmpty => ValidationErrorKind::EmptyQuery,
            PolicyRule::NoWildcard => ValidationErrorKind::WildcardSelect,
            PolicyRule::NoCte => ValidationErrorKind::CteNotSupported,
            PolicyRule::SingleStatement => ValidationErrorKind::MultipleStatements,
            PolicyRule::AggregateAlias => ValidationErrorKind::UnaliasedAggregate,
            PolicyRule::NoUnsafePattern => ValidationErrorKind::UnsafePattern,
            PolicyRule::SelectOnly => ValidationErrorKind::NotASelect,
            PolicyRule::RequireFrom => ValidationErrorKind::MissingFromClause,
        }
    }

    pub fn code(&self) -> &'static str {
        self.kind().code()
    }
}

/// Ordered, stateless rule set applied before inference
#[derive(Debug, Clone)]
pub struct ValidationPolicy {
    rules: Vec<PolicyRule>,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            rules: vec![
                PolicyRule::NonEmpty,
                PolicyRule::NoWildcard,
                PolicyRule::NoCte,
                PolicyRule::SingleStatement,
                PolicyRule::AggregateAlias,
                PolicyRule::NoUnsafePattern,
                PolicyRule::SelectOnly,
                PolicyRule::RequireFrom,
            ],
        }
    }
}

impl ValidationPolicy {
    pub fn new(rules: Vec<PolicyRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[PolicyRule] {
        &self.rules
    }

    /// Validate a query against the rule set, returning the first
    /// failing rule's error
    pub fn validate(&self, sql: &str, dialect: SqlDialect) -> Result<(), ValidationError> {
        let tokens = lex::tokenize(sql, dialect).map_err(|e| {
            ValidationError::new(
                ValidationErrorKind::UnsafePattern,
                format!("query could not be tokenized: {}", e),
            )
        })?;

        for rule in &self.rules {
            check_rule(*rule, &tokens)?;
            tracing::trace!(rule = rule.code(), "rule passed");
        }
        Ok(())
    }
}

fn check_rule(rule: PolicyRule, tokens: &[TokenWithSpan]) -> Result<(), ValidationError> {
    let sig = lex::significant(tokens);
    match rule {
        PolicyRule::NonEmpty => {
            if sig.is_empty() {
                return Err(ValidationError::new(
                    ValidationErrorKind::EmptyQuery,
                    "query is empty",
                ));
            }
            Ok(())
        }
        PolicyRule::NoWildcard => check_wildcard(&sig),
        PolicyRule::NoCte => check_cte(&sig),
        PolicyRule::SingleStatement => check_single_statement(&sig),
        PolicyRule::AggregateAlias => check_aggregate_alias(&sig),
        PolicyRule::NoUnsafePattern => check_unsafe(tokens),
        PolicyRule::SelectOnly => check_select_only(&sig),
        PolicyRule::RequireFrom => check_require_from(&sig),
    }
}

/// A `*` in the top-level SELECT list is a wildcard when it opens the
/// list or follows a comma or period; anything else is multiplication
fn check_wildcard(sig: &[&TokenWithSpan]) -> Result<(), ValidationError> {
    let Some(list) = lex::select_list(sig) else {
        return Ok(());
    };

    let mut depth = 0usize;
    let mut prev: Option<&Token> = None;
    for t in &list {
        match &t.token {
            Token::LParen => depth += 1,
            Token::RParen => depth = depth.saturating_sub(1),
            Token::Mul if depth == 0 => {
                let is_wildcard = match prev {
                    None => true,
                    Some(Token::Comma) | Some(Token::Period) => true,
                    _ => false,
                };
                if is_wildcard {
                    let qualified = matches!(prev, Some(Token::Period));
                    let message = if qualified {
                        "qualified wildcard in SELECT list; enumerate columns explicitly"
                    } else {
                        "wildcard SELECT is not allowed; enumerate columns explicitly"
                    };
                    return Err(ValidationError::new(
                        ValidationErrorKind::WildcardSelect,
                        message,
                    )
                    .with_span(Span::from_sqlparser(&t.span)));
                }
            }
            _ => {}
        }
        prev = Some(&t.token);
    }
    Ok(())
}

fn check_cte(sig: &[&TokenWithSpan]) -> Result<(), ValidationError> {
    let mut depth = 0usize;
    for t in sig {
        match &t.token {
            Token::LParen => depth += 1,
            Token::RParen => depth = depth.saturating_sub(1),
            _ if depth == 0 && lex::is_keyword(&t.token, Keyword::WITH) => {
                return Err(ValidationError::new(
                    ValidationErrorKind::CteNotSupported,
                    "CTEs (WITH clauses) are not supported",
                )
                .with_span(Span::from_sqlparser(&t.span)));
            }
            _ => {}
        }
    }
    Ok(())
}

fn check_single_statement(sig: &[&TokenWithSpan]) -> Result<(), ValidationError> {
    let terminator = sig
        .iter()
        .position(|t| matches!(t.token, Token::SemiColon));
    if let Some(pos) = terminator {
        if let Some(next) = sig.get(pos + 1) {
            return Err(ValidationError::new(
                ValidationErrorKind::MultipleStatements,
                "multiple statements are not allowed",
            )
            .with_span(Span::from_sqlparser(&next.span)));
        }
    }
    Ok(())
}

fn check_aggregate_alias(sig: &[&TokenWithSpan]) -> Result<(), ValidationError> {
    let Some(list) = lex::select_list(sig) else {
        return Ok(());
    };

    for projection in lex::split_projections(&list) {
        let mut depth = 0usize;
        let mut aggregate: Option<(String, Span)> = None;
        let mut has_alias = false;

        for (i, t) in projection.iter().enumerate() {
            match &t.token {
                Token::LParen => depth += 1,
                Token::RParen => depth = depth.saturating_sub(1),
                _ if depth == 0 => {
                    if lex::is_keyword(&t.token, Keyword::AS) {
                        has_alias = true;
                    } else if aggregate.is_none() {
                        if let Some(name) = lex::word_upper(&t.token) {
                            let calls_next = matches!(
                                projection.get(i + 1).map(|n| &n.token),
                                Some(Token::LParen)
                            );
                            if calls_next && lex::AGGREGATE_FUNCTIONS.contains(&name.as_str()) {
                                aggregate = Some((name, Span::from_sqlparser(&t.span)));
                            }
                        }
                    }
                }
                _ => {}
            }
        }

        if let Some((name, span)) = aggregate {
            if !has_alias {
                return Err(ValidationError::new(
                    ValidationErrorKind::UnaliasedAggregate,
                    format!("aggregate function {} requires an explicit AS alias", name),
                )
                .with_span(span));
            }
        }
    }
    Ok(())
}

/// Injection markers: a comment after the statement terminator, or more
/// than one terminator. Scans the raw stream because comments are
/// stripped everywhere else.
fn check_unsafe(tokens: &[TokenWithSpan]) -> Result<(), ValidationError> {
    let mut terminators = 0usize;
    for t in tokens {
        if matches!(t.token, Token::SemiColon) {
            terminators += 1;
            if terminators > 1 {
                return Err(ValidationError::new(
                    ValidationErrorKind::UnsafePattern,
                    "multiple statement terminators",
                )
                .with_span(Span::from_sqlparser(&t.span)));
            }
        } else if terminators > 0 && lex::is_comment(&t.token) {
            return Err(ValidationError::new(
                ValidationErrorKind::UnsafePattern,
                "comment after statement terminator",
            )
            .with_span(Span::from_sqlparser(&t.span)));
        }
    }
    Ok(())
}

fn check_select_only(sig: &[&TokenWithSpan]) -> Result<(), ValidationError> {
    match sig.first() {
        Some(t) if lex::is_keyword(&t.token, Keyword::SELECT) => Ok(()),
        Some(t) => Err(ValidationError::new(
            ValidationErrorKind::NotASelect,
            "query must start with SELECT",
        )
        .with_span(Span::from_sqlparser(&t.span))),
        None => Ok(()),
    }
}

fn check_require_from(sig: &[&TokenWithSpan]) -> Result<(), ValidationError> {
    let mut depth = 0usize;
    for t in sig {
        match &t.token {
            Token::LParen => depth += 1,
            Token::RParen => depth = depth.saturating_sub(1),
            _ if depth == 0 && lex::is_keyword(&t.token, Keyword::FROM) => return Ok(()),
            _ => {}
        }
    }
    Err(ValidationError::new(
        ValidationErrorKind::MissingFromClause,
        "query must contain a FROM clause",
    ))
}

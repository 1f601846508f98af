//! Schema inference
//!
//! Infers an ordered column-name-to-logical-type schema from a validated
//! SELECT statement. Projections are split at top-level commas and typed
//! by a pattern dispatcher over a closed set of expression shapes (bare
//! column, function call, cast, window function, CASE, arithmetic) —
//! deliberately not a general SQL expression evaluator.

use std::collections::HashSet;

use sqlparser::keywords::Keyword;
use sqlparser::tokenizer::{Token, TokenWithSpan};

use crate::dialect::SqlDialect;
use crate::error::{InferenceError, InferenceErrorKind, SchemaError, Span};
use crate::lex;
use crate::schema::{ColumnSpec, InferredSchema, SourceCatalog};
use crate::types::{LogicalType, TypeConfidence};
use crate::validate::ValidationPolicy;

/// Defensive cap on input size
pub const MAX_QUERY_LEN: usize = 64 * 1024;
/// Defensive cap on parenthesis nesting
pub const MAX_NESTING_DEPTH: usize = 32;
/// Cap on dispatcher recursion within a single expression
const MAX_EXPR_RECURSION: usize = 16;

/// Expression type inference result
#[derive(Debug, Clone, Copy, PartialEq)]
enum ExprType {
    /// Type is known (successfully inferred)
    Known(LogicalType),
    /// No rule matches; callers decide whether that is fatal
    Unknown,
}

/// Infers schemas for one dialect, optionally consulting declared
/// source-table metadata for bare column references.
///
/// Pure over its inputs: no shared mutable state, safe to use from any
/// number of threads.
pub struct SchemaInferrer<'a> {
    dialect: SqlDialect,
    policy: ValidationPolicy,
    catalog: Option<&'a SourceCatalog>,
}

impl<'a> SchemaInferrer<'a> {
    pub fn new(dialect: SqlDialect) -> Self {
        Self {
            dialect,
            policy: ValidationPolicy::default(),
            catalog: None,
        }
    }

    /// Replace the default validation policy
    pub fn with_policy(mut self, policy: ValidationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Consult declared source-table metadata for bare column references
    pub fn with_catalog(mut self, catalog: &'a SourceCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Validate the query and infer its output schema
    pub fn infer(&self, sql: &str) -> Result<InferredSchema, SchemaError> {
        if sql.len() > MAX_QUERY_LEN {
            return Err(InferenceError::new(
                InferenceErrorKind::QueryTooComplex,
                format!("query exceeds {} bytes", MAX_QUERY_LEN),
            )
            .into());
        }

        self.policy.validate(sql, self.dialect)?;

        // Validation already tokenized successfully
        let tokens = lex::tokenize(sql, self.dialect).map_err(|e| {
            InferenceError::new(
                InferenceErrorKind::QueryTooComplex,
                format!("query could not be tokenized: {}", e),
            )
        })?;
        let sig = lex::significant(&tokens);

        if lex::max_paren_depth(&sig) > MAX_NESTING_DEPTH {
            return Err(InferenceError::new(
                InferenceErrorKind::QueryTooComplex,
                format!("parenthesis nesting exceeds {} levels", MAX_NESTING_DEPTH),
            )
            .into());
        }

        let list = lex::select_list(&sig).ok_or_else(|| {
            InferenceError::new(
                InferenceErrorKind::UnresolvableType,
                "query has no SELECT list",
            )
        })?;

        let mut columns = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        for projection in lex::split_projections(&list) {
            let spec = self.projection_spec(&projection)?;
            if !seen.insert(spec.name.to_lowercase()) {
                return Err(InferenceError::new(
                    InferenceErrorKind::DuplicateColumn,
                    format!("duplicate column name '{}'", spec.name),
                )
                .with_span(Span::from_sqlparser(&projection[0].span))
                .into());
            }
            columns.push(spec);
        }

        // Warehouse-internal columns never reach the feature store
        columns.retain(|c| !self.dialect.is_system_column(&c.name));

        tracing::debug!(
            dialect = %self.dialect,
            columns = columns.len(),
            "schema inferred"
        );
        Ok(InferredSchema::new(columns))
    }

    /// Build the column spec for a single projection
    fn projection_spec(&self, projection: &[&TokenWithSpan]) -> Result<ColumnSpec, InferenceError> {
        let first_span = Span::from_sqlparser(&projection[0].span);

        if let Some((expr, alias)) = split_alias(projection) {
            let nullable = !never_null(&expr);
            return match self.expr_type(&expr, 0)? {
                ExprType::Known(data_type) => {
                    let mut spec =
                        ColumnSpec::new(alias, data_type).with_confidence(TypeConfidence::Inferred);
                    spec.nullable = nullable;
                    Ok(spec)
                }
                ExprType::Unknown => Err(InferenceError::new(
                    InferenceErrorKind::UnresolvableType,
                    format!("cannot determine type for column '{}'", alias),
                )
                .with_span(first_span)),
            };
        }

        if let Some(segments) = column_reference(projection) {
            let name = segments[segments.len() - 1].clone();
            let meta = self.lookup_column(&segments);
            return Ok(match meta {
                Some(meta) => {
                    let mut spec = ColumnSpec::new(name, meta.data_type)
                        .with_confidence(TypeConfidence::Declared);
                    spec.nullable = meta.nullable;
                    spec
                }
                None => ColumnSpec::new(name, self.dialect.fallback_type())
                    .with_confidence(TypeConfidence::Fallback),
            });
        }

        Err(InferenceError::new(
            InferenceErrorKind::UnresolvableType,
            "expression requires an explicit AS alias",
        )
        .with_span(first_span))
    }

    /// Resolve a (possibly qualified) column reference against the catalog
    fn lookup_column(&self, segments: &[String]) -> Option<&crate::schema::ColumnMeta> {
        let catalog = self.catalog?;
        let name = segments.last()?;
        if segments.len() >= 2 {
            let table = &segments[segments.len() - 2];
            catalog.get_table(table).and_then(|t| t.get_column(name))
        } else {
            catalog.resolve_column(name)
        }
    }

    /// The expression-shape dispatcher
    fn expr_type(&self, tokens: &[&TokenWithSpan], depth: usize) -> Result<ExprType, InferenceError> {
        if depth > MAX_EXPR_RECURSION {
            return Err(InferenceError::new(
                InferenceErrorKind::QueryTooComplex,
                "expression nesting too deep",
            ));
        }

        let tokens = strip_outer_parens(tokens);
        if tokens.is_empty() {
            return Ok(ExprType::Unknown);
        }

        // A trailing OVER (..) does not change the underlying type
        if let Some(pos) = find_depth0(tokens, |t| lex::is_keyword(t, Keyword::OVER)) {
            return self.expr_type(&tokens[..pos], depth + 1);
        }

        // String concatenation
        if find_depth0(tokens, |t| matches!(t, Token::StringConcat)).is_some() {
            return Ok(ExprType::Known(LogicalType::String));
        }

        if lex::is_keyword(&tokens[0].token, Keyword::CASE) {
            return self.case_type(tokens, depth);
        }

        if let Some((name, args)) = function_call(tokens) {
            return self.function_type(&name, args, depth);
        }

        // Arithmetic at the top nesting level
        if let Some(pos) = find_depth0(tokens, |t| {
            matches!(t, Token::Plus | Token::Minus | Token::Mul | Token::Div | Token::Mod)
        }) {
            if pos == 0 {
                // Unary sign
                return self.expr_type(&tokens[1..], depth + 1);
            }
            let left = self.expr_type(&tokens[..pos], depth + 1)?;
            let right = self.expr_type(&tokens[pos + 1..], depth + 1)?;
            let integral_division = matches!(tokens[pos].token, Token::Div);
            return Ok(match (left, right) {
                (ExprType::Known(l), ExprType::Known(r))
                    if l.is_integral() && r.is_integral() && !integral_division =>
                {
                    ExprType::Known(LogicalType::Int64)
                }
                _ => ExprType::Known(LogicalType::Float),
            });
        }

        if tokens.len() == 1 {
            if let Some(t) = literal_type(&tokens[0].token) {
                return Ok(t);
            }
            // Parameterless date/time forms (CURRENT_DATE and friends)
            if let Some(name) = lex::word_upper(&tokens[0].token) {
                if lex::TIMESTAMP_FUNCTIONS.contains(&name.as_str()) {
                    return Ok(ExprType::Known(LogicalType::Timestamp));
                }
                if lex::DATE_FUNCTIONS.contains(&name.as_str()) {
                    return Ok(ExprType::Known(LogicalType::Date));
                }
            }
        }

        // Bare (possibly qualified) column reference inside an expression
        if let Some(segments) = column_reference(tokens) {
            return Ok(match self.lookup_column(&segments) {
                Some(meta) => ExprType::Known(meta.data_type),
                None => ExprType::Unknown,
            });
        }

        Ok(ExprType::Unknown)
    }

    /// CASE expressions take the type of their first THEN result
    fn case_type(&self, tokens: &[&TokenWithSpan], depth: usize) -> Result<ExprType, InferenceError> {
        let Some(then_pos) = find_depth0(tokens, |t| lex::is_keyword(t, Keyword::THEN)) else {
            return Ok(ExprType::Unknown);
        };
        let rest = &tokens[then_pos + 1..];
        let end = find_depth0(rest, |t| {
            lex::is_keyword(t, Keyword::WHEN)
                || lex::is_keyword(t, Keyword::ELSE)
                || lex::is_keyword(t, Keyword::END)
        })
        .unwrap_or(rest.len());
        self.expr_type(&rest[..end], depth + 1)
    }

    /// The fixed function-to-type table
    fn function_type(
        &self,
        name: &str,
        args: &[&TokenWithSpan],
        depth: usize,
    ) -> Result<ExprType, InferenceError> {
        let arg_slices = lex::split_projections(args);
        let first_arg = arg_slices.first();

        let first_arg_type = |this: &Self| -> Result<ExprType, InferenceError> {
            match first_arg {
                Some(arg) => this.expr_type(arg, depth + 1),
                None => Ok(ExprType::Unknown),
            }
        };

        match name {
            "COUNT" => Ok(ExprType::Known(LogicalType::Int64)),
            // SUM preserves an integral operand; AVG is always fractional
            "SUM" => Ok(match first_arg_type(self)? {
                ExprType::Known(t) if t.is_integral() => ExprType::Known(LogicalType::Int64),
                _ => ExprType::Known(LogicalType::Float),
            }),
            "AVG" => Ok(ExprType::Known(LogicalType::Float)),
            "MIN" | "MAX" => Ok(match first_arg_type(self)? {
                ExprType::Known(t) => ExprType::Known(t),
                ExprType::Unknown => ExprType::Known(LogicalType::Float),
            }),
            "ARRAY_AGG" | "OBJECT_AGG" | "COLLECT_LIST" | "LISTAGG" => {
                Ok(ExprType::Known(LogicalType::String))
            }
            "CAST" | "TRY_CAST" => Ok(self.cast_type(args)),
            _ if lex::RANKING_FUNCTIONS.contains(&name) => Ok(ExprType::Known(LogicalType::Int64)),
            _ if lex::VALUE_WINDOW_FUNCTIONS.contains(&name) => first_arg_type(self),
            _ if lex::TIMESTAMP_FUNCTIONS.contains(&name) => {
                Ok(ExprType::Known(LogicalType::Timestamp))
            }
            _ if lex::DATE_FUNCTIONS.contains(&name) => Ok(ExprType::Known(LogicalType::Date)),
            _ if lex::DATEPART_FUNCTIONS.contains(&name) => Ok(ExprType::Known(LogicalType::Int64)),
            _ if lex::STRING_FUNCTIONS.contains(&name) => Ok(ExprType::Known(LogicalType::String)),
            _ if lex::FIRST_ARG_FUNCTIONS.contains(&name) => first_arg_type(self),
            _ => Ok(ExprType::Unknown),
        }
    }

    /// `CAST(expr AS T)` resolves T through the dialect type map
    fn cast_type(&self, args: &[&TokenWithSpan]) -> ExprType {
        let Some(as_pos) = find_depth0(args, |t| lex::is_keyword(t, Keyword::AS)) else {
            return ExprType::Unknown;
        };
        let type_tokens = &args[as_pos + 1..];
        let Some(base) = type_tokens.first().and_then(|t| lex::word_upper(&t.token)) else {
            return ExprType::Unknown;
        };
        ExprType::Known(self.dialect.type_map().resolve(&base))
    }
}

/// One-call convenience entry point: default policy, no catalog
pub fn infer_schema(sql: &str, dialect: SqlDialect) -> Result<InferredSchema, SchemaError> {
    SchemaInferrer::new(dialect).infer(sql)
}

/// Split `<expr> AS <alias>` at the top nesting level.
///
/// `AS` inside parentheses (`CAST(x AS INT)`) does not count. Only an
/// explicit trailing `AS identifier` is recognized as an alias.
fn split_alias<'t>(projection: &[&'t TokenWithSpan]) -> Option<(Vec<&'t TokenWithSpan>, String)> {
    let pos = find_depth0(projection, |t| lex::is_keyword(t, Keyword::AS))?;
    if pos + 2 != projection.len() {
        return None;
    }
    let alias = identifier_value(&projection[pos + 1].token)?;
    Some((projection[..pos].to_vec(), alias))
}

/// Identifier text of a word token, quoted or not
fn identifier_value(token: &Token) -> Option<String> {
    match token {
        Token::Word(w) => Some(w.value.clone()),
        _ => None,
    }
}

/// Match `ident`, `t.ident`, `schema.t.ident` and return the segments
fn column_reference(tokens: &[&TokenWithSpan]) -> Option<Vec<String>> {
    let mut segments = Vec::new();
    let mut expect_word = true;
    for t in tokens {
        match (&t.token, expect_word) {
            (Token::Word(w), true) if w.keyword == Keyword::NoKeyword || w.quote_style.is_some() => {
                segments.push(w.value.clone());
                expect_word = false;
            }
            (Token::Period, false) => expect_word = true,
            _ => return None,
        }
    }
    if expect_word || segments.is_empty() {
        return None;
    }
    Some(segments)
}

/// Strip redundant outer parentheses
fn strip_outer_parens<'a, 't>(mut tokens: &'a [&'t TokenWithSpan]) -> &'a [&'t TokenWithSpan] {
    while tokens.len() >= 2
        && matches!(tokens[0].token, Token::LParen)
        && matching_rparen(tokens, 0) == Some(tokens.len() - 1)
    {
        tokens = &tokens[1..tokens.len() - 1];
    }
    tokens
}

/// Index of the RParen matching the LParen at `open`
fn matching_rparen(tokens: &[&TokenWithSpan], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, t) in tokens.iter().enumerate().skip(open) {
        match t.token {
            Token::LParen => depth += 1,
            Token::RParen => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// First token at the top nesting level matching the predicate
fn find_depth0(tokens: &[&TokenWithSpan], pred: impl Fn(&Token) -> bool) -> Option<usize> {
    let mut depth = 0usize;
    for (i, t) in tokens.iter().enumerate() {
        match &t.token {
            Token::LParen => depth += 1,
            Token::RParen => depth = depth.saturating_sub(1),
            other if depth == 0 && pred(other) => return Some(i),
            _ => {}
        }
    }
    None
}

/// Match `name( .. )` covering the whole slice
fn function_call<'a, 't>(
    tokens: &'a [&'t TokenWithSpan],
) -> Option<(String, &'a [&'t TokenWithSpan])> {
    if tokens.len() < 3 {
        return None;
    }
    let name = lex::word_upper(&tokens[0].token)?;
    if !matches!(tokens[1].token, Token::LParen) {
        return None;
    }
    if matching_rparen(tokens, 1) != Some(tokens.len() - 1) {
        return None;
    }
    Some((name, &tokens[2..tokens.len() - 1]))
}

/// Literal token types
fn literal_type(token: &Token) -> Option<ExprType> {
    match token {
        Token::Number(n, _) => {
            if n.contains('.') || n.contains('e') || n.contains('E') {
                Some(ExprType::Known(LogicalType::Float))
            } else {
                Some(ExprType::Known(LogicalType::Int64))
            }
        }
        Token::SingleQuotedString(_) | Token::DoubleQuotedString(_) => {
            Some(ExprType::Known(LogicalType::String))
        }
        Token::Word(w) if w.keyword == Keyword::TRUE || w.keyword == Keyword::FALSE => {
            Some(ExprType::Known(LogicalType::Bool))
        }
        Token::Word(w) if w.keyword == Keyword::NULL => Some(ExprType::Unknown),
        _ => None,
    }
}

/// Expressions whose result can never be NULL
fn never_null(tokens: &[&TokenWithSpan]) -> bool {
    let tokens = strip_outer_parens(tokens);
    let head = match find_depth0(tokens, |t| lex::is_keyword(t, Keyword::OVER)) {
        Some(pos) => &tokens[..pos],
        None => tokens,
    };
    match function_call(head) {
        Some((name, _)) => name == "COUNT" || lex::RANKING_FUNCTIONS.contains(&name.as_str()),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnMeta, TableMeta};

    fn infer(sql: &str) -> Result<InferredSchema, SchemaError> {
        infer_schema(sql, SqlDialect::Snowflake)
    }

    fn catalog() -> SourceCatalog {
        let mut transactions = TableMeta::new("transactions");
        transactions.add_column("customer_id", ColumnMeta::new(LogicalType::Int64).not_null());
        transactions.add_column("amount", ColumnMeta::new(LogicalType::Float));
        transactions.add_column("quantity", ColumnMeta::new(LogicalType::Int64));
        let mut c = SourceCatalog::new();
        c.add_table(transactions);
        c
    }

    #[test]
    fn test_bare_column_falls_back_to_string() {
        let schema = infer("SELECT customer_id FROM transactions").unwrap();
        let col = &schema.columns()[0];
        assert_eq!(col.name, "customer_id");
        assert_eq!(col.data_type, LogicalType::String);
        assert_eq!(col.confidence, TypeConfidence::Fallback);
    }

    #[test]
    fn test_bare_column_uses_catalog_when_available() {
        let catalog = catalog();
        let inferrer = SchemaInferrer::new(SqlDialect::Snowflake).with_catalog(&catalog);
        let schema = inferrer.infer("SELECT customer_id FROM transactions").unwrap();
        let col = &schema.columns()[0];
        assert_eq!(col.data_type, LogicalType::Int64);
        assert_eq!(col.confidence, TypeConfidence::Declared);
        assert!(!col.nullable);
    }

    #[test]
    fn test_qualified_column_uses_table_metadata() {
        let catalog = catalog();
        let inferrer = SchemaInferrer::new(SqlDialect::Snowflake).with_catalog(&catalog);
        let schema = inferrer
            .infer("SELECT transactions.amount FROM transactions")
            .unwrap();
        let col = &schema.columns()[0];
        assert_eq!(col.name, "amount");
        assert_eq!(col.data_type, LogicalType::Float);
    }

    #[test]
    fn test_count_is_int64_and_not_null() {
        let schema = infer("SELECT COUNT(*) AS n FROM t").unwrap();
        let col = schema.get("n").unwrap();
        assert_eq!(col.data_type, LogicalType::Int64);
        assert!(!col.nullable);
    }

    #[test]
    fn test_sum_preserves_integral_operand() {
        let catalog = catalog();
        let inferrer = SchemaInferrer::new(SqlDialect::Snowflake).with_catalog(&catalog);
        let schema = inferrer
            .infer("SELECT SUM(quantity) AS total_qty, SUM(amount) AS total_amt FROM transactions")
            .unwrap();
        assert_eq!(schema.get("total_qty").unwrap().data_type, LogicalType::Int64);
        assert_eq!(schema.get("total_amt").unwrap().data_type, LogicalType::Float);
    }

    #[test]
    fn test_avg_is_always_float() {
        let catalog = catalog();
        let inferrer = SchemaInferrer::new(SqlDialect::Snowflake).with_catalog(&catalog);
        let schema = inferrer
            .infer("SELECT AVG(quantity) AS avg_qty FROM transactions")
            .unwrap();
        assert_eq!(schema.get("avg_qty").unwrap().data_type, LogicalType::Float);
    }

    #[test]
    fn test_sum_of_case_literal_is_integral() {
        let schema = infer(
            "SELECT SUM(CASE WHEN amount > 100 THEN 1 ELSE 0 END) AS big_orders FROM t",
        )
        .unwrap();
        assert_eq!(schema.get("big_orders").unwrap().data_type, LogicalType::Int64);
    }

    #[test]
    fn test_case_takes_first_then_branch_type() {
        let schema =
            infer("SELECT CASE WHEN x > 0 THEN 'high' ELSE 'low' END AS bucket FROM t").unwrap();
        assert_eq!(schema.get("bucket").unwrap().data_type, LogicalType::String);
    }

    #[test]
    fn test_window_functions() {
        let schema = infer(
            "SELECT ROW_NUMBER() OVER (ORDER BY ts) AS rn, LAG(amount) OVER (ORDER BY ts) AS prev_amt FROM t",
        );
        // prev_amt needs catalog knowledge of `amount`; without it the
        // value window function is unresolvable
        assert!(schema.is_err());

        let catalog = catalog();
        let inferrer = SchemaInferrer::new(SqlDialect::Snowflake).with_catalog(&catalog);
        let schema = inferrer
            .infer("SELECT ROW_NUMBER() OVER (ORDER BY ts) AS rn, LAG(amount) OVER (ORDER BY ts) AS prev_amt FROM transactions")
            .unwrap();
        assert_eq!(schema.get("rn").unwrap().data_type, LogicalType::Int64);
        assert!(!schema.get("rn").unwrap().nullable);
        assert_eq!(schema.get("prev_amt").unwrap().data_type, LogicalType::Float);
    }

    #[test]
    fn test_cast_resolves_through_dialect_map() {
        let schema = infer("SELECT CAST(amount AS NUMBER(12,2)) AS amt FROM t").unwrap();
        assert_eq!(schema.get("amt").unwrap().data_type, LogicalType::Float);

        let schema = infer_schema(
            "SELECT CAST(amount AS NUMBER(12,2)) AS amt FROM t",
            SqlDialect::SparkEmr,
        )
        .unwrap();
        // Spark has no NUMBER type; unknown names take the map fallback
        assert_eq!(schema.get("amt").unwrap().data_type, LogicalType::String);
    }

    #[test]
    fn test_date_functions() {
        let schema = infer(
            "SELECT DATE_TRUNC('day', ts) AS day_ts, TO_DATE(ts) AS day, EXTRACT(year FROM ts) AS yr FROM t",
        )
        .unwrap();
        assert_eq!(schema.get("day_ts").unwrap().data_type, LogicalType::Timestamp);
        assert_eq!(schema.get("day").unwrap().data_type, LogicalType::Date);
        assert_eq!(schema.get("yr").unwrap().data_type, LogicalType::Int64);
    }

    #[test]
    fn test_string_concat_operator() {
        let schema = infer("SELECT first || ' ' || last AS full_name FROM t").unwrap();
        assert_eq!(schema.get("full_name").unwrap().data_type, LogicalType::String);
    }

    #[test]
    fn test_arithmetic_types() {
        let catalog = catalog();
        let inferrer = SchemaInferrer::new(SqlDialect::Snowflake).with_catalog(&catalog);
        let schema = inferrer
            .infer("SELECT quantity + 1 AS q1, quantity / 2 AS q2, amount * 2 AS a2 FROM transactions")
            .unwrap();
        assert_eq!(schema.get("q1").unwrap().data_type, LogicalType::Int64);
        assert_eq!(schema.get("q2").unwrap().data_type, LogicalType::Float);
        assert_eq!(schema.get("a2").unwrap().data_type, LogicalType::Float);
    }

    #[test]
    fn test_duplicate_columns_rejected() {
        let err = infer("SELECT a AS x, b AS x FROM t").unwrap_err();
        match err {
            SchemaError::Inference(e) => {
                assert_eq!(e.kind, InferenceErrorKind::DuplicateColumn);
                assert!(e.message.contains('x'));
            }
            other => panic!("expected inference error, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_detection_is_case_insensitive() {
        let err = infer("SELECT a AS total, b AS TOTAL FROM t").unwrap_err();
        assert_eq!(err.code(), "DUPLICATE_COLUMN");
    }

    #[test]
    fn test_unaliased_expression_is_unresolvable() {
        let err = infer("SELECT price + 1 FROM t").unwrap_err();
        assert_eq!(err.code(), "UNRESOLVABLE_TYPE");
    }

    #[test]
    fn test_unknown_function_is_unresolvable() {
        let err = infer("SELECT FANCY_UDF(a) AS x FROM t").unwrap_err();
        assert_eq!(err.code(), "UNRESOLVABLE_TYPE");
    }

    #[test]
    fn test_query_length_guard() {
        let padding = "x".repeat(MAX_QUERY_LEN);
        let err = infer(&format!("SELECT a FROM {}", padding)).unwrap_err();
        assert_eq!(err.code(), "QUERY_TOO_COMPLEX");
    }

    #[test]
    fn test_nesting_depth_guard() {
        let nested = format!(
            "SELECT {}amount{} AS a FROM t",
            "(".repeat(MAX_NESTING_DEPTH + 1),
            ")".repeat(MAX_NESTING_DEPTH + 1)
        );
        let err = infer(&nested).unwrap_err();
        assert_eq!(err.code(), "QUERY_TOO_COMPLEX");
    }

    #[test]
    fn test_snowflake_system_columns_filtered() {
        let schema = infer("SELECT customer_id, SYS_LOAD_TS FROM t").unwrap();
        assert_eq!(schema.names(), vec!["customer_id"]);

        // Other dialects keep the column
        let schema =
            infer_schema("SELECT customer_id, SYS_LOAD_TS FROM t", SqlDialect::Teradata).unwrap();
        assert_eq!(schema.names(), vec!["customer_id", "SYS_LOAD_TS"]);
    }

    #[test]
    fn test_validation_failure_propagates() {
        let err = infer("SELECT * FROM t").unwrap_err();
        assert_eq!(err.code(), "WILDCARD_SELECT");
    }
}

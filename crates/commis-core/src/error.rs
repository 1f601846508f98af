//! Error types for validation and inference failures

use miette::SourceSpan;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Source location span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// Byte offset from start of source (optional, for miette compatibility)
    pub offset: usize,
    /// Length in bytes
    pub length: usize,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
}

impl Span {
    /// Create a span with byte offset
    pub fn new(offset: usize, length: usize) -> Self {
        Self {
            offset,
            length,
            line: 0,
            column: 0,
        }
    }

    /// Create a span with line and column information
    pub fn with_location(line: usize, column: usize, length: usize) -> Self {
        Self {
            offset: 0,
            length,
            line,
            column,
        }
    }

    /// Create a span from sqlparser's tokenizer span
    pub fn from_sqlparser(span: &sqlparser::tokenizer::Span) -> Self {
        let start = span.start;
        let end = span.end;
        let length = if end.column > start.column {
            end.column as usize - start.column as usize
        } else {
            1
        };
        Self {
            offset: 0,
            length,
            line: start.line as usize,
            column: start.column as usize,
        }
    }
}

impl From<Span> for SourceSpan {
    fn from(span: Span) -> Self {
        SourceSpan::new(span.offset.into(), span.length)
    }
}

/// Reason codes for structural/safety policy violations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationErrorKind {
    /// Query is empty after comment stripping
    EmptyQuery,
    /// Bare `*` or `t.*` in the top-level SELECT list
    WildcardSelect,
    /// Top-level WITH clause
    CteNotSupported,
    /// Statement terminator followed by further content
    MultipleStatements,
    /// Aggregate function call without an explicit AS alias
    UnaliasedAggregate,
    /// Heuristic SQL injection marker
    UnsafePattern,
    /// Statement does not begin with SELECT
    NotASelect,
    /// No top-level FROM clause
    MissingFromClause,
}

impl ValidationErrorKind {
    /// Stable machine-readable reason code
    pub fn code(&self) -> &'static str {
        match self {
            ValidationErrorKind::EmptyQuery => "EMPTY_QUERY",
            ValidationErrorKind::WildcardSelect => "WILDCARD_SELECT",
            ValidationErrorKind::CteNotSupported => "CTE_NOT_SUPPORTED",
            ValidationErrorKind::MultipleStatements => "MULTIPLE_STATEMENTS",
            ValidationErrorKind::UnaliasedAggregate => "UNALIASED_AGGREGATE",
            ValidationErrorKind::UnsafePattern => "UNSAFE_PATTERN",
            ValidationErrorKind::NotASelect => "NOT_A_SELECT",
            ValidationErrorKind::MissingFromClause => "MISSING_FROM_CLAUSE",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ValidationErrorKind::EmptyQuery => "empty-query",
            ValidationErrorKind::WildcardSelect => "wildcard-select",
            ValidationErrorKind::CteNotSupported => "cte-not-supported",
            ValidationErrorKind::MultipleStatements => "multiple-statements",
            ValidationErrorKind::UnaliasedAggregate => "unaliased-aggregate",
            ValidationErrorKind::UnsafePattern => "unsafe-pattern",
            ValidationErrorKind::NotASelect => "not-a-select",
            ValidationErrorKind::MissingFromClause => "missing-from-clause",
        }
    }
}

/// Structural/safety policy violation
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    pub message: String,
    pub span: Option<Span>,
}

impl ValidationError {
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            span: None,
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

/// Reason codes for schema inference failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InferenceErrorKind {
    /// Expression type could not be determined by any rule
    UnresolvableType,
    /// Two projections resolve to the same column name
    DuplicateColumn,
    /// Query exceeds defensive length/nesting limits
    QueryTooComplex,
}

impl InferenceErrorKind {
    /// Stable machine-readable reason code
    pub fn code(&self) -> &'static str {
        match self {
            InferenceErrorKind::UnresolvableType => "UNRESOLVABLE_TYPE",
            InferenceErrorKind::DuplicateColumn => "DUPLICATE_COLUMN",
            InferenceErrorKind::QueryTooComplex => "QUERY_TOO_COMPLEX",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            InferenceErrorKind::UnresolvableType => "unresolvable-type",
            InferenceErrorKind::DuplicateColumn => "duplicate-column",
            InferenceErrorKind::QueryTooComplex => "query-too-complex",
        }
    }
}

/// Schema inference failure
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct InferenceError {
    pub kind: InferenceErrorKind,
    pub message: String,
    pub span: Option<Span>,
}

impl InferenceError {
    pub fn new(kind: InferenceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            span: None,
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

/// Any failure the inference pipeline can produce.
///
/// Both variants are recoverable caller-facing outcomes; the core never
/// aborts on user input.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum SchemaError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Inference(#[from] InferenceError),
}

impl SchemaError {
    /// Stable machine-readable reason code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::Validation(e) => e.code(),
            SchemaError::Inference(e) => e.code(),
        }
    }

    /// Offending text span, when one was recorded
    pub fn span(&self) -> Option<Span> {
        match self {
            SchemaError::Validation(e) => e.span,
            SchemaError::Inference(e) => e.span,
        }
    }
}

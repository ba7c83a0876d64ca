use rengbis_schema::InvalidSchema;

/// An error produced while lexing or parsing a schema source file.
///
/// Parsing is fail-fast: the first error aborts the affected file.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxError {
    /// Malformed input, with the byte offset and line of the offending
    /// token.
    #[error("parse error at line {line}: expected {expected}, found {found}")]
    Parse {
        index: usize,
        line: usize,
        expected: String,
        found: String,
    },
    /// A constraint that can never hold, e.g. `10 <= length <= 5`.
    #[error("constraint error: {message}")]
    Constraint { message: String },
    /// An object literal repeats a label.
    #[error("duplicate field `{name}` in object literal")]
    DuplicateField { name: String },
    /// Nesting deeper than the configured recursion limit.
    #[error("schema nesting exceeds the recursion limit ({limit})")]
    RecursionLimit { limit: usize },
    #[error(transparent)]
    Invalid(#[from] InvalidSchema),
}

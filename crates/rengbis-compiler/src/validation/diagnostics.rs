use std::fmt;

/// A single validation finding, with a dotted JSON-path locating it in
/// the value tree (`$`, `$.name`, `$.items[2].id`, …).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    path: String,
    message: String,
}

impl Diagnostic {
    pub(crate) fn new(path: String, message: String) -> Self {
        Self { path, message }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path == "$" {
            f.write_str(&self.message)
        } else {
            write!(f, "{} (at {})", self.message, self.path)
        }
    }
}

/// Outcome of validating a value against a schema. Errors and warnings
/// accumulate independently; deprecation is currently the only warning
/// source.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationResult {
    pub(crate) errors: Vec<Diagnostic>,
    pub(crate) warnings: Vec<Diagnostic>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResultKind {
    Valid,
    WithWarnings,
    Errors,
}

impl ValidationResult {
    pub fn kind(&self) -> ResultKind {
        if !self.errors.is_empty() {
            ResultKind::Errors
        } else if !self.warnings.is_empty() {
            ResultKind::WithWarnings
        } else {
            ResultKind::Valid
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    /// Rendered error messages, in traversal order.
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// Rendered warning messages, in traversal order.
    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.iter().map(ToString::to_string).collect()
    }
}

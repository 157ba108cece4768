use graphql_syntax::OffsetRange;

/// A text edit representing a change to apply to fix a lint issue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    /// Byte offset range in the linted document
    pub offset_range: OffsetRange,
    /// The text to replace the range with (empty string means deletion)
    pub new_text: String,
}

impl TextEdit {
    #[must_use]
    pub fn new(offset_range: OffsetRange, new_text: impl Into<String>) -> Self {
        Self {
            offset_range,
            new_text: new_text.into(),
        }
    }

    /// Create a deletion edit (replace range with empty string)
    #[must_use]
    pub const fn delete(offset_range: OffsetRange) -> Self {
        Self {
            offset_range,
            new_text: String::new(),
        }
    }

    #[must_use]
    pub fn is_deletion(&self) -> bool {
        self.new_text.is_empty() && !self.offset_range.is_empty()
    }
}

/// A suggested fix for a lint diagnostic.
///
/// Suggestions are never applied automatically; they are surfaced to the
/// user alongside the diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeFix {
    /// Human-readable description of what the fix does
    pub label: String,
    /// The text edits to apply (in order)
    pub edits: Vec<TextEdit>,
}

impl CodeFix {
    #[must_use]
    pub fn new(label: impl Into<String>, edits: Vec<TextEdit>) -> Self {
        Self {
            label: label.into(),
            edits,
        }
    }

    /// Create a simple deletion fix
    #[must_use]
    pub fn delete(label: impl Into<String>, offset_range: OffsetRange) -> Self {
        Self::new(label, vec![TextEdit::delete(offset_range)])
    }
}

/// Lint-specific diagnostic with byte offsets (not line/column)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintDiagnostic {
    /// Byte offset range in the linted document
    pub offset_range: OffsetRange,
    /// Severity (from rule default or config override)
    pub severity: LintSeverity,
    /// Human-readable message
    pub message: String,
    /// Rule identifier (e.g., `"selection_set_depth"`)
    pub rule: &'static str,
    /// Suggested fixes, possibly empty
    pub fixes: Vec<CodeFix>,
}

impl LintDiagnostic {
    #[must_use]
    pub fn new(
        offset_range: OffsetRange,
        severity: LintSeverity,
        message: impl Into<String>,
        rule: &'static str,
    ) -> Self {
        Self {
            offset_range,
            severity,
            message: message.into(),
            rule,
            fixes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_fixes(mut self, fixes: Vec<CodeFix>) -> Self {
        self.fixes = fixes;
        self
    }

    #[must_use]
    pub fn with_severity(mut self, severity: LintSeverity) -> Self {
        self.severity = severity;
        self
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.severity, LintSeverity::Error)
    }
}

/// Severity of a reported diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LintSeverity {
    Error,
    Warning,
}

impl std::fmt::Display for LintSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

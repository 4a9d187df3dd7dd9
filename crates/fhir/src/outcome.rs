//! OperationOutcome issues.
//!
//! Shared by the structural validator, which reports its findings as
//! [`Issue`]s, and the REST layer, which renders errors as OperationOutcome
//! resources.

use std::fmt;

use serde_json::{Value, json};

/// Issue severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IssueSeverity {
    /// Processing cannot continue.
    Fatal,
    /// Processing has failed.
    Error,
    /// Processing succeeded with concerns.
    Warning,
    /// Informational message.
    Information,
}

impl IssueSeverity {
    /// Returns the FHIR code.
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueSeverity::Fatal => "fatal",
            IssueSeverity::Error => "error",
            IssueSeverity::Warning => "warning",
            IssueSeverity::Information => "information",
        }
    }

    /// Returns true for `fatal` and `error`.
    pub fn is_failure(&self) -> bool {
        matches!(self, IssueSeverity::Fatal | IssueSeverity::Error)
    }
}

impl fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Issue type codes (subset of the `issue-type` value set).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueType {
    /// Invalid content.
    Invalid,
    /// Structural issue.
    Structure,
    /// Required element missing.
    Required,
    /// Value of the wrong kind or format.
    Value,
    /// Invariant violated.
    Invariant,
    /// Code not in the required value set.
    CodeInvalid,
    /// Resource not found.
    NotFound,
    /// Not supported.
    NotSupported,
    /// Unexpected internal failure.
    Exception,
    /// Temporary failure.
    Transient,
    /// Informational message.
    Informational,
}

impl IssueType {
    /// Returns the FHIR code.
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::Invalid => "invalid",
            IssueType::Structure => "structure",
            IssueType::Required => "required",
            IssueType::Value => "value",
            IssueType::Invariant => "invariant",
            IssueType::CodeInvalid => "code-invalid",
            IssueType::NotFound => "not-found",
            IssueType::NotSupported => "not-supported",
            IssueType::Exception => "exception",
            IssueType::Transient => "transient",
            IssueType::Informational => "informational",
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single OperationOutcome issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// Severity.
    pub severity: IssueSeverity,
    /// Issue type code.
    pub code: IssueType,
    /// Human-readable description.
    pub diagnostics: String,
    /// FHIRPath-style location of the offending element.
    pub expression: Option<String>,
}

impl Issue {
    /// Creates a new issue.
    pub fn new(severity: IssueSeverity, code: IssueType, diagnostics: impl Into<String>) -> Self {
        Self {
            severity,
            code,
            diagnostics: diagnostics.into(),
            expression: None,
        }
    }

    /// Creates an error issue.
    pub fn error(code: IssueType, diagnostics: impl Into<String>) -> Self {
        Self::new(IssueSeverity::Error, code, diagnostics)
    }

    /// Creates a warning issue.
    pub fn warning(code: IssueType, diagnostics: impl Into<String>) -> Self {
        Self::new(IssueSeverity::Warning, code, diagnostics)
    }

    /// Creates an information issue.
    pub fn information(code: IssueType, diagnostics: impl Into<String>) -> Self {
        Self::new(IssueSeverity::Information, code, diagnostics)
    }

    /// Sets the expression.
    pub fn with_expression(mut self, expression: impl Into<String>) -> Self {
        self.expression = Some(expression.into());
        self
    }

    /// Converts to FHIR JSON.
    pub fn to_json(&self) -> Value {
        let mut issue = json!({
            "severity": self.severity.as_str(),
            "code": self.code.as_str(),
            "diagnostics": self.diagnostics,
        });

        if let Some(expr) = &self.expression {
            issue["expression"] = json!([expr]);
        }

        issue
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.expression {
            Some(expr) => write!(f, "[{}] {}: {}", self.severity, expr, self.diagnostics),
            None => write!(f, "[{}] {}", self.severity, self.diagnostics),
        }
    }
}

/// Builds an OperationOutcome resource from a list of issues.
pub fn operation_outcome<'a>(issues: impl IntoIterator<Item = &'a Issue>) -> Value {
    let issues: Vec<Value> = issues.into_iter().map(Issue::to_json).collect();
    json!({
        "resourceType": "OperationOutcome",
        "issue": issues,
    })
}

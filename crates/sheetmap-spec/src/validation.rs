use std::error::Error;
use std::fmt;

/// A single invariant violation found while validating a [`crate::WorkbookSpec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecIssue {
    path: String,
    message: String,
}

impl SpecIssue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Dotted location of the offending element, e.g. `sheets[0].fields[2].key`.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for SpecIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Validation failure carrying every issue found, not just the first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    issues: Vec<SpecIssue>,
}

impl ValidationError {
    pub fn new(issues: Vec<SpecIssue>) -> Self {
        Self { issues }
    }

    pub fn issues(&self) -> &[SpecIssue] {
        &self.issues
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "workbook spec is invalid ({} issue(s))", self.issues.len())?;
        for issue in &self.issues {
            write!(f, "\n  - {issue}")?;
        }
        Ok(())
    }
}

impl Error for ValidationError {}

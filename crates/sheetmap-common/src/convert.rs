use crate::warning::{Warning, Warnings};
use std::error::Error;
use std::fmt::{self, Display};

/// Failure raised by a field conversion.
///
/// Kept deliberately small: the runtime attaches the cell reference and
/// decides recovery; converters only need to describe what went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertError {
    message: String,
}

impl ConvertError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error for ConvertError {}

impl From<String> for ConvertError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for ConvertError {
    fn from(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Per-cell context handed to converters.
///
/// Carries the human-readable cell reference and mutable access to the run's
/// warning sink, the documented extension point for soft validation.
pub struct ConvertContext<'a> {
    reference: String,
    warnings: &'a mut Warnings,
}

impl<'a> ConvertContext<'a> {
    pub fn new(reference: String, warnings: &'a mut Warnings) -> Self {
        Self {
            reference,
            warnings,
        }
    }

    /// Reference of the cell currently being converted, e.g. `'Sheet'!B5`.
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Record a warning against the current cell without failing conversion.
    pub fn warn(&mut self, code: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(
            Warning::new(message)
                .with_reference(self.reference.clone())
                .with_code(code),
        );
    }

    /// Record a fully custom warning.
    pub fn push(&mut self, warning: Warning) {
        self.warnings.push(warning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warn_attaches_current_reference() {
        let mut warnings = Warnings::new();
        let mut ctx = ConvertContext::new("'Sheet'!N15".to_string(), &mut warnings);
        ctx.warn("CUSTOM_CODE", "Expected 400 or 800. Got 600");

        let collected = warnings.into_vec();
        assert_eq!(collected.len(), 1);
        assert_eq!(collected[0].reference.as_deref(), Some("'Sheet'!N15"));
        assert_eq!(collected[0].code.as_deref(), Some("CUSTOM_CODE"));
    }
}

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Warning codes emitted by the extraction runtime.
///
/// These strings are stable identifiers; converters may additionally emit
/// arbitrary codes of their own.
pub mod codes {
    /// A fully blank data row was skipped under the exclude-row policy.
    pub const ROW_EXCLUDED_DUE_TO_BLANKS: &str = "row_excluded_due_to_blanks";
    /// A fully blank data row stopped iteration under the truncate policy.
    pub const ROWS_TRUNCATED_DUE_TO_BLANKS: &str = "rows_truncated_due_to_blanks";
    /// A conversion failure was absorbed by the field's error default.
    pub const CELL_DEFAULTED_DUE_TO_ERROR: &str = "cell_defaulted_due_to_error";
    /// A row was dropped because a cell failed without an error default.
    pub const ROW_EXCLUDED_DUE_TO_CELL_ERROR: &str = "row_excluded_due_to_cell_error";
}

/// A recoverable issue recorded during extraction.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    /// Spreadsheet-style locator (`'Sheet'!B5`, `'Sheet'!3:3`), when known.
    pub reference: Option<String>,
    /// Stable machine-readable code, when applicable.
    pub code: Option<String>,
    pub message: String,
}

impl Warning {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            reference: None,
            code: None,
            message: message.into(),
        }
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// Append-only warning sink shared across one extraction run.
///
/// The sink is threaded explicitly through every converter invocation; it is
/// the only side channel converters are allowed to touch.
#[derive(Debug, Default)]
pub struct Warnings {
    entries: Vec<Warning>,
}

impl Warnings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, warning: Warning) {
        self.entries.push(warning);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Warning> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[Warning] {
        &self.entries
    }

    pub fn into_vec(self) -> Vec<Warning> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sink_preserves_order() {
        let mut warnings = Warnings::new();
        warnings.push(Warning::new("first"));
        warnings.push(
            Warning::new("second")
                .with_reference("'Sheet'!A1")
                .with_code(codes::CELL_DEFAULTED_DUE_TO_ERROR),
        );

        let collected = warnings.into_vec();
        assert_eq!(collected.len(), 2);
        assert_eq!(collected[0].message, "first");
        assert_eq!(collected[1].reference.as_deref(), Some("'Sheet'!A1"));
        assert_eq!(
            collected[1].code.as_deref(),
            Some("cell_defaulted_due_to_error")
        );
    }
}

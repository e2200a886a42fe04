use crate::convert::Convert;
use crate::matcher::Matcher;
use crate::validation::{SpecIssue, ValidationError};
use sheetmap_common::Value;
use std::collections::HashSet;

/// Default lower bound (inclusive) of the header search range.
pub const MIN_HEADER_ROW_INDEX: usize = 0;
/// Default upper bound (exclusive) of the header search range.
pub const MAX_HEADER_ROW_INDEX: usize = 100;

/// Half-open row range `[min_index, max_index)` searched for the header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderRowRange {
    pub min_index: usize,
    pub max_index: usize,
}

impl HeaderRowRange {
    pub fn new(min_index: usize, max_index: usize) -> Self {
        Self {
            min_index,
            max_index,
        }
    }
}

impl Default for HeaderRowRange {
    fn default() -> Self {
        Self {
            min_index: MIN_HEADER_ROW_INDEX,
            max_index: MAX_HEADER_ROW_INDEX,
        }
    }
}

/// What to do when a data row is entirely blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlankRowPolicy {
    /// Abort the sheet's extraction.
    #[default]
    Throw,
    /// Skip the row, record a warning, continue.
    ExcludeRow,
    /// Stop iterating at the row, record a warning; later rows are never read.
    Truncate,
}

/// What to do when a conversion fails and the field has no error default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellErrorPolicy {
    /// Abort the sheet's extraction.
    #[default]
    Throw,
    /// Drop the whole row, record a warning, continue.
    ExcludeRow,
}

/// Workbook-wide extraction options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Options {
    pub blank_rows: BlankRowPolicy,
    pub cell_errors: CellErrorPolicy,
}

/// One record field: how its column is found and how its cells convert.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub key: String,
    pub matcher: Matcher,
    pub convert: Convert,
    pub if_blank: Option<Value>,
    pub if_error: Option<Value>,
}

impl FieldSpec {
    /// The matcher defaults to exact equality with `key`; resolution happens
    /// here, once, never during matching.
    pub fn new(key: impl Into<String>, convert: Convert) -> Self {
        let key = key.into();
        Self {
            matcher: Matcher::Exact(key.clone()),
            key,
            convert,
            if_blank: None,
            if_error: None,
        }
    }

    pub fn matching(mut self, matcher: impl Into<Matcher>) -> Self {
        self.matcher = matcher.into();
        self
    }

    /// Value used verbatim for blank cells; the converter is never invoked.
    pub fn if_blank(mut self, value: impl Into<Value>) -> Self {
        self.if_blank = Some(value.into());
        self
    }

    /// Value used when conversion fails; degrades the failure to a warning.
    pub fn if_error(mut self, value: impl Into<Value>) -> Self {
        self.if_error = Some(value.into());
        self
    }
}

/// One sheet to extract: how it is found and the fields of its records.
///
/// Field declaration order is the field order of emitted records.
#[derive(Debug, Clone)]
pub struct SheetSpec {
    pub key: String,
    pub matcher: Matcher,
    pub header_rows: HeaderRowRange,
    pub fields: Vec<FieldSpec>,
}

impl SheetSpec {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            matcher: Matcher::Exact(key.clone()),
            key,
            header_rows: HeaderRowRange::default(),
            fields: Vec::new(),
        }
    }

    pub fn matching(mut self, matcher: impl Into<Matcher>) -> Self {
        self.matcher = matcher.into();
        self
    }

    pub fn header_rows(mut self, range: HeaderRowRange) -> Self {
        self.header_rows = range;
        self
    }

    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }
}

/// The full extraction schema: options plus sheets in output order.
#[derive(Debug, Clone, Default)]
pub struct WorkbookSpec {
    pub options: Options,
    pub sheets: Vec<SheetSpec>,
}

impl WorkbookSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    pub fn sheet(mut self, sheet: SheetSpec) -> Self {
        self.sheets.push(sheet);
        self
    }

    /// Validate the spec and return granular issues when invariants fail.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        if self.sheets.is_empty() {
            issues.push(SpecIssue::new(
                "sheets",
                "spec must define at least one sheet",
            ));
        }

        let mut seen_sheet_keys = HashSet::new();
        for (sheet_idx, sheet) in self.sheets.iter().enumerate() {
            let sheet_path = format!("sheets[{sheet_idx}]");

            if sheet.key.is_empty() {
                issues.push(SpecIssue::new(
                    format!("{sheet_path}.key"),
                    "sheet key must not be empty",
                ));
            }
            if !seen_sheet_keys.insert(&sheet.key) {
                issues.push(SpecIssue::new(
                    format!("{sheet_path}.key"),
                    format!("duplicate sheet key `{}`", sheet.key),
                ));
            }

            if sheet.header_rows.min_index >= sheet.header_rows.max_index {
                issues.push(SpecIssue::new(
                    format!("{sheet_path}.header_rows"),
                    format!(
                        "header range [{}, {}) is empty",
                        sheet.header_rows.min_index, sheet.header_rows.max_index
                    ),
                ));
            }

            if sheet.fields.is_empty() {
                issues.push(SpecIssue::new(
                    format!("{sheet_path}.fields"),
                    "schema must define at least one field",
                ));
            }

            let mut seen_field_keys = HashSet::new();
            for (field_idx, field) in sheet.fields.iter().enumerate() {
                let field_path = format!("{sheet_path}.fields[{field_idx}].key");
                if field.key.is_empty() {
                    issues.push(SpecIssue::new(&field_path, "field key must not be empty"));
                }
                if !seen_field_keys.insert(&field.key) {
                    issues.push(SpecIssue::new(
                        &field_path,
                        format!("duplicate field key `{}`", field.key),
                    ));
                }
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(issues))
        }
    }
}

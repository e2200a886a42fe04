use sheetmap_common::ConvertError;
use sheetmap_spec::ValidationError;
use thiserror::Error;

/// Errors raised while extracting records from a workbook.
///
/// Apart from `Invalid` (and the loader variants), every variant is fatal for
/// a single sheet only: sibling sheets in the same spec extract independently.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The workbook spec failed validation; nothing was extracted.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// No workbook sheet name satisfies the sheet's matcher.
    #[error("no matching sheet found for `{key}`")]
    MissingSheet { key: String },

    /// No row in the search range satisfied every field matcher. `missing`
    /// holds exactly the field keys absent from the best partial match.
    #[error("headers `{}` missing for sheet `{key}`", .missing.join("`, `"))]
    MissingHeaders { key: String, missing: Vec<String> },

    /// A fully blank data row under the default blank-row policy.
    #[error("row {row} of sheet {sheet} is blank")]
    BlankRow { sheet: String, row: u32 },

    /// A conversion failed on a field with no error default, under the
    /// default cell-error policy.
    #[error("conversion failed at {reference}: {source}")]
    CellError {
        reference: String,
        source: ConvertError,
    },

    /// The column binder found no column for a field the header locator
    /// already matched. Indicates a bug, never a data problem.
    #[error("field `{field}` bound no column in the header row of sheet `{key}`")]
    HeaderNotBound { key: String, field: String },

    /// The XLSX backend rejected the workbook bytes.
    #[cfg(feature = "calamine")]
    #[error("failed to parse workbook")]
    Xlsx(#[from] calamine::XlsxError),

    /// The workbook could not be read from disk.
    #[cfg(feature = "calamine")]
    #[error("failed to read workbook")]
    Io(#[from] std::io::Error),
}

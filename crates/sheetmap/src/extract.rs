use crate::binding::SheetBinding;
use crate::error::ExtractError;
use crate::header::locate_header_row;
use crate::workbook::{Sheet, Workbook};
use sheetmap_common::{
    CellValue, ConvertContext, ConvertError, Value, Warning, Warnings, cell_ref, codes, row_ref,
};
use sheetmap_spec::{BlankRowPolicy, CellErrorPolicy, FieldSpec, Options, SheetSpec, WorkbookSpec};

/// One extracted record: field keys and converted values in schema order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field_key, _)| field_key == key)
            .map(|(_, value)| value)
    }

    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields
            .iter()
            .map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Outcome of one configured sheet.
///
/// Sheets extract independently: a fatal error here never disturbs siblings.
#[derive(Debug)]
pub struct SheetResult {
    pub key: String,
    pub records: Result<Vec<Record>, ExtractError>,
}

/// Result of a whole extraction run: per-sheet outcomes in spec order plus
/// the shared warning log.
#[derive(Debug)]
pub struct Extraction {
    pub sheets: Vec<SheetResult>,
    pub warnings: Vec<Warning>,
}

impl Extraction {
    pub fn sheet(&self, key: &str) -> Option<&SheetResult> {
        self.sheets.iter().find(|sheet| sheet.key == key)
    }

    /// Records for a sheet that extracted successfully.
    pub fn records(&self, key: &str) -> Option<&[Record]> {
        match self.sheet(key)?.records {
            Ok(ref records) => Some(records),
            Err(_) => None,
        }
    }

    /// The error that aborted a sheet, if it failed.
    pub fn sheet_error(&self, key: &str) -> Option<&ExtractError> {
        match self.sheet(key)?.records {
            Ok(_) => None,
            Err(ref error) => Some(error),
        }
    }
}

/// Validate `spec` and extract every configured sheet from `workbook`.
pub fn extract(workbook: &Workbook, spec: &WorkbookSpec) -> Result<Extraction, ExtractError> {
    spec.validate()?;
    Ok(extract_validated(workbook, spec))
}

/// A validated spec, reusable across many workbooks.
///
/// The configuration-first call shape: build once, run against any number of
/// inputs without re-validating.
#[derive(Debug, Clone)]
pub struct Extractor {
    spec: WorkbookSpec,
}

impl Extractor {
    pub fn new(spec: WorkbookSpec) -> Result<Self, ExtractError> {
        spec.validate()?;
        Ok(Self { spec })
    }

    pub fn spec(&self) -> &WorkbookSpec {
        &self.spec
    }

    pub fn extract(&self, workbook: &Workbook) -> Extraction {
        extract_validated(workbook, &self.spec)
    }
}

fn extract_validated(workbook: &Workbook, spec: &WorkbookSpec) -> Extraction {
    let mut warnings = Warnings::new();
    let mut sheets = Vec::with_capacity(spec.sheets.len());

    for sheet_spec in &spec.sheets {
        let records = extract_sheet(workbook, sheet_spec, &spec.options, &mut warnings);
        sheets.push(SheetResult {
            key: sheet_spec.key.clone(),
            records,
        });
    }

    Extraction {
        sheets,
        warnings: warnings.into_vec(),
    }
}

fn extract_sheet(
    workbook: &Workbook,
    sheet_spec: &SheetSpec,
    options: &Options,
    warnings: &mut Warnings,
) -> Result<Vec<Record>, ExtractError> {
    #[cfg(feature = "tracing")]
    let _span = tracing::info_span!("extract_sheet", key = sheet_spec.key.as_str()).entered();

    let names = workbook.sheet_names();
    let sheet: &Sheet = names
        .iter()
        .enumerate()
        .find(|(index, name)| sheet_spec.matcher.matches(name.as_str(), *index, &names))
        .and_then(|(index, _)| workbook.sheets().get(index))
        .ok_or_else(|| ExtractError::MissingSheet {
            key: sheet_spec.key.clone(),
        })?;

    let rows = sheet.trimmed_rows();
    let header = locate_header_row(
        &sheet_spec.key,
        rows,
        &sheet_spec.header_rows,
        &sheet_spec.fields,
    )?;
    let binding = SheetBinding::bind(&sheet_spec.key, &header, &sheet_spec.fields)?;

    #[cfg(feature = "tracing")]
    tracing::debug!(
        sheet = sheet.name(),
        header_row = binding.header_index,
        "header located"
    );

    let mut records = Vec::new();

    'rows: for (offset, row) in rows[binding.header_index + 1..].iter().enumerate() {
        // 1-based spreadsheet row number of this data row
        let row_number = (offset + binding.header_index + 2) as u32;

        if row.iter().all(CellValue::is_blank) {
            match options.blank_rows {
                BlankRowPolicy::ExcludeRow => {
                    warnings.push(
                        Warning::new(format!(
                            "Row {row_number} is blank and was excluded from results"
                        ))
                        .with_reference(row_ref(sheet.name(), row_number))
                        .with_code(codes::ROW_EXCLUDED_DUE_TO_BLANKS),
                    );
                    continue 'rows;
                }
                BlankRowPolicy::Truncate => {
                    warnings.push(
                        Warning::new(format!(
                            "Row {row_number} is blank, and results were truncated starting from this row"
                        ))
                        .with_reference(row_ref(sheet.name(), row_number))
                        .with_code(codes::ROWS_TRUNCATED_DUE_TO_BLANKS),
                    );
                    break 'rows;
                }
                BlankRowPolicy::Throw => {
                    return Err(ExtractError::BlankRow {
                        sheet: sheet.name().to_string(),
                        row: row_number,
                    });
                }
            }
        }

        let mut fields = Vec::with_capacity(sheet_spec.fields.len());
        for (field, &column) in sheet_spec.fields.iter().zip(&binding.columns) {
            let cell = row.get(column).cloned().unwrap_or(CellValue::Empty);
            let reference = cell_ref(sheet.name(), row_number, column as u32);

            match convert_cell(field, &cell, reference, warnings) {
                Ok(value) => fields.push((field.key.clone(), value)),
                Err(failure) => match options.cell_errors {
                    CellErrorPolicy::Throw => {
                        return Err(ExtractError::CellError {
                            reference: failure.reference,
                            source: failure.source,
                        });
                    }
                    CellErrorPolicy::ExcludeRow => {
                        warnings.push(
                            Warning::new(format!(
                                "Row {row_number} was excluded because conversion failed: {}",
                                failure.source
                            ))
                            .with_reference(failure.reference)
                            .with_code(codes::ROW_EXCLUDED_DUE_TO_CELL_ERROR),
                        );
                        continue 'rows;
                    }
                },
            }
        }

        records.push(Record { fields });
    }

    Ok(records)
}

struct CellFailure {
    reference: String,
    source: ConvertError,
}

/// Convert one cell, applying the blank/error fallback policy in order:
/// blank default, primitive blank shortcut, conversion, error default.
fn convert_cell(
    field: &FieldSpec,
    cell: &CellValue,
    reference: String,
    warnings: &mut Warnings,
) -> Result<Value, CellFailure> {
    if cell.is_blank() {
        if let Some(default) = &field.if_blank {
            return Ok(default.clone());
        }
        if let Some(zero) = field.convert.blank_value() {
            return Ok(zero);
        }
    }

    let converted = {
        let mut ctx = ConvertContext::new(reference.clone(), warnings);
        field.convert.apply(cell, &mut ctx)
    };

    match converted {
        Ok(value) => Ok(value),
        Err(error) => {
            if let Some(default) = &field.if_error {
                warnings.push(
                    Warning::new(error.to_string())
                        .with_reference(reference)
                        .with_code(codes::CELL_DEFAULTED_DUE_TO_ERROR),
                );
                Ok(default.clone())
            } else {
                Err(CellFailure {
                    reference,
                    source: error,
                })
            }
        }
    }
}

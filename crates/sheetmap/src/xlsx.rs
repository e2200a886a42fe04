use crate::error::ExtractError;
use crate::extract::{Extraction, Extractor, extract};
use crate::workbook::{Sheet, Workbook};
use calamine::{Data, Range, Reader, Xlsx};
use sheetmap_common::CellValue;
use sheetmap_spec::WorkbookSpec;
use std::io::Cursor;
use std::path::Path;

/// Which sheets the XLSX backend materialises into grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadStrategy {
    /// Load every sheet in the workbook.
    #[default]
    EagerAll,
    /// Load only sheets some sheet spec's matcher accepts; the
    /// memory-conscious mode for workbooks with many irrelevant sheets.
    ConfiguredOnly,
}

/// Options forwarded to the XLSX backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOptions {
    pub strategy: LoadStrategy,
}

/// Parse workbook bytes into an in-memory [`Workbook`], loading every sheet.
pub fn read_xlsx_bytes(bytes: Vec<u8>) -> Result<Workbook, ExtractError> {
    load(bytes, &ReadOptions::default(), None)
}

/// Read and parse a workbook file, loading every sheet.
pub fn read_xlsx_path(path: impl AsRef<Path>) -> Result<Workbook, ExtractError> {
    load(std::fs::read(path)?, &ReadOptions::default(), None)
}

/// Extract records straight from workbook bytes.
pub fn extract_xlsx_bytes(bytes: Vec<u8>, spec: &WorkbookSpec) -> Result<Extraction, ExtractError> {
    extract_xlsx_bytes_with(bytes, spec, &ReadOptions::default())
}

pub fn extract_xlsx_bytes_with(
    bytes: Vec<u8>,
    spec: &WorkbookSpec,
    options: &ReadOptions,
) -> Result<Extraction, ExtractError> {
    spec.validate()?;
    let workbook = load(bytes, options, Some(spec))?;
    extract(&workbook, spec)
}

/// Extract records straight from a workbook file.
pub fn extract_xlsx_path(
    path: impl AsRef<Path>,
    spec: &WorkbookSpec,
) -> Result<Extraction, ExtractError> {
    extract_xlsx_bytes(std::fs::read(path)?, spec)
}

impl Extractor {
    /// Run this extractor's spec against workbook bytes.
    pub fn extract_xlsx_bytes(&self, bytes: Vec<u8>) -> Result<Extraction, ExtractError> {
        self.extract_xlsx_bytes_with(bytes, &ReadOptions::default())
    }

    pub fn extract_xlsx_bytes_with(
        &self,
        bytes: Vec<u8>,
        options: &ReadOptions,
    ) -> Result<Extraction, ExtractError> {
        let workbook = load(bytes, options, Some(self.spec()))?;
        Ok(self.extract(&workbook))
    }

    /// Run this extractor's spec against a workbook file.
    pub fn extract_xlsx_path(&self, path: impl AsRef<Path>) -> Result<Extraction, ExtractError> {
        self.extract_xlsx_bytes(std::fs::read(path)?)
    }
}

fn load(
    bytes: Vec<u8>,
    options: &ReadOptions,
    spec: Option<&WorkbookSpec>,
) -> Result<Workbook, ExtractError> {
    let mut xlsx: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;
    let names = xlsx.sheet_names().to_vec();

    #[cfg(feature = "tracing")]
    let _span = tracing::info_span!("xlsx_load", sheets = names.len()).entered();

    let mut workbook = Workbook::new();
    for (index, name) in names.iter().enumerate() {
        let wanted = match options.strategy {
            LoadStrategy::EagerAll => true,
            LoadStrategy::ConfiguredOnly => spec.is_none_or(|spec| {
                spec.sheets
                    .iter()
                    .any(|sheet| sheet.matcher.matches(name, index, &names))
            }),
        };
        if !wanted {
            #[cfg(feature = "tracing")]
            tracing::debug!(sheet = name.as_str(), "skipped by load strategy");
            continue;
        }

        let range = xlsx.worksheet_range(name)?;
        workbook.push_sheet(sheet_from_range(name, &range));
    }

    Ok(workbook)
}

/// Materialise a calamine range as an A1-anchored grid.
///
/// Calamine ranges start at the first used cell; the grid contract anchors
/// every sheet at A1, so leading rows and columns are padded with blanks to
/// keep warning references aligned with what the spreadsheet shows.
fn sheet_from_range(name: &str, range: &Range<Data>) -> Sheet {
    let (start_row, start_col) = range
        .start()
        .map(|(row, col)| (row as usize, col as usize))
        .unwrap_or((0, 0));

    let mut rows: Vec<Vec<CellValue>> = Vec::with_capacity(start_row + range.height());
    rows.resize(start_row, Vec::new());

    for row_values in range.rows() {
        let mut cells = Vec::with_capacity(start_col + row_values.len());
        cells.resize(start_col, CellValue::Empty);
        cells.extend(row_values.iter().map(convert_value));
        rows.push(cells);
    }

    Sheet::from_rows(name, rows)
}

fn convert_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Int(*i),
        Data::Bool(b) => CellValue::Boolean(*b),
        // Excel display text; contentful, so converters surface it as a failure
        Data::Error(e) => CellValue::Text(e.to_string()),
        // serial number; decode with `Convert::date_time()` where wanted
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::Text(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::ExcelDateTime;

    #[test]
    fn data_conversion() {
        assert_eq!(convert_value(&Data::Empty), CellValue::Empty);
        assert_eq!(
            convert_value(&Data::String("x".into())),
            CellValue::Text("x".into())
        );
        assert_eq!(convert_value(&Data::Float(2.5)), CellValue::Number(2.5));
        assert_eq!(convert_value(&Data::Int(3)), CellValue::Int(3));
        assert_eq!(convert_value(&Data::Bool(true)), CellValue::Boolean(true));
        assert_eq!(
            convert_value(&Data::Error(calamine::CellErrorType::NA)),
            CellValue::Text("#N/A".into())
        );
        match convert_value(&Data::DateTime(ExcelDateTime::new(
            45247.5,
            calamine::ExcelDateTimeType::DateTime,
            false,
        ))) {
            CellValue::Number(serial) => assert_eq!(serial, 45247.5),
            other => panic!("unexpected value: {other:?}"),
        }
    }

    #[test]
    fn range_is_anchored_at_a1() {
        // a used range starting at B2 gains one padding row and column
        let mut range: Range<Data> = Range::new((1, 1), (2, 2));
        range.set_value((1, 1), Data::String("ID".into()));
        range.set_value((2, 2), Data::Int(7));

        let sheet = sheet_from_range("Data", &range);
        assert_eq!(sheet.rows().len(), 3);
        assert!(sheet.rows()[0].is_empty());
        assert_eq!(sheet.rows()[1][0], CellValue::Empty);
        assert_eq!(sheet.rows()[1][1], CellValue::Text("ID".into()));
        assert_eq!(sheet.rows()[2][2], CellValue::Int(7));
    }
}

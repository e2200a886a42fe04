use sheetmap_common::CellValue;

/// One sheet's grid of raw cell values.
///
/// Rows need not be equal length; a row shorter than a bound column index
/// simply has absent trailing cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    name: String,
    rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    pub fn from_rows(name: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Append a row of cells.
    pub fn push_row<I>(&mut self, cells: I)
    where
        I: IntoIterator,
        I::Item: Into<CellValue>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    /// Set a single cell by 1-based row and column, growing the grid as needed.
    pub fn set_value(&mut self, row: u32, col: u32, value: impl Into<CellValue>) {
        let row = row.saturating_sub(1) as usize;
        let col = col.saturating_sub(1) as usize;
        if self.rows.len() <= row {
            self.rows.resize(row + 1, Vec::new());
        }
        let cells = &mut self.rows[row];
        if cells.len() <= col {
            cells.resize(col + 1, CellValue::Empty);
        }
        cells[col] = value.into();
    }

    /// The grid with trailing fully-blank rows removed.
    ///
    /// Bounds header search and row iteration to meaningful content; a grid
    /// with no contentful cell at all trims to empty.
    pub fn trimmed_rows(&self) -> &[Vec<CellValue>] {
        let last_contentful = self
            .rows
            .iter()
            .rposition(|row| row.iter().any(CellValue::is_contentful));
        match last_contentful {
            Some(index) => &self.rows[..=index],
            None => &[],
        }
    }
}

/// A named collection of sheets, as produced by a workbook reader.
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an empty sheet and return it for population.
    pub fn add_sheet(&mut self, name: impl Into<String>) -> &mut Sheet {
        self.sheets.push(Sheet::new(name));
        self.sheets.last_mut().expect("sheet was just pushed")
    }

    pub fn push_sheet(&mut self, sheet: Sheet) {
        self.sheets.push(sheet);
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }

    pub fn has_sheet(&self, name: &str) -> bool {
        self.sheet(name).is_some()
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|sheet| sheet.name.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_blank_rows_only() {
        let sheet = Sheet::from_rows(
            "Sheet",
            vec![
                vec!["ID".into(), "Name".into()],
                vec![CellValue::Empty, CellValue::Empty],
                vec![1.into(), "Ann".into()],
                vec![CellValue::Empty],
                vec![],
            ],
        );

        // interior blank row survives, trailing ones go
        assert_eq!(sheet.trimmed_rows().len(), 3);
    }

    #[test]
    fn all_blank_grid_trims_to_empty() {
        let sheet = Sheet::from_rows(
            "Sheet",
            vec![vec![CellValue::Empty, 0.into()], vec!["".into()]],
        );
        assert!(sheet.trimmed_rows().is_empty());
    }

    #[test]
    fn set_value_grows_grid() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_sheet("Data");
        sheet.set_value(2, 3, "x");

        let sheet = workbook.sheet("Data").expect("sheet exists");
        assert_eq!(sheet.rows().len(), 2);
        assert_eq!(sheet.rows()[1][2], CellValue::Text("x".into()));
        assert_eq!(sheet.rows()[1][0], CellValue::Empty);
    }
}

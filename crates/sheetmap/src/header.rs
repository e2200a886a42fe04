use crate::error::ExtractError;
use sheetmap_common::CellValue;
use sheetmap_spec::{FieldSpec, HeaderRowRange};

/// The located header row: its absolute index and stringified cells.
#[derive(Debug, Clone)]
pub(crate) struct HeaderRow {
    pub index: usize,
    pub cells: Vec<String>,
}

pub(crate) fn stringify_row(row: &[CellValue]) -> Vec<String> {
    row.iter().map(|cell| cell.to_string()).collect()
}

/// Search `range` for the earliest row satisfying every field matcher.
///
/// Each row is scored by how many distinct fields have at least one matching
/// cell (a field counts at most once per row, however many cells match). The
/// first row reaching full score wins and the search stops there. If no row
/// reaches full score, the error names exactly the field keys absent from the
/// best-scoring row encountered, so callers see which headers to fix rather
/// than a bare "not found".
pub(crate) fn locate_header_row(
    sheet_key: &str,
    rows: &[Vec<CellValue>],
    range: &HeaderRowRange,
    fields: &[FieldSpec],
) -> Result<HeaderRow, ExtractError> {
    let mut best_matched: Vec<usize> = Vec::new();

    let end = range.max_index.min(rows.len());
    for index in range.min_index..end {
        let cells = stringify_row(&rows[index]);

        let matched: Vec<usize> = fields
            .iter()
            .enumerate()
            .filter(|(_, field)| {
                cells
                    .iter()
                    .enumerate()
                    .any(|(col, text)| field.matcher.matches(text, col, &cells))
            })
            .map(|(field_index, _)| field_index)
            .collect();

        if matched.len() == fields.len() {
            return Ok(HeaderRow { index, cells });
        }

        if matched.len() > best_matched.len() {
            best_matched = matched;
        }
    }

    let missing = fields
        .iter()
        .enumerate()
        .filter(|(field_index, _)| !best_matched.contains(field_index))
        .map(|(_, field)| field.key.clone())
        .collect();

    Err(ExtractError::MissingHeaders {
        key: sheet_key.to_string(),
        missing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetmap_spec::{Convert, Matcher};

    fn fields(keys: &[&str]) -> Vec<FieldSpec> {
        keys.iter()
            .map(|key| FieldSpec::new(*key, Convert::Text))
            .collect()
    }

    fn grid(rows: &[&[&str]]) -> Vec<Vec<CellValue>> {
        rows.iter()
            .map(|row| row.iter().map(|cell| CellValue::from(*cell)).collect())
            .collect()
    }

    #[test]
    fn earliest_full_match_wins() {
        let rows = grid(&[
            &["Quarterly report", "", ""],
            &["ID", "Name", ""],
            &["ID", "Name", "extra"],
        ]);

        let header = locate_header_row(
            "main",
            &rows,
            &HeaderRowRange::default(),
            &fields(&["ID", "Name"]),
        )
        .expect("header located");
        assert_eq!(header.index, 1);
    }

    #[test]
    fn a_field_counts_once_per_row() {
        // two cells satisfy "ID" but "Name" is absent, so the score is 1 of 2
        let rows = grid(&[&["ID", "ID"]]);

        let err = locate_header_row(
            "main",
            &rows,
            &HeaderRowRange::default(),
            &fields(&["ID", "Name"]),
        )
        .expect_err("no full match");
        match err {
            ExtractError::MissingHeaders { missing, .. } => {
                assert_eq!(missing, vec!["Name".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn best_partial_match_names_missing_keys() {
        let rows = grid(&[
            &["Name", "", ""],
            &["ID", "Name", ""],
            &["garbage", "", ""],
        ]);

        let err = locate_header_row(
            "main",
            &rows,
            &HeaderRowRange::default(),
            &fields(&["ID", "Name", "Due"]),
        )
        .expect_err("no full match");
        match err {
            ExtractError::MissingHeaders { key, missing } => {
                assert_eq!(key, "main");
                // best row matched ID and Name
                assert_eq!(missing, vec!["Due".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn search_range_is_honoured() {
        let rows = grid(&[&["noise"], &["ID", "Name"]]);

        let err = locate_header_row(
            "main",
            &rows,
            &HeaderRowRange::new(0, 1),
            &fields(&["ID", "Name"]),
        )
        .expect_err("header outside range");
        assert!(matches!(err, ExtractError::MissingHeaders { .. }));

        let header = locate_header_row(
            "main",
            &rows,
            &HeaderRowRange::new(1, 2),
            &fields(&["ID", "Name"]),
        )
        .expect("header inside range");
        assert_eq!(header.index, 1);
    }

    #[test]
    fn predicate_matcher_sees_column_index() {
        let rows = grid(&[&["a", "b"]]);
        let spec = vec![
            FieldSpec::new("second", Convert::Text)
                .matching(Matcher::predicate(|_, index, _| index == 1)),
        ];

        let header =
            locate_header_row("main", &rows, &HeaderRowRange::default(), &spec).expect("match");
        assert_eq!(header.index, 0);
    }
}

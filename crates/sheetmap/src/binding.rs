use crate::error::ExtractError;
use crate::header::HeaderRow;
use sheetmap_spec::FieldSpec;

/// Column indices resolved for a sheet's fields, in field order.
#[derive(Debug, Clone)]
pub(crate) struct SheetBinding {
    pub header_index: usize,
    pub columns: Vec<usize>,
}

impl SheetBinding {
    /// Bind each field to the first header cell its matcher accepts.
    ///
    /// The header locator already guaranteed a satisfying cell for every
    /// field, so a miss here is an internal invariant violation and is
    /// reported as such rather than silently binding nothing.
    pub fn bind(
        sheet_key: &str,
        header: &HeaderRow,
        fields: &[FieldSpec],
    ) -> Result<Self, ExtractError> {
        let mut columns = Vec::with_capacity(fields.len());
        for field in fields {
            let column = header
                .cells
                .iter()
                .enumerate()
                .position(|(col, text)| field.matcher.matches(text, col, &header.cells))
                .ok_or_else(|| ExtractError::HeaderNotBound {
                    key: sheet_key.to_string(),
                    field: field.key.clone(),
                })?;
            columns.push(column);
        }
        Ok(Self {
            header_index: header.index,
            columns,
        })
    }
}

//! Declarative extraction schemas.
//!
//! A [`WorkbookSpec`] names the sheets to extract, how to find each sheet's
//! header row, which columns map to which record fields, and how raw cell
//! values become typed [`sheetmap_common::Value`]s. The runtime crate
//! (`sheetmap`) consumes a validated spec and drives it over workbook data.

mod convert;
mod matcher;
mod schema;
mod validation;

pub use convert::{Convert, ConvertFn};
pub use matcher::{Matcher, PredicateFn};
pub use schema::{
    BlankRowPolicy, CellErrorPolicy, FieldSpec, HeaderRowRange, MAX_HEADER_ROW_INDEX,
    MIN_HEADER_ROW_INDEX, Options, SheetSpec, WorkbookSpec,
};
pub use validation::{SpecIssue, ValidationError};

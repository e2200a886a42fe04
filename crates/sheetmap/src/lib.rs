//! Sheetmap extraction runtime.
//!
//! This crate drives a validated [`sheetmap_spec::WorkbookSpec`] over workbook
//! data: it trims trailing blank rows, locates each sheet's header row, binds
//! schema fields to columns, and converts data rows into typed records while
//! accumulating warnings with spreadsheet-style references. Workbook data
//! arrives either as an in-memory [`Workbook`] or, with the `calamine`
//! feature (default), straight from XLSX bytes or files.

mod binding;
mod error;
mod extract;
mod header;
mod workbook;

#[cfg(feature = "calamine")]
mod xlsx;

pub use error::ExtractError;
pub use extract::{Extraction, Extractor, Record, SheetResult, extract};
pub use workbook::{Sheet, Workbook};

#[cfg(feature = "calamine")]
pub use xlsx::{
    LoadStrategy, ReadOptions, extract_xlsx_bytes, extract_xlsx_bytes_with, extract_xlsx_path,
    read_xlsx_bytes, read_xlsx_path,
};

// Re-exported for convenience so callers need a single dependency.
pub use sheetmap_common::{
    CellValue, ConvertContext, ConvertError, Value, Warning, Warnings, codes,
};
pub use sheetmap_spec::{
    BlankRowPolicy, CellErrorPolicy, Convert, FieldSpec, HeaderRowRange, Matcher, Options,
    SheetSpec, WorkbookSpec,
};

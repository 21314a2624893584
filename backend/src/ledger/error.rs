use common::model::customer::{NaturalKey, ValidationError};
use std::path::PathBuf;
use thiserror::Error;

/// Why a ledger operation did not happen.
///
/// Store operations log the failure before returning it, so callers only decide
/// how to present it.
#[derive(Error, Debug)]
pub enum StoreFailure {
    #[error("Ledger file not found: {0}")]
    Missing(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Spreadsheet read error: {0}")]
    Read(#[from] calamine::XlsxError),

    #[error("Spreadsheet write error: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),

    #[error("Ledger workbook has no worksheet")]
    NoWorksheet,

    #[error("Header row not found in the first {0} rows")]
    HeaderNotFound(usize),

    #[error("Customer not found: {0}")]
    NotFound(NaturalKey),
}

/// Errors surfaced by the ledger facade.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreFailure),
}

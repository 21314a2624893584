//! The spreadsheet-backed customer store.
//!
//! `SpreadsheetStore` owns nothing but the ledger path: every operation reopens
//! and reparses the workbook, and every mutation rewrites it in full. Rows are
//! located by header discovery ([`HeaderLayout`]) and matched by natural key
//! ([`NaturalKey`]); there is no id column. If two rows share a key, update and
//! delete act on the first one from the top.
//!
//! Failures are logged here, at the store boundary, and returned as
//! [`StoreFailure`]. Callers only decide how to present them.

use crate::ledger::error::StoreFailure;
use crate::ledger::header::{HeaderLayout, Labels, MAX_HEADER_SCAN};
use crate::ledger::sheet::{Cell, Sheet, DEFAULT_SHEET_NAME};
use chrono::{DateTime, Local};
use common::model::customer::{normalize, Customer, NaturalKey};
use common::model::field::Field;
use common::model::statistics::Statistics;
use log::{debug, error, info, warn};
use md5::Context;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Result of a successful backup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackupReport {
    pub path: PathBuf,
    pub bytes: u64,
    pub md5: String,
}

#[derive(Debug, Clone)]
pub struct SpreadsheetStore {
    path: PathBuf,
    backup_dir: Option<PathBuf>,
}

impl SpreadsheetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SpreadsheetStore {
            path: path.into(),
            backup_dir: None,
        }
    }

    /// Directory for backups made without an explicit target. Defaults to the
    /// ledger's own directory.
    pub fn with_backup_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.backup_dir = Some(dir.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the ledger with just the header row when the file is missing.
    ///
    /// An existing file is only inspected: a first row that differs from the
    /// expected headers is logged and tolerated, since header discovery copes
    /// with offset or reordered headers. An unreadable file is reported and
    /// left as it is.
    pub fn ensure_initialized(&self) -> Result<(), StoreFailure> {
        if !self.path.exists() {
            let mut sheet = Sheet::new(DEFAULT_SHEET_NAME);
            for (col, field) in Field::ALL.into_iter().enumerate() {
                sheet.set(0, col, Some(Cell::Text(field.ledger_header().to_string())));
            }
            return self.logged("creating ledger", sheet.write(&self.path)).map(|_| {
                info!("Created new ledger file: {}", self.path.display());
            });
        }

        let sheet = self.logged("validating ledger", Sheet::read(&self.path))?;
        let expected: Vec<&str> = Field::ALL.iter().map(|f| f.ledger_header()).collect();
        let found: Vec<String> = sheet
            .rows
            .first()
            .map(|row| {
                row.iter()
                    .map(|cell| cell.as_ref().map(Cell::text).unwrap_or_default())
                    .collect()
            })
            .unwrap_or_default();
        if found != expected {
            warn!(
                "Ledger headers don't match the expected layout. Expected: {:?} Found: {:?}",
                expected, found
            );
        }
        Ok(())
    }

    /// Reports where the header row is and which fields it maps.
    pub fn inspect(&self) -> Result<HeaderLayout, StoreFailure> {
        self.logged(
            "inspecting ledger",
            self.read_with_layout().map(|(_, layout)| layout),
        )
    }

    /// All records whose phone, name and address are filled in.
    ///
    /// A ledger without a recognizable header row loads as empty.
    pub fn load(&self) -> Result<Vec<Customer>, StoreFailure> {
        let sheet = self.logged("loading customers", Sheet::read(&self.path))?;
        let Some(layout) = HeaderLayout::discover(&sheet, Labels::Ledger) else {
            warn!(
                "Could not find header row in {} (first {} rows scanned)",
                self.path.display(),
                MAX_HEADER_SCAN
            );
            return Ok(Vec::new());
        };
        debug!(
            "Header row found at index {} with {} mapped columns",
            layout.row,
            layout.columns.len()
        );

        let customers = parse_customers(&sheet, &layout);
        let data_rows = layout.data_rows(&sheet).len();
        info!(
            "Loaded {} customers from {} data rows ({} skipped)",
            customers.len(),
            data_rows,
            data_rows - customers.len()
        );
        Ok(customers)
    }

    /// Appends `customer` as a new row below the last row of the sheet.
    pub fn add(&self, customer: &Customer) -> Result<(), StoreFailure> {
        let result = self.read_with_layout().and_then(|(mut sheet, layout)| {
            let row = sheet.rows.len();
            write_mapped(&mut sheet, row, &layout, customer);
            sheet.write(&self.path)
        });
        self.logged("adding customer", result)?;

        if customer.phone.is_empty() {
            warn!(
                "Customer {} was saved without a phone number and will not be listed",
                customer.name
            );
        }
        info!("Added customer: {}", customer.name);
        Ok(())
    }

    /// Overwrites the mapped cells of the first row keyed like `old`.
    pub fn update(&self, old: &Customer, new: &Customer) -> Result<(), StoreFailure> {
        let key = old.key();
        let result = self.read_with_layout().and_then(|(mut sheet, layout)| {
            let row = find_row(&sheet, &layout, &key)
                .ok_or_else(|| StoreFailure::NotFound(key.clone()))?;
            write_mapped(&mut sheet, row, &layout, new);
            sheet.write(&self.path)
        });
        self.logged("updating customer", result)?;
        info!("Updated customer: {}", new.name);
        Ok(())
    }

    /// Removes the first row keyed like `customer`; later rows move up.
    pub fn delete(&self, customer: &Customer) -> Result<(), StoreFailure> {
        let key = customer.key();
        let result = self.read_with_layout().and_then(|(mut sheet, layout)| {
            let row = find_row(&sheet, &layout, &key)
                .ok_or_else(|| StoreFailure::NotFound(key.clone()))?;
            sheet.rows.remove(row);
            sheet.write(&self.path)
        });
        self.logged("deleting customer", result)?;
        info!("Deleted customer: {}", customer.name);
        Ok(())
    }

    /// Case-insensitive substring search over name, phone, suburb and postal code.
    pub fn search(&self, query: &str) -> Result<Vec<Customer>, StoreFailure> {
        let customers = self.load()?;
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Ok(customers);
        }
        Ok(customers
            .into_iter()
            .filter(|c| {
                [Field::Name, Field::Phone, Field::Suburb, Field::PostalCode]
                    .into_iter()
                    .any(|field| c.get(field).to_lowercase().contains(&query))
            })
            .collect())
    }

    pub fn find_by_phone(&self, phone: &str) -> Result<Option<Customer>, StoreFailure> {
        let phone = normalize(phone);
        Ok(self.load()?.into_iter().find(|c| c.phone == phone))
    }

    pub fn statistics(&self) -> Result<Statistics, StoreFailure> {
        Ok(Statistics::from_customers(&self.load()?))
    }

    /// Copies the ledger byte for byte.
    ///
    /// Without a `target` the copy is named `backup_<timestamp>_<ledger name>`
    /// and placed in the backup directory.
    pub fn backup(&self, target: Option<&Path>) -> Result<BackupReport, StoreFailure> {
        let target = target
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.default_backup_path(Local::now()));
        let report = self.logged("creating backup", self.copy_to(&target))?;
        info!("Backup created: {} ({} bytes)", report.path.display(), report.bytes);
        Ok(report)
    }

    /// Where backups go when no explicit target is given.
    pub fn backup_dir(&self) -> PathBuf {
        self.backup_dir
            .clone()
            .or_else(|| self.path.parent().map(Path::to_path_buf))
            .unwrap_or_default()
    }

    pub fn default_backup_path(&self, now: DateTime<Local>) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "ledger.xlsx".to_string());
        self.backup_dir().join(format!(
            "backup_{}_{}",
            now.format("%Y%m%d_%H%M%S"),
            file_name
        ))
    }

    fn copy_to(&self, target: &Path) -> Result<BackupReport, StoreFailure> {
        if !self.path.exists() {
            return Err(StoreFailure::Missing(self.path.clone()));
        }
        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let bytes = fs::copy(&self.path, target)?;

        let mut hasher = Context::new();
        hasher.consume(fs::read(target)?);
        Ok(BackupReport {
            path: target.to_path_buf(),
            bytes,
            md5: format!("{:x}", hasher.finalize()),
        })
    }

    fn read_with_layout(&self) -> Result<(Sheet, HeaderLayout), StoreFailure> {
        let sheet = Sheet::read(&self.path)?;
        let layout = HeaderLayout::discover(&sheet, Labels::Ledger)
            .ok_or(StoreFailure::HeaderNotFound(MAX_HEADER_SCAN))?;
        Ok((sheet, layout))
    }

    fn logged<T>(&self, action: &str, result: Result<T, StoreFailure>) -> Result<T, StoreFailure> {
        match &result {
            Err(e @ StoreFailure::NotFound(_)) => warn!("Error {}: {}", action, e),
            Err(e) => error!("Error {} ({}): {}", action, self.path.display(), e),
            Ok(_) => {}
        }
        result
    }
}

/// Records below the header whose phone, name and address are all present.
///
/// Rows missing any of the three are a data-quality issue, not an error, and
/// are skipped.
pub fn parse_customers(sheet: &Sheet, layout: &HeaderLayout) -> Vec<Customer> {
    let mut customers = Vec::new();
    for idx in layout.data_rows(sheet) {
        let values = layout.columns.values(&sheet.rows[idx]);
        let missing = Field::ALL
            .into_iter()
            .filter(|f| f.is_key())
            .find(|f| values.get(f).is_none_or(|v| v.is_empty()));
        if let Some(field) = missing {
            debug!("Skipping row {}: empty {:?}", idx, field);
            continue;
        }
        match Customer::from_row(&values) {
            Ok(customer) => customers.push(customer),
            Err(e) => debug!("Skipping row {}: {}", idx, e),
        }
    }
    customers
}

fn row_key(layout: &HeaderLayout, sheet: &Sheet, idx: usize) -> Option<NaturalKey> {
    let row = &sheet.rows[idx];
    Some(NaturalKey {
        phone: layout.columns.read(row, Field::Phone)?,
        name: layout.columns.read(row, Field::Name)?,
        address: layout.columns.read(row, Field::Address)?,
    })
}

fn find_row(sheet: &Sheet, layout: &HeaderLayout, key: &NaturalKey) -> Option<usize> {
    layout
        .data_rows(sheet)
        .find(|&idx| row_key(layout, sheet, idx).as_ref() == Some(key))
}

fn write_mapped(sheet: &mut Sheet, row: usize, layout: &HeaderLayout, customer: &Customer) {
    for (field, col) in layout.columns.iter() {
        let value = customer.get(field);
        let cell = (!value.is_empty()).then(|| Cell::Text(value.to_string()));
        sheet.set(row, col, cell);
    }
}

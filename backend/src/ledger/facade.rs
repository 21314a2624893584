//! The cached view the web handlers work against.
//!
//! `Ledger` keeps the last loaded records and the ranked subset for the current
//! query. Mutations go to the store first and are followed by a full reload, so
//! the cache always reflects what is in the file.

use crate::ledger::error::LedgerError;
use crate::ledger::header::HeaderLayout;
use crate::ledger::ranker::rank;
use crate::ledger::store::{BackupReport, SpreadsheetStore};
use common::model::customer::{Customer, CustomerForm};
use common::model::statistics::Statistics;
use log::{info, warn};
use std::path::Path;

pub struct Ledger {
    store: SpreadsheetStore,
    all_records: Vec<Customer>,
    filtered_records: Vec<Customer>,
    query: String,
}

impl Ledger {
    /// Wraps `store` and performs the initial load.
    ///
    /// A ledger that cannot be read yet starts empty; the failure has already
    /// been logged by the store.
    pub fn new(store: SpreadsheetStore) -> Self {
        let mut ledger = Ledger {
            store,
            all_records: Vec::new(),
            filtered_records: Vec::new(),
            query: String::new(),
        };
        if ledger.reload().is_err() {
            warn!("Starting with an empty customer list");
        }
        ledger
    }

    pub fn store(&self) -> &SpreadsheetStore {
        &self.store
    }

    pub fn all_records(&self) -> &[Customer] {
        &self.all_records
    }

    pub fn filtered_records(&self) -> &[Customer] {
        &self.filtered_records
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Replaces the cache with the file's current contents and re-ranks it.
    pub fn reload(&mut self) -> Result<&[Customer], LedgerError> {
        self.all_records = self.store.load()?;
        self.filtered_records = rank(&self.all_records, &self.query);
        Ok(&self.filtered_records)
    }

    /// Ranks the cached records against `query` and remembers the query.
    pub fn search(&mut self, query: &str) -> &[Customer] {
        self.query = query.trim().to_string();
        self.filtered_records = rank(&self.all_records, &self.query);
        &self.filtered_records
    }

    pub fn add(&mut self, form: CustomerForm) -> Result<Customer, LedgerError> {
        let customer = Customer::try_from(form)?;
        self.store.add(&customer)?;
        self.reload()?;
        Ok(customer)
    }

    /// Applies `changes` on top of `old` and writes the result over `old`'s row.
    pub fn update(&mut self, old: &Customer, changes: CustomerForm) -> Result<Customer, LedgerError> {
        let mut edited = old.clone();
        edited.update(changes)?;
        self.store.update(old, &edited)?;
        self.reload()?;
        Ok(edited)
    }

    pub fn delete(&mut self, customer: &Customer) -> Result<(), LedgerError> {
        self.store.delete(customer)?;
        self.reload()?;
        Ok(())
    }

    pub fn statistics(&self) -> Result<Statistics, LedgerError> {
        Ok(self.store.statistics()?)
    }

    pub fn backup(&self, target: Option<&Path>) -> Result<BackupReport, LedgerError> {
        Ok(self.store.backup(target)?)
    }

    pub fn find_by_phone(&self, phone: &str) -> Result<Option<Customer>, LedgerError> {
        Ok(self.store.find_by_phone(phone)?)
    }

    /// Whether the ledger parses and has a recognizable header row.
    pub fn validate_file(&self) -> Result<HeaderLayout, LedgerError> {
        let layout = self.store.inspect()?;
        info!(
            "Ledger {} is valid: header at row {}, {} columns mapped",
            self.store.path().display(),
            layout.row + 1,
            layout.columns.len()
        );
        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::error::StoreFailure;
    use common::model::customer::ValidationError;
    use tempfile::TempDir;

    fn form(phone: &str, name: &str, address: &str) -> CustomerForm {
        CustomerForm {
            phone: Some(phone.into()),
            name: Some(name.into()),
            address: Some(address.into()),
            ..Default::default()
        }
    }

    fn setup() -> (TempDir, Ledger) {
        let dir = TempDir::new().unwrap();
        let store = SpreadsheetStore::new(dir.path().join("ledger.xlsx"));
        store.ensure_initialized().unwrap();
        let mut ledger = Ledger::new(store);
        ledger.add(form("1", "Ann Smith", "1 High St")).unwrap();
        ledger.add(form("2", "Carla Ann", "2 High St")).unwrap();
        ledger.add(form("3", "Banning Lee", "3 High St")).unwrap();
        (dir, ledger)
    }

    fn names(customers: &[Customer]) -> Vec<&str> {
        customers.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn missing_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let ledger = Ledger::new(SpreadsheetStore::new(dir.path().join("nope.xlsx")));
        assert!(ledger.all_records().is_empty());
        assert!(ledger.validate_file().is_err());
    }

    #[test]
    fn search_ranks_cached_records() {
        let (_dir, mut ledger) = setup();
        assert_eq!(
            names(ledger.search(" ann ")),
            vec!["Ann Smith", "Carla Ann", "Banning Lee"]
        );
        assert_eq!(ledger.query(), "ann");
        assert_eq!(names(ledger.search("lee")), vec!["Banning Lee"]);
    }

    #[test]
    fn mutations_reload_and_keep_query() {
        let (_dir, mut ledger) = setup();
        ledger.search("high");
        assert!(ledger.filtered_records().is_empty());

        ledger.search("ann");
        ledger.add(form("4", "Annie Hall", "4 High St")).unwrap();
        assert_eq!(ledger.all_records().len(), 4);
        assert_eq!(
            names(ledger.filtered_records()),
            vec!["Ann Smith", "Annie Hall", "Carla Ann", "Banning Lee"]
        );

        let banning = ledger.find_by_phone("3").unwrap().unwrap();
        ledger.delete(&banning).unwrap();
        assert_eq!(ledger.all_records().len(), 3);
        assert!(!names(ledger.filtered_records()).contains(&"Banning Lee"));
    }

    #[test]
    fn update_applies_changes() {
        let (_dir, mut ledger) = setup();
        let old = ledger.find_by_phone("1").unwrap().unwrap();
        let edited = ledger
            .update(
                &old,
                CustomerForm {
                    suburb: Some("Fitzroy".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(edited.suburb, "Fitzroy");
        assert_eq!(edited.name, "Ann Smith");
        assert_eq!(ledger.find_by_phone("1").unwrap().unwrap(), edited);
    }

    #[test]
    fn invalid_edits_never_reach_the_file() {
        let (_dir, mut ledger) = setup();
        let before = std::fs::read(ledger.store().path()).unwrap();

        let err = ledger.add(form("9", "", "9 High St")).unwrap_err();
        assert!(matches!(err, LedgerError::Validation(ValidationError::MissingName)));

        let old = ledger.find_by_phone("1").unwrap().unwrap();
        let err = ledger
            .update(
                &old,
                CustomerForm {
                    address: Some(" ".into()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, LedgerError::Validation(ValidationError::MissingAddress)));

        assert_eq!(std::fs::read(ledger.store().path()).unwrap(), before);
    }

    #[test]
    fn deleting_twice_is_not_found() {
        let (_dir, mut ledger) = setup();
        let ann = ledger.find_by_phone("1").unwrap().unwrap();
        ledger.delete(&ann).unwrap();
        assert!(matches!(
            ledger.delete(&ann).unwrap_err(),
            LedgerError::Store(StoreFailure::NotFound(_))
        ));
    }

    #[test]
    fn statistics_and_validation() {
        let (_dir, ledger) = setup();
        assert_eq!(ledger.statistics().unwrap().total_customers, 3);
        let layout = ledger.validate_file().unwrap();
        assert_eq!(layout.row, 0);
        assert_eq!(layout.columns.len(), 7);
    }
}

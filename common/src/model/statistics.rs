use crate::model::customer::Customer;
use crate::model::field::Field;
use serde::{Deserialize, Serialize};

/// Field coverage counts over the loaded customers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_customers: usize,
    pub customers_with_phone: usize,
    pub customers_with_address: usize,
    pub customers_with_suburb: usize,
    pub customers_with_postal_code: usize,
}

impl Statistics {
    pub fn from_customers(customers: &[Customer]) -> Self {
        let count = |field: Field| {
            customers
                .iter()
                .filter(|c| !c.get(field).trim().is_empty())
                .count()
        };
        Statistics {
            total_customers: customers.len(),
            customers_with_phone: count(Field::Phone),
            customers_with_address: count(Field::Address),
            customers_with_suburb: count(Field::Suburb),
            customers_with_postal_code: count(Field::PostalCode),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_non_blank_fields() {
        let customers = vec![
            Customer::new("1", "Ann", "", "", "1 High St", "Fitzroy", "3065").unwrap(),
            Customer::new("", "Bob", "", "", "2 High St", "", "3065").unwrap(),
            Customer::new("3", "Cat", "", "", "3 High St", " ", "").unwrap(),
        ];
        let stats = Statistics::from_customers(&customers);
        assert_eq!(
            stats,
            Statistics {
                total_customers: 3,
                customers_with_phone: 2,
                customers_with_address: 3,
                customers_with_suburb: 1,
                customers_with_postal_code: 2,
            }
        );
    }

    #[test]
    fn empty_ledger_has_zero_counts() {
        assert_eq!(Statistics::from_customers(&[]), Statistics::default());
    }
}

//! Orders records for a search box.
//!
//! Matches are grouped by how well the name fits the query: name prefix first,
//! then a later word of the name starting with it, then any other substring hit
//! in name, phone, suburb or postal code. Each group is sorted by name.
//!
//! The word-prefix group is intentional: "ann" ranks "Zed Ann" above "Aann",
//! so a surname match sits next to the first-name matches.

use common::model::customer::Customer;
use common::model::field::Field;
use std::cmp::Ordering;

fn by_name(a: &Customer, b: &Customer) -> Ordering {
    a.name.to_lowercase().cmp(&b.name.to_lowercase())
}

fn word_prefix(name: &str, query: &str) -> bool {
    name.split_whitespace().skip(1).any(|word| word.starts_with(query))
}

fn contains(customer: &Customer, query: &str) -> bool {
    [Field::Name, Field::Phone, Field::Suburb, Field::PostalCode]
        .into_iter()
        .any(|field| customer.get(field).to_lowercase().contains(query))
}

/// Ranked copy of the records matching `query`.
///
/// A blank query keeps every record, sorted by name.
pub fn rank(customers: &[Customer], query: &str) -> Vec<Customer> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        let mut all = customers.to_vec();
        all.sort_by(by_name);
        return all;
    }

    let mut buckets: [Vec<Customer>; 3] = Default::default();
    for customer in customers {
        let name = customer.name.to_lowercase();
        let bucket = if name.starts_with(&query) {
            0
        } else if word_prefix(&name, &query) {
            1
        } else if contains(customer, &query) {
            2
        } else {
            continue;
        };
        buckets[bucket].push(customer.clone());
    }

    buckets
        .into_iter()
        .flat_map(|mut bucket| {
            bucket.sort_by(by_name);
            bucket
        })
        .collect()
}

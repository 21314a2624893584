pub mod customer;
pub mod export;
pub mod field;
pub mod statistics;

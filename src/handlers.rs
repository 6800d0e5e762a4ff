pub mod categories;
pub mod health;
pub mod reports;
pub mod sources;
pub mod transactions;
pub mod users;

//! This file serves as the root for all SeaORM entity modules.
//! We define the data models for the expense tracking application here:
//! users own categories, payment sources and transactions, and every
//! owned entity carries a soft-delete marker.

pub mod category;
pub mod source;
pub mod transaction;
pub mod user;

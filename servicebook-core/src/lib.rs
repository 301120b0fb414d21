//! Core library for servicebook.
//!
//! - record types: `service`, `appointment`, `member`, `responsibility`
//! - `recurrence`, `assignment` and `occurrence`: expanding recurring
//!   responsibilities into dated occurrences and resolving who covers each
//! - `store`: the persisted record store and PIN gate
//! - `config`: the user's configuration file

pub mod appointment;
pub mod assignment;
pub mod config;
pub mod constants;
pub mod date;
pub mod error;
pub mod member;
pub mod occurrence;
pub mod recurrence;
pub mod responsibility;
pub mod service;
pub mod store;

pub use error::{ServiceBookError, ServiceBookResult};

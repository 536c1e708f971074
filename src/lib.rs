//! Freshness tracking for a shared household food inventory.
//!
//! [`foods::expiry`] classifies a single expiry date against a reference
//! instant; [`foods::services`] summarizes, filters, sorts and pages whole
//! listings. [`app`] exposes both as a stateless JSON service.

pub mod app;
pub mod config;
pub mod error;
pub mod foods;
pub mod state;

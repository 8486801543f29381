//! invoice-dashboard: form-bound invoice write operations.
//!
//! Three HTTP handlers (create, update, delete) backed by single-statement
//! SQL against PostgreSQL. Successful writes invalidate the cached
//! `/dashboard/invoices` listing view; create and update then redirect the
//! client to it.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod observability;
pub mod services;
pub mod startup;

//! unicodefix: replace typographic Unicode with ASCII equivalents and strip
//! invisible characters, as a stdin filter, a batch file cleaner, or a small
//! web interface.

pub mod analytics;
pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod normalizer;
pub mod safety;
pub mod web;

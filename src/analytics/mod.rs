//! Structured JSONL log of clean operations.

pub mod logger;

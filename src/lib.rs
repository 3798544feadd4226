//! dcdump - Discord cache dump
//!
//! Locates the Chromium resource cache of every installed Discord build,
//! copies it into a timestamped directory and recovers the original payload
//! of each cache entry.

pub mod cli;
pub mod config;
pub mod dump;
pub mod error;
pub mod extract;
pub mod locate;
pub mod storage;
pub mod tagger;
pub mod ui;

pub use error::{DumpError, DumpResult};
pub use extract::{extract, extract_payload, Outcome};

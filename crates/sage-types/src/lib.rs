//! Shared domain types for the SAGE-ML analytics workspace.

pub mod config;
pub mod dataset;
pub mod raw;
pub mod records;
pub mod series;
pub mod summary;
pub mod time;

mod errors;

pub use errors::{Result, SageError};

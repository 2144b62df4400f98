//! Core record store for a flat-file account/student roster.
//!
//! Provides delimited-text record codecs, bounded in-memory tables,
//! referential linkage between accounts and students, and whole-file
//! persistence.

pub mod config;
pub mod error;
pub mod persistence;
pub mod record;
pub mod registry;
pub mod table;

pub use registry::Registry;

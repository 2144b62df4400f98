//! Generic bounded record table.

#[allow(clippy::module_inception)]
mod table;

pub use table::Table;

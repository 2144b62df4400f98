//! Record types, line codecs, and field validation.

mod account;
pub(crate) mod codec;
mod student;
pub(crate) mod validation;

pub use account::{Account, Role};
pub use student::Student;

use crate::error::StoreError;

/// A record kind storable in a [`Table`](crate::table::Table).
///
/// Implementors supply the table-kind name used for data file naming and
/// error reporting, access to the id field, and the delimited-line codec.
pub trait Record: Clone {
    /// Table-kind name; also the data file stem (e.g. "accounts")
    const KIND: &'static str;

    /// Record id.
    fn id(&self) -> u64;

    /// Overwrites the record id. Tables call this on insert and update;
    /// ids are otherwise immutable.
    fn set_id(&mut self, id: u64);

    /// Encodes the record as one delimited line, without the trailing
    /// newline. Never fails: field validation at write time guarantees no
    /// value contains the delimiter.
    fn encode(&self) -> String;

    /// Decodes one delimited line into a record.
    fn decode(line: &str) -> Result<Self, StoreError>;
}

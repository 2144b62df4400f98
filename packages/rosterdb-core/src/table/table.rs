//! Bounded in-memory table with id-based CRUD.
//!
//! Each table has:
//! - A growable record vector bounded by an explicit capacity
//! - A monotonic record id sequence generator
//! - Compacting deletes that keep records in a contiguous prefix

use std::collections::HashSet;

use crate::error::StoreError;
use crate::record::Record;

/// First id assigned by an empty table.
const FIRST_ID: u64 = 1;

/// Bounded in-memory table of records of one kind.
///
/// Records stay contiguous: a delete shifts every subsequent record one
/// slot earlier, so present records always occupy indices `0..count()`.
/// Ids come from a strictly increasing counter and are never recycled,
/// even when the highest-id record is deleted.
#[derive(Debug, Clone)]
pub struct Table<R: Record> {
    /// Maximum number of records
    capacity: usize,
    /// Next record id to assign
    next_id: u64,
    /// Present records in slot order
    records: Vec<R>,
}

impl<R: Record> Table<R> {
    /// Creates an empty table bounded by `capacity` records. Ids start at 1.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            next_id: FIRST_ID,
            records: Vec::new(),
        }
    }

    /// Rebuilds a table from records decoded off disk.
    ///
    /// Restores the id counter to one past the highest id present, so ids
    /// issued after a reload never collide with stored records. Fails with
    /// `DataCorruption` on duplicate ids and `CapacityExceeded` when the
    /// data outgrows the configured capacity.
    pub fn restore(records: Vec<R>, capacity: usize) -> Result<Self, StoreError> {
        if records.len() > capacity {
            return Err(StoreError::CapacityExceeded {
                table: R::KIND,
                capacity,
            });
        }

        let mut seen = HashSet::with_capacity(records.len());
        let mut max_id = 0;
        for record in &records {
            if !seen.insert(record.id()) {
                return Err(StoreError::DataCorruption(format!(
                    "duplicate id {} in table '{}'",
                    record.id(),
                    R::KIND
                )));
            }
            max_id = max_id.max(record.id());
        }

        Ok(Self {
            capacity,
            next_id: if records.is_empty() { FIRST_ID } else { max_id + 1 },
            records,
        })
    }

    /// Number of present records.
    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// True when the table holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True when no further insert can succeed.
    pub fn is_full(&self) -> bool {
        self.records.len() >= self.capacity
    }

    /// Configured record capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the id the next successful insert will assign.
    pub fn current_next_id(&self) -> u64 {
        self.next_id
    }

    /// Inserts a record, assigning it a fresh id, and returns the id.
    ///
    /// Fails with `CapacityExceeded` when the table is full; nothing is
    /// inserted in that case and the id counter does not advance.
    pub fn insert(&mut self, mut record: R) -> Result<u64, StoreError> {
        if self.is_full() {
            return Err(StoreError::CapacityExceeded {
                table: R::KIND,
                capacity: self.capacity,
            });
        }
        let id = self.next_id;
        self.next_id += 1;
        record.set_id(id);
        self.records.push(record);
        Ok(id)
    }

    /// Looks up a record by id. Linear scan, O(count).
    pub fn find(&self, id: u64) -> Option<&R> {
        self.records.iter().find(|r| r.id() == id)
    }

    /// Slot index of the record with the given id.
    pub fn position(&self, id: u64) -> Option<usize> {
        self.records.iter().position(|r| r.id() == id)
    }

    /// Overwrites all fields of the record with the given id except the id
    /// itself.
    pub fn update(&mut self, id: u64, mut record: R) -> Result<(), StoreError> {
        let pos = self.position(id).ok_or(StoreError::NotFound {
            table: R::KIND,
            id,
        })?;
        record.set_id(id);
        self.records[pos] = record;
        Ok(())
    }

    /// Deletes the record with the given id, shifting every subsequent
    /// record one slot earlier. Returns the removed record. O(count).
    pub fn delete(&mut self, id: u64) -> Result<R, StoreError> {
        let pos = self.position(id).ok_or(StoreError::NotFound {
            table: R::KIND,
            id,
        })?;
        Ok(self.records.remove(pos))
    }

    /// Reinserts a just-removed record at its previous slot.
    ///
    /// Undo hook for multi-table operations that must leave no partial
    /// state. The record keeps the id it already carries.
    pub(crate) fn restore_at(&mut self, index: usize, record: R) {
        let index = index.min(self.records.len());
        self.records.insert(index, record);
    }

    /// Iterates over present records in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.records.iter()
    }

    /// Present records as a dense slice.
    pub fn records(&self) -> &[R] {
        self.records.as_slice()
    }
}

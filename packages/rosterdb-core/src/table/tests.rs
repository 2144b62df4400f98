use std::collections::HashSet;

use super::*;
use crate::error::StoreError;
use crate::record::Record;
use ntest::timeout;
use rand::Rng;

/// Minimal record kind for exercising the table in isolation.
#[derive(Debug, Clone, PartialEq)]
struct Widget {
    id: u64,
    label: String,
}

impl Widget {
    fn new(label: &str) -> Self {
        Self {
            id: 0,
            label: label.to_string(),
        }
    }
}

impl Record for Widget {
    const KIND: &'static str = "widgets";

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    fn encode(&self) -> String {
        format!("{},{}", self.id, self.label)
    }

    fn decode(line: &str) -> Result<Self, StoreError> {
        let (id, label) = line.split_once(',').ok_or(StoreError::MalformedRecord {
            kind: Self::KIND,
            reason: "expected 2 fields".to_string(),
        })?;
        Ok(Self {
            id: id.parse().map_err(|_| StoreError::MalformedRecord {
                kind: Self::KIND,
                reason: "bad id".to_string(),
            })?,
            label: label.to_string(),
        })
    }
}

#[timeout(1000)]
#[test]
fn test_insert_assigns_increasing_ids_from_one() {
    let mut table: Table<Widget> = Table::with_capacity(16);
    assert_eq!(table.current_next_id(), 1);

    let a = table.insert(Widget::new("a")).unwrap();
    let b = table.insert(Widget::new("b")).unwrap();
    let c = table.insert(Widget::new("c")).unwrap();

    assert_eq!((a, b, c), (1, 2, 3));
    assert_eq!(table.current_next_id(), 4);
}

#[timeout(1000)]
#[test]
fn test_count_tracks_inserts_and_deletes() {
    let mut table: Table<Widget> = Table::with_capacity(16);
    assert_eq!(table.count(), 0);
    assert!(table.is_empty());

    let a = table.insert(Widget::new("a")).unwrap();
    table.insert(Widget::new("b")).unwrap();
    assert_eq!(table.count(), 2);

    table.delete(a).unwrap();
    assert_eq!(table.count(), 1);
}

#[timeout(1000)]
#[test]
fn test_insert_into_full_table_fails() {
    let mut table: Table<Widget> = Table::with_capacity(2);
    table.insert(Widget::new("a")).unwrap();
    table.insert(Widget::new("b")).unwrap();
    assert!(table.is_full());

    let err = table.insert(Widget::new("c")).unwrap_err();
    assert!(matches!(
        err,
        StoreError::CapacityExceeded { table: "widgets", capacity: 2 }
    ));
    // Nothing inserted, id counter did not advance
    assert_eq!(table.count(), 2);
    assert_eq!(table.current_next_id(), 3);

    // A delete frees the slot again
    table.delete(1).unwrap();
    assert_eq!(table.insert(Widget::new("c")).unwrap(), 3);
}

#[timeout(1000)]
#[test]
fn test_find_by_id() {
    let mut table: Table<Widget> = Table::with_capacity(16);
    let a = table.insert(Widget::new("a")).unwrap();
    let b = table.insert(Widget::new("b")).unwrap();

    assert_eq!(table.find(a).unwrap().label, "a");
    assert_eq!(table.find(b).unwrap().label, "b");
    assert!(table.find(99).is_none());
    assert_eq!(table.position(b), Some(1));
}

#[timeout(1000)]
#[test]
fn test_update_overwrites_all_fields_except_id() {
    let mut table: Table<Widget> = Table::with_capacity(16);
    let a = table.insert(Widget::new("a")).unwrap();
    table.insert(Widget::new("b")).unwrap();

    // The replacement record's own id is ignored
    let mut replacement = Widget::new("a2");
    replacement.id = 999;
    table.update(a, replacement).unwrap();

    let updated = table.find(a).unwrap();
    assert_eq!(updated.id, a);
    assert_eq!(updated.label, "a2");
    assert_eq!(table.position(a), Some(0));
}

#[timeout(1000)]
#[test]
fn test_update_missing_id_fails() {
    let mut table: Table<Widget> = Table::with_capacity(16);
    let err = table.update(42, Widget::new("x")).unwrap_err();
    assert!(matches!(err, StoreError::NotFound { table: "widgets", id: 42 }));
}

#[timeout(1000)]
#[test]
fn test_delete_compacts_the_prefix() {
    let mut table: Table<Widget> = Table::with_capacity(16);
    let ids: Vec<u64> = (0..4)
        .map(|i| table.insert(Widget::new(&format!("w{}", i))).unwrap())
        .collect();

    let removed = table.delete(ids[1]).unwrap();
    assert_eq!(removed.label, "w1");
    assert_eq!(table.count(), 3);

    // Remaining records keep their order and their ids
    let remaining: Vec<u64> = table.iter().map(|w| w.id()).collect();
    assert_eq!(remaining, vec![ids[0], ids[2], ids[3]]);
    for &id in &[ids[0], ids[2], ids[3]] {
        assert!(table.find(id).is_some());
    }
}

#[timeout(1000)]
#[test]
fn test_delete_missing_id_fails() {
    let mut table: Table<Widget> = Table::with_capacity(16);
    table.insert(Widget::new("a")).unwrap();
    let err = table.delete(42).unwrap_err();
    assert!(matches!(err, StoreError::NotFound { table: "widgets", id: 42 }));
    assert_eq!(table.count(), 1);
}

#[timeout(1000)]
#[test]
fn test_ids_are_never_recycled() {
    let mut table: Table<Widget> = Table::with_capacity(16);
    table.insert(Widget::new("a")).unwrap();
    let b = table.insert(Widget::new("b")).unwrap();

    // Deleting the highest id must not make it reassignable
    table.delete(b).unwrap();
    let c = table.insert(Widget::new("c")).unwrap();
    assert!(c > b);
}

#[timeout(1000)]
#[test]
fn test_restore_resumes_id_sequence() {
    let records = vec![
        Widget::decode("3,a").unwrap(),
        Widget::decode("7,b").unwrap(),
    ];
    let mut table = Table::restore(records, 16).unwrap();

    assert_eq!(table.count(), 2);
    assert_eq!(table.current_next_id(), 8);
    assert_eq!(table.insert(Widget::new("c")).unwrap(), 8);
}

#[timeout(1000)]
#[test]
fn test_restore_of_empty_table_starts_at_one() {
    let table: Table<Widget> = Table::restore(Vec::new(), 16).unwrap();
    assert_eq!(table.current_next_id(), 1);
}

#[timeout(1000)]
#[test]
fn test_restore_rejects_duplicate_ids() {
    let records = vec![
        Widget::decode("3,a").unwrap(),
        Widget::decode("3,b").unwrap(),
    ];
    let err = Table::restore(records, 16).unwrap_err();
    assert!(matches!(err, StoreError::DataCorruption(_)));
}

#[timeout(1000)]
#[test]
fn test_restore_rejects_records_beyond_capacity() {
    let records = vec![
        Widget::decode("1,a").unwrap(),
        Widget::decode("2,b").unwrap(),
        Widget::decode("3,c").unwrap(),
    ];
    let err = Table::restore(records, 2).unwrap_err();
    assert!(matches!(err, StoreError::CapacityExceeded { .. }));
}

#[timeout(5000)]
#[test]
fn test_randomized_workload_keeps_ids_unique_and_dense() {
    let mut rng = rand::thread_rng();
    let mut table: Table<Widget> = Table::with_capacity(64);
    let mut live: Vec<u64> = Vec::new();

    for i in 0..500 {
        if live.is_empty() || (rng.gen_bool(0.6) && !table.is_full()) {
            let id = table.insert(Widget::new(&format!("w{}", i))).unwrap();
            live.push(id);
        } else {
            let victim = live.swap_remove(rng.gen_range(0..live.len()));
            table.delete(victim).unwrap();
        }

        // Ids stay unique and every live record stays reachable
        let ids: HashSet<u64> = table.iter().map(|w| w.id()).collect();
        assert_eq!(ids.len(), table.count());
        assert_eq!(table.count(), live.len());
        for &id in &live {
            assert!(table.find(id).is_some());
        }
    }
}

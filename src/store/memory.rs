//! In-memory record store.

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use super::{BatchOp, Collection, Document, Order, RecordStore, StoredRecord};
use crate::error::{EngineError, EngineResult};

#[derive(Debug, Clone)]
struct Entry {
    record: StoredRecord,
    // Write sequence, breaks createdAt ties.
    seq: u64,
}

type Table = HashMap<String, Entry>;

#[derive(Debug, Default)]
struct Inner {
    tables: HashMap<Collection, Table>,
    next_seq: u64,
}

impl Inner {
    fn stamp(&mut self, id: String, data: Document) -> Entry {
        self.next_seq += 1;
        Entry {
            record: StoredRecord {
                id,
                created_at: Utc::now(),
                data,
            },
            seq: self.next_seq,
        }
    }
}

/// A [`RecordStore`] held entirely in memory.
///
/// Suitable for tests and single-process deployments. [`MemoryStore::set_offline`]
/// makes every call fail with `StoreUnavailable`, the way a dropped
/// connection to a hosted store would.
///
/// # Example
///
/// ```
/// use tuition_engine::store::{Collection, MemoryStore, RecordStore};
///
/// let store = MemoryStore::new();
/// let mut doc = serde_json::Map::new();
/// doc.insert("name".to_string(), "Unit Test 1".into());
/// let id = store.insert(Collection::Exams, doc).unwrap();
/// assert!(store.get_by_id(Collection::Exams, &id).unwrap().is_some());
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
    offline: AtomicBool,
}

impl MemoryStore {
    /// Creates an empty, online store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Switches simulated connectivity on or off.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of records in a collection.
    pub fn count(&self, collection: Collection) -> EngineResult<usize> {
        let inner = self.read()?;
        Ok(inner.tables.get(&collection).map_or(0, |t| t.len()))
    }

    fn check_online(&self) -> EngineResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(EngineError::StoreUnavailable {
                message: "store is offline".to_string(),
            });
        }
        Ok(())
    }

    fn read(&self) -> EngineResult<RwLockReadGuard<'_, Inner>> {
        self.check_online()?;
        self.inner.read().map_err(|_| EngineError::StoreUnavailable {
            message: "store lock poisoned".to_string(),
        })
    }

    fn write(&self) -> EngineResult<RwLockWriteGuard<'_, Inner>> {
        self.check_online()?;
        self.inner.write().map_err(|_| EngineError::StoreUnavailable {
            message: "store lock poisoned".to_string(),
        })
    }

    fn select<F>(
        &self,
        collection: Collection,
        order: Option<Order>,
        mut keep: F,
    ) -> EngineResult<Vec<StoredRecord>>
    where
        F: FnMut(&StoredRecord) -> bool,
    {
        let inner = self.read()?;
        let mut hits: Vec<&Entry> = inner
            .tables
            .get(&collection)
            .map(|t| t.values().filter(|e| keep(&e.record)).collect())
            .unwrap_or_default();

        match order {
            Some(Order::CreatedAtAsc) => {
                hits.sort_by(|a, b| (a.record.created_at, a.seq).cmp(&(b.record.created_at, b.seq)))
            }
            Some(Order::CreatedAtDesc) => {
                hits.sort_by(|a, b| (b.record.created_at, b.seq).cmp(&(a.record.created_at, a.seq)))
            }
            None => {}
        }

        Ok(hits.into_iter().map(|e| e.record.clone()).collect())
    }
}

fn apply_update(table: &mut Table, collection: Collection, id: &str, patch: Document) -> EngineResult<()> {
    let entry = table.get_mut(id).ok_or_else(|| EngineError::RecordNotFound {
        collection: collection.to_string(),
        id: id.to_string(),
    })?;
    for (field, value) in patch {
        entry.record.data.insert(field, value);
    }
    Ok(())
}

impl RecordStore for MemoryStore {
    fn insert(&self, collection: Collection, record: Document) -> EngineResult<String> {
        let mut inner = self.write()?;
        let id = Uuid::new_v4().to_string();
        let entry = inner.stamp(id.clone(), record);
        inner.tables.entry(collection).or_default().insert(id.clone(), entry);
        Ok(id)
    }

    fn insert_idempotent(
        &self,
        collection: Collection,
        key: &str,
        record: Document,
    ) -> EngineResult<()> {
        let mut inner = self.write()?;
        let entry = inner.stamp(key.to_string(), record);
        inner
            .tables
            .entry(collection)
            .or_default()
            .insert(key.to_string(), entry);
        Ok(())
    }

    fn upsert_unless(
        &self,
        collection: Collection,
        key: &str,
        field: &str,
        value: &Value,
        record: Document,
    ) -> EngineResult<bool> {
        let mut inner = self.write()?;
        let blocked = inner
            .tables
            .get(&collection)
            .and_then(|t| t.get(key))
            .is_some_and(|e| e.record.data.get(field) == Some(value));
        if blocked {
            return Ok(false);
        }
        let entry = inner.stamp(key.to_string(), record);
        inner
            .tables
            .entry(collection)
            .or_default()
            .insert(key.to_string(), entry);
        Ok(true)
    }

    fn get_by_id(&self, collection: Collection, id: &str) -> EngineResult<Option<StoredRecord>> {
        let inner = self.read()?;
        Ok(inner
            .tables
            .get(&collection)
            .and_then(|t| t.get(id))
            .map(|e| e.record.clone()))
    }

    fn list(&self, collection: Collection, order: Option<Order>) -> EngineResult<Vec<StoredRecord>> {
        self.select(collection, order, |_| true)
    }

    fn query_equal(
        &self,
        collection: Collection,
        field: &str,
        value: &Value,
        order: Option<Order>,
    ) -> EngineResult<Vec<StoredRecord>> {
        self.select(collection, order, |r| r.data.get(field) == Some(value))
    }

    fn query_range(
        &self,
        collection: Collection,
        field: &str,
        lo: &str,
        hi: &str,
        order: Option<Order>,
    ) -> EngineResult<Vec<StoredRecord>> {
        self.select(collection, order, |r| {
            r.data
                .get(field)
                .and_then(Value::as_str)
                .is_some_and(|v| v >= lo && v <= hi)
        })
    }

    fn update(&self, collection: Collection, id: &str, patch: Document) -> EngineResult<()> {
        let mut inner = self.write()?;
        let table = inner.tables.entry(collection).or_default();
        apply_update(table, collection, id, patch)
    }

    fn delete(&self, collection: Collection, id: &str) -> EngineResult<()> {
        let mut inner = self.write()?;
        if let Some(table) = inner.tables.get_mut(&collection) {
            table.remove(id);
        }
        Ok(())
    }

    fn batch_write(&self, ops: Vec<BatchOp>) -> EngineResult<()> {
        let mut inner = self.write()?;

        // Stage copies of the touched tables and commit only if every op applies.
        let touched: BTreeSet<Collection> = ops
            .iter()
            .map(|op| match op {
                BatchOp::Upsert { collection, .. }
                | BatchOp::Update { collection, .. }
                | BatchOp::Delete { collection, .. } => *collection,
            })
            .collect();
        let mut staged: HashMap<Collection, Table> = touched
            .into_iter()
            .map(|c| (c, inner.tables.get(&c).cloned().unwrap_or_default()))
            .collect();

        for op in ops {
            match op {
                BatchOp::Upsert {
                    collection,
                    key,
                    record,
                } => {
                    let entry = inner.stamp(key.clone(), record);
                    staged.entry(collection).or_default().insert(key, entry);
                }
                BatchOp::Update {
                    collection,
                    id,
                    patch,
                } => {
                    apply_update(staged.entry(collection).or_default(), collection, &id, patch)?;
                }
                BatchOp::Delete { collection, id } => {
                    staged.entry(collection).or_default().remove(&id);
                }
            }
        }

        inner.tables.extend(staged);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_insert_assigns_id_and_timestamp() {
        let store = MemoryStore::new();
        let id = store
            .insert(Collection::Students, doc(json!({"fullName": "Priya"})))
            .unwrap();
        let record = store.get_by_id(Collection::Students, &id).unwrap().unwrap();
        assert_eq!(record.id, id);
        assert_eq!(record.data["fullName"], "Priya");
        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn test_get_missing_is_none() {
        let store = MemoryStore::new();
        assert!(store.get_by_id(Collection::Exams, "nope").unwrap().is_none());
    }

    #[test]
    fn test_insert_idempotent_overwrites() {
        let store = MemoryStore::new();
        store
            .insert_idempotent(Collection::Marks, "e_s_Math", doc(json!({"marksObtained": "40"})))
            .unwrap();
        store
            .insert_idempotent(Collection::Marks, "e_s_Math", doc(json!({"marksObtained": "45"})))
            .unwrap();

        assert_eq!(store.count(Collection::Marks).unwrap(), 1);
        let record = store.get_by_id(Collection::Marks, "e_s_Math").unwrap().unwrap();
        assert_eq!(record.data["marksObtained"], "45");
    }

    #[test]
    fn test_upsert_unless_respects_guard() {
        let store = MemoryStore::new();
        let paid = json!("Paid");
        let write = |status: &str, net: &str| {
            store
                .upsert_unless(
                    Collection::StaffSalary,
                    "s_March_2026",
                    "paymentStatus",
                    &paid,
                    doc(json!({"paymentStatus": status, "netSalary": net})),
                )
                .unwrap()
        };

        assert!(write("Unpaid", "100"));
        assert!(write("Paid", "120"));
        assert!(!write("Unpaid", "90"));

        let stored = store
            .get_by_id(Collection::StaffSalary, "s_March_2026")
            .unwrap()
            .unwrap();
        assert_eq!(stored.data["paymentStatus"], json!("Paid"));
        assert_eq!(stored.data["netSalary"], json!("120"));
    }

    #[test]
    fn test_query_equal_and_order() {
        let store = MemoryStore::new();
        for (name, grade) in [("a", "10"), ("b", "9"), ("c", "10")] {
            store
                .insert(Collection::Students, doc(json!({"fullName": name, "grade": grade})))
                .unwrap();
        }

        let tens = store
            .query_equal(Collection::Students, "grade", &json!("10"), Some(Order::CreatedAtDesc))
            .unwrap();
        let names: Vec<&str> = tens.iter().map(|r| r.data["fullName"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["c", "a"]);
    }

    #[test]
    fn test_query_equal_numbers() {
        let store = MemoryStore::new();
        store
            .insert(Collection::Payments, doc(json!({"feeYear": 2026})))
            .unwrap();
        let hits = store
            .query_equal(Collection::Payments, "feeYear", &json!(2026i32), None)
            .unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_query_range_is_inclusive() {
        let store = MemoryStore::new();
        for date in ["2026-02-28", "2026-03-01", "2026-03-31", "2026-04-01"] {
            store
                .insert(Collection::StaffAttendance, doc(json!({"date": date})))
                .unwrap();
        }
        let march = store
            .query_range(Collection::StaffAttendance, "date", "2026-03-01", "2026-03-31", None)
            .unwrap();
        assert_eq!(march.len(), 2);
    }

    #[test]
    fn test_update_merges_fields() {
        let store = MemoryStore::new();
        let id = store
            .insert(Collection::Students, doc(json!({"fullName": "Priya", "status": "Active"})))
            .unwrap();
        store
            .update(Collection::Students, &id, doc(json!({"status": "Inactive"})))
            .unwrap();
        let record = store.get_by_id(Collection::Students, &id).unwrap().unwrap();
        assert_eq!(record.data["status"], "Inactive");
        assert_eq!(record.data["fullName"], "Priya");
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let store = MemoryStore::new();
        let err = store
            .update(Collection::Students, "missing", Document::new())
            .unwrap_err();
        assert!(matches!(err, EngineError::RecordNotFound { .. }));
    }

    #[test]
    fn test_delete_is_quiet_for_missing() {
        let store = MemoryStore::new();
        let id = store.insert(Collection::Staff, Document::new()).unwrap();
        store.delete(Collection::Staff, &id).unwrap();
        store.delete(Collection::Staff, &id).unwrap();
        assert!(store.get_by_id(Collection::Staff, &id).unwrap().is_none());
    }

    #[test]
    fn test_batch_is_all_or_nothing() {
        let store = MemoryStore::new();
        let ops = vec![
            BatchOp::Upsert {
                collection: Collection::Marks,
                key: "k1".to_string(),
                record: doc(json!({"marksObtained": "10"})),
            },
            BatchOp::Update {
                collection: Collection::Marks,
                id: "missing".to_string(),
                patch: Document::new(),
            },
        ];
        assert!(store.batch_write(ops).is_err());
        assert_eq!(store.count(Collection::Marks).unwrap(), 0);

        let ops = vec![
            BatchOp::Upsert {
                collection: Collection::Marks,
                key: "k1".to_string(),
                record: doc(json!({"marksObtained": "10"})),
            },
            BatchOp::Update {
                collection: Collection::Marks,
                id: "k1".to_string(),
                patch: doc(json!({"marksObtained": "12"})),
            },
        ];
        store.batch_write(ops).unwrap();
        let record = store.get_by_id(Collection::Marks, "k1").unwrap().unwrap();
        assert_eq!(record.data["marksObtained"], "12");
    }

    #[test]
    fn test_offline_store_is_unavailable() {
        let store = MemoryStore::new();
        store.set_offline(true);
        let err = store.list(Collection::Students, None).unwrap_err();
        assert!(err.is_transient());

        store.set_offline(false);
        assert!(store.list(Collection::Students, None).unwrap().is_empty());
    }
}

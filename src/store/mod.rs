//! The record store abstraction.
//!
//! Services depend on [`RecordStore`], never on a concrete backend. Records
//! are schemaless JSON documents grouped into named collections; every
//! record carries a store-assigned `id` and `createdAt` outside its document.

mod memory;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::EngineResult;

pub use memory::MemoryStore;

/// A record body: the fields of a JSON object.
pub type Document = Map<String, Value>;

/// The collections the office keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Students,
    Staff,
    Payments,
    Exams,
    Marks,
    StaffAttendance,
    StaffSalary,
}

impl Collection {
    /// Every collection, in a fixed order.
    pub const ALL: [Collection; 7] = [
        Collection::Students,
        Collection::Staff,
        Collection::Payments,
        Collection::Exams,
        Collection::Marks,
        Collection::StaffAttendance,
        Collection::StaffSalary,
    ];

    /// The collection's wire name, e.g. `staff_attendance`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Students => "students",
            Collection::Staff => "staff",
            Collection::Payments => "payments",
            Collection::Exams => "exams",
            Collection::Marks => "marks",
            Collection::StaffAttendance => "staff_attendance",
            Collection::StaffSalary => "staff_salary",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record as held by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    /// Store-assigned or caller-keyed identifier.
    pub id: String,
    /// When the record was last written whole.
    pub created_at: DateTime<Utc>,
    /// The record body.
    pub data: Document,
}

/// Result ordering by `createdAt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    /// Oldest first.
    CreatedAtAsc,
    /// Newest first.
    CreatedAtDesc,
}

/// One write inside a [`RecordStore::batch_write`].
#[derive(Debug, Clone, PartialEq)]
pub enum BatchOp {
    /// Insert or overwrite the record stored under `key`.
    Upsert {
        collection: Collection,
        key: String,
        record: Document,
    },
    /// Shallow-merge `patch` into an existing record.
    Update {
        collection: Collection,
        id: String,
        patch: Document,
    },
    /// Remove a record if present.
    Delete { collection: Collection, id: String },
}

/// Abstraction over a record store backend.
///
/// Any call may fail with [`EngineError::StoreUnavailable`](crate::error::EngineError::StoreUnavailable);
/// callers surface it and never retry. Query results are unordered unless an
/// [`Order`] is requested.
pub trait RecordStore: Send + Sync {
    /// Stores a new record under a generated id and stamps `createdAt`.
    fn insert(&self, collection: Collection, record: Document) -> EngineResult<String>;

    /// Stores `record` under `key`, overwriting any record already there.
    /// An overwrite re-stamps `createdAt`.
    fn insert_idempotent(
        &self,
        collection: Collection,
        key: &str,
        record: Document,
    ) -> EngineResult<()>;

    /// Like [`insert_idempotent`](RecordStore::insert_idempotent), but leaves
    /// the stored record alone when its `field` already equals `value`. The
    /// check and the write happen as one step. Returns `false` when the
    /// existing record blocked the write.
    fn upsert_unless(
        &self,
        collection: Collection,
        key: &str,
        field: &str,
        value: &Value,
        record: Document,
    ) -> EngineResult<bool>;

    /// Fetches one record. A missing record is `Ok(None)`.
    fn get_by_id(&self, collection: Collection, id: &str) -> EngineResult<Option<StoredRecord>>;

    /// Every record in a collection.
    fn list(&self, collection: Collection, order: Option<Order>) -> EngineResult<Vec<StoredRecord>>;

    /// Records whose `field` equals `value`.
    fn query_equal(
        &self,
        collection: Collection,
        field: &str,
        value: &Value,
        order: Option<Order>,
    ) -> EngineResult<Vec<StoredRecord>>;

    /// Records whose string `field` lies in `lo..=hi`.
    fn query_range(
        &self,
        collection: Collection,
        field: &str,
        lo: &str,
        hi: &str,
        order: Option<Order>,
    ) -> EngineResult<Vec<StoredRecord>>;

    /// Shallow-merges `patch` into the record. Fails with `RecordNotFound`
    /// when there is no such record.
    fn update(&self, collection: Collection, id: &str, patch: Document) -> EngineResult<()>;

    /// Removes a record. Deleting a missing record is not an error.
    fn delete(&self, collection: Collection, id: &str) -> EngineResult<()>;

    /// Applies every op or none of them.
    fn batch_write(&self, ops: Vec<BatchOp>) -> EngineResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_wire_names() {
        let names: Vec<&str> = Collection::ALL.iter().map(|c| c.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "students",
                "staff",
                "payments",
                "exams",
                "marks",
                "staff_attendance",
                "staff_salary"
            ]
        );
        assert_eq!(
            serde_json::to_string(&Collection::StaffSalary).unwrap(),
            "\"staff_salary\""
        );
    }
}

//! Typed record services, one per collection.
//!
//! Services are the only code that writes to the store. Each validates its
//! input, computes idempotency keys where a record has a natural key, and
//! converts between typed models and stored documents. They borrow the store
//! and configuration for the duration of a call.

mod attendance;
mod dashboard;
mod fees;
mod marks;
mod salary;
mod staff;
mod students;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::store::{Collection, Document, RecordStore, StoredRecord};

pub use attendance::{AttendanceMark, AttendanceService};
pub use dashboard::DashboardService;
pub use fees::FeeService;
pub use marks::{MarksService, NewMark, StudentProgression};
pub use salary::{GeneratedSalary, SalaryService};
pub use staff::StaffService;
pub use students::StudentService;

/// Converts a model into a stored document, dropping the fields the store
/// owns (`id` and `createdAt`).
pub(crate) fn to_document<T: Serialize>(value: &T) -> EngineResult<Document> {
    match serde_json::to_value(value)? {
        Value::Object(mut map) => {
            map.remove("id");
            map.remove("createdAt");
            Ok(map)
        }
        other => Err(EngineError::Serialization {
            message: format!("expected an object, got {}", other),
        }),
    }
}

/// Reads a stored record back into a model, restoring `id` and `createdAt`.
pub(crate) fn from_record<T: DeserializeOwned>(record: StoredRecord) -> EngineResult<T> {
    let StoredRecord {
        id,
        created_at,
        mut data,
    } = record;
    data.insert("id".to_string(), Value::String(id));
    data.insert("createdAt".to_string(), serde_json::to_value(created_at)?);
    Ok(serde_json::from_value(Value::Object(data))?)
}

pub(crate) fn from_records<T: DeserializeOwned>(records: Vec<StoredRecord>) -> EngineResult<Vec<T>> {
    records.into_iter().map(from_record).collect()
}

/// Loads a record that must exist.
pub(crate) fn require<T: DeserializeOwned>(
    store: &dyn RecordStore,
    collection: Collection,
    id: &str,
) -> EngineResult<T> {
    match store.get_by_id(collection, id)? {
        Some(record) => from_record(record),
        None => Err(EngineError::RecordNotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        }),
    }
}

/// A random number in `low..low * 10`, drawn from a fresh v4 UUID.
pub(crate) fn random_digits(low: u128) -> u128 {
    Uuid::new_v4().as_u128() % (low * 9) + low
}

/// Issues `prefix` plus four random digits, retrying while `field` already
/// holds the candidate in `collection`.
pub(crate) fn issue_code(
    store: &dyn RecordStore,
    collection: Collection,
    field: &str,
    prefix: &str,
    attempts: u32,
) -> EngineResult<String> {
    let mut last = String::new();
    for _ in 0..attempts.max(1) {
        let candidate = format!("{}{}", prefix, random_digits(1000));
        let taken = store.query_equal(collection, field, &Value::String(candidate.clone()), None)?;
        if taken.is_empty() {
            return Ok(candidate);
        }
        tracing::debug!(collection = %collection, code = %candidate, "Code collision, retrying");
        last = candidate;
    }
    Err(EngineError::DuplicateKey {
        collection: collection.to_string(),
        key: last,
    })
}

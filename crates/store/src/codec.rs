//! JSON encoding of records at the store boundary.

use pressroom_core::error::{Error, StoreError};
use pressroom_core::store::Collection;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Decode a stored document; a shape mismatch is a corrupt record.
pub(crate) fn decode<T: DeserializeOwned>(
    collection: Collection,
    project_id: &str,
    value: Value,
) -> Result<T, StoreError> {
    serde_json::from_value(value).map_err(|e| StoreError::Corrupt {
        collection: collection.to_string(),
        project_id: project_id.to_string(),
        reason: e.to_string(),
    })
}

pub(crate) fn encode<T: Serialize>(record: &T) -> Result<Value, Error> {
    Ok(serde_json::to_value(record)?)
}

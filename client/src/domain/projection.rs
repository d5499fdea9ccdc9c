//! Shared helpers for the entity projection layer.
//!
//! Projections are pure: raw nullable payloads go in, flat records come out.
//! Optional members fall back to documented defaults, while structurally
//! required members abort the whole mapping so malformed server data is
//! reported instead of rendered as blank rows.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::{Entity, SyncError};

/// Walk `path` from `data`, treating JSON `null` like an absent member.
pub(crate) fn at_path<'a>(data: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(data, |node, key| node.get(*key))
        .filter(|node| !node.is_null())
}

/// Resolve the expected root object or raise the entity's not-found error.
pub(crate) fn expect_present<'a>(
    data: &'a Value,
    path: &[&str],
    not_found: &str,
) -> Result<&'a Value, SyncError> {
    at_path(data, path).ok_or_else(|| SyncError::not_found(not_found))
}

/// Decode a raw DTO, mapping serde failures to a malformed-payload error.
pub(crate) fn decode<T: DeserializeOwned>(entity: &str, value: &Value) -> Result<T, SyncError> {
    T::deserialize(value).map_err(|err| {
        SyncError::malformed_payload(format!("{entity} payload could not be decoded: {err}"))
    })
}

/// Require a member that the record cannot exist without.
pub(crate) fn required<T>(entity: &str, field: &str, value: Option<T>) -> Result<T, SyncError> {
    value.ok_or_else(|| {
        SyncError::malformed_payload(format!(
            "{entity} payload is missing required field `{field}`"
        ))
    })
}

/// Apply the documented default for an optional text member.
pub(crate) fn or_default(value: Option<String>, default: &str) -> String {
    value.unwrap_or_else(|| default.to_owned())
}

/// Project a nullable list, dropping null entries silently. A `null` list
/// projects to no rows.
pub(crate) fn project_list<R, F>(
    entity: &str,
    list: &Value,
    project: impl Fn(R) -> Result<Entity<F>, SyncError>,
) -> Result<Vec<Entity<F>>, SyncError>
where
    R: DeserializeOwned,
{
    if list.is_null() {
        return Ok(Vec::new());
    }
    let raw: Vec<Option<R>> = decode(entity, list)?;
    raw.into_iter().flatten().map(project).collect()
}

/// Drop null entries from a nullable list of strings.
pub(crate) fn compact(values: Option<Vec<Option<String>>>) -> Vec<String> {
    values.unwrap_or_default().into_iter().flatten().collect()
}

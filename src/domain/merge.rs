use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use super::ValidationError;

/// Overlay the fields present in `patch` onto `record`.
///
/// Fields absent from the patch keep their stored values. Keys listed in
/// `protected` (ids, owners, creation stamps) are ignored. The merged value
/// must still deserialize as `R`.
pub fn merge_patch<R>(record: &R, patch: &Value, protected: &[&str]) -> Result<R, ValidationError>
where
    R: Serialize + DeserializeOwned,
{
    let Value::Object(fields) = patch else {
        return Err(ValidationError::Malformed("update must be a JSON object".into()));
    };

    let mut merged =
        serde_json::to_value(record).map_err(|e| ValidationError::Malformed(e.to_string()))?;
    let Value::Object(target) = &mut merged else {
        return Err(ValidationError::Malformed("record is not an object".into()));
    };

    for (key, value) in fields {
        if protected.contains(&key.as_str()) {
            continue;
        }
        target.insert(key.clone(), value.clone());
    }

    serde_json::from_value(merged).map_err(|e| ValidationError::Malformed(e.to_string()))
}

use crate::coerce::preserve_string_type;
use crate::types::{KeyPath, PathToken};
use serde_json::Value;
use tracing::debug;

/// Replaces the value at an existing location in the JSON document.
///
/// Nothing is created: a path naming a missing key, an out of range or non-numeric array
/// index, or a malformed path leaves the document untouched.
///
/// # Arguments
///
/// * `json_obj` - The JSON document to modify.
/// * `path` - The dotted key path, with `\.` for a literal dot.
/// * `value` - The already coerced value to write.
///
/// # Returns
///
/// `true` if a value was overwritten.
pub fn replace_value(json_obj: &mut Value, path: &str, value: &Value) -> bool {
    match path.parse::<KeyPath>() {
        Ok(key_path) => replace_located(json_obj, &key_path, value).is_some(),
        Err(err) => {
            debug!(path, %err, "malformed key path");
            false
        }
    }
}

/// Like [`replace_value`], but returns where the write happened and what was stored.
pub(crate) fn replace_located(
    json_obj: &mut Value,
    path: &KeyPath,
    value: &Value,
) -> Option<(Vec<PathToken>, Value)> {
    let mut location = Vec::with_capacity(path.len());
    let written = replace_at(json_obj, path.segments(), value, &mut location)?;
    Some((location, written))
}

fn replace_at(
    node: &mut Value,
    segments: &[String],
    value: &Value,
    location: &mut Vec<PathToken>,
) -> Option<Value> {
    let (key, rest) = segments.split_first()?;
    if key.is_empty() {
        return None;
    }
    let is_last = rest.is_empty();

    match node {
        Value::Array(items) => {
            let index = parse_index(key)?;
            let slot = items.get_mut(index)?;
            location.push(PathToken::Index(index));
            if is_last {
                // Array elements are written as coerced, without string preservation.
                *slot = value.clone();
                Some(value.clone())
            } else {
                replace_at(slot, rest, value, location)
            }
        }
        Value::Object(map) => {
            let slot = map.get_mut(key)?;
            location.push(PathToken::Key(key.clone()));
            if !is_last && (slot.is_object() || slot.is_array()) {
                return replace_at(slot, rest, value, location);
            }
            // Terminal, or a scalar reached before the path ran out: overwrite it.
            let written = preserve_string_type(slot, value);
            *slot = written.clone();
            Some(written)
        }
        _ => None,
    }
}

// Canonical decimal only: `01` and `+1` do not address element 1.
fn parse_index(key: &str) -> Option<usize> {
    key.parse::<usize>()
        .ok()
        .filter(|index| index.to_string() == key)
}

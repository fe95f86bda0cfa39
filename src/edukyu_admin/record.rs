//! # Path-Addressed Records
//!
//! A [`Record`] is the in-memory form of one editable entity: an arbitrarily
//! nested string-keyed mapping of scalars, lists, and further mappings. No
//! schema is enforced here; shape comes from the blank seed each editor opens
//! with (see the entity modules under `commands/`).
//!
//! All editing goes through the path-addressed mutator methods. Each one takes
//! the current record plus a [`FieldPath`] and returns a **new** record with
//! exactly one localized change; the original is never mutated, and a failed
//! operation leaves the caller's record untouched. Writes create missing
//! intermediate mappings on the way down. Reads never create anything.
//!
//! Out-of-range indexes and type mismatches are reportable [`PatchError`]s
//! rather than silent no-ops. The one create-on-write allowance: appending to
//! an *absent* field creates it as an empty list first. A field that exists
//! but holds a non-list value is an error, never silently replaced.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::path::FieldPath;

/// Errors from path-addressed mutation. The record the operation was called
/// on is unchanged whenever one of these is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PatchError {
    #[error("Value at segment '{segment}' of '{path}' is not a mapping")]
    NotAnObject { path: FieldPath, segment: String },

    #[error("No list at '{path}'")]
    NotAList { path: FieldPath },

    #[error("Index {index} out of bounds at '{path}' (list has {len} items)")]
    IndexOutOfBounds {
        path: FieldPath,
        index: usize,
        len: usize,
    },

    #[error("Item {index} at '{path}' is not a mapping")]
    ItemNotObject { path: FieldPath, index: usize },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a JSON value that is an object; `None` otherwise.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.0.get_mut(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Reads the value at a path. Intermediate segments must be mappings.
    pub fn value_at(&self, path: &FieldPath) -> Option<&Value> {
        let mut current = &self.0;
        for segment in path.parents() {
            current = current.get(segment)?.as_object()?;
        }
        current.get(path.leaf())
    }

    /// Length of the list at a path, if there is one.
    pub fn list_len(&self, path: &FieldPath) -> Option<usize> {
        self.value_at(path)?.as_array().map(Vec::len)
    }

    /// Assigns `value` at the final segment of `path`, creating empty mappings
    /// for any missing intermediate segment. Any value type is accepted.
    pub fn set_scalar(&self, path: &FieldPath, value: Value) -> Result<Record, PatchError> {
        let mut map = self.0.clone();
        let parent = descend_or_create(&mut map, path)?;
        parent.insert(path.leaf().to_string(), value);
        Ok(Record(map))
    }

    /// Appends `item` to the list at `path`, preserving order. An absent field
    /// is created as an empty list first (intermediates too); a present
    /// non-list value is an error.
    pub fn append_to_list(&self, path: &FieldPath, item: Value) -> Result<Record, PatchError> {
        let mut map = self.0.clone();
        let parent = descend_or_create(&mut map, path)?;
        let slot = parent
            .entry(path.leaf().to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        match slot {
            Value::Array(list) => list.push(item),
            _ => return Err(PatchError::NotAList { path: path.clone() }),
        }
        Ok(Record(map))
    }

    /// Removes the element at `index` from the list at `path`. Remaining
    /// elements shift down, order preserved.
    pub fn remove_from_list(&self, path: &FieldPath, index: usize) -> Result<Record, PatchError> {
        let mut map = self.0.clone();
        let list = existing_list(&mut map, path)?;
        check_bounds(path, index, list.len())?;
        list.remove(index);
        Ok(Record(map))
    }

    /// Updates the element at `index` in the list at `path`. With a `field`,
    /// the element must be a mapping and only `element[field]` changes; with
    /// no `field`, the whole element is replaced by `value`.
    pub fn update_list_item(
        &self,
        path: &FieldPath,
        index: usize,
        field: Option<&str>,
        value: Value,
    ) -> Result<Record, PatchError> {
        let mut map = self.0.clone();
        let list = existing_list(&mut map, path)?;
        check_bounds(path, index, list.len())?;
        match field {
            Some(field) => {
                let element = list[index]
                    .as_object_mut()
                    .ok_or_else(|| PatchError::ItemNotObject {
                        path: path.clone(),
                        index,
                    })?;
                element.insert(field.to_string(), value);
            }
            None => list[index] = value,
        }
        Ok(Record(map))
    }

    /// Appends `item` to the list at `element[nested_field]`, where `element`
    /// is the mapping at `base_path[base_index]`. The nested field is created
    /// as an empty list when absent.
    pub fn append_to_nested_list(
        &self,
        base_path: &FieldPath,
        base_index: usize,
        nested_field: &str,
        item: Value,
    ) -> Result<Record, PatchError> {
        let mut map = self.0.clone();
        let element = nested_element(&mut map, base_path, base_index)?;
        let slot = element
            .entry(nested_field.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        match slot {
            Value::Array(list) => list.push(item),
            _ => {
                return Err(PatchError::NotAList {
                    path: base_path.child(nested_field),
                })
            }
        }
        Ok(Record(map))
    }

    /// Replaces `element[nested_field][nested_index]` with `value`, with the
    /// same bounds checking as the top-level list operations.
    pub fn update_nested_list_item(
        &self,
        base_path: &FieldPath,
        base_index: usize,
        nested_field: &str,
        nested_index: usize,
        value: Value,
    ) -> Result<Record, PatchError> {
        let mut map = self.0.clone();
        let element = nested_element(&mut map, base_path, base_index)?;
        let nested_path = base_path.child(nested_field);
        let list = match element.get_mut(nested_field) {
            Some(Value::Array(list)) => list,
            _ => return Err(PatchError::NotAList { path: nested_path }),
        };
        check_bounds(&nested_path, nested_index, list.len())?;
        list[nested_index] = value;
        Ok(Record(map))
    }

    /// Removes `element[nested_field][nested_index]`, shifting the remaining
    /// elements down.
    pub fn remove_from_nested_list(
        &self,
        base_path: &FieldPath,
        base_index: usize,
        nested_field: &str,
        nested_index: usize,
    ) -> Result<Record, PatchError> {
        let mut map = self.0.clone();
        let element = nested_element(&mut map, base_path, base_index)?;
        let nested_path = base_path.child(nested_field);
        let list = match element.get_mut(nested_field) {
            Some(Value::Array(list)) => list,
            _ => return Err(PatchError::NotAList { path: nested_path }),
        };
        check_bounds(&nested_path, nested_index, list.len())?;
        list.remove(nested_index);
        Ok(Record(map))
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Walks `path.parents()` from `root`, creating empty mappings for missing
/// segments. Errors when an existing value blocks the walk.
fn descend_or_create<'a>(
    root: &'a mut Map<String, Value>,
    path: &FieldPath,
) -> Result<&'a mut Map<String, Value>, PatchError> {
    let mut current = root;
    for segment in path.parents() {
        let slot = current
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        current = match slot {
            Value::Object(map) => map,
            _ => {
                return Err(PatchError::NotAnObject {
                    path: path.clone(),
                    segment: segment.clone(),
                })
            }
        };
    }
    Ok(current)
}

/// Walks `path.parents()` without creating anything. `Ok(None)` means the
/// path names nothing; an existing non-mapping on the way is an error.
fn descend_existing<'a>(
    root: &'a mut Map<String, Value>,
    path: &FieldPath,
) -> Result<Option<&'a mut Map<String, Value>>, PatchError> {
    let mut current = root;
    for segment in path.parents() {
        current = match current.get_mut(segment) {
            None => return Ok(None),
            Some(Value::Object(map)) => map,
            Some(_) => {
                return Err(PatchError::NotAnObject {
                    path: path.clone(),
                    segment: segment.clone(),
                })
            }
        };
    }
    Ok(Some(current))
}

/// The list at `path`, which must already exist.
fn existing_list<'a>(
    root: &'a mut Map<String, Value>,
    path: &FieldPath,
) -> Result<&'a mut Vec<Value>, PatchError> {
    let parent = descend_existing(root, path)?
        .ok_or_else(|| PatchError::NotAList { path: path.clone() })?;
    match parent.get_mut(path.leaf()) {
        Some(Value::Array(list)) => Ok(list),
        _ => Err(PatchError::NotAList { path: path.clone() }),
    }
}

/// The mapping element at `base_path[base_index]`.
fn nested_element<'a>(
    root: &'a mut Map<String, Value>,
    base_path: &FieldPath,
    base_index: usize,
) -> Result<&'a mut Map<String, Value>, PatchError> {
    let list = existing_list(root, base_path)?;
    check_bounds(base_path, base_index, list.len())?;
    list[base_index]
        .as_object_mut()
        .ok_or_else(|| PatchError::ItemNotObject {
            path: base_path.clone(),
            index: base_index,
        })
}

fn check_bounds(path: &FieldPath, index: usize, len: usize) -> Result<(), PatchError> {
    if index >= len {
        return Err(PatchError::IndexOutOfBounds {
            path: path.clone(),
            index,
            len,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    fn record(value: Value) -> Record {
        Record::from_value(value).unwrap()
    }

    fn path(s: &str) -> FieldPath {
        FieldPath::from_str(s).unwrap()
    }

    #[test]
    fn set_scalar_creates_missing_intermediates() {
        let original = record(json!({"title": "MBA"}));
        let updated = original
            .set_scalar(&path("page.fees.original"), json!("150000"))
            .unwrap();

        assert_eq!(
            updated.value_at(&path("page.fees.original")),
            Some(&json!("150000"))
        );
        // Sibling fields are untouched
        assert_eq!(updated.get_str("title"), Some("MBA"));
        // The original record never changes
        assert_eq!(original, record(json!({"title": "MBA"})));
    }

    #[test]
    fn set_scalar_overwrites_existing_value() {
        let original = record(json!({"page": {"title": "Old"}}));
        let updated = original.set_scalar(&path("page.title"), json!("New")).unwrap();
        assert_eq!(updated.value_at(&path("page.title")), Some(&json!("New")));
    }

    #[test]
    fn set_scalar_errors_when_scalar_blocks_the_walk() {
        let original = record(json!({"page": "not a mapping"}));
        let err = original
            .set_scalar(&path("page.title"), json!("New"))
            .unwrap_err();
        assert!(matches!(err, PatchError::NotAnObject { .. }));
        assert_eq!(original, record(json!({"page": "not a mapping"})));
    }

    #[test]
    fn append_creates_absent_list() {
        let original = record(json!({}));
        let updated = original
            .append_to_list(&path("university_info.benefits"), json!("Placement"))
            .unwrap();
        assert_eq!(
            updated.value_at(&path("university_info.benefits")),
            Some(&json!(["Placement"]))
        );
    }

    #[test]
    fn append_preserves_order() {
        let original = record(json!({"tags": ["a"]}));
        let updated = original
            .append_to_list(&path("tags"), json!("b"))
            .unwrap()
            .append_to_list(&path("tags"), json!("c"))
            .unwrap();
        assert_eq!(updated.get("tags"), Some(&json!(["a", "b", "c"])));
    }

    #[test]
    fn append_refuses_non_list_target() {
        let original = record(json!({"tags": "oops"}));
        let err = original.append_to_list(&path("tags"), json!("b")).unwrap_err();
        assert_eq!(
            err,
            PatchError::NotAList {
                path: path("tags")
            }
        );
        assert_eq!(original, record(json!({"tags": "oops"})));
    }

    #[test]
    fn remove_preserves_order_of_the_rest() {
        let original = record(json!({"items": [1, 2, 3, 4]}));
        let updated = original.remove_from_list(&path("items"), 1).unwrap();
        assert_eq!(updated.get("items"), Some(&json!([1, 3, 4])));
    }

    #[test]
    fn remove_out_of_bounds_is_an_error_and_leaves_record_unchanged() {
        let original = record(json!({"items": [1, 2]}));
        let err = original.remove_from_list(&path("items"), 2).unwrap_err();
        assert_eq!(
            err,
            PatchError::IndexOutOfBounds {
                path: path("items"),
                index: 2,
                len: 2
            }
        );
        assert_eq!(original, record(json!({"items": [1, 2]})));
    }

    #[test]
    fn remove_from_missing_list_is_an_error() {
        let original = record(json!({}));
        let err = original.remove_from_list(&path("items"), 0).unwrap_err();
        assert!(matches!(err, PatchError::NotAList { .. }));
    }

    #[test]
    fn append_then_remove_round_trips() {
        let original = record(json!({"page": {"courses": [{"name": "BBA"}]}}));
        let appended = original
            .append_to_list(&path("page.courses"), json!({"name": "MBA"}))
            .unwrap();
        let len = original.list_len(&path("page.courses")).unwrap();
        let restored = appended.remove_from_list(&path("page.courses"), len).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn update_item_field_touches_only_that_field() {
        let original = record(json!({"faqs": [{"question": "Q1", "answer": "A1"}]}));
        let updated = original
            .update_list_item(&path("faqs"), 0, Some("answer"), json!("A2"))
            .unwrap();
        assert_eq!(
            updated.get("faqs"),
            Some(&json!([{"question": "Q1", "answer": "A2"}]))
        );
    }

    #[test]
    fn update_item_without_field_replaces_element() {
        let original = record(json!({"tags": ["a", "b"]}));
        let updated = original
            .update_list_item(&path("tags"), 1, None, json!("z"))
            .unwrap();
        assert_eq!(updated.get("tags"), Some(&json!(["a", "z"])));
    }

    #[test]
    fn update_item_field_on_scalar_element_is_an_error() {
        let original = record(json!({"tags": ["a"]}));
        let err = original
            .update_list_item(&path("tags"), 0, Some("name"), json!("x"))
            .unwrap_err();
        assert_eq!(
            err,
            PatchError::ItemNotObject {
                path: path("tags"),
                index: 0
            }
        );
    }

    #[test]
    fn update_item_out_of_bounds_is_an_error() {
        let original = record(json!({"tags": ["a"]}));
        let err = original
            .update_list_item(&path("tags"), 5, None, json!("x"))
            .unwrap_err();
        assert!(matches!(err, PatchError::IndexOutOfBounds { index: 5, .. }));
    }

    #[test]
    fn nested_append_creates_the_inner_list() {
        let original = record(json!({"semesters": [{"number": 1}]}));
        let updated = original
            .append_to_nested_list(&path("semesters"), 0, "subjects", json!("Accounting"))
            .unwrap();
        assert_eq!(
            updated.get("semesters"),
            Some(&json!([{"number": 1, "subjects": ["Accounting"]}]))
        );
    }

    #[test]
    fn nested_update_replaces_inner_element() {
        let original = record(json!({"semesters": [{"subjects": ["Math", "Law"]}]}));
        let updated = original
            .update_nested_list_item(&path("semesters"), 0, "subjects", 1, json!("Tax Law"))
            .unwrap();
        assert_eq!(
            updated.get("semesters"),
            Some(&json!([{"subjects": ["Math", "Tax Law"]}]))
        );
    }

    #[test]
    fn nested_remove_checks_inner_bounds() {
        let original = record(json!({"semesters": [{"subjects": ["Math"]}]}));
        let err = original
            .remove_from_nested_list(&path("semesters"), 0, "subjects", 3)
            .unwrap_err();
        assert!(matches!(err, PatchError::IndexOutOfBounds { index: 3, .. }));

        let updated = original
            .remove_from_nested_list(&path("semesters"), 0, "subjects", 0)
            .unwrap();
        assert_eq!(updated.get("semesters"), Some(&json!([{"subjects": []}])));
    }

    #[test]
    fn nested_ops_check_outer_bounds_and_element_shape() {
        let original = record(json!({"semesters": [{"number": 1}], "flat": ["x"]}));

        let err = original
            .append_to_nested_list(&path("semesters"), 4, "subjects", json!("a"))
            .unwrap_err();
        assert!(matches!(err, PatchError::IndexOutOfBounds { index: 4, .. }));

        let err = original
            .append_to_nested_list(&path("flat"), 0, "subjects", json!("a"))
            .unwrap_err();
        assert!(matches!(err, PatchError::ItemNotObject { index: 0, .. }));
    }

    #[test]
    fn value_at_reads_without_creating() {
        let original = record(json!({"a": {"b": 1}}));
        assert_eq!(original.value_at(&path("a.b")), Some(&json!(1)));
        assert_eq!(original.value_at(&path("a.missing")), None);
        assert_eq!(original.value_at(&path("missing.b")), None);
        assert_eq!(original, record(json!({"a": {"b": 1}})));
    }
}

//! Form state: one editable record per open editor.
//!
//! A [`FormSession`] is exclusively owned by the editor that opened it. Edits
//! are staged as [`PatchOp`] values and applied through the record mutator;
//! the session swaps in the new record only when the operation succeeds, so a
//! failed patch leaves the visible form exactly as it was. Dropping the
//! session is the cancel path.

use serde_json::Value;

use crate::model::DocumentId;
use crate::path::FieldPath;
use crate::record::{PatchError, Record};

/// One mutation against a form's record, addressed by field path. Invalid
/// paths are rejected when the [`FieldPath`] is built, before the operation
/// ever reaches a record.
#[derive(Debug, Clone)]
pub enum PatchOp {
    /// Assign a value, creating missing intermediate mappings.
    Set { path: FieldPath, value: Value },
    /// Append to the list at `path`, creating it when absent.
    Append { path: FieldPath, item: Value },
    /// Remove the list element at `index`.
    Remove { path: FieldPath, index: usize },
    /// Update one field of the mapping element at `index`, or replace the
    /// whole element when `field` is `None`.
    UpdateItem {
        path: FieldPath,
        index: usize,
        field: Option<String>,
        value: Value,
    },
    /// Append to the list at `field` inside the element at `path[index]`.
    AppendNested {
        path: FieldPath,
        index: usize,
        field: String,
        item: Value,
    },
    /// Replace `path[index].field[nested_index]`.
    UpdateNested {
        path: FieldPath,
        index: usize,
        field: String,
        nested_index: usize,
        value: Value,
    },
    /// Remove `path[index].field[nested_index]`.
    RemoveNested {
        path: FieldPath,
        index: usize,
        field: String,
        nested_index: usize,
    },
}

#[derive(Debug, Clone)]
pub struct FormSession {
    record: Record,
    editing: Option<DocumentId>,
}

impl FormSession {
    /// Opens an editor over a blank seed record (new entity).
    pub fn create(seed: Record) -> Self {
        Self {
            record: seed,
            editing: None,
        }
    }

    /// Opens an editor over an existing document's unwrapped record. The
    /// identity routes the eventual submit to an update instead of a create.
    pub fn edit(id: DocumentId, record: Record) -> Self {
        Self {
            record,
            editing: Some(id),
        }
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn into_record(self) -> Record {
        self.record
    }

    pub fn editing(&self) -> Option<&DocumentId> {
        self.editing.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// Applies one staged operation. On success the session's record is
    /// replaced atomically; on error it is left untouched.
    pub fn apply(&mut self, op: &PatchOp) -> Result<(), PatchError> {
        let next = match op {
            PatchOp::Set { path, value } => self.record.set_scalar(path, value.clone())?,
            PatchOp::Append { path, item } => self.record.append_to_list(path, item.clone())?,
            PatchOp::Remove { path, index } => self.record.remove_from_list(path, *index)?,
            PatchOp::UpdateItem {
                path,
                index,
                field,
                value,
            } => self
                .record
                .update_list_item(path, *index, field.as_deref(), value.clone())?,
            PatchOp::AppendNested {
                path,
                index,
                field,
                item,
            } => self
                .record
                .append_to_nested_list(path, *index, field, item.clone())?,
            PatchOp::UpdateNested {
                path,
                index,
                field,
                nested_index,
                value,
            } => self.record.update_nested_list_item(
                path,
                *index,
                field,
                *nested_index,
                value.clone(),
            )?,
            PatchOp::RemoveNested {
                path,
                index,
                field,
                nested_index,
            } => self
                .record
                .remove_from_nested_list(path, *index, field, *nested_index)?,
        };
        self.record = next;
        Ok(())
    }

    /// Discards the current record and starts over from a fresh seed, clearing
    /// any editing identity (the close-and-reopen path).
    pub fn reset(&mut self, seed: Record) {
        self.record = seed;
        self.editing = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    fn path(s: &str) -> FieldPath {
        FieldPath::from_str(s).unwrap()
    }

    fn seed() -> Record {
        Record::from_value(json!({"title": "", "tags": []})).unwrap()
    }

    #[test]
    fn apply_swaps_in_the_new_record() {
        let mut form = FormSession::create(seed());
        form.apply(&PatchOp::Set {
            path: path("title"),
            value: json!("Hello"),
        })
        .unwrap();
        form.apply(&PatchOp::Append {
            path: path("tags"),
            item: json!("news"),
        })
        .unwrap();

        assert_eq!(form.record().get_str("title"), Some("Hello"));
        assert_eq!(form.record().get("tags"), Some(&json!(["news"])));
    }

    #[test]
    fn failed_apply_leaves_the_record_untouched() {
        let mut form = FormSession::create(seed());
        let err = form
            .apply(&PatchOp::Remove {
                path: path("tags"),
                index: 7,
            })
            .unwrap_err();
        assert!(matches!(err, PatchError::IndexOutOfBounds { .. }));
        assert_eq!(form.record(), &seed());
    }

    #[test]
    fn editing_identity_survives_patches() {
        let id = DocumentId::from("doc-1");
        let mut form = FormSession::edit(id.clone(), seed());
        form.apply(&PatchOp::Set {
            path: path("title"),
            value: json!("Edited"),
        })
        .unwrap();

        assert!(form.is_editing());
        assert_eq!(form.editing(), Some(&id));
    }

    #[test]
    fn reset_clears_identity_and_record() {
        let mut form = FormSession::edit(DocumentId::from("doc-1"), seed());
        form.reset(seed());
        assert!(!form.is_editing());
        assert_eq!(form.record(), &seed());
    }
}

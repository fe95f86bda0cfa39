//! Shared submission machinery: identifier validation, wrapping a record
//! under its dynamic key(s), recovering the key on unwrap, and routing a
//! finished body to create vs. update.
//!
//! Validation failures are raised before any store call and carry the message
//! shown to the user; the form's record stays alive so the submission can be
//! corrected and retried.

use crate::error::{AdminError, Result};
use crate::model::{Collection, DocumentId, StoredDocument};
use crate::record::Record;
use crate::store::DocumentStore;

/// Sibling field persisted next to the wrapper keys for list display; never
/// itself a wrapper key.
pub const METADATA_KEY: &str = "_metadata";

/// Entity keys may contain lowercase letters and underscores only, and must
/// not be empty.
pub fn validate_entity_key(label: &str, key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(AdminError::Validation(format!("{} is required", label)));
    }
    if !key.chars().all(|c| c.is_ascii_lowercase() || c == '_') {
        return Err(AdminError::Validation(format!(
            "{} must contain only lowercase letters and underscores (a-z, _): '{}'",
            label, key
        )));
    }
    Ok(())
}

/// Trims and requires a non-empty value; returns the trimmed form.
pub fn require_nonempty(label: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AdminError::Validation(format!("{} is required", label)));
    }
    Ok(trimmed.to_string())
}

/// Nests `body` under a single dynamic top-level key.
pub fn wrap_under_key(key: &str, body: Record) -> Record {
    let mut wrapped = Record::new();
    wrapped.insert(key, body.into_value());
    wrapped
}

/// Nests `body` under two dynamic mapping levels (`outer` then `inner`).
pub fn wrap_under_keys(outer: &str, inner: &str, body: Record) -> Record {
    wrap_under_key(outer, wrap_under_key(inner, body))
}

/// The dynamic wrapper key of a persisted body: its first top-level key,
/// skipping the metadata sibling.
pub fn wrapper_key(record: &Record) -> Option<&str> {
    record
        .keys()
        .map(String::as_str)
        .find(|key| *key != METADATA_KEY)
}

/// Create-or-update routing: a form session with no editing identity creates
/// a fresh document, one opened over an existing document updates it.
pub fn persist<S: DocumentStore>(
    store: &mut S,
    collection: Collection,
    editing: Option<&DocumentId>,
    body: Record,
) -> Result<StoredDocument> {
    match editing {
        Some(id) => store.update(collection, id, body),
        None => store.create(collection, body),
    }
}

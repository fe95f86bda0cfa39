//! Comparison datasets: one document per college, keyed by its display name.
//! The field names are the row labels of the public comparison table, so most
//! of them are capitalized free text rather than snake_case.

use once_cell::sync::Lazy;
use serde_json::{json, Value};

use crate::commands::{refresh_listing, CmdMessage, CmdResult};
use crate::error::Result;
use crate::form::FormSession;
use crate::model::{Collection, DocumentId, StoredDocument};
use crate::record::Record;
use crate::store::{DocumentStore, Query};
use crate::submit;

const NAME_FIELD: &str = "collegeName";

static BLANK: Lazy<Record> = Lazy::new(|| {
    Record::from_value(json!({
        "collegeName": "",
        "Colleges": { "text": "", "img": "" },
        "Abbreviation": "",
        "Institute Type": "",
        "Establishment": "",
        "About": "",
        "Accreditation": "",
        "UGC": "",
        "AICTE": "",
        "DEB": "",
        "Duration": "",
        "Learning Methodology": "",
        "Fees": "",
        "Programs": "",
        "Specialisation": "",
        "Review": "",
        "Eligibility": "",
        "Any Issue": "",
        "Our recommendation": "",
        "Website": "",
    }))
    .unwrap_or_default()
});

pub fn blank_record() -> Record {
    BLANK.clone()
}

pub fn new_form() -> FormSession {
    FormSession::create(blank_record())
}

/// Opens an editor over a persisted comparison entry. The wrapper key becomes
/// the `collegeName` field, and missing row fields stay blank.
pub fn open(document: &StoredDocument) -> FormSession {
    let mut record = blank_record();
    if let Some(name) = submit::wrapper_key(&document.data) {
        let name = name.to_string();
        if let Some(fields) = document.data.get(&name).and_then(Value::as_object) {
            for (field, value) in fields {
                record.insert(field.clone(), value.clone());
            }
        }
        record.insert(NAME_FIELD, json!(name));
    }
    FormSession::edit(document.id.clone(), record)
}

/// Persists a comparison form. The trimmed college name becomes the wrapper
/// key, and `Colleges.text` falls back to that name when left blank.
pub fn submit<S: DocumentStore>(
    store: &mut S,
    editing: Option<&DocumentId>,
    record: Record,
) -> Result<CmdResult> {
    let name = submit::require_nonempty("College name", record.get_str(NAME_FIELD).unwrap_or(""))?;

    let mut body = record;
    body.remove(NAME_FIELD);
    default_colleges_text(&mut body, &name);
    let wrapped = submit::wrap_under_key(&name, body);

    let document = submit::persist(store, Collection::Compare, editing, wrapped)?;
    let action = if editing.is_some() { "updated" } else { "created" };
    let mut result = CmdResult::default().with_affected(vec![document]);
    result.add_message(CmdMessage::success(format!(
        "Comparison entry {}: {}",
        action, name
    )));
    refresh_listing(store, Collection::Compare, &mut result);
    Ok(result)
}

pub fn list<S: DocumentStore>(store: &S) -> Result<CmdResult> {
    let documents = store.list(Collection::Compare, &Query::new())?;
    Ok(CmdResult::default().with_listed(documents))
}

pub fn get<S: DocumentStore>(store: &S, id: &DocumentId) -> Result<StoredDocument> {
    store.get(Collection::Compare, id)
}

pub fn delete<S: DocumentStore>(store: &mut S, id: &DocumentId) -> Result<CmdResult> {
    store.delete(Collection::Compare, id)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success("Comparison entry deleted"));
    refresh_listing(store, Collection::Compare, &mut result);
    Ok(result)
}

fn default_colleges_text(body: &mut Record, name: &str) {
    match body.get_mut("Colleges").and_then(Value::as_object_mut) {
        Some(colleges) => {
            let blank = colleges
                .get("text")
                .and_then(Value::as_str)
                .unwrap_or("")
                .is_empty();
            if blank {
                colleges.insert("text".to_string(), json!(name));
            }
        }
        None => {
            body.insert("Colleges", json!({ "text": name, "img": "" }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdminError;
    use crate::form::PatchOp;
    use crate::store::memory::MemoryStore;

    fn named_form(name: &str) -> Record {
        let mut record = blank_record();
        record.insert(NAME_FIELD, json!(name));
        record
    }

    #[test]
    fn submit_wraps_under_the_trimmed_name() {
        let mut store = MemoryStore::new();
        let result = submit(&mut store, None, named_form("  Amity  ")).unwrap();
        let saved = &result.affected[0];

        assert_eq!(saved.data.len(), 1);
        let fields = saved.data.get("Amity").unwrap();
        assert_eq!(fields["Colleges"]["text"], json!("Amity"));
        assert_eq!(fields["Abbreviation"], json!(""));
        assert!(fields.get("collegeName").is_none());
    }

    #[test]
    fn submit_keeps_an_explicit_colleges_text() {
        let mut store = MemoryStore::new();
        let mut session = FormSession::create(named_form("Amity"));
        session
            .apply(&PatchOp::Set {
                path: "Colleges.text".parse().unwrap(),
                value: json!("Amity Online"),
            })
            .unwrap();

        let result = submit(&mut store, None, session.into_record()).unwrap();
        let fields = result.affected[0].data.get("Amity").unwrap();
        assert_eq!(fields["Colleges"]["text"], json!("Amity Online"));
    }

    #[test]
    fn submit_requires_a_college_name() {
        let mut store = MemoryStore::new();
        let err = submit(&mut store, None, blank_record()).unwrap_err();
        assert!(matches!(err, AdminError::Validation(_)));
    }

    #[test]
    fn open_restores_the_name_and_row_fields() {
        let mut store = MemoryStore::new();
        let mut record = named_form("Amity");
        record.insert("Fees", json!("1,20,000"));
        let created = submit(&mut store, None, record).unwrap().affected[0].clone();

        let session = open(&created);
        assert!(session.is_editing());
        assert_eq!(session.record().get_str("collegeName"), Some("Amity"));
        assert_eq!(session.record().get_str("Fees"), Some("1,20,000"));
        assert_eq!(session.record().get_str("Website"), Some(""));
    }

    #[test]
    fn delete_refreshes_the_listing() {
        let mut store = MemoryStore::new();
        let first = submit(&mut store, None, named_form("Amity")).unwrap().affected[0].clone();
        submit(&mut store, None, named_form("Jain")).unwrap();

        let result = delete(&mut store, &first.id).unwrap();
        assert_eq!(result.listed.len(), 1);
        assert_eq!(
            submit::wrapper_key(&result.listed[0].data),
            Some("Jain")
        );
    }
}

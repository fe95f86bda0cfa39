//! Colleges: a composite entity. The form edits a flat record with a
//! `collegeKey` plus three sections, and the persisted body nests those
//! sections under the key itself, so a record keyed `DYP` stores as
//! `{ "DYP": { database, university_info, redirects } }`.

use once_cell::sync::Lazy;
use serde_json::{json, Value};

use crate::commands::{refresh_listing, CmdMessage, CmdResult};
use crate::error::Result;
use crate::form::FormSession;
use crate::model::{Collection, DocumentId, StoredDocument};
use crate::record::Record;
use crate::store::{DocumentStore, Query};
use crate::submit;

const KEY_FIELD: &str = "collegeKey";

static BLANK: Lazy<Record> = Lazy::new(|| {
    Record::from_value(json!({
        "collegeKey": "",
        "database": {
            "host": "",
            "user": "",
            "password": "",
            "name": "",
        },
        "university_info": {
            "name": "",
            "logo": "",
            "banner_image": "",
            "accreditations": [],
            "about": {
                "description": "",
                "highlights": [],
                "images": [],
            },
            "courses": [],
            "benefits": [],
            "degree": {
                "description": "",
                "highlights": [],
                "certificate_image": "",
            },
            "degree_sample": {
                "image": "",
                "description": "",
                "highlights": [],
            },
            "admission_process": [],
            "placement": {
                "partners": [],
                "benefits": [],
                "statistics": {
                    "average_package": "",
                    "highest_package": "",
                },
            },
            "faqs": [],
        },
        "redirects": {
            "success": "",
        },
    }))
    .unwrap_or_default()
});

/// What the listing shows for one college document.
#[derive(Debug, Clone, PartialEq)]
pub struct CollegeSummary {
    pub id: DocumentId,
    pub key: String,
    pub name: String,
    pub description: String,
    pub course_count: usize,
    pub accreditation_count: usize,
    pub has_logo: bool,
    pub has_banner: bool,
}

pub fn blank_record() -> Record {
    BLANK.clone()
}

pub fn new_form() -> FormSession {
    FormSession::create(blank_record())
}

/// Opens an editor over a persisted college. The wrapper key becomes the
/// `collegeKey` field again, and sections the document lacks stay at their
/// blank defaults.
pub fn open(document: &StoredDocument) -> FormSession {
    let mut record = blank_record();
    if let Some(key) = submit::wrapper_key(&document.data) {
        let key = key.to_string();
        if let Some(sections) = document.data.get(&key).and_then(Value::as_object) {
            for (field, value) in sections {
                record.insert(field.clone(), value.clone());
            }
        }
        record.insert(KEY_FIELD, json!(key));
    }
    FormSession::edit(document.id.clone(), record)
}

/// Persists a college form: the key field is lifted out of the record and the
/// remaining sections are nested under it.
pub fn submit<S: DocumentStore>(
    store: &mut S,
    editing: Option<&DocumentId>,
    record: Record,
) -> Result<CmdResult> {
    let key = submit::require_nonempty("College key", record.get_str(KEY_FIELD).unwrap_or(""))?;

    let mut body = record;
    body.remove(KEY_FIELD);
    let wrapped = submit::wrap_under_key(&key, body);

    let document = submit::persist(store, Collection::Colleges, editing, wrapped)?;
    let action = if editing.is_some() { "updated" } else { "created" };
    let mut result = CmdResult::default().with_affected(vec![document]);
    result.add_message(CmdMessage::success(format!("College {}: {}", action, key)));
    refresh_listing(store, Collection::Colleges, &mut result);
    Ok(result)
}

pub fn list<S: DocumentStore>(store: &S) -> Result<CmdResult> {
    let documents = store.list(Collection::Colleges, &Query::new())?;
    Ok(CmdResult::default().with_listed(documents))
}

pub fn get<S: DocumentStore>(store: &S, id: &DocumentId) -> Result<StoredDocument> {
    store.get(Collection::Colleges, id)
}

pub fn delete<S: DocumentStore>(store: &mut S, id: &DocumentId) -> Result<CmdResult> {
    store.delete(Collection::Colleges, id)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success("College deleted"));
    refresh_listing(store, Collection::Colleges, &mut result);
    Ok(result)
}

/// Flattens a persisted college into the fields the listing renders.
pub fn summarize(document: &StoredDocument) -> CollegeSummary {
    let key = submit::wrapper_key(&document.data).unwrap_or("").to_string();
    let info = document
        .data
        .get(&key)
        .and_then(|sections| sections.get("university_info"))
        .and_then(Value::as_object);

    let text = |field: &str| {
        info.and_then(|i| i.get(field))
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string()
    };
    let count = |field: &str| {
        info.and_then(|i| i.get(field))
            .and_then(Value::as_array)
            .map(Vec::len)
            .unwrap_or(0)
    };

    CollegeSummary {
        id: document.id.clone(),
        key,
        name: text("name"),
        description: info
            .and_then(|i| i.get("about"))
            .and_then(|about| about.get("description"))
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string(),
        course_count: count("courses"),
        accreditation_count: count("accreditations"),
        has_logo: !text("logo").is_empty(),
        has_banner: !text("banner_image").is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdminError;
    use crate::form::PatchOp;
    use crate::store::memory::MemoryStore;

    fn dyp_form() -> Record {
        let mut session = new_form();
        for (path, value) in [
            ("collegeKey", json!("DYP")),
            ("university_info.name", json!("DY Patil University")),
            ("university_info.logo", json!("/logos/dyp.png")),
            ("database.host", json!("db.example.com")),
            ("redirects.success", json!("/thank-you")),
        ] {
            session
                .apply(&PatchOp::Set {
                    path: path.parse().unwrap(),
                    value,
                })
                .unwrap();
        }
        session.into_record()
    }

    #[test]
    fn submit_nests_the_sections_under_the_college_key() {
        let mut store = MemoryStore::new();
        let result = submit(&mut store, None, dyp_form()).unwrap();
        let saved = &result.affected[0];

        assert_eq!(saved.data.len(), 1);
        let sections = saved.data.get("DYP").unwrap();
        assert_eq!(
            sections["university_info"]["name"],
            json!("DY Patil University")
        );
        assert_eq!(sections["database"]["host"], json!("db.example.com"));
        assert_eq!(sections["redirects"]["success"], json!("/thank-you"));
        assert!(sections.get("collegeKey").is_none());
    }

    #[test]
    fn submit_requires_a_college_key() {
        let mut store = MemoryStore::new();
        let err = submit(&mut store, None, blank_record()).unwrap_err();
        assert!(matches!(err, AdminError::Validation(_)));
    }

    #[test]
    fn open_restores_the_key_and_sections() {
        let mut store = MemoryStore::new();
        let created = submit(&mut store, None, dyp_form()).unwrap().affected[0].clone();

        let session = open(&created);
        assert!(session.is_editing());
        assert_eq!(session.record().get_str("collegeKey"), Some("DYP"));
        assert_eq!(
            session
                .record()
                .value_at(&"university_info.name".parse().unwrap()),
            Some(&json!("DY Patil University"))
        );
    }

    #[test]
    fn open_backfills_missing_sections_with_blanks() {
        let mut store = MemoryStore::new();
        let sparse = Record::from_value(json!({
            "AMU": { "university_info": { "name": "Amity" } }
        }))
        .unwrap();
        let created = store.create(Collection::Colleges, sparse).unwrap();

        let session = open(&created);
        assert_eq!(
            session.record().value_at(&"database.host".parse().unwrap()),
            Some(&json!(""))
        );
        assert_eq!(
            session
                .record()
                .value_at(&"university_info.name".parse().unwrap()),
            Some(&json!("Amity"))
        );
    }

    #[test]
    fn summarize_flattens_the_wrapped_sections() {
        let mut store = MemoryStore::new();
        let mut session = FormSession::create(blank_record());
        for (path, value) in [
            ("collegeKey", json!("DYP")),
            ("university_info.name", json!("DY Patil University")),
            ("university_info.logo", json!("/logos/dyp.png")),
            ("university_info.about.description", json!("Pune campus")),
        ] {
            session
                .apply(&PatchOp::Set {
                    path: path.parse().unwrap(),
                    value,
                })
                .unwrap();
        }
        for accreditation in ["NAAC A++", "UGC"] {
            session
                .apply(&PatchOp::Append {
                    path: "university_info.accreditations".parse().unwrap(),
                    item: json!(accreditation),
                })
                .unwrap();
        }
        let created = submit(&mut store, None, session.into_record())
            .unwrap()
            .affected[0]
            .clone();

        let summary = summarize(&created);
        assert_eq!(summary.key, "DYP");
        assert_eq!(summary.name, "DY Patil University");
        assert_eq!(summary.description, "Pune campus");
        assert_eq!(summary.accreditation_count, 2);
        assert_eq!(summary.course_count, 0);
        assert!(summary.has_logo);
        assert!(!summary.has_banner);
    }

    #[test]
    fn delete_refreshes_the_listing() {
        let mut store = MemoryStore::new();
        let created = submit(&mut store, None, dyp_form()).unwrap().affected[0].clone();

        let result = delete(&mut store, &created.id).unwrap();
        assert!(result.listed.is_empty());
    }
}

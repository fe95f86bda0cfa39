//! Comprehensive courses: the deepest composite entity. The form record
//! carries a `university_key`/`course_key` pair plus fifteen content sections,
//! and the persisted body nests every section under both keys with a
//! `_metadata` sibling for listing and lookup.
//!
//! Every section the form edits is persisted. Arrays of structured rows
//! (semesters, fee categories, faculty) are grown with the list operations in
//! [`crate::record`], so the blank row templates live here next to the seed.

use once_cell::sync::Lazy;
use serde_json::{json, Value};

use crate::commands::{refresh_listing, CmdMessage, CmdResult};
use crate::error::Result;
use crate::form::FormSession;
use crate::model::{Collection, DocumentId, StoredDocument};
use crate::record::Record;
use crate::store::{DocumentStore, Query};
use crate::submit::{self, METADATA_KEY};

const UNIVERSITY_KEY_FIELD: &str = "university_key";
const COURSE_KEY_FIELD: &str = "course_key";

static BLANK: Lazy<Record> = Lazy::new(|| {
    Record::from_value(json!({
        "university_key": "",
        "course_key": "",
        "page": {
            "title": "",
            "university": "",
            "description": "",
            "logo": "",
            "accreditations": [],
            "duration": {
                "length": "",
                "weeklyHours": "",
                "workExperience": "",
            },
            "fees": {
                "total": "",
                "perSemester": "",
                "emi": "",
                "additionalBenefits": "",
            },
            "courses": [],
        },
        "specializations": [],
        "accreditations": [],
        "programBenefits": [],
        "careerOpportunities": {
            "jobRoles": [],
            "industries": [],
        },
        "curriculum": {
            "duration": "",
            "structure": "",
            "weeklyCommitment": "",
            "credits": "",
            "semesters": [],
        },
        "additionalTools": {
            "title": "",
            "description": "",
            "categories": [],
        },
        "feeStructure": {
            "categories": [],
            "financialOptions": [],
        },
        "eligibility": {
            "domestic": {
                "educationalQualification": "",
                "grades": "",
                "aptitudeTest": "",
                "workExperience": "",
            },
            "international": {
                "educationalQualification": "",
                "grades": "",
                "aptitudeTest": "",
                "otherRequirements": "",
            },
        },
        "admissionProcess": [],
        "faculty": [],
        "placementAssistance": [],
        "faqs": [],
        "hiringPartners": [],
        "scholarships": {
            "regular_scholarships": [],
            "cuet_scholarship": { "levels": [] },
            "merit_scholarship": { "levels": [] },
            "sports_scholarship": { "levels": [] },
            "thakur_pratap_singh_memorial_scholarship": {
                "description": "",
                "eligibility": {
                    "indian_students": "",
                    "international_students": "",
                    "percentage_in_12th": "",
                },
            },
        },
        "bank_loan_assistance": {
            "description": "",
            "loan_partners": [],
        },
    }))
    .unwrap_or_default()
});

/// What the listing shows for one course document.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseSummary {
    pub id: DocumentId,
    pub university_key: String,
    pub course_key: String,
    pub title: String,
    pub university: String,
    pub description: String,
    pub duration: String,
    pub fees_total: String,
    pub program_count: usize,
    pub has_logo: bool,
    pub is_active: bool,
}

pub fn blank_record() -> Record {
    BLANK.clone()
}

pub fn new_form() -> FormSession {
    FormSession::create(blank_record())
}

/// Row template for `page.courses`.
pub fn blank_page_course() -> Value {
    json!({
        "name": "",
        "duration": "",
        "type": "",
        "fees": { "original": "", "discounted": "", "display": "" },
    })
}

/// Row template for `curriculum.semesters`.
pub fn blank_semester() -> Value {
    json!({ "number": "", "courses": [] })
}

/// Opens an editor over a persisted course. Documents written by this module
/// unwrap through their `_metadata` keys; older flat documents load their
/// top-level fields directly.
pub fn open(document: &StoredDocument) -> FormSession {
    let mut record = blank_record();
    match unwrap_sections(&document.data) {
        Some((university_key, course_key, sections)) => {
            for (field, value) in sections {
                record.insert(field.clone(), value.clone());
            }
            record.insert(UNIVERSITY_KEY_FIELD, json!(university_key));
            record.insert(COURSE_KEY_FIELD, json!(course_key));
        }
        None => {
            for (field, value) in document.data.as_map() {
                if field != METADATA_KEY {
                    record.insert(field.clone(), value.clone());
                }
            }
        }
    }
    FormSession::edit(document.id.clone(), record)
}

/// Persists a course form. Both keys must pass the lowercase-and-underscore
/// policy before anything reaches the store; the body then nests under
/// `university_key.course_key` with a `_metadata` sibling.
pub fn submit<S: DocumentStore>(
    store: &mut S,
    editing: Option<&DocumentId>,
    record: Record,
) -> Result<CmdResult> {
    let university_key = record.get_str(UNIVERSITY_KEY_FIELD).unwrap_or("").to_string();
    let course_key = record.get_str(COURSE_KEY_FIELD).unwrap_or("").to_string();
    submit::validate_entity_key("University key", &university_key)?;
    submit::validate_entity_key("Course key", &course_key)?;

    let title = page_str(&record, "title");
    let university = page_str(&record, "university");

    let mut body = record;
    body.remove(UNIVERSITY_KEY_FIELD);
    body.remove(COURSE_KEY_FIELD);
    let mut wrapped = submit::wrap_under_keys(&university_key, &course_key, body);
    wrapped.insert(
        METADATA_KEY,
        json!({
            "university_key": university_key,
            "course_key": course_key,
            "title": title,
            "university": university,
            "isActive": true,
        }),
    );

    let document = submit::persist(store, Collection::Courses, editing, wrapped)?;
    let action = if editing.is_some() { "updated" } else { "created" };
    let mut result = CmdResult::default().with_affected(vec![document]);
    result.add_message(CmdMessage::success(format!(
        "Course {}: {}/{}",
        action, university_key, course_key
    )));
    refresh_listing(store, Collection::Courses, &mut result);
    Ok(result)
}

pub fn list<S: DocumentStore>(store: &S) -> Result<CmdResult> {
    let documents = store.list(Collection::Courses, &Query::new())?;
    Ok(CmdResult::default().with_listed(documents))
}

pub fn get<S: DocumentStore>(store: &S, id: &DocumentId) -> Result<StoredDocument> {
    store.get(Collection::Courses, id)
}

pub fn delete<S: DocumentStore>(store: &mut S, id: &DocumentId) -> Result<CmdResult> {
    store.delete(Collection::Courses, id)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success("Course deleted"));
    refresh_listing(store, Collection::Courses, &mut result);
    Ok(result)
}

/// Flattens a persisted course into the fields the listing renders. Older
/// flat documents read their `page` section from the top level.
pub fn summarize(document: &StoredDocument) -> CourseSummary {
    let metadata = document.data.get(METADATA_KEY);
    let meta_str = |field: &str| {
        metadata
            .and_then(|m| m.get(field))
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string()
    };

    let page: Option<&Value> = match unwrap_sections(&document.data) {
        Some((_, _, sections)) => sections.get("page"),
        None => document.data.get("page"),
    };
    let page_field = |path: &[&str]| {
        let mut current = page;
        for segment in path {
            current = current.and_then(|v| v.get(segment));
        }
        current.and_then(Value::as_str).unwrap_or("").to_string()
    };

    CourseSummary {
        id: document.id.clone(),
        university_key: meta_str("university_key"),
        course_key: meta_str("course_key"),
        title: page_field(&["title"]),
        university: page_field(&["university"]),
        description: page_field(&["description"]),
        duration: page_field(&["duration", "length"]),
        fees_total: page_field(&["fees", "total"]),
        program_count: page
            .and_then(|p| p.get("courses"))
            .and_then(Value::as_array)
            .map(Vec::len)
            .unwrap_or(0),
        has_logo: !page_field(&["logo"]).is_empty(),
        is_active: metadata
            .and_then(|m| m.get("isActive"))
            .and_then(Value::as_bool)
            .unwrap_or(false),
    }
}

/// Follows `_metadata` to the doubly nested section map, when both keys are
/// present and the path they name actually exists.
fn unwrap_sections(data: &Record) -> Option<(&str, &str, &serde_json::Map<String, Value>)> {
    let metadata = data.get(METADATA_KEY)?;
    let university_key = metadata.get("university_key")?.as_str()?;
    let course_key = metadata.get("course_key")?.as_str()?;
    let sections = data.get(university_key)?.get(course_key)?.as_object()?;
    Some((university_key, course_key, sections))
}

fn page_str(record: &Record, field: &str) -> String {
    record
        .get("page")
        .and_then(|page| page.get(field))
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdminError;
    use crate::form::PatchOp;
    use crate::store::memory::MemoryStore;

    fn mba_form() -> Record {
        let mut session = new_form();
        for (path, value) in [
            ("university_key", json!("manipal_university")),
            ("course_key", json!("online_mba")),
            ("page.title", json!("Online MBA")),
            ("page.university", json!("Manipal University")),
            ("page.fees.total", json!("2,80,000")),
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
    fn submit_nests_under_both_keys_with_metadata() {
        let mut store = MemoryStore::new();
        let result = submit(&mut store, None, mba_form()).unwrap();
        let saved = &result.affected[0];

        assert_eq!(saved.data.len(), 2);
        let sections = saved
            .data
            .get("manipal_university")
            .and_then(|u| u.get("online_mba"))
            .unwrap();
        assert_eq!(sections["page"]["title"], json!("Online MBA"));
        assert!(sections.get("university_key").is_none());

        let metadata = saved.data.get("_metadata").unwrap();
        assert_eq!(metadata["university_key"], json!("manipal_university"));
        assert_eq!(metadata["course_key"], json!("online_mba"));
        assert_eq!(metadata["title"], json!("Online MBA"));
        assert_eq!(metadata["isActive"], json!(true));
    }

    #[test]
    fn submit_rejects_keys_outside_the_policy() {
        let mut store = MemoryStore::new();

        let mut record = mba_form();
        record.insert("university_key", json!("Manipal-University"));
        let err = submit(&mut store, None, record).unwrap_err();
        assert!(matches!(err, AdminError::Validation(_)));

        let mut record = mba_form();
        record.insert("course_key", json!(""));
        let err = submit(&mut store, None, record).unwrap_err();
        assert!(matches!(err, AdminError::Validation(_)));

        assert!(store
            .list(Collection::Courses, &Query::new())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn submit_keeps_every_form_section() {
        let mut store = MemoryStore::new();
        let mut session = FormSession::create(mba_form());
        session
            .apply(&PatchOp::Append {
                path: "specializations".parse().unwrap(),
                item: json!({ "name": "Finance", "icon": "", "link": "" }),
            })
            .unwrap();
        session
            .apply(&PatchOp::Append {
                path: "feeStructure.categories".parse().unwrap(),
                item: json!({
                    "name": "Indian", "fullCourseFee": "2,80,000",
                    "perSemester": "70,000", "emi": "", "note": "",
                }),
            })
            .unwrap();

        let result = submit(&mut store, None, session.into_record()).unwrap();
        let saved = &result.affected[0];
        let sections = saved
            .data
            .get("manipal_university")
            .and_then(|u| u.get("online_mba"))
            .unwrap();

        assert_eq!(sections["specializations"][0]["name"], json!("Finance"));
        assert_eq!(
            sections["feeStructure"]["categories"][0]["name"],
            json!("Indian")
        );
        assert_eq!(sections["faculty"], json!([]));
    }

    #[test]
    fn open_unwraps_through_the_metadata_keys() {
        let mut store = MemoryStore::new();
        let created = submit(&mut store, None, mba_form()).unwrap().affected[0].clone();

        let session = open(&created);
        assert!(session.is_editing());
        assert_eq!(
            session.record().get_str("university_key"),
            Some("manipal_university")
        );
        assert_eq!(session.record().get_str("course_key"), Some("online_mba"));
        assert_eq!(
            session.record().value_at(&"page.title".parse().unwrap()),
            Some(&json!("Online MBA"))
        );
        assert!(session.record().get("_metadata").is_none());
    }

    #[test]
    fn open_loads_flat_documents_directly() {
        let mut store = MemoryStore::new();
        let flat = Record::from_value(json!({
            "page": { "title": "Legacy BBA" },
            "specializations": [],
        }))
        .unwrap();
        let created = store.create(Collection::Courses, flat).unwrap();

        let session = open(&created);
        assert_eq!(
            session.record().value_at(&"page.title".parse().unwrap()),
            Some(&json!("Legacy BBA"))
        );
        assert_eq!(session.record().get_str("university_key"), Some(""));
    }

    #[test]
    fn summarize_reads_the_nested_page() {
        let mut store = MemoryStore::new();
        let mut session = FormSession::create(mba_form());
        for _ in 0..2 {
            session
                .apply(&PatchOp::Append {
                    path: "page.courses".parse().unwrap(),
                    item: blank_page_course(),
                })
                .unwrap();
        }
        let created = submit(&mut store, None, session.into_record())
            .unwrap()
            .affected[0]
            .clone();

        let summary = summarize(&created);
        assert_eq!(summary.title, "Online MBA");
        assert_eq!(summary.university, "Manipal University");
        assert_eq!(summary.fees_total, "2,80,000");
        assert_eq!(summary.program_count, 2);
        assert!(summary.is_active);
        assert!(!summary.has_logo);
    }

    #[test]
    fn page_courses_starts_empty_and_grows_by_template() {
        let mut session = new_form();
        assert_eq!(
            session.record().list_len(&"page.courses".parse().unwrap()),
            Some(0)
        );

        session
            .apply(&PatchOp::Append {
                path: "page.courses".parse().unwrap(),
                item: blank_page_course(),
            })
            .unwrap();
        session
            .apply(&PatchOp::UpdateItem {
                path: "page.courses".parse().unwrap(),
                index: 0,
                field: Some("name".to_string()),
                value: json!("MBA"),
            })
            .unwrap();

        assert_eq!(
            session.record().list_len(&"page.courses".parse().unwrap()),
            Some(1)
        );
        let courses = session
            .record()
            .value_at(&"page.courses".parse().unwrap())
            .unwrap();
        assert_eq!(courses[0]["name"], json!("MBA"));
        assert_eq!(courses[0]["fees"]["original"], json!(""));
    }

    #[test]
    fn semester_courses_grow_through_the_nested_list_ops() {
        let mut session = new_form();
        session
            .apply(&PatchOp::Append {
                path: "curriculum.semesters".parse().unwrap(),
                item: blank_semester(),
            })
            .unwrap();
        session
            .apply(&PatchOp::AppendNested {
                path: "curriculum.semesters".parse().unwrap(),
                index: 0,
                field: "courses".to_string(),
                item: json!("Managerial Economics"),
            })
            .unwrap();
        session
            .apply(&PatchOp::UpdateNested {
                path: "curriculum.semesters".parse().unwrap(),
                index: 0,
                field: "courses".to_string(),
                nested_index: 0,
                value: json!("Accounting"),
            })
            .unwrap();

        assert_eq!(
            session
                .record()
                .value_at(&"curriculum.semesters".parse().unwrap()),
            Some(&json!([{ "number": "", "courses": ["Accounting"] }]))
        );
    }
}

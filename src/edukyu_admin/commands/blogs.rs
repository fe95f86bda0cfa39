//! Blog posts: a flat entity with no wrapper key. The form record persists
//! as-is, apart from tags (comma-separated string in the form, string list in
//! the store) and the counters stamped onto new posts.

use once_cell::sync::Lazy;
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

use crate::commands::{refresh_listing, CmdMessage, CmdResult};
use crate::error::Result;
use crate::form::FormSession;
use crate::model::{Collection, DocumentId, StoredDocument};
use crate::record::Record;
use crate::store::{DocumentStore, Query};
use crate::submit;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlogStatus {
    Draft,
    Published,
    Archived,
}

impl BlogStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlogStatus::Draft => "draft",
            BlogStatus::Published => "published",
            BlogStatus::Archived => "archived",
        }
    }
}

impl FromStr for BlogStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "draft" => Ok(BlogStatus::Draft),
            "published" => Ok(BlogStatus::Published),
            "archived" => Ok(BlogStatus::Archived),
            other => Err(format!("Unknown blog status: '{}'", other)),
        }
    }
}

impl fmt::Display for BlogStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    CreatedAt,
    UpdatedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
}

/// Client-side refinement of the blog listing, applied after the store
/// returns the full collection.
#[derive(Debug, Clone, Default)]
pub struct BlogFilter {
    pub search: Option<String>,
    pub status: Option<BlogStatus>,
    pub category: Option<String>,
    pub sort_field: SortField,
    pub sort_order: SortOrder,
}

impl BlogFilter {
    fn matches(&self, document: &StoredDocument) -> bool {
        if let Some(term) = &self.search {
            let term = term.to_lowercase();
            let hit = ["title", "shortDescription", "category"].iter().any(|field| {
                document
                    .data
                    .get_str(field)
                    .map(|value| value.to_lowercase().contains(&term))
                    .unwrap_or(false)
            });
            if !hit {
                return false;
            }
        }
        if let Some(status) = self.status {
            if document.data.get_str("status") != Some(status.as_str()) {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if document.data.get_str("category") != Some(category.as_str()) {
                return false;
            }
        }
        true
    }
}

static BLANK: Lazy<Record> = Lazy::new(|| {
    Record::from_value(json!({
        "title": "",
        "shortDescription": "",
        "category": "",
        "content": "",
        "excerpt": "",
        "metaTitle": "",
        "metaDescription": "",
        "metaKeywords": "",
        "imageUrl": "",
        "featuredImage": "",
        "status": "draft",
        "sortOrder": 0,
        "shortUrl": "",
        "tags": "",
    }))
    .unwrap_or_default()
});

pub fn blank_record() -> Record {
    BLANK.clone()
}

pub fn new_form() -> FormSession {
    FormSession::create(blank_record())
}

/// Opens an editor over an existing post. Every persisted field carries over;
/// the tag list folds back into the form's comma-separated string.
pub fn open(document: &StoredDocument) -> FormSession {
    let mut record = blank_record();
    for (field, value) in document.data.as_map() {
        if field == "tags" {
            record.insert("tags", json!(join_tags(value)));
        } else {
            record.insert(field.clone(), value.clone());
        }
    }
    FormSession::edit(document.id.clone(), record)
}

/// Persists a blog form. New posts get a `draft` status when none was picked
/// and zeroed view/like counters; edits keep their counters.
pub fn submit<S: DocumentStore>(
    store: &mut S,
    editing: Option<&DocumentId>,
    record: Record,
) -> Result<CmdResult> {
    let title = submit::require_nonempty("Blog title", record.get_str("title").unwrap_or(""))?;

    let mut body = record;
    if let Some(raw) = body.get("tags").cloned() {
        body.insert("tags", split_tags(&raw));
    }
    if editing.is_none() {
        if body.get_str("status").unwrap_or("").is_empty() {
            body.insert("status", json!(BlogStatus::Draft.as_str()));
        }
        body.insert("views", json!(0));
        body.insert("likes", json!(0));
    }

    let document = submit::persist(store, Collection::Blogs, editing, body)?;
    let action = if editing.is_some() { "updated" } else { "created" };
    let mut result = CmdResult::default().with_affected(vec![document]);
    result.add_message(CmdMessage::success(format!("Blog {}: {}", action, title)));
    refresh_listing(store, Collection::Blogs, &mut result);
    Ok(result)
}

/// Store-truth listing refined by the filter: substring search over
/// title/short description/category, status and category narrowing, sortable
/// by either envelope timestamp in either direction.
pub fn list<S: DocumentStore>(store: &S, filter: &BlogFilter) -> Result<CmdResult> {
    let documents = store.list(Collection::Blogs, &Query::new())?;
    let mut matched: Vec<StoredDocument> = documents
        .into_iter()
        .filter(|doc| filter.matches(doc))
        .collect();

    matched.sort_by(|a, b| {
        let (a_key, b_key) = match filter.sort_field {
            SortField::CreatedAt => (a.created_at, b.created_at),
            SortField::UpdatedAt => (a.updated_at, b.updated_at),
        };
        match filter.sort_order {
            SortOrder::Newest => b_key.cmp(&a_key),
            SortOrder::Oldest => a_key.cmp(&b_key),
        }
    });

    Ok(CmdResult::default().with_listed(matched))
}

pub fn get<S: DocumentStore>(store: &S, id: &DocumentId) -> Result<StoredDocument> {
    store.get(Collection::Blogs, id)
}

/// Store-side status filter, newest first.
pub fn by_status<S: DocumentStore>(store: &S, status: BlogStatus) -> Result<CmdResult> {
    let documents = store.list(
        Collection::Blogs,
        &Query::new().where_eq("status", status.as_str()),
    )?;
    Ok(CmdResult::default().with_listed(documents))
}

/// Substring search across title, short description, category, and content.
pub fn search<S: DocumentStore>(store: &S, term: &str) -> Result<CmdResult> {
    let term = term.to_lowercase();
    let documents = store.list(Collection::Blogs, &Query::new())?;
    let matched = documents
        .into_iter()
        .filter(|doc| {
            let haystack = ["title", "shortDescription", "category", "content"]
                .iter()
                .filter_map(|field| doc.data.get_str(field))
                .collect::<Vec<_>>()
                .join(" ")
                .to_lowercase();
            haystack.contains(&term)
        })
        .collect();
    Ok(CmdResult::default().with_listed(matched))
}

pub fn delete<S: DocumentStore>(store: &mut S, id: &DocumentId) -> Result<CmdResult> {
    store.delete(Collection::Blogs, id)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success("Blog deleted"));
    refresh_listing(store, Collection::Blogs, &mut result);
    Ok(result)
}

/// Bulk delete: every delete is issued independently and failures do not stop
/// the rest. The outcome is reported once, and the refreshed listing shows
/// whatever remains.
pub fn delete_many<S: DocumentStore>(store: &mut S, ids: &[DocumentId]) -> Result<CmdResult> {
    let mut deleted = 0usize;
    let mut failed = 0usize;
    for id in ids {
        match store.delete(Collection::Blogs, id) {
            Ok(()) => deleted += 1,
            Err(err) => {
                failed += 1;
                log::error!("Failed to delete blog {}: {}", id, err);
            }
        }
    }

    let mut result = CmdResult::default();
    if failed > 0 {
        result.add_message(CmdMessage::error(format!(
            "{} of {} blogs could not be deleted",
            failed,
            ids.len()
        )));
    } else {
        result.add_message(CmdMessage::success(format!("{} blogs deleted", deleted)));
    }
    refresh_listing(store, Collection::Blogs, &mut result);
    Ok(result)
}

/// Read-side view counter, bumped by the public reader.
pub fn record_view<S: DocumentStore>(store: &mut S, id: &DocumentId) -> Result<()> {
    increment_counter(store, id, "views")
}

pub fn record_like<S: DocumentStore>(store: &mut S, id: &DocumentId) -> Result<()> {
    increment_counter(store, id, "likes")
}

fn increment_counter<S: DocumentStore>(
    store: &mut S,
    id: &DocumentId,
    field: &str,
) -> Result<()> {
    let document = store.get(Collection::Blogs, id)?;
    let current = document.data.get(field).and_then(Value::as_i64).unwrap_or(0);
    let mut body = document.data;
    body.insert(field, json!(current + 1));
    store.update(Collection::Blogs, id, body)?;
    Ok(())
}

fn split_tags(raw: &Value) -> Value {
    match raw {
        Value::String(s) => Value::Array(
            s.split(',')
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(|tag| json!(tag))
                .collect(),
        ),
        other => other.clone(),
    }
}

fn join_tags(value: &Value) -> String {
    match value {
        Value::Array(tags) => tags
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(", "),
        Value::String(s) => s.clone(),
        _ => String::new(),
    }
}

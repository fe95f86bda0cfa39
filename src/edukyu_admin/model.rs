use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::record::Record;

/// The document-store collections this crate manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Collection {
    Blogs,
    Colleges,
    Courses,
    Compare,
    Users,
    AdminUsers,
    MigratedUsers,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Blogs => "blogs",
            Collection::Colleges => "colleges",
            Collection::Courses => "courses",
            Collection::Compare => "compare",
            Collection::Users => "users",
            Collection::AdminUsers => "admin_users",
            Collection::MigratedUsers => "migrated_users",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Store-level document identity. Created documents get a random identity;
/// user-profile documents reuse the authentication provider's UID string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for DocumentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A persisted document: the record body plus the store-managed envelope.
/// `created_at` is set once at first creation and preserved on every later
/// write; `updated_at` is refreshed on every write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub id: DocumentId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub data: Record,
}

impl StoredDocument {
    pub fn new(data: Record) -> Self {
        Self::with_id(DocumentId::random(), data)
    }

    pub fn with_id(id: DocumentId, data: Record) -> Self {
        let now = Utc::now();
        Self {
            id,
            created_at: now,
            updated_at: now,
            data,
        }
    }
}

//! # Storage Layer
//!
//! This module defines the document-store abstraction the admin core writes
//! through. The [`DocumentStore`] trait allows the application to work with
//! different storage backends.
//!
//! ## Design Rationale
//!
//! Storage is abstracted behind a trait to:
//! - Enable **testing** with `MemoryStore` (no filesystem needed)
//! - Allow **future backends** (a hosted document database) without changing
//!   core logic
//! - Keep business logic **decoupled** from persistence details
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: Production file-based storage
//!   - One JSON file per collection (`blogs.json`, `colleges.json`, ...)
//!   - Each file holds an id-keyed map of documents
//!
//! - [`memory::MemoryStore`]: In-memory storage for testing
//!   - No persistence
//!   - Fast, isolated test execution
//!
//! ## Envelope Semantics
//!
//! Every document is a [`StoredDocument`]: the record body plus store-managed
//! identity and timestamps. `create` generates an identity and stamps both
//! timestamps; `put` takes a caller-supplied identity (user profiles reuse the
//! auth provider's UID) and behaves as create-or-replace; `update` replaces
//! the body of an existing document. In every case `created_at` is set once
//! and preserved, and `updated_at` is refreshed on each write.
//!
//! ## Listing
//!
//! `list` returns newest first (`created_at` descending, id as tie-break) and
//! accepts a [`Query`] carrying an optional top-level field equality filter
//! and an optional result limit.

use serde_json::Value;

use crate::error::Result;
use crate::model::{Collection, DocumentId, StoredDocument};
use crate::record::Record;

pub mod fs;
pub mod memory;

/// Listing constraints: an optional top-level field equality filter plus an
/// optional limit. Ordering is always newest first.
#[derive(Debug, Clone, Default)]
pub struct Query {
    filter: Option<(String, Value)>,
    limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn where_eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filter = Some((field.to_string(), value.into()));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, document: &StoredDocument) -> bool {
        match &self.filter {
            Some((field, expected)) => document.data.get(field) == Some(expected),
            None => true,
        }
    }

    pub fn max_results(&self) -> Option<usize> {
        self.limit
    }
}

/// Abstract interface for document storage.
///
/// Implementations must keep the envelope rules of the module documentation:
/// identity and timestamps are theirs to manage, never the caller's.
pub trait DocumentStore {
    /// Create a document with a store-generated identity
    fn create(&mut self, collection: Collection, record: Record) -> Result<StoredDocument>;

    /// Create or replace the document at a caller-supplied identity
    fn put(&mut self, collection: Collection, id: &DocumentId, record: Record)
        -> Result<StoredDocument>;

    /// Get a document by identity
    fn get(&self, collection: Collection, id: &DocumentId) -> Result<StoredDocument>;

    /// Replace the body of an existing document
    fn update(
        &mut self,
        collection: Collection,
        id: &DocumentId,
        record: Record,
    ) -> Result<StoredDocument>;

    /// Delete a document permanently
    fn delete(&mut self, collection: Collection, id: &DocumentId) -> Result<()>;

    /// List documents, newest first, constrained by `query`
    fn list(&self, collection: Collection, query: &Query) -> Result<Vec<StoredDocument>>;
}

/// Filter, order (newest first, id tie-break), and truncate a raw listing.
pub(crate) fn apply_query(mut documents: Vec<StoredDocument>, query: &Query) -> Vec<StoredDocument> {
    documents.retain(|doc| query.matches(doc));
    documents.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.as_str().cmp(a.id.as_str()))
    });
    if let Some(limit) = query.max_results() {
        documents.truncate(limit);
    }
    documents
}

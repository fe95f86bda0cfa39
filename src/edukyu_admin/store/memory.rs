use super::{apply_query, DocumentStore, Query};
use crate::error::{AdminError, Result};
use crate::model::{Collection, DocumentId, StoredDocument};
use crate::record::Record;
use chrono::Utc;
use std::collections::HashMap;

/// In-memory storage for testing and development.
/// Does NOT persist data.
#[derive(Default)]
pub struct MemoryStore {
    documents: HashMap<(Collection, DocumentId), StoredDocument>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for MemoryStore {
    fn create(&mut self, collection: Collection, record: Record) -> Result<StoredDocument> {
        let document = StoredDocument::new(record);
        self.documents
            .insert((collection, document.id.clone()), document.clone());
        Ok(document)
    }

    fn put(
        &mut self,
        collection: Collection,
        id: &DocumentId,
        record: Record,
    ) -> Result<StoredDocument> {
        match self.documents.get_mut(&(collection, id.clone())) {
            Some(existing) => {
                existing.data = record;
                existing.updated_at = Utc::now();
                Ok(existing.clone())
            }
            None => {
                let document = StoredDocument::with_id(id.clone(), record);
                self.documents
                    .insert((collection, id.clone()), document.clone());
                Ok(document)
            }
        }
    }

    fn get(&self, collection: Collection, id: &DocumentId) -> Result<StoredDocument> {
        self.documents
            .get(&(collection, id.clone()))
            .cloned()
            .ok_or_else(|| AdminError::DocumentNotFound(collection, id.clone()))
    }

    fn update(
        &mut self,
        collection: Collection,
        id: &DocumentId,
        record: Record,
    ) -> Result<StoredDocument> {
        let document = self
            .documents
            .get_mut(&(collection, id.clone()))
            .ok_or_else(|| AdminError::DocumentNotFound(collection, id.clone()))?;
        document.data = record;
        document.updated_at = Utc::now();
        Ok(document.clone())
    }

    fn delete(&mut self, collection: Collection, id: &DocumentId) -> Result<()> {
        if self.documents.remove(&(collection, id.clone())).is_none() {
            return Err(AdminError::DocumentNotFound(collection, id.clone()));
        }
        Ok(())
    }

    fn list(&self, collection: Collection, query: &Query) -> Result<Vec<StoredDocument>> {
        let documents = self
            .documents
            .iter()
            .filter(|((c, _), _)| *c == collection)
            .map(|(_, doc)| doc.clone())
            .collect();
        Ok(apply_query(documents, query))
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::auth::Role;
    use serde_json::json;

    pub struct StoreFixture {
        pub store: MemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: MemoryStore::new(),
            }
        }

        pub fn with_document(mut self, collection: Collection, record: Record) -> Self {
            self.store.create(collection, record).unwrap();
            self
        }

        pub fn with_blog(mut self, title: &str, status: &str, category: &str) -> Self {
            let record = Record::from_value(json!({
                "title": title,
                "shortDescription": format!("{} in short", title),
                "category": category,
                "content": format!("Content of {}", title),
                "status": status,
                "tags": [],
                "views": 0,
                "likes": 0,
            }))
            .unwrap();
            self.store.create(Collection::Blogs, record).unwrap();
            self
        }

        pub fn with_blogs(mut self, count: usize) -> Self {
            for i in 0..count {
                let record = Record::from_value(json!({
                    "title": format!("Blog {}", i + 1),
                    "status": "draft",
                    "views": 0,
                    "likes": 0,
                }))
                .unwrap();
                self.store.create(Collection::Blogs, record).unwrap();
            }
            self
        }

        pub fn with_user_profile(mut self, uid: &str, email: &str, role: Role) -> Self {
            let record = Record::from_value(json!({
                "email": email,
                "userIdentity": role.as_str(),
            }))
            .unwrap();
            self.store
                .put(Collection::Users, &DocumentId::from(uid), record)
                .unwrap();
            self
        }
    }
}

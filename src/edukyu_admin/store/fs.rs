use super::{apply_query, DocumentStore, Query};
use crate::error::{AdminError, Result};
use crate::model::{Collection, DocumentId, StoredDocument};
use crate::record::Record;
use chrono::Utc;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// File-backed document store: one JSON file per collection under a root
/// directory, each holding an id-keyed map of documents.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection_file(&self, collection: Collection) -> PathBuf {
        self.root.join(format!("{}.json", collection.as_str()))
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(AdminError::Io)?;
        }
        Ok(())
    }

    fn load(&self, collection: Collection) -> Result<HashMap<DocumentId, StoredDocument>> {
        let file = self.collection_file(collection);
        if !file.exists() {
            return Ok(HashMap::new());
        }
        let content = fs::read_to_string(file).map_err(AdminError::Io)?;
        let documents: HashMap<DocumentId, StoredDocument> =
            serde_json::from_str(&content).map_err(AdminError::Serialization)?;
        Ok(documents)
    }

    fn save(
        &self,
        collection: Collection,
        documents: &HashMap<DocumentId, StoredDocument>,
    ) -> Result<()> {
        self.ensure_dir()?;
        let content = serde_json::to_string_pretty(documents).map_err(AdminError::Serialization)?;
        fs::write(self.collection_file(collection), content).map_err(AdminError::Io)?;
        Ok(())
    }
}

impl DocumentStore for FileStore {
    fn create(&mut self, collection: Collection, record: Record) -> Result<StoredDocument> {
        let mut documents = self.load(collection)?;
        let document = StoredDocument::new(record);
        documents.insert(document.id.clone(), document.clone());
        self.save(collection, &documents)?;
        Ok(document)
    }

    fn put(
        &mut self,
        collection: Collection,
        id: &DocumentId,
        record: Record,
    ) -> Result<StoredDocument> {
        let mut documents = self.load(collection)?;
        let document = match documents.get(id) {
            Some(existing) => {
                let mut replaced = existing.clone();
                replaced.data = record;
                replaced.updated_at = Utc::now();
                replaced
            }
            None => StoredDocument::with_id(id.clone(), record),
        };
        documents.insert(id.clone(), document.clone());
        self.save(collection, &documents)?;
        Ok(document)
    }

    fn get(&self, collection: Collection, id: &DocumentId) -> Result<StoredDocument> {
        let documents = self.load(collection)?;
        documents
            .get(id)
            .cloned()
            .ok_or_else(|| AdminError::DocumentNotFound(collection, id.clone()))
    }

    fn update(
        &mut self,
        collection: Collection,
        id: &DocumentId,
        record: Record,
    ) -> Result<StoredDocument> {
        let mut documents = self.load(collection)?;
        let document = documents
            .get_mut(id)
            .ok_or_else(|| AdminError::DocumentNotFound(collection, id.clone()))?;
        document.data = record;
        document.updated_at = Utc::now();
        let document = document.clone();
        self.save(collection, &documents)?;
        Ok(document)
    }

    fn delete(&mut self, collection: Collection, id: &DocumentId) -> Result<()> {
        let mut documents = self.load(collection)?;
        if documents.remove(id).is_none() {
            return Err(AdminError::DocumentNotFound(collection, id.clone()));
        }
        self.save(collection, &documents)?;
        Ok(())
    }

    fn list(&self, collection: Collection, query: &Query) -> Result<Vec<StoredDocument>> {
        let documents = self.load(collection)?;
        Ok(apply_query(documents.into_values().collect(), query))
    }
}

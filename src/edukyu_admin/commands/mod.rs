use crate::model::{Collection, StoredDocument};
use crate::store::{DocumentStore, Query};

pub mod blogs;
pub mod colleges;
pub mod compare;
pub mod courses;
pub mod migration;
pub mod users;

#[derive(Debug, Clone)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected: Vec<StoredDocument>,
    pub listed: Vec<StoredDocument>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected(mut self, documents: Vec<StoredDocument>) -> Self {
        self.affected = documents;
        self
    }

    pub fn with_listed(mut self, documents: Vec<StoredDocument>) -> Self {
        self.listed = documents;
        self
    }
}

/// Re-fetches the full listing after a write so the caller always sees store
/// truth. The write already succeeded at this point, so a refresh failure is
/// logged and downgraded to a warning on the result.
pub(crate) fn refresh_listing<S: DocumentStore>(
    store: &S,
    collection: Collection,
    result: &mut CmdResult,
) {
    match store.list(collection, &Query::new()) {
        Ok(documents) => result.listed = documents,
        Err(err) => {
            log::error!("Listing refresh for {} failed: {}", collection, err);
            result.add_message(CmdMessage::warning(format!(
                "Could not refresh the {} list: {}",
                collection, err
            )));
        }
    }
}

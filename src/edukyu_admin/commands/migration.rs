//! One-off import of pre-auth-provider accounts into `migrated_users`.
//! Legacy rows carried plaintext passwords and integer identities; neither
//! survives the import. Passwords stay with the auth provider and identities
//! are normalized to the wire strings the rest of the system stores.

use chrono::Utc;
use serde_json::json;

use crate::auth::Role;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{AdminError, Result};
use crate::model::{Collection, DocumentId, StoredDocument};
use crate::record::Record;
use crate::store::{DocumentStore, Query};

/// One row of the legacy account table.
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyUser {
    pub id: String,
    pub email: String,
    pub identity: i64,
}

/// Imports legacy rows. Each row becomes a `migrated_users` document under its
/// original id; rows whose identity maps to no known role are logged, counted,
/// and skipped without stopping the run.
pub fn migrate_legacy_users<S: DocumentStore>(
    store: &mut S,
    legacy: &[LegacyUser],
) -> Result<CmdResult> {
    let mut failed = 0usize;
    let mut affected = Vec::new();
    for user in legacy {
        match migrate_one(store, user) {
            Ok(document) => affected.push(document),
            Err(err) => {
                failed += 1;
                log::error!("Could not migrate user {}: {}", user.id, err);
            }
        }
    }

    let migrated = affected.len();
    let mut result = CmdResult::default().with_affected(affected);
    result.add_message(CmdMessage::success(format!(
        "{} of {} users migrated",
        migrated,
        legacy.len()
    )));
    if failed > 0 {
        result.add_message(CmdMessage::error(format!(
            "{} users could not be migrated",
            failed
        )));
    }
    Ok(result)
}

fn migrate_one<S: DocumentStore>(store: &mut S, user: &LegacyUser) -> Result<StoredDocument> {
    let role = Role::from_value(&json!(user.identity)).ok_or_else(|| {
        AdminError::Validation(format!(
            "Unknown user identity {} for {}",
            user.identity, user.email
        ))
    })?;

    let mut record = Record::new();
    record.insert("originalId", json!(user.id));
    record.insert("email", json!(user.email));
    record.insert("userIdentity", json!(role.as_str()));
    record.insert("migratedAt", json!(Utc::now()));
    record.insert("status", json!("migrated"));

    store.put(
        Collection::MigratedUsers,
        &DocumentId::from(user.id.as_str()),
        record,
    )
}

/// Exact-match scan over migrated account emails.
pub fn find_migrated_by_email<S: DocumentStore>(
    store: &S,
    email: &str,
) -> Result<Option<StoredDocument>> {
    let documents = store.list(Collection::MigratedUsers, &Query::new())?;
    Ok(documents
        .into_iter()
        .find(|doc| doc.data.get_str("email") == Some(email)))
}

//! User profile directory. Credentials live with the external auth provider;
//! this module only manages the profile documents in `users` and their mirror
//! in `admin_users`, which carries the active flag the admin screens manage.

use chrono::Utc;
use serde_json::json;

use crate::auth::Role;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{Collection, DocumentId, StoredDocument};
use crate::record::Record;
use crate::store::{DocumentStore, Query};
use crate::submit;

/// Writes a fresh profile under the auth provider's uid and mirrors it to
/// `admin_users` with `isActive: true`.
pub fn register_profile<S: DocumentStore>(
    store: &mut S,
    uid: &str,
    email: &str,
    role: Role,
) -> Result<CmdResult> {
    let email = submit::require_nonempty("Email", email)?;
    let id = DocumentId::from(uid);

    let mut profile = Record::new();
    profile.insert("email", json!(email));
    profile.insert("userIdentity", json!(role.as_str()));
    let user_doc = store.put(Collection::Users, &id, profile.clone())?;

    profile.insert("isActive", json!(true));
    let admin_doc = store.put(Collection::AdminUsers, &id, profile)?;

    let mut result = CmdResult::default().with_affected(vec![user_doc, admin_doc]);
    result.add_message(CmdMessage::success(format!("User registered: {}", email)));
    Ok(result)
}

/// Merges the changed fields into both profile documents. Fields the change
/// set does not name (the mirror's active flag, login stamps) are preserved.
pub fn update_profile<S: DocumentStore>(
    store: &mut S,
    uid: &str,
    changes: &Record,
) -> Result<CmdResult> {
    let id = DocumentId::from(uid);
    let mut affected = Vec::new();
    for collection in [Collection::Users, Collection::AdminUsers] {
        let mut data = store.get(collection, &id)?.data;
        for (field, value) in changes.as_map() {
            data.insert(field.clone(), value.clone());
        }
        affected.push(store.update(collection, &id, data)?);
    }

    let mut result = CmdResult::default().with_affected(affected);
    result.add_message(CmdMessage::success("User profile updated"));
    Ok(result)
}

pub fn get<S: DocumentStore>(store: &S, uid: &str) -> Result<StoredDocument> {
    store.get(Collection::Users, &DocumentId::from(uid))
}

/// Profiles holding the given role, newest first.
pub fn by_role<S: DocumentStore>(store: &S, role: Role) -> Result<CmdResult> {
    let documents = store.list(
        Collection::Users,
        &Query::new().where_eq("userIdentity", role.as_str()),
    )?;
    Ok(CmdResult::default().with_listed(documents))
}

/// The `admin_users` directory, newest first, capped at `limit`.
pub fn admin_users<S: DocumentStore>(store: &S, limit: usize) -> Result<CmdResult> {
    let documents = store.list(Collection::AdminUsers, &Query::new().limit(limit))?;
    Ok(CmdResult::default().with_listed(documents))
}

/// Case-insensitive exact match over stored profile emails.
pub fn search_by_email<S: DocumentStore>(store: &S, email: &str) -> Result<CmdResult> {
    let documents = store.list(Collection::Users, &Query::new())?;
    let matched = documents
        .into_iter()
        .filter(|doc| {
            doc.data
                .get_str("email")
                .map(|stored| stored.eq_ignore_ascii_case(email))
                .unwrap_or(false)
        })
        .collect();
    Ok(CmdResult::default().with_listed(matched))
}

/// Best-effort login stamp on both profile documents. Login must not fail on
/// bookkeeping, so errors are logged and swallowed.
pub fn record_login<S: DocumentStore>(store: &mut S, uid: &str) {
    if let Err(err) = stamp_login(store, uid) {
        log::warn!("Could not record login for {}: {}", uid, err);
    }
}

fn stamp_login<S: DocumentStore>(store: &mut S, uid: &str) -> Result<()> {
    let id = DocumentId::from(uid);
    let stamp = json!(Utc::now());
    for collection in [Collection::Users, Collection::AdminUsers] {
        let mut data = store.get(collection, &id)?.data;
        data.insert("lastLogin", stamp.clone());
        store.update(collection, &id, data)?;
    }
    Ok(())
}

/// Marks the account inactive in both collections and stamps when.
pub fn deactivate<S: DocumentStore>(store: &mut S, uid: &str) -> Result<CmdResult> {
    let id = DocumentId::from(uid);
    let stamp = json!(Utc::now());
    let mut affected = Vec::new();
    for collection in [Collection::Users, Collection::AdminUsers] {
        let mut data = store.get(collection, &id)?.data;
        data.insert("isActive", json!(false));
        data.insert("deactivatedAt", stamp.clone());
        affected.push(store.update(collection, &id, data)?);
    }

    let mut result = CmdResult::default().with_affected(affected);
    result.add_message(CmdMessage::success("User deactivated"));
    Ok(result)
}

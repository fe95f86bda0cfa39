//! Role gating.
//!
//! Admin accounts carry exactly one role, stored on their profile document as
//! the wire value `"1"` (blog manager) or `"2"` (content manager). Every
//! section of the panel names the role it requires; access is pure equality
//! between the session's role and the required one.
//!
//! A page view moves through one state machine: `Loading` while the session
//! is still being built (no check is performed), then terminally `Denied` or
//! `Authorized`. Navigation or a role change re-evaluates from scratch.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::AdminError;
use crate::model::{Collection, DocumentId};
use crate::store::DocumentStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    BlogManager,
    ContentManager,
}

impl Role {
    /// The value stored on profile documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::BlogManager => "1",
            Role::ContentManager => "2",
        }
    }

    /// Reads a role from a stored profile field. Documents written before the
    /// migration carry the role as an integer.
    pub fn from_value(value: &Value) -> Option<Role> {
        match value {
            Value::String(s) => s.parse().ok(),
            Value::Number(n) => match n.as_i64() {
                Some(1) => Some(Role::BlogManager),
                Some(2) => Some(Role::ContentManager),
                _ => None,
            },
            _ => None,
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1" => Ok(Role::BlogManager),
            "2" => Ok(Role::ContentManager),
            other => Err(format!("Unknown role identifier: '{}'", other)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::BlogManager => f.write_str("blog manager"),
            Role::ContentManager => f.write_str("content manager"),
        }
    }
}

/// The admin panel's sections and the role each one requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Section {
    Dashboard,
    Blogs,
    Colleges,
    Courses,
    Compare,
}

impl Section {
    pub fn all() -> [Section; 5] {
        [
            Section::Dashboard,
            Section::Blogs,
            Section::Colleges,
            Section::Courses,
            Section::Compare,
        ]
    }

    pub fn required_role(&self) -> Option<Role> {
        match self {
            Section::Dashboard => None,
            Section::Blogs => Some(Role::BlogManager),
            Section::Colleges | Section::Courses | Section::Compare => Some(Role::ContentManager),
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Section::Dashboard => "dashboard",
            Section::Blogs => "blogs",
            Section::Colleges => "colleges",
            Section::Courses => "courses",
            Section::Compare => "compare",
        };
        f.write_str(name)
    }
}

/// Pure role comparison.
pub fn can_access(current: Role, required: Role) -> bool {
    current == required
}

/// The per-page gate state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessState {
    Loading,
    Denied,
    Authorized,
}

impl AccessState {
    /// Evaluates the gate for one section. `None` means the session is still
    /// being resolved, so no check happens yet.
    pub fn evaluate(session: Option<&Session>, section: Section) -> AccessState {
        let Some(session) = session else {
            return AccessState::Loading;
        };
        match section.required_role() {
            None => AccessState::Authorized,
            Some(required) => match session.role {
                Some(role) if can_access(role, required) => AccessState::Authorized,
                _ => AccessState::Denied,
            },
        }
    }
}

/// The signed-in user's identity and resolved role. Built once per sign-in
/// from the profile directory, passed explicitly to everything that gates,
/// and dropped on sign-out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: DocumentId,
    pub email: String,
    pub role: Option<Role>,
}

impl Session {
    pub fn new(user_id: DocumentId, email: impl Into<String>, role: Option<Role>) -> Self {
        Self {
            user_id,
            email: email.into(),
            role,
        }
    }

    /// Builds a session by looking the role up in the profile directory.
    pub fn resolve<S: DocumentStore>(
        store: &S,
        user_id: DocumentId,
        email: impl Into<String>,
    ) -> Session {
        let role = fetch_role(store, &user_id);
        Session::new(user_id, email, role)
    }

    /// The sections this session's sidebar shows: everything that requires no
    /// role, plus the sections requiring exactly this session's role.
    pub fn visible_sections(&self) -> Vec<Section> {
        Section::all()
            .into_iter()
            .filter(|section| match section.required_role() {
                None => true,
                Some(required) => self.role == Some(required),
            })
            .collect()
    }
}

/// Role lookup from the `users` collection. A missing profile or an
/// unreadable role field resolves to `None`; store failures are logged and
/// treated the same way, leaving every gated section denied.
pub fn fetch_role<S: DocumentStore>(store: &S, user_id: &DocumentId) -> Option<Role> {
    match store.get(Collection::Users, user_id) {
        Ok(document) => document.data.get("userIdentity").and_then(Role::from_value),
        Err(AdminError::DocumentNotFound(..)) => None,
        Err(err) => {
            log::error!("Role lookup failed for {}: {}", user_id, err);
            None
        }
    }
}

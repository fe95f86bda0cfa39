//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It is the single
//! entry point for every admin operation, regardless of the frontend embedding
//! it.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Gates** each section's operations on the caller's resolved role
//! - **Dispatches** to the appropriate command function
//! - **Returns structured types** (`Result<CmdResult>`, `FormSession`)
//!
//! ## What the API Does NOT Do
//!
//! The API explicitly avoids:
//! - **Business logic**: That belongs in `commands/*.rs`
//! - **Rendering concerns**: Returns data structures, not markup or strings
//!
//! ## Generic Over DocumentStore
//!
//! `AdminApi<S: DocumentStore>` is generic over the storage backend:
//! - Production: `AdminApi<FileStore>`
//! - Testing: `AdminApi<MemoryStore>`
//!
//! This enables testing the API layer without touching the filesystem.
//!
//! ## Access Control
//!
//! Blog, college, course, and compare methods take a [`Session`] and refuse
//! callers whose role does not match the section's required role. The user
//! directory and migration methods are not section-gated; they back the
//! account flows that run before any section renders. The public reader
//! counters (`record_blog_view`, `record_blog_like`) take no session at all.

use crate::auth::{AccessState, Role, Section, Session};
use crate::commands;
use crate::commands::blogs::{BlogFilter, BlogStatus};
use crate::commands::colleges::CollegeSummary;
use crate::commands::courses::CourseSummary;
use crate::commands::migration::LegacyUser;
use crate::config::{self, AdminConfig};
use crate::error::{AdminError, Result};
use crate::form::FormSession;
use crate::model::DocumentId;
use crate::record::Record;
use crate::store::fs::FileStore;
use crate::store::DocumentStore;

/// The main API facade for admin operations.
///
/// Generic over `DocumentStore` to allow different storage backends.
/// All frontends should interact through this API.
pub struct AdminApi<S: DocumentStore> {
    store: S,
    config: AdminConfig,
}

impl AdminApi<FileStore> {
    /// Production setup: file-backed store and config under [`config::data_dir`].
    pub fn open_default() -> Result<Self> {
        let dir = config::data_dir();
        let config = AdminConfig::load(&dir)?;
        Ok(Self::new(FileStore::new(dir), config))
    }
}

impl<S: DocumentStore> AdminApi<S> {
    pub fn new(store: S, config: AdminConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &AdminConfig {
        &self.config
    }

    /// The page-shell view of a section: `Loading` until a session resolves,
    /// then `Authorized` or `Denied`.
    pub fn access(&self, session: Option<&Session>, section: Section) -> AccessState {
        AccessState::evaluate(session, section)
    }

    /// Builds a session for an authenticated user by looking up their stored
    /// role.
    pub fn resolve_session(&self, uid: &str, email: &str) -> Session {
        Session::resolve(&self.store, DocumentId::from(uid), email)
    }

    fn authorize(&self, session: &Session, section: Section) -> Result<()> {
        let Some(required) = section.required_role() else {
            return Ok(());
        };
        match AccessState::evaluate(Some(session), section) {
            AccessState::Authorized => Ok(()),
            _ => Err(AdminError::AccessDenied(section, required)),
        }
    }

    // --- Blogs ---

    pub fn blogs(&self, session: &Session, filter: &BlogFilter) -> Result<commands::CmdResult> {
        self.authorize(session, Section::Blogs)?;
        commands::blogs::list(&self.store, filter)
    }

    pub fn search_blogs(&self, session: &Session, term: &str) -> Result<commands::CmdResult> {
        self.authorize(session, Section::Blogs)?;
        commands::blogs::search(&self.store, term)
    }

    pub fn blogs_by_status(
        &self,
        session: &Session,
        status: BlogStatus,
    ) -> Result<commands::CmdResult> {
        self.authorize(session, Section::Blogs)?;
        commands::blogs::by_status(&self.store, status)
    }

    pub fn new_blog_form(&self, session: &Session) -> Result<FormSession> {
        self.authorize(session, Section::Blogs)?;
        Ok(commands::blogs::new_form())
    }

    pub fn open_blog(&self, session: &Session, id: &DocumentId) -> Result<FormSession> {
        self.authorize(session, Section::Blogs)?;
        let document = commands::blogs::get(&self.store, id)?;
        Ok(commands::blogs::open(&document))
    }

    pub fn submit_blog(&mut self, session: &Session, form: FormSession) -> Result<commands::CmdResult> {
        self.authorize(session, Section::Blogs)?;
        let editing = form.editing().cloned();
        commands::blogs::submit(&mut self.store, editing.as_ref(), form.into_record())
    }

    pub fn delete_blog(&mut self, session: &Session, id: &DocumentId) -> Result<commands::CmdResult> {
        self.authorize(session, Section::Blogs)?;
        commands::blogs::delete(&mut self.store, id)
    }

    pub fn delete_blogs(
        &mut self,
        session: &Session,
        ids: &[DocumentId],
    ) -> Result<commands::CmdResult> {
        self.authorize(session, Section::Blogs)?;
        commands::blogs::delete_many(&mut self.store, ids)
    }

    /// Reader-side counters, not an admin operation.
    pub fn record_blog_view(&mut self, id: &DocumentId) -> Result<()> {
        commands::blogs::record_view(&mut self.store, id)
    }

    pub fn record_blog_like(&mut self, id: &DocumentId) -> Result<()> {
        commands::blogs::record_like(&mut self.store, id)
    }

    // --- Colleges ---

    pub fn colleges(&self, session: &Session) -> Result<commands::CmdResult> {
        self.authorize(session, Section::Colleges)?;
        commands::colleges::list(&self.store)
    }

    pub fn college_summaries(&self, session: &Session) -> Result<Vec<CollegeSummary>> {
        let listed = self.colleges(session)?.listed;
        Ok(listed.iter().map(commands::colleges::summarize).collect())
    }

    pub fn new_college_form(&self, session: &Session) -> Result<FormSession> {
        self.authorize(session, Section::Colleges)?;
        Ok(commands::colleges::new_form())
    }

    pub fn open_college(&self, session: &Session, id: &DocumentId) -> Result<FormSession> {
        self.authorize(session, Section::Colleges)?;
        let document = commands::colleges::get(&self.store, id)?;
        Ok(commands::colleges::open(&document))
    }

    pub fn submit_college(
        &mut self,
        session: &Session,
        form: FormSession,
    ) -> Result<commands::CmdResult> {
        self.authorize(session, Section::Colleges)?;
        let editing = form.editing().cloned();
        commands::colleges::submit(&mut self.store, editing.as_ref(), form.into_record())
    }

    pub fn delete_college(
        &mut self,
        session: &Session,
        id: &DocumentId,
    ) -> Result<commands::CmdResult> {
        self.authorize(session, Section::Colleges)?;
        commands::colleges::delete(&mut self.store, id)
    }

    // --- Courses ---

    pub fn courses(&self, session: &Session) -> Result<commands::CmdResult> {
        self.authorize(session, Section::Courses)?;
        commands::courses::list(&self.store)
    }

    pub fn course_summaries(&self, session: &Session) -> Result<Vec<CourseSummary>> {
        let listed = self.courses(session)?.listed;
        Ok(listed.iter().map(commands::courses::summarize).collect())
    }

    pub fn new_course_form(&self, session: &Session) -> Result<FormSession> {
        self.authorize(session, Section::Courses)?;
        Ok(commands::courses::new_form())
    }

    pub fn open_course(&self, session: &Session, id: &DocumentId) -> Result<FormSession> {
        self.authorize(session, Section::Courses)?;
        let document = commands::courses::get(&self.store, id)?;
        Ok(commands::courses::open(&document))
    }

    pub fn submit_course(
        &mut self,
        session: &Session,
        form: FormSession,
    ) -> Result<commands::CmdResult> {
        self.authorize(session, Section::Courses)?;
        let editing = form.editing().cloned();
        commands::courses::submit(&mut self.store, editing.as_ref(), form.into_record())
    }

    pub fn delete_course(
        &mut self,
        session: &Session,
        id: &DocumentId,
    ) -> Result<commands::CmdResult> {
        self.authorize(session, Section::Courses)?;
        commands::courses::delete(&mut self.store, id)
    }

    // --- Comparison datasets ---

    pub fn compare_entries(&self, session: &Session) -> Result<commands::CmdResult> {
        self.authorize(session, Section::Compare)?;
        commands::compare::list(&self.store)
    }

    pub fn new_compare_form(&self, session: &Session) -> Result<FormSession> {
        self.authorize(session, Section::Compare)?;
        Ok(commands::compare::new_form())
    }

    pub fn open_compare_entry(&self, session: &Session, id: &DocumentId) -> Result<FormSession> {
        self.authorize(session, Section::Compare)?;
        let document = commands::compare::get(&self.store, id)?;
        Ok(commands::compare::open(&document))
    }

    pub fn submit_compare_entry(
        &mut self,
        session: &Session,
        form: FormSession,
    ) -> Result<commands::CmdResult> {
        self.authorize(session, Section::Compare)?;
        let editing = form.editing().cloned();
        commands::compare::submit(&mut self.store, editing.as_ref(), form.into_record())
    }

    pub fn delete_compare_entry(
        &mut self,
        session: &Session,
        id: &DocumentId,
    ) -> Result<commands::CmdResult> {
        self.authorize(session, Section::Compare)?;
        commands::compare::delete(&mut self.store, id)
    }

    // --- User directory (account flows, not section-gated) ---

    pub fn register_user(&mut self, uid: &str, email: &str, role: Role) -> Result<commands::CmdResult> {
        commands::users::register_profile(&mut self.store, uid, email, role)
    }

    pub fn update_user(&mut self, uid: &str, changes: &Record) -> Result<commands::CmdResult> {
        commands::users::update_profile(&mut self.store, uid, changes)
    }

    pub fn users_by_role(&self, role: Role) -> Result<commands::CmdResult> {
        commands::users::by_role(&self.store, role)
    }

    pub fn admin_users(&self) -> Result<commands::CmdResult> {
        commands::users::admin_users(&self.store, self.config.admin_page_size)
    }

    pub fn search_users_by_email(&self, email: &str) -> Result<commands::CmdResult> {
        commands::users::search_by_email(&self.store, email)
    }

    pub fn record_login(&mut self, uid: &str) {
        commands::users::record_login(&mut self.store, uid)
    }

    pub fn deactivate_user(&mut self, uid: &str) -> Result<commands::CmdResult> {
        commands::users::deactivate(&mut self.store, uid)
    }

    pub fn migrate_legacy_users(&mut self, legacy: &[LegacyUser]) -> Result<commands::CmdResult> {
        commands::migration::migrate_legacy_users(&mut self.store, legacy)
    }
}

pub use crate::commands::blogs::{SortField, SortOrder};
pub use crate::commands::{CmdMessage, CmdResult, MessageLevel};

//! # EduKyu Admin Architecture
//!
//! This crate is a **frontend-agnostic admin core** for an education-content
//! platform. It is not a web application that happens to have some library
//! code, it's a library that web frontends embed.
//!
//! This distinction drives the entire architecture and should guide all
//! development.
//!
//! ## The Three-Layer Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Gates each section on the caller's resolved role         │
//! │  - Returns structured Result types                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - One module per managed entity                            │
//! │  - Blank seeds, submit validation, wrapping, listings       │
//! │  - No I/O assumptions whatsoever                            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - Abstract DocumentStore trait                             │
//! │  - FileStore (production), MemoryStore (testing)            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Records and Forms
//!
//! Every entity is an untyped nested [`record::Record`]. Editors mutate their
//! record through dot-separated [`path::FieldPath`]s and the list operations
//! in `record.rs`; a [`form::FormSession`] holds one record per open editor
//! and applies each operation atomically. See `record.rs` for the operation
//! semantics.
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward (API, commands, storage), code:
//! - Takes regular Rust function arguments
//! - Returns regular Rust types (`Result<CmdResult>`)
//! - **Never** renders markup or writes to stdout/stderr
//! - **Never** assumes a browser or terminal environment
//!
//! This means the same core can serve a server-rendered admin panel, a REST
//! API, or a desktop shell.
//!
//! ## Testing Strategy
//!
//! The architecture enables focused testing at each layer:
//!
//! 1. **Commands** (`commands/*.rs`): Thorough unit tests of business logic
//!    against `MemoryStore`. This is where the lion's share of testing lives.
//!
//! 2. **API** (`api.rs`): Dispatch tests verifying gating and return types,
//!    not the command logic itself.
//!
//! 3. **Store** (`store/`): Backend tests; `FileStore` runs against temp dirs.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each managed entity
//! - [`store`]: Storage abstraction and implementations
//! - [`record`]: Nested records and the path-addressed list operations
//! - [`path`]: Dot-separated field paths
//! - [`form`]: Per-editor form state
//! - [`submit`]: Shared submit validation and wrapping
//! - [`auth`]: Roles, sections, and access evaluation
//! - [`model`]: Core data types (`Collection`, `DocumentId`, `StoredDocument`)
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod api;
pub mod auth;
pub mod commands;
pub mod config;
pub mod error;
pub mod form;
pub mod model;
pub mod path;
pub mod record;
pub mod store;
pub mod submit;

#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Flag Scopes
//!
//! Paired boolean and timestamp flags for record models.
//!
//! ## Overview
//!
//! A flag is a column marking a record as being in one of two states:
//! active/inactive, published/unpublished, archived/unarchived. Every flag
//! family has the same shape:
//!
//! - a **default filter** applied when querying the model, hiding one state
//! - three **query modifiers** that widen, narrow or invert that filter
//! - a **set/unset mutation pair** for bulk writes
//! - **record helpers** for reading and toggling a single record
//! - an optional per-model **override hook** switching the default filter
//!
//! All families are instances of one engine configured by a
//! [`FlagDefinition`]; [`flag::families`] holds the built-in catalog.
//!
//! ## Module Organization
//!
//! - [`flag`] - Flag definitions, the family catalog and the scope engine
//! - [`query_builder`] - Scope-aware query representation and SQL rendering
//! - [`scopes`] - Chainable per-model query building
//! - [`store`] - Record storage: in-memory and PostgreSQL
//! - [`models`] - Records, column values and model descriptors
//! - [`registry`] - Registration of flagged model types
//! - [`events`] - Lifecycle events for single-record flag changes
//! - [`config`] - Configuration management
//! - [`error`] - Structured error handling
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust
//! use flag_scopes::flag::families;
//! use flag_scopes::models::ModelDescriptor;
//!
//! let post = ModelDescriptor::new("Post", "posts")
//!     .with_flag(families::get(families::PUBLISHED_AT).unwrap().clone())
//!     .with_hook("should_apply_published_at_scope", true);
//!
//! assert_eq!(
//!     post.scope().query().build_sql(),
//!     "SELECT * FROM posts WHERE published_at IS NOT NULL"
//! );
//! assert_eq!(
//!     post.scope().modify("only_not_published").unwrap().query().build_sql(),
//!     "SELECT * FROM posts WHERE published_at IS NULL"
//! );
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod flag;
pub mod logging;
pub mod models;
pub mod query_builder;
pub mod registry;
pub mod scopes;
pub mod store;
pub mod test_utils;

pub use config::{ConfigLoader, FlagsConfig, ModelConfig};
pub use error::{FlagError, Result};
pub use events::{EventPublisher, FlagEvent, FlagState};
pub use flag::{
    FlagDefinition, FlagOperation, FlagScope, FlagVerbs, OverrideHook, Polarity, Representation,
};
pub use models::{ColumnValue, ModelDescriptor, ModelMetadata, Record};
pub use query_builder::{Condition, RecordQuery};
pub use registry::ModelRegistry;
pub use scopes::{FlagMutation, ModelQuery, ScopeBuilder};
pub use store::{MemoryStore, RecordStore};

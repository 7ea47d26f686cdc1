//! # Flags
//!
//! Paired state flags on records, stored as a boolean column (`is_active`) or a
//! nullable timestamp (`published_at`).
//!
//! - [`definition`] - [`FlagDefinition`] and its derived predicates
//! - [`families`] - the built-in catalog
//! - [`scope`] - [`FlagScope`], the query/mutation engine
//! - [`helpers`] - single-record predicates and verbs
//! - [`operations`] - the named operation table
//!
//! ```rust
//! use flag_scopes::flag::{families, FlagScope};
//! use flag_scopes::models::ModelDescriptor;
//! use flag_scopes::query_builder::RecordQuery;
//!
//! let archived = families::get(families::ARCHIVED_AT).unwrap();
//! let model = ModelDescriptor::new("Post", "posts").with_flag(archived.clone());
//!
//! let scope = FlagScope::new(archived);
//! let query = scope.apply_default(RecordQuery::new("posts"), &model);
//! assert_eq!(query.build_sql(), "SELECT * FROM posts WHERE archived_at IS NULL");
//!
//! let query = scope.only_off(query);
//! assert_eq!(query.build_sql(), "SELECT * FROM posts WHERE archived_at IS NOT NULL");
//! ```

pub mod definition;
pub mod families;
pub mod helpers;
pub mod operations;
pub mod scope;

pub use definition::{FlagDefinition, FlagVerbs, OverrideHook, Polarity, Representation};
pub use operations::FlagOperation;
pub use scope::FlagScope;

//! # Query Scopes Module
//!
//! Query scopes for flagged models. Scopes enable chainable,
//! composable queries whose default flag filters are applied up front and can
//! be widened per flag.
//!
//! ## Usage Patterns
//!
//! ### Basic Filtering
//! ```rust,no_run
//! use flag_scopes::flag::families;
//! use flag_scopes::models::ModelDescriptor;
//! use flag_scopes::scopes::ScopeBuilder;
//! use flag_scopes::store::MemoryStore;
//! # async fn example(store: &MemoryStore) -> Result<(), Box<dyn std::error::Error>> {
//! let model = ModelDescriptor::new("Post", "posts")
//!     .with_flag(families::get(families::PUBLISHED_FLAG).unwrap().clone());
//!
//! // Published posts only
//! let visible = model.scope().all(store).await?;
//!
//! // Everything, drafts included
//! let everything = model.scope().modify("with_not_published")?.all(store).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ### Bulk Mutations
//! ```rust,no_run
//! use flag_scopes::flag::families;
//! use flag_scopes::models::ModelDescriptor;
//! use flag_scopes::store::MemoryStore;
//! # async fn example(store: &MemoryStore, model: &ModelDescriptor) -> Result<(), Box<dyn std::error::Error>> {
//! // Restore every archived post written by author 7
//! let restored = model
//!     .scope()
//!     .where_eq("author_id", 7_i64)
//!     .mutation("unarchive")?
//!     .execute(store)
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod common;
pub mod model;

pub use common::ScopeBuilder;
pub use model::{FlagMutation, ModelQuery};

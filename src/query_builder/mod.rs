//! # Query Builder
//!
//! Table-level query representation used by flag scopes.
//!
//! ## Key Components
//!
//! - [`builder`] - [`RecordQuery`] with scope-tagged WHERE clauses and SQL rendering
//! - [`conditions`] - [`Condition`], [`WhereClause`] and update [`Assignment`]s
//!
//! A `RecordQuery` is plain data. Stores either render it to SQL or evaluate it
//! directly against loaded records through [`RecordQuery::matches`].

pub mod builder;
pub mod conditions;

pub use builder::{Direction, RecordQuery};
pub use conditions::{Assignment, Condition, Operator, WhereClause};

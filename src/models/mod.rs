//! # Models
//!
//! Loaded records and the metadata describing flagged model types.

pub mod descriptor;
pub mod record;

pub use descriptor::{ModelDescriptor, ModelMetadata};
pub use record::{ColumnValue, Record, PRIMARY_KEY};

//! # Registry Infrastructure
//!
//! Registration of flagged model types.
//!
//! ## Usage
//!
//! ```rust
//! use flag_scopes::flag::families;
//! use flag_scopes::models::ModelDescriptor;
//! use flag_scopes::registry::ModelRegistry;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = ModelRegistry::new();
//! registry.register(
//!     ModelDescriptor::new("Ticket", "tickets")
//!         .with_flag(families::get(families::CLOSED_AT).unwrap().clone()),
//! )?;
//!
//! let ticket = registry.get("Ticket")?;
//! assert_eq!(ticket.scope().query().build_sql(), "SELECT * FROM tickets WHERE closed_at IS NULL");
//! # Ok(())
//! # }
//! ```

pub mod model_registry;

pub use model_registry::{ModelRegistry, RegistryStats};

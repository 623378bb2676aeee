//! Catalog module
//!
//! Typed access to the remote creature catalog.

pub mod client;
pub mod types;

pub use client::{Catalog, CatalogClient};
pub use types::CreatureRecord;

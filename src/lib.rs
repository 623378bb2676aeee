//! Pokedex Lookup Library
//!
//! Resolves free-text queries against the PokeAPI catalog and publishes the
//! results through an observable search state.
//! The command-line front end is in `src/main.rs`.

pub mod catalog;
pub mod config;
pub mod error;
pub mod orchestrator;
/// Observable search state shared with presentation layers
pub mod state;

pub use catalog::{Catalog, CatalogClient, CreatureRecord};
pub use config::Config;
pub use error::LookupError;
pub use orchestrator::{Orchestrator, SearchSummary};
pub use state::{SearchState, SharedSearchState, StateChange};

// State management module
// Search state observed by presentation layers

/// Search state, change notifications and the shared state hub
pub mod search_state;

pub use search_state::{SearchState, SharedSearchState, StateChange};

//! Client-side search state for gitss: what was searched, which facets are
//! shown, which page is displayed, and the undo/redo history of all of it.

mod action;
mod bridge;
mod config;
mod dispatch;
mod error;
mod history;
mod location;
pub mod merge;
mod state;
mod store;

pub use action::Action;
pub use action::ActionKind;
pub use action::RequestId;
pub use bridge::HistoryBridge;
pub use config::BackendConfig;
pub use config::GitssConfig;
pub use config::StoreConfig;
pub use dispatch::Dispatcher;
pub use dispatch::PendingSearch;
pub use dispatch::SearchOutcome;
pub use error::ConfigError;
pub use error::Result;
pub use history::DEFAULT_HISTORY_LIMIT;
pub use history::History;
pub use location::Listener;
pub use location::ListenerId;
pub use location::Location;
pub use location::MemoryHistory;
pub use location::Navigator;
pub use state::AppState;
pub use state::SearchFacets;
pub use state::reduce;
pub use store::DEFAULT_TRACKED_ACTIONS;
pub use store::StaleResponsePolicy;
pub use store::Store;
pub use store::StoreOptions;

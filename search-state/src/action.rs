use gitss_protocol::BaseFilterParams;
use gitss_protocol::BaseFilters;
use gitss_protocol::FilterParams;
use gitss_protocol::Indexed;
use gitss_protocol::SearchResult;
use serde::Deserialize;
use serde::Serialize;
use std::fmt;

/// Correlates a search response with the `SearchStart` that asked for it.
/// Ids increase monotonically within one store.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Every state transition the store understands. Serialized as
/// `{"type": "SEARCH_START", ...}`; a type that is not listed here decodes
/// as [`Action::Unknown`] and leaves the state untouched.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    ResetFacets,
    SearchStart {
        request: RequestId,
        base: BaseFilterParams,
        params: FilterParams,
    },
    Search {
        request: RequestId,
        result: SearchResult,
    },
    SearchFailed {
        request: RequestId,
        message: String,
    },
    ToggleSearchOptions,
    GetBaseFilters {
        filters: BaseFilters,
    },
    GetIndexedList {
        list: Vec<Indexed>,
    },
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    ResetFacets,
    SearchStart,
    Search,
    SearchFailed,
    ToggleSearchOptions,
    GetBaseFilters,
    GetIndexedList,
    Unknown,
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::ResetFacets => ActionKind::ResetFacets,
            Action::SearchStart { .. } => ActionKind::SearchStart,
            Action::Search { .. } => ActionKind::Search,
            Action::SearchFailed { .. } => ActionKind::SearchFailed,
            Action::ToggleSearchOptions => ActionKind::ToggleSearchOptions,
            Action::GetBaseFilters { .. } => ActionKind::GetBaseFilters,
            Action::GetIndexedList { .. } => ActionKind::GetIndexedList,
            Action::Unknown => ActionKind::Unknown,
        }
    }

    pub fn request(&self) -> Option<RequestId> {
        match self {
            Action::SearchStart { request, .. }
            | Action::Search { request, .. }
            | Action::SearchFailed { request, .. } => Some(*request),
            _ => None,
        }
    }
}

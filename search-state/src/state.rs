use crate::action::Action;
use crate::merge::merge_search_facets;
use gitss_protocol::BaseFilterOptions;
use gitss_protocol::BaseFilterParams;
use gitss_protocol::Facets;
use gitss_protocol::FilterParams;
use gitss_protocol::Indexed;
use gitss_protocol::OrganizationFacet;
use gitss_protocol::SearchResult;

/// Facets as currently displayed, which may hold terms from earlier responses.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchFacets {
    pub facets: Facets,
    pub full_refs_facet: Option<Vec<OrganizationFacet>>,
}

/// One snapshot of the search view.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppState {
    pub loading: bool,
    pub show_search_options: bool,
    pub search_base: BaseFilterParams,
    pub search_params: FilterParams,
    pub facets: SearchFacets,
    pub result: SearchResult,
    pub base_filter_options: BaseFilterOptions,
    pub indexed_list: Vec<Indexed>,
    /// Message of the last failed search, cleared by the next success.
    pub last_error: Option<String>,
}

/// Pure transition function. Request correlation is the store's job; here
/// every action is applied as given.
pub fn reduce(state: &AppState, action: &Action) -> AppState {
    let mut next = state.clone();
    match action {
        Action::ResetFacets => next.facets = SearchFacets::default(),
        Action::SearchStart { base, params, .. } => {
            next.loading = true;
            next.search_base = base.clone();
            next.search_params = params.clone();
        }
        Action::Search { result, .. } => {
            let mut result = result.clone();
            result.sort_previews();
            next.facets = merge_search_facets(&state.facets, &result);
            next.result = result;
            next.loading = false;
            next.last_error = None;
        }
        Action::SearchFailed { message, .. } => {
            next.loading = false;
            next.last_error = Some(message.clone());
        }
        Action::ToggleSearchOptions => next.show_search_options = !state.show_search_options,
        Action::GetBaseFilters { filters } => {
            next.base_filter_options = BaseFilterOptions::from(filters);
        }
        Action::GetIndexedList { list } => next.indexed_list = list.clone(),
        Action::Unknown => {}
    }
    next
}

use crate::action::Action;
use crate::action::RequestId;
use crate::location::Location;
use crate::location::Navigator;
use crate::state::AppState;
use crate::store::Store;
use gitss_backend_client::SearchBackend;
use gitss_protocol::BaseFilterParams;
use gitss_protocol::FacetKey;
use gitss_protocol::FilterParams;
use gitss_protocol::SearchResult;
use gitss_protocol::query;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The response is now displayed.
    Applied,
    /// The store dropped the response; a newer search superseded it.
    Stale,
    /// The request failed and the failure was recorded.
    Failed,
}

/// A search whose `SearchStart` has been dispatched and whose response is
/// still owed to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSearch {
    pub request: RequestId,
    /// Params sent to the backend: the user's filters narrowed by the path
    /// scope.
    pub params: FilterParams,
    pub page: u32,
}

/// User intents in, navigation and store actions out.
///
/// `trigger_*`, `toggle_facet_term`, `paginate` and `reset` only push a URL;
/// the search itself runs once a [`crate::HistoryBridge`] sees the location
/// change.
pub struct Dispatcher<B, N> {
    store: Store,
    backend: B,
    navigator: N,
}

impl<B: SearchBackend, N: Navigator> Dispatcher<B, N> {
    pub fn new(store: Store, backend: B, navigator: N) -> Self {
        Self {
            store,
            backend,
            navigator,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn state(&self) -> &AppState {
        self.store.state()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut N {
        &mut self.navigator
    }

    /// A brand-new query: facets from the previous query are dropped first.
    pub fn trigger_search(&mut self, base: &BaseFilterParams, query: &str) {
        self.store.dispatch(Action::ResetFacets);
        let params = FilterParams {
            query: Some(query.to_string()),
            page: Some(0),
            ..Default::default()
        };
        self.navigate(base, &params);
    }

    pub fn trigger_filter(
        &mut self,
        base: &BaseFilterParams,
        params: &FilterParams,
        query: &str,
        page: u32,
    ) {
        let params = FilterParams {
            query: Some(query.to_string()),
            page: Some(page),
            ..params.clone()
        };
        self.navigate(base, &params);
    }

    /// Flips `term` in the current filters and goes back to the first page.
    pub fn toggle_facet_term(&mut self, key: FacetKey, term: &str) {
        let state = self.store.state();
        let base = state.search_base.clone();
        let params = state.search_params.toggled(key, term);
        let query = params.query.clone().unwrap_or_default();
        self.trigger_filter(&base, &params, &query, 0);
    }

    pub fn paginate(&mut self, page: u32) {
        let state = self.store.state();
        let base = state.search_base.clone();
        let params = state.search_params.clone();
        let query = params.query.clone().unwrap_or_default();
        self.trigger_filter(&base, &params, &query, page);
    }

    /// Drops every facet filter of the current query.
    pub fn reset(&mut self) {
        let state = self.store.state();
        let base = state.search_base.clone();
        let params = state.search_params.without_facet_filters();
        let query = params.query.clone().unwrap_or_default();
        self.store.dispatch(Action::ResetFacets);
        self.trigger_filter(&base, &params, &query, 0);
    }

    pub fn toggle_search_options(&mut self) {
        self.store.dispatch(Action::ToggleSearchOptions);
    }

    pub fn undo(&mut self) -> bool {
        self.store.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.store.redo()
    }

    /// Runs one search end to end. `params` is recorded as the user's view;
    /// the backend receives it narrowed by `base`.
    pub async fn search(&mut self, base: BaseFilterParams, params: FilterParams) -> SearchOutcome {
        let pending = self.begin_search(base, params);
        let response = self.backend.search(&pending.params, pending.page).await;
        self.finish_search(pending, response)
    }

    pub fn begin_search(&mut self, base: BaseFilterParams, params: FilterParams) -> PendingSearch {
        let request = self.store.next_request_id();
        let pending = PendingSearch {
            request,
            params: params.scoped_to(&base),
            page: params.page.unwrap_or(0),
        };
        self.store.dispatch(Action::SearchStart {
            request,
            base,
            params,
        });
        pending
    }

    pub fn finish_search(
        &mut self,
        pending: PendingSearch,
        response: gitss_backend_client::Result<SearchResult>,
    ) -> SearchOutcome {
        let request = pending.request;
        let (action, outcome) = match response {
            Ok(result) => (Action::Search { request, result }, SearchOutcome::Applied),
            Err(err) => {
                tracing::warn!(%request, error = %err, "search request failed");
                let message = err.to_string();
                (
                    Action::SearchFailed { request, message },
                    SearchOutcome::Failed,
                )
            }
        };
        if self.store.dispatch(action) {
            outcome
        } else {
            SearchOutcome::Stale
        }
    }

    pub async fn load_base_filters(
        &mut self,
        scope: &BaseFilterParams,
    ) -> gitss_backend_client::Result<()> {
        let filters = self.backend.fetch_filters(scope).await.inspect_err(|err| {
            tracing::warn!(error = %err, "failed to load base filters");
        })?;
        self.store.dispatch(Action::GetBaseFilters { filters });
        Ok(())
    }

    pub async fn load_indexed_list(&mut self) -> gitss_backend_client::Result<()> {
        let list = self.backend.indexed().await.inspect_err(|err| {
            tracing::warn!(error = %err, "failed to load indexed list");
        })?;
        self.store.dispatch(Action::GetIndexedList { list });
        Ok(())
    }

    fn navigate(&mut self, base: &BaseFilterParams, params: &FilterParams) {
        let location = Location::new(query::build_base_filter_path(base), query::encode(params));
        tracing::info!(url = %location, "navigating");
        self.navigator.push(location);
    }
}

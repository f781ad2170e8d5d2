use async_trait::async_trait;
use gitss_backend_client::ClientError;
use gitss_backend_client::SearchBackend;
use gitss_protocol::BaseFilterParams;
use gitss_protocol::BaseFilters;
use gitss_protocol::Facet;
use gitss_protocol::Facets;
use gitss_protocol::FilterParams;
use gitss_protocol::Indexed;
use gitss_protocol::SearchResult;
use gitss_protocol::Term;
use gitss_search_state::Dispatcher;
use gitss_search_state::MemoryHistory;
use gitss_search_state::Store;
use gitss_search_state::StoreOptions;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Backend that answers searches from a script and records what it was asked.
#[derive(Default)]
pub struct ScriptedBackend {
    responses: Mutex<VecDeque<gitss_backend_client::Result<SearchResult>>>,
    calls: Mutex<Vec<(FilterParams, u32)>>,
    pub filters: BaseFilters,
    pub indexed: Vec<Indexed>,
}

impl ScriptedBackend {
    pub fn answering(responses: Vec<gitss_backend_client::Result<SearchResult>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<(FilterParams, u32)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchBackend for ScriptedBackend {
    async fn search(
        &self,
        params: &FilterParams,
        page: u32,
    ) -> gitss_backend_client::Result<SearchResult> {
        self.calls.lock().unwrap().push((params.clone(), page));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(SearchResult::default()))
    }

    async fn fetch_filters(
        &self,
        _scope: &BaseFilterParams,
    ) -> gitss_backend_client::Result<BaseFilters> {
        Ok(self.filters.clone())
    }

    async fn indexed(&self) -> gitss_backend_client::Result<Vec<Indexed>> {
        Ok(self.indexed.clone())
    }
}

pub fn dispatcher(backend: ScriptedBackend) -> Dispatcher<ScriptedBackend, MemoryHistory> {
    dispatcher_with(backend, StoreOptions::default())
}

pub fn dispatcher_with(
    backend: ScriptedBackend,
    options: StoreOptions,
) -> Dispatcher<ScriptedBackend, MemoryHistory> {
    Dispatcher::new(Store::new(options), backend, MemoryHistory::default())
}

pub fn ext_result(size: u64, terms: &[(&str, u64)]) -> SearchResult {
    let terms = terms
        .iter()
        .map(|(term, count)| Term::new(*term, *count))
        .collect();
    let mut facets = Facets::new();
    facets.insert("ext".to_string(), Facet::with_terms("ext", terms));
    SearchResult {
        time: 0.1,
        size,
        limit: 20,
        current: 0,
        next: 1,
        is_last_page: size <= 20,
        facets: Some(facets),
        ..Default::default()
    }
}

pub fn unavailable() -> ClientError {
    ClientError::Status {
        endpoint: "search",
        status: 503,
        body: "index is rebuilding".to_string(),
    }
}

pub fn ext_terms(result_facets: &Facets) -> Vec<(String, u64)> {
    result_facets["ext"]
        .terms
        .iter()
        .map(|term| (term.term.clone(), term.count))
        .collect()
}

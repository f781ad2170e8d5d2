use crate::action::Action;
use crate::action::ActionKind;
use crate::action::RequestId;
use crate::history::DEFAULT_HISTORY_LIMIT;
use crate::history::History;
use crate::state::AppState;
use crate::state::reduce;
use gitss_protocol::BaseFilterParams;
use gitss_protocol::FilterParams;
use serde::Deserialize;
use serde::Serialize;

pub const DEFAULT_TRACKED_ACTIONS: [ActionKind; 2] =
    [ActionKind::Search, ActionKind::ToggleSearchOptions];

/// Handling of a search response whose request is no longer the latest one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaleResponsePolicy {
    /// Whichever response arrives last is displayed.
    #[default]
    Apply,
    /// Only the response to the most recent search is displayed.
    Discard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    pub history_limit: usize,
    pub stale_responses: StaleResponsePolicy,
    pub tracked_actions: Vec<ActionKind>,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            stale_responses: StaleResponsePolicy::default(),
            tracked_actions: DEFAULT_TRACKED_ACTIONS.to_vec(),
        }
    }
}

/// A search that was started and has not been answered.
#[derive(Debug)]
struct PendingRequest {
    request: RequestId,
    base: BaseFilterParams,
    params: FilterParams,
}

/// Searches that were started and have not been answered. Lives outside the
/// snapshots so undo and redo cannot lose track of them.
#[derive(Debug, Default)]
struct RequestLedger {
    outstanding: Vec<PendingRequest>,
    latest: Option<RequestId>,
}

impl RequestLedger {
    fn start(&mut self, request: RequestId, base: &BaseFilterParams, params: &FilterParams) {
        self.outstanding.push(PendingRequest {
            request,
            base: base.clone(),
            params: params.clone(),
        });
        self.latest = Some(request);
    }

    /// Returns `None` when `request` was never started or already answered.
    fn finish(&mut self, request: RequestId) -> Option<PendingRequest> {
        let index = self
            .outstanding
            .iter()
            .position(|pending| pending.request == request)?;
        Some(self.outstanding.remove(index))
    }

    fn is_latest(&self, request: RequestId) -> bool {
        self.latest == Some(request)
    }

    fn in_flight(&self) -> bool {
        !self.outstanding.is_empty()
    }
}

/// Owns the snapshot history and applies actions to it.
#[derive(Debug)]
pub struct Store {
    history: History<AppState>,
    ledger: RequestLedger,
    tracked: Vec<ActionKind>,
    stale_responses: StaleResponsePolicy,
    next_request: u64,
}

impl Default for Store {
    fn default() -> Self {
        Self::new(StoreOptions::default())
    }
}

impl Store {
    pub fn new(options: StoreOptions) -> Self {
        Self::with_state(AppState::default(), options)
    }

    pub fn with_state(initial: AppState, options: StoreOptions) -> Self {
        Self {
            history: History::new(initial, options.history_limit),
            ledger: RequestLedger::default(),
            tracked: options.tracked_actions,
            stale_responses: options.stale_responses,
            next_request: 0,
        }
    }

    pub fn state(&self) -> &AppState {
        self.history.present()
    }

    pub fn history(&self) -> &History<AppState> {
        &self.history
    }

    pub fn next_request_id(&mut self) -> RequestId {
        self.next_request += 1;
        RequestId(self.next_request)
    }

    pub fn in_flight(&self) -> usize {
        self.ledger.outstanding.len()
    }

    /// Applies `action` and returns whether the state moved. Responses to a
    /// search that was never started (or already answered) are ignored, as
    /// are stale responses under [`StaleResponsePolicy::Discard`].
    ///
    /// An applied response is shown under the scope and params of the
    /// request that produced it, even if undo or redo moved `present` to a
    /// snapshot recorded for another query while it was in flight.
    pub fn dispatch(&mut self, action: Action) -> bool {
        let mut answered = None;
        match &action {
            Action::SearchStart {
                request,
                base,
                params,
            } => self.ledger.start(*request, base, params),
            Action::Search { request, .. } | Action::SearchFailed { request, .. } => {
                let request = *request;
                let latest = self.ledger.is_latest(request);
                let Some(pending) = self.ledger.finish(request) else {
                    tracing::debug!(%request, "ignoring response without an outstanding search");
                    return false;
                };
                if !latest && self.stale_responses == StaleResponsePolicy::Discard {
                    tracing::debug!(%request, "discarding stale search response");
                    return false;
                }
                answered = Some(pending);
            }
            Action::Unknown => return false,
            _ => {}
        }
        let mut next = reduce(self.history.present(), &action);
        if let Some(pending) = answered {
            next.search_base = pending.base;
            next.search_params = pending.params;
            next.loading = self.ledger.in_flight();
        }
        if self.tracked.contains(&action.kind()) {
            self.history.record(next);
        } else {
            self.history.replace(next);
        }
        true
    }

    pub fn undo(&mut self) -> bool {
        if !self.history.undo() {
            return false;
        }
        self.restamp_loading();
        true
    }

    pub fn redo(&mut self) -> bool {
        if !self.history.redo() {
            return false;
        }
        self.restamp_loading();
        true
    }

    /// A restored snapshot says nothing about requests in flight now.
    fn restamp_loading(&mut self) {
        let loading = self.ledger.in_flight();
        if self.history.present().loading != loading {
            let mut state = self.history.present().clone();
            state.loading = loading;
            self.history.replace(state);
        }
    }
}

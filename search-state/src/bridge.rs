use crate::dispatch::Dispatcher;
use crate::dispatch::SearchOutcome;
use crate::location::Listener;
use crate::location::Location;
use crate::location::Navigator;
use gitss_backend_client::SearchBackend;
use gitss_protocol::BaseFilterParams;
use gitss_protocol::FilterParams;
use gitss_protocol::query;

/// Turns navigator location changes into searches.
///
/// Holds exactly one listener between `mount` and `unmount`, so a location
/// change never triggers more than one search.
#[derive(Debug)]
pub struct HistoryBridge {
    listener: Listener,
}

impl HistoryBridge {
    pub fn mount<N: Navigator>(navigator: &mut N) -> Self {
        Self {
            listener: navigator.listen(),
        }
    }

    pub fn unmount<N: Navigator>(self, navigator: &mut N) {
        if !navigator.unlisten(self.listener.id) {
            tracing::debug!("history bridge listener was already gone");
        }
    }

    /// Search inputs for `location`, if it is a search view with a non-blank
    /// query.
    pub fn translate(location: &Location) -> Option<(BaseFilterParams, FilterParams)> {
        let base = query::parse_base_filter_path(&location.path)?;
        let params = match query::decode(&location.query) {
            Ok(params) => params,
            Err(err) => {
                tracing::debug!(url = %location, error = %err, "ignoring undecodable location");
                return None;
            }
        };
        let has_query = params
            .query
            .as_deref()
            .is_some_and(|query| !query.trim().is_empty());
        has_query.then_some((base, params))
    }

    /// Runs one search per pending location change that translates.
    pub async fn pump<B, N>(&mut self, dispatcher: &mut Dispatcher<B, N>) -> Vec<SearchOutcome>
    where
        B: SearchBackend,
        N: Navigator,
    {
        let mut outcomes = Vec::new();
        while let Ok(location) = self.listener.rx.try_recv() {
            let Some((base, params)) = Self::translate(&location) else {
                continue;
            };
            outcomes.push(dispatcher.search(base, params).await);
        }
        outcomes
    }
}

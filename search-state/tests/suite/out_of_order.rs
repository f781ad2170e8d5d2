use crate::suite::support::ScriptedBackend;
use crate::suite::support::dispatcher;
use crate::suite::support::dispatcher_with;
use crate::suite::support::ext_result;
use crate::suite::support::unavailable;
use gitss_protocol::BaseFilterParams;
use gitss_protocol::FilterParams;
use gitss_search_state::HistoryBridge;
use gitss_search_state::SearchOutcome;
use gitss_search_state::StaleResponsePolicy;
use gitss_search_state::StoreOptions;
use pretty_assertions::assert_eq;

fn discard() -> StoreOptions {
    StoreOptions {
        stale_responses: StaleResponsePolicy::Discard,
        ..Default::default()
    }
}

// Slow first request, fast second one: the first answer arrives last.
#[test]
fn apply_policy_lets_the_last_response_win() {
    let mut dispatcher = dispatcher(ScriptedBackend::default());
    let old = dispatcher.begin_search(BaseFilterParams::default(), FilterParams::with_query("old"));
    let new = dispatcher.begin_search(BaseFilterParams::default(), FilterParams::with_query("new"));
    assert_eq!(dispatcher.store().in_flight(), 2);

    assert_eq!(
        dispatcher.finish_search(new, Ok(ext_result(2, &[(".rs", 2)]))),
        SearchOutcome::Applied
    );
    assert_eq!(
        dispatcher.finish_search(old, Ok(ext_result(1, &[(".go", 1)]))),
        SearchOutcome::Applied
    );
    // Known regression: the older answer is what ends up on screen, shown
    // under the query that produced it.
    assert_eq!(dispatcher.state().result.size, 1);
    assert_eq!(
        dispatcher.state().search_params.query.as_deref(),
        Some("old")
    );
    assert!(!dispatcher.state().loading);
}

#[test]
fn discard_policy_drops_the_stale_response() {
    let mut dispatcher = dispatcher_with(ScriptedBackend::default(), discard());
    let old = dispatcher.begin_search(BaseFilterParams::default(), FilterParams::with_query("old"));
    let new = dispatcher.begin_search(BaseFilterParams::default(), FilterParams::with_query("new"));

    assert_eq!(
        dispatcher.finish_search(new, Ok(ext_result(2, &[(".rs", 2)]))),
        SearchOutcome::Applied
    );
    assert_eq!(
        dispatcher.finish_search(old, Ok(ext_result(1, &[(".go", 1)]))),
        SearchOutcome::Stale
    );
    assert_eq!(dispatcher.state().result.size, 2);
    assert!(!dispatcher.state().facets.facets["ext"].terms.iter().any(|t| t.term == ".go"));
    assert_eq!(dispatcher.store().in_flight(), 0);
}

#[test]
fn discard_policy_keeps_loading_until_latest_answers() {
    let mut dispatcher = dispatcher_with(ScriptedBackend::default(), discard());
    let old = dispatcher.begin_search(BaseFilterParams::default(), FilterParams::with_query("old"));
    let new = dispatcher.begin_search(BaseFilterParams::default(), FilterParams::with_query("new"));

    assert_eq!(
        dispatcher.finish_search(old, Err(unavailable())),
        SearchOutcome::Stale
    );
    assert!(dispatcher.state().loading);
    assert_eq!(dispatcher.state().last_error, None);

    dispatcher.finish_search(new, Ok(ext_result(4, &[])));
    assert!(!dispatcher.state().loading);
}

#[tokio::test]
async fn failed_search_clears_loading_and_keeps_result() {
    let backend = ScriptedBackend::answering(vec![
        Ok(ext_result(42, &[(".go", 10)])),
        Err(unavailable()),
    ]);
    let mut dispatcher = dispatcher(backend);
    let mut bridge = HistoryBridge::mount(dispatcher.navigator_mut());

    dispatcher.trigger_search(&BaseFilterParams::default(), "main");
    bridge.pump(&mut dispatcher).await;
    let shown = dispatcher.state().result.clone();

    dispatcher.paginate(1);
    assert_eq!(bridge.pump(&mut dispatcher).await, vec![SearchOutcome::Failed]);
    let state = dispatcher.state();
    assert!(!state.loading);
    assert_eq!(state.result, shown);
    let message = state.last_error.as_deref().unwrap();
    assert!(message.contains("503"), "{message}");
}

//! Reconciles the facets of a fresh response with the ones already shown.
//!
//! Terms the new response no longer mentions keep their last known count, so
//! narrowing a filter never makes the alternatives disappear from the panel.
//! A distinct query starts from empty facets (see `Action::ResetFacets`), in
//! which case the merge is a plain replacement.

use crate::state::SearchFacets;
use gitss_protocol::Facet;
use gitss_protocol::Facets;
use gitss_protocol::SearchResult;
use gitss_protocol::Term;
use indexmap::IndexMap;

/// Union of both facet maps. Keys only present in one side are kept as-is.
pub fn merge_facets(previous: &Facets, next: &Facets) -> Facets {
    let mut merged = previous.clone();
    for (name, facet) in next {
        let facet = match previous.get(name) {
            Some(old) => merge_facet(old, facet),
            None => facet.clone(),
        };
        merged.insert(name.clone(), facet);
    }
    merged
}

/// Term union keyed by `term`: previous order first, new terms appended in
/// response order, counts from `next` where present. Summary fields come
/// from `next`.
pub fn merge_facet(previous: &Facet, next: &Facet) -> Facet {
    let mut counts: IndexMap<&str, u64> = previous
        .terms
        .iter()
        .map(|term| (term.term.as_str(), term.count))
        .collect();
    for term in &next.terms {
        counts.insert(term.term.as_str(), term.count);
    }
    Facet {
        field: next.field.clone(),
        missing: next.missing,
        other: next.other,
        total: next.total,
        terms: counts
            .into_iter()
            .map(|(term, count)| Term::new(term, count))
            .collect(),
    }
}

/// Applies a response to the displayed facets. The full-refs tree is always
/// taken from the response.
pub fn merge_search_facets(previous: &SearchFacets, result: &SearchResult) -> SearchFacets {
    let facets = match &result.facets {
        Some(next) => merge_facets(&previous.facets, next),
        None => previous.facets.clone(),
    };
    SearchFacets {
        facets,
        full_refs_facet: result.full_refs_facet.clone(),
    }
}

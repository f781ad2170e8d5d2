//! Wire types and URL encoding shared by the gitss search client and the
//! client-side search state.

pub mod error;
pub mod facets;
pub mod filter;
pub mod query;
pub mod search;

pub use error::BaseFilterError;
pub use error::QueryError;
pub use facets::Facet;
pub use facets::Facets;
pub use facets::OrganizationFacet;
pub use facets::Term;
pub use filter::AdvancedSearch;
pub use filter::BaseFilterParams;
pub use filter::FacetKey;
pub use filter::FilterParams;
pub use filter::NO_EXTENSION_TERM;
pub use search::BaseFilterOptions;
pub use search::BaseFilters;
pub use search::Hit;
pub use search::Indexed;
pub use search::IndexedList;
pub use search::Preview;
pub use search::SearchResult;
pub use search::SelectOption;
pub use search::VersionInfo;

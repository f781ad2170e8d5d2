use crate::facets::Facets;
use crate::facets::OrganizationFacet;
use crate::facets::deserialize_full_refs;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;

/// One page of hits as returned by `GET /api/v1/search`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchResult {
    pub time: f64,
    pub size: u64,
    pub limit: u32,
    pub current: u32,
    pub next: u32,
    pub is_last_page: bool,
    pub hits: Vec<Hit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facets: Option<Facets>,
    #[serde(
        deserialize_with = "deserialize_full_refs",
        skip_serializing_if = "Option::is_none"
    )]
    pub full_refs_facet: Option<Vec<OrganizationFacet>>,
}

impl Default for SearchResult {
    fn default() -> Self {
        Self {
            time: -1.0,
            size: 0,
            limit: 0,
            current: 0,
            next: 0,
            is_last_page: true,
            hits: Vec::new(),
            facets: None,
            full_refs_facet: None,
        }
    }
}

impl SearchResult {
    pub fn page_count(&self) -> u64 {
        if self.limit == 0 {
            return 0;
        }
        self.size.div_ceil(u64::from(self.limit))
    }

    /// Whether `current`, `limit`, `size` and `is_last_page` agree with each
    /// other.
    pub fn pagination_is_consistent(&self) -> bool {
        if self.size == 0 {
            return self.is_last_page;
        }
        if self.limit == 0 {
            return false;
        }
        let current = u64::from(self.current);
        let limit = u64::from(self.limit);
        let in_range = current * limit <= self.size && current < self.page_count();
        let last = (current + 1) * limit >= self.size;
        in_range && last == self.is_last_page
    }

    /// Orders every hit's previews by ascending line offset.
    pub fn sort_previews(&mut self) {
        for hit in &mut self.hits {
            hit.preview.sort_by_key(|preview| preview.offset);
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Hit {
    pub blob: String,
    pub organization: String,
    pub project: String,
    pub repository: String,
    pub branches: Vec<String>,
    pub tags: Vec<String>,
    pub path: String,
    pub ext: String,
    pub keyword: Vec<String>,
    pub preview: Vec<Preview>,
}

/// Snippet of a file starting at line `offset`; `hits` are line indices
/// relative to that offset.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Preview {
    pub offset: u32,
    pub preview: String,
    pub hits: Vec<u32>,
}

impl Preview {
    pub fn matched_lines(&self) -> impl Iterator<Item = u32> + '_ {
        self.hits.iter().map(|hit| self.offset.saturating_add(*hit))
    }
}

/// Raw `GET /api/v1/filters[/...]` response.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BaseFilters {
    pub organizations: Vec<String>,
    pub projects: Vec<String>,
    pub repositories: Vec<String>,
    pub branches: Vec<String>,
    pub tags: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

impl From<&str> for SelectOption {
    fn from(value: &str) -> Self {
        Self {
            label: value.to_string(),
            value: value.to_string(),
        }
    }
}

/// Base filter drop-down contents.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BaseFilterOptions {
    pub organizations: Vec<SelectOption>,
    pub projects: Vec<SelectOption>,
    pub repositories: Vec<SelectOption>,
    pub branches: Vec<SelectOption>,
    pub tags: Vec<SelectOption>,
}

impl From<&BaseFilters> for BaseFilterOptions {
    fn from(filters: &BaseFilters) -> Self {
        fn options(values: &[String]) -> Vec<SelectOption> {
            values.iter().map(|value| SelectOption::from(value.as_str())).collect()
        }
        Self {
            organizations: options(&filters.organizations),
            projects: options(&filters.projects),
            repositories: options(&filters.repositories),
            branches: options(&filters.branches),
            tags: options(&filters.tags),
        }
    }
}

/// Indexing status of one repository; refs map to their indexed commit.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Indexed {
    pub last_updated: String,
    pub organization: String,
    pub project: String,
    pub repository: String,
    pub branches: BTreeMap<String, String>,
    pub tags: BTreeMap<String, String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct IndexedList {
    pub result: Vec<Indexed>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct VersionInfo {
    pub version: String,
    pub commit_hash: String,
}

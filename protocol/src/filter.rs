use crate::error::BaseFilterError;
use serde::Deserialize;
use serde::Serialize;
use std::fmt;

/// Sentinel term the backend uses for files without an extension.
pub const NO_EXTENSION_TERM: &str = "/noext/";

/// Multi-valued filter keys. Each one doubles as a facet in search responses.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum FacetKey {
    Ext,
    Organization,
    Project,
    Repository,
    Branches,
    Tags,
}

impl FacetKey {
    pub const ALL: [FacetKey; 6] = [
        FacetKey::Ext,
        FacetKey::Organization,
        FacetKey::Project,
        FacetKey::Repository,
        FacetKey::Branches,
        FacetKey::Tags,
    ];

    /// Single-character key used in URLs and backend query strings.
    pub fn param(self) -> &'static str {
        match self {
            FacetKey::Ext => "x",
            FacetKey::Organization => "o",
            FacetKey::Project => "p",
            FacetKey::Repository => "r",
            FacetKey::Branches => "b",
            FacetKey::Tags => "t",
        }
    }

    /// Name of the facet inside a search response.
    pub fn facet_name(self) -> &'static str {
        match self {
            FacetKey::Ext => "ext",
            FacetKey::Organization => "organization",
            FacetKey::Project => "project",
            FacetKey::Repository => "repository",
            FacetKey::Branches => "branches",
            FacetKey::Tags => "tags",
        }
    }

    pub fn from_param(param: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.param() == param)
    }
}

impl fmt::Display for FacetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.facet_name())
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AdvancedSearch {
    Regex,
}

impl AdvancedSearch {
    pub fn as_str(self) -> &'static str {
        match self {
            AdvancedSearch::Regex => "regex",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "regex" => Some(AdvancedSearch::Regex),
            _ => None,
        }
    }
}

/// User-selected constraints for one search.
///
/// `None` means "no filter on that facet". An empty vector queries the same
/// as `None` (it is never encoded) but is kept apart so a panel that had every
/// term deselected can still be told from one that was never touched.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FilterParams {
    #[serde(rename = "q", skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(rename = "i", skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(rename = "a", skip_serializing_if = "Option::is_none")]
    pub advanced: Option<AdvancedSearch>,
    #[serde(rename = "x", skip_serializing_if = "Option::is_none")]
    pub ext: Option<Vec<String>>,
    #[serde(rename = "o", skip_serializing_if = "Option::is_none")]
    pub organization: Option<Vec<String>>,
    #[serde(rename = "p", skip_serializing_if = "Option::is_none")]
    pub project: Option<Vec<String>>,
    #[serde(rename = "r", skip_serializing_if = "Option::is_none")]
    pub repository: Option<Vec<String>>,
    #[serde(rename = "b", skip_serializing_if = "Option::is_none")]
    pub branches: Option<Vec<String>>,
    #[serde(rename = "t", skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl FilterParams {
    pub fn with_query(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Default::default()
        }
    }

    pub fn values(&self, key: FacetKey) -> Option<&Vec<String>> {
        match key {
            FacetKey::Ext => self.ext.as_ref(),
            FacetKey::Organization => self.organization.as_ref(),
            FacetKey::Project => self.project.as_ref(),
            FacetKey::Repository => self.repository.as_ref(),
            FacetKey::Branches => self.branches.as_ref(),
            FacetKey::Tags => self.tags.as_ref(),
        }
    }

    fn slot_mut(&mut self, key: FacetKey) -> &mut Option<Vec<String>> {
        match key {
            FacetKey::Ext => &mut self.ext,
            FacetKey::Organization => &mut self.organization,
            FacetKey::Project => &mut self.project,
            FacetKey::Repository => &mut self.repository,
            FacetKey::Branches => &mut self.branches,
            FacetKey::Tags => &mut self.tags,
        }
    }

    pub fn set_values(&mut self, key: FacetKey, values: Option<Vec<String>>) {
        *self.slot_mut(key) = values;
    }

    pub fn push_value(&mut self, key: FacetKey, value: impl Into<String>) {
        self.slot_mut(key).get_or_insert_with(Vec::new).push(value.into());
    }

    pub fn is_selected(&self, key: FacetKey, term: &str) -> bool {
        self.values(key)
            .is_some_and(|values| values.iter().any(|value| value == term))
    }

    /// Returns a copy with `term` removed from `key` if selected, appended
    /// otherwise. Removing the last term leaves an empty vector.
    pub fn toggled(&self, key: FacetKey, term: &str) -> Self {
        let mut next = self.clone();
        let slot = next.slot_mut(key).get_or_insert_with(Vec::new);
        if slot.iter().any(|value| value == term) {
            slot.retain(|value| value != term);
        } else {
            slot.push(term.to_string());
        }
        next
    }

    /// Keeps query, page and advanced mode; every facet filter is cleared.
    pub fn without_facet_filters(&self) -> Self {
        Self {
            query: self.query.clone(),
            page: self.page,
            advanced: self.advanced,
            ..Default::default()
        }
    }

    pub fn has_facet_filters(&self) -> bool {
        FacetKey::ALL
            .into_iter()
            .any(|key| self.values(key).is_some_and(|values| !values.is_empty()))
    }

    /// Narrows the multi-valued filters by a path scope. A scope value only
    /// fills a key the user has not filtered on already.
    pub fn scoped_to(&self, base: &BaseFilterParams) -> Self {
        let mut scoped = self.clone();
        let scope = [
            (FacetKey::Organization, base.organization.as_ref()),
            (FacetKey::Project, base.project.as_ref()),
            (FacetKey::Repository, base.repository.as_ref()),
            (FacetKey::Branches, base.branch.as_ref()),
            (FacetKey::Tags, base.tag.as_ref()),
        ];
        for (key, value) in scope {
            let Some(value) = value else {
                continue;
            };
            let slot = scoped.slot_mut(key);
            if slot.as_ref().is_none_or(Vec::is_empty) {
                *slot = Some(vec![value.clone()]);
            }
        }
        scoped
    }
}

/// Path-derived scope: `/s/{organization}/{project}/{repository}/...`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BaseFilterParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl BaseFilterParams {
    pub fn organization(organization: impl Into<String>) -> Self {
        Self {
            organization: Some(organization.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.organization.is_none()
            && self.project.is_none()
            && self.repository.is_none()
            && self.branch.is_none()
            && self.tag.is_none()
    }

    pub fn validate(&self) -> Result<(), BaseFilterError> {
        if let (Some(branch), Some(tag)) = (&self.branch, &self.tag) {
            return Err(BaseFilterError::BranchAndTag {
                branch: branch.clone(),
                tag: tag.clone(),
            });
        }
        if self.repository.is_none()
            && let Some(name) = self.branch.as_ref().or(self.tag.as_ref())
        {
            return Err(BaseFilterError::RefWithoutRepository { name: name.clone() });
        }
        if self.project.is_none()
            && let Some(repository) = &self.repository
        {
            return Err(BaseFilterError::RepositoryWithoutProject {
                repository: repository.clone(),
            });
        }
        if self.organization.is_none()
            && let Some(project) = &self.project
        {
            return Err(BaseFilterError::ProjectWithoutOrganization {
                project: project.clone(),
            });
        }
        Ok(())
    }

    /// The longest valid prefix of the hierarchy. Levels below the first
    /// missing ancestor are dropped.
    pub fn truncated(&self) -> Self {
        let mut out = Self::default();
        let Some(organization) = &self.organization else {
            return out;
        };
        out.organization = Some(organization.clone());
        let Some(project) = &self.project else {
            return out;
        };
        out.project = Some(project.clone());
        let Some(repository) = &self.repository else {
            return out;
        };
        out.repository = Some(repository.clone());
        match (&self.branch, &self.tag) {
            (Some(branch), _) => out.branch = Some(branch.clone()),
            (None, Some(tag)) => out.tag = Some(tag.clone()),
            (None, None) => {}
        }
        out
    }
}

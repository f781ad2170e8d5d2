use crate::filter::FacetKey;
use indexmap::IndexMap;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Term {
    pub term: String,
    pub count: u64,
}

impl Term {
    pub fn new(term: impl Into<String>, count: u64) -> Self {
        Self {
            term: term.into(),
            count,
        }
    }
}

/// Aggregation of one field of the result set.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Facet {
    pub field: String,
    pub missing: u64,
    pub other: u64,
    pub total: u64,
    pub terms: Vec<Term>,
}

impl Facet {
    pub fn with_terms(field: impl Into<String>, terms: Vec<Term>) -> Self {
        let total = terms.iter().map(|term| term.count).sum();
        Self {
            field: field.into(),
            missing: 0,
            other: 0,
            total,
            terms,
        }
    }

    pub fn count_of(&self, term: &str) -> Option<u64> {
        self.terms
            .iter()
            .find(|candidate| candidate.term == term)
            .map(|candidate| candidate.count)
    }
}

/// Facet name (`ext`, `organization`, ...) → facet.
pub type Facets = BTreeMap<String, Facet>;

pub fn facet_for(facets: &Facets, key: FacetKey) -> Option<&Facet> {
    facets.get(key.facet_name())
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefFacet {
    pub term: String,
    pub count: u64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepositoryFacet {
    pub term: String,
    pub count: u64,
    #[serde(default)]
    pub refs: Vec<RefFacet>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectFacet {
    pub term: String,
    pub count: u64,
    #[serde(default)]
    pub repositories: Vec<RepositoryFacet>,
}

/// Root of the organization → project → repository → ref hierarchy. Every
/// level carries its own count, independent of the flat sidebar facets.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrganizationFacet {
    pub term: String,
    pub count: u64,
    #[serde(default)]
    pub projects: Vec<ProjectFacet>,
}

enum RefsTerm<'a> {
    Organization(&'a str),
    Project(&'a str, &'a str),
    Repository(&'a str, &'a str, &'a str),
    Ref(&'a str, &'a str, &'a str, &'a str),
}

/// Flat terms are `org`, `org:project`, `org:project/repo` and
/// `org:project/repo:ref`.
fn classify(term: &str) -> Option<RefsTerm<'_>> {
    let Some((organization, rest)) = term.split_once(':') else {
        return Some(RefsTerm::Organization(term));
    };
    let Some((project, rest)) = rest.split_once('/') else {
        return Some(RefsTerm::Project(organization, rest));
    };
    match rest.split_once(':') {
        None => Some(RefsTerm::Repository(organization, project, rest)),
        Some((repository, name)) if !name.is_empty() => {
            Some(RefsTerm::Ref(organization, project, repository, name))
        }
        Some(_) => None,
    }
}

#[derive(Default)]
struct RepoNode {
    count: u64,
    refs: IndexMap<String, u64>,
}

#[derive(Default)]
struct ProjectNode {
    count: u64,
    repositories: IndexMap<String, RepoNode>,
}

#[derive(Default)]
struct OrgNode {
    count: u64,
    projects: IndexMap<String, ProjectNode>,
}

impl OrganizationFacet {
    /// Rebuilds the hierarchy from a flat facet. Terms may arrive in any
    /// order; a child seen before its parent creates the parent with a zero
    /// count until the parent's own term shows up.
    pub fn tree_from_terms(terms: &[Term]) -> Vec<OrganizationFacet> {
        let mut orgs: IndexMap<String, OrgNode> = IndexMap::new();
        for term in terms {
            let Some(kind) = classify(&term.term) else {
                continue;
            };
            match kind {
                RefsTerm::Organization(org) => {
                    orgs.entry(org.to_string()).or_default().count = term.count;
                }
                RefsTerm::Project(org, project) => {
                    orgs.entry(org.to_string())
                        .or_default()
                        .projects
                        .entry(project.to_string())
                        .or_default()
                        .count = term.count;
                }
                RefsTerm::Repository(org, project, repo) => {
                    orgs.entry(org.to_string())
                        .or_default()
                        .projects
                        .entry(project.to_string())
                        .or_default()
                        .repositories
                        .entry(repo.to_string())
                        .or_default()
                        .count = term.count;
                }
                RefsTerm::Ref(org, project, repo, name) => {
                    orgs.entry(org.to_string())
                        .or_default()
                        .projects
                        .entry(project.to_string())
                        .or_default()
                        .repositories
                        .entry(repo.to_string())
                        .or_default()
                        .refs
                        .insert(name.to_string(), term.count);
                }
            }
        }
        orgs.into_iter()
            .map(|(term, org)| OrganizationFacet {
                term,
                count: org.count,
                projects: org
                    .projects
                    .into_iter()
                    .map(|(term, project)| ProjectFacet {
                        term,
                        count: project.count,
                        repositories: project
                            .repositories
                            .into_iter()
                            .map(|(term, repo)| RepositoryFacet {
                                term,
                                count: repo.count,
                                refs: repo
                                    .refs
                                    .into_iter()
                                    .map(|(term, count)| RefFacet { term, count })
                                    .collect(),
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FullRefsWire {
    Tree(Vec<OrganizationFacet>),
    Flat(Facet),
}

/// Accepts either the nested tree or a flat facet of encoded ref terms.
pub fn deserialize_full_refs<'de, D>(
    deserializer: D,
) -> Result<Option<Vec<OrganizationFacet>>, D::Error>
where
    D: Deserializer<'de>,
{
    let wire = Option::<FullRefsWire>::deserialize(deserializer)?;
    Ok(wire.map(|wire| match wire {
        FullRefsWire::Tree(tree) => tree,
        FullRefsWire::Flat(facet) => OrganizationFacet::tree_from_terms(&facet.terms),
    }))
}

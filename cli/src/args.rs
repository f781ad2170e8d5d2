use anyhow::Context;
use anyhow::Result;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use gitss_protocol::AdvancedSearch;
use gitss_protocol::BaseFilterParams;
use gitss_protocol::FacetKey;
use gitss_protocol::FilterParams;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "gitss", version, about = "Search a gitss source code index")]
pub struct Cli {
    /// Path to a gitss.toml config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// gitss server root, overrides backend.base_url
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a search and print the hits
    Search(SearchArgs),

    /// Print the shareable search URL without contacting the server
    Url(QueryArgs),

    /// List the organizations, projects, repositories and refs under a scope
    Filters(FiltersArgs),

    /// List indexed repositories and their refs
    Indexed(ListArgs),

    /// Print the server version
    Version,
}

#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Search query
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Restrict to an organization
    #[arg(long = "org", value_name = "ORG")]
    pub organization: Option<String>,

    /// Restrict to a project (requires --org)
    #[arg(long, value_name = "PROJECT")]
    pub project: Option<String>,

    /// Restrict to a repository (requires --project)
    #[arg(long = "repo", value_name = "REPO")]
    pub repository: Option<String>,

    /// Restrict to a branch (requires --repo)
    #[arg(long, value_name = "BRANCH", conflicts_with = "tag")]
    pub branch: Option<String>,

    /// Restrict to a tag (requires --repo)
    #[arg(long, value_name = "TAG")]
    pub tag: Option<String>,

    /// Facet filter such as `ext=.go` or `x=.go`; repeatable
    #[arg(short = 'f', long = "facet", value_name = "KEY=TERM", value_parser = parse_facet_filter)]
    pub facets: Vec<(FacetKey, String)>,

    /// Zero-based result page
    #[arg(long, default_value_t = 0)]
    pub page: u32,

    /// Treat the query as a regular expression
    #[arg(long)]
    pub regex: bool,
}

impl QueryArgs {
    pub fn base(&self) -> BaseFilterParams {
        BaseFilterParams {
            organization: self.organization.clone(),
            project: self.project.clone(),
            repository: self.repository.clone(),
            branch: self.branch.clone(),
            tag: self.tag.clone(),
        }
    }

    /// Validated scope plus the facet filters. Query and page are left for
    /// the caller to place.
    pub fn to_request(&self) -> Result<(BaseFilterParams, FilterParams)> {
        if self.query.trim().is_empty() {
            anyhow::bail!("query must not be empty");
        }
        let base = self.base();
        base.validate().context("invalid search scope")?;
        let mut params = FilterParams::default();
        for (key, term) in &self.facets {
            if !params.is_selected(*key, term) {
                params.push_value(*key, term.clone());
            }
        }
        if self.regex {
            params.advanced = Some(AdvancedSearch::Regex);
        }
        Ok((base, params))
    }
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Print the raw search result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct FiltersArgs {
    #[arg(value_name = "ORG")]
    pub organization: Option<String>,

    #[arg(value_name = "PROJECT", requires = "organization")]
    pub project: Option<String>,

    #[arg(value_name = "REPO", requires = "project")]
    pub repository: Option<String>,

    #[command(flatten)]
    pub list: ListArgs,
}

impl FiltersArgs {
    pub fn scope(&self) -> BaseFilterParams {
        BaseFilterParams {
            organization: self.organization.clone(),
            project: self.project.clone(),
            repository: self.repository.clone(),
            ..Default::default()
        }
    }
}

fn parse_facet_filter(raw: &str) -> Result<(FacetKey, String), String> {
    let (key, term) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=TERM, got `{raw}`"))?;
    let key = FacetKey::ALL
        .into_iter()
        .find(|candidate| candidate.param() == key || candidate.facet_name() == key)
        .ok_or_else(|| format!("unknown facet `{key}`"))?;
    if term.is_empty() {
        return Err(format!("empty term for facet `{key}`"));
    }
    Ok((key, term.to_string()))
}

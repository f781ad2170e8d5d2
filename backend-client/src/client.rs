use crate::error::ClientError;
use crate::error::Result;
use async_trait::async_trait;
use gitss_protocol::BaseFilterParams;
use gitss_protocol::BaseFilters;
use gitss_protocol::FilterParams;
use gitss_protocol::Indexed;
use gitss_protocol::IndexedList;
use gitss_protocol::SearchResult;
use gitss_protocol::VersionInfo;
use gitss_protocol::query;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const API_SEGMENTS: [&str; 2] = ["api", "v1"];

#[derive(Clone, Debug)]
pub struct ClientOptions {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// The backend operations the search state needs. [`SearchClient`] is the
/// HTTP implementation; tests substitute in-memory fakes.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// `page` replaces any page already present in `params`.
    async fn search(&self, params: &FilterParams, page: u32) -> Result<SearchResult>;

    /// Options for the base filter drop-downs, narrowed to `scope`.
    async fn fetch_filters(&self, scope: &BaseFilterParams) -> Result<BaseFilters>;

    async fn indexed(&self) -> Result<Vec<Indexed>>;
}

#[derive(Clone, Debug)]
pub struct SearchClient {
    http: reqwest::Client,
    base_url: Url,
}

impl SearchClient {
    pub fn new(opts: ClientOptions) -> Result<Self> {
        let base_url = Url::parse(&opts.base_url).map_err(|err| ClientError::InvalidBaseUrl {
            url: opts.base_url.clone(),
            reason: err.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl {
                url: opts.base_url,
                reason: "url cannot carry a path".to_string(),
            });
        }
        let http = reqwest::Client::builder()
            .timeout(opts.timeout)
            .build()
            .map_err(|source| ClientError::Transport {
                endpoint: "client",
                source,
            })?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}/api/v1/search?<params>&i=<page>`; the page always comes last.
    pub fn search_url(&self, params: &FilterParams, page: u32) -> Url {
        let mut url = self.endpoint(&["search"]);
        let without_page = FilterParams {
            page: None,
            ..params.clone()
        };
        let mut query = query::encode(&without_page);
        if !query.is_empty() {
            query.push('&');
        }
        query.push_str(query::PAGE_KEY);
        query.push('=');
        query.push_str(&page.to_string());
        url.set_query(Some(&query));
        url
    }

    /// `{base}/api/v1/filters[/org[/project[/repo]]]`, cut at the first
    /// missing level.
    pub fn filters_url(&self, scope: &BaseFilterParams) -> Url {
        let scope = scope.truncated();
        let mut segments = vec!["filters"];
        let levels = [
            scope.organization.as_deref(),
            scope.project.as_deref(),
            scope.repository.as_deref(),
        ];
        segments.extend(levels.into_iter().flatten());
        self.endpoint(&segments)
    }

    pub async fn version(&self) -> Result<VersionInfo> {
        self.get_json(self.endpoint(&["version"]), "version").await
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        url.set_query(None);
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(API_SEGMENTS).extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, endpoint: &'static str) -> Result<T> {
        tracing::debug!(%url, endpoint, "backend request");
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| ClientError::Transport { endpoint, source })?;
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|source| ClientError::Transport { endpoint, source })?;
        if !status.is_success() {
            return Err(ClientError::Status {
                endpoint,
                status: status.as_u16(),
                body,
            });
        }
        serde_json::from_str(&body).map_err(|source| ClientError::Decode { endpoint, source })
    }
}

#[async_trait]
impl SearchBackend for SearchClient {
    async fn search(&self, params: &FilterParams, page: u32) -> Result<SearchResult> {
        self.get_json(self.search_url(params, page), "search").await
    }

    async fn fetch_filters(&self, scope: &BaseFilterParams) -> Result<BaseFilters> {
        self.get_json(self.filters_url(scope), "filters").await
    }

    async fn indexed(&self) -> Result<Vec<Indexed>> {
        let list: IndexedList = self.get_json(self.endpoint(&["indexed"]), "indexed").await?;
        Ok(list.result)
    }
}

//! Query-string and path encoding for [`FilterParams`] and
//! [`BaseFilterParams`].
//!
//! Values are percent-encoded; only RFC 3986 unreserved characters pass
//! through untouched, so terms containing `&`, `=` or `+` survive a round trip.

use crate::error::QueryError;
use crate::error::Result;
use crate::filter::AdvancedSearch;
use crate::filter::BaseFilterParams;
use crate::filter::FacetKey;
use crate::filter::FilterParams;
use indexmap::IndexMap;
use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;
use percent_encoding::percent_decode_str;
use percent_encoding::utf8_percent_encode;
use std::borrow::Cow;

const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

pub const QUERY_KEY: &str = "q";
pub const PAGE_KEY: &str = "i";
pub const ADVANCED_KEY: &str = "a";

/// Path of the unscoped search view.
pub const SEARCH_PATH: &str = "/search";
/// Prefix of the scoped search views.
pub const SCOPED_PREFIX: &str = "/s";

/// Every key mapped to its list of values, the shape the backend parses.
pub type WireParams = IndexMap<String, Vec<String>>;

/// Result of a decode that does not know which keys are multi-valued.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryValue {
    Scalar(String),
    Multi(Vec<String>),
}

impl QueryValue {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            QueryValue::Scalar(value) => vec![value],
            QueryValue::Multi(values) => values,
        }
    }

    pub fn first(&self) -> &str {
        match self {
            QueryValue::Scalar(value) => value,
            QueryValue::Multi(values) => values.first().map(String::as_str).unwrap_or(""),
        }
    }
}

impl FilterParams {
    /// Canonical key order: `q a x o p r b t i`. Absent and empty keys are
    /// left out.
    pub fn to_wire(&self) -> WireParams {
        let mut wire = WireParams::new();
        if let Some(query) = &self.query {
            wire.insert(QUERY_KEY.to_string(), vec![query.clone()]);
        }
        if let Some(advanced) = self.advanced {
            wire.insert(ADVANCED_KEY.to_string(), vec![advanced.as_str().to_string()]);
        }
        for key in FacetKey::ALL {
            if let Some(values) = self.values(key)
                && !values.is_empty()
            {
                wire.insert(key.param().to_string(), values.clone());
            }
        }
        if let Some(page) = self.page {
            wire.insert(PAGE_KEY.to_string(), vec![page.to_string()]);
        }
        wire
    }

    /// Multi-valued keys always come back as vectors; scalar keys keep
    /// their first value; unknown keys are ignored.
    pub fn from_wire(wire: &WireParams) -> Result<Self> {
        let mut params = FilterParams::default();
        for (key, values) in wire {
            let Some(first) = values.first() else {
                continue;
            };
            match key.as_str() {
                QUERY_KEY => params.query = Some(first.clone()),
                PAGE_KEY => {
                    let page = first.trim().parse::<u32>().map_err(|_| QueryError::InvalidPage {
                        value: first.clone(),
                    })?;
                    params.page = Some(page);
                }
                ADVANCED_KEY => {
                    let mode = AdvancedSearch::parse(first).ok_or_else(|| {
                        QueryError::InvalidAdvancedMode {
                            value: first.clone(),
                        }
                    })?;
                    params.advanced = Some(mode);
                }
                other => {
                    if let Some(facet) = FacetKey::from_param(other) {
                        params.set_values(facet, Some(values.clone()));
                    }
                }
            }
        }
        Ok(params)
    }
}

pub fn encode(params: &FilterParams) -> String {
    encode_wire(&params.to_wire())
}

/// Query-string form of a path scope: the `o p r b t` keys a search scoped
/// with [`FilterParams::scoped_to`] sends to the backend.
pub fn encode_base(base: &BaseFilterParams) -> String {
    encode(&FilterParams::default().scoped_to(base))
}

pub fn decode(query: &str) -> Result<FilterParams> {
    FilterParams::from_wire(&decode_wire(query)?)
}

pub fn encode_wire(wire: &WireParams) -> String {
    let mut out = String::new();
    for (key, values) in wire {
        for value in values {
            if !out.is_empty() {
                out.push('&');
            }
            out.push_str(&encode_component(key));
            out.push('=');
            out.push_str(&encode_component(value));
        }
    }
    out
}

pub fn decode_wire(query: &str) -> Result<WireParams> {
    let mut wire = WireParams::new();
    let query = query.strip_prefix('?').unwrap_or(query);
    for pair in query.split('&').filter(|pair| !pair.is_empty()) {
        let (raw_key, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = decode_component(raw_key, raw_key)?;
        let value = decode_component(raw_value, &key)?;
        wire.entry(key).or_default().push(value);
    }
    Ok(wire)
}

/// A key seen once is a scalar, a repeated key a list. Callers that know a
/// key is multi-valued should use [`QueryValue::into_vec`] or [`decode`].
pub fn decode_values(query: &str) -> Result<IndexMap<String, QueryValue>> {
    Ok(decode_wire(query)?
        .into_iter()
        .map(|(key, mut values)| {
            let value = if values.len() == 1 {
                QueryValue::Scalar(values.remove(0))
            } else {
                QueryValue::Multi(values)
            };
            (key, value)
        })
        .collect())
}

/// `/s/{org}/{project}/{repo}/branches/{branch}` (or `/tags/{tag}`), cut at the
/// first missing level. Without an organization the unscoped search path is
/// returned.
pub fn build_base_filter_path(base: &BaseFilterParams) -> String {
    let base = base.truncated();
    let Some(organization) = &base.organization else {
        return SEARCH_PATH.to_string();
    };
    let mut path = format!("{SCOPED_PREFIX}/{}", encode_component(organization));
    let levels = [base.project.as_ref(), base.repository.as_ref()];
    for segment in levels.into_iter().flatten() {
        path.push('/');
        path.push_str(&encode_component(segment));
    }
    if let Some(branch) = &base.branch {
        path.push_str("/branches/");
        path.push_str(&encode_component(branch));
    } else if let Some(tag) = &base.tag {
        path.push_str("/tags/");
        path.push_str(&encode_component(tag));
    }
    path
}

/// Route matcher for the search views. Returns `None` for paths that are not
/// a search view.
pub fn parse_base_filter_path(path: &str) -> Option<BaseFilterParams> {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() || trimmed == SEARCH_PATH || trimmed == SCOPED_PREFIX {
        return Some(BaseFilterParams::default());
    }
    let rest = trimmed.strip_prefix(SCOPED_PREFIX)?.strip_prefix('/')?;
    let segments = rest
        .split('/')
        .map(|segment| decode_component(segment, segment).ok())
        .collect::<Option<Vec<_>>>()?;
    if segments.iter().any(String::is_empty) {
        return None;
    }
    let mut base = BaseFilterParams::default();
    match segments.as_slice() {
        [organization] => {
            base.organization = Some(organization.clone());
        }
        [organization, project] => {
            base.organization = Some(organization.clone());
            base.project = Some(project.clone());
        }
        [organization, project, repository] => {
            base.organization = Some(organization.clone());
            base.project = Some(project.clone());
            base.repository = Some(repository.clone());
        }
        [organization, project, repository, kind, name] => {
            base.organization = Some(organization.clone());
            base.project = Some(project.clone());
            base.repository = Some(repository.clone());
            match kind.as_str() {
                "branches" => base.branch = Some(name.clone()),
                "tags" => base.tag = Some(name.clone()),
                _ => return None,
            }
        }
        _ => return None,
    }
    Some(base)
}

pub fn encode_component(value: &str) -> Cow<'_, str> {
    utf8_percent_encode(value, UNRESERVED).into()
}

fn decode_component(raw: &str, key: &str) -> Result<String> {
    let spaced: Cow<'_, str> = if raw.contains('+') {
        Cow::Owned(raw.replace('+', " "))
    } else {
        Cow::Borrowed(raw)
    };
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(Cow::into_owned)
        .map_err(|_| QueryError::InvalidEncoding {
            key: key.to_string(),
        })
}

//! Application routes and the URL query state they carry.
//!
//! Search state round-trips through the query string: `q` is plain text,
//! while `criteria`, `filters` and `facets` hold JSON that is percent-encoded
//! once before being placed in the query string (which encodes it again).
//! Malformed JSON never fails a route; it is logged and replaced by the
//! default value.

use serde::de::DeserializeOwned;
use serde::Serialize;
use url::{form_urlencoded, Url};

use crate::models::{AdvancedFilters, SearchCriteria, SelectedFilters};

/// Base used to resolve relative paths such as `/search?q=x`
const ROUTE_BASE: &str = "http://localhost/";

/// Errors that can occur when parsing a route
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Unknown route: {0}")]
    UnknownRoute(String),
}

/// Search state carried in the query string of `/search` and `/detail/:id`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchParams {
    /// Free-text query
    pub q: String,

    /// Advanced criteria rows
    pub criteria: Vec<SearchCriteria>,

    /// Advanced filters, when the parameter was present
    pub filters: Option<AdvancedFilters>,

    /// Committed facet selections
    pub facets: SelectedFilters,
}

impl SearchParams {
    /// Params holding only a query
    pub fn query(q: impl Into<String>) -> Self {
        Self {
            q: q.into(),
            ..Self::default()
        }
    }

    /// Whether the URL asked for a search at all
    pub fn has_search(&self) -> bool {
        !self.q.is_empty() || !self.criteria.is_empty() || self.filters.is_some()
    }

    /// Read params from `key=value` pairs, defaulting anything malformed
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (std::borrow::Cow<'a, str>, std::borrow::Cow<'a, str>)>,
    {
        let mut params = SearchParams::default();
        for (key, value) in pairs {
            match key.as_ref() {
                "q" => params.q = value.into_owned(),
                "criteria" => {
                    params.criteria = decode_json_param(&value, "criteria").unwrap_or_default()
                }
                "filters" => params.filters = decode_json_param(&value, "filters"),
                "facets" => params.facets = decode_json_param(&value, "facets").unwrap_or_default(),
                other => tracing::trace!("Ignoring query parameter {:?}", other),
            }
        }
        params
    }

    /// Parse a raw query string (without the leading `?`)
    pub fn from_query(query: &str) -> Self {
        Self::from_pairs(form_urlencoded::parse(query.as_bytes()))
    }

    /// Encode as a query string; empty params are omitted
    pub fn to_query(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        if !self.q.is_empty() {
            serializer.append_pair("q", &self.q);
        }
        if !self.criteria.is_empty() {
            if let Some(encoded) = encode_json_param(&self.criteria) {
                serializer.append_pair("criteria", &encoded);
            }
        }
        if let Some(filters) = &self.filters {
            if let Some(encoded) = encode_json_param(filters) {
                serializer.append_pair("filters", &encoded);
            }
        }
        if let Some(encoded) = facets_param(&self.facets) {
            serializer.append_pair("facets", &encoded);
        }
        serializer.finish()
    }
}

/// A page of the application
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    Home,
    Search(SearchParams),
    Detail { id: String, params: SearchParams },
    Saved,
    SignIn,
    SignUp,
    TestAuth,
}

impl Route {
    /// Parse a path with optional query, or a full URL
    pub fn parse(input: &str) -> Result<Route, RouteError> {
        let base = Url::parse(ROUTE_BASE).map_err(|e| RouteError::InvalidUrl(e.to_string()))?;
        let url = base
            .join(input.trim())
            .map_err(|e| RouteError::InvalidUrl(format!("{}: {}", input, e)))?;

        let segments: Vec<String> = url
            .path_segments()
            .map(|segments| {
                segments
                    .filter(|s| !s.is_empty())
                    .map(|s| urlencoding::decode(s).map(|s| s.into_owned()).unwrap_or_else(|_| s.to_string()))
                    .collect()
            })
            .unwrap_or_default();
        let params = || SearchParams::from_pairs(url.query_pairs());

        let route = match segments.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
            [] => Route::Home,
            ["search"] => Route::Search(params()),
            ["detail", id] => Route::Detail {
                id: id.to_string(),
                params: params(),
            },
            ["saved"] => Route::Saved,
            ["auth", "sign-in"] => Route::SignIn,
            ["auth", "sign-up"] => Route::SignUp,
            ["test-auth"] => Route::TestAuth,
            _ => return Err(RouteError::UnknownRoute(url.path().to_string())),
        };
        Ok(route)
    }

    /// Path and query for this route
    pub fn to_url(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Search(params) => with_query("/search".to_string(), &params.to_query()),
            Route::Detail { id, params } => with_query(
                format!("/detail/{}", urlencoding::encode(id)),
                &params.to_query(),
            ),
            Route::Saved => "/saved".to_string(),
            Route::SignIn => "/auth/sign-in".to_string(),
            Route::SignUp => "/auth/sign-up".to_string(),
            Route::TestAuth => "/test-auth".to_string(),
        }
    }
}

impl std::str::FromStr for Route {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Route::parse(s)
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_url())
    }
}

fn with_query(path: String, query: &str) -> String {
    if query.is_empty() {
        path
    } else {
        format!("{}?{}", path, query)
    }
}

/// Link from a result to its detail page, carrying the trimmed query
pub fn detail_href(id: &str, query: &str) -> String {
    let query = query.trim();
    let path = format!("/detail/{}", urlencoding::encode(id));
    if query.is_empty() {
        return path;
    }
    let encoded = form_urlencoded::Serializer::new(String::new())
        .append_pair("q", query)
        .finish();
    format!("{}?{}", path, encoded)
}

/// Link from a detail page back to the search it came from
pub fn back_to_search_href(query: &str) -> String {
    if query.is_empty() {
        "/search".to_string()
    } else {
        format!("/search?q={}", urlencoding::encode(query))
    }
}

/// Search URL for a plain query, or `None` when the query is blank
pub fn search_href(query: &str) -> Option<String> {
    let query = query.trim();
    (!query.is_empty()).then(|| Route::Search(SearchParams::query(query)).to_url())
}

/// Value for the `facets` parameter, or `None` when nothing is selected
pub fn facets_param(facets: &SelectedFilters) -> Option<String> {
    if facets.is_empty() {
        return None;
    }
    encode_json_param(facets)
}

/// JSON-encode `value` and percent-encode the result
pub fn encode_json_param<T: Serialize + ?Sized>(value: &T) -> Option<String> {
    match serde_json::to_string(value) {
        Ok(json) => Some(urlencoding::encode(&json).into_owned()),
        Err(e) => {
            tracing::warn!("Failed to encode URL parameter: {}", e);
            None
        }
    }
}

/// Decode a parameter produced by [`encode_json_param`].
///
/// Values that were not percent-encoded are accepted as raw JSON. Failures
/// are logged and yield `None`.
pub fn decode_json_param<T: DeserializeOwned>(raw: &str, name: &str) -> Option<T> {
    let decoded = urlencoding::decode(raw)
        .map(|value| value.into_owned())
        .unwrap_or_else(|_| raw.to_string());

    match serde_json::from_str(&decoded) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Failed to parse {} from URL: {}", name, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CriteriaOperator, SearchField};

    #[test]
    fn test_parse_static_routes() {
        assert_eq!(Route::parse("/").unwrap(), Route::Home);
        assert_eq!(Route::parse("").unwrap(), Route::Home);
        assert_eq!(Route::parse("/saved").unwrap(), Route::Saved);
        assert_eq!(Route::parse("/auth/sign-in").unwrap(), Route::SignIn);
        assert_eq!(Route::parse("/auth/sign-up/").unwrap(), Route::SignUp);
        assert_eq!(Route::parse("/test-auth").unwrap(), Route::TestAuth);
        assert!(matches!(
            Route::parse("/admin"),
            Err(RouteError::UnknownRoute(_))
        ));
    }

    #[test]
    fn test_parse_full_url() {
        let route = Route::parse("https://discovery.example.org/search?q=deep+learning").unwrap();
        assert_eq!(route, Route::Search(SearchParams::query("deep learning")));
    }

    #[test]
    fn test_search_params_round_trip() {
        let mut facets = SelectedFilters::new();
        facets.select("type", "article");
        let params = SearchParams {
            q: "neural nets".to_string(),
            criteria: vec![SearchCriteria::new(SearchField::Author, "Lee")
                .operator(CriteriaOperator::Or)],
            filters: Some(AdvancedFilters::default().year_from("2022")),
            facets,
        };
        let route = Route::Search(params.clone());

        let url = route.to_url();
        assert!(url.starts_with("/search?q=neural+nets&criteria="));
        assert_eq!(Route::parse(&url).unwrap(), route);
    }

    #[test]
    fn test_malformed_json_defaults() {
        let route = Route::parse("/search?q=x&criteria=%7Bnot-json&facets=%5B1%5D").unwrap();
        let Route::Search(params) = route else {
            panic!("expected search route");
        };
        assert_eq!(params.q, "x");
        assert!(params.criteria.is_empty());
        assert!(params.facets.is_empty());
    }

    #[test]
    fn test_raw_json_params_are_accepted() {
        let params = SearchParams::from_query(r#"facets={"year":["2024"]}"#);
        assert!(params.facets.is_selected("year", "2024"));
    }

    #[test]
    fn test_empty_facet_groups_are_not_written_back() {
        let params = SearchParams::from_query(r#"q=x&facets={"type":[],"year":["2024","2024"]}"#);
        assert_eq!(params.facets.total(), 1);

        let plain = SearchParams::from_query(r#"q=x&facets={"type":[]}"#);
        assert!(plain.facets.is_empty());
        assert_eq!(Route::Search(plain).to_url(), "/search?q=x");
    }

    #[test]
    fn test_detail_route() {
        let route = Route::parse("/detail/42?q=quantum").unwrap();
        assert_eq!(
            route,
            Route::Detail {
                id: "42".to_string(),
                params: SearchParams::query("quantum"),
            }
        );
        assert_eq!(route.to_url(), "/detail/42?q=quantum");
    }

    #[test]
    fn test_hrefs() {
        assert_eq!(detail_href("3", "  climate change "), "/detail/3?q=climate+change");
        assert_eq!(detail_href("3", "   "), "/detail/3");
        assert_eq!(back_to_search_href("climate change"), "/search?q=climate%20change");
        assert_eq!(back_to_search_href(""), "/search");
        assert_eq!(search_href(" ai "), Some("/search?q=ai".to_string()));
        assert_eq!(search_href(" "), None);
    }

    #[test]
    fn test_has_search() {
        assert!(!SearchParams::default().has_search());
        assert!(SearchParams::query("x").has_search());
        let filters_only = SearchParams {
            filters: Some(AdvancedFilters::default()),
            ..SearchParams::default()
        };
        assert!(filters_only.has_search());
    }
}

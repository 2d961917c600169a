//! Lenient query-string extractor: the first value wins for a repeated key
//! and an unparseable query reads as empty.

use axum::{
    extract::{FromRequestParts, Query},
    http::{Uri, request::Parts},
};

#[derive(Debug, Default, Clone)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn from_uri(uri: &Uri) -> Self {
        Query::<Vec<(String, String)>>::try_from_uri(uri)
            .map(|Query(pairs)| QueryParams(pairs))
            .unwrap_or_default()
    }

    /// First value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First value for `key`, or an empty string when absent.
    pub fn value(&self, key: &str) -> String {
        self.get(key).unwrap_or_default().to_string()
    }
}

impl<S> FromRequestParts<S> for QueryParams
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        std::future::ready(Ok(QueryParams::from_uri(&parts.uri)))
    }
}

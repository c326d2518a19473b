//! Request URIs
//!
//! Pure construction of catalog resource URIs. Every call starts from the
//! base URL and the arguments it is given; nothing carries over between calls.

use url::Url;

use crate::error::ConfigurationError;
use crate::types::{BeerId, BeerQuery};

/// Collection path segments under the base URL.
pub const COLLECTION_PATH: [&str; 3] = ["api", "v1", "beers"];

/// URI of the beer collection, `{base}/api/v1/beers`.
pub fn build_collection_uri(base: &Url) -> Result<Url, ConfigurationError> {
    with_path(base, &[])
}

/// URI for listing beers; only the query's present fields become parameters.
pub fn build_list_uri(base: &Url, query: &BeerQuery) -> Result<Url, ConfigurationError> {
    let mut url = build_collection_uri(base)?;
    let pairs = query.to_query_pairs();
    if !pairs.is_empty() {
        url.query_pairs_mut().extend_pairs(pairs);
    }
    Ok(url)
}

/// URI of a single beer, `{base}/api/v1/beers/{id}`.
/// The id is percent-encoded as a single path segment.
pub fn build_instance_uri(base: &Url, id: &BeerId) -> Result<Url, ConfigurationError> {
    with_path(base, &[id.as_str()])
}

fn with_path(base: &Url, extra: &[&str]) -> Result<Url, ConfigurationError> {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);
    url.path_segments_mut()
        .map_err(|_| ConfigurationError::InvalidEndpoint {
            field: "base_url".to_string(),
            url: base.to_string(),
        })?
        .pop_if_empty()
        .extend(COLLECTION_PATH)
        .extend(extra);
    Ok(url)
}

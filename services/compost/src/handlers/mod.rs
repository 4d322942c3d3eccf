pub mod bin;
pub mod forum;
pub mod health;
pub mod log;
pub mod profile;
pub mod task;
pub mod tip;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use compost_domain::pagination::PageRequest;

use crate::error::CompostServiceError;

/// `?per-page=&page=` on plain list endpoints.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct PageQuery {
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

impl PageQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::from_query(self.per_page, self.page)
    }
}

/// Parse a raw query string; an absent query yields the defaults.
pub(crate) fn parse_query<T: DeserializeOwned + Default>(
    raw_query: Option<String>,
) -> Result<T, CompostServiceError> {
    raw_query
        .as_deref()
        .map(serde_qs::from_str)
        .transpose()
        .map_err(|_| CompostServiceError::validation("invalid query string"))
        .map(Option::unwrap_or_default)
}

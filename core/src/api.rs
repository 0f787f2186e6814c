//! Request builder and response classifier for the NED NL API.
//!
//! # Design
//! `NedApi` holds the base URL and API key and never touches the network.
//! Building a request validates credentials and fixes the URL, headers and
//! query; classifying a response maps the status and content type onto the
//! error taxonomy and hands back the raw body. `NedNl` runs the round-trip
//! in between.

use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::NedError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::Envelope;
use crate::Result;

/// Media type every successful NED response must carry.
pub const JSON_LD: &str = "application/ld+json";

/// Header carrying the API key.
pub const AUTH_HEADER: &str = "X-AUTH-TOKEN";

/// `User-Agent` sent with every request.
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Page size requested from the `types` endpoint.
pub const TYPES_PAGE_SIZE: u32 = 100;

/// The fixed set of list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Activities,
    Classifications,
    Granularities,
    GranularityTimezones,
    Points,
    Types,
    Utilizations,
}

impl Resource {
    /// Path relative to the API root.
    pub fn path(&self) -> &'static str {
        match self {
            Resource::Activities => "activities",
            Resource::Classifications => "classifications",
            Resource::Granularities => "granularities",
            Resource::GranularityTimezones => "granularity_time_zones",
            Resource::Points => "points",
            Resource::Types => "types",
            Resource::Utilizations => "utilizations",
        }
    }
}

/// Filters for the `utilizations` endpoint. All of them are required by the
/// service.
///
/// Dates are forwarded exactly as given; the service accepts `YYYY-MM-DD`
/// and full timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UtilizationFilter {
    pub point_id: i64,
    pub type_id: i64,
    pub granularity_id: i64,
    pub granularity_timezone_id: i64,
    pub classification_id: i64,
    pub activity_id: i64,
    pub start_date: String,
    pub end_date: String,
}

impl UtilizationFilter {
    pub fn to_query(&self) -> Vec<(String, String)> {
        vec![
            ("point".to_string(), self.point_id.to_string()),
            ("type".to_string(), self.type_id.to_string()),
            ("granularity".to_string(), self.granularity_id.to_string()),
            (
                "granularitytimezone".to_string(),
                self.granularity_timezone_id.to_string(),
            ),
            ("classification".to_string(), self.classification_id.to_string()),
            ("activity".to_string(), self.activity_id.to_string()),
            ("start".to_string(), self.start_date.clone()),
            ("end".to_string(), self.end_date.clone()),
        ]
    }
}

/// Stateless request builder and response parser.
#[derive(Clone)]
pub struct NedApi {
    base_url: String,
    api_key: String,
}

impl NedApi {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a GET request for `path` relative to the API root.
    ///
    /// Fails with an authentication error when no API key is configured.
    pub fn build_get(&self, path: &str, query: Vec<(String, String)>) -> Result<HttpRequest> {
        if self.api_key.trim().is_empty() {
            return Err(NedError::Authentication("No API key provided.".to_string()));
        }

        Ok(HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}/{}", self.base_url, path.trim_start_matches('/')),
            headers: vec![
                ("Accept".to_string(), JSON_LD.to_string()),
                ("User-Agent".to_string(), USER_AGENT.to_string()),
                (AUTH_HEADER.to_string(), self.api_key.clone()),
            ],
            query,
        })
    }

    pub fn build_list(&self, resource: Resource) -> Result<HttpRequest> {
        let query = match resource {
            Resource::Types => vec![("itemsPerPage".to_string(), TYPES_PAGE_SIZE.to_string())],
            _ => Vec::new(),
        };
        self.build_get(resource.path(), query)
    }

    pub fn build_utilization(&self, filter: &UtilizationFilter) -> Result<HttpRequest> {
        self.build_get(Resource::Utilizations.path(), filter.to_query())
    }

    pub fn parse_list<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<Vec<T>> {
        let body = check_response(response)?;
        Ok(parse_envelope::<T>(&body)?.data)
    }
}

impl std::fmt::Debug for NedApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NedApi")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Map non-success status codes and foreign content types to `NedError`.
pub fn check_response(response: HttpResponse) -> Result<String> {
    if response.status == 403 {
        warn!(status = response.status, "NED NL API rejected the API key");
        return Err(NedError::Authentication(
            "Invalid or expired API key provided.".to_string(),
        ));
    }
    if response.status >= 400 {
        warn!(status = response.status, "NED NL API returned an error status");
        return Err(NedError::Status {
            status: response.status,
            body: response.body,
        });
    }

    let content_type = response.header("content-type").unwrap_or_default().to_string();
    if !content_type.contains(JSON_LD) {
        warn!(%content_type, "unexpected content type from NED NL API");
        return Err(NedError::UnexpectedContentType {
            content_type,
            body: response.body,
        });
    }

    Ok(response.body)
}

/// Decode a Hydra collection body.
pub fn parse_envelope<T: DeserializeOwned>(body: &str) -> Result<Envelope<T>> {
    serde_json::from_str(body).map_err(NedError::from)
}

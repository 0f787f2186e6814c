//! Asynchronous client for the NED NL API.
//!
//! # Design
//! `NedNl` pairs a `NedApi` (request building and response classification)
//! with a session `Transport`. The session is either supplied by the caller,
//! in which case the client never closes it, or created lazily on the first
//! request and owned by the client. `close()` releases an owned session once
//! and is a no-op on every later call. A client on a caller-supplied session
//! keeps working after `close()`, since the caller decides when that session
//! ends.

use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::api::{check_response, parse_envelope, NedApi, Resource, UtilizationFilter};
use crate::config::NedConfig;
use crate::error::NedError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{ReqwestTransport, Transport, TransportError};
use crate::types::{
    Activity, Classification, Envelope, Granularity, GranularityTimezone, Point, Type,
    Utilization,
};
use crate::Result;

#[derive(Debug)]
enum Session {
    /// No request issued yet and no session supplied.
    Unopened,
    /// Created by the client; closed by `close()`.
    Owned(Arc<dyn Transport>),
    /// Supplied by the caller; never closed by the client.
    External(Arc<dyn Transport>),
    Closed,
}

impl Session {
    /// The usable transport, or `None` while no session has been opened.
    fn transport(&self) -> Option<Result<Arc<dyn Transport>>> {
        match self {
            Session::Owned(transport) | Session::External(transport) => {
                Some(Ok(Arc::clone(transport)))
            }
            Session::Closed => Some(Err(NedError::SessionClosed)),
            Session::Unopened => None,
        }
    }
}

/// Client for the National Energy Dashboard NL API.
///
/// Safe to share across tasks; concurrent calls reuse one session.
#[derive(Debug)]
pub struct NedNl {
    api: NedApi,
    request_timeout: Duration,
    session: RwLock<Session>,
}

impl NedNl {
    /// Create a client with default settings and a lazily created session.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::builder().api_key(api_key).build()
    }

    pub fn builder() -> NedNlBuilder {
        NedNlBuilder::default()
    }

    pub fn from_config(config: NedConfig) -> Self {
        Self::builder().config(config).build()
    }

    /// Create a client from `NED_API_KEY` and friends, loading `.env` if
    /// present.
    pub fn from_env() -> Result<Self> {
        NedConfig::from_env().map(Self::from_config)
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Whether the client created the session it is using (or will create
    /// one on first use).
    pub async fn owns_session(&self) -> bool {
        matches!(*self.session.read().await, Session::Unopened | Session::Owned(_))
    }

    pub async fn is_closed(&self) -> bool {
        matches!(*self.session.read().await, Session::Closed)
    }

    /// GET `path` relative to the API root and return the raw JSON-LD body.
    pub async fn request(&self, path: &str, query: &[(&str, &str)]) -> Result<String> {
        let query = query
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        let request = self.api.build_get(path, query)?;
        let response = self.execute(request).await?;
        check_response(response)
    }

    /// Fetch one page of a list endpoint, keeping the total count.
    pub async fn envelope<T: DeserializeOwned>(&self, resource: Resource) -> Result<Envelope<T>> {
        let request = self.api.build_list(resource)?;
        self.fetch(request).await
    }

    pub async fn all_activities(&self) -> Result<Vec<Activity>> {
        Ok(self.envelope(Resource::Activities).await?.data)
    }

    pub async fn all_classifications(&self) -> Result<Vec<Classification>> {
        Ok(self.envelope(Resource::Classifications).await?.data)
    }

    pub async fn all_granularities(&self) -> Result<Vec<Granularity>> {
        Ok(self.envelope(Resource::Granularities).await?.data)
    }

    pub async fn all_granularity_timezones(&self) -> Result<Vec<GranularityTimezone>> {
        Ok(self.envelope(Resource::GranularityTimezones).await?.data)
    }

    pub async fn all_points(&self) -> Result<Vec<Point>> {
        Ok(self.envelope(Resource::Points).await?.data)
    }

    /// All types, requested with a page size of 100.
    pub async fn all_types(&self) -> Result<Vec<Type>> {
        Ok(self.envelope(Resource::Types).await?.data)
    }

    /// Utilization records matching every filter in `filter`.
    pub async fn utilization(&self, filter: &UtilizationFilter) -> Result<Vec<Utilization>> {
        let request = self.api.build_utilization(filter)?;
        let envelope: Envelope<Utilization> = self.fetch(request).await?;
        Ok(envelope.data)
    }

    /// Release the session if the client created it.
    ///
    /// A caller-supplied session is left untouched and stays usable. Calling
    /// this more than once is harmless.
    pub async fn close(&self) {
        let previous = {
            let mut session = self.session.write().await;
            if let Session::External(_) = *session {
                debug!("leaving caller-supplied session open");
                return;
            }
            std::mem::replace(&mut *session, Session::Closed)
        };

        if let Session::Owned(transport) = previous {
            transport.close().await;
        }
    }

    /// Run `f` with the client, then close it whatever `f` returned.
    pub async fn scoped<F, R>(self, f: F) -> R
    where
        F: for<'a> FnOnce(&'a NedNl) -> BoxFuture<'a, R>,
    {
        let result = f(&self).await;
        self.close().await;
        result
    }

    async fn fetch<T: DeserializeOwned>(&self, request: HttpRequest) -> Result<Envelope<T>> {
        let response = self.execute(request).await?;
        let body = check_response(response)?;
        parse_envelope(&body)
    }

    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let transport = self.transport().await?;

        debug!(method = request.method.as_str(), url = %request.url, "sending NED NL request");
        let outcome = tokio::time::timeout(self.request_timeout, transport.execute(request)).await;

        match outcome {
            Ok(Ok(response)) => {
                debug!(status = response.status, "received NED NL response");
                Ok(response)
            }
            Ok(Err(TransportError::Timeout)) | Err(_) => {
                warn!(timeout = ?self.request_timeout, "NED NL request timed out");
                Err(NedError::Timeout(self.request_timeout))
            }
            Ok(Err(TransportError::Network(message))) => {
                warn!(error = %message, "NED NL request failed");
                Err(NedError::Transport(message))
            }
        }
    }

    async fn transport(&self) -> Result<Arc<dyn Transport>> {
        if let Some(found) = self.session.read().await.transport() {
            return found;
        }

        let mut session = self.session.write().await;
        if let Some(found) = session.transport() {
            return found;
        }
        debug!("opening NED NL HTTP session");
        let transport: Arc<dyn Transport> = Arc::new(ReqwestTransport::new());
        *session = Session::Owned(Arc::clone(&transport));
        Ok(transport)
    }
}

/// Builder for [`NedNl`].
#[derive(Debug)]
pub struct NedNlBuilder {
    config: NedConfig,
    session: Option<Session>,
}

impl Default for NedNlBuilder {
    fn default() -> Self {
        Self {
            config: NedConfig::new(String::new()),
            session: None,
        }
    }
}

impl NedNlBuilder {
    pub fn config(mut self, config: NedConfig) -> Self {
        self.config = config;
        self
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.api_key = api_key.into();
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    /// Use a caller-owned `reqwest::Client` as the session.
    pub fn session(self, client: reqwest::Client) -> Self {
        self.transport(Arc::new(ReqwestTransport::with_client(client)))
    }

    /// Use a caller-owned transport as the session.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.session = Some(Session::External(transport));
        self
    }

    /// Hand a transport to the client, which closes it on `close()`.
    pub fn owned_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.session = Some(Session::Owned(transport));
        self
    }

    pub fn build(self) -> NedNl {
        NedNl {
            api: NedApi::new(&self.config.base_url, &self.config.api_key),
            request_timeout: self.config.request_timeout,
            session: RwLock::new(self.session.unwrap_or(Session::Unopened)),
        }
    }
}

//! Asynchronous client for the National Energy Dashboard NL API.
//!
//! # Overview
//! `NedNl` authenticates with an API key, issues GET requests against the
//! fixed set of NED list endpoints and decodes the JSON-LD (Hydra) responses
//! into typed records.
//!
//! # Design
//! - `api` builds `HttpRequest` values and classifies `HttpResponse` values
//!   without touching the network, so the whole request pipeline is testable
//!   with canned data.
//! - `transport` executes requests; `ReqwestTransport` is the default session.
//! - `client` glues the two together, enforces the timeout and manages the
//!   session lifecycle.
//! - Failures are a single `NedError`, grouped by `ErrorKind` into
//!   authentication, connection and unexpected-response errors.
//!
//! ```no_run
//! # async fn run() -> nednl::Result<()> {
//! let client = nednl::NedNl::new("YOUR_API_KEY");
//! for point in client.all_points().await? {
//!     println!("{} ({})", point.name, point.short_name);
//! }
//! client.close().await;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use api::{NedApi, Resource, UtilizationFilter};
pub use client::{NedNl, NedNlBuilder};
pub use config::NedConfig;
pub use error::{ErrorKind, NedError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{ReqwestTransport, Transport, TransportError};
pub use types::{
    Activity, Classification, Envelope, Granularity, GranularityTimezone, Point, Type,
    Utilization,
};

/// Result type for NED NL operations.
pub type Result<T> = std::result::Result<T, NedError>;

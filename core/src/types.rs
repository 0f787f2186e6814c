//! Domain records returned by the NED NL API.
//!
//! # Design
//! List endpoints answer with a Hydra collection. `Envelope<T>` keeps only
//! the member list and the total count; the JSON-LD bookkeeping keys
//! (`@context`, `@id`, `hydra:view`, ...) are ignored. Records use the
//! service's own JSON keys via serde renames, so they serialize back to the
//! same shape they were read from.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A Hydra collection wrapping one page of records.
///
/// `total_items` is reported by the service and is not checked against
/// `data.len()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(rename = "hydra:member")]
    pub data: Vec<T>,
    #[serde(rename = "hydra:totalItems")]
    pub total_items: u64,
}

/// Energy flow direction (providing, consuming, import, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: i64,
    pub name: String,
}

/// Whether a record is a forecast, a current value or a backcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub id: i64,
    pub name: String,
}

/// Time resolution of utilization records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Granularity {
    pub id: i64,
    pub name: String,
}

/// Time zone used to bucket utilization records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GranularityTimezone {
    pub id: i64,
    pub name: String,
}

/// A geographic area (country, province, offshore zone).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub id: i64,
    pub name: String,
    #[serde(rename = "nameshort")]
    pub short_name: String,
}

/// An energy source or carrier (wind, solar, natural gas, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Type {
    pub id: i64,
    pub name: String,
    #[serde(rename = "nameshort")]
    pub short_name: String,
}

/// One time-bounded measurement or forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utilization {
    pub id: i64,
    pub capacity: i64,
    pub volume: i64,
    pub percentage: f64,
    pub emission: i64,
    #[serde(rename = "emissionfactor")]
    pub emission_factor: f64,
    #[serde(rename = "validfrom")]
    pub valid_from: DateTime<FixedOffset>,
    #[serde(rename = "validto")]
    pub valid_to: DateTime<FixedOffset>,
    #[serde(rename = "lastupdate")]
    pub last_update: DateTime<FixedOffset>,
}

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Request and view types for the accident map server.
//!
//! View types are what the client-side map and chart libraries consume.
//! They are kept apart from the dataset record types so the page contract
//! can evolve independently.

use accident_map_accident_models::LayoutCategory;
use serde::{Deserialize, Serialize};

/// A geographic coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    /// Latitude (WGS84).
    pub lat: f64,
    /// Longitude (WGS84).
    pub lon: f64,
}

/// A single map marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapPoint {
    /// Latitude (WGS84).
    pub lat: f64,
    /// Longitude (WGS84).
    pub lon: f64,
    /// ISO date of the accident (`YYYY-MM-DD`).
    pub label: String,
}

/// Everything the clustered marker map needs to draw itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    /// Initial map center.
    pub center: LatLon,
    /// Initial zoom level.
    pub zoom: u8,
    /// Markers to cluster.
    pub points: Vec<MapPoint>,
}

/// One line of the percent-change chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    /// Road layout this line represents.
    pub category: LayoutCategory,
    /// `(year, percent change)` pairs; `None` is drawn as a gap.
    pub points: Vec<(i32, Option<f64>)>,
}

/// Raw filter form fields, exactly as submitted.
///
/// Used for both the urlencoded `POST /filter` body and the
/// `GET /api/points` query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FilterForm {
    /// Start of the date range (`YYYY-MM-DD`).
    pub start_date: Option<String>,
    /// End of the date range (`YYYY-MM-DD`).
    pub end_date: Option<String>,
    /// Federal highway number.
    pub br_filter: Option<String>,
}

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// Error body returned by the JSON endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable message.
    pub error: String,
}

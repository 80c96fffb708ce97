#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Disaster report types and the category style table.
//!
//! This crate defines the disaster category taxonomy shared by every view
//! of the disaster map. Markers, sidebar cards and the legend all resolve
//! their color, icon and label through the single [`CATEGORY_STYLES`]
//! table so the three never drift apart.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Status value that marks a report as the current, ongoing disaster.
pub const CURRENT_STATUS: &str = "Terkini";

/// Status label applied to reports that arrive without a status.
pub const FALLBACK_STATUS: &str = "Pasca Bencana";

/// Disaster categories known to the map.
///
/// The string form is the wire value stored by the remote report service.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum DisasterCategory {
    /// Tsunami waves
    #[serde(rename = "Tsunami")]
    #[strum(serialize = "Tsunami")]
    Tsunami,
    /// Earthquakes and tremors
    #[serde(rename = "Earthquake")]
    #[strum(serialize = "Earthquake")]
    Earthquake,
    /// River and flash floods
    #[serde(rename = "Flood")]
    #[strum(serialize = "Flood")]
    Flood,
    /// Volcanic eruptions
    #[serde(rename = "Volcanic Eruption")]
    #[strum(serialize = "Volcanic Eruption")]
    VolcanicEruption,
    /// Forest and land fires
    #[serde(rename = "Forest Fire")]
    #[strum(serialize = "Forest Fire")]
    ForestFire,
    /// Anything not fitting the categories above
    #[serde(rename = "Lainnya")]
    #[strum(serialize = "Lainnya")]
    Other,
}

impl DisasterCategory {
    /// Resolves a raw wire value, falling back to [`Self::Other`] for
    /// anything unrecognized.
    #[must_use]
    pub fn from_wire(value: &str) -> Self {
        value.trim().parse().unwrap_or(Self::Other)
    }

    /// Returns the style entry for this category.
    #[must_use]
    pub fn style(self) -> &'static CategoryStyle {
        &CATEGORY_STYLES[self as usize]
    }

    /// Returns all variants of this enum, in legend order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Tsunami,
            Self::Earthquake,
            Self::Flood,
            Self::VolcanicEruption,
            Self::ForestFire,
            Self::Other,
        ]
    }
}

/// Display attributes for a single category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryStyle {
    /// The category this entry styles.
    pub category: DisasterCategory,
    /// CSS color used for markers, card borders and badges.
    pub color: &'static str,
    /// Font Awesome icon class.
    pub icon: &'static str,
    /// Human-readable label shown in the UI.
    pub label: &'static str,
}

/// The category style table, indexed by [`DisasterCategory`] discriminant.
pub static CATEGORY_STYLES: [CategoryStyle; 6] = [
    CategoryStyle {
        category: DisasterCategory::Tsunami,
        color: "#4361ee",
        icon: "fa-solid fa-water",
        label: "Tsunami",
    },
    CategoryStyle {
        category: DisasterCategory::Earthquake,
        color: "#ffc300",
        icon: "fa-solid fa-house-crack",
        label: "Gempa Bumi",
    },
    CategoryStyle {
        category: DisasterCategory::Flood,
        color: "#2ec4b6",
        icon: "fa-solid fa-umbrella",
        label: "Banjir",
    },
    CategoryStyle {
        category: DisasterCategory::VolcanicEruption,
        color: "#ef233c",
        icon: "fa-solid fa-fire",
        label: "Gunung Meletus",
    },
    CategoryStyle {
        category: DisasterCategory::ForestFire,
        color: "#fb3600ff",
        icon: "fa-solid fa-tree",
        label: "Kebakaran Hutan",
    },
    CategoryStyle {
        category: DisasterCategory::Other,
        color: "#8d99ae",
        icon: "fa-solid fa-circle-exclamation",
        label: "Lainnya",
    },
];

/// Looks up the style for a raw category value. Unknown values resolve to
/// the "Other" entry.
#[must_use]
pub fn style_for(category: &str) -> &'static CategoryStyle {
    DisasterCategory::from_wire(category).style()
}

/// Opaque report identifier.
///
/// The report service has returned both numeric and string ids, so both
/// are accepted and normalized to their string form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ReportId(pub String);

impl std::fmt::Display for ReportId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ReportId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for ReportId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Int(i64),
            Float(f64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => Self(s),
            RawId::Int(n) => Self(n.to_string()),
            RawId::Float(n) => Self(n.to_string()),
        })
    }
}

/// A WGS84 position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a coordinate from latitude and longitude.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// GeoJSON-style point as stored by the report service.
///
/// `coordinates` is ordered `[longitude, latitude]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// GeoJSON geometry type, normally `"Point"`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Position as `[longitude, latitude]`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub coordinates: Vec<f64>,
}

impl GeoPoint {
    /// Builds a `Point` geometry from a coordinate.
    #[must_use]
    pub fn point(coordinate: Coordinate) -> Self {
        Self {
            kind: Some("Point".to_string()),
            coordinates: vec![coordinate.longitude, coordinate.latitude],
        }
    }

    /// Returns the position if both components are present and finite.
    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        match self.coordinates.as_slice() {
            [lng, lat, ..] if lng.is_finite() && lat.is_finite() => {
                Some(Coordinate::new(*lat, *lng))
            }
            _ => None,
        }
    }
}

/// A disaster report as returned by the report service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Unique report id.
    #[serde(alias = "_id")]
    pub id: ReportId,
    /// Short title of the report.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Free-form description.
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Raw category wire value (see [`DisasterCategory`]).
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    /// Report status; [`CURRENT_STATUS`] is highlighted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_bencana: Option<String>,
    /// Location of the disaster. Reports without one cannot be mapped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    /// When the report was created, if the service provides it.
    #[serde(
        default,
        alias = "createdAt",
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

impl Report {
    /// Resolves the report's category, falling back to
    /// [`DisasterCategory::Other`].
    #[must_use]
    pub fn category(&self) -> DisasterCategory {
        DisasterCategory::from_wire(&self.category)
    }

    /// Returns the style entry for this report's category.
    #[must_use]
    pub fn style(&self) -> &'static CategoryStyle {
        self.category().style()
    }

    /// Returns the report position, if it has a usable one.
    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        self.location.as_ref().and_then(GeoPoint::coordinate)
    }

    /// Returns the report status, substituting `fallback` when absent or
    /// blank.
    #[must_use]
    pub fn status_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self.status_bencana.as_deref() {
            Some(status) if !status.trim().is_empty() => status,
            _ => fallback,
        }
    }

    /// Builds the report the service would store for `payload`.
    #[must_use]
    pub fn from_payload(id: ReportId, payload: &CreateReportPayload) -> Self {
        Self {
            id,
            name: payload.name.clone(),
            description: payload.description.clone(),
            category: payload.category.clone(),
            status_bencana: Some(payload.status_bencana.clone()),
            location: Some(GeoPoint::point(Coordinate::new(
                payload.latitude,
                payload.longitude,
            ))),
            created_at: None,
        }
    }
}

/// Body of a create (or update) request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateReportPayload {
    /// Short title of the report.
    pub name: String,
    /// Category wire value.
    pub category: String,
    /// Free-form description.
    pub description: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Report status.
    pub status_bencana: String,
}

/// Treats an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    let raw: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc)))
}

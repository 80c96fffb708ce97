#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! View value types for the disaster map.
//!
//! The render engine projects reports into these types and hands them to
//! the map, sidebar and notification surfaces. They are plain data so the
//! surfaces can be a browser widget, a terminal printer or a test recorder.

use disaster_map_disaster_models::{CategoryStyle, Coordinate, DisasterCategory, ReportId};
use serde::Serialize;

/// Initial map view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    /// View center.
    pub center: Coordinate,
    /// Zoom level.
    pub zoom: u8,
    /// Tile URL template.
    pub tile_url: String,
    /// Tile attribution.
    pub attribution: String,
    /// Highest zoom the tiles support.
    pub max_zoom: u8,
}

/// Circle marker paint options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerPaint {
    /// Radius in pixels.
    pub radius: f64,
    /// Fill color.
    pub fill_color: &'static str,
    /// Stroke color.
    pub stroke_color: &'static str,
    /// Stroke width in pixels.
    pub weight: f64,
    /// Stroke opacity.
    pub opacity: f64,
    /// Fill opacity.
    pub fill_opacity: f64,
}

impl MarkerPaint {
    /// Standard report marker in the given category style.
    #[must_use]
    pub const fn for_style(style: &CategoryStyle) -> Self {
        Self {
            radius: 8.0,
            fill_color: style.color,
            stroke_color: "#fff",
            weight: 2.0,
            opacity: 1.0,
            fill_opacity: 0.8,
        }
    }
}

/// Content of a marker popup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopupContent {
    /// Category label, painted in `color`.
    pub category_label: &'static str,
    /// Category color.
    pub color: &'static str,
    /// Report name.
    pub name: String,
    /// Report description.
    pub description: String,
    /// Effective report status.
    pub status: String,
}

/// A marker to place on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerSpec {
    /// Report the marker belongs to.
    pub report_id: ReportId,
    /// Marker position.
    pub position: Coordinate,
    /// Paint options.
    pub paint: MarkerPaint,
    /// Popup bound to the marker.
    pub popup: PopupContent,
}

/// Badge shown next to a card title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusBadge {
    /// Badge text.
    pub text: &'static str,
    /// Badge color.
    pub color: &'static str,
}

/// Badge used for reports with the current status.
pub const CURRENT_BADGE: StatusBadge = StatusBadge {
    text: "(TERKINI)",
    color: "#ef233c",
};

/// "Locate" action attached to a sidebar card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocateAction {
    /// Report to fly to.
    pub report_id: ReportId,
    /// Button label.
    pub label: &'static str,
    /// Button icon.
    pub icon: &'static str,
}

impl LocateAction {
    /// Standard "Lihat" action for `report_id`.
    #[must_use]
    pub fn for_report(report_id: ReportId) -> Self {
        Self {
            report_id,
            label: "Lihat",
            icon: "fa-solid fa-eye",
        }
    }
}

/// A card in the sidebar list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SidebarCard {
    /// Report the card belongs to.
    pub report_id: ReportId,
    /// Report name.
    pub title: String,
    /// Present when the report has the current status.
    pub badge: Option<StatusBadge>,
    /// Left border color.
    pub border_color: &'static str,
    /// Resolved category.
    pub category: DisasterCategory,
    /// Category label.
    pub category_label: &'static str,
    /// Category icon.
    pub category_icon: &'static str,
    /// Report description.
    pub description: String,
    /// Effective report status.
    pub status: String,
    /// Creation time, formatted for display, when known.
    pub reported_at: Option<String>,
    /// Locate action.
    pub locate: LocateAction,
}

/// One legend row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendEntry {
    /// Category the row describes.
    pub category: DisasterCategory,
    /// Swatch color.
    pub color: &'static str,
    /// Icon class.
    pub icon: &'static str,
    /// Label.
    pub label: &'static str,
}

/// Corner a map control is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ControlPosition {
    /// Top left.
    TopLeft,
    /// Top right.
    TopRight,
    /// Bottom left.
    BottomLeft,
    /// Bottom right.
    BottomRight,
}

/// The category legend control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Legend {
    /// Heading.
    pub title: &'static str,
    /// Anchor corner.
    pub position: ControlPosition,
    /// One row per category.
    pub entries: Vec<LegendEntry>,
}

impl Legend {
    /// Builds the legend from every entry in `styles`.
    #[must_use]
    pub fn from_styles<'a>(styles: impl IntoIterator<Item = &'a CategoryStyle>) -> Self {
        Self {
            title: "Kategori",
            position: ControlPosition::BottomRight,
            entries: styles
                .into_iter()
                .map(|style| LegendEntry {
                    category: style.category,
                    color: style.color,
                    icon: style.icon,
                    label: style.label,
                })
                .collect(),
        }
    }
}

/// Animated map re-centering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlyTo {
    /// Target position.
    pub target: Coordinate,
    /// Target zoom.
    pub zoom: u8,
    /// Animation duration in seconds.
    pub duration_secs: f64,
}

/// Severity of a user notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NoticeLevel {
    /// Operation succeeded.
    Success,
    /// User input needs attention.
    Warning,
    /// Operation failed.
    Error,
}

/// A user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Heading.
    pub title: String,
    /// Body text.
    pub text: String,
}

impl Notice {
    /// Creates a notice.
    #[must_use]
    pub fn new(level: NoticeLevel, title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use disaster_map_disaster_models::CATEGORY_STYLES;

    #[test]
    fn legend_covers_every_category_in_table_order() {
        let legend = Legend::from_styles(&CATEGORY_STYLES);
        let categories: Vec<DisasterCategory> = legend.entries.iter().map(|e| e.category).collect();
        assert_eq!(categories, DisasterCategory::all());
        assert_eq!(legend.position, ControlPosition::BottomRight);
    }

    #[test]
    fn marker_paint_uses_category_color() {
        let paint = MarkerPaint::for_style(DisasterCategory::Flood.style());
        assert_eq!(paint.fill_color, "#2ec4b6");
        assert_eq!(paint.stroke_color, "#fff");
    }

    #[test]
    fn cards_serialize_camel_case() {
        let card = SidebarCard {
            report_id: ReportId::from("1"),
            title: "Banjir".to_string(),
            badge: Some(CURRENT_BADGE),
            border_color: "#2ec4b6",
            category: DisasterCategory::Flood,
            category_label: "Banjir",
            category_icon: "fa-solid fa-umbrella",
            description: String::new(),
            status: "Terkini".to_string(),
            reported_at: None,
            locate: LocateAction::for_report(ReportId::from("1")),
        };
        let value = serde_json::to_value(&card).unwrap();
        assert_eq!(value["borderColor"], serde_json::json!("#2ec4b6"));
        assert_eq!(value["locate"]["reportId"], serde_json::json!("1"));
    }
}

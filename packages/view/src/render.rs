//! Projection of the report store onto the map and the sidebar.
//!
//! Every render is a full redraw: markers and cards are cleared, then the
//! reports that have a position and pass the filter are re-added in store
//! order.

use disaster_map_config::AppConfig;
use disaster_map_disaster_models::{
    CATEGORY_STYLES, CURRENT_STATUS, CategoryStyle, Coordinate, FALLBACK_STATUS, Report, ReportId,
};
use disaster_map_view_models::{
    CURRENT_BADGE, FlyTo, Legend, LocateAction, MapView, MarkerPaint, MarkerSpec, PopupContent,
    SidebarCard,
};

use crate::filter::FilterState;
use crate::surface::{MapSurface, SidebarSurface};

const REPORTED_AT_FORMAT: &str = "%d %b %Y %H:%M";

/// Status conventions and fly-to parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Status that gets the highlight badge.
    pub current_status: String,
    /// Status assumed for reports that carry none.
    pub fallback_status: String,
    /// Zoom used by [`RenderEngine::locate`].
    pub locate_zoom: u8,
    /// Fly-to animation duration in seconds.
    pub fly_duration_secs: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            current_status: CURRENT_STATUS.to_string(),
            fallback_status: FALLBACK_STATUS.to_string(),
            locate_zoom: 14,
            fly_duration_secs: 1.5,
        }
    }
}

impl From<&AppConfig> for RenderOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            current_status: config.report.current_status.clone(),
            fallback_status: config.report.fallback_status.clone(),
            locate_zoom: config.map.locate_zoom,
            fly_duration_secs: config.map.fly_duration_secs,
        }
    }
}

/// Counts from one render pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderSummary {
    /// Reports drawn as a marker and a card.
    pub rendered: usize,
    /// Reports skipped for lacking a usable position.
    pub missing_location: usize,
    /// Reports hidden by the filter.
    pub filtered_out: usize,
}

/// Keeps the map markers and sidebar cards in step with the store.
#[derive(Debug, Default)]
pub struct RenderEngine {
    options: RenderOptions,
    visible: Vec<(ReportId, Coordinate)>,
    legend_installed: bool,
}

impl RenderEngine {
    /// Creates an engine with the given options.
    #[must_use]
    pub const fn new(options: RenderOptions) -> Self {
        Self {
            options,
            visible: Vec::new(),
            legend_installed: false,
        }
    }

    /// Render options in use.
    #[must_use]
    pub const fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Sets the initial view and installs the category legend.
    ///
    /// The legend covers every category regardless of the filter and is
    /// only ever added once.
    pub fn init_map(&mut self, map: &mut dyn MapSurface, view: &MapView) {
        map.set_view(view);
        if !self.legend_installed {
            map.add_legend(Legend::from_styles(&CATEGORY_STYLES));
            self.legend_installed = true;
        }
    }

    /// Redraws markers and cards for `reports` under `filter`.
    pub fn render(
        &mut self,
        reports: &[Report],
        filter: &FilterState,
        map: &mut dyn MapSurface,
        sidebar: &mut dyn SidebarSurface,
    ) -> RenderSummary {
        map.clear_markers();
        sidebar.clear_cards();

        let mut summary = RenderSummary::default();
        let mut visible = Vec::new();

        for report in reports {
            let style = report.style();
            let Some(position) = report.coordinate() else {
                log::debug!("skipping report {} without a location", report.id);
                summary.missing_location += 1;
                continue;
            };
            let status = report.status_or(&self.options.fallback_status);
            if !filter.matches(&report.category, status) {
                summary.filtered_out += 1;
                continue;
            }

            map.place_marker(MarkerSpec {
                report_id: report.id.clone(),
                position,
                paint: MarkerPaint::for_style(style),
                popup: PopupContent {
                    category_label: style.label,
                    color: style.color,
                    name: report.name.clone(),
                    description: report.description.clone(),
                    status: status.to_string(),
                },
            });
            sidebar.append_card(self.card(report, style, status));

            visible.push((report.id.clone(), position));
            summary.rendered += 1;
        }

        self.visible = visible;
        log::debug!(
            "rendered {} reports ({} without location, {} filtered)",
            summary.rendered,
            summary.missing_location,
            summary.filtered_out
        );
        summary
    }

    fn card(&self, report: &Report, style: &'static CategoryStyle, status: &str) -> SidebarCard {
        SidebarCard {
            report_id: report.id.clone(),
            title: report.name.clone(),
            badge: (status == self.options.current_status).then_some(CURRENT_BADGE),
            border_color: style.color,
            category: style.category,
            category_label: style.label,
            category_icon: style.icon,
            description: report.description.clone(),
            status: status.to_string(),
            reported_at: report
                .created_at
                .map(|at| at.format(REPORTED_AT_FORMAT).to_string()),
            locate: LocateAction::for_report(report.id.clone()),
        }
    }

    /// Flies the map to a report drawn by the last render.
    ///
    /// Returns `false`, and leaves the map alone, when `id` is not on the
    /// map.
    pub fn locate(&self, id: &ReportId, map: &mut dyn MapSurface) -> bool {
        let Some((_, target)) = self.visible.iter().find(|(visible, _)| visible == id) else {
            log::debug!("locate ignored: report {id} is not rendered");
            return false;
        };
        map.fly_to(FlyTo {
            target: *target,
            zoom: self.options.locate_zoom,
            duration_secs: self.options.fly_duration_secs,
        });
        true
    }
}

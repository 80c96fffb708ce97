//! Terminal renditions of the map, sidebar, notification and carousel
//! surfaces.

use console::{Color, style};
use disaster_map_carousel::{CarouselSurface, Slide};
use disaster_map_disaster_models::DisasterCategory;
use disaster_map_view::{MapSurface, Notifier, SidebarSurface};
use disaster_map_view_models::{
    FlyTo, Legend, MapView, MarkerSpec, Notice, NoticeLevel, SidebarCard,
};

/// Closest terminal color for a category.
const fn category_color(category: DisasterCategory) -> Color {
    match category {
        DisasterCategory::Tsunami => Color::Blue,
        DisasterCategory::Earthquake => Color::Yellow,
        DisasterCategory::Flood => Color::Cyan,
        DisasterCategory::VolcanicEruption => Color::Red,
        DisasterCategory::ForestFire => Color::Color256(202),
        DisasterCategory::Other => Color::White,
    }
}

/// Map surface that only prints fly-tos and, optionally, the legend.
pub struct TerminalMap {
    print_legend: bool,
}

impl TerminalMap {
    pub const fn new(print_legend: bool) -> Self {
        Self { print_legend }
    }
}

impl MapSurface for TerminalMap {
    fn set_view(&mut self, view: &MapView) {
        log::debug!(
            "map view at {:.4}, {:.4} zoom {}",
            view.center.latitude,
            view.center.longitude,
            view.zoom
        );
    }

    fn clear_markers(&mut self) {
        log::trace!("markers cleared");
    }

    fn place_marker(&mut self, marker: MarkerSpec) {
        log::trace!(
            "marker {} at {:.6}, {:.6} ({})",
            marker.report_id,
            marker.position.latitude,
            marker.position.longitude,
            marker.paint.fill_color
        );
    }

    fn fly_to(&mut self, flight: FlyTo) {
        println!(
            "{} {:.6}, {:.6} (zoom {})",
            style("→").cyan().bold(),
            flight.target.latitude,
            flight.target.longitude,
            flight.zoom
        );
    }

    fn add_legend(&mut self, legend: Legend) {
        if !self.print_legend {
            return;
        }
        println!("{}", style(legend.title).bold());
        for entry in &legend.entries {
            println!(
                "  {} {:<16} {}",
                style("●").fg(category_color(entry.category)),
                entry.label,
                style(entry.color).dim()
            );
        }
    }
}

pub fn card_lines(card: &SidebarCard) -> Vec<String> {
    let color = category_color(card.category);
    let mut title = format!("{} {}", style("●").fg(color), style(&card.title).bold());
    if let Some(badge) = card.badge {
        title.push(' ');
        title.push_str(&style(badge.text).red().bold().to_string());
    }

    let mut meta = format!("{} · {}", style(card.category_label).fg(color), card.status);
    if let Some(at) = &card.reported_at {
        meta.push_str(" · ");
        meta.push_str(at);
    }

    let mut lines = vec![title, format!("  {meta}")];
    if !card.description.is_empty() {
        lines.push(format!("  {}", card.description));
    }
    lines.push(format!(
        "  {}",
        style(format!("{}: {}", card.locate.label, card.report_id)).dim()
    ));
    lines
}

/// Sidebar surface that prints each card as it is appended.
#[derive(Default)]
pub struct TerminalSidebar;

impl SidebarSurface for TerminalSidebar {
    fn clear_cards(&mut self) {}

    fn append_card(&mut self, card: SidebarCard) {
        for line in card_lines(&card) {
            println!("{line}");
        }
    }
}

pub fn notice_line(notice: &Notice) -> String {
    let (mark, color) = match notice.level {
        NoticeLevel::Success => ("✔", Color::Green),
        NoticeLevel::Warning => ("!", Color::Yellow),
        NoticeLevel::Error => ("✖", Color::Red),
    };
    format!(
        "{} {} {}",
        style(mark).fg(color).bold(),
        style(&notice.title).fg(color).bold(),
        notice.text
    )
}

/// Notifier that prints to stderr.
#[derive(Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&mut self, notice: Notice) {
        eprintln!("{}", notice_line(&notice));
    }
}

/// Carousel surface that prints a dot strip and the caption on every
/// slide change.
#[derive(Default)]
pub struct TerminalCarousel {
    indicators: usize,
    caption: String,
}

impl TerminalCarousel {
    fn dots(&self, active: usize) -> String {
        (0..self.indicators)
            .map(|i| if i == active { "●" } else { "○" })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl CarouselSurface for TerminalCarousel {
    fn build_indicators(&mut self, count: usize) {
        self.indicators = count;
    }

    fn show_slide(&mut self, index: usize, _offset_percent: f64, slide: &Slide) {
        log::trace!("slide {index}: {}", slide.src);
        self.caption.clone_from(&slide.caption);
    }

    fn activate_indicator(&mut self, index: usize) {
        println!("{}  {}", style(self.dots(index)).magenta(), self.caption);
    }
}

#[cfg(test)]
mod tests {
    use disaster_map_disaster_models::ReportId;
    use disaster_map_view_models::{CURRENT_BADGE, LocateAction};

    use super::*;

    fn card() -> SidebarCard {
        let style = DisasterCategory::Flood.style();
        SidebarCard {
            report_id: ReportId::from("42"),
            title: "Banjir Jakarta".to_string(),
            badge: Some(CURRENT_BADGE),
            border_color: style.color,
            category: style.category,
            category_label: style.label,
            category_icon: style.icon,
            description: String::new(),
            status: "Terkini".to_string(),
            reported_at: Some("01 Jan 2025 08:00".to_string()),
            locate: LocateAction::for_report(ReportId::from("42")),
        }
    }

    #[test]
    fn card_lines_show_badge_and_locate_id() {
        let lines = card_lines(&card());
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("Banjir Jakarta"));
        assert!(lines[0].contains("(TERKINI)"));
        assert!(lines[1].contains("01 Jan 2025 08:00"));
        assert!(lines[2].contains("Lihat: 42"));
    }

    #[test]
    fn notice_line_includes_title_and_text() {
        let line = notice_line(&Notice::new(
            NoticeLevel::Error,
            "Gagal Menyimpan",
            "Gagal menyimpan data",
        ));
        assert!(line.contains("Gagal Menyimpan"));
        assert!(line.ends_with("Gagal menyimpan data"));
    }

    #[test]
    fn carousel_dots_mark_the_active_slide() {
        let mut carousel = TerminalCarousel::default();
        carousel.build_indicators(3);
        assert_eq!(carousel.dots(1), "○ ● ○");
    }
}

//! Display capabilities consumed by the render engine and the app.
//!
//! Implementations live with the host: a terminal printer in the CLI, the
//! recorders in [`crate::memory`] for tests.

use disaster_map_view_models::{FlyTo, Legend, MapView, MarkerSpec, Notice, SidebarCard};

/// The interactive map.
pub trait MapSurface: Send {
    /// Positions the map and installs the tile layer.
    fn set_view(&mut self, view: &MapView);

    /// Removes every report marker.
    fn clear_markers(&mut self);

    /// Places a marker with its popup bound.
    fn place_marker(&mut self, marker: MarkerSpec);

    /// Animates the map to a new center and zoom.
    fn fly_to(&mut self, flight: FlyTo);

    /// Adds a legend control.
    fn add_legend(&mut self, legend: Legend);
}

/// The report list next to the map.
pub trait SidebarSurface: Send {
    /// Removes every card.
    fn clear_cards(&mut self);

    /// Appends a card at the end of the list.
    fn append_card(&mut self, card: SidebarCard);
}

/// User-facing notifications (alerts, toasts).
pub trait Notifier: Send {
    /// Shows a notice.
    fn notify(&mut self, notice: Notice);
}

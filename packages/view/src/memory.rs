//! Recording surfaces.
//!
//! Each recorder is a cheap clonable handle over shared state, so a test
//! can move one clone into an [`crate::App`] and keep another to inspect
//! what was drawn.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use disaster_map_carousel::{CarouselSurface, Slide};
use disaster_map_view_models::{FlyTo, Legend, MapView, MarkerSpec, Notice, SidebarCard};

use crate::surface::{MapSurface, Notifier, SidebarSurface};

fn lock<T>(state: &Mutex<T>) -> MutexGuard<'_, T> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A call received by a [`MemoryMap`].
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// `set_view`.
    SetView(MapView),
    /// `clear_markers`.
    ClearMarkers,
    /// `place_marker`.
    PlaceMarker(MarkerSpec),
    /// `fly_to`.
    FlyTo(FlyTo),
    /// `add_legend`.
    AddLegend(Legend),
}

#[derive(Debug, Default)]
struct MapState {
    events: Vec<MapEvent>,
    markers: Vec<MarkerSpec>,
}

/// [`MapSurface`] that records every call.
#[derive(Debug, Clone, Default)]
pub struct MemoryMap {
    state: Arc<Mutex<MapState>>,
}

impl MemoryMap {
    /// Every call, in order.
    #[must_use]
    pub fn events(&self) -> Vec<MapEvent> {
        lock(&self.state).events.clone()
    }

    /// Markers currently on the map.
    #[must_use]
    pub fn markers(&self) -> Vec<MarkerSpec> {
        lock(&self.state).markers.clone()
    }

    /// Every legend added.
    #[must_use]
    pub fn legends(&self) -> Vec<Legend> {
        lock(&self.state)
            .events
            .iter()
            .filter_map(|event| match event {
                MapEvent::AddLegend(legend) => Some(legend.clone()),
                _ => None,
            })
            .collect()
    }

    /// Every fly-to requested.
    #[must_use]
    pub fn flights(&self) -> Vec<FlyTo> {
        lock(&self.state)
            .events
            .iter()
            .filter_map(|event| match event {
                MapEvent::FlyTo(flight) => Some(*flight),
                _ => None,
            })
            .collect()
    }
}

impl MapSurface for MemoryMap {
    fn set_view(&mut self, view: &MapView) {
        lock(&self.state).events.push(MapEvent::SetView(view.clone()));
    }

    fn clear_markers(&mut self) {
        let mut state = lock(&self.state);
        state.markers.clear();
        state.events.push(MapEvent::ClearMarkers);
    }

    fn place_marker(&mut self, marker: MarkerSpec) {
        let mut state = lock(&self.state);
        state.markers.push(marker.clone());
        state.events.push(MapEvent::PlaceMarker(marker));
    }

    fn fly_to(&mut self, flight: FlyTo) {
        lock(&self.state).events.push(MapEvent::FlyTo(flight));
    }

    fn add_legend(&mut self, legend: Legend) {
        lock(&self.state).events.push(MapEvent::AddLegend(legend));
    }
}

/// [`SidebarSurface`] that keeps the current card list.
#[derive(Debug, Clone, Default)]
pub struct MemorySidebar {
    cards: Arc<Mutex<Vec<SidebarCard>>>,
}

impl MemorySidebar {
    /// Cards currently listed.
    #[must_use]
    pub fn cards(&self) -> Vec<SidebarCard> {
        lock(&self.cards).clone()
    }
}

impl SidebarSurface for MemorySidebar {
    fn clear_cards(&mut self) {
        lock(&self.cards).clear();
    }

    fn append_card(&mut self, card: SidebarCard) {
        lock(&self.cards).push(card);
    }
}

/// [`Notifier`] that keeps every notice.
#[derive(Debug, Clone, Default)]
pub struct MemoryNotifier {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl MemoryNotifier {
    /// Notices shown so far, oldest first.
    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        lock(&self.notices).clone()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&mut self, notice: Notice) {
        lock(&self.notices).push(notice);
    }
}

/// A call received by a [`MemoryCarousel`].
#[derive(Debug, Clone, PartialEq)]
pub enum CarouselEvent {
    /// `build_indicators`.
    Indicators(usize),
    /// `show_slide`.
    Show(usize, f64),
    /// `activate_indicator`.
    Activate(usize),
}

/// [`CarouselSurface`] that records every call.
#[derive(Debug, Clone, Default)]
pub struct MemoryCarousel {
    events: Arc<Mutex<Vec<CarouselEvent>>>,
}

impl MemoryCarousel {
    /// Every call, in order.
    #[must_use]
    pub fn events(&self) -> Vec<CarouselEvent> {
        lock(&self.events).clone()
    }

    /// Index of the last activated indicator.
    #[must_use]
    pub fn active_indicator(&self) -> Option<usize> {
        lock(&self.events).iter().rev().find_map(|event| match event {
            CarouselEvent::Activate(index) => Some(*index),
            _ => None,
        })
    }
}

impl CarouselSurface for MemoryCarousel {
    fn build_indicators(&mut self, count: usize) {
        lock(&self.events).push(CarouselEvent::Indicators(count));
    }

    fn show_slide(&mut self, index: usize, offset_percent: f64, _slide: &Slide) {
        lock(&self.events).push(CarouselEvent::Show(index, offset_percent));
    }

    fn activate_indicator(&mut self, index: usize) {
        lock(&self.events).push(CarouselEvent::Activate(index));
    }
}

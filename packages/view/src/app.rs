//! Application state and event dispatch.
//!
//! [`App`] owns every piece of view state together with the display
//! surfaces. Hosts translate user input into [`ViewEvent`]s and feed them
//! to [`App::handle`], or hand a channel to [`App::run`].

use std::ops::ControlFlow;
use std::sync::Arc;

use disaster_map_carousel::CarouselSurface;
use disaster_map_client::ReportApi;
use disaster_map_config::AppConfig;
use disaster_map_disaster_models::{Coordinate, Report, ReportId};
use disaster_map_view_models::{MapView, Notice, NoticeLevel};
use tokio::sync::mpsc;

use crate::dashboard::Dashboard;
use crate::filter::FilterState;
use crate::form::{FormController, FormFields, FormOptions, SubmitError};
use crate::render::{RenderEngine, RenderOptions, RenderSummary};
use crate::store::ReportStore;
use crate::surface::{MapSurface, Notifier, SidebarSurface};

const SAVED_TITLE: &str = "Data Tersimpan!";
const SAVED_TEXT: &str = "Data bencana baru telah berhasil ditambahkan.";
const NO_LOCATION_TITLE: &str = "Lokasi Belum Dipilih";
const NO_LOCATION_TEXT: &str =
    "Silakan klik dua kali pada peta atau isi koordinat untuk menentukan lokasi!";
const SAVE_FAILED_TITLE: &str = "Gagal Menyimpan";

/// Something the user did.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    /// Reload reports from the service and redraw.
    Refresh,
    /// Category select changed (`"all"` or a category wire value).
    CategoryFilterChanged(String),
    /// Status select changed (`"all"` or a status).
    StatusFilterChanged(String),
    /// "Lihat" clicked on a sidebar card.
    Locate(ReportId),
    /// Map double-clicked at a position.
    MapDoubleClicked(Coordinate),
    /// "Add" clicked.
    OpenCreateForm,
    /// Form dismissed.
    CloseCreateForm,
    /// Form input changed.
    FormEdited(FormFields),
    /// Form submitted.
    SubmitForm,
    /// Edit requested for a report.
    EditReport(ReportId),
    /// Delete requested for a report.
    DeleteReport(ReportId),
    /// Dashboard tab opened.
    EnterDashboard,
    /// Dashboard tab closed.
    LeaveDashboard,
    /// Pointer entered the carousel.
    CarouselHoverEnter,
    /// Pointer left the carousel.
    CarouselHoverLeave,
    /// Carousel indicator clicked.
    SelectSlide(usize),
    /// Stop handling events.
    Shutdown,
}

/// Display surfaces the app draws on.
pub struct Surfaces {
    /// The map.
    pub map: Box<dyn MapSurface>,
    /// The report list.
    pub sidebar: Box<dyn SidebarSurface>,
    /// Alerts and toasts.
    pub notifier: Box<dyn Notifier>,
    /// The dashboard carousel.
    pub carousel: Box<dyn CarouselSurface>,
}

/// The disaster map application.
pub struct App {
    api: Arc<dyn ReportApi>,
    store: ReportStore,
    filter: FilterState,
    render: RenderEngine,
    form: FormController,
    dashboard: Dashboard,
    map: Box<dyn MapSurface>,
    sidebar: Box<dyn SidebarSurface>,
    notifier: Box<dyn Notifier>,
}

impl App {
    /// Creates the app and initializes the map (view and legend).
    #[must_use]
    pub fn new(config: &AppConfig, api: Arc<dyn ReportApi>, surfaces: Surfaces) -> Self {
        let Surfaces {
            mut map,
            sidebar,
            notifier,
            carousel,
        } = surfaces;

        let mut render = RenderEngine::new(RenderOptions::from(config));
        render.init_map(
            map.as_mut(),
            &MapView {
                center: Coordinate::new(config.map.center_latitude, config.map.center_longitude),
                zoom: config.map.zoom,
                tile_url: config.map.tile_url.clone(),
                attribution: config.map.attribution.clone(),
                max_zoom: config.map.max_zoom,
            },
        );

        Self {
            api,
            store: ReportStore::new(),
            filter: FilterState::new(),
            render,
            form: FormController::new(FormOptions::from(&config.form)),
            dashboard: Dashboard::new(config, carousel),
            map,
            sidebar,
            notifier,
        }
    }

    /// Fetches reports and draws them.
    pub async fn load(&mut self) -> RenderSummary {
        self.store.refresh(self.api.as_ref()).await;
        self.redraw()
    }

    fn redraw(&mut self) -> RenderSummary {
        self.render.render(
            self.store.reports(),
            &self.filter,
            self.map.as_mut(),
            self.sidebar.as_mut(),
        )
    }

    /// Handles one event. Returns [`ControlFlow::Break`] on
    /// [`ViewEvent::Shutdown`].
    pub async fn handle(&mut self, event: ViewEvent) -> ControlFlow<()> {
        log::trace!("handling {event:?}");
        match event {
            ViewEvent::Refresh => {
                self.load().await;
            }
            ViewEvent::CategoryFilterChanged(value) => {
                self.filter.set_category_filter(&value);
                self.redraw();
            }
            ViewEvent::StatusFilterChanged(value) => {
                self.filter.set_status_filter(&value);
                self.redraw();
            }
            ViewEvent::Locate(id) => {
                self.render.locate(&id, self.map.as_mut());
            }
            ViewEvent::MapDoubleClicked(coordinate) => {
                self.form.open_create_form(Some(coordinate));
            }
            ViewEvent::OpenCreateForm => self.form.open_create_form(None),
            ViewEvent::CloseCreateForm => self.form.close(),
            ViewEvent::FormEdited(fields) => {
                if self.form.is_open() {
                    *self.form.fields_mut() = fields;
                } else {
                    log::debug!("ignoring edit to a closed form");
                }
            }
            ViewEvent::SubmitForm => {
                self.submit().await;
            }
            ViewEvent::EditReport(id) => self.form.prepare_edit(&id),
            ViewEvent::DeleteReport(id) => self.form.remove(&id),
            ViewEvent::EnterDashboard => {
                if let Err(e) = self.dashboard.enter() {
                    log::warn!("Failed to start dashboard carousel: {e}");
                }
            }
            ViewEvent::LeaveDashboard => self.dashboard.leave(),
            ViewEvent::CarouselHoverEnter => {
                self.dashboard.hover_enter();
            }
            ViewEvent::CarouselHoverLeave => {
                if let Err(e) = self.dashboard.hover_leave() {
                    log::warn!("Failed to resume carousel: {e}");
                }
            }
            ViewEvent::SelectSlide(index) => {
                if let Err(e) = self.dashboard.select_slide(index) {
                    log::warn!("Ignoring slide selection: {e}");
                }
            }
            ViewEvent::Shutdown => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    /// Submits the create form and reports the outcome to the user.
    pub async fn submit(&mut self) -> Option<Report> {
        let result = self
            .form
            .submit(self.api.as_ref(), &mut self.store, |store| {
                self.render.render(
                    store.reports(),
                    &self.filter,
                    self.map.as_mut(),
                    self.sidebar.as_mut(),
                );
            })
            .await;

        match result {
            Ok(report) => {
                self.notifier
                    .notify(Notice::new(NoticeLevel::Success, SAVED_TITLE, SAVED_TEXT));
                Some(report)
            }
            Err(SubmitError::Validation(e)) => {
                log::debug!("submission rejected: {e}");
                self.notifier.notify(Notice::new(
                    NoticeLevel::Warning,
                    NO_LOCATION_TITLE,
                    NO_LOCATION_TEXT,
                ));
                None
            }
            Err(SubmitError::Remote(e)) => {
                log::error!("Failed to create report: {e}");
                self.notifier.notify(Notice::new(
                    NoticeLevel::Error,
                    SAVE_FAILED_TITLE,
                    e.to_string(),
                ));
                None
            }
            Err(e @ (SubmitError::Busy | SubmitError::NotOpen)) => {
                log::debug!("submission ignored: {e}");
                None
            }
        }
    }

    /// Handles events from `events` until [`ViewEvent::Shutdown`] or the
    /// channel closes, then shuts down.
    pub async fn run(&mut self, mut events: mpsc::Receiver<ViewEvent>) {
        while let Some(event) = events.recv().await {
            if self.handle(event).await.is_break() {
                break;
            }
        }
        self.shutdown();
    }

    /// Stops the carousel and closes the form.
    pub fn shutdown(&mut self) {
        self.dashboard.leave();
        self.form.close();
        log::debug!("app shut down");
    }

    /// The report store.
    #[must_use]
    pub const fn store(&self) -> &ReportStore {
        &self.store
    }

    /// The active filters.
    #[must_use]
    pub const fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// The create form.
    #[must_use]
    pub const fn form(&self) -> &FormController {
        &self.form
    }

    /// The dashboard.
    #[must_use]
    pub const fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::memory::{MapEvent, MemoryCarousel, MemoryMap, MemoryNotifier, MemorySidebar};
    use disaster_map_client::CREATE_FAILED_MESSAGE;
    use disaster_map_client::fake::FakeReportApi;
    use disaster_map_disaster_models::{DisasterCategory, GeoPoint};

    struct Harness {
        app: App,
        api: Arc<FakeReportApi>,
        map: MemoryMap,
        sidebar: MemorySidebar,
        notifier: MemoryNotifier,
    }

    fn report(id: &str, category: &str, position: Option<(f64, f64)>) -> Report {
        Report {
            id: ReportId::from(id),
            name: format!("Laporan {id}"),
            description: String::new(),
            category: category.to_string(),
            status_bencana: Some("Terkini".to_string()),
            location: position.map(|(lat, lng)| GeoPoint::point(Coordinate::new(lat, lng))),
            created_at: None,
        }
    }

    fn harness(reports: Vec<Report>) -> Harness {
        let api = Arc::new(FakeReportApi::with_reports(reports));
        let map = MemoryMap::default();
        let sidebar = MemorySidebar::default();
        let notifier = MemoryNotifier::default();
        let app = App::new(
            &AppConfig::embedded(),
            api.clone(),
            Surfaces {
                map: Box::new(map.clone()),
                sidebar: Box::new(sidebar.clone()),
                notifier: Box::new(notifier.clone()),
                carousel: Box::new(MemoryCarousel::default()),
            },
        );
        Harness {
            app,
            api,
            map,
            sidebar,
            notifier,
        }
    }

    fn fill_form(fields: &mut FormFields) {
        fields.name = "Banjir Bandang".to_string();
        fields.category = "Flood".to_string();
        fields.description = "Sungai meluap".to_string();
    }

    #[tokio::test]
    async fn new_installs_view_and_legend() {
        let h = harness(vec![]);
        let events = h.map.events();
        assert!(matches!(events[0], MapEvent::SetView(ref view) if view.zoom == 5));
        assert_eq!(h.map.legends().len(), 1);
    }

    #[tokio::test]
    async fn load_skips_reports_without_location() {
        let mut h = harness(vec![
            report("1", "Flood", Some((-6.2, 106.8))),
            report("2", "Earthquake", None),
        ]);

        let summary = h.app.load().await;

        assert_eq!(summary.rendered, 1);
        assert_eq!(summary.missing_location, 1);
        assert_eq!(h.app.store().len(), 2);
        assert_eq!(h.sidebar.cards().len(), 1);
    }

    #[tokio::test]
    async fn filter_events_redraw() {
        let mut h = harness(vec![
            report("1", "Flood", Some((-6.2, 106.8))),
            report("2", "Earthquake", Some((-7.8, 110.4))),
        ]);
        h.app.load().await;

        let flow = h
            .app
            .handle(ViewEvent::CategoryFilterChanged("Flood".to_string()))
            .await;
        assert!(flow.is_continue());
        assert_eq!(h.map.markers().len(), 1);
        assert_eq!(h.sidebar.cards().len(), 1);

        h.app
            .handle(ViewEvent::StatusFilterChanged("Pasca Bencana".to_string()))
            .await;
        assert!(h.map.markers().is_empty());

        h.app
            .handle(ViewEvent::CategoryFilterChanged("all".to_string()))
            .await;
        h.app
            .handle(ViewEvent::StatusFilterChanged("all".to_string()))
            .await;
        assert_eq!(h.sidebar.cards().len(), 2);
    }

    #[tokio::test]
    async fn double_click_opens_form_with_coordinates() {
        let mut h = harness(vec![]);
        h.app
            .handle(ViewEvent::MapDoubleClicked(Coordinate::new(-6.175_392, 106.827_153)))
            .await;

        let form = h.app.form();
        assert!(form.is_open());
        assert_eq!(form.fields().latitude, "-6.175392");
        assert_eq!(form.fields().longitude, "106.827153");
        assert_eq!(form.fields().category, "Tsunami");
    }

    #[tokio::test]
    async fn successful_create_renders_new_report_with_category_style() {
        let mut h = harness(vec![report("1", "Earthquake", Some((-7.8, 110.4)))]);
        h.app.load().await;

        h.app
            .handle(ViewEvent::MapDoubleClicked(Coordinate::new(-6.2, 106.8)))
            .await;
        let mut fields = h.app.form().fields().clone();
        fill_form(&mut fields);
        h.app.handle(ViewEvent::FormEdited(fields)).await;
        h.app.handle(ViewEvent::SubmitForm).await;

        assert!(!h.app.form().is_open());
        assert_eq!(h.app.store().len(), 2);
        let cards = h.sidebar.cards();
        let card = cards
            .iter()
            .find(|c| c.title == "Banjir Bandang")
            .expect("new report is listed");
        assert_eq!(card.category, DisasterCategory::Flood);
        assert_eq!(card.border_color, "#2ec4b6");
        assert_eq!(h.map.markers().len(), 2);

        let notices = h.notifier.notices();
        assert_eq!(notices.last().map(|n| n.level), Some(NoticeLevel::Success));
        assert_eq!(notices.last().map(|n| n.title.as_str()), Some("Data Tersimpan!"));
    }

    #[tokio::test]
    async fn failed_create_reports_error_and_keeps_form() {
        let mut h = harness(vec![report("1", "Flood", Some((-6.2, 106.8)))]);
        h.app.load().await;
        h.api.fail_creates_with(Some(CREATE_FAILED_MESSAGE));

        h.app
            .handle(ViewEvent::MapDoubleClicked(Coordinate::new(-6.3, 106.9)))
            .await;
        h.app.handle(ViewEvent::SubmitForm).await;

        assert!(h.app.form().is_open());
        assert!(!h.app.form().button().disabled);
        assert_eq!(h.app.store().len(), 1);
        assert_eq!(h.api.list_calls(), 1);

        let notices = h.notifier.notices();
        assert_eq!(
            notices,
            vec![Notice::new(
                NoticeLevel::Error,
                "Gagal Menyimpan",
                "Gagal menyimpan data"
            )]
        );
    }

    #[tokio::test]
    async fn missing_coordinates_warn_without_network_calls() {
        let mut h = harness(vec![]);
        h.app.handle(ViewEvent::OpenCreateForm).await;
        h.app.handle(ViewEvent::SubmitForm).await;

        assert_eq!(h.api.create_calls(), 0);
        assert!(h.app.form().is_open());
        let notices = h.notifier.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Warning);
        assert_eq!(notices[0].title, "Lokasi Belum Dipilih");
    }

    #[tokio::test]
    async fn locate_flies_to_rendered_report() {
        let mut h = harness(vec![report("7", "Tsunami", Some((-3.3, 128.2)))]);
        h.app.load().await;

        h.app.handle(ViewEvent::Locate(ReportId::from("7"))).await;
        h.app.handle(ViewEvent::Locate(ReportId::from("missing"))).await;

        let flights = h.map.flights();
        assert_eq!(flights.len(), 1);
        assert_eq!(flights[0].target, Coordinate::new(-3.3, 128.2));
    }

    #[tokio::test]
    async fn edit_and_delete_leave_the_service_alone() {
        let mut h = harness(vec![report("1", "Flood", Some((-6.2, 106.8)))]);
        h.app.load().await;

        h.app.handle(ViewEvent::EditReport(ReportId::from("1"))).await;
        h.app.handle(ViewEvent::DeleteReport(ReportId::from("1"))).await;

        assert_eq!(h.api.reports().len(), 1);
        assert!(!h.app.form().is_open());
    }

    #[tokio::test(start_paused = true)]
    async fn dashboard_reentry_runs_one_timer() {
        let mut h = harness(vec![]);
        h.app.handle(ViewEvent::EnterDashboard).await;
        h.app.handle(ViewEvent::LeaveDashboard).await;
        h.app.handle(ViewEvent::EnterDashboard).await;
        h.app.handle(ViewEvent::EnterDashboard).await;

        tokio::time::sleep(Duration::from_millis(5_050)).await;
        assert_eq!(h.app.dashboard().current_slide(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn run_stops_on_shutdown_and_tears_down() {
        let mut h = harness(vec![report("1", "Flood", Some((-6.2, 106.8)))]);
        let (tx, rx) = mpsc::channel(8);

        tx.send(ViewEvent::Refresh).await.unwrap();
        tx.send(ViewEvent::EnterDashboard).await.unwrap();
        tx.send(ViewEvent::OpenCreateForm).await.unwrap();
        tx.send(ViewEvent::Shutdown).await.unwrap();
        tx.send(ViewEvent::CategoryFilterChanged("Tsunami".to_string()))
            .await
            .unwrap();

        h.app.run(rx).await;

        assert_eq!(h.sidebar.cards().len(), 1);
        assert!(!h.app.dashboard().is_active());
        assert!(!h.app.dashboard().is_timer_active());
        assert!(!h.app.form().is_open());
        assert_eq!(h.app.filter().category().to_string(), "all");
    }
}

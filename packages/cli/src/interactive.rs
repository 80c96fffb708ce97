//! Interactive menu.
//!
//! Prompts run on a blocking thread and are turned into [`ViewEvent`]s
//! sent over a channel, while [`App::run`] handles them on the runtime so
//! the carousel keeps ticking while a prompt waits for input.

use dialoguer::{Input, Select};
use disaster_map_config::AppConfig;
use disaster_map_disaster_models::{Coordinate, DisasterCategory, ReportId};
use disaster_map_view::filter::ALL;
use disaster_map_view::form::FormFields;
use disaster_map_view::{App, ViewEvent};
use tokio::sync::mpsc;

enum MenuItem {
    Refresh,
    FilterCategory,
    FilterStatus,
    Locate,
    AddReport,
    Dashboard,
    Quit,
}

impl MenuItem {
    const ALL: &[Self] = &[
        Self::Refresh,
        Self::FilterCategory,
        Self::FilterStatus,
        Self::Locate,
        Self::AddReport,
        Self::Dashboard,
        Self::Quit,
    ];

    const fn label(&self) -> &'static str {
        match self {
            Self::Refresh => "Muat ulang data",
            Self::FilterCategory => "Saring kategori",
            Self::FilterStatus => "Saring status",
            Self::Locate => "Lihat lokasi laporan",
            Self::AddReport => "Tambah laporan",
            Self::Dashboard => "Dashboard",
            Self::Quit => "Keluar",
        }
    }
}

enum DashboardItem {
    Pause,
    Resume,
    GoTo,
    Back,
}

impl DashboardItem {
    const ALL: &[Self] = &[Self::Pause, Self::Resume, Self::GoTo, Self::Back];

    const fn label(&self) -> &'static str {
        match self {
            Self::Pause => "Jeda carousel",
            Self::Resume => "Lanjutkan carousel",
            Self::GoTo => "Pilih slide",
            Self::Back => "Kembali",
        }
    }
}

/// Runs the menu until the user quits.
///
/// # Errors
///
/// Returns an error if a prompt fails or the menu thread panics.
pub async fn run(mut app: App, config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let (tx, rx) = mpsc::channel(16);
    let statuses = config.report.statuses.clone();
    let default_status = config.form.default_status.clone();
    let slide_count = config.carousel.slides.len();

    tx.send(ViewEvent::Refresh).await?;

    let menu = tokio::task::spawn_blocking(move || {
        let result = prompt_loop(&tx, &statuses, &default_status, slide_count);
        // The app loop must finish even after a prompt error.
        tx.blocking_send(ViewEvent::Shutdown).ok();
        result
    });

    log::debug!("interactive menu started");
    app.run(rx).await;

    menu.await?.map_err(Into::into)
}

type PromptResult = Result<(), String>;

fn send(tx: &mpsc::Sender<ViewEvent>, event: ViewEvent) -> PromptResult {
    tx.blocking_send(event).map_err(|e| e.to_string())
}

fn prompt_loop(
    tx: &mpsc::Sender<ViewEvent>,
    statuses: &[String],
    default_status: &str,
    slide_count: usize,
) -> PromptResult {
    let labels: Vec<&str> = MenuItem::ALL.iter().map(MenuItem::label).collect();

    loop {
        let idx = Select::new()
            .with_prompt("Peta Bencana")
            .items(&labels)
            .default(0)
            .interact()
            .map_err(|e| e.to_string())?;

        match MenuItem::ALL[idx] {
            MenuItem::Refresh => send(tx, ViewEvent::Refresh)?,
            MenuItem::FilterCategory => {
                let mut options = vec![ALL.to_string()];
                options.extend(DisasterCategory::all().iter().map(ToString::to_string));
                let choice = select_value("Kategori", &options)?;
                send(tx, ViewEvent::CategoryFilterChanged(choice))?;
            }
            MenuItem::FilterStatus => {
                let mut options = vec![ALL.to_string()];
                options.extend(statuses.iter().cloned());
                let choice = select_value("Status", &options)?;
                send(tx, ViewEvent::StatusFilterChanged(choice))?;
            }
            MenuItem::Locate => {
                let id: String = input("ID laporan")?;
                send(tx, ViewEvent::Locate(ReportId(id)))?;
            }
            MenuItem::AddReport => add_report(tx, statuses, default_status)?,
            MenuItem::Dashboard => dashboard(tx, slide_count)?,
            MenuItem::Quit => return Ok(()),
        }
    }
}

fn select_value(prompt: &str, options: &[String]) -> Result<String, String> {
    let idx = Select::new()
        .with_prompt(prompt)
        .items(options)
        .default(0)
        .interact()
        .map_err(|e| e.to_string())?;
    Ok(options[idx].clone())
}

fn input(prompt: &str) -> Result<String, String> {
    Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .map_err(|e| e.to_string())
}

fn add_report(
    tx: &mpsc::Sender<ViewEvent>,
    statuses: &[String],
    default_status: &str,
) -> PromptResult {
    let name = input("Nama bencana")?;
    let categories: Vec<String> = DisasterCategory::all().iter().map(ToString::to_string).collect();
    let category = select_value("Kategori", &categories)?;
    let description = input("Deskripsi")?;
    let latitude = input("Latitude")?;
    let longitude = input("Longitude")?;
    let status = if statuses.is_empty() {
        default_status.to_string()
    } else {
        select_value("Status", statuses)?
    };

    for event in report_events(FormFields {
        name,
        category,
        description,
        latitude,
        longitude,
        status,
    }) {
        send(tx, event)?;
    }
    Ok(())
}

/// Events for one "add report" round.
///
/// The form is left to close itself after a successful save, so a
/// rejected create keeps it open with the entered values.
fn report_events(fields: FormFields) -> Vec<ViewEvent> {
    // A typed pair behaves like a map pick: the form opens prefilled.
    let picked = fields
        .latitude
        .trim()
        .parse::<f64>()
        .ok()
        .zip(fields.longitude.trim().parse::<f64>().ok());
    let open = match picked {
        Some((lat, lng)) => ViewEvent::MapDoubleClicked(Coordinate::new(lat, lng)),
        None => ViewEvent::OpenCreateForm,
    };

    vec![open, ViewEvent::FormEdited(fields), ViewEvent::SubmitForm]
}

fn dashboard(tx: &mpsc::Sender<ViewEvent>, slide_count: usize) -> PromptResult {
    send(tx, ViewEvent::EnterDashboard)?;
    let labels: Vec<&str> = DashboardItem::ALL.iter().map(DashboardItem::label).collect();

    loop {
        let idx = Select::new()
            .with_prompt("Dashboard")
            .items(&labels)
            .default(0)
            .interact()
            .map_err(|e| e.to_string())?;

        match DashboardItem::ALL[idx] {
            DashboardItem::Pause => send(tx, ViewEvent::CarouselHoverEnter)?,
            DashboardItem::Resume => send(tx, ViewEvent::CarouselHoverLeave)?,
            DashboardItem::GoTo => {
                if slide_count == 0 {
                    continue;
                }
                let options: Vec<String> =
                    (1..=slide_count).map(|n| format!("Slide {n}")).collect();
                let index = Select::new()
                    .with_prompt("Slide")
                    .items(&options)
                    .default(0)
                    .interact()
                    .map_err(|e| e.to_string())?;
                send(tx, ViewEvent::SelectSlide(index))?;
            }
            DashboardItem::Back => return send(tx, ViewEvent::LeaveDashboard),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(latitude: &str, longitude: &str) -> FormFields {
        FormFields {
            name: "Banjir Bekasi".to_string(),
            category: "Flood".to_string(),
            description: String::new(),
            latitude: latitude.to_string(),
            longitude: longitude.to_string(),
            status: "Terkini".to_string(),
        }
    }

    #[test]
    fn add_report_never_closes_the_form_itself() {
        let events = report_events(fields("-6.24", "106.99"));

        assert_eq!(
            events.first(),
            Some(&ViewEvent::MapDoubleClicked(Coordinate::new(-6.24, 106.99)))
        );
        assert_eq!(events.last(), Some(&ViewEvent::SubmitForm));
        assert!(!events.contains(&ViewEvent::CloseCreateForm));
    }

    #[test]
    fn unparsed_coordinates_open_a_blank_form() {
        let events = report_events(fields("abc", "106.99"));

        assert_eq!(events[0], ViewEvent::OpenCreateForm);
        assert_eq!(events[1], ViewEvent::FormEdited(fields("abc", "106.99")));
    }
}

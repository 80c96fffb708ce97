#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal front end for the disaster map.
//!
//! Lists and filters disaster reports, creates new ones, and plays the
//! dashboard carousel, all through the same [`App`] events a graphical
//! host would send. Without a subcommand an interactive menu is shown.
//!
//! Uses `indicatif-log-bridge` (via
//! [`disaster_map_cli_utils::init_logger`]) so that log lines and fetch
//! spinners never fight for the terminal.

mod interactive;
mod terminal;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use disaster_map_cli_utils::{MultiProgress, with_spinner};
use disaster_map_client::ReportApi;
use disaster_map_client::fake::FakeReportApi;
use disaster_map_client::http::HttpReportApi;
use disaster_map_config::AppConfig;
use disaster_map_view::form::FormFields;
use disaster_map_view::{App, Surfaces, ViewEvent};

use crate::terminal::{TerminalCarousel, TerminalMap, TerminalNotifier, TerminalSidebar};

#[derive(Parser)]
#[command(name = "disaster_map", about = "Indonesian disaster report map")]
struct Cli {
    /// Configuration file replacing the built-in defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Use an in-memory report service instead of the remote one
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List reports, optionally filtered
    List {
        /// Category wire value (e.g. "Flood", "Volcanic Eruption") or "all"
        #[arg(long, default_value = "all")]
        category: String,
        /// Report status (e.g. "Terkini") or "all"
        #[arg(long, default_value = "all")]
        status: String,
    },
    /// Print the category legend
    Legend,
    /// Create a report
    Create {
        /// Report title
        #[arg(long)]
        name: String,
        /// Category wire value
        #[arg(long, default_value = "Tsunami")]
        category: String,
        /// Free-form description
        #[arg(long, default_value = "")]
        description: String,
        /// Latitude in degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: String,
        /// Longitude in degrees
        #[arg(long, allow_hyphen_values = true)]
        lng: String,
        /// Report status (defaults to the form default)
        #[arg(long)]
        status: Option<String>,
    },
    /// Show the dashboard and play the media carousel
    Dashboard {
        /// How long to play the carousel
        #[arg(long, default_value = "15")]
        seconds: u64,
    },
}

fn report_api(
    config: &AppConfig,
    offline: bool,
) -> Result<Arc<dyn ReportApi>, Box<dyn std::error::Error>> {
    if offline {
        log::info!("Using the in-memory report service");
        return Ok(Arc::new(FakeReportApi::default()));
    }
    log::debug!("Report service at {}", config.api.base_url);
    Ok(Arc::new(HttpReportApi::new(
        &config.api.base_url,
        config.api.timeout(),
    )?))
}

fn build_app(config: &AppConfig, api: Arc<dyn ReportApi>, print_legend: bool) -> App {
    App::new(
        config,
        api,
        Surfaces {
            map: Box::new(TerminalMap::new(print_legend)),
            sidebar: Box::new(TerminalSidebar),
            notifier: Box::new(TerminalNotifier),
            carousel: Box::new(TerminalCarousel::default()),
        },
    )
}

async fn load(app: &mut App, multi: &MultiProgress) {
    let summary = with_spinner(multi, "Memuat data bencana...", app.load()).await;
    println!();
    println!(
        "{} ditampilkan, {} tanpa lokasi, {} tersaring",
        summary.rendered, summary.missing_location, summary.filtered_out
    );
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = disaster_map_cli_utils::init_logger();
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?;
    let api = report_api(&config, cli.offline)?;

    let Some(command) = cli.command else {
        let app = build_app(&config, api, false);
        return interactive::run(app, &config).await;
    };

    match command {
        Commands::List { category, status } => {
            let mut app = build_app(&config, api, false);
            app.handle(ViewEvent::CategoryFilterChanged(category)).await;
            app.handle(ViewEvent::StatusFilterChanged(status)).await;
            load(&mut app, &multi).await;
        }
        Commands::Legend => {
            let _app = build_app(&config, api, true);
        }
        Commands::Create {
            name,
            category,
            description,
            lat,
            lng,
            status,
        } => {
            let mut app = build_app(&config, api, false);
            app.handle(ViewEvent::OpenCreateForm).await;
            let fields = FormFields {
                name,
                category,
                description,
                latitude: lat,
                longitude: lng,
                status: status.unwrap_or_else(|| config.form.default_status.clone()),
            };
            app.handle(ViewEvent::FormEdited(fields)).await;

            let created = with_spinner(&multi, &config.form.busy_label, app.submit()).await;
            let Some(report) = created else {
                return Err("report was not created".into());
            };
            println!("{} {}", console::style("id").dim(), report.id);
        }
        Commands::Dashboard { seconds } => {
            let mut app = build_app(&config, api, false);
            print_dashboard(&app);
            app.handle(ViewEvent::EnterDashboard).await;
            tokio::time::sleep(Duration::from_secs(seconds)).await;
            app.handle(ViewEvent::LeaveDashboard).await;
        }
    }

    Ok(())
}

fn print_dashboard(app: &App) {
    let dashboard = app.dashboard();
    println!("{}", console::style("Data Korban").bold());
    for stat in dashboard.stats() {
        println!("  {:<20} {}", stat.label, stat.value);
    }
    println!("{}", console::style("Donasi").bold());
    for link in dashboard.donations() {
        println!("  {:<24} {}", link.name, console::style(&link.url).underlined());
    }
    println!();
}

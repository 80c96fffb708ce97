//! The create-report form.
//!
//! Holds the form fields and the submit control, validates coordinates and
//! drives a create against the [`ReportApi`], refreshing the store before
//! handing it back to the caller for rendering.

use disaster_map_client::{ClientError, ReportApi};
use disaster_map_config::FormConfig;
use disaster_map_disaster_models::{
    CURRENT_STATUS, Coordinate, CreateReportPayload, DisasterCategory, Report, ReportId,
};
use thiserror::Error;

use crate::store::ReportStore;

/// Which coordinate failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Latitude is missing or not a finite number.
    #[error("latitude is not a valid number")]
    Latitude,
    /// Longitude is missing or not a finite number.
    #[error("longitude is not a valid number")]
    Longitude,
}

/// Why a submission did not produce a report.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// A submission is already in flight.
    #[error("a submission is already in progress")]
    Busy,

    /// The form is not open.
    #[error("the form is not open")]
    NotOpen,

    /// Input was rejected before contacting the service.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The service rejected the create.
    #[error(transparent)]
    Remote(#[from] ClientError),
}

/// Labels and defaults used when the form is (re)opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormOptions {
    /// Form heading.
    pub title: String,
    /// Category preselected on open.
    pub default_category: String,
    /// Status preselected on open.
    pub default_status: String,
    /// Submit label when idle.
    pub submit_label: String,
    /// Submit label while busy.
    pub busy_label: String,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            title: "Tambah Data Bencana Terkini".to_string(),
            default_category: DisasterCategory::Tsunami.to_string(),
            default_status: CURRENT_STATUS.to_string(),
            submit_label: "Simpan".to_string(),
            busy_label: "Menyimpan...".to_string(),
        }
    }
}

impl From<&FormConfig> for FormOptions {
    fn from(config: &FormConfig) -> Self {
        Self {
            title: config.title.clone(),
            default_category: config.default_category.clone(),
            default_status: config.default_status.clone(),
            submit_label: config.submit_label.clone(),
            busy_label: config.busy_label.clone(),
        }
    }
}

/// Raw form input. Coordinates stay text until submit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    /// Report name.
    pub name: String,
    /// Category wire value.
    pub category: String,
    /// Description.
    pub description: String,
    /// Latitude as typed or picked.
    pub latitude: String,
    /// Longitude as typed or picked.
    pub longitude: String,
    /// Report status.
    pub status: String,
}

impl FormFields {
    /// Fills both coordinates from a map pick, six decimals each.
    pub fn set_coordinate(&mut self, coordinate: Coordinate) {
        self.latitude = format!("{:.6}", coordinate.latitude);
        self.longitude = format!("{:.6}", coordinate.longitude);
    }

    /// Builds the create payload.
    ///
    /// # Errors
    ///
    /// * If either coordinate does not parse as a finite number
    pub fn to_payload(&self) -> Result<CreateReportPayload, ValidationError> {
        let latitude = parse_coordinate(&self.latitude).ok_or(ValidationError::Latitude)?;
        let longitude = parse_coordinate(&self.longitude).ok_or(ValidationError::Longitude)?;
        Ok(CreateReportPayload {
            name: self.name.clone(),
            category: self.category.clone(),
            description: self.description.clone(),
            latitude,
            longitude,
            status_bencana: self.status.clone(),
        })
    }
}

fn parse_coordinate(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// State of the submit control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitButton {
    /// Current label.
    pub label: String,
    /// Whether the control ignores clicks.
    pub disabled: bool,
}

/// Marks the submit control busy until dropped.
struct BusyGuard<'a> {
    button: &'a mut SubmitButton,
    idle_label: String,
}

impl<'a> BusyGuard<'a> {
    fn acquire(button: &'a mut SubmitButton, busy_label: &str) -> Self {
        let idle_label = std::mem::replace(&mut button.label, busy_label.to_string());
        button.disabled = true;
        Self { button, idle_label }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.button.label = std::mem::take(&mut self.idle_label);
        self.button.disabled = false;
    }
}

/// The create-report form.
#[derive(Debug)]
pub struct FormController {
    options: FormOptions,
    fields: FormFields,
    button: SubmitButton,
    open: bool,
}

impl Default for FormController {
    fn default() -> Self {
        Self::new(FormOptions::default())
    }
}

impl FormController {
    /// Creates a closed form.
    #[must_use]
    pub fn new(options: FormOptions) -> Self {
        let button = SubmitButton {
            label: options.submit_label.clone(),
            disabled: false,
        };
        let fields = Self::defaults(&options);
        Self {
            options,
            fields,
            button,
            open: false,
        }
    }

    fn defaults(options: &FormOptions) -> FormFields {
        FormFields {
            category: options.default_category.clone(),
            status: options.default_status.clone(),
            ..FormFields::default()
        }
    }

    /// Opens the form with every field reset to its default.
    ///
    /// Coordinates are kept: `prefill` replaces them when given, otherwise
    /// whatever was already entered stays.
    pub fn open_create_form(&mut self, prefill: Option<Coordinate>) {
        let mut fields = Self::defaults(&self.options);
        fields.latitude = std::mem::take(&mut self.fields.latitude);
        fields.longitude = std::mem::take(&mut self.fields.longitude);
        if let Some(coordinate) = prefill {
            fields.set_coordinate(coordinate);
        }
        self.fields = fields;
        self.open = true;
        log::debug!("create form opened");
    }

    /// Hides the form and clears every field, coordinates included.
    pub fn close(&mut self) {
        self.fields = Self::defaults(&self.options);
        self.open = false;
    }

    /// Whether the form is showing.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Form heading.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.options.title
    }

    /// Current input.
    #[must_use]
    pub const fn fields(&self) -> &FormFields {
        &self.fields
    }

    /// Mutable access to the input.
    pub const fn fields_mut(&mut self) -> &mut FormFields {
        &mut self.fields
    }

    /// Submit control state.
    #[must_use]
    pub const fn button(&self) -> &SubmitButton {
        &self.button
    }

    /// Edits are disabled in the current mode; only logs the request.
    pub fn prepare_edit(&self, id: &ReportId) {
        log::info!("edit requested for report {id}; editing is disabled");
    }

    /// Deletes are disabled in the current mode; only logs the request.
    pub fn remove(&self, id: &ReportId) {
        log::info!("delete requested for report {id}; deleting is disabled");
    }

    /// Validates and submits the form.
    ///
    /// On success the store is refreshed, `on_refreshed` is called with it
    /// (the caller renders there), and the form closes. The submit control
    /// is busy for the whole attempt and restored on every exit.
    ///
    /// # Errors
    ///
    /// * [`SubmitError::NotOpen`] if the form is closed
    /// * [`SubmitError::Busy`] if a submission is already running
    /// * [`SubmitError::Validation`] if a coordinate does not parse; the
    ///   service is not contacted
    /// * [`SubmitError::Remote`] if the service rejects the create; the form
    ///   stays open and the store is untouched
    pub async fn submit<F>(
        &mut self,
        api: &dyn ReportApi,
        store: &mut ReportStore,
        on_refreshed: F,
    ) -> Result<Report, SubmitError>
    where
        F: FnOnce(&ReportStore),
    {
        if !self.open {
            return Err(SubmitError::NotOpen);
        }
        if self.button.disabled {
            return Err(SubmitError::Busy);
        }

        let created = {
            let _busy = BusyGuard::acquire(&mut self.button, &self.options.busy_label);
            let payload = self.fields.to_payload()?;
            let created = api.create_report(&payload).await?;
            store.refresh(api).await;
            created
        };

        log::info!("report {} created", created.id);
        on_refreshed(store);
        self.close();
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use disaster_map_client::CREATE_FAILED_MESSAGE;
    use disaster_map_client::fake::FakeReportApi;

    fn filled(form: &mut FormController, latitude: &str, longitude: &str) {
        form.open_create_form(None);
        let fields = form.fields_mut();
        fields.name = "Banjir Jakarta".to_string();
        fields.category = "Flood".to_string();
        fields.description = "Air setinggi 1 meter".to_string();
        fields.latitude = latitude.to_string();
        fields.longitude = longitude.to_string();
    }

    #[test]
    fn opening_resets_fields_but_keeps_picked_coordinates() {
        let mut form = FormController::default();
        form.open_create_form(Some(Coordinate::new(-6.2, 106.816_666)));
        form.fields_mut().name = "draft".to_string();
        form.fields_mut().category = "Flood".to_string();

        form.open_create_form(None);

        let fields = form.fields();
        assert_eq!(fields.name, "");
        assert_eq!(fields.category, "Tsunami");
        assert_eq!(fields.status, "Terkini");
        assert_eq!(fields.latitude, "-6.200000");
        assert_eq!(fields.longitude, "106.816666");
        assert_eq!(form.title(), "Tambah Data Bencana Terkini");
    }

    #[test]
    fn closing_clears_coordinates() {
        let mut form = FormController::default();
        form.open_create_form(Some(Coordinate::new(-6.2, 106.8)));
        form.close();
        assert!(!form.is_open());
        assert_eq!(form.fields().latitude, "");
        assert_eq!(form.fields().longitude, "");
    }

    #[test]
    fn payload_requires_finite_coordinates() {
        let mut fields = FormFields {
            latitude: "abc".to_string(),
            longitude: "106.8".to_string(),
            ..FormFields::default()
        };
        assert_eq!(fields.to_payload(), Err(ValidationError::Latitude));

        fields.latitude = " -6.2 ".to_string();
        fields.longitude = "NaN".to_string();
        assert_eq!(fields.to_payload(), Err(ValidationError::Longitude));

        fields.longitude = "106.8".to_string();
        let payload = fields.to_payload().unwrap();
        assert!((payload.latitude + 6.2).abs() < f64::EPSILON);
    }

    #[test]
    fn busy_guard_restores_the_button() {
        let mut button = SubmitButton {
            label: "Simpan".to_string(),
            disabled: false,
        };
        {
            let guard = BusyGuard::acquire(&mut button, "Menyimpan...");
            assert!(guard.button.disabled);
            assert_eq!(guard.button.label, "Menyimpan...");
        }
        assert!(!button.disabled);
        assert_eq!(button.label, "Simpan");
    }

    #[tokio::test]
    async fn invalid_latitude_never_reaches_the_service() {
        let api = FakeReportApi::default();
        let mut store = ReportStore::new();
        let mut form = FormController::default();
        filled(&mut form, "abc", "106.8");

        let result = form.submit(&api, &mut store, |_| {}).await;

        assert!(matches!(
            result,
            Err(SubmitError::Validation(ValidationError::Latitude))
        ));
        assert_eq!(api.create_calls(), 0);
        assert_eq!(api.list_calls(), 0);
        assert!(store.is_empty());
        assert!(form.is_open());
        assert!(!form.button().disabled);
        assert_eq!(form.button().label, "Simpan");
    }

    #[tokio::test]
    async fn rejected_create_keeps_form_open_and_store_unchanged() {
        let api = FakeReportApi::default();
        api.fail_creates_with(Some(CREATE_FAILED_MESSAGE));
        let mut store = ReportStore::new();
        let mut form = FormController::default();
        filled(&mut form, "-6.2", "106.8");

        match form.submit(&api, &mut store, |_| {}).await {
            Err(SubmitError::Remote(error)) => {
                assert_eq!(error.to_string(), "Gagal menyimpan data");
            }
            other => panic!("expected a remote error, got {other:?}"),
        }
        assert_eq!(api.list_calls(), 0);
        assert!(store.is_empty());
        assert!(form.is_open());
        assert_eq!(form.fields().name, "Banjir Jakarta");
        assert!(!form.button().disabled);
    }

    #[tokio::test]
    async fn successful_create_refreshes_then_calls_back_then_closes() {
        let api = FakeReportApi::default();
        let mut store = ReportStore::new();
        let mut form = FormController::default();
        filled(&mut form, "-6.2", "106.8");

        let mut seen = None;
        let created = form
            .submit(&api, &mut store, |store| seen = Some(store.len()))
            .await
            .unwrap();

        assert_eq!(seen, Some(1));
        assert_eq!(store.get(&created.id).map(|r| r.name.as_str()), Some("Banjir Jakarta"));
        assert!(!form.is_open());
        assert!(!form.button().disabled);
    }

    #[tokio::test]
    async fn submit_is_rejected_when_closed_or_busy() {
        let api = FakeReportApi::default();
        let mut store = ReportStore::new();
        let mut form = FormController::default();

        assert!(matches!(
            form.submit(&api, &mut store, |_| {}).await,
            Err(SubmitError::NotOpen)
        ));

        filled(&mut form, "-6.2", "106.8");
        form.button.disabled = true;
        assert!(matches!(
            form.submit(&api, &mut store, |_| {}).await,
            Err(SubmitError::Busy)
        ));
        assert_eq!(api.create_calls(), 0);
    }
}

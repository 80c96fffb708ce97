//! In-memory [`ReportApi`] for tests and offline demos.
//!
//! Mirrors the REST service's observable behaviour: lists fail soft,
//! rejected creates carry a message, and created reports show up in the
//! next list. Failures can be injected to exercise the error paths.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use disaster_map_disaster_models::{CreateReportPayload, Report, ReportId};

use crate::{ClientError, ReportApi, UPDATE_FAILED_MESSAGE};

#[derive(Default)]
struct FakeState {
    reports: Vec<Report>,
    next_id: u64,
    fail_lists: bool,
    create_failure: Option<String>,
    list_calls: usize,
    create_calls: usize,
}

/// [`ReportApi`] that keeps reports in memory.
#[derive(Default)]
pub struct FakeReportApi {
    state: Mutex<FakeState>,
}

impl FakeReportApi {
    /// Creates a fake pre-populated with `reports`.
    #[must_use]
    pub fn with_reports(reports: Vec<Report>) -> Self {
        let next_id = reports.len() as u64 + 1;
        Self {
            state: Mutex::new(FakeState {
                reports,
                next_id,
                ..FakeState::default()
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Makes every subsequent list behave like a failed fetch.
    pub fn fail_lists(&self, fail: bool) {
        self.state().fail_lists = fail;
    }

    /// Makes every subsequent create fail with `message`, or succeed again
    /// when `None`.
    pub fn fail_creates_with(&self, message: Option<&str>) {
        self.state().create_failure = message.map(String::from);
    }

    /// Number of list calls received so far.
    #[must_use]
    pub fn list_calls(&self) -> usize {
        self.state().list_calls
    }

    /// Number of create calls received so far.
    #[must_use]
    pub fn create_calls(&self) -> usize {
        self.state().create_calls
    }

    /// Snapshot of the stored reports.
    #[must_use]
    pub fn reports(&self) -> Vec<Report> {
        self.state().reports.clone()
    }
}

#[async_trait]
impl ReportApi for FakeReportApi {
    async fn list_reports(&self) -> Vec<Report> {
        let mut state = self.state();
        state.list_calls += 1;
        if state.fail_lists {
            log::error!("Error fetching reports: simulated failure");
            return Vec::new();
        }
        state.reports.clone()
    }

    async fn create_report(&self, payload: &CreateReportPayload) -> Result<Report, ClientError> {
        let mut state = self.state();
        state.create_calls += 1;

        if let Some(message) = state.create_failure.clone() {
            return Err(ClientError::Rejected {
                status: 500,
                message,
            });
        }

        let id = ReportId(state.next_id.to_string());
        state.next_id += 1;
        let report = Report::from_payload(id, payload);
        state.reports.push(report.clone());
        Ok(report)
    }

    async fn update_report(
        &self,
        id: &ReportId,
        payload: &CreateReportPayload,
    ) -> Result<Report, ClientError> {
        let mut state = self.state();
        let Some(slot) = state.reports.iter_mut().find(|r| &r.id == id) else {
            return Err(ClientError::Rejected {
                status: 404,
                message: UPDATE_FAILED_MESSAGE.to_string(),
            });
        };
        *slot = Report::from_payload(id.clone(), payload);
        Ok(slot.clone())
    }

    async fn delete_report(&self, id: &ReportId) -> bool {
        let mut state = self.state();
        let before = state.reports.len();
        state.reports.retain(|r| &r.id != id);
        state.reports.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(name: &str) -> CreateReportPayload {
        CreateReportPayload {
            name: name.to_string(),
            category: "Flood".to_string(),
            description: String::new(),
            latitude: -6.2,
            longitude: 106.8,
            status_bencana: "Terkini".to_string(),
        }
    }

    #[tokio::test]
    async fn created_reports_appear_in_next_list() {
        let api = FakeReportApi::default();
        let created = api.create_report(&payload("Banjir")).await.unwrap();

        let listed = api.list_reports().await;
        assert_eq!(listed, vec![created]);
        assert_eq!(api.create_calls(), 1);
        assert_eq!(api.list_calls(), 1);
    }

    #[tokio::test]
    async fn injected_create_failure_leaves_store_untouched() {
        let api = FakeReportApi::default();
        api.fail_creates_with(Some("Gagal menyimpan data"));

        let err = api.create_report(&payload("Banjir")).await.unwrap_err();
        assert_eq!(err.to_string(), "Gagal menyimpan data");
        assert!(api.reports().is_empty());
    }

    #[tokio::test]
    async fn failed_list_is_empty() {
        let api = FakeReportApi::default();
        api.create_report(&payload("Banjir")).await.unwrap();
        api.fail_lists(true);
        assert!(api.list_reports().await.is_empty());
    }

    #[tokio::test]
    async fn delete_reports_whether_anything_was_removed() {
        let api = FakeReportApi::default();
        let created = api.create_report(&payload("Banjir")).await.unwrap();
        assert!(api.delete_report(&created.id).await);
        assert!(!api.delete_report(&created.id).await);
    }
}

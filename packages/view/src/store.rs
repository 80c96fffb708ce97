//! The in-memory report collection.

use disaster_map_client::ReportApi;
use disaster_map_disaster_models::{Report, ReportId};

/// Reports as last fetched from the report service.
///
/// Replaced wholesale on every refresh; there is no incremental diffing.
#[derive(Debug, Default)]
pub struct ReportStore {
    reports: Vec<Report>,
}

impl ReportStore {
    /// Creates an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            reports: Vec::new(),
        }
    }

    /// Replaces the contents with a fresh list from `api`, returning the
    /// new report count. A failed fetch empties the store.
    pub async fn refresh(&mut self, api: &dyn ReportApi) -> usize {
        self.reports = api.list_reports().await;
        log::debug!("Report store refreshed: {} reports", self.reports.len());
        self.reports.len()
    }

    /// Reports in service order.
    #[must_use]
    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    /// Looks up a report by id.
    #[must_use]
    pub fn get(&self, id: &ReportId) -> Option<&Report> {
        self.reports.iter().find(|r| &r.id == id)
    }

    /// Number of reports.
    #[must_use]
    pub fn len(&self) -> usize {
        self.reports.len()
    }

    /// Whether the store holds no reports.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}

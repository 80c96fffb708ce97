//! REST implementation of [`ReportApi`].
//!
//! Endpoints, relative to the collection URL:
//!
//! | Operation | Method | Path        |
//! |-----------|--------|-------------|
//! | list      | GET    | `/`         |
//! | create    | POST   | `/`         |
//! | update    | PUT    | `/{id}`     |
//! | delete    | DELETE | `/{id}`     |

use std::time::Duration;

use async_trait::async_trait;
use disaster_map_disaster_models::{CreateReportPayload, Report, ReportId};

use crate::{
    CREATE_FAILED_MESSAGE, ClientError, ReportApi, UPDATE_FAILED_MESSAGE, rejection_message, retry,
};

/// [`ReportApi`] backed by the REST report service.
pub struct HttpReportApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpReportApi {
    /// Creates a client for the collection at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying HTTP client cannot
    /// be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("disaster-map/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The collection URL this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn item_url(&self, id: &ReportId) -> String {
        format!("{}/{id}", self.base_url)
    }

    async fn fetch_reports(&self) -> Result<Vec<Report>, ClientError> {
        let body = retry::send_json(|| self.client.get(&self.base_url), retry::MAX_RETRIES).await?;
        parse_reports(body)
    }

    async fn write(
        &self,
        request: reqwest::RequestBuilder,
        fallback: &str,
    ) -> Result<Report, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(ClientError::Rejected {
                status: status.as_u16(),
                message: rejection_message(&text, fallback),
            });
        }

        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl ReportApi for HttpReportApi {
    async fn list_reports(&self) -> Vec<Report> {
        match self.fetch_reports().await {
            Ok(reports) => {
                log::debug!("Fetched {} reports from {}", reports.len(), self.base_url);
                reports
            }
            Err(e) => {
                log::error!("Error fetching reports: {e}");
                Vec::new()
            }
        }
    }

    async fn create_report(&self, payload: &CreateReportPayload) -> Result<Report, ClientError> {
        let request = self.client.post(&self.base_url).json(payload);
        let result = self.write(request, CREATE_FAILED_MESSAGE).await;
        if let Err(e) = &result {
            log::error!("Error creating report: {e}");
        }
        result
    }

    async fn update_report(
        &self,
        id: &ReportId,
        payload: &CreateReportPayload,
    ) -> Result<Report, ClientError> {
        let request = self.client.put(self.item_url(id)).json(payload);
        let result = self.write(request, UPDATE_FAILED_MESSAGE).await;
        if let Err(e) = &result {
            log::error!("Error updating report {id}: {e}");
        }
        result
    }

    async fn delete_report(&self, id: &ReportId) -> bool {
        match self.client.delete(self.item_url(id)).send().await {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                log::error!("Error deleting report {id}: HTTP {}", response.status());
                false
            }
            Err(e) => {
                log::error!("Error deleting report {id}: {e}");
                false
            }
        }
    }
}

/// Parses the list response.
///
/// Entries that do not decode as a report are logged and dropped; the
/// rest of the batch is kept.
///
/// # Errors
///
/// Returns [`ClientError::Json`] if the body is not an array.
pub fn parse_reports(body: serde_json::Value) -> Result<Vec<Report>, ClientError> {
    let entries: Vec<serde_json::Value> = serde_json::from_value(body)?;

    Ok(entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value::<Report>(entry) {
            Ok(report) => Some(report),
            Err(e) => {
                log::warn!("Skipping malformed report at index {index}: {e}");
                None
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_report_array() {
        let body = serde_json::json!([
            {
                "id": 1,
                "name": "Tsunami Palu",
                "description": "Gelombang 3 meter",
                "category": "Tsunami",
                "status_bencana": "Terkini",
                "location": { "type": "Point", "coordinates": [119.87, -0.89] }
            },
            {
                "id": 2,
                "name": "Laporan tanpa lokasi",
                "category": "Flood"
            }
        ]);

        let reports = parse_reports(body).unwrap();
        assert_eq!(reports.len(), 2);
        assert!(reports[0].coordinate().is_some());
        assert!(reports[1].coordinate().is_none());
    }

    #[test]
    fn null_coordinates_do_not_drop_the_batch() {
        let body = serde_json::json!([
            {
                "id": 1,
                "name": "Banjir Bekasi",
                "category": "Flood",
                "location": { "type": "Point", "coordinates": [106.99, -6.24] }
            },
            {
                "id": 2,
                "name": "Titik kosong",
                "category": "Flood",
                "location": { "type": "Point", "coordinates": null }
            }
        ]);

        let reports = parse_reports(body).unwrap();
        assert_eq!(reports.len(), 2);
        assert!(reports[0].coordinate().is_some());
        assert!(reports[1].coordinate().is_none());
    }

    #[test]
    fn null_description_is_read_as_empty() {
        let body = serde_json::json!([
            {
                "id": 1,
                "name": "Banjir Bekasi",
                "description": null,
                "category": "Flood",
                "location": { "type": "Point", "coordinates": [106.99, -6.24] }
            }
        ]);

        let reports = parse_reports(body).unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].description, "");
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let body = serde_json::json!([
            { "name": "Tanpa id", "category": "Flood" },
            "bukan objek",
            {
                "id": 5,
                "name": "Gempa Cianjur",
                "category": "Earthquake",
                "location": { "type": "Point", "coordinates": [107.14, -6.82] }
            }
        ]);

        let reports = parse_reports(body).unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].id, ReportId::from("5"));
    }

    #[test]
    fn rejects_non_array_body() {
        let body = serde_json::json!({ "error": "internal" });
        assert!(matches!(parse_reports(body), Err(ClientError::Json(_))));
    }

    #[test]
    fn trims_trailing_slash_from_base_url() {
        let api = HttpReportApi::new("http://localhost:3000/disasters/", Duration::from_secs(5))
            .unwrap();
        assert_eq!(api.base_url(), "http://localhost:3000/disasters");
        assert_eq!(
            api.item_url(&ReportId::from("9")),
            "http://localhost:3000/disasters/9"
        );
    }
}

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Client for the remote disaster report service.
//!
//! The view layer only ever talks to the service through the [`ReportApi`]
//! trait. [`http::HttpReportApi`] implements it over REST, and
//! [`fake::FakeReportApi`] keeps reports in memory for tests and demos.
//!
//! Reads fail soft: [`ReportApi::list_reports`] yields an empty collection
//! on any error so callers never see a partially loaded dataset. Writes
//! fail hard with a [`ClientError`] carrying the best available message.

pub mod fake;
pub mod http;
pub mod retry;

use async_trait::async_trait;
use disaster_map_disaster_models::{CreateReportPayload, Report, ReportId};
use thiserror::Error;

/// Message shown when a create fails without a server-supplied reason.
pub const CREATE_FAILED_MESSAGE: &str = "Gagal menyimpan data";

/// Message shown when an update fails without a server-supplied reason.
pub const UPDATE_FAILED_MESSAGE: &str = "Gagal update data";

/// Errors from report service operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed at the transport level.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Server answered with a non-success status on a read.
    #[error("HTTP {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// Server rejected a write. `message` is the server's `error` field
    /// when present, otherwise a generic message.
    #[error("{message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Message to present to the user.
        message: String,
    },
}

/// Operations offered by the remote report service.
#[async_trait]
pub trait ReportApi: Send + Sync {
    /// Fetches every report.
    ///
    /// Never fails: transport, status and parse errors are logged and an
    /// empty collection is returned instead.
    async fn list_reports(&self) -> Vec<Report>;

    /// Creates a report.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails or the service rejects
    /// the payload.
    async fn create_report(&self, payload: &CreateReportPayload) -> Result<Report, ClientError>;

    /// Replaces an existing report.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails or the service rejects
    /// the payload.
    async fn update_report(
        &self,
        id: &ReportId,
        payload: &CreateReportPayload,
    ) -> Result<Report, ClientError>;

    /// Deletes a report, returning whether the service confirmed it.
    async fn delete_report(&self, id: &ReportId) -> bool;
}

/// Extracts the user-facing message from a rejected write's body.
///
/// Uses the JSON `error` field when it is a non-empty string, otherwise
/// `fallback`.
#[must_use]
pub fn rejection_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .as_ref()
        .and_then(|v| v.get("error"))
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map_or_else(|| fallback.to_string(), String::from)
}

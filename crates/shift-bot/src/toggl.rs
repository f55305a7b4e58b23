//! Client for the Toggl Track reports API (v3).
//!
//! Only the detailed time entry search is used. Authentication is HTTP Basic
//! with the API token as user name and the literal `api_token` as password.

use std::time::Duration;

use anyhow::{Context, Result};
use shift_engine::{ReportGroup, ReportRequest};
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct ReportsClient {
    client: reqwest::Client,
    search_url: String,
    api_token: String,
}

impl ReportsClient {
    pub fn new(api_url: &str, api_token: &str, workspace_id: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Building reports HTTP client")?;
        Ok(Self {
            client,
            search_url: format!(
                "{}/reports/api/v3/workspace/{}/search/time_entries",
                api_url.trim_end_matches('/'),
                workspace_id
            ),
            api_token: api_token.to_string(),
        })
    }

    /// Search time entries for the request's dates and description.
    ///
    /// A `null` body is treated as an empty result.
    pub async fn search_time_entries(&self, request: &ReportRequest) -> Result<Vec<ReportGroup>> {
        debug!(
            start_date = %request.start_date,
            end_date = %request.end_date,
            description = %request.description,
            "Searching time entries"
        );

        let response = self
            .client
            .post(&self.search_url)
            .basic_auth(&self.api_token, Some("api_token"))
            .json(request)
            .send()
            .await
            .context("Sending time entry search")?
            .error_for_status()
            .context("Time entry search rejected")?;

        let body = response
            .text()
            .await
            .context("Reading time entry search response")?;
        let groups: Option<Vec<ReportGroup>> =
            serde_json::from_str(&body).context("Decoding time entry search response")?;

        Ok(groups.unwrap_or_default())
    }
}

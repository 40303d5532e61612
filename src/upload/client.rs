use std::time::Duration;

use anyhow::Result;
use reqwest::multipart;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::errors::UploadError;
use crate::report::EquipmentRecord;

pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000/api";

/// Fixed request timeout; a request that exceeds it surfaces as Unreachable.
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(10);

/// Wire shape of a successful `POST /upload/` response. The averages are
/// optional: over an empty dataset the service reports them as null.
#[derive(Debug, Deserialize)]
pub struct SummaryResponse {
    pub total_items: u64,
    #[serde(default)]
    pub avg_flowrate: Option<f64>,
    #[serde(default)]
    pub avg_pressure: Option<f64>,
    #[serde(default)]
    pub avg_temperature: Option<f64>,
    pub type_distribution: Map<String, Value>,
    pub data: Option<Vec<EquipmentRecord>>,
}

/// Client for the external aggregation service.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(UPLOAD_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// Base URL from `CHEMVIZ_API_BASE`, falling back to the local default.
    pub fn from_env() -> Result<Self> {
        let base_url =
            std::env::var("CHEMVIZ_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        Self::new(base_url)
    }

    /// Transmit raw CSV bytes as multipart field `file` and decode the
    /// summary. Transport outcomes map onto the UploadError taxonomy: an
    /// error status is ServerError, no response at all is Unreachable, and
    /// everything else (request construction, body decode) is Local.
    pub async fn upload_csv(
        &self,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<SummaryResponse, UploadError> {
        let part = multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str("text/csv")
            .map_err(|err| UploadError::Local(err.to_string()))?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(format!("{}/upload/", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(classify_send_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(UploadError::ServerError(status.as_u16()));
        }

        response
            .json::<SummaryResponse>()
            .await
            .map_err(|err| UploadError::Local(format!("Malformed summary response: {err}")))
    }
}

fn classify_send_error(err: reqwest::Error) -> UploadError {
    if err.is_timeout() || err.is_connect() {
        UploadError::Unreachable
    } else {
        UploadError::Local(err.to_string())
    }
}

use chrono::Utc;
use log::{info, warn};

use crate::errors::UploadError;
use crate::report::{ReportStore, UploadedSummary};
use crate::toast::ToastCenter;

use super::client::ApiClient;

/// The upload-and-report pipeline: gate the file, transmit it, stamp the
/// returned summary, install it as the current report state, and notify.
///
/// Only one upload is expected in flight at a time; the view layer disables
/// submission while a previous invoke is pending.
pub struct UploadPipeline {
    client: ApiClient,
    report: ReportStore,
    toasts: ToastCenter,
}

impl UploadPipeline {
    pub fn new(client: ApiClient, report: ReportStore, toasts: ToastCenter) -> Self {
        Self {
            client,
            report,
            toasts,
        }
    }

    pub async fn submit(
        &self,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadedSummary, UploadError> {
        match self.process(filename, bytes).await {
            Ok(summary) => {
                self.toasts
                    .success(format!("Successfully uploaded {filename}"))
                    .await;
                Ok(summary)
            }
            Err(err) => {
                warn!("Upload of {} failed: {}", filename, err);
                self.toasts.error(err.to_string()).await;
                Err(err)
            }
        }
    }

    async fn process(
        &self,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadedSummary, UploadError> {
        // Gate on the literal extension before any network traffic.
        if !filename.ends_with(".csv") {
            return Err(UploadError::InvalidType);
        }

        info!("Uploading {} ({} bytes)", filename, bytes.len());
        let response = self.client.upload_csv(filename, bytes).await?;

        let summary = UploadedSummary {
            total_items: response.total_items,
            // Absent averages carry through as NaN; displays render them
            // as "-" and JSON serialization turns them back into null.
            avg_flowrate: response.avg_flowrate.unwrap_or(f64::NAN),
            avg_pressure: response.avg_pressure.unwrap_or(f64::NAN),
            avg_temperature: response.avg_temperature.unwrap_or(f64::NAN),
            type_distribution: response.type_distribution,
            rows: response.data,
            source_filename: filename.to_string(),
            received_at: Utc::now(),
        };

        let entry = self.report.install_summary(summary.clone()).await;
        info!(
            "Installed summary for {} ({} items, history id {})",
            entry.filename, entry.total_items, entry.id
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    fn pipeline_against(base_url: &str) -> (UploadPipeline, ReportStore, ToastCenter) {
        let report = ReportStore::new();
        let toasts = ToastCenter::detached();
        let pipeline = UploadPipeline::new(
            ApiClient::new(base_url).unwrap(),
            report.clone(),
            toasts.clone(),
        );
        (pipeline, report, toasts)
    }

    /// Accept one connection, consume the full request, reply with a canned
    /// HTTP response. Returns the base URL to point the client at.
    async fn serve_once(response: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };

            let mut request = Vec::new();
            let mut chunk = [0u8; 4096];
            let mut body_expected = None;
            loop {
                let Ok(n) = socket.read(&mut chunk).await else {
                    break;
                };
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..n]);

                if body_expected.is_none() {
                    if let Some(header_end) =
                        request.windows(4).position(|w| w == b"\r\n\r\n")
                    {
                        let headers = String::from_utf8_lossy(&request[..header_end]);
                        let content_length = headers
                            .lines()
                            .find_map(|line| {
                                let (name, value) = line.split_once(':')?;
                                name.eq_ignore_ascii_case("content-length")
                                    .then(|| value.trim().parse::<usize>().ok())?
                            })
                            .unwrap_or(0);
                        body_expected = Some(header_end + 4 + content_length);
                    }
                }
                if let Some(total) = body_expected {
                    if request.len() >= total {
                        break;
                    }
                }
            }

            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        });

        format!("http://{addr}/api")
    }

    fn http_response(status_line: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    #[tokio::test]
    async fn rejects_non_csv_without_touching_the_network() {
        // An unroutable base: if the pipeline tried the network, the error
        // would be Unreachable rather than InvalidType.
        let (pipeline, report, toasts) = pipeline_against("http://127.0.0.1:1/api");

        let err = pipeline
            .submit("readings.xlsx", b"not a csv".to_vec())
            .await
            .unwrap_err();

        assert!(matches!(err, UploadError::InvalidType));
        assert!(report.current_summary().await.is_none());
        assert!(report.history().await.is_empty());

        let active = toasts.active().await;
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].message, "Please upload a CSV file");
    }

    #[tokio::test]
    async fn successful_upload_installs_summary_and_history() {
        let body = r#"{
            "total_items": 12,
            "avg_flowrate": 41.5,
            "avg_pressure": 3.2,
            "avg_temperature": 78.9,
            "type_distribution": {"Pump": 7, "Valve": 5},
            "data": [{"equipment_name": "P-101", "type": "Pump", "flowrate": 41.5}]
        }"#;
        let base = serve_once(http_response("201 Created", body)).await;
        let (pipeline, report, _toasts) = pipeline_against(&base);

        let summary = pipeline
            .submit("plant-a.csv", b"Name,Type\n".to_vec())
            .await
            .unwrap();

        assert_eq!(summary.total_items, 12);
        assert_eq!(summary.source_filename, "plant-a.csv");
        assert_eq!(summary.rows.as_ref().map(|r| r.len()), Some(1));

        let history = report.history().await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].total_items, 12);
        assert_eq!(history[0].filename, "plant-a.csv");
    }

    #[tokio::test]
    async fn error_status_maps_to_server_error() {
        let base = serve_once(http_response(
            "500 Internal Server Error",
            r#"{"error": "boom"}"#,
        ))
        .await;
        let (pipeline, report, toasts) = pipeline_against(&base);

        let err = pipeline.submit("plant-a.csv", b"x".to_vec()).await.unwrap_err();

        assert!(matches!(err, UploadError::ServerError(500)));
        assert!(report.current_summary().await.is_none());
        assert_eq!(toasts.active().await[0].message, "Server error: 500");
    }

    #[tokio::test]
    async fn connection_refused_maps_to_unreachable() {
        // Bind then drop to obtain a port nothing is listening on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let (pipeline, _report, _toasts) = pipeline_against(&format!("http://{addr}/api"));
        let err = pipeline.submit("plant-a.csv", b"x".to_vec()).await.unwrap_err();

        assert!(matches!(err, UploadError::Unreachable));
    }

    #[tokio::test]
    async fn malformed_response_body_maps_to_local() {
        let base = serve_once(http_response("200 OK", "this is not json")).await;
        let (pipeline, _report, _toasts) = pipeline_against(&base);

        let err = pipeline.submit("plant-a.csv", b"x".to_vec()).await.unwrap_err();

        assert!(matches!(err, UploadError::Local(_)));
    }
}

use std::path::PathBuf;

use log::{info, warn};
use tauri::{AppHandle, Manager, State};

use crate::errors::ExportError;
use crate::AppState;

/// Reconstruct the detail rows as CSV and drop the file into the user's
/// download directory. Returns the written path.
#[tauri::command]
pub async fn export_csv_report(
    app: AppHandle,
    state: State<'_, AppState>,
) -> Result<String, String> {
    let summary = state.report.current_summary().await;
    let artifact = summary
        .as_ref()
        .ok_or(ExportError::NoData)
        .and_then(super::export_csv);

    match artifact {
        Ok(artifact) => match deliver(&app, &artifact.filename, artifact.contents.as_bytes()) {
            Ok(path) => {
                state.toasts.success("CSV downloaded successfully!").await;
                Ok(path.display().to_string())
            }
            Err(err) => {
                state.toasts.error(err.clone()).await;
                Err(err)
            }
        },
        Err(err) => {
            let message = err.to_string();
            state.toasts.error(message.clone()).await;
            Err(message)
        }
    }
}

/// Build the paginated PDF report, embedding the chart snapshots the view
/// layer captured, and drop it into the download directory.
#[tauri::command]
pub async fn export_pdf_report(
    app: AppHandle,
    state: State<'_, AppState>,
    chart_snapshots: Vec<String>,
) -> Result<String, String> {
    state.toasts.info("Generating PDF report...").await;

    let summary = state.report.current_summary().await;
    match super::export_pdf(summary.as_ref(), &chart_snapshots) {
        Ok(artifact) => match deliver(&app, &artifact.filename, &artifact.bytes) {
            Ok(path) => {
                state
                    .toasts
                    .success("PDF report downloaded successfully!")
                    .await;
                Ok(path.display().to_string())
            }
            Err(err) => {
                state.toasts.error(err.clone()).await;
                Err(err)
            }
        },
        Err(err) => {
            let message = err.to_string();
            state.toasts.error(message.clone()).await;
            Err(message)
        }
    }
}

fn deliver(app: &AppHandle, filename: &str, bytes: &[u8]) -> Result<PathBuf, String> {
    let dir = app.path().download_dir().map_err(|err| err.to_string())?;
    let path = dir.join(filename);
    std::fs::write(&path, bytes).map_err(|err| err.to_string())?;
    info!("Wrote export artifact {}", path.display());

    if let Err(err) = tauri_plugin_opener::reveal_item_in_dir(&path) {
        warn!("Could not reveal {} in file manager: {}", path.display(), err);
    }
    Ok(path)
}

use tauri::State;

use crate::report::UploadedSummary;
use crate::AppState;

#[tauri::command]
pub async fn upload_csv(
    state: State<'_, AppState>,
    filename: String,
    contents: Vec<u8>,
) -> Result<UploadedSummary, String> {
    state
        .uploader
        .submit(&filename, contents)
        .await
        .map_err(|e| e.to_string())
}

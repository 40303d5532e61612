use tauri::State;

use crate::AppState;

use super::{
    derive::{derive_distribution_series, derive_parameter_series, DistributionSeries, ParameterSeries},
    models::{UploadHistoryEntry, UploadedSummary},
};

#[tauri::command]
pub async fn get_summary(state: State<'_, AppState>) -> Result<Option<UploadedSummary>, String> {
    Ok(state.report.current_summary().await)
}

#[tauri::command]
pub async fn get_upload_history(
    state: State<'_, AppState>,
) -> Result<Vec<UploadHistoryEntry>, String> {
    Ok(state.report.history().await)
}

#[tauri::command]
pub async fn get_distribution_series(
    state: State<'_, AppState>,
) -> Result<Option<DistributionSeries>, String> {
    Ok(state
        .report
        .current_summary()
        .await
        .map(|summary| derive_distribution_series(&summary)))
}

#[tauri::command]
pub async fn get_parameter_series(
    state: State<'_, AppState>,
) -> Result<Option<ParameterSeries>, String> {
    Ok(state
        .report
        .current_summary()
        .await
        .map(|summary| derive_parameter_series(&summary)))
}

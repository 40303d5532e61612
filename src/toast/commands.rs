use tauri::State;
use uuid::Uuid;

use crate::AppState;

use super::Toast;

#[tauri::command]
pub async fn active_toasts(state: State<'_, AppState>) -> Result<Vec<Toast>, String> {
    Ok(state.toasts.active().await)
}

#[tauri::command]
pub async fn dismiss_toast(state: State<'_, AppState>, id: Uuid) -> Result<bool, String> {
    Ok(state.toasts.dismiss(id).await)
}

use tauri::State;

use crate::AppState;

use super::SessionRecord;

#[tauri::command]
pub async fn restore_session(state: State<'_, AppState>) -> Result<Option<SessionRecord>, String> {
    Ok(state.auth.current())
}

#[tauri::command]
pub async fn sign_in(
    state: State<'_, AppState>,
    email: String,
    password: String,
) -> Result<SessionRecord, String> {
    super::sign_in(&state.auth, &email, &password)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn sign_up(
    state: State<'_, AppState>,
    email: String,
    password: String,
    confirm_password: String,
    name: String,
) -> Result<SessionRecord, String> {
    super::sign_up(&state.auth, &email, &password, &confirm_password, &name)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn logout(state: State<'_, AppState>) -> Result<(), String> {
    super::logout(&state.auth, &state.report).await;
    state.toasts.success("Logged out successfully").await;
    Ok(())
}

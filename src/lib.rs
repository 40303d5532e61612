mod auth;
mod errors;
mod export;
mod report;
mod toast;
mod upload;

use auth::commands::{logout, restore_session, sign_in, sign_up};
use auth::SessionStore;
use export::commands::{export_csv_report, export_pdf_report};
use report::commands::{
    get_distribution_series, get_parameter_series, get_summary, get_upload_history,
};
use report::ReportStore;
use tauri::Manager;
use toast::commands::{active_toasts, dismiss_toast};
use toast::ToastCenter;
use upload::commands::upload_csv;
use upload::{ApiClient, UploadPipeline};

pub(crate) struct AppState {
    pub(crate) auth: SessionStore,
    pub(crate) report: ReportStore,
    pub(crate) uploader: UploadPipeline,
    pub(crate) toasts: ToastCenter,
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Chemical Equipment Visualizer starting up...");

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .setup(|app| {
            let result = (|| -> anyhow::Result<()> {
                let app_data_dir = app
                    .path()
                    .app_data_dir()
                    .map_err(|err| anyhow::anyhow!(err))?;
                std::fs::create_dir_all(&app_data_dir)?;

                let auth = SessionStore::new(app_data_dir.join("session.json"));
                let toasts = ToastCenter::attached(app.handle().clone());
                let report = ReportStore::new();
                let uploader =
                    UploadPipeline::new(ApiClient::from_env()?, report.clone(), toasts.clone());

                app.manage(AppState {
                    auth,
                    report,
                    uploader,
                    toasts,
                });

                Ok(())
            })();

            result.map_err(|err| err.into())
        })
        .invoke_handler(tauri::generate_handler![
            restore_session,
            sign_in,
            sign_up,
            logout,
            upload_csv,
            get_summary,
            get_upload_history,
            get_distribution_series,
            get_parameter_series,
            export_csv_report,
            export_pdf_report,
            active_toasts,
            dismiss_toast,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}

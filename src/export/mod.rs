pub mod commands;
mod csv;
mod pdf;

pub use csv::export_csv;
pub use pdf::export_pdf;

use chrono::Utc;

/// A generated downloadable text file.
#[derive(Debug, Clone)]
pub struct TextArtifact {
    pub filename: String,
    pub contents: String,
}

/// A generated downloadable binary file.
#[derive(Debug, Clone)]
pub struct BinaryArtifact {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Unique token for artifact filenames (millisecond timestamp).
fn artifact_token() -> i64 {
    Utc::now().timestamp_millis()
}

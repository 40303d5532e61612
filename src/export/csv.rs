use csv::{QuoteStyle, WriterBuilder};
use serde_json::Value;

use crate::errors::ExportError;
use crate::report::UploadedSummary;

use super::TextArtifact;

/// Flat CSV reconstruction of the detail rows.
///
/// The first row's field set, in the order it arrived from the service, is
/// the canonical column order. Later rows serialize against that fixed set:
/// missing fields render as the empty string, unknown extra fields are
/// dropped. Every field is quote-wrapped and row order is preserved.
pub fn export_csv(summary: &UploadedSummary) -> Result<TextArtifact, ExportError> {
    let rows = summary
        .rows
        .as_deref()
        .filter(|rows| !rows.is_empty())
        .ok_or(ExportError::NoData)?;

    let columns: Vec<&str> = rows[0].field_names().collect();

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(Vec::new());

    writer
        .write_record(&columns)
        .map_err(|err| ExportError::RenderFailure(err.to_string()))?;
    for row in rows {
        let record: Vec<String> = columns
            .iter()
            .map(|column| field_text(row.field(column)))
            .collect();
        writer
            .write_record(&record)
            .map_err(|err| ExportError::RenderFailure(err.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| ExportError::RenderFailure(err.to_string()))?;
    let contents = String::from_utf8(bytes)
        .map_err(|err| ExportError::RenderFailure(err.to_string()))?;

    let base = summary
        .source_filename
        .strip_suffix(".csv")
        .unwrap_or(&summary.source_filename);
    let filename = format!("processed-{}-{}.csv", base, super::artifact_token());

    Ok(TextArtifact { filename, contents })
}

fn field_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

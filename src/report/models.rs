//! Report-side data models: the summary received from the analysis service
//! plus the upload audit trail shown in the history tab.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One piece of equipment, as returned by the analysis service.
///
/// The schema is open: the service may return fields we have never seen.
/// Rows are kept as order-preserving JSON objects so the CSV re-export can
/// use the first row's field set, in the order it arrived, as the canonical
/// column order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EquipmentRecord(pub Map<String, Value>);

impl EquipmentRecord {
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|k| k.as_str())
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }
}

/// Aggregated result of one successful upload, stamped with its provenance.
///
/// `sum(type_distribution) == total_items` is expected but not enforced here;
/// a mismatch from the service passes through unvalidated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedSummary {
    pub total_items: u64,
    pub avg_flowrate: f64,
    pub avg_pressure: f64,
    pub avg_temperature: f64,
    /// Category name -> item count, in the order the service sent it.
    pub type_distribution: Map<String, Value>,
    pub rows: Option<Vec<EquipmentRecord>>,
    pub source_filename: String,
    pub received_at: DateTime<Utc>,
}

impl UploadedSummary {
    /// Distribution entries coerced to integer counts. Non-numeric values
    /// from the service count as zero rather than failing the whole report.
    pub fn distribution_counts(&self) -> impl Iterator<Item = (&str, u64)> {
        self.type_distribution
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_u64().unwrap_or(0)))
    }
}

/// Lightweight audit record for one successful upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadHistoryEntry {
    pub id: u64,
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
    pub total_items: u64,
}

//! Chart-ready series derived from the current summary. Pure functions: no
//! I/O, no mutation of the input.

use serde::Serialize;

use super::models::UploadedSummary;

pub const PARAMETER_LABELS: [&str; 3] = ["Flowrate", "Pressure", "Temperature"];

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DistributionSeries {
    pub categories: Vec<String>,
    pub counts: Vec<u64>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParameterSeries {
    pub labels: [&'static str; 3],
    pub values: [f64; 3],
}

/// Series for the equipment-distribution bar chart.
///
/// The service returns the distribution as a JSON object whose iteration
/// order is incidental, so a deterministic order is imposed here: count
/// descending, ties broken by category name.
pub fn derive_distribution_series(summary: &UploadedSummary) -> DistributionSeries {
    let mut entries: Vec<(&str, u64)> = summary.distribution_counts().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    DistributionSeries {
        categories: entries.iter().map(|(name, _)| name.to_string()).collect(),
        counts: entries.iter().map(|(_, count)| *count).collect(),
    }
}

/// Series for the average-parameters line chart. The label order is fixed.
pub fn derive_parameter_series(summary: &UploadedSummary) -> ParameterSeries {
    ParameterSeries {
        labels: PARAMETER_LABELS,
        values: [
            summary.avg_flowrate,
            summary.avg_pressure,
            summary.avg_temperature,
        ],
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::{json, Map, Value};

    use super::*;

    fn summary_with_distribution(pairs: &[(&str, u64)]) -> UploadedSummary {
        let mut distribution = Map::new();
        for (name, count) in pairs {
            distribution.insert(name.to_string(), json!(count));
        }
        UploadedSummary {
            total_items: pairs.iter().map(|(_, c)| c).sum(),
            avg_flowrate: 12.5,
            avg_pressure: 3.25,
            avg_temperature: 80.0,
            type_distribution: distribution,
            rows: None,
            source_filename: "plant.csv".to_string(),
            received_at: Utc::now(),
        }
    }

    #[test]
    fn distribution_sorts_by_count_desc_then_name() {
        let summary =
            summary_with_distribution(&[("Valve", 2), ("Pump", 5), ("Reactor", 2), ("Mixer", 9)]);
        let series = derive_distribution_series(&summary);

        assert_eq!(series.categories, ["Mixer", "Pump", "Reactor", "Valve"]);
        assert_eq!(series.counts, [9, 5, 2, 2]);
    }

    #[test]
    fn distribution_treats_non_numeric_counts_as_zero() {
        let mut summary = summary_with_distribution(&[("Pump", 3)]);
        summary
            .type_distribution
            .insert("Compressor".to_string(), Value::String("lots".to_string()));

        let series = derive_distribution_series(&summary);
        assert_eq!(series.categories, ["Pump", "Compressor"]);
        assert_eq!(series.counts, [3, 0]);
    }

    #[test]
    fn parameter_labels_are_fixed_regardless_of_input() {
        let summary = summary_with_distribution(&[]);
        let series = derive_parameter_series(&summary);

        assert_eq!(series.labels, ["Flowrate", "Pressure", "Temperature"]);
        assert_eq!(series.values, [12.5, 3.25, 80.0]);
    }

    #[test]
    fn derivation_does_not_mutate_the_summary() {
        let summary = summary_with_distribution(&[("Pump", 1), ("Valve", 4)]);
        let before = summary.type_distribution.clone();

        let _ = derive_distribution_series(&summary);
        let _ = derive_parameter_series(&summary);

        assert_eq!(summary.type_distribution, before);
    }
}

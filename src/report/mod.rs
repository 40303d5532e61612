pub mod commands;
mod derive;
mod models;
mod store;

pub use derive::{
    derive_distribution_series, derive_parameter_series, DistributionSeries, ParameterSeries,
};
pub use models::{EquipmentRecord, UploadHistoryEntry, UploadedSummary};
pub use store::{ReportStore, MAX_HISTORY_ENTRIES};

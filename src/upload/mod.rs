mod client;
pub mod commands;
mod pipeline;

pub use client::ApiClient;
pub use pipeline::UploadPipeline;

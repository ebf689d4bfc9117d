#![deny(missing_docs)]

//! Core library for the reviewlens analysis service and batch driver.

/// HTTP routing and REST handlers.
pub mod api;
/// Sampled batch runs shared by the `review-batch` binary.
pub mod batch;
/// Environment-driven configuration management.
pub mod config;
/// Review sources: CSV files and the Hugging Face datasets server.
pub mod dataset;
/// Embedding client abstraction and adapters.
pub mod embedding;
/// CSV writers and terminal previews.
pub mod export;
/// Structured logging and tracing setup.
pub mod logging;
/// Pipeline metrics helpers.
pub mod metrics;
/// Per-review orchestration of every analysis stage.
pub mod pipeline;
/// Polarity scoring and sentiment labels.
pub mod sentiment;
/// Summarization client abstraction and adapters.
pub mod summarization;
/// Text cleaning and stopword filtering.
pub mod text;
/// Keyphrase extraction.
pub mod topics;

//! Error types for the prospector.
//!
//! Every failure mode of a mining session is a variant of
//! `ProspectorError`; nothing inside the engine is retried or swallowed.

use thiserror::Error;

use crate::config::SourceType;

/// Main error type for the prospector library.
#[derive(Debug, Error)]
pub enum ProspectorError {
    /// The source descriptor could not be turned into a document.
    #[error("Invalid source '{descriptor}' for source type {source_type}: {reason}")]
    InvalidSource {
        descriptor: String,
        source_type: SourceType,
        reason: String,
    },

    /// Site configuration is missing, incomplete or malformed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A configured attribute (or the forum end) has no registered tester.
    #[error("Missing classifier: `{attribute}` has no tester registered for site \"{site}\"")]
    MissingClassifier { site: String, attribute: String },

    /// `set_state` was called with a name outside the writable whitelist.
    #[error("Cannot set the state of {0}: read-only variable")]
    ReadOnlyState(String),

    /// `set_state` was called with a value of the wrong kind.
    #[error("{name} expected {expected}, got {actual}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// A processor failed to turn a matched element into a value.
    #[error("Failed to extract `{attribute}` for site \"{site}\": {reason}")]
    Extraction {
        site: String,
        attribute: String,
        reason: String,
    },

    /// Pagination kept going past the configured page ceiling.
    #[error("Runaway pagination for site \"{site}\": page {page} exceeds the limit of {max_pages}")]
    RunawayPagination {
        site: String,
        page: usize,
        max_pages: usize,
    },

    /// The mining loop ran more iterations than allowed.
    #[error("Mining for site \"{site}\" exceeded {max_iterations} iterations")]
    IterationLimit { site: String, max_iterations: u64 },

    /// The ore cart cannot be exported.
    #[error("Export failed: {0}")]
    Export(String),

    /// One or more sites of a run failed.
    #[error("{failed} of {total} sites failed")]
    RunFailed { failed: usize, total: usize },

    /// A mining thread of a run panicked.
    #[error("Mining thread for site \"{0}\" panicked")]
    ThreadPanicked(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML deserialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

/// Result type alias for prospector operations.
pub type Result<T> = std::result::Result<T, ProspectorError>;

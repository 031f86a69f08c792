//! Error types for the preview engine.

use thiserror::Error;

/// Failure to interpret a preview dimension such as `"960px"` or `"100%"`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SizeError {
    #[error("empty dimension")]
    Empty,

    #[error("invalid dimension `{0}`: expected `<n>px` or `<n>%`")]
    Invalid(String),
}

/// Failure reported by an external data service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("document `{0}` not found")]
    NotFound(String),

    #[error("service unavailable: {0}")]
    Unavailable(String),

    #[error("{0}")]
    Other(String),
}

/// Failure of a preview-level operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreviewError {
    #[error("neither a template nor a document id has been specified")]
    MissingSource,

    #[error("failed to load document `{id}`: {source}")]
    Load {
        id: String,
        #[source]
        source: ServiceError,
    },

    #[error("unknown widget `{0}`")]
    UnknownWidget(String),
}

/// Failure to produce the data payload of one widget.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    #[error("failed to query attribute data: {0}")]
    Query(#[from] ServiceError),
}

//! Error types for tally-core

use thiserror::Error;

/// Top-level error type for tally-core
#[derive(Error, Debug)]
pub enum TallyError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Oracle error: {0}")]
    Oracle(#[from] OracleError),
}

/// Errors raised while building or querying question catalogs
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Unknown repository tool: {0}")]
    UnknownTool(String),

    #[error("Unknown CI/CD platform: {0}")]
    UnknownCicdPlatform(String),

    #[error("Unknown deployment platform: {0}")]
    UnknownDeploymentPlatform(String),

    #[error("Catalog is empty, nothing to distribute")]
    EmptyCatalog,
}

/// Errors related to assessment sessions
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session not found or expired: {0}")]
    NotFound(String),

    #[error("Question not found in assessment: {0}")]
    UnknownQuestion(String),

    #[error("Assessment already completed: {0}")]
    AlreadyCompleted(String),

    #[error("Shared result not found or expired: {0}")]
    SharedResultNotFound(String),
}

/// Errors from external oracle calls
///
/// These never propagate out of the engine as fatal failures; every caller
/// maps them onto a documented deterministic fallback.
#[derive(Error, Debug)]
pub enum OracleError {
    #[error("Oracle request failed: {0}")]
    Request(String),

    #[error("Oracle returned unusable response: {0}")]
    BadResponse(String),

    #[error("Oracle call timed out after {0}s")]
    Timeout(u64),
}

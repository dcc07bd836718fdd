//! Error types for the page engine

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading and rendering a page
///
/// Malformed entries and unparsable colors are deliberately *not* errors:
/// every missing or invalid field has a defined default so rendering always
/// proceeds for the remaining entries.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to initialize the engine or one of its sources
    #[error("Engine initialization failed: {0}")]
    Initialization(String),

    /// The user document could not be fetched or parsed.
    ///
    /// This is the blocking failure: the caller should surface it to the
    /// user and leave any previously rendered state untouched.
    #[error("Failed to load user document: {0}")]
    DocumentFetch(String),

    /// The external profile could not be fetched or parsed.
    ///
    /// Non-fatal: the controller logs it and renders the rest of the page
    /// without the profile badge.
    #[error("Failed to load external profile: {0}")]
    ProfileFetch(String),

    /// Failed to render content
    #[error("Rendering failed: {0}")]
    Render(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

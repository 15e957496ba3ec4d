//! Error types for webshot
//!
//! This module provides the error type hierarchy using `thiserror`.
//! Validation errors carry the exact messages returned to HTTP clients;
//! everything else is a render-side failure reported with a 500.

use thiserror::Error;

/// The main error type for webshot operations
#[derive(Error, Debug)]
pub enum Error {
    /// Request parameter validation errors (client-caused, HTTP 400)
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Browser lifecycle errors
    #[error("Browser error: {0}")]
    Browser(#[from] BrowserError),

    /// Navigation errors
    #[error("Navigation error: {0}")]
    Navigation(#[from] NavigationError),

    /// Capture errors
    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// ChromiumOxide errors
    #[error("CDP error: {0}")]
    Cdp(String),
}

/// Rejected query parameters.
///
/// The display strings are the HTTP response contract; tests assert on
/// them verbatim.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// `url` missing or empty
    #[error("URL parameter is required")]
    MissingUrl,

    /// `url` present but not parseable as an absolute URL
    #[error("Invalid URL format")]
    InvalidUrl,

    /// `width` outside [1, 4000] or not an integer
    #[error("Width must be between 1 and 4000 pixels")]
    WidthOutOfRange,

    /// `height` outside [1, 4000] or not an integer
    #[error("Height must be between 1 and 4000 pixels")]
    HeightOutOfRange,

    /// `format` not one of png/jpeg
    #[error("Format must be png or jpeg")]
    UnsupportedFormat,

    /// `quality` outside [1, 100] or not an integer
    #[error("Quality must be between 1 and 100")]
    QualityOutOfRange,
}

/// Browser lifecycle and control errors
#[derive(Error, Debug)]
pub enum BrowserError {
    /// Failed to launch browser
    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    /// Browser configuration error
    #[error("Invalid browser configuration: {0}")]
    ConfigError(String),

    /// Failed to create new page/tab
    #[error("Failed to create page: {0}")]
    PageCreationFailed(String),
}

/// Navigation errors
#[derive(Error, Debug)]
pub enum NavigationError {
    /// Navigation timeout
    #[error("Navigation timed out after {0}ms")]
    Timeout(u64),

    /// Page load failed
    #[error("Page load failed: {0}")]
    LoadFailed(String),
}

/// Capture errors
#[derive(Error, Debug)]
pub enum CaptureError {
    /// Screenshot failed
    #[error("Screenshot capture failed: {0}")]
    ScreenshotFailed(String),

    /// Viewport override failed
    #[error("Failed to set viewport: {0}")]
    ViewportFailed(String),
}

/// Result type alias for webshot operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a CDP error from a string
    pub fn cdp<S: Into<String>>(msg: S) -> Self {
        Error::Cdp(msg.into())
    }

    /// True for client-caused failures that map to HTTP 400
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

/// Convert chromiumoxide errors
impl From<chromiumoxide::error::CdpError> for Error {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        Error::Cdp(err.to_string())
    }
}

//! Webshot - URL-to-screenshot HTTP service
//!
//! This crate renders URLs in a shared headless Chromium instance (driven
//! over CDP) and serves the captured image as a downloadable file, along
//! with a small form frontend for building requests.
//!
//! # Architecture
//!
//! ```text
//! HTTP Request ──▶ Validator ──▶ Render Invoker ──▶ Shared Browser (CDP)
//!                     │               │
//!                     ▼               ▼
//!                400 + JSON      page per request:
//!                                viewport → navigate → capture → close
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use webshot::browser::{render, BrowserConfig, SharedBrowser};
//! use webshot::request::ScreenshotRequest;
//! use std::collections::HashMap;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let browser = SharedBrowser::new(BrowserConfig::default());
//!
//!     let mut params = HashMap::new();
//!     params.insert("url".to_string(), "https://example.com".to_string());
//!     let request = ScreenshotRequest::from_query(&params)?;
//!
//!     let image = render(&browser, &request).await?;
//!     println!("Captured {} bytes", image.len());
//!
//!     browser.shutdown().await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod browser;
pub mod error;
pub mod handlers;
pub mod request;

// Re-exports for convenience
pub use browser::{BrowserConfig, SharedBrowser};
pub use error::{Error, Result, ValidationError};
pub use handlers::AppState;
pub use request::{ImageFormat, ScreenshotRequest};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

//! Browser automation module
//!
//! Lifecycle management for the shared headless Chromium instance and
//! per-request page capture, both driven over CDP via ChromiumOxide.

pub mod capture;
pub mod controller;

pub use capture::{render, NAVIGATION_TIMEOUT};
pub use controller::{BrowserConfig, SharedBrowser};

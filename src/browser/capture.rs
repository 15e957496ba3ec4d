//! Per-request page capture
//!
//! Each request gets a fresh page in the shared browser: viewport
//! override, navigation bounded by a timeout, screenshot, and an
//! unconditional page close so failed captures don't leak tabs.

use crate::browser::SharedBrowser;
use crate::error::{CaptureError, NavigationError, Result};
use crate::request::{ImageFormat, ScreenshotRequest};
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Upper bound on navigation, including the post-load settle wait
pub const NAVIGATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Resolves 500ms after the load event, approximating network idle
const READY_SCRIPT: &str = r#"
    new Promise(resolve => {
        const settle = () => setTimeout(() => resolve(true), 500);
        if (document.readyState === 'complete') {
            settle();
        } else {
            window.addEventListener('load', settle);
        }
    })
"#;

/// Render a validated request to image bytes on a fresh page.
#[instrument(skip(browser, request), fields(url = %request.url()))]
pub async fn render(browser: &SharedBrowser, request: &ScreenshotRequest) -> Result<Vec<u8>> {
    let page = browser.page().await?;

    let result = capture(&page, request).await;

    if let Err(e) = page.close().await {
        warn!("Failed to close page: {}", e);
    }

    result
}

async fn capture(page: &Page, request: &ScreenshotRequest) -> Result<Vec<u8>> {
    set_viewport(page, request.width(), request.height()).await?;
    navigate(page, request.url().as_str()).await?;
    screenshot(page, request).await
}

async fn set_viewport(page: &Page, width: u32, height: u32) -> Result<()> {
    let params = SetDeviceMetricsOverrideParams::builder()
        .width(i64::from(width))
        .height(i64::from(height))
        .device_scale_factor(1.0)
        .mobile(false)
        .build()
        .map_err(CaptureError::ViewportFailed)?;

    page.execute(params)
        .await
        .map_err(|e| CaptureError::ViewportFailed(e.to_string()))?;

    Ok(())
}

async fn navigate(page: &Page, url: &str) -> Result<()> {
    info!("Navigating to {}", url);
    let timeout_ms = NAVIGATION_TIMEOUT.as_millis() as u64;

    tokio::time::timeout(NAVIGATION_TIMEOUT, page.goto(url))
        .await
        .map_err(|_| NavigationError::Timeout(timeout_ms))?
        .map_err(|e| NavigationError::LoadFailed(e.to_string()))?;

    tokio::time::timeout(NAVIGATION_TIMEOUT, page.evaluate(READY_SCRIPT))
        .await
        .map_err(|_| NavigationError::Timeout(timeout_ms))?
        .map_err(|e| NavigationError::LoadFailed(e.to_string()))?;

    Ok(())
}

async fn screenshot(page: &Page, request: &ScreenshotRequest) -> Result<Vec<u8>> {
    let format = match request.format() {
        ImageFormat::Png => CaptureScreenshotFormat::Png,
        ImageFormat::Jpeg => CaptureScreenshotFormat::Jpeg,
    };

    let mut builder = ScreenshotParams::builder()
        .format(format)
        .from_surface(true)
        .capture_beyond_viewport(request.full_page());

    // Quality is a JPEG-only knob in CDP
    if request.format() == ImageFormat::Jpeg {
        builder = builder.quality(i64::from(request.quality()));
    }

    let data = page
        .screenshot(builder.build())
        .await
        .map_err(|e| CaptureError::ScreenshotFailed(e.to_string()))?;

    debug!("Screenshot captured: {} bytes", data.len());
    Ok(data)
}

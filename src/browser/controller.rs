//! Browser lifecycle management
//!
//! One Chromium process is shared across all requests. It is launched
//! lazily on first use and terminated only by an explicit [`SharedBrowser::shutdown`];
//! a later request after shutdown relaunches it.

use crate::error::{BrowserError, Result};
use chromiumoxide::browser::{Browser, BrowserConfig as CdpBrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// Chromium flags for container-friendly headless rendering
const DEFAULT_ARGS: &[&str] = &[
    "--no-sandbox",
    "--disable-setuid-sandbox",
    "--disable-dev-shm-usage",
    "--disable-accelerated-2d-canvas",
    "--no-first-run",
    "--no-zygote",
    "--disable-gpu",
];

/// Configuration for browser launch
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Run in headless mode (default: true)
    pub headless: bool,
    /// Path to Chrome/Chromium executable (None = auto-detect)
    pub chrome_path: Option<String>,
    /// Additional Chrome arguments
    pub extra_args: Vec<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            chrome_path: None,
            extra_args: Vec::new(),
        }
    }
}

impl BrowserConfig {
    /// Create a new config builder
    pub fn builder() -> BrowserConfigBuilder {
        BrowserConfigBuilder::default()
    }
}

/// Builder for BrowserConfig
#[derive(Default)]
pub struct BrowserConfigBuilder {
    config: BrowserConfig,
}

impl BrowserConfigBuilder {
    /// Set headless mode
    pub fn headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    /// Set Chrome path
    pub fn chrome_path<S: Into<String>>(mut self, path: S) -> Self {
        self.config.chrome_path = Some(path.into());
        self
    }

    /// Add extra Chrome argument
    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.config.extra_args.push(arg.into());
        self
    }

    /// Build the config
    pub fn build(self) -> BrowserConfig {
        self.config
    }
}

struct BrowserInner {
    browser: Browser,
    handler: JoinHandle<()>,
}

impl BrowserInner {
    async fn launch(config: &BrowserConfig) -> Result<Self> {
        info!("Launching browser, headless={}", config.headless);

        let mut builder = CdpBrowserConfig::builder();

        for arg in DEFAULT_ARGS {
            builder = builder.arg(*arg);
        }

        // chromiumoxide launches headless unless told otherwise
        if !config.headless {
            builder = builder.with_head();
        }

        if let Some(ref path) = config.chrome_path {
            builder = builder.chrome_executable(path);
        }

        for arg in &config.extra_args {
            builder = builder.arg(arg);
        }

        let cdp_config = builder.build().map_err(BrowserError::ConfigError)?;

        let (browser, mut handler) = Browser::launch(cdp_config)
            .await
            .map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;

        // Drive the CDP event stream for the lifetime of the browser.
        // Stream errors are logged, never surfaced to a request.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    warn!("Browser handler event error: {}", e);
                }
            }
            debug!("Browser handler finished");
        });

        info!("Browser launched");

        Ok(Self {
            browser,
            handler: handler_task,
        })
    }
}

/// The process-wide shared browser handle.
///
/// Launch failure leaves the handle empty, so the next request retries
/// the launch; no failure short of [`SharedBrowser::shutdown`] discards a
/// running browser.
pub struct SharedBrowser {
    config: BrowserConfig,
    inner: RwLock<Option<BrowserInner>>,
}

impl SharedBrowser {
    /// Create an un-launched handle; the browser starts on first [`Self::page`]
    pub fn new(config: BrowserConfig) -> Self {
        Self {
            config,
            inner: RwLock::new(None),
        }
    }

    /// Open a new isolated page, launching the browser first if needed.
    ///
    /// Initialization happens under the write lock, so concurrent first
    /// requests wait for a single launch instead of racing.
    #[instrument(skip(self))]
    pub async fn page(&self) -> Result<Page> {
        {
            let guard = self.inner.read().await;
            if let Some(inner) = guard.as_ref() {
                return new_page(&inner.browser).await;
            }
        }

        let mut guard = self.inner.write().await;
        if guard.is_none() {
            *guard = Some(BrowserInner::launch(&self.config).await?);
        }
        let inner = guard
            .as_ref()
            .ok_or_else(|| BrowserError::LaunchFailed("browser handle empty".to_string()))?;
        new_page(&inner.browser).await
    }

    /// True once the browser has been launched and not yet shut down
    pub async fn is_running(&self) -> bool {
        self.inner.read().await.is_some()
    }

    /// Terminate the browser and clear the handle.
    ///
    /// A later [`Self::page`] call relaunches lazily.
    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<()> {
        let inner = self.inner.write().await.take();
        let Some(BrowserInner {
            mut browser,
            handler,
        }) = inner
        else {
            debug!("Shutdown requested but browser was never launched");
            return Ok(());
        };

        info!("Closing browser");
        browser
            .close()
            .await
            .map_err(|e| crate::error::Error::cdp(e.to_string()))?;

        // Bounded wait for the event stream to drain
        let _ = tokio::time::timeout(Duration::from_secs(5), handler).await;

        info!("Browser closed");
        Ok(())
    }
}

async fn new_page(browser: &Browser) -> Result<Page> {
    let page = browser
        .new_page("about:blank")
        .await
        .map_err(|e| BrowserError::PageCreationFailed(e.to_string()))?;
    debug!("Created new page");
    Ok(page)
}

//! WebDriver session setup

use anyhow::{Context, Result};
use fantoccini::{Client, ClientBuilder};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::config::Config;
use crate::screen::Screen;

/// Supported browser types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrowserType {
    /// Mozilla Firefox
    Firefox,
    /// Google Chrome/Chromium
    Chrome,
}

impl std::str::FromStr for BrowserType {
    type Err = anyhow::Error;

    /// Parse browser type from string (case-insensitive)
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "firefox" => Ok(BrowserType::Firefox),
            "chrome" | "chromium" => Ok(BrowserType::Chrome),
            _ => anyhow::bail!("Unsupported browser: {}", s),
        }
    }
}

impl BrowserType {
    /// Default local WebDriver URL for this browser type
    pub fn default_webdriver_url(&self) -> &'static str {
        match self {
            BrowserType::Firefox => "http://localhost:4444",
            BrowserType::Chrome => "http://localhost:9515",
        }
    }

    fn driver_name(&self) -> &'static str {
        match self {
            BrowserType::Firefox => "geckodriver",
            BrowserType::Chrome => "chromedriver",
        }
    }
}

/// Browser viewport dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewportSize {
    /// Viewport width in pixels
    pub width: u32,
    /// Viewport height in pixels
    pub height: u32,
}

impl ViewportSize {
    /// Parse viewport size from "WIDTHxHEIGHT" format (e.g., "1920x1080")
    pub fn parse(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split('x').collect();
        if parts.len() != 2 {
            anyhow::bail!("Invalid viewport format. Use WIDTHxHEIGHT (e.g., 1920x1080)");
        }

        let width = parts[0]
            .parse::<u32>()
            .map_err(|_| anyhow::anyhow!("Invalid width in viewport size"))?;
        let height = parts[1]
            .parse::<u32>()
            .map_err(|_| anyhow::anyhow!("Invalid height in viewport size"))?;

        Ok(ViewportSize { width, height })
    }
}

/// Builds a WebDriver session for a browser
#[derive(Debug, Clone)]
pub struct SessionBuilder {
    browser: BrowserType,
    headless: bool,
    viewport: Option<ViewportSize>,
    webdriver_url: Option<String>,
}

impl SessionBuilder {
    pub fn new(browser: BrowserType) -> Self {
        SessionBuilder {
            browser,
            headless: true,
            viewport: None,
            webdriver_url: None,
        }
    }

    /// Builder from `WDTL_BROWSER`, `WDTL_HEADLESS`, `WDTL_VIEWPORT` and
    /// `WDTL_WEBDRIVER_URL`, read through `lookup`
    pub fn from_env(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let browser = match lookup("WDTL_BROWSER") {
            Some(value) => value.parse()?,
            None => BrowserType::Firefox,
        };
        let mut builder = SessionBuilder::new(browser);

        if let Some(value) = lookup("WDTL_HEADLESS") {
            builder.headless = match value.to_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => anyhow::bail!("Invalid WDTL_HEADLESS: {}", value),
            };
        }
        if let Some(value) = lookup("WDTL_VIEWPORT") {
            builder.viewport = Some(ViewportSize::parse(&value)?);
        }
        builder.webdriver_url = lookup("WDTL_WEBDRIVER_URL");

        Ok(builder)
    }

    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn viewport(mut self, viewport: ViewportSize) -> Self {
        self.viewport = Some(viewport);
        self
    }

    pub fn webdriver_url(mut self, url: impl Into<String>) -> Self {
        self.webdriver_url = Some(url.into());
        self
    }

    pub fn browser(&self) -> BrowserType {
        self.browser
    }

    pub fn url(&self) -> &str {
        self.webdriver_url
            .as_deref()
            .unwrap_or(self.browser.default_webdriver_url())
    }

    /// W3C capabilities for the new session
    pub fn capabilities(&self) -> serde_json::Map<String, Value> {
        let mut caps = serde_json::Map::new();

        match self.browser {
            BrowserType::Firefox => {
                let mut args = Vec::new();
                if self.headless {
                    args.push("--headless".to_string());
                }
                if let Some(vp) = &self.viewport {
                    args.push(format!("--width={}", vp.width));
                    args.push(format!("--height={}", vp.height));
                }
                caps.insert("moz:firefoxOptions".to_string(), json!({ "args": args }));
            }
            BrowserType::Chrome => {
                let mut args = vec!["--no-sandbox".to_string()];
                if self.headless {
                    args.push("--headless=new".to_string());
                    args.push("--disable-gpu".to_string());
                    // Prevent shared memory issues
                    args.push("--disable-dev-shm-usage".to_string());
                }
                if let Some(vp) = &self.viewport {
                    args.push(format!("--window-size={},{}", vp.width, vp.height));
                }
                caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
            }
        }

        caps
    }

    /// Open the session
    pub async fn connect(&self) -> Result<Client> {
        let url = self.url();
        info!("Connecting to {:?} WebDriver at {}", self.browser, url);

        if !is_webdriver_running(url).await {
            let driver_name = self.browser.driver_name();
            anyhow::bail!(
                "Cannot connect to {} WebDriver at {}.\n\
                Please ensure {} is running:\n\
                  For Firefox: geckodriver --port 4444\n\
                  For Chrome: chromedriver --port 9515",
                driver_name,
                url,
                driver_name
            );
        }

        let client = ClientBuilder::rustls()
            .capabilities(self.capabilities())
            .connect(url)
            .await
            .context("Failed to connect to WebDriver")?;

        if let Some(vp) = self.viewport {
            debug!("Setting viewport to {}x{}", vp.width, vp.height);
            if let Err(e) = client.set_window_size(vp.width, vp.height).await {
                debug!("Note: Could not set window size: {}", e);
            }
        }

        Ok(client)
    }

    /// Open the session and wrap it in a [`Screen`]
    pub async fn screen(&self, config: Config) -> Result<Screen<Client>> {
        let client = self.connect().await?;
        Ok(Screen::with_config(client, config))
    }
}

/// Whether a WebDriver server answers on `url`
pub async fn is_webdriver_running(url: &str) -> bool {
    let status_url = format!("{}/status", url.trim_end_matches('/'));

    match reqwest::get(&status_url).await {
        Ok(response) => response.status().is_success(),
        Err(_) => false,
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

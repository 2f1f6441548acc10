//! Web client configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use wallet_core::{Error, Result};

pub const DEFAULT_HOST: &str = "web.budgetbakers.com";
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:4444";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserDriver {
    #[default]
    Firefox,
    Chrome,
    Chromium,
    Edge,
    Ie,
    Safari,
}

impl BrowserDriver {
    pub fn as_str(self) -> &'static str {
        match self {
            BrowserDriver::Firefox => "firefox",
            BrowserDriver::Chrome => "chrome",
            BrowserDriver::Chromium => "chromium",
            BrowserDriver::Edge => "edge",
            BrowserDriver::Ie => "ie",
            BrowserDriver::Safari => "safari",
        }
    }
}

impl fmt::Display for BrowserDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BrowserDriver {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "firefox" => Ok(BrowserDriver::Firefox),
            "chrome" => Ok(BrowserDriver::Chrome),
            "chromium" => Ok(BrowserDriver::Chromium),
            "edge" => Ok(BrowserDriver::Edge),
            "ie" => Ok(BrowserDriver::Ie),
            "safari" => Ok(BrowserDriver::Safari),
            other => Err(Error::config(format!(
                "unknown browser driver '{other}' (expected firefox, chrome, chromium, edge, ie or safari)"
            ))),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub host: String,
    pub email: Option<String>,
    pub password: Option<String>,

    pub driver: BrowserDriver,
    /// Seconds the browser waits for elements to appear.
    pub implicit_wait: u64,
    pub headless: bool,
    pub data_dir: PathBuf,
    pub browser_args: Vec<String>,

    pub webdriver_url: String,
    /// Where `cookies.json` is loaded from and dumped to. Unset disables it.
    pub cookies_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            email: None,
            password: None,
            driver: BrowserDriver::default(),
            implicit_wait: 30,
            headless: true,
            data_dir: PathBuf::from(".local").join("pywallet").join("browser"),
            browser_args: Vec::new(),
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
            cookies_dir: None,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("host", &self.host)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "********"))
            .field("driver", &self.driver)
            .field("implicit_wait", &self.implicit_wait)
            .field("headless", &self.headless)
            .field("data_dir", &self.data_dir)
            .field("browser_args", &self.browser_args)
            .field("webdriver_url", &self.webdriver_url)
            .field("cookies_dir", &self.cookies_dir)
            .finish()
    }
}

impl ClientConfig {
    pub fn implicit_wait(&self) -> Duration {
        Duration::from_secs(self.implicit_wait)
    }

    pub fn url(&self, path: &str) -> String {
        format!("https://{}/{}", self.host.trim_end_matches('/'), path.trim_start_matches('/'))
    }

    /// Email and password, or a config error naming the missing variable.
    pub fn credentials(&self) -> Result<(&str, &str)> {
        let email = self
            .email
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| Error::config("BUDGETBACKERS_EMAIL is not set"))?;
        let password = self
            .password
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::config("BUDGETBACKERS_PASSWORD is not set"))?;
        Ok((email, password))
    }
}

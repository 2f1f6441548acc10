//! Settings for `pywallet`. Sources, later wins: built-in defaults, the TOML
//! file, `.env`, then the process environment.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use wallet_client::{BrowserDriver, ClientConfig};

pub const DEFAULT_SETTINGS_FILE: &str = "pywallet.toml";

#[derive(Debug, Clone)]
pub struct Settings {
    pub client: ClientConfig,
    /// IANA name used to decide what "today" is.
    pub timezone: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            client: ClientConfig::default(),
            timezone: "UTC".to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SettingsFile {
    timezone: Option<String>,
    budgetbakers: BudgetBakersSection,
    browser: BrowserSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct BudgetBakersSection {
    host: Option<String>,
    email: Option<String>,
    password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct BrowserSection {
    driver: Option<BrowserDriver>,
    implicit_wait: Option<u64>,
    headless: Option<bool>,
    data_dir: Option<PathBuf>,
    args: Option<Vec<String>>,
    webdriver_url: Option<String>,
    cookies_dir: Option<PathBuf>,
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("{name}: expected a boolean, got '{other}'"),
    }
}

impl Settings {
    pub fn apply_toml(&mut self, text: &str) -> Result<()> {
        let file: SettingsFile = toml::from_str(text).context("parse settings file")?;
        let c = &mut self.client;

        if let Some(tz) = file.timezone {
            self.timezone = tz;
        }
        let bb = file.budgetbakers;
        if let Some(v) = bb.host {
            c.host = v;
        }
        if bb.email.is_some() {
            c.email = bb.email;
        }
        if bb.password.is_some() {
            c.password = bb.password;
        }

        let b = file.browser;
        if let Some(v) = b.driver {
            c.driver = v;
        }
        if let Some(v) = b.implicit_wait {
            c.implicit_wait = v;
        }
        if let Some(v) = b.headless {
            c.headless = v;
        }
        if let Some(v) = b.data_dir {
            c.data_dir = v;
        }
        if let Some(v) = b.args {
            c.browser_args = v;
        }
        if let Some(v) = b.webdriver_url {
            c.webdriver_url = v;
        }
        if b.cookies_dir.is_some() {
            c.cookies_dir = b.cookies_dir;
        }
        Ok(())
    }

    /// Apply environment variables through `lookup`. Empty values are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let c = &mut self.client;

        if let Some(v) = get("BUDGETBACKERS_HOST") {
            c.host = v;
        }
        if let Some(v) = get("BUDGETBACKERS_EMAIL") {
            c.email = Some(v);
        }
        if let Some(v) = get("BUDGETBACKERS_PASSWORD") {
            c.password = Some(v);
        }
        if let Some(v) = get("BROWSER_DRIVER") {
            c.driver = v.parse().context("BROWSER_DRIVER")?;
        }
        if let Some(v) = get("BROWSER_PAGE_IMPLICIT_WAIT") {
            c.implicit_wait = v
                .trim()
                .parse()
                .with_context(|| format!("BROWSER_PAGE_IMPLICIT_WAIT: expected seconds, got '{v}'"))?;
        }
        if let Some(v) = get("BROWSER_HEADLESS") {
            c.headless = parse_bool("BROWSER_HEADLESS", &v)?;
        }
        if let Some(v) = get("BROWSER_DATA_DIR") {
            c.data_dir = PathBuf::from(v);
        }
        if let Some(v) = get("BROWSER_ARGS") {
            c.browser_args = v.split_whitespace().map(str::to_string).collect();
        }
        if let Some(v) = get("WEBDRIVER_URL") {
            c.webdriver_url = v;
        }
        if let Some(v) = get("COOKIES_DIR") {
            c.cookies_dir = Some(PathBuf::from(v));
        }
        if let Some(v) = get("PYWALLET_TIMEZONE") {
            self.timezone = v;
        }
        Ok(())
    }
}

/// Load settings from every source. An explicit `config` path must exist;
/// otherwise `./pywallet.toml` is read when present.
pub fn load_settings(config: Option<&Path>) -> Result<Settings> {
    let mut settings = Settings::default();

    let file = match config {
        Some(p) => Some(p.to_path_buf()),
        None => Some(PathBuf::from(DEFAULT_SETTINGS_FILE)).filter(|p| p.is_file()),
    };
    if let Some(path) = file {
        let text = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
        settings
            .apply_toml(&text)
            .with_context(|| format!("load {}", path.display()))?;
    }

    // Existing variables are not overridden, so the real environment wins.
    dotenvy::dotenv().ok();
    settings.apply_env(|name| std::env::var(name).ok())?;

    wallet_core::time::parse_timezone(&settings.timezone)?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_toml_then_env() {
        let mut s = Settings::default();
        s.apply_toml(
            r#"
timezone = "Europe/Prague"

[budgetbakers]
email = "file@example.com"

[browser]
driver = "chrome"
headless = false
args = ["--lang=en"]
"#,
        )
        .unwrap();
        assert_eq!(s.client.driver, BrowserDriver::Chrome);
        assert!(!s.client.headless);
        assert_eq!(s.timezone, "Europe/Prague");

        s.apply_env(env(&[
            ("BUDGETBACKERS_EMAIL", "env@example.com"),
            ("BUDGETBACKERS_PASSWORD", "secret"),
            ("BROWSER_HEADLESS", "yes"),
            ("BROWSER_ARGS", "--a  --b"),
            ("BROWSER_PAGE_IMPLICIT_WAIT", "5"),
            ("COOKIES_DIR", ""),
        ]))
        .unwrap();

        assert_eq!(s.client.email.as_deref(), Some("env@example.com"));
        assert_eq!(s.client.password.as_deref(), Some("secret"));
        assert!(s.client.headless);
        assert_eq!(s.client.browser_args, vec!["--a", "--b"]);
        assert_eq!(s.client.implicit_wait, 5);
        assert_eq!(s.client.cookies_dir, None);
        assert_eq!(s.client.driver, BrowserDriver::Chrome);
    }

    #[test]
    fn test_bad_env_values() {
        let mut s = Settings::default();
        assert!(s.apply_env(env(&[("BROWSER_HEADLESS", "maybe")])).is_err());
        assert!(s.apply_env(env(&[("BROWSER_DRIVER", "netscape")])).is_err());
        assert!(s.apply_env(env(&[("BROWSER_PAGE_IMPLICIT_WAIT", "soon")])).is_err());
    }

    #[test]
    fn test_unknown_toml_key_is_rejected() {
        let mut s = Settings::default();
        let err = s.apply_toml("[browser]\nheadles = true\n").unwrap_err();
        assert!(format!("{err:#}").contains("headles"));
    }

    #[test]
    fn test_explicit_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_settings(Some(dir.path().join("nope.toml").as_path())).unwrap_err();
        assert!(err.to_string().contains("nope.toml"));
    }

    #[test]
    fn test_password_not_in_debug() {
        let mut s = Settings::default();
        s.apply_env(env(&[("BUDGETBACKERS_PASSWORD", "hunter2")])).unwrap();
        assert!(!format!("{s:?}").contains("hunter2"));
    }
}

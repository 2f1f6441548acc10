//! WebDriver capabilities for each supported browser.

use serde_json::{json, Map, Value};
use std::path::Path;
use tracing::warn;

use crate::config::{BrowserDriver, ClientConfig};

/// Browser arguments in the order they are passed: profile directory,
/// headless flag, then the user's extra arguments.
pub fn browser_args(config: &ClientConfig) -> Vec<String> {
    let mut args = vec![format!("--user-data-dir={}", absolute(&config.data_dir).display())];
    if config.headless {
        args.push("--headless".to_string());
    }
    args.extend(config.browser_args.iter().cloned());
    args
}

fn absolute(path: &Path) -> std::path::PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Capabilities for the new-session request.
pub fn capabilities(config: &ClientConfig) -> Map<String, Value> {
    let args = browser_args(config);
    let mut caps = Map::new();

    let (browser_name, options_key) = match config.driver {
        BrowserDriver::Firefox => ("firefox", Some("moz:firefoxOptions")),
        BrowserDriver::Chrome | BrowserDriver::Chromium => ("chrome", Some("goog:chromeOptions")),
        BrowserDriver::Edge => ("MicrosoftEdge", Some("ms:edgeOptions")),
        BrowserDriver::Ie => ("internet explorer", Some("se:ieOptions")),
        BrowserDriver::Safari => ("safari", None),
    };
    caps.insert("browserName".to_string(), json!(browser_name));

    match (config.driver, options_key) {
        (BrowserDriver::Ie, Some(key)) => {
            caps.insert(
                key.to_string(),
                json!({ "ie.browserCommandLineSwitches": args.join(" ") }),
            );
        }
        (_, Some(key)) => {
            caps.insert(key.to_string(), json!({ "args": args }));
        }
        (_, None) => {
            warn!(driver = %config.driver, "browser takes no command line arguments; ignoring them");
        }
    }

    caps
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn config(driver: BrowserDriver) -> ClientConfig {
        ClientConfig {
            driver,
            data_dir: PathBuf::from("/tmp/wallet-browser"),
            browser_args: vec!["--lang=en".into()],
            ..Default::default()
        }
    }

    #[test]
    fn test_args_order() {
        let args = browser_args(&config(BrowserDriver::Firefox));
        assert_eq!(
            args,
            vec!["--user-data-dir=/tmp/wallet-browser", "--headless", "--lang=en"]
        );

        let mut cfg = config(BrowserDriver::Firefox);
        cfg.headless = false;
        assert!(!browser_args(&cfg).contains(&"--headless".to_string()));
    }

    #[test]
    fn test_firefox_capabilities() {
        let caps = capabilities(&config(BrowserDriver::Firefox));
        assert_eq!(caps["browserName"], "firefox");
        assert_eq!(caps["moz:firefoxOptions"]["args"][1], "--headless");
    }

    #[test]
    fn test_chromium_uses_chrome_options() {
        let caps = capabilities(&config(BrowserDriver::Chromium));
        assert_eq!(caps["browserName"], "chrome");
        assert_eq!(caps["goog:chromeOptions"]["args"][2], "--lang=en");
    }

    #[test]
    fn test_edge_and_safari() {
        let caps = capabilities(&config(BrowserDriver::Edge));
        assert_eq!(caps["browserName"], "MicrosoftEdge");
        assert!(caps.contains_key("ms:edgeOptions"));

        let caps = capabilities(&config(BrowserDriver::Safari));
        assert_eq!(caps.len(), 1);
        assert_eq!(caps["browserName"], "safari");
    }
}

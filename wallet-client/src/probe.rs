//! WebDriver readiness check, run before a session is opened.

use serde::Deserialize;
use tracing::debug;

use wallet_core::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DriverStatus {
    pub ready: bool,
    #[serde(default)]
    pub message: String,
}

#[derive(Deserialize)]
struct StatusResponse {
    value: DriverStatus,
}

pub fn status_url(webdriver_url: &str) -> String {
    format!("{}/status", webdriver_url.trim_end_matches('/'))
}

pub fn parse_status(body: &str) -> Result<DriverStatus> {
    let resp: StatusResponse = serde_json::from_str(body)
        .map_err(|e| Error::extraction(format!("unexpected WebDriver status response: {e}")))?;
    Ok(resp.value)
}

/// `GET <webdriver>/status`; errors unless the driver reports `ready`.
pub async fn check_webdriver(webdriver_url: &str) -> Result<DriverStatus> {
    let url = status_url(webdriver_url);
    let resp = reqwest::Client::new()
        .get(&url)
        .send()
        .await
        .map_err(|e| Error::extraction(format!("WebDriver at {webdriver_url} is unreachable: {e}")))?;

    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    if !status.is_success() {
        return Err(Error::extraction(format!(
            "WebDriver at {webdriver_url} answered {status}: {body}"
        )));
    }

    let driver = parse_status(&body)?;
    debug!(url = %url, ready = driver.ready, message = %driver.message, "WebDriver status");
    if !driver.ready {
        return Err(Error::extraction(format!(
            "WebDriver at {webdriver_url} is not ready: {}",
            driver.message
        )));
    }
    Ok(driver)
}

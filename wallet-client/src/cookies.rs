//! Session cookies kept between runs in `<dir>/cookies.json`.

use fantoccini::cookies::Cookie;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use wallet_core::{Error, Result};

pub const COOKIES_FILE: &str = "cookies.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCookie {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure: Option<bool>,
    #[serde(default, rename = "httpOnly", skip_serializing_if = "Option::is_none")]
    pub http_only: Option<bool>,
}

impl From<&Cookie<'_>> for StoredCookie {
    fn from(c: &Cookie<'_>) -> Self {
        Self {
            name: c.name().to_string(),
            value: c.value().to_string(),
            domain: c.domain().map(str::to_string),
            path: c.path().map(str::to_string),
            secure: c.secure(),
            http_only: c.http_only(),
        }
    }
}

impl StoredCookie {
    pub fn to_cookie(&self) -> Cookie<'static> {
        let mut cookie = Cookie::new(self.name.clone(), self.value.clone());
        if let Some(domain) = &self.domain {
            cookie.set_domain(domain.clone());
        }
        if let Some(path) = &self.path {
            cookie.set_path(path.clone());
        }
        cookie.set_secure(self.secure);
        cookie.set_http_only(self.http_only);
        cookie
    }
}

pub fn cookies_path(dir: &Path) -> PathBuf {
    dir.join(COOKIES_FILE)
}

/// Cookies saved by a previous run. A missing file is not an error.
pub fn load_cookies(dir: &Path) -> Result<Vec<StoredCookie>> {
    let path = cookies_path(dir);
    if !path.is_file() {
        warn!(path = %path.display(), "no cookies file; starting a fresh session");
        return Ok(Vec::new());
    }
    let text = fs::read_to_string(&path)?;
    serde_json::from_str(&text)
        .map_err(|e| Error::config(format!("invalid cookies file {}: {e}", path.display())))
}

pub fn save_cookies(dir: &Path, cookies: &[StoredCookie]) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = cookies_path(dir);
    let text = serde_json::to_string_pretty(cookies)
        .map_err(|e| Error::config(format!("cannot serialize cookies: {e}")))?;
    fs::write(&path, text)?;
    info!(path = %path.display(), count = cookies.len(), "cookies dumped");
    Ok(path)
}

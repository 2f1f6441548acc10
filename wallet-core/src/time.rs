//! Clock helpers: "today" as seen from a configured IANA timezone.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::error::{Error, Result};

pub fn parse_timezone(tz: &str) -> Result<Tz> {
    tz.parse()
        .map_err(|_| Error::config(format!("invalid timezone: {tz}")))
}

/// Calendar date of `now` in `tz`.
pub fn date_in(now: DateTime<Utc>, tz: &str) -> Result<NaiveDate> {
    let tz = parse_timezone(tz)?;
    Ok(now.with_timezone(&tz).date_naive())
}

pub fn today_in(tz: &str) -> Result<NaiveDate> {
    date_in(Utc::now(), tz)
}

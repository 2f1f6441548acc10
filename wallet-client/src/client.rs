//! Browser session against the Wallet web app: sign in, open analytics and
//! scrape the monthly incomes & expenses report.

use chrono::Datelike;
use fantoccini::elements::Element;
use fantoccini::wd::TimeoutConfiguration;
use fantoccini::{Client, ClientBuilder, Locator};
use std::cmp::Ordering;
use std::fmt::Display;
use std::time::Duration;
use tracing::{debug, info, warn};

use wallet_core::{Error, Period, PeriodKind, Result};

use crate::config::ClientConfig;
use crate::cookies::{load_cookies, save_cookies, StoredCookie};
use crate::driver::capabilities;
use crate::money::MoneyParser;
use crate::probe::check_webdriver;
use crate::report::{IncomesExpensesReport, ReportEntry};

const LOGIN_FORM: &str = "/html/body/div[1]/div/div/section/div/form";
const ANALYTICS_LINK: &str = "//a[@href='/analytics']";
const ANALYTICS_WAIT: Duration = Duration::from_secs(30);
const RESTORED_SESSION_WAIT: Duration = Duration::from_secs(10);
/// Upper bound on clicks through the year selector.
const MAX_YEAR_STEPS: usize = 100;

trait WebResultExt<T> {
    fn web(self, what: &str) -> Result<T>;
}

impl<T, E: Display> WebResultExt<T> for std::result::Result<T, E> {
    fn web(self, what: &str) -> Result<T> {
        self.map_err(|e| Error::extraction(format!("{what}: {e}")))
    }
}

/// Quote `s` as an XPath string literal. XPath 1.0 has no escapes, so a value
/// holding both quote kinds is built with `concat()`.
pub fn xpath_literal(s: &str) -> String {
    if !s.contains('\'') {
        return format!("'{s}'");
    }
    if !s.contains('"') {
        return format!("\"{s}\"");
    }
    let parts: Vec<String> = s.split('\'').map(|p| format!("'{p}'")).collect();
    format!("concat({})", parts.join(", \"'\", "))
}

pub fn parse_year(text: &str) -> Result<i32> {
    text.trim()
        .parse()
        .map_err(|_| Error::extraction(format!("year selector shows '{}'", text.trim())))
}

pub struct WalletClient {
    client: Client,
    config: ClientConfig,
    money: MoneyParser,
}

impl WalletClient {
    /// Start a browser session. Credentials and the WebDriver are checked
    /// before anything is launched.
    pub async fn connect(config: ClientConfig) -> Result<Self> {
        config.credentials()?;
        check_webdriver(&config.webdriver_url).await?;

        let money = MoneyParser::new()?;

        debug!(?config, "starting browser session");
        let client = ClientBuilder::native()
            .capabilities(capabilities(&config))
            .connect(&config.webdriver_url)
            .await
            .web(&format!("start {} session via {}", config.driver, config.webdriver_url))?;

        let timeouts = TimeoutConfiguration::new(None, None, Some(config.implicit_wait()));
        if let Err(e) = client.update_timeouts(timeouts).await {
            if let Err(close_err) = client.close().await {
                warn!(error = %close_err, "closing browser session failed");
            }
            return Err(Error::extraction(format!("set implicit wait: {e}")));
        }

        info!(driver = %config.driver, "browser session started");
        Ok(Self {
            client,
            config,
            money,
        })
    }

    /// Reuse saved cookies when they still hold a session, otherwise log in.
    pub async fn sign_in(&self) -> Result<()> {
        if self.restore_session().await? {
            info!("session restored from cookies");
            return Ok(());
        }
        let (email, password) = self.config.credentials()?;
        self.login(email, password).await
    }

    async fn restore_session(&self) -> Result<bool> {
        let Some(dir) = &self.config.cookies_dir else {
            return Ok(false);
        };
        let cookies = load_cookies(dir)?;
        if cookies.is_empty() {
            return Ok(false);
        }

        self.open("").await?;
        for cookie in &cookies {
            if let Err(e) = self.client.add_cookie(cookie.to_cookie()).await {
                warn!(name = %cookie.name, error = %e, "cookie rejected");
            }
        }
        self.client.refresh().await.web("reload after restoring cookies")?;
        debug!(count = cookies.len(), "cookies loaded");

        Ok(self
            .client
            .wait()
            .at_most(RESTORED_SESSION_WAIT)
            .for_element(Locator::XPath(ANALYTICS_LINK))
            .await
            .is_ok())
    }

    async fn open(&self, path: &str) -> Result<()> {
        let url = self.config.url(path);
        self.client.goto(&url).await.web(&format!("open {url}"))?;
        debug!(url = %url, "url opened");
        Ok(())
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        debug!(email, "logging in");
        self.open("login").await?;

        let form = self
            .client
            .find(Locator::XPath(LOGIN_FORM))
            .await
            .web("locate login form")?;
        let text = form.text().await.web("read login form")?;
        if !text.contains("Log In") {
            return Err(Error::extraction(format!("login form was not found: '{text}'")));
        }

        form.find(Locator::Css("[name='email']"))
            .await
            .web("locate email field")?
            .send_keys(email)
            .await
            .web("type email")?;
        form.find(Locator::Css("[name='password']"))
            .await
            .web("locate password field")?
            .send_keys(password)
            .await
            .web("type password")?;
        form.find(Locator::XPath(".//button[@type='submit']"))
            .await
            .web("locate login button")?
            .click()
            .await
            .web("submit login form")?;

        info!(email, "logged in");
        Ok(())
    }

    pub async fn read_incomes_expenses_report_for_month(
        &self,
        month: Period,
        filter: Option<&str>,
    ) -> Result<IncomesExpensesReport> {
        if month.kind != PeriodKind::Month {
            return Err(Error::config(format!("expected a month, got {} {}", month.kind, month.label())));
        }
        debug!(month = %month.label(), "reading incomes & expenses report");

        self.client
            .wait()
            .at_most(ANALYTICS_WAIT)
            .for_element(Locator::XPath(ANALYTICS_LINK))
            .await
            .web("wait for analytics link")?
            .click()
            .await
            .web("open analytics")?;

        self.select_month(month).await?;
        debug!(month = %month.label(), "month selected");

        if let Some(name) = filter.filter(|n| !n.is_empty()) {
            self.select_filter(name).await?;
            debug!(filter = name, "filter applied");
        }

        let content = self
            .client
            .find(Locator::Css(".report-content"))
            .await
            .web("locate report content")?;
        let tables = content
            .find_all(Locator::Css(".report-table"))
            .await
            .web("locate report tables")?;
        let [incomes, expenses] = <[Element; 2]>::try_from(tables).map_err(|t| {
            Error::extraction(format!("expected 2 report tables (incomes, expenses), found {}", t.len()))
        })?;

        let totals = content.find(Locator::Css(".totals")).await.web("locate totals")?;
        let title = totals
            .find(Locator::Css(".title"))
            .await
            .web("locate report title")?
            .text()
            .await
            .web("read report title")?;
        let total = totals
            .find(Locator::Css(".value"))
            .await
            .web("locate report total")?
            .text()
            .await
            .web("read report total")?;

        let report = IncomesExpensesReport {
            total: self.money.parse(&total)?,
            period: month,
            incomes: self.read_rows(&incomes).await?,
            expenses: self.read_rows(&expenses).await?,
            title,
        };
        info!(
            month = %month.label(),
            title = %report.title,
            incomes = report.incomes.len(),
            expenses = report.expenses.len(),
            "report read"
        );
        Ok(report)
    }

    /// Fetch the months one by one, in order.
    pub async fn read_incomes_expenses_reports(
        &self,
        months: &[Period],
        filter: Option<&str>,
    ) -> Result<Vec<IncomesExpensesReport>> {
        let mut reports = Vec::with_capacity(months.len());
        for &month in months {
            reports.push(self.read_incomes_expenses_report_for_month(month, filter).await?);
        }
        Ok(reports)
    }

    async fn read_rows(&self, table: &Element) -> Result<Vec<ReportEntry>> {
        let mut entries = Vec::new();
        for row in table
            .find_all(Locator::Css(".report-row-values"))
            .await
            .web("locate report rows")?
        {
            let category = row
                .find(Locator::Css(".category-name"))
                .await
                .web("locate category name")?
                .text()
                .await
                .web("read category name")?;
            let amount = row
                .find(Locator::XPath("./td[2]/strong/span"))
                .await
                .web("locate row amount")?
                .text()
                .await
                .web("read row amount")?;

            entries.push(ReportEntry {
                total: self.money.parse(&amount)?,
                category,
            });
        }
        Ok(entries)
    }

    async fn select_month(&self, month: Period) -> Result<()> {
        self.client
            .find(Locator::Css(".date-range-picker"))
            .await
            .web("locate date range picker")?
            .click()
            .await
            .web("open date range picker")?;

        let picker = self
            .client
            .find(Locator::Css(".date-range-picker-container"))
            .await
            .web("locate date range picker container")?;
        picker
            .find(Locator::XPath(".//*[text()='Months']"))
            .await
            .web("locate months tab")?
            .click()
            .await
            .web("switch to months")?;

        let months = picker
            .find(Locator::Css(".date-range-picker-month-year-content"))
            .await
            .web("locate month picker")?;

        let target = month.start.year();
        let mut steps = 0;
        loop {
            let shown = months
                .find(Locator::XPath("./div/div"))
                .await
                .web("locate year selector")?
                .text()
                .await
                .web("read year selector")?;
            let arrow = match parse_year(&shown)?.cmp(&target) {
                Ordering::Equal => break,
                Ordering::Greater => ".left",
                Ordering::Less => ".right",
            };

            steps += 1;
            if steps > MAX_YEAR_STEPS {
                return Err(Error::extraction(format!("year selector never reached {target}")));
            }
            months
                .find(Locator::Css(arrow))
                .await
                .web("locate year arrow")?
                .click()
                .await
                .web("change year")?;
        }

        let item = format!("./ul/li[{}]", month.start.month());
        months
            .find(Locator::XPath(&item))
            .await
            .web("locate month item")?
            .click()
            .await
            .web("select month")?;
        Ok(())
    }

    async fn select_filter(&self, name: &str) -> Result<()> {
        let selector = self
            .client
            .find(Locator::Css("[name='selectFilter']"))
            .await
            .web("locate filter selector")?;
        selector.click().await.web("open filter selector")?;

        let option = format!(".//*[text()={}]", xpath_literal(name));
        selector
            .find(Locator::XPath(&option))
            .await
            .web(&format!("locate filter '{name}'"))?
            .click()
            .await
            .web("select filter")?;
        Ok(())
    }

    /// Dump the browser's cookies when a cookies directory is configured.
    pub async fn save_cookies(&self) -> Result<()> {
        let Some(dir) = &self.config.cookies_dir else {
            return Ok(());
        };
        let cookies: Vec<StoredCookie> = self
            .client
            .get_all_cookies()
            .await
            .web("read browser cookies")?
            .iter()
            .map(StoredCookie::from)
            .collect();
        save_cookies(dir, &cookies)?;
        Ok(())
    }

    pub async fn close(self) -> Result<()> {
        self.client.close().await.web("close browser session")?;
        debug!("browser session closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xpath_literal_quoting() {
        assert_eq!(xpath_literal("Groceries"), "'Groceries'");
        assert_eq!(xpath_literal("Bob's"), "\"Bob's\"");
        assert_eq!(
            xpath_literal(r#"Bob's "big" trip"#),
            r#"concat('Bob', "'", 's "big" trip')"#
        );
    }

    #[test]
    fn test_parse_year() {
        assert_eq!(parse_year(" 2026\n").unwrap(), 2026);
        assert!(parse_year("Year").unwrap_err().is_extraction());
    }
}

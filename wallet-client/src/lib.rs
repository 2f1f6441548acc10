//! wallet-client: browser-driven access to the BudgetBakers Wallet web app
//! (sign-in, analytics report scraping, cookie persistence).

pub mod client;
pub mod config;
pub mod cookies;
pub mod driver;
pub mod money;
pub mod probe;
pub mod report;

pub use client::WalletClient;
pub use config::{BrowserDriver, ClientConfig};
pub use money::{parse_money, MoneyParser};
pub use probe::check_webdriver;
pub use report::{months_for_window, reports_to_transactions, IncomesExpensesReport, ReportEntry};

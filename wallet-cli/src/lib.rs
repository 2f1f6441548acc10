//! Shared pieces of the `pywallet` and `report-convert` binaries.

pub mod logging;
pub mod settings;

/// Version string shown by `--version`: crate version plus build commit.
pub const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("WALLET_BUILD_SHA"), ")");

//! Command-line interface for the launch records dashboard.
//!
//! ## Data
//! - `--data`: CSV export of launch records (loaded once at startup)
//!
//! ## Server
//! - `--host`, `--port`: bind address for the dashboard
//! - `--log-level`: tracing filter used when `RUST_LOG` is unset
//!
//! ## Summary Mode
//! - `--summary`: print table statistics and exit without serving
//! - `--site`, `--low`, `--high`: also print the charts for this selection

use std::path::PathBuf;

use clap::Parser;

use crate::model::{PayloadRange, SiteSelection, ALL_SITES};

#[derive(Parser, Debug)]
#[command(name = "launchdash")]
#[command(author, version, about = "Interactive dashboard for launch success by site and payload")]
pub struct Cli {
    /// Launch records CSV
    #[arg(long, default_value = "spacex_launch_dash.csv", help_heading = "Data")]
    pub data: PathBuf,

    /// Address to bind
    #[arg(long, default_value = "127.0.0.1", help_heading = "Server")]
    pub host: String,

    #[arg(long, default_value_t = 8050, help_heading = "Server")]
    pub port: u16,

    /// Log filter when RUST_LOG is not set (e.g. "info", "launchdash=debug")
    #[arg(long, default_value = "info", help_heading = "Server")]
    pub log_level: String,

    /// Print a summary of the table and exit
    #[arg(long, default_value = "false", help_heading = "Summary Mode")]
    pub summary: bool,

    /// Site selection for summary charts ("ALL" or an exact site name)
    #[arg(long, default_value = ALL_SITES, help_heading = "Summary Mode")]
    pub site: String,

    /// Lower payload bound for the summary scatter (defaults to table minimum)
    #[arg(long, help_heading = "Summary Mode")]
    pub low: Option<f64>,

    /// Upper payload bound for the summary scatter (defaults to table maximum)
    #[arg(long, help_heading = "Summary Mode")]
    pub high: Option<f64>,
}

/// Resolved server settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub data_path: PathBuf,
    pub addr: String,
}

impl Cli {
    pub fn to_config(&self) -> ServerConfig {
        ServerConfig {
            data_path: self.data.clone(),
            addr: format!("{}:{}", self.host, self.port),
        }
    }

    pub fn selection(&self) -> SiteSelection {
        SiteSelection::from_value(&self.site)
    }

    /// Payload range for summary mode, filling unset bounds from `default`.
    pub fn payload_range(&self, default: PayloadRange) -> Result<PayloadRange, crate::error::CallbackError> {
        PayloadRange::new(
            self.low.unwrap_or(default.low()),
            self.high.unwrap_or(default.high()),
        )
    }
}

/// Format a payload mass in kilograms.
pub fn format_kg(kg: f64) -> String {
    if kg.fract() == 0.0 {
        format!("{:.0} kg", kg)
    } else {
        format!("{:.1} kg", kg)
    }
}

/// Format percentage.
pub fn format_pct(value: f64, total: f64) -> String {
    if total > 0.0 {
        format!("{:.1}%", 100.0 * value / total)
    } else {
        "0.0%".to_string()
    }
}

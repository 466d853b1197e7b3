//! Launch record table and selection types.
//!
//! The table is read once at startup from a CSV export of launch records and
//! is never mutated afterwards. Everything downstream (layout defaults, chart
//! callbacks) borrows it read-only.
//!
//! # Column Resolution
//!
//! Exports of this dataset name the payload column either `Payload Mass (kg)`
//! or `PayloadMass`, and the site column either `LaunchSite` or `Launch Site`.
//! Both spellings resolve to the same field. When both payload columns are
//! present the first is authoritative and disagreements are logged.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::{info, warn};

use crate::error::{CallbackError, LoadError};

/// Wire value of the "every site" selection.
pub const ALL_SITES: &str = "ALL";

/// Launch pads offered by the site selector, in display order.
pub const LAUNCH_SITES: [&str; 4] = ["CCAFS LC-40", "VAFB SLC-4E", "KSC LC-39A", "CCAFS SLC-40"];

const SITE_COLUMNS: &[&str] = &["LaunchSite", "Launch Site"];
const PAYLOAD_COLUMNS: &[&str] = &["Payload Mass (kg)", "PayloadMass"];
const CLASS_COLUMNS: &[&str] = &["class"];
const BOOSTER_COLUMNS: &[&str] = &["Booster Version Category"];

// ============================================================================
// Records
// ============================================================================

/// Binary launch outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Failure,
    Success,
}

impl Outcome {
    /// Parse a `class` cell. Accepts `0`/`1` and their float spellings.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().parse::<f64>().ok()? {
            v if v == 0.0 => Some(Self::Failure),
            v if v == 1.0 => Some(Self::Success),
            _ => None,
        }
    }

    #[inline]
    pub fn class(&self) -> u8 {
        match self {
            Self::Failure => 0,
            Self::Success => 1,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Failure => "Failure",
            Self::Success => "Success",
        }
    }
}

/// One row of the launch table.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchRecord {
    pub launch_site: String,
    /// Payload mass in kilograms.
    pub payload_mass: f64,
    pub booster_version_category: String,
    pub outcome: Outcome,
}

// ============================================================================
// Selections
// ============================================================================

/// Site selector value: every site, or one exact launch site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteSelection {
    All,
    Site(String),
}

impl SiteSelection {
    /// Parse a dropdown value. `"ALL"` selects every site; anything else is
    /// taken as a literal site name.
    pub fn from_value(value: &str) -> Self {
        if value == ALL_SITES {
            Self::All
        } else {
            Self::Site(value.to_string())
        }
    }

    /// Value as sent over the wire.
    pub fn value(&self) -> &str {
        match self {
            Self::All => ALL_SITES,
            Self::Site(site) => site,
        }
    }

    /// Human-readable label for dropdown options.
    pub fn label(&self) -> &str {
        match self {
            Self::All => "All Sites",
            Self::Site(site) => site,
        }
    }

    #[inline]
    pub fn matches(&self, record: &LaunchRecord) -> bool {
        match self {
            Self::All => true,
            Self::Site(site) => record.launch_site == *site,
        }
    }
}

/// Inclusive payload mass window `[low, high]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PayloadRange {
    low: f64,
    high: f64,
}

impl PayloadRange {
    /// Both bounds must be finite and `low <= high`.
    pub fn new(low: f64, high: f64) -> Result<Self, CallbackError> {
        if !low.is_finite() || !high.is_finite() || low > high {
            return Err(CallbackError::InvalidRange { low, high });
        }
        Ok(Self { low, high })
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    #[inline]
    pub fn contains(&self, payload_mass: f64) -> bool {
        self.low <= payload_mass && payload_mass <= self.high
    }
}

// ============================================================================
// Table
// ============================================================================

/// Immutable in-memory launch table with cached payload bounds.
#[derive(Debug, Clone)]
pub struct LaunchTable {
    records: Vec<LaunchRecord>,
    sites: Vec<String>,
    min_payload: f64,
    max_payload: f64,
}

impl LaunchTable {
    /// Build a table from already-parsed records. Fails if `records` is empty.
    pub fn new(records: Vec<LaunchRecord>) -> Result<Self, LoadError> {
        if records.is_empty() {
            return Err(LoadError::Empty);
        }

        let mut sites: Vec<String> = Vec::new();
        let mut min_payload = f64::INFINITY;
        let mut max_payload = f64::NEG_INFINITY;
        for record in &records {
            if !sites.iter().any(|s| *s == record.launch_site) {
                sites.push(record.launch_site.clone());
            }
            min_payload = min_payload.min(record.payload_mass);
            max_payload = max_payload.max(record.payload_mass);
        }

        Ok(Self {
            records,
            sites,
            min_payload,
            max_payload,
        })
    }

    /// Read the table from a CSV file on disk.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let file = File::open(path)?;
        let table = Self::from_reader(file)?;
        info!(
            path = %path.display(),
            rows = table.len(),
            sites = table.sites().len(),
            min_payload = table.min_payload,
            max_payload = table.max_payload,
            "loaded launch table"
        );
        Ok(table)
    }

    /// Parse CSV with a header row from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let columns = Columns::resolve(&headers)?;

        let mut records = Vec::new();
        let mut payload_mismatches = 0usize;
        for row in csv_reader.records() {
            let row = row?;
            let line = row.position().map(|p| p.line()).unwrap_or(0);
            let (record, mismatch) = columns.parse_row(&row, line)?;
            if mismatch {
                payload_mismatches += 1;
            }
            records.push(record);
        }

        if payload_mismatches > 0 {
            warn!(
                rows = payload_mismatches,
                "`PayloadMass` disagrees with `Payload Mass (kg)`; using `Payload Mass (kg)`"
            );
        }

        Self::new(records)
    }

    pub fn records(&self) -> &[LaunchRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Distinct launch sites in order of first appearance.
    pub fn sites(&self) -> &[String] {
        &self.sites
    }

    pub fn min_payload(&self) -> f64 {
        self.min_payload
    }

    pub fn max_payload(&self) -> f64 {
        self.max_payload
    }

    /// Range spanning every payload in the table; the slider's initial value.
    pub fn full_payload_range(&self) -> PayloadRange {
        PayloadRange {
            low: self.min_payload,
            high: self.max_payload,
        }
    }
}

/// Header positions for the columns the table needs.
struct Columns {
    site: usize,
    payload: usize,
    /// Secondary payload column, present only when both spellings exist.
    payload_alt: Option<usize>,
    class: usize,
    booster: usize,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Result<Self, LoadError> {
        let payload_hits: Vec<usize> = PAYLOAD_COLUMNS
            .iter()
            .filter_map(|name| find_column(headers, name))
            .collect();
        let payload = *payload_hits.first().ok_or_else(|| missing("payload mass", PAYLOAD_COLUMNS))?;

        Ok(Self {
            site: find_any(headers, SITE_COLUMNS).ok_or_else(|| missing("launch site", SITE_COLUMNS))?,
            payload,
            payload_alt: payload_hits.get(1).copied(),
            class: find_any(headers, CLASS_COLUMNS).ok_or_else(|| missing("class", CLASS_COLUMNS))?,
            booster: find_any(headers, BOOSTER_COLUMNS)
                .ok_or_else(|| missing("booster version category", BOOSTER_COLUMNS))?,
        })
    }

    /// Returns the record and whether the two payload columns disagreed.
    fn parse_row(&self, row: &StringRecord, line: u64) -> Result<(LaunchRecord, bool), LoadError> {
        let cell = |idx: usize| row.get(idx).unwrap_or("");

        let launch_site = cell(self.site);
        if launch_site.is_empty() {
            return Err(invalid(line, "launch site", launch_site));
        }

        let payload_mass = parse_payload(cell(self.payload)).ok_or_else(|| invalid(line, "payload mass", cell(self.payload)))?;

        let mismatch = match self.payload_alt {
            Some(idx) => parse_payload(cell(idx)) != Some(payload_mass),
            None => false,
        };

        let outcome = Outcome::from_str(cell(self.class)).ok_or_else(|| invalid(line, "class", cell(self.class)))?;

        let record = LaunchRecord {
            launch_site: launch_site.to_string(),
            payload_mass,
            booster_version_category: cell(self.booster).to_string(),
            outcome,
        };
        Ok((record, mismatch))
    }
}

fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

fn find_any(headers: &StringRecord, names: &[&str]) -> Option<usize> {
    names.iter().find_map(|name| find_column(headers, name))
}

fn parse_payload(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite() && *v >= 0.0)
}

fn missing(expected: &'static str, accepted: &[&str]) -> LoadError {
    LoadError::MissingColumn {
        expected,
        accepted: accepted.join(", "),
    }
}

fn invalid(line: u64, column: &'static str, value: &str) -> LoadError {
    LoadError::InvalidValue {
        line,
        column,
        value: value.to_string(),
    }
}

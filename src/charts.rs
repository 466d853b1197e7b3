//! Chart figures computed from the launch table.
//!
//! Both builders are pure functions of the table and the current selection:
//! calling them twice with the same inputs yields the same figure. Groups are
//! emitted in order of first appearance in the table so output is stable.

use serde::Serialize;

use crate::model::{LaunchTable, PayloadRange, SiteSelection};

/// A chart specification consumed by the page's renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Figure {
    Pie(PieChart),
    Scatter(ScatterChart),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieChart {
    pub title: String,
    pub slices: Vec<PieSlice>,
}

impl PieChart {
    pub fn total(&self) -> u64 {
        self.slices.iter().map(|s| s.value).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: u8,
}

/// Points sharing one booster version category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterSeries {
    pub category: String,
    pub points: Vec<ScatterPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<ScatterSeries>,
}

impl ScatterChart {
    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }

    pub fn points(&self) -> impl Iterator<Item = &ScatterPoint> {
        self.series.iter().flat_map(|s| s.points.iter())
    }
}

/// Success counts for the selection.
///
/// For [`SiteSelection::All`] there is one slice per launch site holding its
/// number of successful launches. For a single site there is one slice per
/// outcome class present, holding the number of launches with that class.
pub fn success_pie(table: &LaunchTable, selection: &SiteSelection) -> PieChart {
    match selection {
        SiteSelection::All => {
            let slices = table
                .sites()
                .iter()
                .map(|site| PieSlice {
                    label: site.clone(),
                    value: table
                        .records()
                        .iter()
                        .filter(|r| r.launch_site == *site)
                        .map(|r| r.outcome.class() as u64)
                        .sum(),
                })
                .collect();

            PieChart {
                title: "Total Successful Launches by Site".to_string(),
                slices,
            }
        }
        SiteSelection::Site(site) => {
            let mut slices: Vec<PieSlice> = Vec::with_capacity(2);
            for record in table.records().iter().filter(|r| selection.matches(r)) {
                let label = record.outcome.class().to_string();
                match slices.iter_mut().find(|s| s.label == label) {
                    Some(slice) => slice.value += 1,
                    None => slices.push(PieSlice { label, value: 1 }),
                }
            }

            PieChart {
                title: format!("Success vs Failure for site {}", site),
                slices,
            }
        }
    }
}

/// Payload mass against outcome class, colored by booster version category.
///
/// Keeps rows with `range.low() <= payload_mass <= range.high()` and, for a
/// single-site selection, only that site's rows.
pub fn payload_scatter(table: &LaunchTable, selection: &SiteSelection, range: PayloadRange) -> ScatterChart {
    let mut series: Vec<ScatterSeries> = Vec::new();

    let rows = table
        .records()
        .iter()
        .filter(|r| range.contains(r.payload_mass) && selection.matches(r));

    for record in rows {
        let point = ScatterPoint {
            x: record.payload_mass,
            y: record.outcome.class(),
        };
        match series.iter_mut().find(|s| s.category == record.booster_version_category) {
            Some(s) => s.points.push(point),
            None => series.push(ScatterSeries {
                category: record.booster_version_category.clone(),
                points: vec![point],
            }),
        }
    }

    let title = match selection {
        SiteSelection::All => "Payload vs. Outcome for All Sites".to_string(),
        SiteSelection::Site(site) => format!("Payload vs. Outcome for site {}", site),
    };

    ScatterChart {
        title,
        x_label: "PayloadMass".to_string(),
        y_label: "class".to_string(),
        series,
    }
}

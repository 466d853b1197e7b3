//! Static page description: heading, site selector, payload slider and the
//! two graph placeholders.

use serde::Serialize;

use crate::model::{LaunchTable, SiteSelection, LAUNCH_SITES};

pub const SITE_DROPDOWN: &str = "site-dropdown";
pub const PAYLOAD_SLIDER: &str = "payload-slider";
pub const PIE_GRAPH: &str = "success-pie-chart";
pub const SCATTER_GRAPH: &str = "success-payload-scatter-chart";

const SLIDER_MIN: f64 = 0.0;
const SLIDER_MAX: f64 = 10_000.0;
const SLIDER_STEP: f64 = 1_000.0;
const SLIDER_MARKS: [f64; 5] = [0.0, 2_500.0, 5_000.0, 7_500.0, 10_000.0];

#[derive(Debug, Clone, Serialize)]
pub struct Heading {
    pub text: String,
    pub text_align: String,
    pub color: String,
    pub font_size: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct DropdownOption {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dropdown {
    pub id: String,
    pub options: Vec<DropdownOption>,
    pub value: String,
    pub placeholder: String,
    pub searchable: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SliderMark {
    pub value: f64,
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RangeSlider {
    pub id: String,
    pub label: String,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub marks: Vec<SliderMark>,
    /// Initial `[low, high]`.
    pub value: [f64; 2],
}

/// Everything the page needs to build its controls.
#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    pub heading: Heading,
    pub dropdown: Dropdown,
    pub pie_graph: String,
    pub slider: RangeSlider,
    pub scatter_graph: String,
}

/// Build the page layout. The slider starts at the table's payload bounds.
pub fn build_layout(table: &LaunchTable) -> Layout {
    let options = std::iter::once(SiteSelection::All)
        .chain(LAUNCH_SITES.iter().map(|s| SiteSelection::Site(s.to_string())))
        .map(|sel| DropdownOption {
            label: sel.label().to_string(),
            value: sel.value().to_string(),
        })
        .collect();

    let marks = SLIDER_MARKS
        .iter()
        .map(|&value| SliderMark {
            value,
            label: format!("{}", value),
        })
        .collect();

    Layout {
        heading: Heading {
            text: "SpaceX Launch Records Dashboard".to_string(),
            text_align: "center".to_string(),
            color: "#503D36".to_string(),
            font_size: 40,
        },
        dropdown: Dropdown {
            id: SITE_DROPDOWN.to_string(),
            options,
            value: SiteSelection::All.value().to_string(),
            placeholder: "Select a Launch Site here".to_string(),
            searchable: true,
        },
        pie_graph: PIE_GRAPH.to_string(),
        slider: RangeSlider {
            id: PAYLOAD_SLIDER.to_string(),
            label: "Payload range (Kg):".to_string(),
            min: SLIDER_MIN,
            max: SLIDER_MAX,
            step: SLIDER_STEP,
            marks,
            value: [table.min_payload(), table.max_payload()],
        },
        scatter_graph: SCATTER_GRAPH.to_string(),
    }
}

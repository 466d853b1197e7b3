//! Output-to-input binding table for the dashboard's reactive updates.
//!
//! Each binding names one output component property, the input properties it
//! depends on, and a pure handler computing the output figure. The table is
//! built once at startup and shared read-only; the page asks for the bindings
//! and posts an update for every binding whose inputs changed.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::charts::{payload_scatter, success_pie, Figure};
use crate::error::CallbackError;
use crate::layout::{PAYLOAD_SLIDER, PIE_GRAPH, SCATTER_GRAPH, SITE_DROPDOWN};
use crate::model::{LaunchTable, PayloadRange, SiteSelection};

/// A component property, addressed as `id.property` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropRef {
    pub id: &'static str,
    pub property: &'static str,
}

impl PropRef {
    pub const fn new(id: &'static str, property: &'static str) -> Self {
        Self { id, property }
    }

    pub fn key(&self) -> String {
        format!("{}.{}", self.id, self.property)
    }
}

impl fmt::Display for PropRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.id, self.property)
    }
}

/// Handler input values arrive in the binding's declared input order.
pub type Handler = fn(&LaunchTable, &[&Value]) -> Result<Figure, CallbackError>;

pub struct Binding {
    pub output: PropRef,
    pub inputs: Vec<PropRef>,
    handler: Handler,
}

/// Wire form of a binding, served to the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dependency {
    pub output: String,
    pub inputs: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRequest {
    pub output: String,
    #[serde(default)]
    pub inputs: HashMap<String, Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateResponse {
    pub output: String,
    pub figure: Figure,
}

pub struct CallbackRegistry {
    bindings: Vec<Binding>,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self { bindings: Vec::new() }
    }

    /// The dashboard's two bindings: site pie and payload scatter.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.bind(
            PropRef::new(PIE_GRAPH, "figure"),
            vec![PropRef::new(SITE_DROPDOWN, "value")],
            update_pie_chart,
        );
        registry.bind(
            PropRef::new(SCATTER_GRAPH, "figure"),
            vec![PropRef::new(SITE_DROPDOWN, "value"), PropRef::new(PAYLOAD_SLIDER, "value")],
            update_scatter_chart,
        );
        registry
    }

    /// Register a handler. A later binding for the same output replaces the
    /// earlier one.
    pub fn bind(&mut self, output: PropRef, inputs: Vec<PropRef>, handler: Handler) {
        self.bindings.retain(|b| b.output != output);
        self.bindings.push(Binding { output, inputs, handler });
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn dependencies(&self) -> Vec<Dependency> {
        self.bindings
            .iter()
            .map(|b| Dependency {
                output: b.output.key(),
                inputs: b.inputs.iter().map(PropRef::key).collect(),
            })
            .collect()
    }

    /// Run the handler bound to `request.output` with the request's inputs.
    pub fn dispatch(&self, table: &LaunchTable, request: &UpdateRequest) -> Result<UpdateResponse, CallbackError> {
        let binding = self
            .bindings
            .iter()
            .find(|b| b.output.key() == request.output)
            .ok_or_else(|| CallbackError::UnknownOutput(request.output.clone()))?;

        let values = binding
            .inputs
            .iter()
            .map(|input| {
                let key = input.key();
                request.inputs.get(&key).ok_or(CallbackError::MissingInput(key))
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(output = %binding.output, inputs = values.len(), "dispatching update");
        let figure = (binding.handler)(table, &values)?;

        Ok(UpdateResponse {
            output: request.output.clone(),
            figure,
        })
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn update_pie_chart(table: &LaunchTable, values: &[&Value]) -> Result<Figure, CallbackError> {
    let selection = site_input(values, 0)?;
    Ok(Figure::Pie(success_pie(table, &selection)))
}

fn update_scatter_chart(table: &LaunchTable, values: &[&Value]) -> Result<Figure, CallbackError> {
    let selection = site_input(values, 0)?;
    let range = range_input(values, 1)?;
    Ok(Figure::Scatter(payload_scatter(table, &selection, range)))
}

fn site_input(values: &[&Value], idx: usize) -> Result<SiteSelection, CallbackError> {
    let key = PropRef::new(SITE_DROPDOWN, "value").key();
    let value = values.get(idx).ok_or_else(|| CallbackError::MissingInput(key.clone()))?;
    value
        .as_str()
        .map(SiteSelection::from_value)
        .ok_or(CallbackError::InvalidInput {
            input: key,
            reason: "expected a site name string".to_string(),
        })
}

fn range_input(values: &[&Value], idx: usize) -> Result<PayloadRange, CallbackError> {
    let key = PropRef::new(PAYLOAD_SLIDER, "value").key();
    let value = values.get(idx).ok_or_else(|| CallbackError::MissingInput(key.clone()))?;
    let invalid = || CallbackError::InvalidInput {
        input: key.clone(),
        reason: "expected [low, high] numbers".to_string(),
    };

    match value.as_array().map(|a| a.as_slice()) {
        Some([low, high]) => {
            let low = low.as_f64().ok_or_else(invalid)?;
            let high = high.as_f64().ok_or_else(invalid)?;
            PayloadRange::new(low, high)
        }
        _ => Err(invalid()),
    }
}

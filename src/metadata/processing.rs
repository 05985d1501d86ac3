use serde::{Deserialize, Serialize};

use super::MetadataError;

/// Data processing history for audit trail
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessingHistory {
    /// List of processing steps applied
    pub steps: Vec<ProcessingStep>,
}

/// A single data processing step in the processing history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingStep {
    /// Step order (1-indexed)
    pub order: i32,

    /// Software name
    pub software: String,

    /// Software version
    pub version: Option<String>,

    /// Processing type (e.g., "peak picking", "gap filter")
    pub processing_type: String,

    /// Timestamp when processing was performed
    pub timestamp: Option<String>,

    /// Processing parameters as recorded by the step
    #[serde(default)]
    pub parameters: serde_json::Value,
}

impl ProcessingStep {
    /// Step performed now by this crate.
    pub fn new(processing_type: impl Into<String>) -> Self {
        Self {
            order: 0,
            software: env!("CARGO_PKG_NAME").to_string(),
            version: Some(env!("CARGO_PKG_VERSION").to_string()),
            processing_type: processing_type.into(),
            timestamp: Some(chrono::Utc::now().to_rfc3339()),
            parameters: serde_json::Value::Null,
        }
    }

    /// Record the serialized form of `parameters`.
    pub fn with_parameters<P: Serialize>(mut self, parameters: &P) -> Result<Self, MetadataError> {
        self.parameters = serde_json::to_value(parameters)?;
        Ok(self)
    }
}

impl ProcessingHistory {
    /// Create a new empty processing history
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step, numbering it after the existing ones
    pub fn add_step(&mut self, mut step: ProcessingStep) {
        step.order = self.steps.len() as i32 + 1;
        self.steps.push(step);
    }

    /// Returns true if no step was recorded
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Serialize to JSON for Parquet footer storage
    pub fn to_json(&self) -> Result<String, MetadataError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> Result<Self, MetadataError> {
        Ok(serde_json::from_str(json)?)
    }
}

//! Detailed validation results
//!
//! The engine's detailed output arrives as one JSON document:
//! `{"valid": bool, "errors": [{"message", "instance_location",
//! "evaluate_path"}, ...]}`. These types deserialize it for callers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Outcome of a detailed validation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Whether the instance satisfies the schema
    pub valid: bool,
    /// One entry per violated keyword; empty when valid
    #[serde(default)]
    pub errors: Vec<ValidationError>,
}

/// A single keyword violation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationError {
    /// Human-readable description of the violation
    #[serde(default)]
    pub message: String,
    /// JSON pointer into the instance where the violation occurred
    #[serde(default)]
    pub instance_location: String,
    /// Evaluation path through the schema to the violated keyword
    #[serde(default)]
    pub evaluate_path: String,
}

impl ValidationResult {
    /// Parse the engine's detailed output document.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let location = if self.instance_location.is_empty() {
            "<root>"
        } else {
            &self.instance_location
        };
        write!(
            f,
            "- message       : {}\n  instance path : {}\n  schema path   : {}",
            self.message, location, self.evaluate_path
        )
    }
}

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

/// Field-keyed validation failures. Checks append to it instead of
/// short-circuiting, so one response reports every violated field.
#[derive(Debug, Default, Serialize, Error)]
#[error("validation failed: {}", .errors.keys().cloned().collect::<Vec<_>>().join(", "))]
pub struct ValidationErrors {
    #[serde(flatten)]
    errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

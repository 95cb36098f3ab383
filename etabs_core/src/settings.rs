//! # Adapter Settings
//!
//! Session-level options for [`crate::adapter::EtabsAdapter`]. Settings
//! serialize as JSON; every field has a default so a settings file only
//! needs to list what it changes.
//!
//! ## Example
//!
//! ```rust
//! use etabs_core::settings::AdapterSettings;
//!
//! let settings: AdapterSettings = serde_json::from_str(r#"{"refresh_on_push": false}"#).unwrap();
//! assert!(!settings.refresh_on_push);
//! assert_eq!(settings.orientation_tolerance, 1e-6);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{AdapterError, AdapterResult};

/// Options for one adapter session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterSettings {
    /// Tolerance used when deciding whether a node orientation is the
    /// global system
    pub orientation_tolerance: f64,

    /// Re-read the point name list at the start of every batch push instead
    /// of trusting identifiers cached from earlier pushes
    pub refresh_on_push: bool,
}

impl Default for AdapterSettings {
    fn default() -> Self {
        AdapterSettings {
            orientation_tolerance: 1e-6,
            refresh_on_push: true,
        }
    }
}

impl AdapterSettings {
    /// Check that values are usable
    pub fn validate(&self) -> AdapterResult<()> {
        if !self.orientation_tolerance.is_finite() || self.orientation_tolerance < 0.0 {
            return Err(AdapterError::invalid_input(
                "orientation_tolerance",
                self.orientation_tolerance.to_string(),
                "Tolerance must be a finite, non-negative number",
            ));
        }
        Ok(())
    }
}

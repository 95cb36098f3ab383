//! # Diagnostics
//!
//! Non-fatal problems recorded during an adapter session. Pushing objects
//! into ETABS never stops because a property was rejected; the problem is
//! recorded here and mirrored to `tracing`, and the caller decides what to
//! do with the collected entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How serious a diagnostic is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Warning,
    Error,
}

/// A single recorded diagnostic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub recorded: DateTime<Utc>,
}

/// Ordered log of diagnostics for one session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning
    pub fn warning(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{}", message);
        self.push(Severity::Warning, message);
    }

    /// Record an error
    pub fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::error!("{}", message);
        self.push(Severity::Error, message);
    }

    /// Record that ETABS rejected a property of an object that was created.
    pub fn property_warning(&mut self, property: &str, object_type: &str, id: &str) {
        self.warning(format!(
            "Failed to set property '{}' for {} with id: {}",
            property, object_type, id
        ));
    }

    /// Record that a required property was missing, so the object was skipped.
    pub fn missing_property(&mut self, property: &str, object_type: &str) {
        self.error(format!(
            "Property '{}' of the {} is required but was not set; the object was not created",
            property, object_type
        ));
    }

    fn push(&mut self, severity: Severity, message: String) {
        self.entries.push(Diagnostic {
            severity,
            message,
            recorded: Utc::now(),
        });
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(|d| d.severity == Severity::Warning)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(|d| d.severity == Severity::Error)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Take all entries, leaving the log empty
    pub fn drain(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_split() {
        let mut log = Diagnostics::new();
        log.warning("first");
        log.error("second");
        log.warning("third");

        assert_eq!(log.len(), 3);
        assert_eq!(log.warnings().count(), 2);
        assert_eq!(log.errors().count(), 1);
        assert_eq!(log.entries()[1].message, "second");
    }

    #[test]
    fn test_property_warning_message() {
        let mut log = Diagnostics::new();
        log.property_warning("Node Restraint", "Node", "12");
        assert_eq!(
            log.entries()[0].message,
            "Failed to set property 'Node Restraint' for Node with id: 12"
        );
        assert_eq!(log.entries()[0].severity, Severity::Warning);
    }

    #[test]
    fn test_drain_empties_log() {
        let mut log = Diagnostics::new();
        log.error("boom");
        let drained = log.drain();
        assert_eq!(drained.len(), 1);
        assert!(log.is_empty());
    }
}

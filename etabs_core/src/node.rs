//! # Nodes
//!
//! The structural node as seen by the adapter, plus the identity ETABS
//! hands back once the node exists in the model.

use serde::{Deserialize, Serialize};

use crate::geometry::{Basis, Point};
use crate::support::Constraint6Dof;

/// Identity of an object inside an ETABS model.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EtabsId {
    /// Unique name ETABS assigned to the object
    pub id: String,

    /// Label shown in the ETABS UI (unique per story)
    #[serde(default)]
    pub label: String,

    /// Story the object belongs to
    #[serde(default)]
    pub story: String,

    /// GUID that survives renumbering inside ETABS
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persistent_id: Option<String>,
}

impl EtabsId {
    pub fn new(id: impl Into<String>) -> Self {
        EtabsId {
            id: id.into(),
            ..Default::default()
        }
    }
}

/// A structural node.
///
/// `position` is optional so that incomplete input can be rejected by the
/// adapter instead of at deserialization time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Node {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub position: Option<Point>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support: Option<Constraint6Dof>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Basis>,

    /// Set by the adapter after the node has been created in ETABS
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adapter_id: Option<EtabsId>,
}

impl Node {
    /// Create a node at the given coordinates
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Node {
            position: Some(Point::new(x, y, z)),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_support(mut self, support: Constraint6Dof) -> Self {
        self.support = Some(support);
        self
    }

    pub fn with_orientation(mut self, orientation: Basis) -> Self {
        self.orientation = Some(orientation);
        self
    }

    /// Name of the node inside ETABS, once pushed
    pub fn etabs_name(&self) -> Option<&str> {
        self.adapter_id.as_ref().map(|id| id.id.as_str())
    }
}

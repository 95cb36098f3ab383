//! # Adapter Session
//!
//! [`EtabsAdapter`] binds one ETABS model to the identifier cache and the
//! diagnostics log of a session, and translates domain nodes into ETABS
//! points.
//!
//! Creating a node:
//!
//! 1. A node without a position is rejected (error diagnostic, `false`).
//! 2. `PointObj.AddCartesian` creates the point.
//! 3. Name, label, story and GUID are read back into the node's
//!    [`EtabsId`].
//! 4. Support and orientation are pushed. Rejections become warnings; the
//!    point is kept.
//! 5. The identifier cache for nodes is advanced so it holds the name the
//!    next point will receive.
//!
//! ## Example
//!
//! ```rust
//! use etabs_core::adapter::EtabsAdapter;
//! use etabs_core::memory_model::InMemoryModel;
//! use etabs_core::node::Node;
//! use etabs_core::support::Constraint6Dof;
//!
//! let mut adapter = EtabsAdapter::new(InMemoryModel::new());
//! let mut node = Node::new(0.0, 0.0, 0.0).with_support(Constraint6Dof::fix());
//!
//! assert!(adapter.create_node(&mut node));
//! assert_eq!(node.etabs_name(), Some("1"));
//! assert!(adapter.diagnostics().is_empty());
//! ```

use serde::{Deserialize, Serialize};

use crate::allocator::IdAllocator;
use crate::diagnostics::Diagnostics;
use crate::model::CsiModel;
use crate::node::{EtabsId, Node};
use crate::object_type::ObjectType;
use crate::settings::AdapterSettings;

/// Outcome of pushing a batch of nodes
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PushReport {
    /// Nodes created as points
    pub created: usize,
    /// Nodes rejected before any call was made
    pub skipped: usize,
    /// Nodes the model refused to create
    #[serde(default)]
    pub failed: usize,
    /// Name the next point will receive
    pub next_node_id: Option<String>,
}

impl PushReport {
    /// True when every node was created
    pub fn is_complete(&self) -> bool {
        self.skipped == 0 && self.failed == 0
    }
}

enum NodeOutcome {
    Created,
    Skipped,
    Failed,
}

/// One adapter session against an ETABS model.
pub struct EtabsAdapter<M: CsiModel> {
    model: M,
    ids: IdAllocator,
    diagnostics: Diagnostics,
    settings: AdapterSettings,
}

impl<M: CsiModel> EtabsAdapter<M> {
    pub fn new(model: M) -> Self {
        Self::with_settings(model, AdapterSettings::default())
    }

    pub fn with_settings(model: M, settings: AdapterSettings) -> Self {
        EtabsAdapter {
            model,
            ids: IdAllocator::new(),
            diagnostics: Diagnostics::new(),
            settings,
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn into_model(self) -> M {
        self.model
    }

    pub fn settings(&self) -> &AdapterSettings {
        &self.settings
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Take the collected diagnostics, leaving the log empty
    pub fn take_diagnostics(&mut self) -> Diagnostics {
        std::mem::take(&mut self.diagnostics)
    }

    /// Next free identifier for `object_type`, see [`IdAllocator::next_id`].
    pub fn next_id(&mut self, object_type: &ObjectType, refresh: bool) -> String {
        self.ids
            .next_id(&self.model, object_type, refresh, &mut self.diagnostics)
    }

    /// Identifier cached for `object_type`, without touching the model
    pub fn last_id(&self, object_type: &ObjectType) -> Option<&str> {
        self.ids.last_id(object_type)
    }

    /// Create `node` as an ETABS point.
    ///
    /// Returns `false` only when the node has no position; every other
    /// problem is recorded in the diagnostics log.
    pub fn create_node(&mut self, node: &mut Node) -> bool {
        !matches!(self.try_create_node(node), NodeOutcome::Skipped)
    }

    fn try_create_node(&mut self, node: &mut Node) -> NodeOutcome {
        let Some(position) = node.position else {
            self.diagnostics.missing_property("Position", ObjectType::Node.tag());
            return NodeOutcome::Skipped;
        };

        let name = match self.model.add_cartesian(position.x, position.y, position.z) {
            Ok(name) => name,
            Err(status) => {
                self.diagnostics.error(format!(
                    "PointObj.AddCartesian failed with {} for node '{}' at ({}, {}, {})",
                    status, node.name, position.x, position.y, position.z
                ));
                return NodeOutcome::Failed;
            }
        };

        let mut etabs_id = EtabsId::new(name.clone());
        if let Ok((label, story)) = self.model.label_and_story(&name) {
            etabs_id.label = label;
            etabs_id.story = story;
        }
        if let Ok(guid) = self.model.persistent_guid(&name) {
            etabs_id.persistent_id = Some(guid);
        }
        node.adapter_id = Some(etabs_id);

        self.set_node_properties(node, &name);

        let next = self.next_id(&ObjectType::Node, false);
        tracing::debug!(name = %name, next = %next, "created point");
        NodeOutcome::Created
    }

    /// Push support and orientation of a node that already exists as `name`.
    pub fn set_node_properties(&mut self, node: &Node, name: &str) -> bool {
        if let Some(support) = &node.support {
            let csi = support.to_csi();

            let node_type = ObjectType::Node;
            if self.model.set_restraint(name, csi.restraint).is_err() {
                self.diagnostics.property_warning("Node Restraint", node_type.tag(), name);
            }
            if self.model.set_spring(name, csi.spring).is_err() {
                self.diagnostics.property_warning("Node Spring", node_type.tag(), name);
            }
        }

        if let Some(orientation) = &node.orientation {
            if !orientation.is_global(self.settings.orientation_tolerance) {
                self.diagnostics.warning(format!(
                    "ETABS does not support local coordinate systems other than the global one. \
                     Node {} has been pushed using the global coordinate system.",
                    name
                ));
            }
        }

        true
    }

    /// Create every node in order.
    pub fn push_nodes(&mut self, nodes: &mut [Node]) -> PushReport {
        if self.settings.refresh_on_push {
            self.next_id(&ObjectType::Node, true);
        }

        let mut report = PushReport::default();
        for node in nodes.iter_mut() {
            match self.try_create_node(node) {
                NodeOutcome::Created => report.created += 1,
                NodeOutcome::Skipped => report.skipped += 1,
                NodeOutcome::Failed => report.failed += 1,
            }
        }
        report.next_node_id = self.last_id(&ObjectType::Node).map(str::to_string);

        tracing::info!(
            created = report.created,
            skipped = report.skipped,
            failed = report.failed,
            warnings = self.diagnostics.warnings().count(),
            "pushed nodes"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::geometry::Basis;
    use crate::memory_model::InMemoryModel;
    use crate::model::{ApiResult, ApiStatus};
    use crate::object_type::ObjectCategory;
    use crate::support::Constraint6Dof;

    /// Wraps an in-memory model and counts every call made against it.
    #[derive(Default)]
    struct CountingModel {
        inner: InMemoryModel,
        calls: Cell<usize>,
        fail_create: bool,
    }

    impl CountingModel {
        fn tick(&self) {
            self.calls.set(self.calls.get() + 1);
        }
    }

    impl CsiModel for CountingModel {
        fn add_cartesian(&mut self, x: f64, y: f64, z: f64) -> ApiResult<String> {
            self.tick();
            if self.fail_create {
                return Err(ApiStatus::FAILED);
            }
            self.inner.add_cartesian(x, y, z)
        }

        fn label_and_story(&self, name: &str) -> ApiResult<(String, String)> {
            self.tick();
            self.inner.label_and_story(name)
        }

        fn persistent_guid(&self, name: &str) -> ApiResult<String> {
            self.tick();
            self.inner.persistent_guid(name)
        }

        fn set_restraint(&mut self, name: &str, restraint: [bool; 6]) -> ApiResult<()> {
            self.tick();
            self.inner.set_restraint(name, restraint)
        }

        fn set_spring(&mut self, name: &str, spring: [f64; 6]) -> ApiResult<()> {
            self.tick();
            self.inner.set_spring(name, spring)
        }

        fn name_list(&self, category: ObjectCategory) -> ApiResult<Vec<String>> {
            self.tick();
            self.inner.name_list(category)
        }
    }

    #[test]
    fn test_missing_position_fails_without_calls() {
        let mut adapter = EtabsAdapter::new(CountingModel::default());
        let mut node = Node::default().with_name("orphan");

        assert!(!adapter.create_node(&mut node));
        assert_eq!(adapter.model().calls.get(), 0);
        assert!(node.adapter_id.is_none());
        assert_eq!(adapter.diagnostics().errors().count(), 1);
    }

    #[test]
    fn test_create_node_reads_back_identity() {
        let model = InMemoryModel::new().with_story("Story1", 3.5);
        let mut adapter = EtabsAdapter::new(model);
        let mut node = Node::new(2.0, 1.0, 3.5);

        assert!(adapter.create_node(&mut node));

        let id = node.adapter_id.as_ref().unwrap();
        assert_eq!(id.id, "1");
        assert_eq!(id.label, "1");
        assert_eq!(id.story, "Story1");
        let guid = id.persistent_id.as_deref().unwrap();
        assert_eq!(adapter.model().point("1").unwrap().guid, guid);
    }

    #[test]
    fn test_non_global_orientation_warns_once_and_succeeds() {
        let mut adapter = EtabsAdapter::new(InMemoryModel::new());
        let mut node = Node::new(0.0, 0.0, 0.0)
            .with_orientation(Basis::rotated_about_z(std::f64::consts::FRAC_PI_4));

        assert!(adapter.create_node(&mut node));
        assert_eq!(node.etabs_name(), Some("1"));
        assert_eq!(adapter.diagnostics().warnings().count(), 1);
        assert_eq!(adapter.diagnostics().len(), 1);
    }

    #[test]
    fn test_global_orientation_is_silent() {
        let mut adapter = EtabsAdapter::new(InMemoryModel::new());
        let mut node = Node::new(0.0, 0.0, 0.0).with_orientation(Basis::XY);

        assert!(adapter.create_node(&mut node));
        assert!(adapter.diagnostics().is_empty());
    }

    #[test]
    fn test_support_is_pushed() {
        let mut adapter = EtabsAdapter::new(InMemoryModel::new());
        let support = Constraint6Dof::spring("Soil", [0.0, 0.0, 500.0, 0.0, 0.0, 0.0]);
        let mut pinned = Node::new(0.0, 0.0, 0.0).with_support(Constraint6Dof::pin());
        let mut sprung = Node::new(5.0, 0.0, 0.0).with_support(support);

        assert!(adapter.create_node(&mut pinned));
        assert!(adapter.create_node(&mut sprung));

        let model = adapter.model();
        assert_eq!(model.point("1").unwrap().restraint, [true, true, true, false, false, false]);
        assert_eq!(model.point("2").unwrap().spring[2], 500.0);
        assert!(adapter.diagnostics().is_empty());
    }

    #[test]
    fn test_rejected_properties_become_warnings() {
        let mut model = InMemoryModel::new();
        model.reject_restraints = true;
        model.reject_springs = true;
        let mut adapter = EtabsAdapter::new(model);
        let mut node = Node::new(0.0, 0.0, 0.0).with_support(Constraint6Dof::fix());

        assert!(adapter.create_node(&mut node));
        assert!(node.adapter_id.is_some());

        let messages: Vec<_> = adapter
            .diagnostics()
            .warnings()
            .map(|d| d.message.clone())
            .collect();
        assert_eq!(
            messages,
            vec![
                "Failed to set property 'Node Restraint' for Node with id: 1",
                "Failed to set property 'Node Spring' for Node with id: 1",
            ]
        );
    }

    #[test]
    fn test_failed_creation_still_returns_true() {
        let model = CountingModel {
            fail_create: true,
            ..Default::default()
        };
        let mut adapter = EtabsAdapter::new(model);
        let mut node = Node::new(0.0, 0.0, 0.0);

        assert!(adapter.create_node(&mut node));
        assert!(node.adapter_id.is_none());
        assert_eq!(adapter.model().calls.get(), 1);
        assert_eq!(adapter.diagnostics().errors().count(), 1);
    }

    #[test]
    fn test_node_cache_tracks_next_point_name() {
        let mut adapter = EtabsAdapter::new(CountingModel::default());
        let mut first = Node::new(0.0, 0.0, 0.0);
        let mut second = Node::new(1.0, 0.0, 0.0);

        adapter.create_node(&mut first);
        assert_eq!(adapter.last_id(&ObjectType::Node), Some("2"));
        let calls_after_first = adapter.model().calls.get();

        adapter.create_node(&mut second);
        assert_eq!(second.etabs_name(), Some("2"));
        assert_eq!(adapter.last_id(&ObjectType::Node), Some("3"));
        // add_cartesian, label, guid; the cache hit needs no name list
        assert_eq!(adapter.model().calls.get(), calls_after_first + 3);
    }

    #[test]
    fn test_push_nodes_report() {
        let mut adapter = EtabsAdapter::new(InMemoryModel::new());
        let mut nodes = vec![
            Node::new(0.0, 0.0, 0.0),
            Node::default().with_name("no position"),
            Node::new(4.0, 0.0, 0.0),
        ];

        let report = adapter.push_nodes(&mut nodes);
        assert_eq!(report.created, 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.failed, 0);
        assert!(!report.is_complete());
        assert_eq!(report.next_node_id.as_deref(), Some("3"));
        assert_eq!(nodes[2].etabs_name(), Some("2"));
    }

    #[test]
    fn test_push_counts_rejected_creations_as_failed() {
        let model = CountingModel {
            fail_create: true,
            ..Default::default()
        };
        let mut adapter = EtabsAdapter::new(model);
        let mut nodes = vec![Node::new(0.0, 0.0, 0.0)];

        let report = adapter.push_nodes(&mut nodes);
        assert_eq!(report.created, 0);
        assert_eq!(report.skipped, 0);
        assert_eq!(report.failed, 1);
        assert!(!report.is_complete());
        assert!(nodes[0].adapter_id.is_none());
    }

    #[test]
    fn test_push_refreshes_stale_cache() {
        let mut adapter = EtabsAdapter::new(InMemoryModel::new());
        adapter.next_id(&ObjectType::Node, false);
        adapter.next_id(&ObjectType::Node, false);
        assert_eq!(adapter.last_id(&ObjectType::Node), Some("2"));

        let report = adapter.push_nodes(&mut [Node::new(0.0, 0.0, 0.0)]);
        assert_eq!(report.next_node_id.as_deref(), Some("2"));
    }

    #[test]
    fn test_next_id_for_unknown_type() {
        let mut adapter = EtabsAdapter::new(InMemoryModel::new());
        let id = adapter.next_id(&ObjectType::from("Opening"), false);
        assert_eq!(id, "0");
        assert_eq!(adapter.take_diagnostics().len(), 1);
        assert!(adapter.diagnostics().is_empty());
    }
}

//! # etabs_core - ETABS Adapter Core
//!
//! `etabs_core` translates structural domain objects into calls against the
//! ETABS API and keeps track of the identifiers ETABS objects will receive.
//!
//! ## Design Philosophy
//!
//! - **Port, not binding**: ETABS is reached through the [`model::CsiModel`]
//!   trait; the crate ships an offline implementation
//! - **Soft failures**: rejected properties are diagnostics, not errors
//! - **Explicit session state**: the identifier cache lives in the adapter
//!   session, never in globals
//! - **JSON-First**: all domain types implement Serialize/Deserialize
//!
//! ## Quick Start
//!
//! ```rust
//! use etabs_core::{EtabsAdapter, InMemoryModel, Node, ObjectType};
//!
//! let mut adapter = EtabsAdapter::new(InMemoryModel::new());
//! let mut nodes = vec![Node::new(0.0, 0.0, 0.0), Node::new(6.0, 0.0, 0.0)];
//!
//! let report = adapter.push_nodes(&mut nodes);
//! assert_eq!(report.created, 2);
//! assert_eq!(adapter.next_id(&ObjectType::Material, false), "Material-1");
//! ```
//!
//! ## Modules
//!
//! - [`adapter`] - Adapter session and node translation
//! - [`allocator`] - Per-type identifier cache
//! - [`model`] - The ETABS API port
//! - [`memory_model`] - Offline ETABS model
//! - [`object_type`] - Object-type tags and identifier policies
//! - [`node`], [`support`], [`geometry`] - Domain types
//! - [`diagnostics`] - Non-fatal session diagnostics
//! - [`settings`] - Session settings
//! - [`errors`] - Structured error types
//! - [`file_io`] - Snapshot files with atomic saves and locking

pub mod adapter;
pub mod allocator;
pub mod diagnostics;
pub mod errors;
pub mod file_io;
pub mod geometry;
pub mod memory_model;
pub mod model;
pub mod node;
pub mod object_type;
pub mod settings;
pub mod support;

// Re-export commonly used types at crate root for convenience
pub use adapter::{EtabsAdapter, PushReport};
pub use allocator::IdAllocator;
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use errors::{AdapterError, AdapterResult};
pub use memory_model::InMemoryModel;
pub use model::{ApiStatus, CsiModel};
pub use node::{EtabsId, Node};
pub use object_type::{ObjectCategory, ObjectType};
pub use settings::AdapterSettings;

//! # Identifier Allocator
//!
//! Hands out the next free ETABS identifier per object type and caches the
//! last one issued, so a run of objects of the same type costs a single
//! name-list query.
//!
//! ## Rules
//!
//! - Cache hit holding an integer: return it plus one, no query.
//! - Cache miss, non-integer cache value, or `refresh`: query the name list
//!   for the type and apply its [`IdPolicy`]:
//!   - `Numeric`: `max(names) + 1`, or `1` for an empty list
//!   - `Prefixed`: `<Tag>-<count + 1>`; the count of existing names is
//!     used, never the numbers embedded in them
//!   - `Unresolved`: `"0"` and one diagnostic per call
//! - The returned identifier always becomes the new cache value.
//!
//! ## Example
//!
//! ```rust
//! use etabs_core::allocator::IdAllocator;
//! use etabs_core::diagnostics::Diagnostics;
//! use etabs_core::memory_model::InMemoryModel;
//! use etabs_core::object_type::{ObjectCategory, ObjectType};
//!
//! let model = InMemoryModel::new().with_names(ObjectCategory::Material, ["Steel", "Concrete"]);
//! let mut ids = IdAllocator::new();
//! let mut log = Diagnostics::new();
//!
//! assert_eq!(ids.next_id(&model, &ObjectType::Node, false, &mut log), "1");
//! assert_eq!(ids.next_id(&model, &ObjectType::Node, false, &mut log), "2");
//! assert_eq!(ids.next_id(&model, &ObjectType::Material, false, &mut log), "Material-3");
//! ```

use std::collections::HashMap;

use crate::diagnostics::Diagnostics;
use crate::model::CsiModel;
use crate::object_type::{IdPolicy, ObjectCategory, ObjectType};

/// Identifier returned for types without a name list
pub const UNRESOLVED_ID: &str = "0";

/// Per-session cache of the last identifier issued per object type.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    last_ids: HashMap<ObjectType, String>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next free identifier for `object_type`.
    ///
    /// With `refresh` set the cached value is ignored and the name list is
    /// always queried.
    pub fn next_id<M: CsiModel + ?Sized>(
        &mut self,
        model: &M,
        object_type: &ObjectType,
        refresh: bool,
        diagnostics: &mut Diagnostics,
    ) -> String {
        let cached = if refresh {
            None
        } else {
            self.last_ids.get(object_type).and_then(|id| increment(object_type, id))
        };

        let id = match cached {
            Some(id) => {
                tracing::debug!(object_type = %object_type, id = %id, "identifier from cache");
                id
            }
            None => {
                let id = next_free_id(model, object_type, diagnostics);
                tracing::debug!(
                    object_type = %object_type,
                    id = %id,
                    refresh,
                    "identifier from name list"
                );
                id
            }
        };

        self.last_ids.insert(object_type.clone(), id.clone());
        id
    }

    /// Last identifier issued for `object_type`, if any
    pub fn last_id(&self, object_type: &ObjectType) -> Option<&str> {
        self.last_ids.get(object_type).map(String::as_str)
    }

    /// Drop the cached identifier of one type
    pub fn forget(&mut self, object_type: &ObjectType) -> Option<String> {
        self.last_ids.remove(object_type)
    }

    /// Drop every cached identifier
    pub fn clear(&mut self) {
        self.last_ids.clear();
    }

    pub fn len(&self) -> usize {
        self.last_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_ids.is_empty()
    }
}

/// Cached value plus one, when the cached value is an integer.
///
/// Unresolved types never count up from their sentinel.
fn increment(object_type: &ObjectType, cached: &str) -> Option<String> {
    if object_type.id_policy() == IdPolicy::Unresolved {
        return None;
    }
    successor(cached).map(|n| n.to_string())
}

/// `name + 1` for integer names; `None` when the name is not an integer or
/// has no successor in `u64`.
pub(crate) fn successor(name: &str) -> Option<u64> {
    name.parse::<u64>().ok().and_then(|n| n.checked_add(1))
}

/// Derive the next identifier from the live name list.
fn next_free_id<M: CsiModel + ?Sized>(
    model: &M,
    object_type: &ObjectType,
    diagnostics: &mut Diagnostics,
) -> String {
    match object_type.id_policy() {
        IdPolicy::Numeric(category) => {
            let names = query_names(model, category, diagnostics);
            let successors: Vec<u64> = names.iter().filter_map(|n| successor(n)).collect();
            if successors.len() < names.len() {
                diagnostics.warning(format!(
                    "{} of {} names in {} are not numeric and were ignored when numbering {}",
                    names.len() - successors.len(),
                    names.len(),
                    category,
                    object_type
                ));
            }
            successors.into_iter().max().unwrap_or(1).to_string()
        }
        IdPolicy::Prefixed(category) => {
            let count = query_names(model, category, diagnostics).len();
            format!("{}-{}", object_type.tag(), count + 1)
        }
        IdPolicy::Unresolved => {
            diagnostics.error(format!("Could not get count of type: {}", object_type));
            UNRESOLVED_ID.to_string()
        }
    }
}

/// Name list for `category`; a failed query counts as an empty model.
fn query_names<M: CsiModel + ?Sized>(
    model: &M,
    category: ObjectCategory,
    diagnostics: &mut Diagnostics,
) -> Vec<String> {
    match model.name_list(category) {
        Ok(names) => names,
        Err(status) => {
            diagnostics.warning(format!(
                "{}.GetNameList failed with {}; numbering starts from an empty list",
                category, status
            ));
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::model::{ApiResult, ApiStatus};

    /// Read-only model returning fixed name lists and counting queries.
    struct NameListSpy {
        points: Vec<String>,
        materials: Vec<String>,
        fail: bool,
        queries: Cell<usize>,
    }

    impl NameListSpy {
        fn new(points: &[&str], materials: &[&str]) -> Self {
            NameListSpy {
                points: points.iter().map(|s| s.to_string()).collect(),
                materials: materials.iter().map(|s| s.to_string()).collect(),
                fail: false,
                queries: Cell::new(0),
            }
        }
    }

    impl CsiModel for NameListSpy {
        fn add_cartesian(&mut self, _: f64, _: f64, _: f64) -> ApiResult<String> {
            Err(ApiStatus::FAILED)
        }

        fn label_and_story(&self, _: &str) -> ApiResult<(String, String)> {
            Err(ApiStatus::FAILED)
        }

        fn persistent_guid(&self, _: &str) -> ApiResult<String> {
            Err(ApiStatus::FAILED)
        }

        fn set_restraint(&mut self, _: &str, _: [bool; 6]) -> ApiResult<()> {
            Err(ApiStatus::FAILED)
        }

        fn set_spring(&mut self, _: &str, _: [f64; 6]) -> ApiResult<()> {
            Err(ApiStatus::FAILED)
        }

        fn name_list(&self, category: ObjectCategory) -> ApiResult<Vec<String>> {
            self.queries.set(self.queries.get() + 1);
            if self.fail {
                return Err(ApiStatus(3));
            }
            Ok(match category {
                ObjectCategory::Point => self.points.clone(),
                ObjectCategory::Material => self.materials.clone(),
                _ => Vec::new(),
            })
        }
    }

    #[test]
    fn test_numeric_uses_max_plus_one_then_cache() {
        let model = NameListSpy::new(&["3", "5", "9"], &[]);
        let mut ids = IdAllocator::new();
        let mut log = Diagnostics::new();

        assert_eq!(ids.next_id(&model, &ObjectType::Node, false, &mut log), "10");
        assert_eq!(model.queries.get(), 1);

        assert_eq!(ids.next_id(&model, &ObjectType::Node, false, &mut log), "11");
        assert_eq!(model.queries.get(), 1);
        assert_eq!(ids.last_id(&ObjectType::Node), Some("11"));
        assert!(log.is_empty());
    }

    #[test]
    fn test_numeric_empty_list_starts_at_one() {
        let model = NameListSpy::new(&[], &[]);
        let mut ids = IdAllocator::new();
        let mut log = Diagnostics::new();
        assert_eq!(ids.next_id(&model, &ObjectType::Node, false, &mut log), "1");
    }

    #[test]
    fn test_prefixed_is_count_based() {
        let model = NameListSpy::new(&[], &["Material-7", "Material-12", "Steel", "Material-1"]);
        let mut ids = IdAllocator::new();
        let mut log = Diagnostics::new();
        assert_eq!(ids.next_id(&model, &ObjectType::Material, false, &mut log), "Material-5");
    }

    #[test]
    fn test_prefixed_cache_is_recomputed_every_call() {
        let model = NameListSpy::new(&[], &["A", "B"]);
        let mut ids = IdAllocator::new();
        let mut log = Diagnostics::new();

        assert_eq!(ids.next_id(&model, &ObjectType::Material, false, &mut log), "Material-3");
        assert_eq!(ids.next_id(&model, &ObjectType::Material, false, &mut log), "Material-3");
        assert_eq!(model.queries.get(), 2);
    }

    #[test]
    fn test_unknown_type_returns_sentinel_with_one_diagnostic_per_call() {
        let model = NameListSpy::new(&["1"], &[]);
        let mut ids = IdAllocator::new();
        let mut log = Diagnostics::new();
        let opening = ObjectType::Other("Opening".to_string());

        for call in 1..=3 {
            assert_eq!(ids.next_id(&model, &opening, false, &mut log), UNRESOLVED_ID);
            assert_eq!(log.len(), call);
        }
        assert_eq!(log.errors().count(), 3);
        assert_eq!(log.entries()[0].message, "Could not get count of type: Opening");
        assert_eq!(model.queries.get(), 0);
    }

    #[test]
    fn test_refresh_always_requeries() {
        let model = NameListSpy::new(&["4"], &[]);
        let mut ids = IdAllocator::new();
        let mut log = Diagnostics::new();

        assert_eq!(ids.next_id(&model, &ObjectType::Node, false, &mut log), "5");
        assert_eq!(ids.next_id(&model, &ObjectType::Node, false, &mut log), "6");
        assert_eq!(ids.next_id(&model, &ObjectType::Node, true, &mut log), "5");
        assert_eq!(model.queries.get(), 2);
    }

    #[test]
    fn test_types_are_cached_independently() {
        let model = NameListSpy::new(&["2"], &[]);
        let mut ids = IdAllocator::new();
        let mut log = Diagnostics::new();

        assert_eq!(ids.next_id(&model, &ObjectType::Node, false, &mut log), "3");
        assert_eq!(ids.next_id(&model, &ObjectType::Bar, false, &mut log), "1");
        assert_eq!(ids.len(), 2);

        ids.forget(&ObjectType::Bar);
        assert_eq!(ids.last_id(&ObjectType::Bar), None);
        ids.clear();
        assert!(ids.is_empty());
    }

    #[test]
    fn test_non_numeric_point_names_are_skipped_with_warning() {
        let model = NameListSpy::new(&["2", "Corner", "7"], &[]);
        let mut ids = IdAllocator::new();
        let mut log = Diagnostics::new();

        assert_eq!(ids.next_id(&model, &ObjectType::Node, false, &mut log), "8");
        assert_eq!(log.warnings().count(), 1);
    }

    #[test]
    fn test_largest_integer_name_is_skipped_instead_of_overflowing() {
        let model = NameListSpy::new(&["4", "18446744073709551615"], &[]);
        let mut ids = IdAllocator::new();
        let mut log = Diagnostics::new();

        assert_eq!(ids.next_id(&model, &ObjectType::Node, false, &mut log), "5");
        assert_eq!(log.warnings().count(), 1);
    }

    #[test]
    fn test_only_largest_integer_restarts_at_one() {
        let model = NameListSpy::new(&["18446744073709551615"], &[]);
        let mut ids = IdAllocator::new();
        let mut log = Diagnostics::new();

        assert_eq!(ids.next_id(&model, &ObjectType::Node, false, &mut log), "1");
        assert_eq!(successor(&u64::MAX.to_string()), None);
        assert_eq!(successor("41"), Some(42));
    }

    #[test]
    fn test_failed_query_counts_as_empty() {
        let mut model = NameListSpy::new(&["2"], &["X"]);
        model.fail = true;
        let mut ids = IdAllocator::new();
        let mut log = Diagnostics::new();

        assert_eq!(ids.next_id(&model, &ObjectType::Node, false, &mut log), "1");
        assert_eq!(ids.next_id(&model, &ObjectType::Material, false, &mut log), "Material-1");
        assert_eq!(log.warnings().count(), 2);
    }
}

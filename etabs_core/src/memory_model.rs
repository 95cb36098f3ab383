//! # In-Memory Model
//!
//! An offline stand-in for an ETABS model, implementing [`CsiModel`].
//! It names points the way ETABS does (next free integer), assigns labels
//! and stories from story elevations, and keeps plain name lists for every
//! other category so identifier allocation can be exercised without a live
//! application.
//!
//! ## Example
//!
//! ```rust
//! use etabs_core::memory_model::InMemoryModel;
//! use etabs_core::model::CsiModel;
//! use etabs_core::object_type::ObjectCategory;
//!
//! let mut model = InMemoryModel::new().with_story("Story1", 3.0);
//! let name = model.add_cartesian(0.0, 0.0, 3.0).unwrap();
//! assert_eq!(name, "1");
//! assert_eq!(model.label_and_story(&name).unwrap().1, "Story1");
//! assert_eq!(model.name_list(ObjectCategory::Point).unwrap(), vec!["1"]);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::allocator::successor;
use crate::geometry::Point;
use crate::model::{ApiResult, ApiStatus, CsiModel};
use crate::object_type::ObjectCategory;

/// Story name used below the lowest defined story
pub const BASE_STORY: &str = "Base";

/// Elevation difference under which a point sits on a story
const STORY_TOLERANCE: f64 = 1e-6;

/// A story level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub name: String,
    pub elevation: f64,
}

/// A point stored in the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    pub name: String,
    pub position: Point,
    pub label: String,
    pub story: String,
    pub guid: String,
    #[serde(default)]
    pub restraint: [bool; 6],
    #[serde(default)]
    pub spring: [f64; 6],
}

/// Offline ETABS model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryModel {
    /// Stories ordered by ascending elevation
    #[serde(default)]
    stories: Vec<Story>,

    /// Points in creation order
    #[serde(default)]
    points: Vec<PointRecord>,

    /// Names of objects in every category other than points
    #[serde(default)]
    names: BTreeMap<ObjectCategory, Vec<String>>,

    /// Fail every `SetRestraint` call
    #[serde(default)]
    pub reject_restraints: bool,

    /// Fail every `SetSpring` call
    #[serde(default)]
    pub reject_springs: bool,
}

impl InMemoryModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a story level, keeping stories sorted by elevation.
    pub fn with_story(mut self, name: impl Into<String>, elevation: f64) -> Self {
        self.add_story(name, elevation);
        self
    }

    pub fn add_story(&mut self, name: impl Into<String>, elevation: f64) {
        self.stories.push(Story {
            name: name.into(),
            elevation,
        });
        self.stories.sort_by(|a, b| a.elevation.total_cmp(&b.elevation));
    }

    /// Seed a name in a non-point category (materials, sections, ...).
    ///
    /// Points are created through [`CsiModel::add_cartesian`] only; seeding
    /// [`ObjectCategory::Point`] is ignored.
    pub fn add_name(&mut self, category: ObjectCategory, name: impl Into<String>) {
        if category == ObjectCategory::Point {
            return;
        }
        self.names.entry(category).or_default().push(name.into());
    }

    pub fn with_names<I, S>(mut self, category: ObjectCategory, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.add_name(category, name);
        }
        self
    }

    pub fn stories(&self) -> &[Story] {
        &self.stories
    }

    pub fn points(&self) -> &[PointRecord] {
        &self.points
    }

    pub fn point(&self, name: &str) -> Option<&PointRecord> {
        self.points.iter().find(|p| p.name == name)
    }

    fn point_mut(&mut self, name: &str) -> ApiResult<&mut PointRecord> {
        self.points
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or(ApiStatus::FAILED)
    }

    fn next_point_name(&self) -> String {
        self.points
            .iter()
            .filter_map(|p| successor(&p.name))
            .max()
            .unwrap_or(1)
            .to_string()
    }

    /// Story a point at elevation `z` belongs to, and whether it sits on it.
    fn story_at(&self, z: f64) -> (String, bool) {
        self.stories
            .iter()
            .rev()
            .find(|s| s.elevation <= z + STORY_TOLERANCE)
            .map(|s| (s.name.clone(), (s.elevation - z).abs() <= STORY_TOLERANCE))
            .unwrap_or_else(|| {
                let on_ground = self.stories.is_empty() && z.abs() <= STORY_TOLERANCE;
                (BASE_STORY.to_string(), on_ground)
            })
    }
}

impl CsiModel for InMemoryModel {
    fn add_cartesian(&mut self, x: f64, y: f64, z: f64) -> ApiResult<String> {
        if !(x.is_finite() && y.is_finite() && z.is_finite()) {
            return Err(ApiStatus::FAILED);
        }

        let name = self.next_point_name();
        let (story, on_story) = self.story_at(z);
        let label = if on_story {
            name.clone()
        } else {
            format!("~{}", name)
        };

        self.points.push(PointRecord {
            name: name.clone(),
            position: Point::new(x, y, z),
            label,
            story,
            guid: Uuid::new_v4().to_string(),
            restraint: [false; 6],
            spring: [0.0; 6],
        });
        Ok(name)
    }

    fn label_and_story(&self, name: &str) -> ApiResult<(String, String)> {
        self.point(name)
            .map(|p| (p.label.clone(), p.story.clone()))
            .ok_or(ApiStatus::FAILED)
    }

    fn persistent_guid(&self, name: &str) -> ApiResult<String> {
        self.point(name).map(|p| p.guid.clone()).ok_or(ApiStatus::FAILED)
    }

    fn set_restraint(&mut self, name: &str, restraint: [bool; 6]) -> ApiResult<()> {
        if self.reject_restraints {
            return Err(ApiStatus::FAILED);
        }
        self.point_mut(name)?.restraint = restraint;
        Ok(())
    }

    fn set_spring(&mut self, name: &str, spring: [f64; 6]) -> ApiResult<()> {
        if self.reject_springs {
            return Err(ApiStatus::FAILED);
        }
        self.point_mut(name)?.spring = spring;
        Ok(())
    }

    fn name_list(&self, category: ObjectCategory) -> ApiResult<Vec<String>> {
        match category {
            ObjectCategory::Point => Ok(self.points.iter().map(|p| p.name.clone()).collect()),
            other => Ok(self.names.get(&other).cloned().unwrap_or_default()),
        }
    }
}

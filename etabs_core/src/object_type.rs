//! # Object Types
//!
//! The closed set of object kinds the adapter hands out identifiers for,
//! and the rule each kind follows.
//!
//! ETABS names geometric objects (points, frames, areas) with plain
//! integers. Properties, load patterns, combinations and links are named
//! `<Tag>-<n>` by the adapter. Anything else cannot be counted.
//!
//! ## Example
//!
//! ```rust
//! use etabs_core::object_type::{IdPolicy, ObjectCategory, ObjectType};
//!
//! assert_eq!(ObjectType::Bar.id_policy(), IdPolicy::Numeric(ObjectCategory::Frame));
//! assert_eq!("Material".parse::<ObjectType>().unwrap(), ObjectType::Material);
//! assert_eq!(ObjectType::from("Opening").id_policy(), IdPolicy::Unresolved);
//! ```

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Name-list categories exposed by the ETABS API
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ObjectCategory {
    /// `PointObj`
    Point,
    /// `FrameObj`
    Frame,
    /// `AreaObj`
    Area,
    /// `PropMaterial`
    Material,
    /// `PropFrame`
    FrameSection,
    /// `PropArea`
    AreaSection,
    /// `LoadPatterns`
    LoadPattern,
    /// `RespCombo`
    Combo,
    /// `LinkObj`
    Link,
}

impl ObjectCategory {
    pub const ALL: [ObjectCategory; 9] = [
        ObjectCategory::Point,
        ObjectCategory::Frame,
        ObjectCategory::Area,
        ObjectCategory::Material,
        ObjectCategory::FrameSection,
        ObjectCategory::AreaSection,
        ObjectCategory::LoadPattern,
        ObjectCategory::Combo,
        ObjectCategory::Link,
    ];

    /// Name of the ETABS API interface owning the name list
    pub fn api_name(&self) -> &'static str {
        match self {
            ObjectCategory::Point => "PointObj",
            ObjectCategory::Frame => "FrameObj",
            ObjectCategory::Area => "AreaObj",
            ObjectCategory::Material => "PropMaterial",
            ObjectCategory::FrameSection => "PropFrame",
            ObjectCategory::AreaSection => "PropArea",
            ObjectCategory::LoadPattern => "LoadPatterns",
            ObjectCategory::Combo => "RespCombo",
            ObjectCategory::Link => "LinkObj",
        }
    }
}

impl fmt::Display for ObjectCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_name())
    }
}

impl FromStr for ObjectCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_ascii_lowercase();
        ObjectCategory::ALL
            .into_iter()
            .find(|c| {
                c.api_name().to_ascii_lowercase() == wanted
                    || format!("{:?}", c).to_ascii_lowercase() == wanted
            })
            .ok_or_else(|| format!("unknown object category '{}'", s))
    }
}

/// How the next free identifier of a type is derived
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdPolicy {
    /// `max(existing) + 1` over integer names
    Numeric(ObjectCategory),
    /// `<Tag>-<count + 1>` over the number of existing names
    Prefixed(ObjectCategory),
    /// No name list to consult
    Unresolved,
}

/// Object-type tag used as identifier cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectType {
    Node,
    Bar,
    PanelPlanar,
    Material,
    SectionProperty,
    Property2D,
    Loadcase,
    LoadCombination,
    RigidLink,
    /// A type the adapter has no name list for
    Other(String),
}

impl ObjectType {
    /// Every type with a known id policy
    pub const KNOWN: [ObjectType; 9] = [
        ObjectType::Node,
        ObjectType::Bar,
        ObjectType::PanelPlanar,
        ObjectType::Material,
        ObjectType::SectionProperty,
        ObjectType::Property2D,
        ObjectType::Loadcase,
        ObjectType::LoadCombination,
        ObjectType::RigidLink,
    ];

    /// Tag used in prefixed identifiers and diagnostics
    pub fn tag(&self) -> &str {
        match self {
            ObjectType::Node => "Node",
            ObjectType::Bar => "Bar",
            ObjectType::PanelPlanar => "PanelPlanar",
            ObjectType::Material => "Material",
            ObjectType::SectionProperty => "SectionProperty",
            ObjectType::Property2D => "Property2D",
            ObjectType::Loadcase => "Loadcase",
            ObjectType::LoadCombination => "LoadCombination",
            ObjectType::RigidLink => "RigidLink",
            ObjectType::Other(tag) => tag,
        }
    }

    pub fn id_policy(&self) -> IdPolicy {
        match self {
            ObjectType::Node => IdPolicy::Numeric(ObjectCategory::Point),
            ObjectType::Bar => IdPolicy::Numeric(ObjectCategory::Frame),
            ObjectType::PanelPlanar => IdPolicy::Numeric(ObjectCategory::Area),
            ObjectType::Material => IdPolicy::Prefixed(ObjectCategory::Material),
            ObjectType::SectionProperty => IdPolicy::Prefixed(ObjectCategory::FrameSection),
            ObjectType::Property2D => IdPolicy::Prefixed(ObjectCategory::AreaSection),
            ObjectType::Loadcase => IdPolicy::Prefixed(ObjectCategory::LoadPattern),
            ObjectType::LoadCombination => IdPolicy::Prefixed(ObjectCategory::Combo),
            ObjectType::RigidLink => IdPolicy::Prefixed(ObjectCategory::Link),
            ObjectType::Other(_) => IdPolicy::Unresolved,
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl From<&str> for ObjectType {
    fn from(tag: &str) -> Self {
        ObjectType::KNOWN
            .into_iter()
            .find(|known| known.tag() == tag)
            .unwrap_or_else(|| ObjectType::Other(tag.to_string()))
    }
}

impl FromStr for ObjectType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ObjectType::from(s))
    }
}

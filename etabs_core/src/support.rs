//! # Supports
//!
//! Six degree-of-freedom nodal constraints and their conversion to the
//! restraint/spring vectors ETABS expects from `PointObj.SetRestraint` and
//! `PointObj.SetSpring`.
//!
//! DOF order everywhere is `[UX, UY, UZ, RX, RY, RZ]`.
//!
//! ## Example
//!
//! ```rust
//! use etabs_core::support::Constraint6Dof;
//!
//! let pin = Constraint6Dof::pin();
//! let csi = pin.to_csi();
//! assert_eq!(csi.restraint, [true, true, true, false, false, false]);
//! assert_eq!(csi.spring, [0.0; 6]);
//! ```

use serde::{Deserialize, Serialize};

/// Behaviour of a single degree of freedom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DofType {
    #[default]
    Free,
    Fixed,
    /// Elastic support; the stiffness lives on the owning [`Constraint6Dof`]
    Spring,
}

/// Nodal support definition.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Constraint6Dof {
    #[serde(default)]
    pub name: String,

    pub translation_x: DofType,
    pub translation_y: DofType,
    pub translation_z: DofType,
    pub rotation_x: DofType,
    pub rotation_y: DofType,
    pub rotation_z: DofType,

    /// Translational stiffness (force / length)
    #[serde(default)]
    pub translational_stiffness_x: f64,
    #[serde(default)]
    pub translational_stiffness_y: f64,
    #[serde(default)]
    pub translational_stiffness_z: f64,

    /// Rotational stiffness (moment / radian)
    #[serde(default)]
    pub rotational_stiffness_x: f64,
    #[serde(default)]
    pub rotational_stiffness_y: f64,
    #[serde(default)]
    pub rotational_stiffness_z: f64,
}

/// Restraint and spring vectors in ETABS argument order
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CsiSupport {
    pub restraint: [bool; 6],
    pub spring: [f64; 6],
}

impl Constraint6Dof {
    /// Build a constraint from six DOF types, no stiffness.
    pub fn from_dofs(name: impl Into<String>, dofs: [DofType; 6]) -> Self {
        Constraint6Dof {
            name: name.into(),
            translation_x: dofs[0],
            translation_y: dofs[1],
            translation_z: dofs[2],
            rotation_x: dofs[3],
            rotation_y: dofs[4],
            rotation_z: dofs[5],
            ..Default::default()
        }
    }

    /// All six DOFs fixed
    pub fn fix() -> Self {
        Self::from_dofs("Fix", [DofType::Fixed; 6])
    }

    /// Translations fixed, rotations free
    pub fn pin() -> Self {
        use DofType::{Fixed, Free};
        Self::from_dofs("Pin", [Fixed, Fixed, Fixed, Free, Free, Free])
    }

    /// No restraint at all
    pub fn free() -> Self {
        Self::from_dofs("Free", [DofType::Free; 6])
    }

    /// Elastic support with the given stiffness per DOF.
    ///
    /// A zero stiffness leaves that DOF free.
    pub fn spring(name: impl Into<String>, stiffness: [f64; 6]) -> Self {
        let dof = |k: f64| if k != 0.0 { DofType::Spring } else { DofType::Free };
        Constraint6Dof {
            name: name.into(),
            translation_x: dof(stiffness[0]),
            translation_y: dof(stiffness[1]),
            translation_z: dof(stiffness[2]),
            rotation_x: dof(stiffness[3]),
            rotation_y: dof(stiffness[4]),
            rotation_z: dof(stiffness[5]),
            translational_stiffness_x: stiffness[0],
            translational_stiffness_y: stiffness[1],
            translational_stiffness_z: stiffness[2],
            rotational_stiffness_x: stiffness[3],
            rotational_stiffness_y: stiffness[4],
            rotational_stiffness_z: stiffness[5],
        }
    }

    /// DOF types in `[UX, UY, UZ, RX, RY, RZ]` order
    pub fn dofs(&self) -> [DofType; 6] {
        [
            self.translation_x,
            self.translation_y,
            self.translation_z,
            self.rotation_x,
            self.rotation_y,
            self.rotation_z,
        ]
    }

    /// Stiffness values in `[UX, UY, UZ, RX, RY, RZ]` order
    pub fn stiffness(&self) -> [f64; 6] {
        [
            self.translational_stiffness_x,
            self.translational_stiffness_y,
            self.translational_stiffness_z,
            self.rotational_stiffness_x,
            self.rotational_stiffness_y,
            self.rotational_stiffness_z,
        ]
    }

    /// Convert to ETABS restraint/spring vectors.
    ///
    /// Only `Fixed` DOFs are restrained. Stiffness values are passed through
    /// unchanged for every DOF.
    pub fn to_csi(&self) -> CsiSupport {
        CsiSupport {
            restraint: self.dofs().map(|dof| dof == DofType::Fixed),
            spring: self.stiffness(),
        }
    }
}

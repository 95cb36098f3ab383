//! # Geometry
//!
//! Minimal geometry needed to place nodes: points, direction vectors and
//! the orthonormal basis describing a node's local axes.
//!
//! ETABS only knows the global coordinate system, so the only question the
//! adapter ever asks a [`Basis`] is whether it equals [`Basis::XY`].
//!
//! ## Example
//!
//! ```rust
//! use etabs_core::geometry::{Basis, Point};
//!
//! let p = Point::new(1.0, 2.0, 3.0);
//! assert_eq!(p.coords(), [1.0, 2.0, 3.0]);
//! assert!(Basis::XY.is_equal(&Basis::default(), 1e-6));
//! ```

use serde::{Deserialize, Serialize};

/// A location in global model space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Point { x, y, z }
    }

    /// Coordinates as an array
    pub fn coords(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

/// A direction in global model space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Vector { x, y, z }
    }

    /// Component-wise equality within `tolerance`
    pub fn is_equal(&self, other: &Vector, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance
            && (self.y - other.y).abs() <= tolerance
            && (self.z - other.z).abs() <= tolerance
    }
}

/// Local axis system of an object, given as three axis vectors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Basis {
    pub x: Vector,
    pub y: Vector,
    pub z: Vector,
}

impl Basis {
    /// The global coordinate system
    pub const XY: Basis = Basis {
        x: Vector::new(1.0, 0.0, 0.0),
        y: Vector::new(0.0, 1.0, 0.0),
        z: Vector::new(0.0, 0.0, 1.0),
    };

    pub fn new(x: Vector, y: Vector, z: Vector) -> Self {
        Basis { x, y, z }
    }

    /// Basis rotated about the global Z axis by `angle` radians.
    pub fn rotated_about_z(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Basis {
            x: Vector::new(cos, sin, 0.0),
            y: Vector::new(-sin, cos, 0.0),
            z: Vector::new(0.0, 0.0, 1.0),
        }
    }

    /// Axis-by-axis equality within `tolerance`
    pub fn is_equal(&self, other: &Basis, tolerance: f64) -> bool {
        self.x.is_equal(&other.x, tolerance)
            && self.y.is_equal(&other.y, tolerance)
            && self.z.is_equal(&other.z, tolerance)
    }

    /// True when this basis coincides with [`Basis::XY`]
    pub fn is_global(&self, tolerance: f64) -> bool {
        self.is_equal(&Basis::XY, tolerance)
    }
}

impl Default for Basis {
    fn default() -> Self {
        Basis::XY
    }
}

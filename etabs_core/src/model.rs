//! # Model Port
//!
//! The slice of the ETABS API the adapter talks to. ETABS reports failure
//! through non-zero integer return codes; here every call returns
//! `Result<_, ApiStatus>` instead.
//!
//! A live connection implements this trait on top of the COM interop layer.
//! [`crate::memory_model::InMemoryModel`] implements it offline.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::AdapterError;
use crate::object_type::ObjectCategory;

/// Non-zero return code of an ETABS API call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiStatus(pub i32);

impl ApiStatus {
    /// Generic failure code returned by most ETABS calls
    pub const FAILED: ApiStatus = ApiStatus(1);

    /// Turn the status into an error naming the failed call
    pub fn into_error(self, call: &str) -> AdapterError {
        AdapterError::api_call_failed(call, self.0)
    }
}

impl fmt::Display for ApiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "status {}", self.0)
    }
}

pub type ApiResult<T> = Result<T, ApiStatus>;

/// Calls the adapter issues against an open ETABS model.
pub trait CsiModel {
    /// `PointObj.AddCartesian`: create a point, returning its assigned name.
    fn add_cartesian(&mut self, x: f64, y: f64, z: f64) -> ApiResult<String>;

    /// `PointObj.GetLabelFromName`: `(label, story)` of a point
    fn label_and_story(&self, name: &str) -> ApiResult<(String, String)>;

    /// `PointObj.GetGUID`
    fn persistent_guid(&self, name: &str) -> ApiResult<String>;

    /// `PointObj.SetRestraint`, DOFs in `[UX, UY, UZ, RX, RY, RZ]` order
    fn set_restraint(&mut self, name: &str, restraint: [bool; 6]) -> ApiResult<()>;

    /// `PointObj.SetSpring`, DOFs in `[UX, UY, UZ, RX, RY, RZ]` order
    fn set_spring(&mut self, name: &str, spring: [f64; 6]) -> ApiResult<()>;

    /// `<Interface>.GetNameList` for the given category
    fn name_list(&self, category: ObjectCategory) -> ApiResult<Vec<String>>;
}

impl<M: CsiModel + ?Sized> CsiModel for &mut M {
    fn add_cartesian(&mut self, x: f64, y: f64, z: f64) -> ApiResult<String> {
        (**self).add_cartesian(x, y, z)
    }

    fn label_and_story(&self, name: &str) -> ApiResult<(String, String)> {
        (**self).label_and_story(name)
    }

    fn persistent_guid(&self, name: &str) -> ApiResult<String> {
        (**self).persistent_guid(name)
    }

    fn set_restraint(&mut self, name: &str, restraint: [bool; 6]) -> ApiResult<()> {
        (**self).set_restraint(name, restraint)
    }

    fn set_spring(&mut self, name: &str, spring: [f64; 6]) -> ApiResult<()> {
        (**self).set_spring(name, spring)
    }

    fn name_list(&self, category: ObjectCategory) -> ApiResult<Vec<String>> {
        (**self).name_list(category)
    }
}

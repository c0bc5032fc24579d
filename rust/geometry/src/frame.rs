// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Identity and pose shared by every node of a station tree.

use std::fmt;

use dt_lite_core::{Bounds, GeometrySource, Pose, RawId};
use nalgebra::{Point3, Vector3};

use crate::error::Result;

/// One physical component: station, super layer, layer or drift cell.
///
/// Fields come straight from the geometry source and are never modified
/// after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct DtFrame {
    id: RawId,
    number: i32,
    local_position: Point3<f64>,
    global_position: Point3<f64>,
    direction: Vector3<f64>,
    bounds: Bounds,
}

impl DtFrame {
    /// Creates a frame from an already fetched pose.
    pub fn new(id: RawId, number: i32, pose: &Pose) -> Self {
        Self {
            id,
            number,
            local_position: Point3::from(pose.local_position),
            global_position: Point3::from(pose.global_position),
            direction: Vector3::from(pose.direction),
            bounds: pose.bounds,
        }
    }

    /// Fetches the pose of `id` and creates the frame.
    pub fn from_source<S: GeometrySource + ?Sized>(source: &S, id: RawId, number: i32) -> Result<Self> {
        let pose = source.pose(id)?;
        Ok(Self::new(id, number, &pose))
    }

    #[inline]
    pub fn id(&self) -> RawId {
        self.id
    }

    /// Number of the component within its parent (station type for a station).
    #[inline]
    pub fn number(&self) -> i32 {
        self.number
    }

    /// Position in the parent frame.
    #[inline]
    pub fn local_position(&self) -> &Point3<f64> {
        &self.local_position
    }

    /// Position in the CMS frame.
    #[inline]
    pub fn global_position(&self) -> &Point3<f64> {
        &self.global_position
    }

    /// Unit normal of the component face, in the CMS frame.
    #[inline]
    pub fn direction(&self) -> &Vector3<f64> {
        &self.direction
    }

    #[inline]
    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    #[inline]
    pub fn x_local(&self) -> f64 {
        self.local_position.x
    }

    #[inline]
    pub fn y_local(&self) -> f64 {
        self.local_position.y
    }

    #[inline]
    pub fn z_local(&self) -> f64 {
        self.local_position.z
    }

    #[inline]
    pub fn x_global(&self) -> f64 {
        self.global_position.x
    }

    #[inline]
    pub fn y_global(&self) -> f64 {
        self.global_position.y
    }

    #[inline]
    pub fn z_global(&self) -> f64 {
        self.global_position.z
    }
}

impl AsRef<DtFrame> for DtFrame {
    fn as_ref(&self) -> &DtFrame {
        self
    }
}

impl fmt::Display for DtFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "id {}, global ({:.2}, {:.2}, {:.2})",
            self.id,
            self.x_global(),
            self.y_global(),
            self.z_global()
        )
    }
}

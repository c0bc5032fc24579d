// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pose records returned by a geometry source.

use serde::{Deserialize, Serialize};

/// Physical extents of a component, in centimetres.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    /// Extent along the local x axis.
    pub width: f64,
    /// Extent along the local y axis.
    pub height: f64,
    /// Extent along the local z axis (thickness).
    pub length: f64,
}

impl Bounds {
    pub fn new(width: f64, height: f64, length: f64) -> Self {
        Self {
            width,
            height,
            length,
        }
    }
}

/// Placement data of one component.
///
/// `direction` is the unit normal of the face the component points to,
/// expressed in the global detector frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub local_position: [f64; 3],
    pub global_position: [f64; 3],
    pub direction: [f64; 3],
    pub bounds: Bounds,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            local_position: [0.0; 3],
            global_position: [0.0; 3],
            direction: [0.0, 0.0, 1.0],
            bounds: Bounds::default(),
        }
    }
}

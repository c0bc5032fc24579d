// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! DT-Lite Geometry
//!
//! Station trees (station → super layer → layer → drift cell) built from a
//! [`GeometrySource`], with the coordinate-frame transforms a viewer needs to
//! place every component in CMS or in the station "natural view" frames.
//! Uses nalgebra for all transformations.

pub mod address;
pub mod attributes;
pub mod cell;
pub mod error;
pub mod frame;
pub mod layer;
pub mod station;
pub mod super_layer;
pub mod transforms;

use rayon::prelude::*;

// Re-export nalgebra types for convenience
pub use nalgebra::{Matrix3, Point3, Vector3};

pub use address::ChamberAddress;
pub use attributes::{AttrValue, Attributes, CellAddress, CellInfo, CellTable, IngestReport, Record};
pub use cell::Cell;
pub use dt_lite_core::GeometrySource;
pub use error::{Error, Result};
pub use frame::DtFrame;
pub use layer::Layer;
pub use station::{Frame, Station};
pub use super_layer::SuperLayer;
pub use transforms::{RigidTransform, TransformManager};

/// Builds independent stations in parallel.
///
/// Results are returned in the order of `addresses`; one failing station does
/// not affect the others.
pub fn build_stations<S>(source: &S, addresses: &[ChamberAddress]) -> Vec<Result<Station>>
where
    S: GeometrySource + Sync + ?Sized,
{
    addresses
        .par_iter()
        .map(|address| Station::from_address(source, *address))
        .collect()
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # DT-Lite Core
//!
//! Identifiers and geometry lookups for CMS Drift Tube (DT) chambers.
//!
//! ## Overview
//!
//! - **Raw ids**: packed 32-bit component identifiers ([`RawId`], [`DtWireId`])
//! - **Poses**: local/global position, face normal and bounds of a component ([`Pose`])
//! - **Geometry sources**: the [`GeometrySource`] trait consumed by tree builders
//! - **Geometry tables**: an in-memory [`GeometryTable`] loadable from JSON
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dt_lite_core::{ChildKind, GeometrySource, GeometryTable};
//!
//! let table = GeometryTable::from_json(&std::fs::read_to_string("dt_geometry.json")?)?;
//! let chamber = table.resolve_identifier(-2, 1, 2)?;
//! for sl in table.children(chamber, ChildKind::SuperLayer)? {
//!     println!("super layer {} at {:?}", table.number(sl, ChildKind::SuperLayer)?, table.pose(sl)?.global_position);
//! }
//! ```

pub mod error;
pub mod ids;
pub mod pose;
pub mod source;
pub mod table;

pub use error::{Error, Result};
pub use ids::{ChildKind, DtWireId, RawId};
pub use pose::{Bounds, Pose};
pub use source::GeometrySource;
pub use table::{
    ChamberRecord, GeometryFile, GeometryTable, LayerRecord, SuperLayerRecord, WireRecord,
};

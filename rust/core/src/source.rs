// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The geometry source contract.
//!
//! A geometry source answers three questions about the detector: which raw
//! id sits at a chamber position, where a component is, and which components
//! sit directly below it. Tree builders only talk to this trait, so tests
//! can swap in a synthetic table.

use crate::error::Result;
use crate::ids::{ChildKind, DtWireId, RawId};
use crate::pose::Pose;

pub trait GeometrySource {
    /// Raw id of the chamber at `(wheel, sector, station)`.
    fn resolve_identifier(&self, wheel: i32, sector: i32, station: i32) -> Result<RawId>;

    /// Pose of the component `id`.
    fn pose(&self, id: RawId) -> Result<Pose>;

    /// Immediate children of `id` of the given kind, in source order.
    fn children(&self, id: RawId, kind: ChildKind) -> Result<Vec<RawId>>;

    /// Number of a child component within its parent (super layer, layer or
    /// wire number depending on `kind`).
    ///
    /// The default decodes the packed DT raw id layout.
    fn number(&self, id: RawId, kind: ChildKind) -> Result<i32> {
        Ok(DtWireId::decode(id)?.number(kind))
    }
}

impl<S: GeometrySource + ?Sized> GeometrySource for &S {
    fn resolve_identifier(&self, wheel: i32, sector: i32, station: i32) -> Result<RawId> {
        (**self).resolve_identifier(wheel, sector, station)
    }

    fn pose(&self, id: RawId) -> Result<Pose> {
        (**self).pose(id)
    }

    fn children(&self, id: RawId, kind: ChildKind) -> Result<Vec<RawId>> {
        (**self).children(id, kind)
    }

    fn number(&self, id: RawId, kind: ChildKind) -> Result<i32> {
        (**self).number(id, kind)
    }
}

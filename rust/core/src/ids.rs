// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Raw detector identifiers.
//!
//! Every DT component (chamber, super layer, layer, wire) is addressed by a
//! packed 32-bit raw id. The layout follows the CMS muon numbering scheme:
//!
//! ```text
//!  31..28  27..25  24..22   21..18  17..15  14..13  12..10  9..3   2..0
//!  det=2   sub=1   station  sector  wheel   slayer  layer   wire   unused
//! ```
//!
//! The wheel is stored with an offset so that wheel `-2` encodes as `1`.
//! A zero in a trailing field means "the whole parent", so a chamber id has
//! super layer, layer and wire all set to zero.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const DETECTOR_MUON: u32 = 2;
const SUBDETECTOR_DT: u32 = 1;

const DETECTOR_START: u32 = 28;
const SUBDETECTOR_START: u32 = 25;

const STATION_START: u32 = 22;
const STATION_MASK: u32 = 0x7;
const SECTOR_START: u32 = 18;
const SECTOR_MASK: u32 = 0xF;
const WHEEL_START: u32 = 15;
const WHEEL_MASK: u32 = 0x7;
const WHEEL_OFFSET: i32 = 3;
const SUPER_LAYER_START: u32 = 13;
const SUPER_LAYER_MASK: u32 = 0x3;
const LAYER_START: u32 = 10;
const LAYER_MASK: u32 = 0x7;
const WIRE_START: u32 = 3;
const WIRE_MASK: u32 = 0x7F;

/// Opaque identifier handed out by a geometry source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawId(pub u32);

impl RawId {
    /// Returns the packed value.
    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for RawId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for RawId {
    fn from(v: u32) -> Self {
        RawId(v)
    }
}

/// The kind of children enumerated below a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChildKind {
    SuperLayer,
    Layer,
    Cell,
}

impl ChildKind {
    /// Returns the kind name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChildKind::SuperLayer => "SuperLayer",
            ChildKind::Layer => "Layer",
            ChildKind::Cell => "Cell",
        }
    }
}

impl fmt::Display for ChildKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoded DT address. Trailing zero fields address a parent component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DtWireId {
    pub wheel: i32,
    pub station: i32,
    pub sector: i32,
    pub super_layer: i32,
    pub layer: i32,
    pub wire: i32,
}

impl DtWireId {
    /// Address of a whole chamber.
    pub fn chamber(wheel: i32, sector: i32, station: i32) -> Self {
        Self {
            wheel,
            station,
            sector,
            super_layer: 0,
            layer: 0,
            wire: 0,
        }
    }

    /// Address of a super layer inside this chamber.
    pub fn with_super_layer(self, super_layer: i32) -> Self {
        Self {
            super_layer,
            layer: 0,
            wire: 0,
            ..self
        }
    }

    /// Address of a layer inside this super layer.
    pub fn with_layer(self, layer: i32) -> Self {
        Self {
            layer,
            wire: 0,
            ..self
        }
    }

    /// Address of a wire inside this layer.
    pub fn with_wire(self, wire: i32) -> Self {
        Self { wire, ..self }
    }

    /// Packs the address into a raw id.
    pub fn encode(&self) -> Result<RawId> {
        let stored_wheel = self.wheel + WHEEL_OFFSET;
        let fields = [
            ("station", self.station, STATION_MASK, STATION_START),
            ("sector", self.sector, SECTOR_MASK, SECTOR_START),
            ("wheel", stored_wheel, WHEEL_MASK, WHEEL_START),
            ("super layer", self.super_layer, SUPER_LAYER_MASK, SUPER_LAYER_START),
            ("layer", self.layer, LAYER_MASK, LAYER_START),
            ("wire", self.wire, WIRE_MASK, WIRE_START),
        ];

        let mut raw = (DETECTOR_MUON << DETECTOR_START) | (SUBDETECTOR_DT << SUBDETECTOR_START);
        for (field, value, mask, start) in fields {
            if value < 0 || value as u32 > mask {
                let value = if field == "wheel" { self.wheel } else { value };
                return Err(Error::FieldOutOfRange { field, value });
            }
            raw |= (value as u32) << start;
        }
        if stored_wheel == 0 {
            return Err(Error::FieldOutOfRange {
                field: "wheel",
                value: self.wheel,
            });
        }
        Ok(RawId(raw))
    }

    /// Unpacks a raw id.
    pub fn decode(id: RawId) -> Result<Self> {
        let raw = id.get();
        if raw >> DETECTOR_START != DETECTOR_MUON || (raw >> SUBDETECTOR_START) & 0x7 != SUBDETECTOR_DT
        {
            return Err(Error::InvalidRawId(raw));
        }

        let stored_wheel = ((raw >> WHEEL_START) & WHEEL_MASK) as i32;
        if stored_wheel == 0 {
            return Err(Error::InvalidRawId(raw));
        }

        Ok(Self {
            wheel: stored_wheel - WHEEL_OFFSET,
            station: ((raw >> STATION_START) & STATION_MASK) as i32,
            sector: ((raw >> SECTOR_START) & SECTOR_MASK) as i32,
            super_layer: ((raw >> SUPER_LAYER_START) & SUPER_LAYER_MASK) as i32,
            layer: ((raw >> LAYER_START) & LAYER_MASK) as i32,
            wire: ((raw >> WIRE_START) & WIRE_MASK) as i32,
        })
    }

    /// Number of this address at the level of `kind`.
    pub fn number(&self, kind: ChildKind) -> i32 {
        match kind {
            ChildKind::SuperLayer => self.super_layer,
            ChildKind::Layer => self.layer,
            ChildKind::Cell => self.wire,
        }
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory geometry table.
//!
//! [`GeometryTable`] is a [`GeometrySource`] backed by nested chamber records,
//! usually loaded from a JSON dump of the detector description:
//!
//! ```json
//! { "chambers": [ { "wheel": -2, "sector": 1, "station": 2,
//!                   "pose": { ... },
//!                   "super_layers": [ { "number": 1, "pose": { ... },
//!                                       "layers": [ { "number": 1, "pose": { ... },
//!                                                     "wires": [ { "wire": 1, "pose": { ... } } ] } ] } ] } ] }
//! ```
//!
//! Raw ids may be given explicitly; when omitted they are packed from the
//! chamber position and child numbers.

use std::io::Read;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::ids::{ChildKind, DtWireId, RawId};
use crate::pose::Pose;
use crate::source::GeometrySource;

/// Top-level layout of a geometry table file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeometryFile {
    pub chambers: Vec<ChamberRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChamberRecord {
    pub wheel: i32,
    pub sector: i32,
    pub station: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_id: Option<RawId>,
    pub pose: Pose,
    #[serde(default)]
    pub super_layers: Vec<SuperLayerRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuperLayerRecord {
    pub number: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_id: Option<RawId>,
    pub pose: Pose,
    #[serde(default)]
    pub layers: Vec<LayerRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerRecord {
    pub number: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_id: Option<RawId>,
    pub pose: Pose,
    #[serde(default)]
    pub wires: Vec<WireRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireRecord {
    pub wire: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_id: Option<RawId>,
    pub pose: Pose,
}

#[derive(Debug, Clone)]
struct Node {
    pose: Pose,
    number: i32,
    child_kind: Option<ChildKind>,
    children: Vec<RawId>,
}

impl Node {
    fn leaf(pose: Pose, number: i32) -> Self {
        Self {
            pose,
            number,
            child_kind: None,
            children: Vec::new(),
        }
    }

    fn branch(pose: Pose, number: i32, kind: ChildKind, children: Vec<RawId>) -> Self {
        Self {
            pose,
            number,
            child_kind: Some(kind),
            children,
        }
    }
}

/// Geometry source holding every component in memory.
#[derive(Debug, Default)]
pub struct GeometryTable {
    chambers: FxHashMap<(i32, i32, i32), RawId>,
    nodes: FxHashMap<RawId, Node>,
}

impl GeometryTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a table from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: GeometryFile = serde_json::from_str(json)?;
        Self::from_records(file)
    }

    /// Reads a table from a JSON stream.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let file: GeometryFile = serde_json::from_reader(reader)?;
        Self::from_records(file)
    }

    /// Builds a table from already-parsed records.
    pub fn from_records(file: GeometryFile) -> Result<Self> {
        let mut table = Self::new();
        for chamber in file.chambers {
            table.insert_chamber(chamber)?;
        }
        Ok(table)
    }

    /// Inserts a chamber with all of its descendants and returns its raw id.
    ///
    /// Every id is checked before anything is inserted, so a duplicate leaves
    /// the table unchanged.
    pub fn insert_chamber(&mut self, record: ChamberRecord) -> Result<RawId> {
        let address = DtWireId::chamber(record.wheel, record.sector, record.station);
        let chamber_id = id_or_packed(record.raw_id, &address)?;

        let mut staged: Vec<(RawId, Node)> = Vec::new();
        let mut super_layer_ids = Vec::with_capacity(record.super_layers.len());
        for sl in record.super_layers {
            let sl_address = address.with_super_layer(sl.number);
            let sl_id = id_or_packed(sl.raw_id, &sl_address)?;

            let mut layer_ids = Vec::with_capacity(sl.layers.len());
            for layer in sl.layers {
                let layer_address = sl_address.with_layer(layer.number);
                let layer_id = id_or_packed(layer.raw_id, &layer_address)?;

                let mut wire_ids = Vec::with_capacity(layer.wires.len());
                for wire in layer.wires {
                    let wire_id = id_or_packed(wire.raw_id, &layer_address.with_wire(wire.wire))?;
                    staged.push((wire_id, Node::leaf(wire.pose, wire.wire)));
                    wire_ids.push(wire_id);
                }

                staged.push((
                    layer_id,
                    Node::branch(layer.pose, layer.number, ChildKind::Cell, wire_ids),
                ));
                layer_ids.push(layer_id);
            }

            staged.push((
                sl_id,
                Node::branch(sl.pose, sl.number, ChildKind::Layer, layer_ids),
            ));
            super_layer_ids.push(sl_id);
        }
        staged.push((
            chamber_id,
            Node::branch(
                record.pose,
                record.station,
                ChildKind::SuperLayer,
                super_layer_ids,
            ),
        ));

        let mut seen = FxHashSet::default();
        for (id, _) in &staged {
            if self.nodes.contains_key(id) || !seen.insert(*id) {
                return Err(Error::DuplicateId(*id));
            }
        }

        self.nodes.extend(staged);
        self.chambers
            .insert((record.wheel, record.sector, record.station), chamber_id);
        Ok(chamber_id)
    }

    /// Number of chambers in the table.
    pub fn chamber_count(&self) -> usize {
        self.chambers.len()
    }

    /// Number of components (all levels) in the table.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Chamber positions `(wheel, sector, station)`, sorted.
    pub fn chamber_positions(&self) -> Vec<(i32, i32, i32)> {
        let mut positions: Vec<_> = self.chambers.keys().copied().collect();
        positions.sort_unstable();
        positions
    }

    fn node(&self, id: RawId) -> Result<&Node> {
        self.nodes.get(&id).ok_or(Error::UnknownId(id))
    }
}

fn id_or_packed(explicit: Option<RawId>, address: &DtWireId) -> Result<RawId> {
    match explicit {
        Some(id) => Ok(id),
        None => address.encode(),
    }
}

impl GeometrySource for GeometryTable {
    fn resolve_identifier(&self, wheel: i32, sector: i32, station: i32) -> Result<RawId> {
        self.chambers
            .get(&(wheel, sector, station))
            .copied()
            .ok_or(Error::UnknownChamber {
                wheel,
                sector,
                station,
            })
    }

    fn pose(&self, id: RawId) -> Result<Pose> {
        Ok(self.node(id)?.pose)
    }

    fn children(&self, id: RawId, kind: ChildKind) -> Result<Vec<RawId>> {
        let node = self.node(id)?;
        if node.child_kind == Some(kind) {
            Ok(node.children.clone())
        } else {
            Ok(Vec::new())
        }
    }

    fn number(&self, id: RawId, _kind: ChildKind) -> Result<i32> {
        Ok(self.node(id)?.number)
    }
}

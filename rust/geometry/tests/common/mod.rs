// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Synthetic DT geometry for tests.
//!
//! Chambers sit on a barrel: radius by station, azimuth by sector, z by wheel.
//! Super layers are stacked along the chamber normal, layers inside them,
//! wires spread along the station x axis.

#![allow(dead_code)]

use dt_lite_core::{
    Bounds, ChamberRecord, GeometryTable, LayerRecord, Pose, SuperLayerRecord, WireRecord,
};
use dt_lite_geometry::{ChamberAddress, Vector3};

pub const WIRES_PER_LAYER: i32 = 24;
pub const WIRE_PITCH: f64 = 4.2;
pub const LAYER_PITCH: f64 = 1.3;

const RADII: [f64; 4] = [430.0, 510.0, 600.0, 700.0];

/// Super layer numbers in the order the source reports them.
pub fn super_layer_order(station: i32) -> Vec<i32> {
    if station == 4 {
        vec![3, 1]
    } else {
        vec![3, 1, 2]
    }
}

pub fn super_layer_offset(number: i32) -> f64 {
    match number {
        1 => -11.0,
        3 => 11.0,
        _ => 0.0,
    }
}

pub fn layer_offset(number: i32) -> f64 {
    (number as f64 - 2.5) * LAYER_PITCH
}

pub fn wire_offset(wire: i32) -> f64 {
    (wire as f64 - (WIRES_PER_LAYER as f64 + 1.0) / 2.0) * WIRE_PITCH
}

fn sector_phi(sector: i32) -> f64 {
    let effective = match sector {
        13 => 4,
        14 => 10,
        s => s,
    };
    ((effective - 1) as f64 * 30.0).to_radians()
}

fn pose(local: Vector3<f64>, global: Vector3<f64>, direction: Vector3<f64>, bounds: Bounds) -> Pose {
    Pose {
        local_position: local.into(),
        global_position: global.into(),
        direction: direction.into(),
        bounds,
    }
}

/// Chamber record for one position.
pub fn chamber_record(wheel: i32, sector: i32, station: i32) -> ChamberRecord {
    let phi = sector_phi(sector);
    let radius = RADII[(station - 1) as usize];
    let direction = Vector3::new(phi.cos(), phi.sin(), 0.0);
    let center = direction * radius + Vector3::new(0.0, 0.0, wheel as f64 * 265.0);

    let orientation = ChamberAddress::new(wheel, sector, station)
        .map(|a| a.face_orientation())
        .unwrap_or(1.0);
    let ex = (Vector3::new(0.0, 0.0, 1.0) * orientation).cross(&direction);

    let super_layers = super_layer_order(station)
        .into_iter()
        .map(|sl| {
            let sl_offset = super_layer_offset(sl);
            let sl_center = center + direction * sl_offset;

            let layers = (1..=4)
                .map(|l| {
                    let l_offset = layer_offset(l);
                    let l_center = sl_center + direction * l_offset;

                    let wires = (1..=WIRES_PER_LAYER)
                        .map(|w| WireRecord {
                            wire: w,
                            raw_id: None,
                            pose: pose(
                                Vector3::new(wire_offset(w), 0.0, 0.0),
                                l_center + ex * wire_offset(w),
                                direction,
                                Bounds::new(4.2, 250.0, 1.3),
                            ),
                        })
                        .collect();

                    LayerRecord {
                        number: l,
                        raw_id: None,
                        pose: pose(
                            Vector3::new(0.0, 0.0, l_offset),
                            l_center,
                            direction,
                            Bounds::new(200.0, 250.0, 1.3),
                        ),
                        wires,
                    }
                })
                .collect();

            SuperLayerRecord {
                number: sl,
                raw_id: None,
                pose: pose(
                    Vector3::new(0.0, 0.0, sl_offset),
                    sl_center,
                    direction,
                    Bounds::new(200.0, 250.0, 5.2),
                ),
                layers,
            }
        })
        .collect();

    ChamberRecord {
        wheel,
        sector,
        station,
        raw_id: None,
        pose: pose(
            Vector3::zeros(),
            center,
            direction,
            Bounds::new(200.0, 250.0, 30.0),
        ),
        super_layers,
    }
}

/// Table holding the given positions.
pub fn table_with(positions: &[(i32, i32, i32)]) -> GeometryTable {
    let mut table = GeometryTable::new();
    for &(wheel, sector, station) in positions {
        table
            .insert_chamber(chamber_record(wheel, sector, station))
            .expect("synthetic chamber");
    }
    table
}

/// Table holding every valid chamber position.
pub fn full_table() -> GeometryTable {
    let positions: Vec<_> = ChamberAddress::all()
        .map(|a| (a.wheel(), a.sector(), a.station()))
        .collect();
    table_with(&positions)
}

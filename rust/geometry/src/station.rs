// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! DT chambers ("stations") and their coordinate frames.
//!
//! A [`Station`] owns its super layers and a [`TransformManager`] with three
//! transforms out of the station frame:
//!
//! - `Station` → `CMS`: the physical pose in the detector.
//! - `Station` → `StationNvPhi` and `Station` → `StationNvEta`: orientation-only
//!   "natural view" frames used for plotting. They look at the chamber from
//!   a fixed side regardless of where it sits in CMS.
//!
//! Any node of the tree can be expressed in any of these frames through
//! [`Station::position_in`] and [`Station::direction_in`].

use std::fmt;

use dt_lite_core::{ChildKind, GeometrySource};
use nalgebra::{Point3, Vector3};

use crate::address::ChamberAddress;
use crate::attributes::CellInfo;
use crate::cell::Cell;
use crate::error::Result;
use crate::frame::DtFrame;
use crate::super_layer::SuperLayer;
use crate::transforms::{RigidTransform, TransformManager};

/// Coordinate frames registered by every station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frame {
    /// The chamber's own frame.
    Station,
    /// The global CMS frame.
    Cms,
    /// Natural view for plotting the phi super layers.
    NaturalViewPhi,
    /// Natural view for plotting the theta (eta) super layer.
    NaturalViewEta,
}

impl Frame {
    /// Frame name as registered in the transform manager.
    pub fn as_str(&self) -> &'static str {
        match self {
            Frame::Station => "Station",
            Frame::Cms => "CMS",
            Frame::NaturalViewPhi => "StationNvPhi",
            Frame::NaturalViewEta => "StationNvEta",
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A CMS Drift Tube chamber.
#[derive(Debug, Clone)]
pub struct Station {
    address: ChamberAddress,
    frame: DtFrame,
    super_layers: Vec<SuperLayer>,
    transformer: TransformManager,
}

impl Station {
    /// Builds the station at `(wheel, sector, station)` from `source`.
    ///
    /// The position is validated before the geometry source is queried.
    pub fn new<S: GeometrySource + ?Sized>(
        source: &S,
        wheel: i32,
        sector: i32,
        station: i32,
    ) -> Result<Self> {
        let address = ChamberAddress::new(wheel, sector, station)?;
        Self::from_address(source, address)
    }

    /// Builds the station and assigns drift cell attributes.
    pub fn with_cell_info<S: GeometrySource + ?Sized>(
        source: &S,
        wheel: i32,
        sector: i32,
        station: i32,
        info: &CellInfo,
    ) -> Result<Self> {
        let mut built = Self::new(source, wheel, sector, station)?;
        built.set_cell_attrs(info)?;
        Ok(built)
    }

    /// Builds the station at an already validated address.
    pub fn from_address<S: GeometrySource + ?Sized>(
        source: &S,
        address: ChamberAddress,
    ) -> Result<Self> {
        let id = source.resolve_identifier(address.wheel(), address.sector(), address.station())?;
        let frame = DtFrame::from_source(source, id, address.station())?;
        let transformer = station_transforms(&address, &frame)?;

        let super_layers = source
            .children(id, ChildKind::SuperLayer)?
            .into_iter()
            .map(|sl| SuperLayer::build(source, sl))
            .collect::<Result<Vec<_>>>()?;

        let station = Self {
            address,
            frame,
            super_layers,
            transformer,
        };
        tracing::debug!(
            station = %station.name(),
            id = %id,
            super_layers = station.super_layers.len(),
            cells = station.cells().count(),
            "Built station"
        );
        Ok(station)
    }

    pub fn address(&self) -> ChamberAddress {
        self.address
    }

    pub fn wheel(&self) -> i32 {
        self.address.wheel()
    }

    pub fn sector(&self) -> i32 {
        self.address.sector()
    }

    /// Station type (1: MB1 .. 4: MB4).
    pub fn number(&self) -> i32 {
        self.address.station()
    }

    /// `"Wheel {wheel}, Sector {sector}, Station {number}"`.
    pub fn name(&self) -> String {
        self.address.name()
    }

    pub fn frame(&self) -> &DtFrame {
        &self.frame
    }

    /// Super layers in geometry-source order.
    pub fn super_layers(&self) -> &[SuperLayer] {
        &self.super_layers
    }

    /// Super layer numbered `number`, or `None` if the station has none.
    pub fn super_layer(&self, number: i32) -> Option<&SuperLayer> {
        self.super_layers.iter().find(|sl| sl.number() == number)
    }

    pub fn super_layer_mut(&mut self, number: i32) -> Option<&mut SuperLayer> {
        self.super_layers.iter_mut().find(|sl| sl.number() == number)
    }

    /// Cell at `(super_layer, layer, wire)`, if every level exists.
    pub fn cell(&self, super_layer: i32, layer: i32, wire: i32) -> Option<&Cell> {
        self.super_layer(super_layer)?.layer(layer)?.cell(wire)
    }

    pub fn cell_mut(&mut self, super_layer: i32, layer: i32, wire: i32) -> Option<&mut Cell> {
        self.super_layer_mut(super_layer)?
            .layer_mut(layer)?
            .cell_mut(wire)
    }

    /// Every cell of the station, super layer by super layer.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.super_layers
            .iter()
            .flat_map(|sl| sl.layers().iter())
            .flat_map(|layer| layer.cells().iter())
    }

    pub fn transformer(&self) -> &TransformManager {
        &self.transformer
    }

    /// Sign of the chamber face along the CMS z axis.
    pub fn face_orientation(&self) -> f64 {
        self.address.face_orientation()
    }

    /// Transform mapping points of `from` into `to`.
    pub fn transform(&self, from: Frame, to: Frame) -> Result<RigidTransform> {
        self.transformer.resolve(from.as_str(), to.as_str())
    }

    pub fn transform_point(&self, point: &Point3<f64>, from: Frame, to: Frame) -> Result<Point3<f64>> {
        self.transformer
            .transform_point(point, from.as_str(), to.as_str())
    }

    pub fn transform_direction(
        &self,
        direction: &Vector3<f64>,
        from: Frame,
        to: Frame,
    ) -> Result<Vector3<f64>> {
        self.transformer
            .transform_vector(direction, from.as_str(), to.as_str())
    }

    /// Position of any node of this station expressed in `to`.
    pub fn position_in<N: AsRef<DtFrame> + ?Sized>(&self, node: &N, to: Frame) -> Result<Point3<f64>> {
        self.transform_point(node.as_ref().global_position(), Frame::Cms, to)
    }

    /// Face normal of any node of this station expressed in `to`.
    pub fn direction_in<N: AsRef<DtFrame> + ?Sized>(
        &self,
        node: &N,
        to: Frame,
    ) -> Result<Vector3<f64>> {
        self.transform_direction(node.as_ref().direction(), Frame::Cms, to)
    }
}

impl AsRef<DtFrame> for Station {
    fn as_ref(&self) -> &DtFrame {
        &self.frame
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Station: {}, {}", self.name(), self.frame)
    }
}

/// Registers the CMS and natural view transforms of a chamber.
///
/// Columns of each rotation are the station axes expressed in the target
/// frame. The CMS frame uses the measured face normal as z and the beam
/// axis (signed by the face orientation) as y, made exactly orthogonal to z. Natural views look along -z
/// with the orientation sign on y (phi view) or x (eta view).
fn station_transforms(address: &ChamberAddress, frame: &DtFrame) -> Result<TransformManager> {
    let orientation = address.face_orientation();
    let mut transformer = TransformManager::new(Frame::Station.as_str());

    // Stored normals are rounded; re-orthonormalize so the rotation stays rigid.
    let cms_ez = frame.direction().normalize();
    let cms_ex = (Vector3::new(0.0, 0.0, 1.0) * orientation)
        .cross(&cms_ez)
        .normalize();
    let cms_ey = cms_ez.cross(&cms_ex);
    transformer.add(
        Frame::Station.as_str(),
        Frame::Cms.as_str(),
        RigidTransform::rotation_from_axes(&cms_ex, &cms_ey, &cms_ez),
        Some(frame.global_position().coords),
    )?;

    let nv_ez = Vector3::new(0.0, 0.0, -1.0);

    let phi_ey = Vector3::new(0.0, -1.0, 0.0) * orientation;
    let phi_ex = phi_ey.cross(&nv_ez);
    transformer.add(
        Frame::Station.as_str(),
        Frame::NaturalViewPhi.as_str(),
        RigidTransform::rotation_from_axes(&phi_ex, &phi_ey, &nv_ez),
        None,
    )?;

    let eta_ex = Vector3::new(-1.0, 0.0, 0.0) * orientation;
    let eta_ey = nv_ez.cross(&eta_ex);
    transformer.add(
        Frame::Station.as_str(),
        Frame::NaturalViewEta.as_str(),
        RigidTransform::rotation_from_axes(&eta_ex, &eta_ey, &nv_ez),
        None,
    )?;

    Ok(transformer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use dt_lite_core::{Bounds, Pose, RawId};

    fn frame_facing(direction: [f64; 3], global: [f64; 3]) -> DtFrame {
        DtFrame::new(
            RawId(1),
            1,
            &Pose {
                local_position: [0.0; 3],
                global_position: global,
                direction,
                bounds: Bounds::new(200.0, 250.0, 30.0),
            },
        )
    }

    #[test]
    fn frame_names() {
        assert_eq!(Frame::Station.to_string(), "Station");
        assert_eq!(Frame::Cms.as_str(), "CMS");
        assert_eq!(Frame::NaturalViewPhi.as_str(), "StationNvPhi");
        assert_eq!(Frame::NaturalViewEta.as_str(), "StationNvEta");
    }

    #[test]
    fn cms_axes_for_negative_wheel() {
        let address = ChamberAddress::new(-2, 1, 1).unwrap();
        let frame = frame_facing([1.0, 0.0, 0.0], [430.0, 0.0, -530.0]);
        let tm = station_transforms(&address, &frame).unwrap();
        let t = tm.resolve("Station", "CMS").unwrap();

        // ey = -z, ez = +x, ex = ey × ez = -y
        let r = t.rotation();
        assert_relative_eq!(r.column(0).into_owned(), Vector3::new(0.0, -1.0, 0.0));
        assert_relative_eq!(r.column(1).into_owned(), Vector3::new(0.0, 0.0, -1.0));
        assert_relative_eq!(r.column(2).into_owned(), Vector3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(t.translation(), Vector3::new(430.0, 0.0, -530.0));
        assert!(!t.is_orientation_only());
    }

    #[test]
    fn natural_views_are_orientation_only() {
        let address = ChamberAddress::new(1, 3, 2).unwrap();
        let frame = frame_facing([0.0, 1.0, 0.0], [0.0, 500.0, 260.0]);
        let tm = station_transforms(&address, &frame).unwrap();

        let phi = tm.resolve("Station", "StationNvPhi").unwrap();
        let eta = tm.resolve("Station", "StationNvEta").unwrap();
        assert!(phi.is_orientation_only());
        assert!(eta.is_orientation_only());

        // Positive orientation: phi view flips y and z, eta view flips x and z.
        assert_relative_eq!(
            *phi.rotation(),
            nalgebra::Matrix3::new(1.0, 0.0, 0.0, 0.0, -1.0, 0.0, 0.0, 0.0, -1.0)
        );
        assert_relative_eq!(
            *eta.rotation(),
            nalgebra::Matrix3::new(-1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, -1.0)
        );
    }

    #[test]
    fn natural_views_follow_orientation_sign() {
        let frame = frame_facing([0.0, 1.0, 0.0], [0.0, 500.0, 0.0]);
        let positive = station_transforms(&ChamberAddress::new(0, 2, 1).unwrap(), &frame).unwrap();
        let negative = station_transforms(&ChamberAddress::new(0, 1, 1).unwrap(), &frame).unwrap();

        let p = Point3::new(1.0, 2.0, 3.0);
        let pos = positive.transform_point(&p, "Station", "StationNvPhi").unwrap();
        let neg = negative.transform_point(&p, "Station", "StationNvPhi").unwrap();
        assert_relative_eq!(pos, Point3::new(1.0, -2.0, -3.0));
        assert_relative_eq!(neg, Point3::new(-1.0, 2.0, -3.0));
    }

    #[test]
    fn rounded_normal_builds_rigid_rotation() {
        let address = ChamberAddress::new(1, 2, 1).unwrap();
        let frame = frame_facing([0.866025, 0.5, 0.0], [372.4, 215.0, 265.0]);
        let tm = station_transforms(&address, &frame).unwrap();
        let t = tm.resolve("Station", "CMS").unwrap();

        assert!(t.is_orthonormal(1e-12));
        let ez = Vector3::new(0.866025, 0.5, 0.0).normalize();
        assert_relative_eq!(t.rotation().column(2).into_owned(), ez, epsilon = 1e-12);
        assert_relative_eq!(
            t.rotation().column(1).into_owned(),
            Vector3::new(0.0, 0.0, 1.0),
            epsilon = 1e-12
        );
        // The stored normal is kept as supplied.
        assert_eq!(*frame.direction(), Vector3::new(0.866025, 0.5, 0.0));
    }

    #[test]
    fn tilted_normal_keeps_z_along_normal() {
        let address = ChamberAddress::new(1, 1, 1).unwrap();
        let frame = frame_facing([0.6, 0.0, 0.8], [0.0; 3]);
        let t = station_transforms(&address, &frame)
            .unwrap()
            .resolve("Station", "CMS")
            .unwrap();
        assert!(t.is_orthonormal(1e-12));
        assert_relative_eq!(t.rotation().column(2).into_owned(), Vector3::new(0.6, 0.0, 0.8));
        assert_relative_eq!(t.rotation().column(0).into_owned(), Vector3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn normal_along_beam_is_rejected() {
        let address = ChamberAddress::new(1, 1, 1).unwrap();
        let frame = frame_facing([0.0, 0.0, 1.0], [0.0; 3]);
        assert!(matches!(
            station_transforms(&address, &frame),
            Err(crate::Error::NonOrthonormal { .. })
        ));
    }
}

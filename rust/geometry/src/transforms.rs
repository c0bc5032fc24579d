// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Named coordinate frames and the rigid transforms between them.
//!
//! A [`TransformManager`] stores transforms keyed by `(from, to)` frame names.
//! A registered transform maps a point expressed in `from` into `to`:
//!
//! ```text
//! p_to = R · p_from + t
//! ```
//!
//! The columns of `R` are the axes of `from` expressed in `to`. Transforms
//! without a translation are orientation-only (viewing frames); they stay
//! orientation-only when composed with each other.
//!
//! Resolution walks at most two hops: the direct edge, the inverse of the
//! reverse edge, or a composition through one intermediate frame. Stations
//! register everything against their own frame, so two hops reach any pair.

use nalgebra::{Matrix3, Point3, Vector3};
use rustc_hash::FxHashMap;

use crate::error::{Error, Result};

/// Tolerance used for orthonormality and consistency checks.
pub const TOLERANCE: f64 = 1e-9;

/// Rotation plus optional translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidTransform {
    rotation: Matrix3<f64>,
    translation: Option<Vector3<f64>>,
}

impl RigidTransform {
    /// Full transform with rotation and translation.
    pub fn new(rotation: Matrix3<f64>, translation: Vector3<f64>) -> Self {
        Self {
            rotation,
            translation: Some(translation),
        }
    }

    /// Orientation-only transform.
    pub fn orientation(rotation: Matrix3<f64>) -> Self {
        Self {
            rotation,
            translation: None,
        }
    }

    /// Orientation-only identity.
    pub fn identity() -> Self {
        Self::orientation(Matrix3::identity())
    }

    /// Builds a rotation whose columns are the given axes.
    pub fn rotation_from_axes(
        ex: &Vector3<f64>,
        ey: &Vector3<f64>,
        ez: &Vector3<f64>,
    ) -> Matrix3<f64> {
        Matrix3::from_columns(&[*ex, *ey, *ez])
    }

    #[inline]
    pub fn rotation(&self) -> &Matrix3<f64> {
        &self.rotation
    }

    /// Translation, zero for orientation-only transforms.
    #[inline]
    pub fn translation(&self) -> Vector3<f64> {
        self.translation.unwrap_or_else(Vector3::zeros)
    }

    #[inline]
    pub fn is_orientation_only(&self) -> bool {
        self.translation.is_none()
    }

    /// Composes `self` (a → b) with `next` (b → c) into a → c.
    ///
    /// `R_ac = R_bc · R_ab` and `t_ac = R_bc · t_ab + t_bc`.
    pub fn then(&self, next: &RigidTransform) -> RigidTransform {
        let rotation = next.rotation * self.rotation;
        let translation = match (self.translation, next.translation) {
            (None, None) => None,
            (t_ab, t_bc) => Some(
                next.rotation * t_ab.unwrap_or_else(Vector3::zeros)
                    + t_bc.unwrap_or_else(Vector3::zeros),
            ),
        };
        RigidTransform {
            rotation,
            translation,
        }
    }

    /// Inverse transform (b → a). Assumes an orthonormal rotation.
    pub fn inverse(&self) -> RigidTransform {
        let rotation = self.rotation.transpose();
        RigidTransform {
            rotation,
            translation: self.translation.map(|t| -(rotation * t)),
        }
    }

    #[inline]
    pub fn transform_point(&self, point: &Point3<f64>) -> Point3<f64> {
        self.rotation * point + self.translation()
    }

    /// Rotates a direction; translation does not apply.
    #[inline]
    pub fn transform_vector(&self, vector: &Vector3<f64>) -> Vector3<f64> {
        self.rotation * vector
    }

    /// Whether the columns of the rotation are mutually perpendicular unit
    /// vectors within `eps`.
    pub fn is_orthonormal(&self, eps: f64) -> bool {
        let gram = self.rotation.transpose() * self.rotation - Matrix3::identity();
        gram.iter().all(|v| v.abs() <= eps)
    }

    /// Component-wise comparison within `eps`, including the orientation-only flag.
    pub fn approx_eq(&self, other: &RigidTransform, eps: f64) -> bool {
        self.translation.is_some() == other.translation.is_some()
            && (self.rotation - other.rotation).iter().all(|v| v.abs() <= eps)
            && (self.translation() - other.translation())
                .iter()
                .all(|v| v.abs() <= eps)
    }
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Registry of named frame-to-frame transforms.
#[derive(Debug, Clone)]
pub struct TransformManager {
    root: String,
    frames: Vec<String>,
    transforms: FxHashMap<(String, String), RigidTransform>,
}

impl TransformManager {
    /// Creates a manager whose initial frame is `root`.
    pub fn new(root: impl Into<String>) -> Self {
        let root = root.into();
        Self {
            frames: vec![root.clone()],
            root,
            transforms: FxHashMap::default(),
        }
    }

    /// Name of the initial frame.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Known frame names in registration order.
    pub fn frames(&self) -> impl Iterator<Item = &str> {
        self.frames.iter().map(String::as_str)
    }

    pub fn has_frame(&self, name: &str) -> bool {
        self.frames.iter().any(|f| f == name)
    }

    /// Registered transforms as `(from, to, transform)`.
    pub fn registered(&self) -> impl Iterator<Item = (&str, &str, &RigidTransform)> {
        self.transforms
            .iter()
            .map(|((from, to), t)| (from.as_str(), to.as_str(), t))
    }

    /// Number of registered transforms.
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Registers the transform `from` → `to`.
    ///
    /// `translation` of `None` registers an orientation-only transform.
    /// Registering the same values twice is a no-op; registering different
    /// values for a pair that is already known (in either direction) fails.
    pub fn add(
        &mut self,
        from: &str,
        to: &str,
        rotation: Matrix3<f64>,
        translation: Option<Vector3<f64>>,
    ) -> Result<()> {
        let transform = RigidTransform {
            rotation,
            translation,
        };

        if !transform.is_orthonormal(TOLERANCE) {
            return Err(Error::NonOrthonormal {
                from: from.to_string(),
                to: to.to_string(),
            });
        }

        if from == to {
            if transform.approx_eq(&RigidTransform::identity(), TOLERANCE) {
                return Ok(());
            }
            return Err(conflict(from, to));
        }

        if let Some(existing) = self.transforms.get(&(from.to_string(), to.to_string())) {
            return if *existing == transform {
                Ok(())
            } else {
                Err(conflict(from, to))
            };
        }

        if let Some(reverse) = self.transforms.get(&(to.to_string(), from.to_string())) {
            return if reverse.inverse().approx_eq(&transform, TOLERANCE) {
                Ok(())
            } else {
                Err(conflict(from, to))
            };
        }

        self.register_frame(from);
        self.register_frame(to);
        self.transforms
            .insert((from.to_string(), to.to_string()), transform);
        Ok(())
    }

    fn register_frame(&mut self, name: &str) {
        if !self.has_frame(name) {
            self.frames.push(name.to_string());
        }
    }

    /// One edge in either direction.
    fn hop(&self, from: &str, to: &str) -> Option<RigidTransform> {
        if let Some(t) = self.transforms.get(&(from.to_string(), to.to_string())) {
            return Some(*t);
        }
        self.transforms
            .get(&(to.to_string(), from.to_string()))
            .map(RigidTransform::inverse)
    }

    /// Transform mapping points of `from` into `to`.
    pub fn resolve(&self, from: &str, to: &str) -> Result<RigidTransform> {
        if from == to {
            if self.has_frame(from) {
                return Ok(RigidTransform::identity());
            }
            return Err(not_found(from, to));
        }

        if let Some(t) = self.hop(from, to) {
            return Ok(t);
        }

        for mid in &self.frames {
            if mid == from || mid == to {
                continue;
            }
            if let (Some(first), Some(second)) = (self.hop(from, mid), self.hop(mid, to)) {
                return Ok(first.then(&second));
            }
        }

        Err(not_found(from, to))
    }

    /// Maps `point` from `from` into `to`.
    pub fn transform_point(&self, point: &Point3<f64>, from: &str, to: &str) -> Result<Point3<f64>> {
        Ok(self.resolve(from, to)?.transform_point(point))
    }

    /// Rotates `vector` from `from` into `to`.
    pub fn transform_vector(
        &self,
        vector: &Vector3<f64>,
        from: &str,
        to: &str,
    ) -> Result<Vector3<f64>> {
        Ok(self.resolve(from, to)?.transform_vector(vector))
    }
}

fn conflict(from: &str, to: &str) -> Error {
    Error::ConflictingTransform {
        from: from.to_string(),
        to: to.to_string(),
    }
}

fn not_found(from: &str, to: &str) -> Error {
    Error::FrameNotFound {
        from: from.to_string(),
        to: to.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Rotation3;
    use std::f64::consts::FRAC_PI_2;

    fn rot_z(angle: f64) -> Matrix3<f64> {
        *Rotation3::from_axis_angle(&Vector3::z_axis(), angle).matrix()
    }

    fn rot_x(angle: f64) -> Matrix3<f64> {
        *Rotation3::from_axis_angle(&Vector3::x_axis(), angle).matrix()
    }

    fn chain() -> TransformManager {
        let mut tm = TransformManager::new("A");
        tm.add("A", "B", rot_z(FRAC_PI_2), Some(Vector3::new(1.0, 2.0, 3.0)))
            .unwrap();
        tm.add("A", "C", rot_x(0.3), None).unwrap();
        tm
    }

    #[test]
    fn compose_matches_sequential_application() {
        let ab = RigidTransform::new(rot_z(0.4), Vector3::new(1.0, 0.0, -2.0));
        let bc = RigidTransform::new(rot_x(-1.1), Vector3::new(0.5, 3.0, 0.0));
        let p = Point3::new(0.3, -7.0, 2.5);

        let composed = ab.then(&bc).transform_point(&p);
        let sequential = bc.transform_point(&ab.transform_point(&p));
        assert_relative_eq!(composed, sequential, epsilon = 1e-12);
    }

    #[test]
    fn translation_composes_through_rotation() {
        let ab = RigidTransform::new(Matrix3::identity(), Vector3::new(1.0, 0.0, 0.0));
        let bc = RigidTransform::new(rot_z(FRAC_PI_2), Vector3::new(0.0, 0.0, 5.0));
        let ac = ab.then(&bc);
        // R_bc · t_ab + t_bc
        assert_relative_eq!(ac.translation(), Vector3::new(0.0, 1.0, 5.0), epsilon = 1e-12);
    }

    #[test]
    fn orientation_only_stays_orientation_only() {
        let a = RigidTransform::orientation(rot_z(0.2));
        let b = RigidTransform::orientation(rot_x(0.7));
        assert!(a.then(&b).is_orientation_only());
        assert!(a.inverse().is_orientation_only());

        let full = RigidTransform::new(rot_z(0.1), Vector3::new(1.0, 1.0, 1.0));
        assert!(!a.then(&full).is_orientation_only());
        assert!(!full.then(&a).is_orientation_only());
    }

    #[test]
    fn inverse_round_trip() {
        let t = RigidTransform::new(rot_x(0.9) * rot_z(-0.3), Vector3::new(4.0, -2.0, 7.5));
        let p = Point3::new(100.0, -50.0, 25.0);
        let back = t.inverse().transform_point(&t.transform_point(&p));
        assert_relative_eq!(back, p, epsilon = 1e-9);
        assert!(t.then(&t.inverse()).approx_eq(
            &RigidTransform::new(Matrix3::identity(), Vector3::zeros()),
            1e-12
        ));
    }

    #[test]
    fn resolve_direct_and_inverse() {
        let tm = chain();
        let p = Point3::new(1.0, 0.0, 0.0);

        let ab = tm.resolve("A", "B").unwrap();
        assert_relative_eq!(ab.transform_point(&p), Point3::new(1.0, 3.0, 3.0), epsilon = 1e-12);

        let ba = tm.resolve("B", "A").unwrap();
        assert_relative_eq!(
            ba.transform_point(&ab.transform_point(&p)),
            p,
            epsilon = 1e-12
        );
    }

    #[test]
    fn resolve_through_intermediate() {
        let tm = chain();
        let p = Point3::new(0.2, -3.0, 8.0);

        let bc = tm.resolve("B", "C").unwrap();
        let via_a = tm
            .resolve("A", "C")
            .unwrap()
            .transform_point(&tm.resolve("B", "A").unwrap().transform_point(&p));
        assert_relative_eq!(bc.transform_point(&p), via_a, epsilon = 1e-12);

        // The reverse chain is the inverse of the forward chain.
        let cb = tm.resolve("C", "B").unwrap();
        assert!(cb.approx_eq(&bc.inverse(), 1e-12));
    }

    #[test]
    fn resolve_same_frame_is_identity() {
        let tm = chain();
        assert_eq!(tm.resolve("B", "B").unwrap(), RigidTransform::identity());
        assert!(matches!(
            tm.resolve("Z", "Z"),
            Err(Error::FrameNotFound { .. })
        ));
    }

    #[test]
    fn unreachable_frames_fail() {
        let mut tm = chain();
        tm.add("C", "D", rot_z(0.1), None).unwrap();
        // B -> A -> C -> D needs three hops
        match tm.resolve("B", "D") {
            Err(Error::FrameNotFound { from, to }) => {
                assert_eq!(from, "B");
                assert_eq!(to, "D");
            }
            other => panic!("expected FrameNotFound, got {other:?}"),
        }
        assert!(tm.resolve("A", "nowhere").is_err());
    }

    #[test]
    fn identical_re_registration_is_accepted() {
        let mut tm = chain();
        tm.add("A", "B", rot_z(FRAC_PI_2), Some(Vector3::new(1.0, 2.0, 3.0)))
            .unwrap();
        assert_eq!(tm.len(), 2);
    }

    #[test]
    fn conflicting_re_registration_fails() {
        let mut tm = chain();
        let err = tm
            .add("A", "B", rot_z(0.1), Some(Vector3::new(1.0, 2.0, 3.0)))
            .unwrap_err();
        assert!(matches!(err, Error::ConflictingTransform { .. }));

        // Same rotation, but now orientation-only.
        assert!(tm.add("A", "B", rot_z(FRAC_PI_2), None).is_err());
    }

    #[test]
    fn reverse_registration_must_be_consistent() {
        let mut tm = chain();
        let inverse = tm.resolve("B", "A").unwrap();
        tm.add("B", "A", *inverse.rotation(), Some(inverse.translation()))
            .unwrap();
        assert_eq!(tm.len(), 2);

        assert!(matches!(
            tm.add("C", "A", Matrix3::identity(), None),
            Err(Error::ConflictingTransform { .. })
        ));
    }

    #[test]
    fn non_orthonormal_rotation_is_rejected() {
        let mut tm = TransformManager::new("A");
        let skewed = Matrix3::new(1.0, 0.1, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0);
        assert!(matches!(
            tm.add("A", "B", skewed, None),
            Err(Error::NonOrthonormal { .. })
        ));
        assert!(tm.is_empty());
    }

    #[test]
    fn frames_in_registration_order() {
        let tm = chain();
        assert_eq!(tm.root(), "A");
        assert_eq!(tm.frames().collect::<Vec<_>>(), vec!["A", "B", "C"]);
        assert!(tm.has_frame("C"));
        assert!(!tm.has_frame("D"));
    }
}

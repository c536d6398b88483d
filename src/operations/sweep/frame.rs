//! Per-section frames for sweeping a cross-section along a path.

use tracing::debug;

use crate::error::GeometryError;
use crate::math::{Matrix4, Point3, Vector3, TOLERANCE};

/// Minimum `|forward × up|` for an up axis to be usable.
const PARALLEL_EPSILON: f64 = 1e-6;

/// Up axes tried, in order, when the requested up is parallel to forward.
const FALLBACK_UPS: [Vector3; 2] = [Vector3::new(1.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 1.0)];

/// An oriented cross-section placed on a path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Where the cross-section is centered.
    pub origin: Point3,
    /// Unit direction along the path.
    pub forward: Vector3,
    /// Unit up direction, perpendicular to `forward`.
    pub up: Vector3,
    /// Unit right direction, `forward × up`.
    pub right: Vector3,
}

impl Frame {
    /// Builds a frame looking along `direction` with `up_hint` as the
    /// preferred up axis.
    ///
    /// If `up_hint` is parallel to `direction` (or unusable), world-X and then
    /// world-Z are tried in that order.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroLengthSection`] if `direction` has zero
    /// length, or [`GeometryError::IllDefinedFrame`] if it is not finite or no
    /// up axis yields a frame.
    pub fn looking_along(
        origin: Point3,
        direction: Vector3,
        up_hint: Vector3,
        section: usize,
    ) -> Result<Self, GeometryError> {
        Self::looking_along_tracked(origin, direction, up_hint, section).map(|(frame, _)| frame)
    }

    /// Same as [`Self::looking_along`], also reporting whether a fallback up
    /// axis replaced `up_hint`.
    pub(super) fn looking_along_tracked(
        origin: Point3,
        direction: Vector3,
        up_hint: Vector3,
        section: usize,
    ) -> Result<(Self, bool), GeometryError> {
        if !is_finite(&direction) {
            return Err(GeometryError::IllDefinedFrame {
                section,
                reason: "direction is not finite",
            });
        }
        let forward = direction
            .try_normalize(TOLERANCE)
            .ok_or(GeometryError::ZeroLengthSection { section })?;

        for (attempt, candidate) in std::iter::once(up_hint).chain(FALLBACK_UPS).enumerate() {
            let Some(up) = unit(&candidate, TOLERANCE) else {
                continue;
            };
            let Some(right) = unit(&forward.cross(&up), PARALLEL_EPSILON) else {
                continue;
            };
            if attempt > 0 {
                debug!(section, ?candidate, "up axis parallel to path, using fallback");
            }
            let frame = Self {
                origin,
                forward,
                up: right.cross(&forward),
                right,
            };
            return Ok((frame, attempt > 0));
        }

        Err(GeometryError::IllDefinedFrame {
            section,
            reason: "no usable up axis",
        })
    }

    /// Rolls the frame about `forward` so `right` points as close to
    /// `right_hint` as possible.
    ///
    /// Returns the frame unchanged if `right_hint` is parallel to `forward`.
    #[must_use]
    pub fn rolled_toward(&self, right_hint: &Vector3) -> Self {
        let along = self.forward * self.forward.dot(right_hint);
        match unit(&(right_hint - along), PARALLEL_EPSILON) {
            Some(right) => Self {
                up: right.cross(&self.forward),
                right,
                ..*self
            },
            None => *self,
        }
    }

    /// Averages this frame with the previous section's frame.
    ///
    /// Each axis is summed with its counterpart and renormalized on its own;
    /// the result keeps this frame's origin. This softens the crease at the
    /// joint between two sections but is not a rotation-minimizing transport.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::IllDefinedFrame`] if an axis cancels out, which
    /// happens when the path folds back on itself.
    pub fn blended_with(&self, previous: &Frame, section: usize) -> Result<Self, GeometryError> {
        let average = |a: &Vector3, b: &Vector3, reason| {
            unit(&(a + b), TOLERANCE).ok_or(GeometryError::IllDefinedFrame { section, reason })
        };
        Ok(Self {
            origin: self.origin,
            forward: average(&self.forward, &previous.forward, "path folds back on itself")?,
            up: average(&self.up, &previous.up, "up axes cancel")?,
            right: average(&self.right, &previous.right, "right axes cancel")?,
        })
    }

    /// Returns the matrix mapping the template's local axes onto this frame.
    ///
    /// Local X (the template sweep axis) maps to `forward`, local Y to `up`,
    /// local Z to `right`, and the local origin to `origin`.
    #[must_use]
    pub fn to_matrix(&self) -> Matrix4 {
        let (f, u, r, o) = (&self.forward, &self.up, &self.right, &self.origin);
        Matrix4::new(
            f.x, u.x, r.x, o.x, //
            f.y, u.y, r.y, o.y, //
            f.z, u.z, r.z, o.z, //
            0.0, 0.0, 0.0, 1.0,
        )
    }
}

fn is_finite(v: &Vector3) -> bool {
    v.iter().all(|c| c.is_finite())
}

fn unit(v: &Vector3, min_norm: f64) -> Option<Vector3> {
    if is_finite(v) {
        v.try_normalize(min_norm)
    } else {
        None
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::transform_point;
    use approx::assert_relative_eq;

    fn frame(direction: Vector3, up: Vector3) -> Frame {
        Frame::looking_along(Point3::origin(), direction, up, 0).unwrap()
    }

    #[test]
    fn along_x_with_world_up() {
        let f = frame(Vector3::new(2.0, 0.0, 0.0), Vector3::y());
        assert_relative_eq!(f.forward, Vector3::x(), epsilon = 1e-12);
        assert_relative_eq!(f.right, Vector3::z(), epsilon = 1e-12);
        assert_relative_eq!(f.up, Vector3::y(), epsilon = 1e-12);
    }

    #[test]
    fn up_hint_is_respected() {
        let f = frame(Vector3::x(), Vector3::z());
        assert_relative_eq!(f.up, Vector3::z(), epsilon = 1e-12);
        assert_relative_eq!(f.right, -Vector3::y(), epsilon = 1e-12);
    }

    #[test]
    fn vertical_direction_falls_back_to_x() {
        let f = frame(Vector3::y(), Vector3::y());
        assert_relative_eq!(f.forward, Vector3::y(), epsilon = 1e-12);
        assert_relative_eq!(f.right, -Vector3::z(), epsilon = 1e-12);
        assert_relative_eq!(f.up, Vector3::x(), epsilon = 1e-12);
    }

    #[test]
    fn x_direction_with_x_hint_falls_back_to_z() {
        let f = frame(Vector3::x(), Vector3::x());
        assert_relative_eq!(f.right.dot(&f.forward), 0.0, epsilon = 1e-12);
        assert_relative_eq!(f.up, Vector3::z(), epsilon = 1e-12);
    }

    #[test]
    fn zero_hint_falls_back() {
        let f = frame(Vector3::z(), Vector3::zeros());
        assert_relative_eq!(f.up.norm(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn frames_are_orthonormal() {
        let f = frame(Vector3::new(1.0, 2.0, -3.0), Vector3::y());
        assert_relative_eq!(f.forward.dot(&f.up), 0.0, epsilon = 1e-12);
        assert_relative_eq!(f.forward.dot(&f.right), 0.0, epsilon = 1e-12);
        assert_relative_eq!(f.up.dot(&f.right), 0.0, epsilon = 1e-12);
        assert_relative_eq!(f.forward.cross(&f.up), f.right, epsilon = 1e-12);
    }

    #[test]
    fn zero_direction_reports_section() {
        let err = Frame::looking_along(Point3::origin(), Vector3::zeros(), Vector3::y(), 4)
            .unwrap_err();
        assert!(matches!(err, GeometryError::ZeroLengthSection { section: 4 }));
    }

    #[test]
    fn nan_direction_is_ill_defined() {
        let err = Frame::looking_along(
            Point3::origin(),
            Vector3::new(f64::NAN, 0.0, 0.0),
            Vector3::y(),
            1,
        )
        .unwrap_err();
        assert!(matches!(err, GeometryError::IllDefinedFrame { section: 1, .. }));
    }

    #[test]
    fn blending_averages_axes() {
        let a = frame(Vector3::x(), Vector3::y());
        let b = frame(Vector3::z(), Vector3::y());
        let blended = b.blended_with(&a, 1).unwrap();
        let diag = std::f64::consts::FRAC_1_SQRT_2;
        assert_relative_eq!(blended.forward, Vector3::new(diag, 0.0, diag), epsilon = 1e-12);
        assert_relative_eq!(blended.up, Vector3::y(), epsilon = 1e-12);
    }

    #[test]
    fn fallback_is_reported() {
        let (_, hinted) =
            Frame::looking_along_tracked(Point3::origin(), Vector3::x(), Vector3::y(), 0).unwrap();
        let (_, fell_back) =
            Frame::looking_along_tracked(Point3::origin(), Vector3::y(), Vector3::y(), 0).unwrap();
        assert!(!hinted);
        assert!(fell_back);
    }

    #[test]
    fn rolling_aligns_right_axis() {
        let horizontal = frame(Vector3::x(), Vector3::y());
        let vertical = frame(Vector3::y(), Vector3::y());
        assert!(vertical.blended_with(&horizontal, 1).is_err());

        let rolled = vertical.rolled_toward(&horizontal.right);
        assert_relative_eq!(rolled.forward, Vector3::y(), epsilon = 1e-12);
        assert_relative_eq!(rolled.right, Vector3::z(), epsilon = 1e-12);
        assert_relative_eq!(rolled.up, -Vector3::x(), epsilon = 1e-12);
        assert_relative_eq!(rolled.forward.cross(&rolled.up), rolled.right, epsilon = 1e-12);
        assert!(rolled.blended_with(&horizontal, 1).is_ok());
    }

    #[test]
    fn rolling_projects_hint_and_ignores_parallel_hint() {
        let f = frame(Vector3::y(), Vector3::y());
        let rolled = f.rolled_toward(&Vector3::new(1.0, 5.0, 0.0));
        assert_relative_eq!(rolled.right, Vector3::x(), epsilon = 1e-12);
        assert_relative_eq!(rolled.up, Vector3::z(), epsilon = 1e-12);
        assert_eq!(f.rolled_toward(&Vector3::y()), f);
    }

    #[test]
    fn blending_opposite_frames_fails() {
        let a = frame(Vector3::x(), Vector3::y());
        let b = frame(-Vector3::x(), Vector3::y());
        let err = b.blended_with(&a, 2).unwrap_err();
        assert!(matches!(err, GeometryError::IllDefinedFrame { section: 2, .. }));
    }

    #[test]
    fn matrix_maps_local_axes() {
        let f = Frame::looking_along(Point3::new(1.0, 2.0, 3.0), Vector3::z(), Vector3::y(), 0)
            .unwrap();
        let m = f.to_matrix();
        let on_y = transform_point(&m, &Point3::new(0.0, 1.0, 0.0));
        let on_z = transform_point(&m, &Point3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(on_y, f.origin + f.up, epsilon = 1e-12);
        assert_relative_eq!(on_z, f.origin + f.right, epsilon = 1e-12);
        assert_relative_eq!(m.fixed_view::<3, 3>(0, 0).determinant(), 1.0, epsilon = 1e-12);
    }
}

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// 4x4 transformation matrix.
pub type Matrix4 = nalgebra::Matrix4<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// World-up axis used when no up hint is supplied.
#[must_use]
pub fn world_up() -> Vector3 {
    Vector3::y()
}

/// Transforms a point by a 4x4 matrix (homogeneous coordinates).
#[must_use]
pub fn transform_point(matrix: &Matrix4, point: &Point3) -> Point3 {
    let v = matrix * nalgebra::Vector4::new(point.x, point.y, point.z, 1.0);
    Point3::new(v.x, v.y, v.z)
}

/// Returns the arithmetic mean of a set of points, or `None` if empty.
#[must_use]
pub fn centroid(points: &[Point3]) -> Option<Point3> {
    if points.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let inv_n = 1.0 / points.len() as f64;
    let sum = points
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p.coords);
    Some(Point3::from(sum * inv_n))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn transform_point_applies_translation() {
        let mut m = Matrix4::identity();
        m[(0, 3)] = 2.0;
        m[(2, 3)] = -1.0;
        let q = transform_point(&m, &Point3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(q, Point3::new(3.0, 1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn centroid_of_square() {
        let pts = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(2.0, 2.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
        ];
        assert_relative_eq!(centroid(&pts).unwrap(), Point3::new(1.0, 1.0, 0.0));
        assert!(centroid(&[]).is_none());
    }
}

//! Projective helpers

use glam::{Mat4, Vec2, Vec3};

use crate::bounds::Rect;
use crate::consts::EPSILON;

/// Transform a point as (x, y, z, 1) and divide by the resulting w.
///
/// A zero w leaves the point undivided.
#[inline]
pub fn project_point(matrix: &Mat4, point: Vec3) -> Vec3 {
    let v = *matrix * point.extend(1.0);
    if v.w.abs() > EPSILON {
        v.truncate() / v.w
    } else {
        v.truncate()
    }
}

/// Transform the four corners of a rect and return their bounds
pub fn transform_rect(matrix: &Mat4, rect: &Rect) -> Rect {
    let corners = [
        Vec2::new(rect.x_min, rect.y_min),
        Vec2::new(rect.x_max, rect.y_min),
        Vec2::new(rect.x_min, rect.y_max),
        Vec2::new(rect.x_max, rect.y_max),
    ];

    let first = matrix.transform_point3(corners[0].extend(0.0)).truncate();
    corners[1..]
        .iter()
        .map(|c| matrix.transform_point3(c.extend(0.0)).truncate())
        .fold(Rect::new(first.x, first.y, first.x, first.y), Rect::grow_to_include)
}

/// Inverse, or `None` when the matrix is singular
#[inline]
pub fn try_inverse(matrix: &Mat4) -> Option<Mat4> {
    let det = matrix.determinant();
    if det.is_finite() && det.abs() > f32::MIN_POSITIVE {
        Some(matrix.inverse())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_project_point_divides_by_w() {
        let proj = Mat4::perspective_rh_gl(1.0, 1.0, 1.0, 100.0);
        let p = project_point(&proj, Vec3::new(0.0, 0.0, -1.0));
        // near plane lands on ndc z = -1
        assert_relative_eq!(p.z, -1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_transform_rect_with_rotation() {
        let rect = Rect::new(0.0, 0.0, 2.0, 1.0);
        let rotated = transform_rect(&Mat4::from_rotation_z(core::f32::consts::FRAC_PI_2), &rect);
        assert_relative_eq!(rotated.x_min, -1.0, epsilon = 1e-5);
        assert_relative_eq!(rotated.x_max, 0.0, epsilon = 1e-5);
        assert_relative_eq!(rotated.y_max, 2.0, epsilon = 1e-5);
    }

    #[test]
    fn test_try_inverse_rejects_singular() {
        assert!(try_inverse(&Mat4::ZERO).is_none());
        let m = Mat4::from_scale(Vec3::new(2.0, 4.0, 1.0));
        let inv = try_inverse(&m).unwrap();
        assert_relative_eq!((inv * m).x_axis.x, 1.0);
    }
}

//! View volume culling
//!
//! A `Frustum` is derived from a combined view-projection matrix. It keeps
//! both the six clip planes (for 3D culling) and the world-space box around
//! the frustum corners (for the cheaper 2D rect cull).

use glam::{Mat4, Vec3, Vec4};

use crate::bounds::Aabb;
use crate::project::try_inverse;

/// Plane in 3D space (normal . p + distance = 0)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    /// Unit normal, pointing into the visible half-space
    pub normal: Vec3,
    pub distance: f32,
}

impl Plane {
    /// Create from an unnormalized equation; normal and distance are rescaled together
    #[inline]
    pub fn new(normal: Vec3, distance: f32) -> Self {
        let len = normal.length();
        if len > 1e-10 {
            Self {
                normal: normal / len,
                distance: distance / len,
            }
        } else {
            Self {
                normal: Vec3::Y,
                distance: 0.0,
            }
        }
    }

    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        let normal = normal.normalize();
        Self {
            normal,
            distance: -normal.dot(point),
        }
    }

    #[inline]
    fn from_row(row: Vec4) -> Self {
        Self::new(row.truncate(), row.w)
    }

    /// Positive in front, negative behind
    #[inline]
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }
}

impl Default for Plane {
    fn default() -> Self {
        Self {
            normal: Vec3::Y,
            distance: 0.0,
        }
    }
}

/// Result of a frustum containment test
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FrustumTest {
    Inside,
    Outside,
    Intersecting,
}

impl FrustumTest {
    #[inline]
    pub fn is_visible(&self) -> bool {
        *self != FrustumTest::Outside
    }
}

/// View volume
#[derive(Clone, Debug, PartialEq)]
pub struct Frustum {
    /// left, right, bottom, top, near, far
    pub planes: [Plane; 6],
    /// World-space box around the eight frustum corners
    pub aabb: Aabb,
}

impl Frustum {
    pub const LEFT: usize = 0;
    pub const RIGHT: usize = 1;
    pub const BOTTOM: usize = 2;
    pub const TOP: usize = 3;
    pub const NEAR: usize = 4;
    pub const FAR: usize = 5;

    /// Corners of the normalized device cube (GL depth convention)
    const NDC_CORNERS: [Vec3; 8] = [
        Vec3::new(-1.0, -1.0, -1.0),
        Vec3::new(1.0, -1.0, -1.0),
        Vec3::new(-1.0, 1.0, -1.0),
        Vec3::new(1.0, 1.0, -1.0),
        Vec3::new(-1.0, -1.0, 1.0),
        Vec3::new(1.0, -1.0, 1.0),
        Vec3::new(-1.0, 1.0, 1.0),
        Vec3::new(1.0, 1.0, 1.0),
    ];

    /// Extract planes (Gribb/Hartmann) and corner bounds from `proj * view`.
    ///
    /// A singular matrix yields an unbounded box so that nothing is rect-culled.
    pub fn from_view_projection(view_proj: &Mat4) -> Self {
        let row0 = view_proj.row(0);
        let row1 = view_proj.row(1);
        let row2 = view_proj.row(2);
        let row3 = view_proj.row(3);

        let planes = [
            Plane::from_row(row3 + row0),
            Plane::from_row(row3 - row0),
            Plane::from_row(row3 + row1),
            Plane::from_row(row3 - row1),
            Plane::from_row(row3 + row2),
            Plane::from_row(row3 - row2),
        ];

        let aabb = match try_inverse(view_proj) {
            Some(inv) => Self::NDC_CORNERS
                .iter()
                .fold(Aabb::EMPTY, |acc, &c| acc.grow_to_include(inv.project_point3(c))),
            None => Aabb::new(Vec3::splat(f32::MIN), Vec3::splat(f32::MAX)),
        };

        Self { planes, aabb }
    }

    /// Classify a box against all six planes
    pub fn test_aabb(&self, aabb: &Aabb) -> FrustumTest {
        let mut result = FrustumTest::Inside;

        for plane in &self.planes {
            let n = plane.normal;
            // corner furthest along the normal
            let p = Vec3::new(
                if n.x >= 0.0 { aabb.max.x } else { aabb.min.x },
                if n.y >= 0.0 { aabb.max.y } else { aabb.min.y },
                if n.z >= 0.0 { aabb.max.z } else { aabb.min.z },
            );
            // corner furthest against the normal
            let q = Vec3::new(
                if n.x >= 0.0 { aabb.min.x } else { aabb.max.x },
                if n.y >= 0.0 { aabb.min.y } else { aabb.max.y },
                if n.z >= 0.0 { aabb.min.z } else { aabb.max.z },
            );

            if plane.distance_to_point(p) < 0.0 {
                return FrustumTest::Outside;
            }
            if plane.distance_to_point(q) < 0.0 {
                result = FrustumTest::Intersecting;
            }
        }

        result
    }

    #[inline]
    pub fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        self.test_aabb(aabb).is_visible()
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        self.planes.iter().all(|p| p.distance_to_point(point) >= 0.0)
    }
}

impl Default for Frustum {
    /// The unit clip cube, i.e. identity view and projection
    fn default() -> Self {
        Self::from_view_projection(&Mat4::IDENTITY)
    }
}

//! Triangle primitive for ray tracing.
//!
//! Plane-then-barycentric intersection (Möller-Trumbore family). Triangles do
//! not own a material; the [`StaticMesh`](crate::StaticMesh) holding them does.

use crate::hash;
use crate::Ray;
use lumen_math::{optics, Aabb, Interval, Vec2, Vec3, SMALL_NUMBER};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// What to do when a ray hits the back of a triangle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackfacePolicy {
    /// Keep the hit, flip the normal toward the ray (double sided).
    #[default]
    FlipNormal,
    /// Discard back face hits.
    Drop,
}

/// A triangle with per-vertex texture coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertices: [Vec3; 3],
    pub uvs: [Vec2; 3],
}

/// Result of a ray-triangle test, before a material is attached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleHit {
    pub t: f32,
    /// Weights of (v0, v1, v2), summing to 1
    pub barycentric: [f32; 3],
    /// Normal oriented against the ray
    pub normal: Vec3,
    pub front_face: bool,
    pub uv: Vec2,
}

impl Triangle {
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self {
            vertices: [v0, v1, v2],
            uvs: [Vec2::ZERO, Vec2::X, Vec2::Y],
        }
    }

    pub fn with_uvs(mut self, uvs: [Vec2; 3]) -> Self {
        self.uvs = uvs;
        self
    }

    /// Unit geometric normal, counter-clockwise winding.
    pub fn face_normal(&self) -> Vec3 {
        let [v0, v1, v2] = self.vertices;
        (v1 - v0).cross(v2 - v0).normalize_or_zero()
    }

    pub fn bounding_box(&self) -> Aabb {
        Aabb::from_iter_points(self.vertices)
    }

    /// Apply a point transform to every vertex.
    pub fn map(&self, f: impl Fn(Vec3) -> Vec3) -> Self {
        Self {
            vertices: self.vertices.map(f),
            uvs: self.uvs,
        }
    }

    pub fn intersect(
        &self,
        ray: &Ray,
        ray_t: Interval,
        policy: BackfacePolicy,
    ) -> Option<TriangleHit> {
        let [v0, v1, v2] = self.vertices;
        let barycentric = ray_triangle(ray, v0, v1, v2, ray_t)?;

        let (normal, front_face) = optics::face_normal(ray.direction, self.face_normal());
        if !front_face && policy == BackfacePolicy::Drop {
            return None;
        }

        let [w0, w1, w2] = barycentric.weights;
        let uv = self.uvs[0] * w0 + self.uvs[1] * w1 + self.uvs[2] * w2;

        Some(TriangleHit {
            t: barycentric.t,
            barycentric: barycentric.weights,
            normal,
            front_face,
            uv,
        })
    }
}

impl Hash for Triangle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for v in self.vertices {
            hash::hash_vec3(state, v);
        }
        for uv in self.uvs {
            hash::hash_f32s(state, &[uv.x, uv.y]);
        }
    }
}

/// Distance and barycentric weights of a ray-triangle crossing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Barycentric {
    pub t: f32,
    pub weights: [f32; 3],
}

/// Ray against the plane of (v0, v1, v2), then barycentric containment.
///
/// Returns `None` for near-parallel rays, points outside the triangle and
/// distances outside `ray_t` (exclusive min, inclusive max). Orientation is
/// not considered here.
pub fn ray_triangle(ray: &Ray, v0: Vec3, v1: Vec3, v2: Vec3, ray_t: Interval) -> Option<Barycentric> {
    let e1 = v1 - v0;
    let e2 = v2 - v0;
    let w = ray.direction;

    let q = w.cross(e2);
    let a = e1.dot(q);
    if a.abs() <= SMALL_NUMBER {
        return None;
    }

    let s = (ray.origin - v0) / a;
    let r = s.cross(e1);

    let b1 = s.dot(q);
    let b2 = r.dot(w);
    let b0 = 1.0 - b1 - b2;
    if b0 < 0.0 || b1 < 0.0 || b2 < 0.0 {
        return None;
    }

    let t = e2.dot(r);
    if !ray_t.accepts(t) {
        return None;
    }

    Some(Barycentric {
        t,
        weights: [b0, b1, b2],
    })
}

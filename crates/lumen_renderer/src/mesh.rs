//! Triangle meshes placed in the world.

use crate::hash;
use crate::triangle::{BackfacePolicy, Triangle};
use crate::{HitRecord, Material, ObjectId, Ray, RayStats};
use lumen_math::{Aabb, Interval, Quat, Vec2, Vec3};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Local space triangle soup, as delivered by the asset loader.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub name: String,
    pub faces: Vec<Triangle>,
}

impl MeshData {
    pub fn new(name: impl Into<String>, faces: Vec<Triangle>) -> Self {
        Self {
            name: name.into(),
            faces,
        }
    }

    /// Build from indexed vertex data; `indices` is read in triples.
    pub fn from_indexed(
        name: impl Into<String>,
        positions: &[Vec3],
        uvs: Option<&[Vec2]>,
        indices: &[u32],
    ) -> Self {
        let faces = indices
            .chunks_exact(3)
            .map(|idx| {
                let [a, b, c] = [idx[0] as usize, idx[1] as usize, idx[2] as usize];
                let tri = Triangle::new(positions[a], positions[b], positions[c]);
                match uvs {
                    Some(uvs) => tri.with_uvs([uvs[a], uvs[b], uvs[c]]),
                    None => tri,
                }
            })
            .collect();
        Self::new(name, faces)
    }

    /// Axis aligned unit quad in the XZ plane facing +Y, centered at the origin.
    pub fn quad(name: impl Into<String>) -> Self {
        let positions = [
            Vec3::new(-0.5, 0.0, -0.5),
            Vec3::new(0.5, 0.0, -0.5),
            Vec3::new(0.5, 0.0, 0.5),
            Vec3::new(-0.5, 0.0, 0.5),
        ];
        let uvs = [Vec2::ZERO, Vec2::X, Vec2::ONE, Vec2::Y];
        Self::from_indexed(name, &positions, Some(&uvs), &[0, 2, 1, 0, 3, 2])
    }

    /// Unit cube centered at the origin with outward facing triangles.
    pub fn cube(name: impl Into<String>) -> Self {
        let p = |x: f32, y: f32, z: f32| Vec3::new(x, y, z) * 0.5;
        let positions = [
            p(-1.0, -1.0, -1.0),
            p(1.0, -1.0, -1.0),
            p(1.0, 1.0, -1.0),
            p(-1.0, 1.0, -1.0),
            p(-1.0, -1.0, 1.0),
            p(1.0, -1.0, 1.0),
            p(1.0, 1.0, 1.0),
            p(-1.0, 1.0, 1.0),
        ];
        #[rustfmt::skip]
        let indices = [
            4, 5, 6, 4, 6, 7, // +z
            1, 0, 3, 1, 3, 2, // -z
            5, 1, 2, 5, 2, 6, // +x
            0, 4, 7, 0, 7, 3, // -x
            7, 6, 2, 7, 2, 3, // +y
            0, 1, 5, 0, 5, 4, // -y
        ];
        Self::from_indexed(name, &positions, None, &indices)
    }
}

/// A mesh instance: shared local faces plus a world transform.
///
/// Faces are baked to world space whenever the transform changes so the hit
/// loop never transforms rays.
#[derive(Debug, Clone)]
pub struct StaticMesh {
    pub name: String,
    id: ObjectId,
    mesh: Arc<MeshData>,
    world_faces: Arc<[Triangle]>,
    material: Arc<Material>,
    origin: Vec3,
    /// Rotation about +Y in degrees
    rotation_y: f32,
    /// Uniform scale
    scale: f32,
    backface_policy: BackfacePolicy,
    bbox: Aabb,
}

impl StaticMesh {
    /// Place `mesh` at the origin with identity transform. Panics if the
    /// material is malformed.
    pub fn new(mesh: Arc<MeshData>, material: Arc<Material>) -> Self {
        material.assert_valid();

        let mut result = Self {
            name: mesh.name.clone(),
            id: ObjectId::next(),
            mesh,
            world_faces: Arc::from(Vec::new()),
            material,
            origin: Vec3::ZERO,
            rotation_y: 0.0,
            scale: 1.0,
            backface_policy: BackfacePolicy::default(),
            bbox: Aabb::EMPTY,
        };
        result.bake();
        result
    }

    pub fn with_transform(mut self, origin: Vec3, rotation_y: f32, scale: f32) -> Self {
        self.set_transform(origin, rotation_y, scale);
        self
    }

    pub fn with_backface_policy(mut self, policy: BackfacePolicy) -> Self {
        self.backface_policy = policy;
        self
    }

    pub fn set_transform(&mut self, origin: Vec3, rotation_y: f32, scale: f32) {
        self.origin = origin;
        self.rotation_y = rotation_y;
        self.scale = scale;
        self.bake();
    }

    fn bake(&mut self) {
        let rotation = Quat::from_rotation_y(self.rotation_y.to_radians());
        let (origin, scale) = (self.origin, self.scale);

        let faces: Vec<Triangle> = self
            .mesh
            .faces
            .iter()
            .map(|face| face.map(|v| rotation * (v * scale) + origin))
            .collect();

        self.bbox = Aabb::from_iter_points(faces.iter().flat_map(|f| f.vertices));
        self.world_faces = Arc::from(faces);
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn rotation_y(&self) -> f32 {
        self.rotation_y
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn material(&self) -> &Arc<Material> {
        &self.material
    }

    pub fn backface_policy(&self) -> BackfacePolicy {
        self.backface_policy
    }

    pub fn faces(&self) -> &[Triangle] {
        &self.world_faces
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    /// Closest face hit. Linear in the number of faces.
    pub fn intersect(
        &self,
        ray: &Ray,
        ray_t: Interval,
        stats: &mut RayStats,
    ) -> Option<HitRecord<'_>> {
        let mut closest: Option<(usize, crate::triangle::TriangleHit)> = None;
        let mut range = ray_t;

        for (face_id, face) in self.world_faces.iter().enumerate() {
            stats.ray_triangle_tests += 1;
            if let Some(hit) = face.intersect(ray, range, self.backface_policy) {
                range = range.with_max(hit.t);
                closest = Some((face_id, hit));
            }
        }

        let (face_id, hit) = closest?;
        Some(HitRecord {
            p: ray.at(hit.t),
            normal: hit.normal,
            t: hit.t,
            u: hit.uv.x,
            v: hit.uv.y,
            material: &self.material,
            front_face: hit.front_face,
            object: self.id,
            face_id,
        })
    }

    pub fn content_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        "static_mesh".hash(&mut hasher);
        self.mesh.faces.hash(&mut hasher);
        hash::hash_vec3(&mut hasher, self.origin);
        hash::hash_f32s(&mut hasher, &[self.rotation_y, self.scale]);
        self.backface_policy.hash(&mut hasher);
        self.material.hash(&mut hasher);
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color;

    fn grey() -> Arc<Material> {
        Arc::new(Material::diffuse("grey", Color::splat(0.5)))
    }

    #[test]
    fn test_cube_hit_from_outside() {
        let cube = StaticMesh::new(Arc::new(MeshData::cube("cube")), grey());
        let ray = Ray::new(Vec3::new(0.1, -0.2, 5.0), Vec3::NEG_Z);
        let mut stats = RayStats::default();

        let rec = cube
            .intersect(&ray, Interval::from_t_max(f32::INFINITY), &mut stats)
            .unwrap();
        assert!((rec.t - 4.5).abs() < 1e-5);
        assert!(rec.front_face);
        assert!((rec.normal - Vec3::Z).length() < 1e-5);
        assert!(rec.face_id < 2);
        assert_eq!(stats.ray_triangle_tests, 12);
    }

    #[test]
    fn test_transform_is_baked() {
        let quad = StaticMesh::new(Arc::new(MeshData::quad("floor")), grey())
            .with_transform(Vec3::new(0.0, -1.0, 0.0), 45.0, 10.0);

        let bbox = quad.bounding_box();
        // Rotated 45 degrees, half diagonal of a 10x10 quad
        assert!((bbox.max().x - 50f32.sqrt()).abs() < 1e-3);
        assert!((bbox.min().y + 1.0).abs() < 1e-3);

        let ray = Ray::new(Vec3::new(3.0, 5.0, 1.0), Vec3::NEG_Y);
        let rec = quad
            .intersect(&ray, Interval::from_t_max(f32::INFINITY), &mut RayStats::default())
            .unwrap();
        assert!((rec.p.y + 1.0).abs() < 1e-4);
        assert!((rec.normal - Vec3::Y).length() < 1e-4);
    }

    #[test]
    fn test_closest_face_wins_from_inside() {
        let cube = StaticMesh::new(Arc::new(MeshData::cube("room")), grey()).with_transform(
            Vec3::ZERO,
            0.0,
            4.0,
        );
        let ray = Ray::new(Vec3::new(0.0, 0.5, 0.0), Vec3::X);
        let rec = cube
            .intersect(&ray, Interval::from_t_max(f32::INFINITY), &mut RayStats::default())
            .unwrap();
        assert!((rec.t - 2.0).abs() < 1e-4);
        assert!(!rec.front_face);
        assert!(rec.normal.dot(ray.direction) <= 0.0);

        let culled = StaticMesh::new(Arc::new(MeshData::cube("room")), grey())
            .with_transform(Vec3::ZERO, 0.0, 4.0)
            .with_backface_policy(BackfacePolicy::Drop);
        assert!(culled
            .intersect(&ray, Interval::from_t_max(f32::INFINITY), &mut RayStats::default())
            .is_none());
    }

    #[test]
    fn test_hash_changes_with_transform() {
        let mesh = Arc::new(MeshData::cube("cube"));
        let a = StaticMesh::new(mesh.clone(), grey());
        let b = StaticMesh::new(mesh, grey()).with_transform(Vec3::X, 0.0, 1.0);
        assert_ne!(a.content_hash(), b.content_hash());
    }
}

//! Hit records and the hittable sum type.

use crate::{Material, Ray, RayStats, Scene, Sphere, StaticMesh};
use lumen_math::{optics, Aabb, Interval, Vec3};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

static NEXT_OBJECT_ID: AtomicU32 = AtomicU32::new(1);

/// Opaque runtime id of a hittable, used for picking and debug colouring.
///
/// Never implies ownership; resolve it through [`Scene::find`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u32);

impl ObjectId {
    /// Allocate a fresh process-unique id.
    pub fn next() -> Self {
        Self(NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

/// Record of a ray-object intersection.
#[derive(Debug, Clone, Copy)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Vec3,
    /// Surface normal, always oriented against the incoming ray
    pub normal: Vec3,
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// UV texture coordinates
    pub u: f32,
    pub v: f32,
    pub material: &'a Material,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
    pub object: ObjectId,
    /// Triangle index for meshes, 0 otherwise
    pub face_id: usize,
}

impl<'a> HitRecord<'a> {
    /// Build a record at distance `t`, resolving the normal against the ray.
    pub fn new(
        ray: &Ray,
        t: f32,
        outward_normal: Vec3,
        material: &'a Material,
        object: ObjectId,
    ) -> Self {
        let (normal, front_face) = optics::face_normal(ray.direction, outward_normal);
        Self {
            p: ray.at(t),
            normal,
            t,
            u: 0.0,
            v: 0.0,
            material,
            front_face,
            object,
            face_id: 0,
        }
    }

    pub fn with_uv(mut self, u: f32, v: f32) -> Self {
        self.u = u;
        self.v = v;
        self
    }
}

/// Anything a ray can be tested against.
///
/// A closed set of variants dispatched with `match`; scenes nest.
#[derive(Debug, Clone)]
pub enum Hittable {
    Scene(Scene),
    Sphere(Sphere),
    StaticMesh(StaticMesh),
}

impl Hittable {
    /// Closest intersection within `ray_t`, without collecting statistics.
    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        self.intersect(ray, ray_t, &mut RayStats::default())
    }

    /// Closest intersection within `ray_t`, counting tests into `stats`.
    pub fn intersect(
        &self,
        ray: &Ray,
        ray_t: Interval,
        stats: &mut RayStats,
    ) -> Option<HitRecord<'_>> {
        match self {
            Hittable::Scene(scene) => scene.intersect(ray, ray_t, stats),
            Hittable::Sphere(sphere) => sphere.intersect(ray, ray_t),
            Hittable::StaticMesh(mesh) => mesh.intersect(ray, ray_t, stats),
        }
    }

    pub fn bounding_box(&self) -> Aabb {
        match self {
            Hittable::Scene(scene) => scene.bounding_box(),
            Hittable::Sphere(sphere) => sphere.bounding_box(),
            Hittable::StaticMesh(mesh) => mesh.bounding_box(),
        }
    }

    pub fn id(&self) -> ObjectId {
        match self {
            Hittable::Scene(scene) => scene.id(),
            Hittable::Sphere(sphere) => sphere.id(),
            Hittable::StaticMesh(mesh) => mesh.id(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Hittable::Scene(scene) => &scene.name,
            Hittable::Sphere(sphere) => &sphere.name,
            Hittable::StaticMesh(mesh) => &mesh.name,
        }
    }

    pub fn origin(&self) -> Vec3 {
        match self {
            Hittable::Scene(scene) => scene.bounding_box().centroid(),
            Hittable::Sphere(sphere) => sphere.center(),
            Hittable::StaticMesh(mesh) => mesh.origin(),
        }
    }

    pub fn extent(&self) -> Vec3 {
        match self {
            Hittable::Sphere(sphere) => Vec3::splat(sphere.radius()),
            other => other.bounding_box().extent(),
        }
    }

    /// Material of a leaf hittable, `None` for scenes.
    pub fn material(&self) -> Option<&Arc<Material>> {
        match self {
            Hittable::Scene(_) => None,
            Hittable::Sphere(sphere) => Some(sphere.material()),
            Hittable::StaticMesh(mesh) => Some(mesh.material()),
        }
    }

    pub fn is_light(&self) -> bool {
        self.material().is_some_and(|m| m.is_light())
    }

    /// Hash of everything that affects the rendered image.
    pub fn content_hash(&self) -> u64 {
        match self {
            Hittable::Scene(scene) => scene.content_hash(),
            Hittable::Sphere(sphere) => sphere.content_hash(),
            Hittable::StaticMesh(mesh) => mesh.content_hash(),
        }
    }
}

impl From<Sphere> for Hittable {
    fn from(value: Sphere) -> Self {
        Hittable::Sphere(value)
    }
}

impl From<StaticMesh> for Hittable {
    fn from(value: StaticMesh) -> Self {
        Hittable::StaticMesh(value)
    }
}

impl From<Scene> for Hittable {
    fn from(value: Scene) -> Self {
        Hittable::Scene(value)
    }
}

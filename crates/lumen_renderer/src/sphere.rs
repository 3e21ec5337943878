//! Sphere primitive for ray tracing.

use crate::hash;
use crate::{HitRecord, Material, ObjectId, Ray};
use lumen_math::{optics, Aabb, Interval, Vec3};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A sphere primitive.
#[derive(Debug, Clone)]
pub struct Sphere {
    pub name: String,
    id: ObjectId,
    center: Vec3,
    radius: f32,
    material: Arc<Material>,
    bbox: Aabb,
}

impl Sphere {
    /// Create a new sphere. Panics if the radius is not positive or the
    /// material is malformed.
    pub fn new(center: Vec3, radius: f32, material: Arc<Material>) -> Self {
        assert!(radius > 0.0, "sphere radius must be positive, got {radius}");
        material.assert_valid();

        let rvec = Vec3::splat(radius);
        let bbox = Aabb::from_points(center - rvec, center + rvec);

        Self {
            name: format!("sphere_{}", material.name),
            id: ObjectId::next(),
            center,
            radius,
            material,
            bbox,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn material(&self) -> &Arc<Material> {
        &self.material
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    /// Nearest root of the sphere equation inside `ray_t`.
    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let oc = ray.origin - self.center;
        let a = ray.direction.length_squared();
        let b = oc.dot(ray.direction);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = b * b - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Smaller root first, then the far side
        let mut root = (-b - sqrtd) / a;
        if !ray_t.accepts(root) {
            root = (-b + sqrtd) / a;
            if !ray_t.accepts(root) {
                return None;
            }
        }

        let outward_normal = (ray.at(root) - self.center) / self.radius;
        let (u, v) = optics::sphere_uv(outward_normal);
        Some(HitRecord::new(ray, root, outward_normal, &self.material, self.id).with_uv(u, v))
    }

    pub fn content_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        "sphere".hash(&mut hasher);
        hash::hash_vec3(&mut hasher, self.center);
        hash::hash_f32s(&mut hasher, &[self.radius]);
        self.material.hash(&mut hasher);
        hasher.finish()
    }
}

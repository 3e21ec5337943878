//! Scenes: ordered collections of hittables plus view and render settings.

use crate::hash;
use crate::{CameraConfig, Color, HitRecord, Hittable, ObjectId, Ray, RayStats, RendererConfig};
use lumen_math::{Aabb, Interval};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// A hittable owning its children. Scenes nest.
#[derive(Debug, Clone)]
pub struct Scene {
    pub name: String,
    id: ObjectId,
    objects: Vec<Hittable>,
    bbox: Aabb,
    pub camera: CameraConfig,
    /// Lower bound on diffuse lighting in the preview kernel
    pub ambient: Color,
    /// Settings this scene was authored with
    pub renderer: RendererConfig,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new("scene")
    }
}

impl Scene {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: ObjectId::next(),
            objects: Vec::new(),
            bbox: Aabb::EMPTY,
            camera: CameraConfig::default(),
            ambient: Color::splat(0.2),
            renderer: RendererConfig::default(),
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Add a child and return its id.
    pub fn add(&mut self, object: impl Into<Hittable>) -> ObjectId {
        let object = object.into();
        if let Some(material) = object.material() {
            material.assert_valid();
        }

        let id = object.id();
        self.bbox = Aabb::merge(&self.bbox, &object.bounding_box());
        self.objects.push(object);
        id
    }

    /// Remove a direct child by id.
    pub fn remove(&mut self, id: ObjectId) -> Option<Hittable> {
        let index = self.objects.iter().position(|o| o.id() == id)?;
        let removed = self.objects.remove(index);
        self.bbox = self
            .objects
            .iter()
            .fold(Aabb::EMPTY, |acc, o| Aabb::merge(&acc, &o.bounding_box()));
        Some(removed)
    }

    pub fn objects(&self) -> &[Hittable] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Find a hittable by id, searching nested scenes.
    pub fn find(&self, id: ObjectId) -> Option<&Hittable> {
        self.objects.iter().find_map(|object| {
            if object.id() == id {
                return Some(object);
            }
            match object {
                Hittable::Scene(scene) => scene.find(id),
                _ => None,
            }
        })
    }

    /// Emissive hittables in traversal order, including nested scenes.
    pub fn query_lights(&self) -> Vec<&Hittable> {
        let mut lights = Vec::new();
        self.collect_lights(&mut lights);
        lights
    }

    fn collect_lights<'a>(&'a self, out: &mut Vec<&'a Hittable>) {
        for object in &self.objects {
            match object {
                Hittable::Scene(scene) => scene.collect_lights(out),
                other if other.is_light() => out.push(other),
                _ => {}
            }
        }
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    /// Nearest child hit. Children are pre-rejected by their bounding box;
    /// on equal distance the earlier child wins.
    pub fn intersect(
        &self,
        ray: &Ray,
        ray_t: Interval,
        stats: &mut RayStats,
    ) -> Option<HitRecord<'_>> {
        let mut closest: Option<HitRecord<'_>> = None;
        let mut range = ray_t;

        for object in &self.objects {
            stats.ray_box_tests += 1;
            if !object.bounding_box().hit(ray, range) {
                continue;
            }

            stats.ray_object_tests += 1;
            if let Some(rec) = object.intersect(ray, range, stats) {
                if closest.map_or(true, |c| rec.t < c.t) {
                    range = range.with_max(rec.t);
                    closest = Some(rec);
                }
            }
        }

        closest
    }

    /// Hash of the geometry and materials; camera and render settings are
    /// tracked separately.
    pub fn content_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        "scene".hash(&mut hasher);
        for object in &self.objects {
            object.content_hash().hash(&mut hasher);
        }
        hash::hash_vec3(&mut hasher, self.ambient);
        hasher.finish()
    }
}

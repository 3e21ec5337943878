//! Debug kernel showing shading normals.

use super::PixelKernel;
use crate::random::Sampler;
use crate::{Color, Ray, RayStats, Scene};
use lumen_math::Interval;

pub struct NormalsKernel<'a> {
    scene: &'a Scene,
}

impl<'a> NormalsKernel<'a> {
    pub fn new(scene: &'a Scene) -> Self {
        Self { scene }
    }
}

impl PixelKernel for NormalsKernel<'_> {
    fn trace(&self, ray: &Ray, _sampler: &mut dyn Sampler, stats: &mut RayStats) -> Color {
        stats.rays += 1;
        match self
            .scene
            .intersect(ray, Interval::from_t_max(f32::INFINITY), stats)
        {
            Some(hit) => (hit.normal + Color::ONE) * 0.5,
            None => Color::ZERO,
        }
    }
}

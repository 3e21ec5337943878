//! Debug kernel colouring each object and triangle differently.

use super::PixelKernel;
use crate::random::Sampler;
use crate::{palette, Color, Ray, RayStats, Scene};
use lumen_math::Interval;

pub struct FacesKernel<'a> {
    scene: &'a Scene,
}

impl<'a> FacesKernel<'a> {
    pub fn new(scene: &'a Scene) -> Self {
        Self { scene }
    }
}

impl PixelKernel for FacesKernel<'_> {
    fn trace(&self, ray: &Ray, _sampler: &mut dyn Sampler, stats: &mut RayStats) -> Color {
        stats.rays += 1;
        match self
            .scene
            .intersect(ray, Interval::from_t_max(f32::INFINITY), stats)
        {
            Some(hit) => {
                let index = (hit.object.get() as usize + hit.face_id) % palette::ALL.len();
                palette::ALL[index]
            }
            None => Color::ZERO,
        }
    }
}

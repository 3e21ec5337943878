//! Pixel kernels: per-ray shading programs run by the job's chunk workers.
//!
//! Every kernel returns linear colour for a camera ray. Colours are not
//! clamped while samples accumulate; [`PixelKernel::tone_map`] runs once per
//! pixel on the averaged value.

mod faces;
mod normals;
mod preview;
mod reference;

pub use faces::FacesKernel;
pub use normals::NormalsKernel;
pub use preview::{background_gradient, PreviewKernel, SHADOW_ATTENUATION};
pub use reference::{environment_light, ReferenceKernel};

use crate::chunk::ChunkStrategy;
use crate::random::Sampler;
use crate::tone_mapping::{self, ToneMapper};
use crate::{Camera, Color, Ray, RayStats, RendererConfig, RendererKind, Scene};

/// A shading program evaluated for every sample of every pixel.
pub trait PixelKernel: Sync {
    /// Linear colour seen along `ray`.
    fn trace(&self, ray: &Ray, sampler: &mut dyn Sampler, stats: &mut RayStats) -> Color;

    /// Map the averaged colour into [0, 1].
    fn tone_map(&self, hdr: Color) -> Color {
        tone_mapping::trivial(hdr)
    }
}

/// Kernel whose tone mapping is replaced by a configured operator.
struct WithToneMapper<'a> {
    inner: Box<dyn PixelKernel + 'a>,
    mapper: ToneMapper,
    white_point: f32,
}

impl PixelKernel for WithToneMapper<'_> {
    fn trace(&self, ray: &Ray, sampler: &mut dyn Sampler, stats: &mut RayStats) -> Color {
        self.inner.trace(ray, sampler, stats)
    }

    fn tone_map(&self, hdr: Color) -> Color {
        self.mapper.apply(hdr, self.white_point)
    }
}

/// Build the kernel selected by `config` for one render pass over `scene`.
pub fn kernel_for<'a>(scene: &'a Scene, config: &RendererConfig) -> Box<dyn PixelKernel + 'a> {
    let kernel = base_kernel(scene, config);
    match config.tone_mapper {
        Some(mapper) => Box::new(WithToneMapper {
            inner: kernel,
            mapper,
            white_point: config.white_point,
        }),
        None => kernel,
    }
}

fn base_kernel<'a>(scene: &'a Scene, config: &RendererConfig) -> Box<dyn PixelKernel + 'a> {
    match config.kind {
        RendererKind::Preview => Box::new(PreviewKernel::new(scene)),
        RendererKind::Reference => Box::new(ReferenceKernel::new(
            scene,
            config.max_bounces,
            config.white_point,
        )),
        RendererKind::Normals => Box::new(NormalsKernel::new(scene)),
        RendererKind::Faces => Box::new(FacesKernel::new(scene)),
    }
}

/// Chunk layout used with each kernel.
pub fn chunk_strategy(kind: RendererKind) -> ChunkStrategy {
    match kind {
        RendererKind::Reference => ChunkStrategy::Rectangles,
        _ => ChunkStrategy::VerticalStripes,
    }
}

/// Supersample pixel `(x, y)` of a `width` x `height` image.
///
/// Each sample jitters the viewport coordinate inside the pixel before
/// generating the camera ray. Returns the tone mapped average.
#[allow(clippy::too_many_arguments)]
pub fn render_pixel(
    kernel: &dyn PixelKernel,
    camera: &Camera,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    samples_per_pixel: u32,
    sampler: &mut dyn Sampler,
    stats: &mut RayStats,
) -> Color {
    let samples = samples_per_pixel.max(1);
    let mut sum = Color::ZERO;

    for _ in 0..samples {
        let s = (x as f32 + 0.5 + 0.5 * sampler.scalar()) / width as f32;
        let t = (y as f32 + 0.5 + 0.5 * sampler.scalar()) / height as f32;
        let ray = camera.get_ray(s, t, sampler);
        sum += kernel.trace(&ray, sampler, stats);
    }

    kernel.tone_map(sum / samples as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::PcgSampler;
    use crate::{CameraConfig, Material, Sphere};
    use lumen_math::Vec3;
    use std::sync::Arc;

    struct Constant(Color);

    impl PixelKernel for Constant {
        fn trace(&self, _: &Ray, _: &mut dyn Sampler, stats: &mut RayStats) -> Color {
            stats.rays += 1;
            self.0
        }
    }

    #[test]
    fn test_render_pixel_averages_and_counts() {
        let camera = Camera::new(&CameraConfig::default());
        let mut sampler = PcgSampler::new(3);
        let mut stats = RayStats::default();

        let color = render_pixel(
            &Constant(Color::splat(0.25)),
            &camera,
            5,
            5,
            10,
            10,
            8,
            &mut sampler,
            &mut stats,
        );
        assert!((color - Color::splat(0.25)).length() < 1e-6);
        assert_eq!(stats.rays, 8);
    }

    #[test]
    fn test_zero_samples_still_shades_once() {
        let camera = Camera::new(&CameraConfig::default());
        let mut stats = RayStats::default();
        render_pixel(
            &Constant(Color::ONE),
            &camera,
            0,
            0,
            1,
            1,
            0,
            &mut PcgSampler::new(1),
            &mut stats,
        );
        assert_eq!(stats.rays, 1);
    }

    #[test]
    fn test_every_kind_builds() {
        let mut scene = Scene::new("kinds");
        scene.add(Sphere::new(
            Vec3::ZERO,
            1.0,
            Arc::new(Material::light("lamp", Color::ONE)),
        ));
        for kind in RendererKind::ALL {
            let config = RendererConfig::default().with_kind(kind);
            let kernel = kernel_for(&scene, &config);
            let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
            let c = kernel.trace(&ray, &mut PcgSampler::new(1), &mut RayStats::default());
            assert!(c.is_finite());
        }
    }

    #[test]
    fn test_configured_tone_mapper_overrides_kernel() {
        let scene = Scene::new("empty");
        let hdr = Color::splat(3.0);

        let default = kernel_for(&scene, &RendererConfig::default());
        assert_eq!(default.tone_map(hdr), Color::ONE);

        let mut config = RendererConfig::default();
        config.tone_mapper = Some(ToneMapper::Reinhard);
        let kernel = kernel_for(&scene, &config);
        assert!((kernel.tone_map(hdr) - Color::splat(0.75)).length() < 1e-6);
    }

    #[test]
    fn test_strategy_per_kind() {
        assert_eq!(chunk_strategy(RendererKind::Reference), ChunkStrategy::Rectangles);
        assert_eq!(chunk_strategy(RendererKind::Preview), ChunkStrategy::VerticalStripes);
    }
}

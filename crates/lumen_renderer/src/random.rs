//! Pseudo-random sampling for Monte Carlo shading.
//!
//! Two sources implement [`Sampler`]:
//! - [`PcgSampler`], a hash based stream seeded per pixel. Successive draws
//!   rotate the internal state so the same seed does not repeat a value.
//! - [`CachedSampler`], which walks a [`RandomCache`] built once when the
//!   renderer is created. Much cheaper per draw, at the cost of correlation
//!   between pixels that land on nearby cursor positions.

use lumen_math::Vec3;
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::f32::consts::PI;

/// Number of cached scalars in [-1, 1].
pub const FLOAT_CACHE_SIZE: usize = 500_000;

/// Number of cached cosine weighted directions.
pub const DIRECTION_CACHE_SIZE: usize = 50_000;

/// Source of random values used by the shading kernels.
pub trait Sampler {
    /// Uniform value in [-1, 1].
    fn scalar(&mut self) -> f32;

    /// Uniform value in [0, 1].
    fn unit(&mut self) -> f32 {
        self.scalar().abs()
    }

    /// Normally distributed value (Box-Muller). Not clamped, rare outliers
    /// beyond [-1, 1] are expected.
    fn normal(&mut self) -> f32 {
        let theta = 2.0 * PI * self.unit();
        // ln(0) would be -inf, keep the draw strictly positive
        let rho = (-2.0 * self.unit().max(f32::MIN_POSITIVE).ln()).sqrt();
        assert!(rho.is_finite(), "non-finite normal draw");
        rho * theta.cos()
    }

    /// Uniformly distributed unit vector.
    fn direction(&mut self) -> Vec3 {
        let v = Vec3::new(self.normal(), self.normal(), self.normal());
        let n = v.normalize_or_zero();
        if n == Vec3::ZERO {
            Vec3::Z
        } else {
            n
        }
    }

    /// Cosine weighted direction in the hemisphere around +Z.
    fn cosine_direction(&mut self) -> Vec3 {
        cosine_direction_from(self.unit(), self.unit())
    }

    /// Point in the unit disk on the XY plane.
    fn in_unit_disk(&mut self) -> Vec3 {
        let r = self.unit().sqrt();
        let phi = 2.0 * PI * self.unit();
        Vec3::new(r * phi.cos(), r * phi.sin(), 0.0)
    }
}

/// Map two uniform draws in [0, 1] to a cosine weighted +Z hemisphere direction.
#[inline]
pub fn cosine_direction_from(r1: f32, r2: f32) -> Vec3 {
    let phi = 2.0 * PI * r1;
    let r2 = r2.clamp(0.0, 1.0);
    let sin_theta = r2.sqrt();
    Vec3::new(phi.cos() * sin_theta, phi.sin() * sin_theta, (1.0 - r2).sqrt())
}

/// PCG output permutation of a 32 bit state.
#[inline]
pub fn pcg_hash(input: u32) -> u32 {
    let state = input.wrapping_mul(747_796_405).wrapping_add(2_891_336_453);
    let word = ((state >> ((state >> 28) + 4)) ^ state).wrapping_mul(277_803_737);
    (word >> 22) ^ word
}

/// Hash based random stream.
#[derive(Debug, Clone)]
pub struct PcgSampler {
    seed: u32,
    last: u32,
}

impl PcgSampler {
    pub fn new(seed: u32) -> Self {
        Self { seed, last: 0 }
    }

    /// Next raw 32 bit value of the stream.
    pub fn next_u32(&mut self) -> u32 {
        // The seed alone would give the same value every call, rotate it
        let result = pcg_hash(self.seed.wrapping_add(self.last));
        self.last = result;
        result
    }
}

impl Sampler for PcgSampler {
    fn scalar(&mut self) -> f32 {
        let unit = self.next_u32() as f64 / u32::MAX as f64;
        (unit * 2.0 - 1.0) as f32
    }
}

/// Precomputed ring buffers of random values.
///
/// Built once per renderer and shared read-only between chunk workers. Each
/// worker reads through its own [`CachedSampler`] cursor.
pub struct RandomCache {
    floats: Vec<f32>,
    cosine_directions: Vec<Vec3>,
}

impl RandomCache {
    /// Build a cache with the default sizes from a fixed seed.
    pub fn new(seed: u64) -> Self {
        Self::with_sizes(seed, FLOAT_CACHE_SIZE, DIRECTION_CACHE_SIZE)
    }

    /// Build a cache seeded from the system clock.
    pub fn from_clock() -> Self {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_micros() as u64)
            .unwrap_or(0);
        Self::new(seed)
    }

    /// Build a cache with custom ring sizes (both clamped to at least one entry).
    pub fn with_sizes(seed: u64, float_count: usize, direction_count: usize) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let range = Uniform::new_inclusive(-1.0f32, 1.0f32);
        let unit = Uniform::new_inclusive(0.0f32, 1.0f32);

        let floats = (0..float_count.max(1)).map(|_| range.sample(&mut rng)).collect();
        let cosine_directions = (0..direction_count.max(1))
            .map(|_| cosine_direction_from(unit.sample(&mut rng), unit.sample(&mut rng)))
            .collect();

        log::debug!(
            "Random cache built: {} floats, {} directions",
            float_count,
            direction_count
        );

        Self {
            floats,
            cosine_directions,
        }
    }

    /// A sampler whose cursors start at a position derived from `seed`.
    pub fn sampler(&self, seed: u32) -> CachedSampler<'_> {
        let h = pcg_hash(seed) as usize;
        CachedSampler {
            cache: self,
            float_cursor: h % self.floats.len(),
            direction_cursor: h % self.cosine_directions.len(),
        }
    }

    pub fn float_len(&self) -> usize {
        self.floats.len()
    }
}

/// Round-robin reader over a [`RandomCache`].
pub struct CachedSampler<'a> {
    cache: &'a RandomCache,
    float_cursor: usize,
    direction_cursor: usize,
}

impl Sampler for CachedSampler<'_> {
    fn scalar(&mut self) -> f32 {
        self.float_cursor = (self.float_cursor + 1) % self.cache.floats.len();
        self.cache.floats[self.float_cursor]
    }

    fn cosine_direction(&mut self) -> Vec3 {
        self.direction_cursor = (self.direction_cursor + 1) % self.cache.cosine_directions.len();
        self.cache.cosine_directions[self.direction_cursor]
    }
}

//! Ray and intersection counters for on-screen benchmark stats.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters gathered by a single chunk worker.
///
/// Plain integers so the hot loop never touches shared memory; merged into
/// [`AtomicRayStats`] once per chunk.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RayStats {
    /// Camera rays plus bounce and shadow rays
    pub rays: u64,
    pub ray_triangle_tests: u64,
    pub ray_box_tests: u64,
    pub ray_object_tests: u64,
}

impl RayStats {
    pub fn merge(&mut self, other: &RayStats) {
        self.rays += other.rays;
        self.ray_triangle_tests += other.ray_triangle_tests;
        self.ray_box_tests += other.ray_box_tests;
        self.ray_object_tests += other.ray_object_tests;
    }
}

/// Job wide counters, written by chunk workers and read by the caller.
#[derive(Debug, Default)]
pub struct AtomicRayStats {
    rays: AtomicU64,
    ray_triangle_tests: AtomicU64,
    ray_box_tests: AtomicU64,
    ray_object_tests: AtomicU64,
}

impl AtomicRayStats {
    pub fn add(&self, local: &RayStats) {
        self.rays.fetch_add(local.rays, Ordering::Relaxed);
        self.ray_triangle_tests
            .fetch_add(local.ray_triangle_tests, Ordering::Relaxed);
        self.ray_box_tests.fetch_add(local.ray_box_tests, Ordering::Relaxed);
        self.ray_object_tests
            .fetch_add(local.ray_object_tests, Ordering::Relaxed);
    }

    pub fn reset(&self) {
        self.rays.store(0, Ordering::Relaxed);
        self.ray_triangle_tests.store(0, Ordering::Relaxed);
        self.ray_box_tests.store(0, Ordering::Relaxed);
        self.ray_object_tests.store(0, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> RayStats {
        RayStats {
            rays: self.rays.load(Ordering::Relaxed),
            ray_triangle_tests: self.ray_triangle_tests.load(Ordering::Relaxed),
            ray_box_tests: self.ray_box_tests.load(Ordering::Relaxed),
            ray_object_tests: self.ray_object_tests.load(Ordering::Relaxed),
        }
    }
}

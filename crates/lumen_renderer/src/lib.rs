//! Lumen - asynchronous CPU ray tracing.
//!
//! A render job owns a worker thread that renders snapshots of a [`Scene`]
//! in parallel chunks while the caller keeps running. Four pixel kernels
//! share the same machinery: a fast direct light preview, a path traced
//! reference, and two debug views (normals and faces).

mod camera;
pub mod chunk;
mod config;
mod error;
mod frame;
mod hash;
mod hittable;
mod job;
pub mod kernel;
mod material;
mod mesh;
pub mod palette;
pub mod random;
mod scene;
mod sphere;
mod stats;
mod sync;
pub mod tone_mapping;
mod triangle;

pub use camera::{Camera, CameraConfig};
pub use chunk::{generate_chunks, Chunk, ChunkStrategy};
pub use config::{RendererConfig, RendererKind, SamplerKind};
pub use error::{RenderError, Result, SubmitError};
pub use frame::{color_to_rgba, DisplaySurface, FrameBuffer, FramePair, MemorySurface, PixelFormat};
pub use hittable::{HitRecord, Hittable, ObjectId};
pub use job::{Benchmark, JobSnapshot, JobState, RenderJob};
pub use kernel::PixelKernel;
pub use material::{Color, Material};
pub use mesh::{MeshData, StaticMesh};
pub use random::{RandomCache, Sampler};
pub use scene::Scene;
pub use sphere::Sphere;
pub use stats::{AtomicRayStats, RayStats};
pub use sync::Handshake;
pub use tone_mapping::ToneMapper;
pub use triangle::{ray_triangle, BackfacePolicy, Barycentric, Triangle, TriangleHit};

/// Re-export common math types from lumen_math
pub use lumen_math::{Aabb, Interval, Ray, Vec3};

//! Asynchronous render job.
//!
//! One long-lived worker thread per [`RenderJob`] waits on a [`Handshake`].
//! `submit` snapshots the scene and settings, then wakes the worker, which
//! splits the image into chunks and renders them on the rayon pool. The
//! caller polls [`RenderJob::is_working`] and pulls partial frames with
//! [`RenderJob::push_partial_update`] without ever blocking on the render.

use crate::chunk::{generate_chunks, Chunk};
use crate::config::SamplerKind;
use crate::error::{RenderError, Result, SubmitError};
use crate::frame::{DisplaySurface, FramePair};
use crate::kernel::{self, PixelKernel};
use crate::random::{pcg_hash, PcgSampler, RandomCache};
use crate::stats::{AtomicRayStats, RayStats};
use crate::sync::{lock, Handshake};
use crate::{Camera, CameraConfig, RendererConfig, RendererKind, Scene};
use log::{debug, error, info, trace, warn};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Lifecycle of the current job as seen by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Idle,
    /// Submitted, worker not started yet
    Queued,
    Rendering,
    /// Rendering with a pending cancel request
    Cancelling,
}

/// Inputs of one render, copied at submission.
#[derive(Debug, Clone)]
pub struct JobSnapshot {
    pub scene: Scene,
    pub renderer: RendererConfig,
    pub camera: CameraConfig,
}

/// Timings and counters of the last finished render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Benchmark {
    pub render_time: Duration,
    pub save_time: Duration,
    pub stats: RayStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SubmittedHashes {
    scene: u64,
    renderer: u64,
    camera: u64,
    kind: RendererKind,
}

/// State shared between the caller and the worker thread.
struct Shared {
    handshake: Handshake,
    shutdown: AtomicBool,
    is_working: AtomicBool,
    rendering: AtomicBool,
    cancel_requested: AtomicBool,
    snapshot: Mutex<Option<Arc<JobSnapshot>>>,
    frame: RwLock<Option<Arc<FramePair>>>,
    random: RandomCache,
    stats: AtomicRayStats,
    render_time_us: AtomicU64,
    save_time_us: AtomicU64,
    chunks_done: AtomicUsize,
    chunks_total: AtomicUsize,
    pass: AtomicU32,
    last_saved: Mutex<Option<PathBuf>>,
}

/// Handle owning the render worker thread.
///
/// Dropping the handle cancels any running render and joins the worker.
pub struct RenderJob {
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
    submitted: Mutex<Option<SubmittedHashes>>,
}

impl RenderJob {
    /// Spawn the worker with a clock seeded random cache.
    pub fn new() -> Self {
        Self::with_random_cache(RandomCache::from_clock())
    }

    /// Spawn the worker using `random` for cached sampling.
    pub fn with_random_cache(random: RandomCache) -> Self {
        let shared = Arc::new(Shared {
            handshake: Handshake::new(),
            shutdown: AtomicBool::new(false),
            is_working: AtomicBool::new(false),
            rendering: AtomicBool::new(false),
            cancel_requested: AtomicBool::new(false),
            snapshot: Mutex::new(None),
            frame: RwLock::new(None),
            random,
            stats: AtomicRayStats::default(),
            render_time_us: AtomicU64::new(0),
            save_time_us: AtomicU64::new(0),
            chunks_done: AtomicUsize::new(0),
            chunks_total: AtomicUsize::new(0),
            pass: AtomicU32::new(0),
            last_saved: Mutex::new(None),
        });

        let worker = {
            let shared = Arc::clone(&shared);
            thread::Builder::new()
                .name("lumen-render".into())
                .spawn(move || shared.worker_loop())
                .expect("failed to spawn render worker")
        };

        Self {
            shared,
            worker: Some(worker),
            submitted: Mutex::new(None),
        }
    }

    /// Snapshot the inputs and start rendering.
    ///
    /// Ignored while a job is in flight or for a zero sized resolution; the
    /// returned error says which. Buffers are reallocated when the resolution
    /// changes or `reuse_buffer` is off.
    pub fn submit(
        &self,
        scene: &Scene,
        renderer: &RendererConfig,
        camera: &CameraConfig,
    ) -> std::result::Result<(), SubmitError> {
        let (width, height) = renderer.resolution();
        if width == 0 || height == 0 {
            trace!("Submit ignored, degenerate resolution {}x{}", width, height);
            return Err(SubmitError::DegenerateResolution { width, height });
        }

        if renderer.validate().is_err() {
            trace!("Submit ignored, white point {}", renderer.white_point);
            return Err(SubmitError::InvalidWhitePoint);
        }

        if self
            .shared
            .is_working
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            trace!("Submit ignored, render in progress");
            return Err(SubmitError::Busy);
        }

        {
            let mut frame = self
                .shared
                .frame
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            let same_size = frame
                .as_ref()
                .is_some_and(|f| f.width() == width && f.height() == height);
            if !same_size || !renderer.reuse_buffer {
                debug!("Allocating frame buffers {}x{}", width, height);
                *frame = Some(Arc::new(FramePair::new(width, height)));
            }
        }

        *lock(&self.submitted) = Some(SubmittedHashes {
            scene: scene.content_hash(),
            renderer: renderer.content_hash(),
            camera: camera.content_hash(),
            kind: renderer.kind,
        });
        *lock(&self.shared.snapshot) = Some(Arc::new(JobSnapshot {
            scene: scene.clone(),
            renderer: renderer.clone(),
            camera: camera.clone(),
        }));

        self.shared.cancel_requested.store(false, Ordering::Release);
        self.shared.rendering.store(false, Ordering::Release);
        self.shared.chunks_done.store(0, Ordering::Release);
        self.shared.chunks_total.store(0, Ordering::Release);

        info!(
            "Render submitted: {}x{} kernel={} samples={}",
            width, height, renderer.kind, renderer.samples_per_pixel
        );
        self.shared.handshake.signal();
        Ok(())
    }

    /// Ask the current render pass to stop early. The worker stays alive.
    pub fn cancel(&self) {
        if self.is_working() {
            debug!("Render cancel requested");
            self.shared.cancel_requested.store(true, Ordering::Release);
        }
    }

    pub fn is_working(&self) -> bool {
        self.shared.is_working.load(Ordering::Acquire)
    }

    pub fn state(&self) -> JobState {
        if !self.is_working() {
            JobState::Idle
        } else if self.shared.cancel_requested.load(Ordering::Acquire) {
            JobState::Cancelling
        } else if self.shared.rendering.load(Ordering::Acquire) {
            JobState::Rendering
        } else {
            JobState::Queued
        }
    }

    /// Copy the current frame, finished or not, into `surface`.
    ///
    /// Returns false when nothing has been allocated yet.
    pub fn push_partial_update(&self, surface: &mut dyn DisplaySurface) -> bool {
        let Some(frame) = self.frame() else {
            return false;
        };
        let buffer = frame.buffer(surface.format());
        surface.present(buffer.width(), buffer.height(), &buffer.to_bytes());
        true
    }

    /// Current frame buffers, if any job has been submitted.
    pub fn frame(&self) -> Option<Arc<FramePair>> {
        self.shared.current_frame()
    }

    pub fn resolution(&self) -> Option<(u32, u32)> {
        self.frame().map(|f| (f.width(), f.height()))
    }

    pub fn benchmark(&self) -> Benchmark {
        Benchmark {
            render_time: Duration::from_micros(self.shared.render_time_us.load(Ordering::Acquire)),
            save_time: Duration::from_micros(self.shared.save_time_us.load(Ordering::Acquire)),
            stats: self.shared.stats.snapshot(),
        }
    }

    /// Finished and total chunks of the current pass.
    pub fn progress(&self) -> (usize, usize) {
        (
            self.shared.chunks_done.load(Ordering::Acquire),
            self.shared.chunks_total.load(Ordering::Acquire),
        )
    }

    /// Path of the last frame written by the worker.
    pub fn last_saved_path(&self) -> Option<PathBuf> {
        lock(&self.shared.last_saved).clone()
    }

    /// Write the current display buffer to `path` as PNG.
    pub fn save(&self, path: &Path) -> Result<Duration> {
        let frame = self.frame().ok_or(RenderError::NoFrame)?;
        let start = Instant::now();
        frame.bgra.save_png(path)?;
        Ok(start.elapsed())
    }

    /// True if `scene` differs from the last submitted scene.
    pub fn is_world_dirty(&self, scene: &Scene) -> bool {
        self.submitted_hashes()
            .map_or(true, |h| h.scene != scene.content_hash())
    }

    pub fn is_renderer_setting_dirty(&self, renderer: &RendererConfig) -> bool {
        self.submitted_hashes()
            .map_or(true, |h| h.renderer != renderer.content_hash())
    }

    pub fn is_renderer_type_different(&self, renderer: &RendererConfig) -> bool {
        self.submitted_hashes().map_or(true, |h| h.kind != renderer.kind)
    }

    pub fn is_camera_setting_dirty(&self, camera: &CameraConfig) -> bool {
        self.submitted_hashes()
            .map_or(true, |h| h.camera != camera.content_hash())
    }

    fn submitted_hashes(&self) -> Option<SubmittedHashes> {
        *lock(&self.submitted)
    }
}

impl Default for RenderJob {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for RenderJob {
    fn drop(&mut self) {
        self.shared.cancel_requested.store(true, Ordering::Release);
        self.shared.shutdown.store(true, Ordering::Release);
        self.shared.handshake.signal();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

/// Aborts the process if the worker unwinds. A dead worker would leave the
/// job busy forever.
struct AbortOnPanic;

impl Drop for AbortOnPanic {
    fn drop(&mut self) {
        if thread::panicking() {
            error!("Render worker panicked, aborting");
            std::process::abort();
        }
    }
}

impl Shared {
    fn current_frame(&self) -> Option<Arc<FramePair>> {
        self.frame
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn worker_loop(&self) {
        let _guard = AbortOnPanic;
        debug!("Render worker started");
        loop {
            self.handshake.wait();
            if self.shutdown.load(Ordering::Acquire) {
                break;
            }

            let snapshot = lock(&self.snapshot).clone();
            let frame = self.current_frame();
            if let (Some(snapshot), Some(frame)) = (snapshot, frame) {
                self.rendering.store(true, Ordering::Release);
                self.render(&snapshot, &frame);

                if snapshot.renderer.save_output {
                    self.save_output(&snapshot.renderer.output_dir, &frame);
                }
            } else {
                warn!("Render worker woken without a job");
            }

            self.rendering.store(false, Ordering::Release);
            self.is_working.store(false, Ordering::Release);
        }
        debug!("Render worker stopped");
    }

    fn render(&self, snapshot: &JobSnapshot, frame: &FramePair) {
        self.stats.reset();
        self.chunks_done.store(0, Ordering::Release);
        let start = Instant::now();

        let config = &snapshot.renderer;
        let (width, height) = (frame.width(), frame.height());
        let camera = Camera::new(&snapshot.camera);
        let kernel = kernel::kernel_for(&snapshot.scene, config);
        let pass = self.pass.fetch_add(1, Ordering::Relaxed);

        let threads = thread::available_parallelism().map_or(1, |n| n.get()) as u32;
        let chunks = generate_chunks(
            kernel::chunk_strategy(config.kind),
            threads.saturating_mul(config.chunks_per_thread),
            width,
            height,
        );
        self.chunks_total.store(chunks.len(), Ordering::Release);

        chunks.par_iter().for_each(|chunk| {
            self.render_chunk(chunk, kernel.as_ref(), &camera, config, frame, pass);
        });

        let elapsed = start.elapsed();
        self.render_time_us
            .store(elapsed.as_micros() as u64, Ordering::Release);

        let stats = self.stats.snapshot();
        if self.cancel_requested.load(Ordering::Acquire) {
            info!("Render cancelled after {:.2?}", elapsed);
        } else {
            info!(
                "Render finished in {:.2?}: {} rays, {} triangle tests, {} box tests",
                elapsed, stats.rays, stats.ray_triangle_tests, stats.ray_box_tests
            );
        }
    }

    fn render_chunk(
        &self,
        chunk: &Chunk,
        kernel: &dyn PixelKernel,
        camera: &Camera,
        config: &RendererConfig,
        frame: &FramePair,
        pass: u32,
    ) {
        debug!(
            "Thread={:?} Chunk={} size={}x{}",
            thread::current().id(),
            chunk.id,
            chunk.size_x,
            chunk.size_y
        );

        let (width, height) = (frame.width(), frame.height());
        let mut stats = RayStats::default();
        let mut cached = self
            .random
            .sampler(pcg_hash(chunk.id as u32 ^ pass.rotate_left(16)));

        let mut completed = true;
        for (x, y) in chunk.pixels() {
            if self.cancel_requested.load(Ordering::Relaxed) {
                completed = false;
                break;
            }

            let color = match config.sampler {
                SamplerKind::Cached => kernel::render_pixel(
                    kernel,
                    camera,
                    x,
                    y,
                    width,
                    height,
                    config.samples_per_pixel,
                    &mut cached,
                    &mut stats,
                ),
                SamplerKind::Pcg => {
                    let seed = (y * width + x).wrapping_add(pass.wrapping_mul(0x9e37_79b9));
                    kernel::render_pixel(
                        kernel,
                        camera,
                        x,
                        y,
                        width,
                        height,
                        config.samples_per_pixel,
                        &mut PcgSampler::new(seed),
                        &mut stats,
                    )
                }
            };
            frame.write(x, y, color);
        }

        self.stats.add(&stats);
        if completed {
            self.chunks_done.fetch_add(1, Ordering::AcqRel);
        }
    }

    fn save_output(&self, output_dir: &Path, frame: &FramePair) {
        if self.cancel_requested.load(Ordering::Acquire) {
            debug!("Skipping save of a cancelled render");
            return;
        }

        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_millis());
        let path = output_dir.join(format!("render_{millis}.png"));

        let start = Instant::now();
        match frame.bgra.save_png(&path) {
            Ok(()) => {
                let elapsed = start.elapsed();
                self.save_time_us
                    .store(elapsed.as_micros() as u64, Ordering::Release);
                info!("Saved {} in {:.2?}", path.display(), elapsed);
                *lock(&self.last_saved) = Some(path);
            }
            Err(e) => error!("Failed to save {}: {}", path.display(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{MemorySurface, PixelFormat};
    use crate::{Color, Material, MeshData, Sphere, StaticMesh};
    use lumen_math::Vec3;

    const MAX_POLLS: usize = 2000;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn test_job() -> RenderJob {
        init_logger();
        RenderJob::with_random_cache(RandomCache::with_sizes(7, 10_000, 1_000))
    }

    fn test_scene() -> Scene {
        let mut scene = Scene::new("job");
        scene.add(
            StaticMesh::new(
                Arc::new(MeshData::quad("floor")),
                Arc::new(Material::diffuse("floor", Color::splat(0.7))),
            )
            .with_transform(Vec3::new(0.0, -1.0, 0.0), 0.0, 20.0),
        );
        scene.add(Sphere::new(
            Vec3::ZERO,
            1.0,
            Arc::new(Material::diffuse("ball", Color::new(0.8, 0.2, 0.2))),
        ));
        scene.add(Sphere::new(
            Vec3::new(0.0, 5.0, 2.0),
            0.5,
            Arc::new(Material::light("lamp", Color::splat(4.0))),
        ));
        scene
    }

    fn camera() -> CameraConfig {
        CameraConfig::default().with_position(Vec3::new(0.0, 1.0, 6.0), Vec3::ZERO, Vec3::Y)
    }

    fn config(width: u32, height: u32) -> RendererConfig {
        RendererConfig::default()
            .with_resolution(width, height)
            .with_samples(1)
    }

    /// Poll like a UI loop would; true if the job went idle in time.
    fn wait_idle(job: &RenderJob) -> bool {
        for _ in 0..MAX_POLLS {
            if !job.is_working() {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        false
    }

    #[test]
    fn test_render_completes_and_fills_frame() {
        let job = test_job();
        let scene = test_scene();
        job.submit(&scene, &config(64, 48), &camera()).unwrap();
        assert!(wait_idle(&job));
        assert_eq!(job.state(), JobState::Idle);

        let frame = job.frame().unwrap();
        assert_eq!((frame.width(), frame.height()), (64, 48));
        for y in 0..48 {
            for x in 0..64 {
                assert_eq!(frame.rgba.get_pixel(x, y)[3], 255, "pixel ({x}, {y}) not written");
            }
        }

        let (done, total) = job.progress();
        assert_eq!(done, total);
        assert!(total > 0);

        let bench = job.benchmark();
        assert!(bench.stats.rays >= 64 * 48);
        assert!(bench.stats.ray_box_tests > 0);
    }

    #[test]
    fn test_push_partial_update_copies_display_order() {
        let job = test_job();
        let mut surface = MemorySurface::new(PixelFormat::Bgra);
        assert!(!job.push_partial_update(&mut surface));

        job.submit(&test_scene(), &config(32, 16), &camera()).unwrap();
        assert!(wait_idle(&job));
        assert!(job.push_partial_update(&mut surface));

        assert_eq!((surface.width, surface.height), (32, 16));
        assert_eq!(surface.pixels.len(), 32 * 16 * 4);
        let frame = job.frame().unwrap();
        assert_eq!(surface.pixel(5, 7), frame.bgra.get_pixel(5, 7));
    }

    #[test]
    fn test_submit_while_busy_is_rejected() {
        let job = test_job();
        let scene = test_scene();
        let heavy = config(640, 480)
            .with_kind(RendererKind::Reference)
            .with_samples(64);

        job.submit(&scene, &heavy, &camera()).unwrap();
        let frame = job.frame().unwrap();

        let other = config(16, 16);
        assert_eq!(job.submit(&scene, &other, &camera()), Err(SubmitError::Busy));
        // The rejected submission did not touch the buffers
        assert!(Arc::ptr_eq(&frame, &job.frame().unwrap()));

        job.cancel();
        assert!(wait_idle(&job));
    }

    #[test]
    fn test_degenerate_resolution_is_rejected() {
        let job = test_job();
        let result = job.submit(&test_scene(), &config(0, 600), &camera());
        assert_eq!(
            result,
            Err(SubmitError::DegenerateResolution {
                width: 0,
                height: 600
            })
        );
        assert!(!job.is_working());
        assert!(job.frame().is_none());
    }

    #[test]
    fn test_zero_white_point_is_rejected() {
        let job = test_job();
        let mut settings = config(8, 8);
        settings.white_point = 0.0;
        let result = job.submit(&test_scene(), &settings, &camera());
        assert_eq!(result, Err(SubmitError::InvalidWhitePoint));
        assert!(!job.is_working());
    }

    #[test]
    fn test_cancel_terminates_within_bounded_polls() {
        let job = test_job();
        let heavy = config(800, 600)
            .with_kind(RendererKind::Reference)
            .with_samples(256);

        job.submit(&test_scene(), &heavy, &camera()).unwrap();
        assert!(job.is_working());

        job.cancel();
        assert!(wait_idle(&job), "render did not stop after cancel");

        // Chunks cut short by the cancel are not counted as finished
        let (done, total) = job.progress();
        assert!(total > 0);
        assert!(done < total, "cancelled pass reported {done}/{total} chunks");

        // The worker survives a cancel and accepts the next job
        job.submit(&test_scene(), &config(8, 8), &camera()).unwrap();
        assert!(wait_idle(&job));
    }

    #[test]
    fn test_submit_resets_progress() {
        let job = test_job();
        let scene = test_scene();
        job.submit(&scene, &config(16, 16), &camera()).unwrap();
        assert!(wait_idle(&job));
        let (done, total) = job.progress();
        assert!(total > 0 && done == total);

        let heavy = config(800, 600)
            .with_kind(RendererKind::Reference)
            .with_samples(256);
        job.submit(&scene, &heavy, &camera()).unwrap();
        let (done, _) = job.progress();
        assert_eq!(done, 0);

        job.cancel();
        assert!(wait_idle(&job));
    }

    #[test]
    #[should_panic(expected = "is not finite")]
    fn test_non_finite_material_rejected_before_render() {
        let mut scene = test_scene();
        scene.add(Sphere::new(
            Vec3::new(2.0, 0.0, 0.0),
            0.5,
            Arc::new(Material::diffuse("nan", Color::splat(f32::NAN))),
        ));
    }

    #[test]
    fn test_resolution_change_reallocates() {
        let job = test_job();
        let scene = test_scene();
        let fast = |w, h| config(w, h).with_kind(RendererKind::Normals);

        job.submit(&scene, &fast(800, 600), &camera()).unwrap();
        assert!(wait_idle(&job));
        let old = job.frame().unwrap();

        let mut next = fast(1920, 1080);
        next.reuse_buffer = false;
        job.submit(&scene, &next, &camera()).unwrap();
        assert!(wait_idle(&job));

        let frame = job.frame().unwrap();
        assert!(!Arc::ptr_eq(&old, &frame));
        assert_eq!(job.resolution(), Some((1920, 1080)));
        assert_eq!(frame.rgba.len(), 1920 * 1080);
        // Pixels outside the old bounds were all written by the new pass
        assert_eq!(frame.rgba.get_pixel(1919, 1079)[3], 255);
        assert_eq!(frame.bgra.get_pixel(1000, 700)[3], 255);
    }

    #[test]
    fn test_buffers_reused_at_same_resolution() {
        let job = test_job();
        let scene = test_scene();

        job.submit(&scene, &config(40, 30), &camera()).unwrap();
        assert!(wait_idle(&job));
        let first = job.frame().unwrap();

        job.submit(&scene, &config(40, 30), &camera()).unwrap();
        assert!(wait_idle(&job));
        assert!(Arc::ptr_eq(&first, &job.frame().unwrap()));

        let mut fresh = config(40, 30);
        fresh.reuse_buffer = false;
        job.submit(&scene, &fresh, &camera()).unwrap();
        assert!(wait_idle(&job));
        assert!(!Arc::ptr_eq(&first, &job.frame().unwrap()));
    }

    #[test]
    fn test_dirty_checks() {
        let job = test_job();
        let mut scene = test_scene();
        let renderer = config(16, 16);
        let cam = camera();

        assert!(job.is_world_dirty(&scene));
        job.submit(&scene, &renderer, &cam).unwrap();
        assert!(wait_idle(&job));

        assert!(!job.is_world_dirty(&scene));
        assert!(!job.is_renderer_setting_dirty(&renderer));
        assert!(!job.is_renderer_type_different(&renderer));
        assert!(!job.is_camera_setting_dirty(&cam));

        scene.add(Sphere::new(
            Vec3::X,
            0.2,
            Arc::new(Material::diffuse("extra", Color::ONE)),
        ));
        assert!(job.is_world_dirty(&scene));
        assert!(job.is_renderer_setting_dirty(&renderer.clone().with_samples(9)));
        assert!(job.is_renderer_type_different(&renderer.clone().with_kind(RendererKind::Faces)));
        assert!(!job.is_renderer_setting_dirty(&renderer.clone().with_kind(RendererKind::Faces)));
        assert!(job.is_camera_setting_dirty(&cam.clone().with_fov(20.0)));
    }

    #[test]
    fn test_save_output_writes_png() {
        let job = test_job();
        let dir = std::env::temp_dir().join(format!("lumen_job_{}", std::process::id()));
        let mut renderer = config(24, 12);
        renderer.save_output = true;
        renderer.output_dir = dir.clone();

        job.submit(&test_scene(), &renderer, &camera()).unwrap();
        assert!(wait_idle(&job));

        let path = job.last_saved_path().expect("frame saved");
        assert!(path.starts_with(&dir));
        assert!(path.file_name().unwrap().to_string_lossy().starts_with("render_"));
        let image = image::open(&path).unwrap();
        assert_eq!((image.width(), image.height()), (24, 12));

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_manual_save_without_frame_fails() {
        let job = test_job();
        let err = job.save(Path::new("unused.png")).unwrap_err();
        assert!(matches!(err, RenderError::NoFrame));
    }

    #[test]
    fn test_pcg_sampler_renders() {
        let job = test_job();
        let mut renderer = config(16, 16).with_kind(RendererKind::Reference);
        renderer.sampler = SamplerKind::Pcg;
        job.submit(&test_scene(), &renderer, &camera()).unwrap();
        assert!(wait_idle(&job));
        assert_eq!(job.frame().unwrap().rgba.get_pixel(15, 15)[3], 255);
    }

    #[test]
    fn test_drop_while_rendering_joins() {
        let job = test_job();
        let heavy = config(800, 600)
            .with_kind(RendererKind::Reference)
            .with_samples(256);
        job.submit(&test_scene(), &heavy, &camera()).unwrap();
        drop(job);
    }
}

//! Frame buffers shared between the render worker and the caller.
//!
//! Pixels are packed `u32` atomics: the worker stores them with relaxed
//! ordering while the caller may read at any time. A reader can observe a
//! partially rendered frame but never a torn pixel.

use crate::error::{RenderError, Result};
use crate::Color;
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};

/// Channel order of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// Kernel native order
    Rgba,
    /// Display and export order
    Bgra,
}

impl PixelFormat {
    #[inline]
    fn arrange(self, rgba: [u8; 4]) -> [u8; 4] {
        match self {
            PixelFormat::Rgba => rgba,
            PixelFormat::Bgra => [rgba[2], rgba[1], rgba[0], rgba[3]],
        }
    }
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear colour in [0, 1] to gamma encoded 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let encode = |c: f32| (255.0 * linear_to_gamma(c).clamp(0.0, 1.0)) as u8;
    [encode(color.x), encode(color.y), encode(color.z), 255]
}

/// One image in a fixed channel order.
pub struct FrameBuffer {
    width: u32,
    height: u32,
    format: PixelFormat,
    pixels: Box<[AtomicU32]>,
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

impl FrameBuffer {
    /// Create a buffer filled with transparent black.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        let len = width as usize * height as usize;
        let pixels = (0..len).map(|_| AtomicU32::new(0)).collect();
        Self {
            width,
            height,
            format,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y as usize * self.width as usize + x as usize
    }

    /// Store an RGBA pixel, reordered to this buffer's format.
    #[inline]
    pub fn set_pixel(&self, x: u32, y: u32, rgba: [u8; 4]) {
        let packed = u32::from_ne_bytes(self.format.arrange(rgba));
        self.pixels[self.index(x, y)].store(packed, Ordering::Relaxed);
    }

    /// Pixel bytes in this buffer's channel order.
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.pixels[self.index(x, y)]
            .load(Ordering::Relaxed)
            .to_ne_bytes()
    }

    /// Snapshot of the whole buffer as bytes, 4 per pixel.
    pub fn to_bytes(&self) -> Vec<u8> {
        let words: Vec<u32> = self
            .pixels
            .iter()
            .map(|p| p.load(Ordering::Relaxed))
            .collect();
        bytemuck::cast_slice(&words).to_vec()
    }

    /// Snapshot converted to RGBA order.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        let mut bytes = self.to_bytes();
        if self.format == PixelFormat::Bgra {
            for px in bytes.chunks_exact_mut(4) {
                px.swap(0, 2);
            }
        }
        bytes
    }

    /// Write the buffer as a PNG, creating parent directories.
    pub fn save_png(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| RenderError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        image::save_buffer(
            path,
            &self.to_rgba_bytes(),
            self.width,
            self.height,
            image::ColorType::Rgba8,
        )?;
        Ok(())
    }
}

/// The two output buffers of a job, always the same size.
#[derive(Debug)]
pub struct FramePair {
    pub rgba: FrameBuffer,
    pub bgra: FrameBuffer,
}

impl FramePair {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            rgba: FrameBuffer::new(width, height, PixelFormat::Rgba),
            bgra: FrameBuffer::new(width, height, PixelFormat::Bgra),
        }
    }

    pub fn width(&self) -> u32 {
        self.rgba.width()
    }

    pub fn height(&self) -> u32 {
        self.rgba.height()
    }

    /// Encode `color` and store it in both buffers.
    #[inline]
    pub fn write(&self, x: u32, y: u32, color: Color) {
        let rgba = color_to_rgba(color);
        self.rgba.set_pixel(x, y, rgba);
        self.bgra.set_pixel(x, y, rgba);
    }

    pub fn buffer(&self, format: PixelFormat) -> &FrameBuffer {
        match format {
            PixelFormat::Rgba => &self.rgba,
            PixelFormat::Bgra => &self.bgra,
        }
    }
}

/// Destination for partial frame updates, e.g. a window texture.
pub trait DisplaySurface {
    /// Channel order the surface expects.
    fn format(&self) -> PixelFormat;

    /// Receive a full frame snapshot, 4 bytes per pixel, row-major.
    fn present(&mut self, width: u32, height: u32, pixels: &[u8]);
}

/// In-memory surface keeping the last presented frame.
#[derive(Debug, Clone)]
pub struct MemorySurface {
    pub format: PixelFormat,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
    /// Number of frames presented so far
    pub presents: usize,
}

impl MemorySurface {
    pub fn new(format: PixelFormat) -> Self {
        Self {
            format,
            width: 0,
            height: 0,
            pixels: Vec::new(),
            presents: 0,
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }
}

impl DisplaySurface for MemorySurface {
    fn format(&self) -> PixelFormat {
        self.format
    }

    fn present(&mut self, width: u32, height: u32, pixels: &[u8]) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.extend_from_slice(pixels);
        self.presents += 1;
    }
}

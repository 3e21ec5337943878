//! Renderer configuration.

use crate::error::{RenderError, Result};
use crate::hash;
use crate::tone_mapping::ToneMapper;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Which pixel kernel the job runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RendererKind {
    /// Direct light toward the first light plus a shadow ray
    #[default]
    Preview,
    /// Path traced with diffuse, gloss and refraction bounces
    Reference,
    /// Surface normals as colour
    Normals,
    /// Flat colour per object and face
    Faces,
}

impl RendererKind {
    pub const ALL: [RendererKind; 4] = [
        RendererKind::Preview,
        RendererKind::Reference,
        RendererKind::Normals,
        RendererKind::Faces,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RendererKind::Preview => "preview",
            RendererKind::Reference => "reference",
            RendererKind::Normals => "normals",
            RendererKind::Faces => "faces",
        }
    }
}

impl fmt::Display for RendererKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RendererKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        RendererKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown renderer '{s}'"))
    }
}

/// Source of random numbers used by the kernels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplerKind {
    /// Ring buffers built once per renderer
    #[default]
    Cached,
    /// Hash stream per pixel, no shared state
    Pcg,
}

/// Settings for one render submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    pub kind: RendererKind,
    pub sampler: SamplerKind,
    pub samples_per_pixel: u32,
    pub max_bounces: u32,
    /// Keep the frame buffers between jobs when the resolution is unchanged
    pub reuse_buffer: bool,
    pub resolution_horizontal: u32,
    pub resolution_vertical: u32,
    /// Luminance mapped to pure white by extended Reinhard
    pub white_point: f32,
    /// Overrides the kernel's own tone mapper when set
    pub tone_mapper: Option<ToneMapper>,
    /// Chunks per hardware thread
    pub chunks_per_thread: u32,
    pub save_output: bool,
    pub output_dir: PathBuf,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            kind: RendererKind::default(),
            sampler: SamplerKind::default(),
            samples_per_pixel: 20,
            max_bounces: 7,
            reuse_buffer: true,
            resolution_horizontal: 800,
            resolution_vertical: 600,
            white_point: 1.0,
            tone_mapper: None,
            chunks_per_thread: 32,
            save_output: false,
            output_dir: PathBuf::from("renders"),
        }
    }
}

impl RendererConfig {
    /// Load from a JSON file; missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the kernels cannot render with.
    pub fn validate(&self) -> Result<()> {
        if !(self.white_point > 0.0 && self.white_point.is_finite()) {
            return Err(RenderError::InvalidWhitePoint(self.white_point));
        }
        Ok(())
    }

    pub fn with_kind(mut self, kind: RendererKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.resolution_horizontal = width;
        self.resolution_vertical = height;
        self
    }

    pub fn with_samples(mut self, samples_per_pixel: u32) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self
    }

    pub fn resolution(&self) -> (u32, u32) {
        (self.resolution_horizontal, self.resolution_vertical)
    }

    /// Hash of the settings that change the image, excluding the kernel kind.
    pub fn content_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.sampler.hash(&mut hasher);
        self.samples_per_pixel.hash(&mut hasher);
        self.max_bounces.hash(&mut hasher);
        self.reuse_buffer.hash(&mut hasher);
        self.resolution_horizontal.hash(&mut hasher);
        self.resolution_vertical.hash(&mut hasher);
        hash::hash_f32s(&mut hasher, &[self.white_point]);
        self.tone_mapper.hash(&mut hasher);
        self.chunks_per_thread.hash(&mut hasher);
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RendererConfig::default();
        assert_eq!(config.samples_per_pixel, 20);
        assert_eq!(config.max_bounces, 7);
        assert!(config.reuse_buffer);
        assert_eq!(config.white_point, 1.0);
        assert_eq!(config.chunks_per_thread, 32);
        assert!(!config.save_output);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = RendererConfig::from_json_str(
            r#"{ "kind": "reference", "samples_per_pixel": 4, "resolution_horizontal": 320 }"#,
        )
        .unwrap();
        assert_eq!(config.kind, RendererKind::Reference);
        assert_eq!(config.samples_per_pixel, 4);
        assert_eq!(config.resolution(), (320, 600));
        assert_eq!(config.max_bounces, 7);
    }

    #[test]
    fn test_bad_json_is_config_error() {
        let err = RendererConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, RenderError::Config(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = RendererConfig::from_json_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, RenderError::Io { .. }));
    }

    #[test]
    fn test_non_positive_white_point_rejected() {
        for json in [r#"{ "white_point": 0.0 }"#, r#"{ "white_point": -2.0 }"#] {
            let err = RendererConfig::from_json_str(json).unwrap_err();
            assert!(matches!(err, RenderError::InvalidWhitePoint(_)));
        }
        let config = RendererConfig::from_json_str(r#"{ "white_point": 4.0 }"#).unwrap();
        assert_eq!(config.white_point, 4.0);
    }

    #[test]
    fn test_tone_mapper_from_json() {
        let config =
            RendererConfig::from_json_str(r#"{ "tone_mapper": "reinhard_extended_luminance" }"#)
                .unwrap();
        assert_eq!(config.tone_mapper, Some(ToneMapper::ReinhardExtendedLuminance));
        assert_eq!(RendererConfig::default().tone_mapper, None);
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("Normals".parse::<RendererKind>(), Ok(RendererKind::Normals));
        assert!("raster".parse::<RendererKind>().is_err());
        for kind in RendererKind::ALL {
            assert_eq!(kind.to_string().parse::<RendererKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_hash_ignores_kind() {
        let a = RendererConfig::default();
        let b = a.clone().with_kind(RendererKind::Faces);
        let c = a.clone().with_samples(64);
        assert_eq!(a.content_hash(), b.content_hash());
        assert_ne!(a.content_hash(), c.content_hash());
    }
}

//! Surface material model shared by every kernel.

use lumen_math::Vec3;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Color type alias (linear RGB, unbounded above while accumulating)
pub type Color = Vec3;

/// Material properties of a surface.
///
/// A surface responds to a shading event with at most one of: diffuse bounce,
/// glossy reflection (probability `gloss_probability`) or refraction
/// (probability `refraction_probability`). A non-zero `emitted_color` makes
/// the surface a light source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    pub name: String,
    /// Diffuse/albedo color
    pub color: Color,
    pub emitted_color: Color,
    pub gloss_color: Color,
    pub gloss_probability: f32,
    /// 0 = fully diffuse bounce direction, 1 = perfect mirror
    pub smoothness: f32,
    pub refraction_probability: f32,
    pub refraction_index: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: String::new(),
            color: Color::splat(0.5),
            emitted_color: Color::ZERO,
            gloss_color: Color::ONE,
            gloss_probability: 0.0,
            smoothness: 0.0,
            refraction_probability: 0.0,
            refraction_index: 1.0,
        }
    }
}

impl Material {
    /// Plain diffuse material.
    pub fn diffuse(name: impl Into<String>, color: Color) -> Self {
        Self {
            name: name.into(),
            color,
            ..Default::default()
        }
    }

    /// Emissive material, treated as a light by the kernels.
    pub fn light(name: impl Into<String>, emitted_color: Color) -> Self {
        Self {
            name: name.into(),
            color: Color::ONE,
            emitted_color,
            ..Default::default()
        }
    }

    /// Diffuse base with a specular lobe picked with `probability`.
    pub fn glossy(
        name: impl Into<String>,
        color: Color,
        gloss_color: Color,
        probability: f32,
        smoothness: f32,
    ) -> Self {
        Self {
            name: name.into(),
            color,
            gloss_color,
            gloss_probability: probability,
            smoothness,
            ..Default::default()
        }
    }

    /// Dielectric, refracting with `probability`.
    pub fn glass(name: impl Into<String>, color: Color, probability: f32, ior: f32) -> Self {
        Self {
            name: name.into(),
            color,
            smoothness: 1.0,
            refraction_probability: probability,
            refraction_index: ior,
            ..Default::default()
        }
    }

    /// True if the material emits light.
    #[inline]
    pub fn is_light(&self) -> bool {
        self.emitted_color != Color::ZERO
    }

    /// Panics when a probability lies outside [0, 1] or a colour is not finite.
    ///
    /// Materials are validated when attached to a hittable, never inside the
    /// render loop.
    pub fn assert_valid(&self) {
        for (label, p) in [
            ("gloss_probability", self.gloss_probability),
            ("refraction_probability", self.refraction_probability),
            ("smoothness", self.smoothness),
        ] {
            assert!(
                (0.0..=1.0).contains(&p),
                "material '{}': {} = {} is outside [0, 1]",
                self.name,
                label,
                p
            );
        }
        for (label, c) in [
            ("color", self.color),
            ("emitted_color", self.emitted_color),
            ("gloss_color", self.gloss_color),
        ] {
            assert!(
                c.is_finite(),
                "material '{}': {} = {} is not finite",
                self.name,
                label,
                c
            );
        }
        assert!(
            self.refraction_index > 0.0,
            "material '{}': refraction_index must be positive",
            self.name
        );
    }
}

impl Hash for Material {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        crate::hash::hash_vec3(state, self.color);
        crate::hash::hash_vec3(state, self.emitted_color);
        crate::hash::hash_vec3(state, self.gloss_color);
        crate::hash::hash_f32s(
            state,
            &[
                self.gloss_probability,
                self.smoothness,
                self.refraction_probability,
                self.refraction_index,
            ],
        );
    }
}

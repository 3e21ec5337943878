//! Scalar and vector helpers shared by the shading kernels.

use crate::Vec3;

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a vector through a surface (Snell's law).
///
/// `uv` must be unit length, `n` faces against `uv`.
#[inline]
pub fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

/// Schlick's approximation for reflectance at a dielectric boundary.
#[inline]
pub fn reflectance(cosine: f32, ior: f32) -> f32 {
    let r0 = ((1.0 - ior) / (1.0 + ior)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}

/// Hermite interpolation between `a` and `b`, clamped to [0, 1].
#[inline]
pub fn smoothstep(a: f32, b: f32, x: f32) -> f32 {
    let t = ((x - a) / (b - a)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[inline]
pub fn lerp(a: Vec3, b: Vec3, f: f32) -> Vec3 {
    a + (b - a) * f
}

/// Orient a geometric normal against the incoming ray.
///
/// Returns `(normal, front_face)`. `front_face` is true when the ray enters
/// from outside, i.e. `dot(direction, outward_normal) < 0`.
#[inline]
pub fn face_normal(direction: Vec3, outward_normal: Vec3) -> (Vec3, bool) {
    if direction.dot(outward_normal) < 0.0 {
        (outward_normal, true)
    } else {
        (-outward_normal, false)
    }
}

/// Spherical UV of a point on a sphere centred at the origin.
///
/// u: angle around the Y axis from X=-1, v: angle from Y=-1 to Y=+1.
pub fn sphere_uv(p: Vec3) -> (f32, f32) {
    use std::f32::consts::PI;

    let p = p.normalize_or_zero();
    let theta = (-p.y).clamp(-1.0, 1.0).acos();
    let phi = (-p.z).atan2(p.x) + PI;
    (phi / (2.0 * PI), theta / PI)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflect() {
        let r = reflect(Vec3::new(1.0, -1.0, 0.0), Vec3::Y);
        assert_eq!(r, Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_refract_straight_through() {
        let r = refract(Vec3::new(0.0, -1.0, 0.0), Vec3::Y, 1.0 / 1.5);
        assert!((r - Vec3::new(0.0, -1.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_reflectance_bounds() {
        let r0 = ((1.0f32 - 1.5) / (1.0 + 1.5)).powi(2);
        assert!((reflectance(1.0, 1.5) - r0).abs() < 1e-6);
        assert!((reflectance(0.0, 1.5) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_smoothstep() {
        assert_eq!(smoothstep(0.0, 1.0, -1.0), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
        assert!((smoothstep(0.0, 1.0, 0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_face_normal_orientation() {
        let (n, front) = face_normal(Vec3::new(0.0, 0.0, -1.0), Vec3::Z);
        assert!(front);
        assert_eq!(n, Vec3::Z);

        let (n, front) = face_normal(Vec3::new(0.0, 0.0, 1.0), Vec3::Z);
        assert!(!front);
        assert_eq!(n, -Vec3::Z);
    }

    #[test]
    fn test_sphere_uv_reference_points() {
        let (u, v) = sphere_uv(Vec3::X);
        assert!((u - 0.5).abs() < 1e-5 && (v - 0.5).abs() < 1e-5);

        let (u, v) = sphere_uv(Vec3::Z);
        assert!((u - 0.25).abs() < 1e-5 && (v - 0.5).abs() < 1e-5);

        let (_, v) = sphere_uv(Vec3::Y);
        assert!((v - 1.0).abs() < 1e-5);
    }
}

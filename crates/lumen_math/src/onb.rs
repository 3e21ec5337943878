use crate::Vec3;

/// Orthonormal basis with `w` as the local +Z axis.
#[derive(Debug, Clone, Copy)]
pub struct Onb {
    pub u: Vec3,
    pub v: Vec3,
    pub w: Vec3,
}

impl Onb {
    /// Build a basis whose `w` axis points along `n`.
    pub fn from_w(n: Vec3) -> Self {
        let w = n.normalize();
        let a = if w.x.abs() > 0.9 { Vec3::Y } else { Vec3::X };
        let v = w.cross(a).normalize();
        let u = w.cross(v);
        Self { u, v, w }
    }

    /// Transform a vector expressed in this basis into world space.
    #[inline]
    pub fn local(&self, a: Vec3) -> Vec3 {
        a.x * self.u + a.y * self.v + a.z * self.w
    }
}

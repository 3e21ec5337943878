//! Content hashing for change detection between render submissions.

use lumen_math::Vec3;
use std::hash::{Hash, Hasher};

pub fn hash_f32s<H: Hasher>(state: &mut H, values: &[f32]) {
    for v in values {
        v.to_bits().hash(state);
    }
}

pub fn hash_vec3<H: Hasher>(state: &mut H, v: Vec3) {
    hash_f32s(state, &[v.x, v.y, v.z]);
}

/// 64 bit hash of any hashable value.
#[cfg(test)]
pub fn hash_of<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

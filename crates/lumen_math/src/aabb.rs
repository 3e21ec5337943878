use crate::{Interval, Ray, Vec3};

/// Axis-aligned bounding box used to reject rays before exact primitive tests.
///
/// An AABB is defined by three intervals (one per axis) that bound a 3D volume.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Create an AABB from two corner points, in any order.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        let x = Interval::new(a.x.min(b.x), a.x.max(b.x));
        let y = Interval::new(a.y.min(b.y), a.y.max(b.y));
        let z = Interval::new(a.z.min(b.z), a.z.max(b.z));

        let mut aabb = Self { x, y, z };
        aabb.pad_to_minimums();
        aabb
    }

    /// Smallest box containing every point, or [`Aabb::EMPTY`] for no points.
    pub fn from_iter_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut iter = points.into_iter();
        let Some(first) = iter.next() else {
            return Aabb::EMPTY;
        };
        let (min, max) = iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Aabb::from_points(min, max)
    }

    /// Union of two boxes: component-wise min of minima, max of maxima.
    pub fn merge(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            x: Interval::surrounding(&box0.x, &box1.x),
            y: Interval::surrounding(&box0.y, &box1.y),
            z: Interval::surrounding(&box0.z, &box1.z),
        }
    }

    /// Minimum corner.
    pub fn min(&self) -> Vec3 {
        Vec3::new(self.x.min, self.y.min, self.z.min)
    }

    /// Maximum corner.
    pub fn max(&self) -> Vec3 {
        Vec3::new(self.x.max, self.y.max, self.z.max)
    }

    /// True when the box bounds nothing.
    pub fn is_empty(&self) -> bool {
        self.x.min > self.x.max || self.y.min > self.y.max || self.z.min > self.z.max
    }

    /// Get the interval for a specific axis (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Test if a ray intersects this AABB within the given interval.
    ///
    /// Slab method. A zero direction component yields an infinite inverse,
    /// which the min/max comparisons below handle.
    pub fn hit(&self, r: &Ray, mut ray_t: Interval) -> bool {
        if self.is_empty() {
            return false;
        }

        for axis in 0..3 {
            let slab = self.axis_interval(axis);
            let origin = r.origin[axis];
            let adinv = 1.0 / r.direction[axis];

            let mut t0 = (slab.min - origin) * adinv;
            let mut t1 = (slab.max - origin) * adinv;
            if adinv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            ray_t.min = t0.max(ray_t.min);
            ray_t.max = t1.min(ray_t.max);
            if ray_t.max <= ray_t.min {
                return false;
            }
        }

        true
    }

    /// Pad intervals to avoid zero-width AABBs (degenerate cases).
    fn pad_to_minimums(&mut self) {
        let delta = 0.0001;
        if self.x.size() < delta {
            self.x = self.x.expand(delta);
        }
        if self.y.size() < delta {
            self.y = self.y.expand(delta);
        }
        if self.z.size() < delta {
            self.z = self.z.expand(delta);
        }
    }

    /// Returns the center point of the bounding box.
    pub fn centroid(&self) -> Vec3 {
        (self.min() + self.max()) * 0.5
    }

    /// Half of the box size along each axis.
    pub fn extent(&self) -> Vec3 {
        (self.max() - self.min()) * 0.5
    }

    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };
}

impl Default for Aabb {
    fn default() -> Self {
        Aabb::EMPTY
    }
}

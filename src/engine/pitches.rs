use crate::engine::domain::{Domain, Point, MAX_RANK};

/// Row-major strides for a rectangular iteration domain (last axis varies
/// fastest). Maps between flat scan indices in `[0, volume)` and the
/// D-dimensional coordinates of the domain. Derived per invocation, never
/// mutated.
#[derive(Clone, Copy, Debug)]
pub struct Pitches {
    pitch: [usize; MAX_RANK],
    rank: usize,
}

impl Pitches {
    pub fn from_domain(domain: &Domain) -> Pitches {
        let rank = domain.rank();
        let mut pitch = [0usize; MAX_RANK];
        let mut acc = 1usize;
        for axis in (0..rank).rev() {
            pitch[axis] = acc;
            acc *= domain.extent(axis) as usize;
        }
        Pitches { pitch, rank }
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Coordinate of the `flat`-th element of the domain in row-major scan
    /// order. Callers must never pass `flat >= volume`.
    pub fn unflatten(&self, flat: usize, lo: Point) -> Point {
        let mut coords = [0i64; MAX_RANK];
        let mut rem = flat;
        for axis in 0..self.rank {
            coords[axis] = lo[axis] + (rem / self.pitch[axis]) as i64;
            rem %= self.pitch[axis];
        }
        Point::from_parts(coords, self.rank)
    }

    /// Flat scan index of coordinate `p` relative to the domain origin `lo`.
    pub fn flatten(&self, p: Point, lo: Point) -> usize {
        let mut flat = 0usize;
        for axis in 0..self.rank {
            flat += (p[axis] - lo[axis]) as usize * self.pitch[axis];
        }
        flat
    }
}

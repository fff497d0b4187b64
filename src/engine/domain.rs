use std::fmt;
use std::ops::Deref;

/// Largest rank the engine supports. Coordinates carry their rank at runtime
/// but store components inline so they stay `Copy` and allocation free.
pub const MAX_RANK: usize = 8;

/// A D-dimensional integer coordinate. Rank 0 is a valid scalar coordinate.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    coords: [i64; MAX_RANK],
    rank: usize,
}

impl Point {
    pub fn new(coords: &[i64]) -> Point {
        assert!(
            coords.len() <= MAX_RANK,
            "rank {} exceeds MAX_RANK {}",
            coords.len(),
            MAX_RANK
        );
        let mut cs = [0i64; MAX_RANK];
        cs[..coords.len()].copy_from_slice(coords);
        Point {
            coords: cs,
            rank: coords.len(),
        }
    }

    pub fn zero(rank: usize) -> Point {
        Point::new(&vec![0; rank])
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn as_slice(&self) -> &[i64] {
        &self.coords[..self.rank]
    }

    pub(crate) fn from_parts(coords: [i64; MAX_RANK], rank: usize) -> Point {
        Point { coords, rank }
    }
}

impl Deref for Point {
    type Target = [i64];

    fn deref(&self) -> &[i64] {
        self.as_slice()
    }
}

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Point{:?}", self.as_slice())
    }
}

/// Axis-aligned rectangular iteration domain with inclusive bounds.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Domain {
    lo: Point,
    hi: Point,
}

impl Domain {
    pub fn new(lo: Point, hi: Point) -> Domain {
        assert_eq!(lo.rank(), hi.rank(), "domain bounds must have equal rank");
        Domain { lo, hi }
    }

    /// Domain spanning `[0, extent)` on each axis.
    pub fn from_shape(shape: &[i64]) -> Domain {
        let lo = Point::zero(shape.len());
        let hi = Point::new(&shape.iter().map(|&e| e - 1).collect::<Vec<i64>>());
        Domain { lo, hi }
    }

    pub fn rank(&self) -> usize {
        self.lo.rank()
    }

    pub fn lo(&self) -> Point {
        self.lo
    }

    pub fn hi(&self) -> Point {
        self.hi
    }

    /// Extent along `axis`, 0 if the axis is empty.
    pub fn extent(&self, axis: usize) -> i64 {
        (self.hi[axis] - self.lo[axis] + 1).max(0)
    }

    /// Number of coordinates in the domain. The empty product makes a rank-0
    /// domain a single scalar coordinate with volume 1.
    pub fn volume(&self) -> usize {
        let mut volume = 1usize;
        for axis in 0..self.rank() {
            volume *= self.extent(axis) as usize;
        }
        volume
    }

    pub fn contains(&self, p: Point) -> bool {
        p.rank() == self.rank()
            && (0..self.rank()).all(|k| self.lo[k] <= p[k] && p[k] <= self.hi[k])
    }
}

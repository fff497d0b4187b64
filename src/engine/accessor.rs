use num::PrimInt;

use crate::engine::domain::{Domain, Point};
use crate::engine::pitches::Pitches;

/// Read-only view over source array elements, addressed by coordinate.
/// Shared across workers, so implementations must be safe to read
/// concurrently.
pub trait ValueAccessor<T>: Sync {
    fn value_at(&self, p: Point) -> T;
}

/// Read-only view over selection flags, addressed by coordinate.
pub trait MaskAccessor: Sync {
    fn is_set(&self, p: Point) -> bool;
}

/// Dense row-major slice backing a value accessor.
#[derive(Clone, Copy)]
pub struct DenseValues<'a, T> {
    data: &'a [T],
    pitches: Pitches,
    lo: Point,
}

impl<'a, T> DenseValues<'a, T> {
    pub fn new(data: &'a [T], domain: &Domain) -> DenseValues<'a, T> {
        debug_assert_eq!(data.len(), domain.volume());
        DenseValues {
            data,
            pitches: Pitches::from_domain(domain),
            lo: domain.lo(),
        }
    }
}

impl<T: Copy + Sync> ValueAccessor<T> for DenseValues<'_, T> {
    fn value_at(&self, p: Point) -> T {
        self.data[self.pitches.flatten(p, self.lo)]
    }
}

/// Dense row-major slice of integer flags backing a mask accessor. Any
/// nonzero flag selects the element.
#[derive(Clone, Copy)]
pub struct DenseMask<'a, M> {
    data: &'a [M],
    pitches: Pitches,
    lo: Point,
}

impl<'a, M> DenseMask<'a, M> {
    pub fn new(data: &'a [M], domain: &Domain) -> DenseMask<'a, M> {
        debug_assert_eq!(data.len(), domain.volume());
        DenseMask {
            data,
            pitches: Pitches::from_domain(domain),
            lo: domain.lo(),
        }
    }
}

impl<M: PrimInt + Sync> MaskAccessor for DenseMask<'_, M> {
    fn is_set(&self, p: Point) -> bool {
        self.data[self.pitches.flatten(p, self.lo)] > M::zero()
    }
}

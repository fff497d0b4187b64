use std::mem;
use std::ops::Range;

use scoped_threadpool::Pool;

use crate::engine::accessor::{MaskAccessor, ValueAccessor};
use crate::engine::domain::Domain;
use crate::engine::pitches::Pitches;
use crate::errors::CompactError;

/// Densely packed coordinate tuples, one row of `rank` integers per selected
/// element, in row-major scan order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoordBuffer {
    data: Vec<i64>,
    rank: usize,
    len: usize,
}

impl CoordBuffer {
    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn coord(&self, i: usize) -> &[i64] {
        &self.data[i * self.rank..(i + 1) * self.rank]
    }

    pub fn iter(&self) -> impl Iterator<Item = &[i64]> {
        (0..self.len).map(move |i| self.coord(i))
    }
}

/// Extracts the input elements selected by the mask into a newly allocated,
/// exactly sized buffer, preserving row-major scan order. The mask and input
/// domains may differ in rank but must have equal volume.
pub fn compact_values<T, A, M>(
    input: &A,
    mask: &M,
    input_domain: &Domain,
    mask_domain: &Domain,
    pool: &mut Pool,
) -> Result<(Vec<T>, usize), CompactError>
where
    T: Copy + Default + Send,
    A: ValueAccessor<T>,
    M: MaskAccessor,
{
    debug_assert_eq!(
        mask_domain.volume(),
        input_domain.volume(),
        "mask and input domains must flatten to the same volume"
    );
    let volume = mask_domain.volume();
    let spans = spans(volume, pool.thread_count() as usize);
    let mask_pitches = Pitches::from_domain(mask_domain);
    let mask_lo = mask_domain.lo();
    let input_pitches = Pitches::from_domain(input_domain);
    let input_lo = input_domain.lo();

    let counts = count_phase(mask, &mask_pitches, mask_domain, &spans, pool);
    let (offsets, total) = exclusive_scan(&counts);
    debug!(
        "compacting {} of {} elements across {} workers",
        total,
        volume,
        spans.len()
    );
    trace!("per-worker counts {:?}, write offsets {:?}", counts, offsets);

    let mut out: Vec<T> = Vec::new();
    out.try_reserve_exact(total)
        .map_err(|source| CompactError::OutputAlloc {
            elements: total,
            source,
        })?;
    out.resize(total, T::default());

    pool.scoped(|scope| {
        let mut rest = out.as_mut_slice();
        for (span, &count) in spans.iter().cloned().zip(&counts) {
            // carving counts left to right is the exclusive scan: worker w's
            // region starts at offsets[w]
            let (region, tail) = mem::take(&mut rest).split_at_mut(count);
            rest = tail;
            scope.execute(move || {
                let mut cursor = 0;
                for idx in span {
                    if mask.is_set(mask_pitches.unflatten(idx, mask_lo)) {
                        region[cursor] = input.value_at(input_pitches.unflatten(idx, input_lo));
                        cursor += 1;
                    }
                }
                debug_assert_eq!(cursor, region.len());
            });
        }
    });

    Ok((out, total))
}

/// Extracts the input-domain coordinates of the elements selected by the
/// mask, in row-major scan order.
pub fn compact_coords<M>(
    mask: &M,
    input_domain: &Domain,
    mask_domain: &Domain,
    pool: &mut Pool,
) -> Result<(CoordBuffer, usize), CompactError>
where
    M: MaskAccessor,
{
    debug_assert_eq!(
        mask_domain.volume(),
        input_domain.volume(),
        "mask and input domains must flatten to the same volume"
    );
    let volume = mask_domain.volume();
    let rank = input_domain.rank();
    let spans = spans(volume, pool.thread_count() as usize);
    let mask_pitches = Pitches::from_domain(mask_domain);
    let mask_lo = mask_domain.lo();
    let input_pitches = Pitches::from_domain(input_domain);
    let input_lo = input_domain.lo();

    let counts = count_phase(mask, &mask_pitches, mask_domain, &spans, pool);
    let (offsets, total) = exclusive_scan(&counts);
    debug!(
        "extracting {} of {} coordinates across {} workers",
        total,
        volume,
        spans.len()
    );
    trace!("per-worker counts {:?}, write offsets {:?}", counts, offsets);

    let mut data: Vec<i64> = Vec::new();
    data.try_reserve_exact(total * rank)
        .map_err(|source| CompactError::OutputAlloc {
            elements: total,
            source,
        })?;
    data.resize(total * rank, 0);

    pool.scoped(|scope| {
        let mut rest = data.as_mut_slice();
        for (span, &count) in spans.iter().cloned().zip(&counts) {
            // carving counts left to right is the exclusive scan, scaled by rank
            let (region, tail) = mem::take(&mut rest).split_at_mut(count * rank);
            rest = tail;
            scope.execute(move || {
                let mut cursor = 0;
                for idx in span {
                    if mask.is_set(mask_pitches.unflatten(idx, mask_lo)) {
                        let p = input_pitches.unflatten(idx, input_lo);
                        region[cursor..cursor + rank].copy_from_slice(p.as_slice());
                        cursor += rank;
                    }
                }
                debug_assert_eq!(cursor, region.len());
            });
        }
    });

    Ok((
        CoordBuffer {
            data,
            rank,
            len: total,
        },
        total,
    ))
}

/// Coordinates of all selected mask entries, i.e. coordinate-mode compaction
/// of the mask against itself.
pub fn nonzero<M>(
    mask: &M,
    mask_domain: &Domain,
    pool: &mut Pool,
) -> Result<(CoordBuffer, usize), CompactError>
where
    M: MaskAccessor,
{
    compact_coords(mask, mask_domain, mask_domain, pool)
}

/// Phase 1: each worker counts the selected elements of its span. Counters
/// are disjoint so no synchronization is needed.
fn count_phase<M: MaskAccessor>(
    mask: &M,
    pitches: &Pitches,
    mask_domain: &Domain,
    spans: &[Range<usize>],
    pool: &mut Pool,
) -> Vec<usize> {
    let mut counts = vec![0usize; spans.len()];
    let lo = mask_domain.lo();
    let pitches = *pitches;
    pool.scoped(|scope| {
        for (span, count) in spans.iter().cloned().zip(counts.iter_mut()) {
            scope.execute(move || {
                let mut selected = 0usize;
                for idx in span {
                    if mask.is_set(pitches.unflatten(idx, lo)) {
                        selected += 1;
                    }
                }
                *count = selected;
            });
        }
    });
    counts
}

/// Phase 2: grand total and exclusive prefix sum of the per-worker counts.
/// The offsets fix each worker's contiguous write region, which is what
/// preserves scan order across parallel writes.
fn exclusive_scan(counts: &[usize]) -> (Vec<usize>, usize) {
    let mut offsets = Vec::with_capacity(counts.len());
    let mut total = 0usize;
    for &count in counts {
        offsets.push(total);
        total += count;
    }
    (offsets, total)
}

/// Static contiguous partition of `[0, volume)` into `workers` spans.
/// Deterministic: phases 1 and 3 recompute the identical partition instead of
/// caching per-element selection bits.
fn spans(volume: usize, workers: usize) -> Vec<Range<usize>> {
    let workers = workers.max(1);
    let chunk = volume / workers;
    let rem = volume % workers;
    let mut spans = Vec::with_capacity(workers);
    let mut start = 0;
    for w in 0..workers {
        let len = chunk + usize::from(w < rem);
        spans.push(start..start + len);
        start += len;
    }
    spans
}

use std::sync::Arc;

use futures::executor::block_on;
use pretty_assertions::assert_eq;
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;
use scoped_threadpool::Pool;

use maskpack::*;

fn compact_dense_values(
    input: &[i64],
    mask: &[u8],
    input_domain: &Domain,
    mask_domain: &Domain,
    threads: u32,
) -> (Vec<i64>, usize) {
    let _ = env_logger::try_init();
    let input = DenseValues::new(input, input_domain);
    let mask = DenseMask::new(mask, mask_domain);
    let mut pool = Pool::new(threads);
    compact_values(&input, &mask, input_domain, mask_domain, &mut pool).unwrap()
}

fn compact_dense_coords(
    mask: &[u8],
    input_domain: &Domain,
    mask_domain: &Domain,
    threads: u32,
) -> (CoordBuffer, usize) {
    let _ = env_logger::try_init();
    let mask = DenseMask::new(mask, mask_domain);
    let mut pool = Pool::new(threads);
    compact_coords(&mask, input_domain, mask_domain, &mut pool).unwrap()
}

#[test]
fn test_1d_value_mode() {
    let domain = Domain::from_shape(&[4]);
    let (values, count) =
        compact_dense_values(&[10, 20, 30, 40], &[1, 0, 1, 1], &domain, &domain, 2);
    assert_eq!(count, 3);
    assert_eq!(values, vec![10, 30, 40]);
}

#[test]
fn test_1d_coordinate_mode() {
    let domain = Domain::from_shape(&[4]);
    let (coords, count) = compact_dense_coords(&[1, 0, 1, 1], &domain, &domain, 2);
    assert_eq!(count, 3);
    assert_eq!(coords.rank(), 1);
    assert_eq!(
        coords.iter().collect::<Vec<&[i64]>>(),
        vec![&[0i64][..], &[2][..], &[3][..]]
    );
}

#[test]
fn test_all_false_mask() {
    let domain = Domain::from_shape(&[6]);
    let (values, count) =
        compact_dense_values(&[1, 2, 3, 4, 5, 6], &[0; 6], &domain, &domain, 3);
    assert_eq!(count, 0);
    assert!(values.is_empty());
    let (coords, count) = compact_dense_coords(&[0; 6], &domain, &domain, 3);
    assert_eq!(count, 0);
    assert!(coords.is_empty());
}

#[test]
fn test_all_true_mask_equals_flattened_input() {
    let domain = Domain::from_shape(&[2, 3]);
    let input: Vec<i64> = (0..6).map(|i| i * 100).collect();
    let (values, count) = compact_dense_values(&input, &[1; 6], &domain, &domain, 4);
    assert_eq!(count, domain.volume());
    assert_eq!(values, input);
}

#[test]
fn test_2d_coordinates_row_major_order() {
    // mask selects the corners of a 3x3 domain
    let domain = Domain::from_shape(&[3, 3]);
    let mask = [1, 0, 1, 0, 0, 0, 1, 0, 1];
    let (coords, count) = compact_dense_coords(&mask, &domain, &domain, 2);
    assert_eq!(count, 4);
    assert_eq!(
        coords.iter().collect::<Vec<&[i64]>>(),
        vec![&[0i64, 0][..], &[0, 2][..], &[2, 0][..], &[2, 2][..]]
    );
}

#[test]
fn test_worker_counts_agree_on_size_17() {
    let domain = Domain::from_shape(&[17]);
    let input: Vec<i64> = (0..17).collect();
    let mask: Vec<u8> = (0..17).map(|i| u8::from(i % 3 != 1)).collect();
    let reference = compact_dense_values(&input, &mask, &domain, &domain, 1);
    for workers in [2, 5] {
        let result = compact_dense_values(&input, &mask, &domain, &domain, workers);
        assert_eq!(result, reference);
        let coords = compact_dense_coords(&mask, &domain, &domain, workers);
        assert_eq!(coords, compact_dense_coords(&mask, &domain, &domain, 1));
    }
}

#[test]
fn test_idempotent_across_invocations_and_workers() {
    let domain = Domain::from_shape(&[7, 13]);
    let mut rng = XorShiftRng::seed_from_u64(1234);
    let input: Vec<i64> = (0..domain.volume() as i64).map(|i| i * 7 - 3).collect();
    let mask: Vec<u8> = (0..domain.volume())
        .map(|_| u8::from(rng.random::<bool>()))
        .collect();
    let expected_count = mask.iter().filter(|&&m| m > 0).count();

    let reference = compact_dense_values(&input, &mask, &domain, &domain, 3);
    assert_eq!(reference.1, expected_count);
    for workers in [1, 2, 3, 8] {
        assert_eq!(
            compact_dense_values(&input, &mask, &domain, &domain, workers),
            reference
        );
        assert_eq!(
            compact_dense_values(&input, &mask, &domain, &domain, workers),
            reference
        );
    }
}

#[test]
fn test_mask_rank_differs_from_input_rank() {
    // 1-D mask over a 2-D input of equal volume
    let input_domain = Domain::from_shape(&[3, 4]);
    let mask_domain = Domain::from_shape(&[12]);
    let input: Vec<i64> = (0..12).collect();
    let mask: Vec<u8> = (0..12).map(|i| u8::from(i % 4 == 0)).collect();
    let (values, count) =
        compact_dense_values(&input, &mask, &input_domain, &mask_domain, 3);
    assert_eq!(count, 3);
    assert_eq!(values, vec![0, 4, 8]);
    // coordinates land in the input domain, not the mask domain
    let (coords, _) = compact_dense_coords(&mask, &input_domain, &mask_domain, 3);
    assert_eq!(
        coords.iter().collect::<Vec<&[i64]>>(),
        vec![&[0i64, 0][..], &[1, 0][..], &[2, 0][..]]
    );
}

#[test]
fn test_nonzero_domain_origin() {
    let domain = Domain::new(Point::new(&[5]), Point::new(&[8]));
    let (coords, count) = compact_dense_coords(&[0, 1, 1, 0], &domain, &domain, 2);
    assert_eq!(count, 2);
    assert_eq!(
        coords.iter().collect::<Vec<&[i64]>>(),
        vec![&[6i64][..], &[7][..]]
    );
}

#[test]
fn test_zero_volume_domain() {
    let domain = Domain::from_shape(&[3, 0]);
    let (values, count) = compact_dense_values(&[], &[], &domain, &domain, 4);
    assert_eq!(count, 0);
    assert!(values.is_empty());
    let (coords, count) = compact_dense_coords(&[], &domain, &domain, 4);
    assert_eq!(count, 0);
    assert!(coords.is_empty());
}

#[test]
fn test_rank_zero_domain() {
    let domain = Domain::from_shape(&[]);
    assert_eq!(domain.volume(), 1);
    let (values, count) = compact_dense_values(&[42], &[1], &domain, &domain, 2);
    assert_eq!(count, 1);
    assert_eq!(values, vec![42]);
    let (coords, count) = compact_dense_coords(&[1], &domain, &domain, 2);
    assert_eq!(count, 1);
    assert_eq!(coords.rank(), 0);
    assert_eq!(coords.coord(0), &[] as &[i64]);
}

#[test]
fn test_nonzero() {
    let _ = env_logger::try_init();
    let domain = Domain::from_shape(&[2, 2]);
    let flags = [0u8, 1, 1, 0];
    let mask = DenseMask::new(&flags, &domain);
    let mut pool = Pool::new(2);
    let (coords, count) = nonzero(&mask, &domain, &mut pool).unwrap();
    assert_eq!(count, 2);
    assert_eq!(
        coords.iter().collect::<Vec<&[i64]>>(),
        vec![&[0i64, 1][..], &[1, 0][..]]
    );
}

#[test]
fn test_engine_facade() {
    let _ = env_logger::try_init();
    let engine = MaskPack::new(&Options { threads: 3 });
    assert_eq!(engine.threads(), 3);
    let domain = Domain::from_shape(&[5]);
    let data = [1i64, 2, 3, 4, 5];
    let flags = [1u8, 1, 0, 0, 1];
    let input = DenseValues::new(&data, &domain);
    let mask = DenseMask::new(&flags, &domain);
    let (values, count) = engine
        .compact_values(&input, &mask, &domain, &domain)
        .unwrap();
    assert_eq!(count, 3);
    assert_eq!(values, vec![1, 2, 5]);
    let (coords, count) = engine.compact_coords(&mask, &domain, &domain).unwrap();
    assert_eq!(count, 3);
    assert_eq!(
        coords.iter().collect::<Vec<&[i64]>>(),
        vec![&[0i64][..], &[1][..], &[4][..]]
    );
    let (nz, count) = engine.nonzero(&mask, &domain).unwrap();
    assert_eq!(count, 3);
    assert_eq!(nz, coords);
}

#[test]
fn test_scheduled_compaction_task() {
    let _ = env_logger::try_init();
    let engine = Arc::new(MaskPack::new(&Options { threads: 2 }));
    let input: Vec<i64> = vec![10, 20, 30, 40];
    let mask: Vec<u8> = vec![1, 0, 1, 1];
    let task_engine = engine.clone();
    let (task, receiver) = <dyn Task>::from_fn(move || {
        let domain = Domain::from_shape(&[4]);
        let input = DenseValues::new(&input, &domain);
        let mask = DenseMask::new(&mask, &domain);
        task_engine.compact_values(&input, &mask, &domain, &domain)
    });
    engine.schedule(task);
    let (values, count) = block_on(receiver).unwrap().unwrap();
    assert_eq!(count, 3);
    assert_eq!(values, vec![10, 30, 40]);
}

#[test]
fn test_panicking_task_cancels_receiver() {
    let _ = env_logger::try_init();
    let engine = MaskPack::new(&Options { threads: 1 });
    let (task, receiver) = <dyn Task>::from_fn(|| -> usize { panic!("invocation failed") });
    engine.schedule(task);
    assert!(block_on(receiver).is_err());
}

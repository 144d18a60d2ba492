// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tests on rolling-cadence partitioning.

use approx::assert_abs_diff_eq;
use ndarray::{array, Array1};

use super::*;

/// A footprint whose WFD region is the first `num_wfd` pixels, followed by
/// `num_outside` extended-sky pixels.
fn get_test_footprint(num_wfd: usize, num_outside: usize) -> Footprint {
    let num_pixels = num_wfd + num_outside;
    let mut r = Array1::from_elem(num_pixels, 0.3);
    let mut i = Array1::from_elem(num_pixels, 0.25);
    let mut u = Array1::from_elem(num_pixels, 0.15);
    for pixel in 0..num_wfd {
        r[pixel] = 1.0;
        i[pixel] = 1.0;
        u[pixel] = 0.31;
    }
    Footprint::from([(Filter::R, r), (Filter::I, i), (Filter::U, u)])
}

#[test]
fn wfd_region_is_the_ascending_positions_of_exact_ones() {
    let reference = array![0.3, 1.0, 0.999999, 1.0, 0.0, 1.0];
    let wfd = WfdRegion::from_reference(&reference).unwrap();
    assert_eq!(wfd.indices(), [1, 3, 5]);
    assert_eq!(wfd.num_pixels(), 3);
}

#[test]
fn band_boundaries_match_worked_examples() {
    assert_eq!(band_boundaries(100, 4), [0, 25, 50, 75, 100]);
    assert_eq!(band_boundaries(10, 3), [0, 3, 6, 10]);

    // Uneven division never drops pixels and keeps band sizes within one.
    let boundaries = band_boundaries(100, 7);
    assert_eq!(*boundaries.first().unwrap(), 0);
    assert_eq!(*boundaries.last().unwrap(), 100);
    for bounds in boundaries.windows(2) {
        let size = bounds[1] - bounds[0];
        assert!(size == 14 || size == 15);
    }
}

#[test]
fn even_slices_have_expected_shape() {
    let footprint = get_test_footprint(9, 3);
    let slices = slice_wfd_even(&footprint, 3, 0.2).unwrap();
    assert_eq!(slices.len(), 3);
    for slice in &slices {
        assert_eq!(slice.len(), 3);
        assert_eq!(slice.num_pixels(), Some(12));
        let filters: Vec<Filter> = slice.keys().copied().collect();
        assert_eq!(filters, [Filter::R, Filter::I, Filter::U]);
    }
}

#[test]
fn bands_are_emphasised_in_order() {
    let footprint = get_test_footprint(10, 2);
    let slices = slice_wfd_even(&footprint, 3, 0.2).unwrap();
    let scale_up = 3.0 - 0.2 * 2.0;
    // Bands cover WFD positions 0..3, 3..6 and 6..10.
    assert_abs_diff_eq!(slices[0][&Filter::R][0], scale_up);
    assert_abs_diff_eq!(slices[0][&Filter::R][3], 0.2);
    assert_abs_diff_eq!(slices[2][&Filter::R][9], scale_up);
    assert_abs_diff_eq!(slices[2][&Filter::R][0], 0.2);
}

#[test]
fn scaling_applies_to_every_filter() {
    let footprint = get_test_footprint(10, 2);
    let slices = slice_wfd_even(&footprint, 2, 0.2).unwrap();
    let scale_up = 2.0 - 0.2;
    // The u map's WFD pixels follow the r-defined bands.
    assert_abs_diff_eq!(slices[0][&Filter::U][0], 0.31 * scale_up);
    assert_abs_diff_eq!(slices[0][&Filter::U][9], 0.31 * 0.2);
    assert_abs_diff_eq!(slices[1][&Filter::U][0], 0.31 * 0.2);
    assert_abs_diff_eq!(slices[1][&Filter::U][9], 0.31 * scale_up);
}

#[test]
fn budget_is_preserved_over_a_full_cycle() {
    let footprint = get_test_footprint(10, 2);
    let n_slices = 3;
    let slices = slice_wfd_even(&footprint, n_slices, 0.2).unwrap();

    for (filter, original_map) in footprint.iter() {
        for pixel in 0..original_map.len() {
            let total: f64 = slices.iter().map(|slice| slice[filter][pixel]).sum();
            assert_abs_diff_eq!(
                total,
                n_slices as f64 * original_map[pixel],
                epsilon = 1e-10
            );
        }
    }
}

#[test]
fn non_wfd_pixels_are_untouched() {
    let footprint = get_test_footprint(10, 2);
    let slices = slice_wfd_even(&footprint, 2, 0.5).unwrap();
    for slice in &slices {
        for (filter, map) in slice.iter() {
            // Bitwise equality: these pixels are copies, not recomputed.
            assert_eq!(map[10], footprint[filter][10]);
            assert_eq!(map[11], footprint[filter][11]);
        }
    }
}

#[test]
fn single_slice_round_trips_the_footprint() {
    let footprint = get_test_footprint(10, 2);
    let slices = slice_wfd_even(&footprint, 1, 0.7).unwrap();
    assert_eq!(slices.len(), 1);
    // scale_up is 1 and the single band covers the whole WFD region.
    assert_eq!(slices[0], footprint);
}

#[test]
fn more_slices_than_wfd_pixels_yields_empty_bands() {
    let footprint = get_test_footprint(3, 1);
    let slices = slice_wfd_even(&footprint, 5, 0.0).unwrap();
    assert_eq!(slices.len(), 5);
    // Boundaries are [0, 0, 1, 1, 2, 3]: three emphasised pixels spread
    // over five outputs, two outputs left fully scaled down.
    assert_abs_diff_eq!(slices[0][&Filter::R][0], 0.0);
    assert_abs_diff_eq!(slices[1][&Filter::R][0], 5.0);
    assert_abs_diff_eq!(slices[2][&Filter::R][1], 0.0);
    assert_abs_diff_eq!(slices[3][&Filter::R][1], 5.0);
    assert_abs_diff_eq!(slices[4][&Filter::R][2], 5.0);
}

#[test]
fn non_contiguous_wfd_is_partitioned_by_position() {
    let mut r = Array1::from_elem(20, 0.3);
    for pixel in (0..20).step_by(2) {
        r[pixel] = 1.0;
    }
    let footprint = Footprint::from([(Filter::R, r)]);

    let slices = slice_wfd_even(&footprint, 2, 0.0).unwrap();
    let r0 = &slices[0][&Filter::R];
    // Band 0 is the first five WFD pixels by position, regardless of the
    // gaps between them.
    for pixel in [0, 2, 4, 6, 8] {
        assert_abs_diff_eq!(r0[pixel], 2.0);
    }
    for pixel in [10, 12, 14, 16, 18] {
        assert_abs_diff_eq!(r0[pixel], 0.0);
    }
    for pixel in (1..20).step_by(2) {
        assert_eq!(r0[pixel], 0.3);
    }
}

#[test]
fn quad_slices_interleave_disjoint_stripes() {
    let footprint = get_test_footprint(100, 10);
    let slices = slice_wfd_quad(&footprint, 0.0).unwrap();
    assert_eq!(slices.len(), 2);

    // Quarter boundaries are [0, 25, 50, 75, 100]; the first output
    // restores quarters 0 and 2, the second quarters 1 and 3, each at twice
    // the original weight when nothing is scaled down.
    let r0 = &slices[0][&Filter::R];
    let r1 = &slices[1][&Filter::R];
    for pixel in 0..100 {
        let quarter = pixel / 25;
        let (emphasised, other) = if quarter % 2 == 0 { (r0, r1) } else { (r1, r0) };
        assert_abs_diff_eq!(emphasised[pixel], 2.0);
        assert_abs_diff_eq!(other[pixel], 0.0);
    }
    // Non-WFD pixels come through in both.
    assert_eq!(r0[100], 0.3);
    assert_eq!(r1[105], 0.3);
}

#[test]
fn quad_budget_is_preserved() {
    let footprint = get_test_footprint(100, 10);
    let slices = slice_wfd_quad(&footprint, 0.2).unwrap();
    for (filter, original_map) in footprint.iter() {
        for pixel in 0..original_map.len() {
            let total: f64 = slices.iter().map(|slice| slice[filter][pixel]).sum();
            assert_abs_diff_eq!(total, 2.0 * original_map[pixel], epsilon = 1e-10);
        }
    }
}

#[test]
fn halves_split_a_scattered_wfd_in_two() {
    // 10 WFD pixels at the even indices of a 20-pixel map.
    let mut reference = Array1::from_elem(20, 0.3);
    for pixel in (0..20).step_by(2) {
        reference[pixel] = 1.0;
    }

    let halves = wfd_halves(&reference).unwrap();
    for half in &halves {
        assert_eq!(half.len(), 20);
        assert!(half.iter().all(|&w| w == 0.0 || w == -1.0));
        assert_abs_diff_eq!(half.sum(), -5.0);
    }
    // The first five WFD pixels land in the first half, the rest in the
    // second; no pixel is in both.
    for pixel in [0, 2, 4, 6, 8] {
        assert_eq!(halves[0][pixel], -1.0);
        assert_eq!(halves[1][pixel], 0.0);
    }
    for pixel in [10, 12, 14, 16, 18] {
        assert_eq!(halves[0][pixel], 0.0);
        assert_eq!(halves[1][pixel], -1.0);
    }
}

#[test]
fn slicing_is_deterministic() {
    let footprint = get_test_footprint(50, 7);
    let first = slice_wfd_even(&footprint, 3, 0.2).unwrap();
    let second = slice_wfd_even(&footprint, 3, 0.2).unwrap();
    assert_eq!(first, second);
}

#[test]
fn missing_reference_filter_is_an_error() {
    let footprint = Footprint::from([(Filter::G, Array1::from_elem(4, 1.0))]);
    assert!(matches!(
        slice_wfd_even(&footprint, 2, 0.2),
        Err(RollingError::NoReferenceFilter)
    ));
}

#[test]
fn nearly_one_is_not_wfd() {
    let footprint = Footprint::from([(Filter::R, Array1::from_elem(4, 1.0 - 1e-12))]);
    assert!(matches!(
        slice_wfd_even(&footprint, 2, 0.2),
        Err(RollingError::EmptyWfd)
    ));
}

#[test]
fn ragged_maps_are_an_error() {
    let footprint = Footprint::from([
        (Filter::R, Array1::from_elem(4, 1.0)),
        (Filter::I, Array1::from_elem(5, 1.0)),
    ]);
    assert!(matches!(
        slice_wfd_even(&footprint, 2, 0.2),
        Err(RollingError::UnevenMapLengths {
            filter: Filter::I,
            expected: 4,
            got: 5,
        })
    ));
}

#[test]
fn bad_slice_counts_and_factors_are_errors() {
    let footprint = get_test_footprint(4, 0);
    assert!(matches!(
        slice_wfd_even(&footprint, 0, 0.2),
        Err(RollingError::NotEnoughSlices(0))
    ));
    assert!(matches!(
        slice_wfd_even(&footprint, 2, 1.0),
        Err(RollingError::ScaleDownFactorOutOfRange(_))
    ));
    assert!(matches!(
        slice_wfd_even(&footprint, 2, -0.1),
        Err(RollingError::ScaleDownFactorOutOfRange(_))
    ));
    assert!(matches!(
        slice_wfd_even(&footprint, 2, f64::NAN),
        Err(RollingError::ScaleDownFactorOutOfRange(_))
    ));
    assert!(matches!(
        wfd_halves(&Array1::from_elem(4, 0.3)),
        Err(RollingError::EmptyWfd)
    ));
}

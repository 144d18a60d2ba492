// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Partitioning the WFD region of a footprint into rolling-cadence bands.
//!
//! "Rolling" emphasises one band of the wide-fast-deep region per season by
//! scaling its weights up while the rest of the region is scaled down; the
//! emphasised band cycles round-robin so the whole region still gets its
//! nominal coverage over a full cycle.
//!
//! e.g. a 100-pixel WFD region split into 2 slices with a scale-down factor
//! of 0.2 yields two footprints. In the first, the WFD pixels at positions
//! 0..49 carry 1.8x their original weight and positions 50..99 carry 0.2x;
//! in the second the bands swap. Summed over both footprints every pixel
//! carries 2x its original weight, so the long-run observing budget is
//! unchanged.

mod error;
#[cfg(test)]
mod tests;

pub use error::RollingError;

use ndarray::Array1;
use rayon::prelude::*;
use vec1::Vec1;

use crate::skymap::{Filter, Footprint, SkyMap};

/// The filter whose map defines WFD membership.
pub const REFERENCE_FILTER: Filter = Filter::R;

/// The ascending pixel indices of the wide-fast-deep region.
///
/// Membership is an exact `== 1.0` comparison against the
/// [`REFERENCE_FILTER`] map. The footprint builder writes WFD weights as the
/// literal 1.0, so the comparison is stable; maps that have been rescaled or
/// interpolated will not match and should not be sliced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WfdRegion(Vec1<usize>);

impl WfdRegion {
    /// Find the WFD pixels of a reference-filter map.
    pub fn from_reference(reference: &SkyMap) -> Result<WfdRegion, RollingError> {
        let indices: Vec<usize> = reference
            .iter()
            .enumerate()
            .filter_map(|(i, &weight)| (weight == 1.0).then_some(i))
            .collect();
        Vec1::try_from_vec(indices)
            .map(WfdRegion)
            .map_err(|_| RollingError::EmptyWfd)
    }

    /// Find the WFD pixels of a footprint's [`REFERENCE_FILTER`] map.
    pub fn from_footprint(footprint: &Footprint) -> Result<WfdRegion, RollingError> {
        let reference = footprint
            .get(&REFERENCE_FILTER)
            .ok_or(RollingError::NoReferenceFilter)?;
        Self::from_reference(reference)
    }

    pub fn num_pixels(&self) -> usize {
        self.0.len()
    }

    pub fn indices(&self) -> &[usize] {
        self.0.as_slice()
    }
}

/// Partition a footprint's WFD region into `n_slices` near-equal bands,
/// returning one footprint per band.
///
/// Output `i` has the WFD pixels of band `i` at `scale_up` times their
/// original weight and every other WFD pixel at `scale_down_factor` times,
/// where `scale_up = n_slices - scale_down_factor * (n_slices - 1)`.
/// Non-WFD pixels are copied through untouched. Cycling the outputs
/// round-robin is then budget neutral; each pixel's weight summed over all
/// outputs is `n_slices` times its original.
pub fn slice_wfd_even(
    footprint: &Footprint,
    n_slices: usize,
    scale_down_factor: f64,
) -> Result<Vec1<Footprint>, RollingError> {
    let wfd = check_slice_inputs(footprint, n_slices, scale_down_factor)?;
    let scale_up = scale_up_factor(n_slices, scale_down_factor);
    let scaled_down = scale_down_all(footprint, &wfd, scale_down_factor);
    let boundaries = band_boundaries(wfd.num_pixels(), n_slices);

    let slices = boundaries
        .windows(2)
        .map(|bounds| {
            let band = &wfd.indices()[bounds[0]..bounds[1]];
            restore_band(&scaled_down, footprint, band, scale_up)
        })
        .collect();
    Ok(Vec1::try_from_vec(slices).expect("checked that n_slices >= 1"))
}

/// Partition a footprint's WFD region into four near-equal bands collapsed
/// into two footprints: the first restores bands 0 and 2, the second bands 1
/// and 3.
///
/// The interleaved stripes keep each output's emphasis spread across the
/// declination range rather than concentrated in one block. The scaling is
/// that of [`slice_wfd_even`] with two slices
/// (`scale_up = 2 - scale_down_factor`).
pub fn slice_wfd_quad(
    footprint: &Footprint,
    scale_down_factor: f64,
) -> Result<Vec1<Footprint>, RollingError> {
    const N_SLICES: usize = 2;
    let wfd = check_slice_inputs(footprint, N_SLICES, scale_down_factor)?;
    let scale_up = scale_up_factor(N_SLICES, scale_down_factor);
    let scaled_down = scale_down_all(footprint, &wfd, scale_down_factor);
    let boundaries = band_boundaries(wfd.num_pixels(), N_SLICES * 2);

    let slices = (0..N_SLICES)
        .map(|i| {
            let band: Vec<usize> = [i, i + N_SLICES]
                .into_iter()
                .flat_map(|quarter| {
                    wfd.indices()[boundaries[quarter]..boundaries[quarter + 1]]
                        .iter()
                        .copied()
                })
                .collect();
            restore_band(&scaled_down, footprint, &band, scale_up)
        })
        .collect();
    Ok(Vec1::try_from_vec(slices).expect("two slices are always produced"))
}

/// Split a reference-filter map's WFD region into two declination halves,
/// returned as negated selector masks (0 outside the half, -1 inside).
///
/// Downstream modulo-selector decision functions treat negative pixels as
/// markers, so only the sign carries meaning. The split point is the same
/// midpoint a two-band partition uses.
pub fn wfd_halves(reference: &SkyMap) -> Result<[SkyMap; 2], RollingError> {
    let wfd = WfdRegion::from_reference(reference)?;
    let mid = wfd.num_pixels() / 2;

    let mut halves = [
        Array1::zeros(reference.len()),
        Array1::zeros(reference.len()),
    ];
    for (position, &pixel) in wfd.indices().iter().enumerate() {
        let half = usize::from(position >= mid);
        halves[half][pixel] = -1.0;
    }
    Ok(halves)
}

fn check_slice_inputs(
    footprint: &Footprint,
    n_slices: usize,
    scale_down_factor: f64,
) -> Result<WfdRegion, RollingError> {
    if n_slices < 1 {
        return Err(RollingError::NotEnoughSlices(n_slices));
    }
    // A NaN factor fails this check too.
    if !(0.0..1.0).contains(&scale_down_factor) {
        return Err(RollingError::ScaleDownFactorOutOfRange(scale_down_factor));
    }

    let reference = footprint
        .get(&REFERENCE_FILTER)
        .ok_or(RollingError::NoReferenceFilter)?;
    for (filter, map) in footprint.iter() {
        if map.len() != reference.len() {
            return Err(RollingError::UnevenMapLengths {
                filter: *filter,
                expected: reference.len(),
                got: map.len(),
            });
        }
    }

    WfdRegion::from_reference(reference)
}

fn scale_up_factor(n_slices: usize, scale_down_factor: f64) -> f64 {
    n_slices as f64 - scale_down_factor * (n_slices as f64 - 1.0)
}

/// Band `i` covers the WFD positions `boundaries[i]..boundaries[i + 1]`.
/// Exact integer arithmetic; band sizes differ by at most one pixel and the
/// last boundary is always `num_wfd`.
fn band_boundaries(num_wfd: usize, n_slices: usize) -> Vec<usize> {
    (0..=n_slices).map(|i| num_wfd * i / n_slices).collect()
}

/// A copy of the footprint with every WFD pixel of every filter scaled down.
fn scale_down_all(footprint: &Footprint, wfd: &WfdRegion, factor: f64) -> Footprint {
    footprint
        .par_iter()
        .map(|(filter, map)| {
            let mut scaled = map.clone();
            for &pixel in wfd.indices() {
                scaled[pixel] *= factor;
            }
            (*filter, scaled)
        })
        .collect::<Vec<_>>()
        .into_iter()
        .collect()
}

/// A copy of the scaled-down footprint with the band's pixels restored to
/// `scale_up` times their original weight.
fn restore_band(
    scaled_down: &Footprint,
    original: &Footprint,
    band: &[usize],
    scale_up: f64,
) -> Footprint {
    scaled_down
        .par_iter()
        .map(|(filter, map)| {
            let original_map = &original[filter];
            let mut out = map.clone();
            for &pixel in band {
                out[pixel] = original_map[pixel] * scale_up;
            }
            (*filter, out)
        })
        .collect::<Vec<_>>()
        .into_iter()
        .collect()
}

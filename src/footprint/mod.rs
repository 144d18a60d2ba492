// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Construction of per-filter sky-priority footprints from a dust-limited
//! sky grid.
//!
//! The "big sky" shape is taken from the Olsen et al cadence white paper: a
//! wide-fast-deep declination band avoiding dusty pixels, extended sky up to
//! +30° declination at a lower weight, and nothing further north.


use ndarray::Array1;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    constants::{EXTENDED_DEC_NORTH_DEG, WFD_DEC_NORTH_DEG, WFD_DEC_SOUTH_DEG},
    skymap::{Filter, Footprint},
};

/// The number of pixels of a healpix-sampled sky at this nside.
pub const fn num_healpix_pixels(nside: u32) -> usize {
    12 * (nside as usize) * (nside as usize)
}

/// Per-pixel sky coordinates and dust extinction, sampled on a healpix grid.
///
/// This is the only input the footprint builder needs; producing it (healpix
/// pixel math, dust-map files) is the caller's concern. The arrays are
/// validated against the nside on construction and are immutable afterwards.
#[derive(Debug, Clone)]
pub struct SkyGrid {
    nside: u32,
    /// Right ascension of each pixel centre \[degrees\].
    ra_deg: Array1<f64>,
    /// Declination of each pixel centre \[degrees\].
    dec_deg: Array1<f64>,
    /// E(B-V) dust extinction at each pixel.
    ebv: Array1<f64>,
}

impl SkyGrid {
    pub fn new(
        nside: u32,
        ra_deg: Array1<f64>,
        dec_deg: Array1<f64>,
        ebv: Array1<f64>,
    ) -> Result<SkyGrid, SkyGridError> {
        let expected = num_healpix_pixels(nside);
        for (label, array) in [("RA", &ra_deg), ("Dec", &dec_deg), ("E(B-V)", &ebv)] {
            if array.len() != expected {
                return Err(SkyGridError::BadArrayLength {
                    label,
                    nside,
                    expected,
                    got: array.len(),
                });
            }
        }

        Ok(SkyGrid {
            nside,
            ra_deg,
            dec_deg,
            ebv,
        })
    }

    pub fn nside(&self) -> u32 {
        self.nside
    }

    pub fn num_pixels(&self) -> usize {
        num_healpix_pixels(self.nside)
    }

    /// Right ascensions \[degrees\].
    pub fn ra_deg(&self) -> &Array1<f64> {
        &self.ra_deg
    }

    /// Declinations \[degrees\].
    pub fn dec_deg(&self) -> &Array1<f64> {
        &self.dec_deg
    }

    /// E(B-V) dust extinction values.
    pub fn ebv(&self) -> &Array1<f64> {
        &self.ebv
    }
}

#[derive(Error, Debug)]
pub enum SkyGridError {
    #[error("The {label} array has {got} entries, but an nside {nside} grid has {expected} pixels")]
    BadArrayLength {
        label: &'static str,
        nside: u32,
        expected: usize,
        got: usize,
    },
}

/// The weights a single filter gives to the footprint regions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandWeights {
    /// The weight of WFD pixels.
    pub wfd: f64,

    /// The weight of extended-sky pixels.
    pub extended: f64,

    /// Zero this filter everywhere north of the WFD's northern limit. Used
    /// for the reddest and bluest filters, which aren't worth observing at
    /// high airmass.
    #[serde(default)]
    pub cap_north: bool,
}

/// Per-filter footprint weights.
///
/// This replaces a mutable mapping of filter name to weight list; every
/// filter is always present and the `cap_north` behaviour is an explicit
/// flag rather than an implied third element. The defaults are the Olsen et
/// al cadence white paper values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterWeights {
    pub u: BandWeights,
    pub g: BandWeights,
    pub r: BandWeights,
    pub i: BandWeights,
    pub z: BandWeights,
    pub y: BandWeights,
}

impl FilterWeights {
    /// The weights in filter order, for iteration.
    pub fn per_filter(&self) -> [(Filter, BandWeights); 6] {
        [
            (Filter::U, self.u),
            (Filter::G, self.g),
            (Filter::R, self.r),
            (Filter::I, self.i),
            (Filter::Z, self.z),
            (Filter::Y, self.y),
        ]
    }
}

impl Default for FilterWeights {
    fn default() -> Self {
        FilterWeights {
            u: BandWeights {
                wfd: 0.31,
                extended: 0.15,
                cap_north: true,
            },
            g: BandWeights {
                wfd: 0.44,
                extended: 0.15,
                cap_north: false,
            },
            r: BandWeights {
                wfd: 1.0,
                extended: 0.3,
                cap_north: false,
            },
            i: BandWeights {
                wfd: 1.0,
                extended: 0.3,
                cap_north: false,
            },
            z: BandWeights {
                wfd: 0.9,
                extended: 0.3,
                cap_north: false,
            },
            y: BandWeights {
                wfd: 0.9,
                extended: 0.3,
                cap_north: true,
            },
        }
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Region {
    Wfd,
    Extended,
    Outside,
}

/// Build the "big sky" footprint from a sky grid.
///
/// A pixel is WFD when `−72.25° < dec < 12.4°` (strictly) and its dust
/// extinction is below `dust_limit`; otherwise it is extended sky when
/// `dec < 30°`; otherwise it gets nothing. Per filter, WFD pixels take the
/// `wfd` weight and extended pixels the `extended` weight, and `cap_north`
/// filters are zeroed everywhere above `dec > 12.4°`.
///
/// With the default [`FilterWeights`], the r WFD weight is written as exactly
/// `1.0`; the rolling code keys WFD membership off that exact value.
pub fn big_sky_footprint(grid: &SkyGrid, weights: &FilterWeights, dust_limit: f64) -> Footprint {
    // Classify each pixel once; the filters differ only in the weights they
    // give each region.
    let regions: Vec<Region> = grid
        .dec_deg
        .iter()
        .zip(grid.ebv.iter())
        .map(|(&dec, &ebv)| {
            if dec > WFD_DEC_SOUTH_DEG && dec < WFD_DEC_NORTH_DEG && ebv < dust_limit {
                Region::Wfd
            } else if dec < EXTENDED_DEC_NORTH_DEG {
                Region::Extended
            } else {
                Region::Outside
            }
        })
        .collect();

    weights
        .per_filter()
        .into_iter()
        .map(|(filter, w)| {
            let map = regions
                .iter()
                .zip(grid.dec_deg.iter())
                .map(|(region, &dec)| {
                    if w.cap_north && dec > WFD_DEC_NORTH_DEG {
                        0.0
                    } else {
                        match region {
                            Region::Wfd => w.wfd,
                            Region::Extended => w.extended,
                            Region::Outside => 0.0,
                        }
                    }
                })
                .collect::<Array1<f64>>();
            (filter, map)
        })
        .collect()
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Useful constants.

All constants *must* be double precision. `skyroll` does all of its map
arithmetic in double precision; WFD membership in particular is decided by
comparing weights against the exact values written here.
 */

/// The northern declination limit of the wide-fast-deep region \[degrees\].
pub const WFD_DEC_NORTH_DEG: f64 = 12.4;

/// The southern declination limit of the wide-fast-deep region \[degrees\].
pub const WFD_DEC_SOUTH_DEG: f64 = -72.25;

/// The northern declination limit of the extended sky \[degrees\]. Pixels at
/// or above this declination get no weight in any filter.
pub const EXTENDED_DEC_NORTH_DEG: f64 = 30.0;

/// Pixels with E(B-V) dust extinction at or above this value are excluded
/// from the wide-fast-deep region.
pub const DEFAULT_DUST_LIMIT: f64 = 0.19;

/// The fraction of a WFD pixel's weight that is kept while its band is not
/// the active one.
pub const DEFAULT_SCALE_DOWN_FACTOR: f64 = 0.2;

/// The default number of WFD bands to rotate over.
pub const DEFAULT_SPLITS: usize = 2;

/// The healpix nside that input sky grids are usually sampled at. A grid of
/// nside N has 12·N² pixels.
pub const DEFAULT_NSIDE: u32 = 32;

/// The default length of the simulated survey \[days\] (ten years).
pub const DEFAULT_SURVEY_LENGTH_DAYS: f64 = 3652.5;

/// The default maximum dither offset applied to deep-drilling fields
/// \[degrees\].
pub const DEFAULT_MAX_DITHER_DEG: f64 = 0.7;

/// Seasons beyond this one (after modulo arithmetic) no longer roll; the
/// rolling weights saturate to the base footprint.
pub const DEFAULT_MAX_SEASON: u32 = 6;

/// The camera rotator limit used when dithering deep-drilling fields
/// \[degrees\].
pub const DDF_CAMERA_ROT_LIMIT_DEG: f64 = 80.0;

/// The default number of exposures per visit.
pub const DEFAULT_NEXP: u32 = 1;

pub const DAYS_PER_YEAR: f64 = 365.25;

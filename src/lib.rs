// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Rolling-cadence footprint and survey-blueprint generation for wide-fast-deep
sky surveys.

The library builds per-filter sky-priority maps from a dust-limited sky grid,
partitions the wide-fast-deep (WFD) region into declination bands whose
weights rotate over seasons, and assembles the survey blueprints that an
external scheduler runs. Healpix pixel math, the observatory model and the
scheduler decision loop all live outside this crate; maps come in and go out
as plain per-pixel weight arrays.
 */

pub mod constants;
pub mod footprint;
pub mod io;
pub mod rolling;
pub mod skymap;
pub mod surveys;

mod cli;

pub use cli::{Skyroll, SkyrollError};

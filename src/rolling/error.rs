// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors from partitioning footprints into rolling-cadence bands.

use thiserror::Error;

use super::REFERENCE_FILTER;
use crate::skymap::Filter;

#[derive(Error, Debug)]
pub enum RollingError {
    #[error("The footprint has no '{}' map, which defines the WFD region", REFERENCE_FILTER)]
    NoReferenceFilter,

    #[error("The WFD region is empty; no pixel of the '{}' map is exactly 1", REFERENCE_FILTER)]
    EmptyWfd,

    #[error(
        "The '{filter}' map has {got} pixels, but the '{}' map has {expected}",
        REFERENCE_FILTER
    )]
    UnevenMapLengths {
        filter: Filter,
        expected: usize,
        got: usize,
    },

    #[error("Cannot partition the WFD region into {0} slices; at least 1 is needed")]
    NotEnoughSlices(usize),

    #[error("The scale-down factor must lie in [0, 1), but {0} was given")]
    ScaleDownFactorOutOfRange(f64),
}

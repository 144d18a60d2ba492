// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code surrounding the [`IndexMap`] used to contain per-filter sky maps.


use std::ops::{Deref, DerefMut};

use indexmap::IndexMap;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// A per-pixel map of sky-priority weights for a single filter.
///
/// The pixel order is fixed by the external healpix pixelisation; a map
/// sampled at nside N has 12·N² entries. The index *is* the pixel identity,
/// so all maps describing the same sky must have the same length.
pub type SkyMap = Array1<f64>;

/// An observing filter (the ugrizy bands).
#[derive(
    Debug,
    Display,
    EnumIter,
    EnumString,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    U,
    G,
    R,
    I,
    Z,
    Y,
}

/// An [`IndexMap`] of filters for keys and [`SkyMap`] weights for values.
///
/// By making [`Footprint`] a new type (specifically, an anonymous struct),
/// useful methods can be put onto it. The insertion order of filters is
/// preserved everywhere, including in written-out footprint files.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Footprint(IndexMap<Filter, SkyMap>);

impl Footprint {
    /// Create an empty [`Footprint`].
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// The number of pixels per map. `None` if the footprint has no filters.
    ///
    /// All maps in a well-formed footprint have the same length; this reports
    /// the first one's. The rolling code verifies the rest before slicing.
    pub fn num_pixels(&self) -> Option<usize> {
        self.0.values().next().map(|m| m.len())
    }

    /// The sum of every pixel weight over all filters.
    pub fn total_sum(&self) -> f64 {
        self.0.values().map(|m| m.sum()).sum()
    }

    /// The sum of the weights at the given pixels over all filters.
    pub fn sum_over(&self, pixels: &[usize]) -> f64 {
        self.0
            .values()
            .map(|m| pixels.iter().map(|&i| m[i]).sum::<f64>())
            .sum()
    }

    /// Get counts of filters, pixels and covered pixels (weighted in at least
    /// one filter).
    pub(crate) fn get_counts(&self) -> FootprintCounts {
        let num_covered = (0..self.num_pixels().unwrap_or(0))
            .filter(|&i| {
                self.0
                    .values()
                    .any(|m| m.get(i).is_some_and(|&w| w != 0.0))
            })
            .count();
        FootprintCounts {
            num_filters: self.0.len(),
            num_pixels: self.num_pixels().unwrap_or(0),
            num_covered,
            total_weight: self.total_sum(),
        }
    }
}

impl From<IndexMap<Filter, SkyMap>> for Footprint {
    fn from(fp: IndexMap<Filter, SkyMap>) -> Self {
        Self(fp)
    }
}

impl<const N: usize> From<[(Filter, SkyMap); N]> for Footprint {
    fn from(value: [(Filter, SkyMap); N]) -> Self {
        Self(IndexMap::from(value))
    }
}

impl Deref for Footprint {
    type Target = IndexMap<Filter, SkyMap>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Footprint {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl FromIterator<(Filter, SkyMap)> for Footprint {
    fn from_iter<I: IntoIterator<Item = (Filter, SkyMap)>>(iter: I) -> Self {
        let mut c = Self::new();
        for i in iter {
            c.insert(i.0, i.1);
        }
        c
    }
}

impl IntoIterator for Footprint {
    type Item = (Filter, SkyMap);
    type IntoIter = indexmap::map::IntoIter<Filter, SkyMap>;

    fn into_iter(self) -> indexmap::map::IntoIter<Filter, SkyMap> {
        self.0.into_iter()
    }
}

#[derive(Debug, Default)]
pub(crate) struct FootprintCounts {
    pub(crate) num_filters: usize,
    pub(crate) num_pixels: usize,
    pub(crate) num_covered: usize,
    pub(crate) total_weight: f64,
}

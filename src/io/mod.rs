// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Reading and writing run artifacts: footprints, rolling sequences, WFD
//! halves, sky grids, survey plans and the run configuration.
//!
//! Maps are stored as plain filter-to-weight-list mappings so that artifacts
//! are readable by the downstream scheduler tooling regardless of language;
//! the in-memory array types never leak into the files.

mod error;
mod read;
mod write;

pub use error::{ReadMapError, WriteMapError};
pub use read::{
    read_footprint, read_rolling_sequence, read_sky_grid, read_survey_plan, read_wfd_halves,
};
pub use write::{
    can_write_to_file, write_footprint, write_rolling_sequence, write_run_config,
    write_survey_plan, write_wfd_halves,
};

use std::path::Path;

use indexmap::IndexMap;
use itertools::Itertools;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::{
    constants::DAYS_PER_YEAR,
    skymap::{Filter, Footprint},
};

#[derive(Debug, Display, EnumIter, EnumString, Clone, Copy, PartialEq, Eq)]
/// All supported map artifact file types.
pub enum MapFileType {
    #[strum(serialize = "yaml", serialize = "yml")]
    Yaml,

    #[strum(serialize = "json")]
    Json,
}

lazy_static::lazy_static! {
    pub static ref MAP_FILE_TYPES_COMMA_SEPARATED: String = MapFileType::iter().join(", ");
}

/// The file type implied by a path's extension, if it's one we handle.
pub(crate) fn file_type_from_ext(path: &Path) -> Option<MapFileType> {
    path.extension()
        .and_then(|os_str| os_str.to_str())
        .and_then(|s| s.to_lowercase().parse().ok())
}

/// The artifact file-name root, encoding the run's rolling parameters, e.g.
/// `roll_mod2_dust_sdf_0.20_10yrs`.
pub fn file_root(splits: usize, scale_down_factor: f64, survey_length: f64) -> String {
    let years = (survey_length / DAYS_PER_YEAR).round() as u32;
    format!("roll_mod{splits}_dust_sdf_{scale_down_factor:.2}_{years}yrs")
}

/// The run parameters echoed alongside the artifacts for the runner: what was
/// asked for, plus the deep-drilling dither settings the runner applies
/// itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// \[days\]
    pub survey_length: f64,
    pub nside: u32,
    pub splits: usize,
    pub scale_down_factor: f64,
    pub max_season: u32,
    pub dust_limit: f64,
    pub nexp: u32,
    /// \[degrees\]
    pub max_dither: f64,
    pub per_night_dither: bool,
    /// \[degrees\]
    pub ddf_camera_rot_limit: f64,
    pub file_root: String,
}

// The on-disk forms. Arrays are flattened to plain lists at this boundary.

pub(crate) type TmpFootprint = IndexMap<Filter, Vec<f64>>;

#[derive(Serialize, Deserialize)]
struct TmpHalves {
    first: Vec<f64>,
    second: Vec<f64>,
}

#[derive(Serialize, Deserialize)]
struct TmpSkyGrid {
    nside: u32,
    ra_deg: Vec<f64>,
    dec_deg: Vec<f64>,
    ebv: Vec<f64>,
}

fn footprint_to_tmp(footprint: &Footprint) -> TmpFootprint {
    footprint
        .iter()
        .map(|(filter, map)| (*filter, map.to_vec()))
        .collect()
}

fn footprint_from_tmp(tmp: TmpFootprint) -> Result<Footprint, ReadMapError> {
    let expected = match tmp.values().next() {
        Some(weights) => weights.len(),
        None => return Err(ReadMapError::NoFilters),
    };

    let mut footprint = Footprint::new();
    for (filter, weights) in tmp {
        if weights.len() != expected {
            return Err(ReadMapError::UnevenMapLengths {
                filter,
                expected,
                got: weights.len(),
            });
        }
        footprint.insert(filter, Array1::from_vec(weights));
    }
    Ok(footprint)
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to read map artifact files.

use std::{fs::File, io::BufReader, path::Path};

use log::debug;
use ndarray::Array1;
use serde::de::DeserializeOwned;
use vec1::Vec1;

use super::{
    error::ReadMapError, file_type_from_ext, footprint_from_tmp, MapFileType, TmpFootprint,
    TmpHalves, TmpSkyGrid,
};
use crate::{
    footprint::SkyGrid,
    skymap::{Footprint, SkyMap},
    surveys::SurveyPlan,
};

/// Deserialize a whole file as YAML or JSON according to its extension.
fn from_path<T: DeserializeOwned>(path: &Path) -> Result<T, ReadMapError> {
    let file_type = file_type_from_ext(path)
        .ok_or_else(|| ReadMapError::UnhandledFileExt(path.display().to_string()))?;
    let mut buf = BufReader::new(File::open(path)?);
    let parsed = match file_type {
        MapFileType::Yaml => serde_yaml::from_reader(&mut buf)?,
        MapFileType::Json => serde_json::from_reader(&mut buf)?,
    };
    Ok(parsed)
}

/// Read a [`Footprint`] from a yaml or json file.
pub fn read_footprint(path: &Path) -> Result<Footprint, ReadMapError> {
    debug!("Attempting to read footprint {}", path.display());
    let tmp: TmpFootprint = from_path(path)?;
    footprint_from_tmp(tmp)
}

/// Read an ordered rolling sequence (slices first, base footprint last) from
/// a yaml or json file.
pub fn read_rolling_sequence(path: &Path) -> Result<Vec1<Footprint>, ReadMapError> {
    debug!("Attempting to read rolling sequence {}", path.display());
    let tmps: Vec<TmpFootprint> = from_path(path)?;

    let mut sequence = Vec::with_capacity(tmps.len());
    for tmp in tmps {
        sequence.push(footprint_from_tmp(tmp)?);
    }
    let sequence = Vec1::try_from_vec(sequence).map_err(|_| ReadMapError::EmptySequence)?;

    // All entries must cover the same pixels.
    let expected = sequence.first().num_pixels().unwrap_or_default();
    for (index, footprint) in sequence.iter().enumerate().skip(1) {
        let got = footprint.num_pixels().unwrap_or_default();
        if got != expected {
            return Err(ReadMapError::UnevenSequenceLengths {
                index,
                expected,
                got,
            });
        }
    }
    Ok(sequence)
}

/// Read the two WFD half-masks from a yaml or json file.
pub fn read_wfd_halves(path: &Path) -> Result<[SkyMap; 2], ReadMapError> {
    debug!("Attempting to read WFD halves {}", path.display());
    let tmp: TmpHalves = from_path(path)?;
    if tmp.first.len() != tmp.second.len() {
        return Err(ReadMapError::UnevenHalves {
            first: tmp.first.len(),
            second: tmp.second.len(),
        });
    }
    Ok([Array1::from_vec(tmp.first), Array1::from_vec(tmp.second)])
}

/// Read a [`SkyGrid`] from a yaml or json file, checking the arrays against
/// the healpix pixel count.
pub fn read_sky_grid(path: &Path) -> Result<SkyGrid, ReadMapError> {
    debug!("Attempting to read sky grid {}", path.display());
    let tmp: TmpSkyGrid = from_path(path)?;
    let grid = SkyGrid::new(
        tmp.nside,
        Array1::from_vec(tmp.ra_deg),
        Array1::from_vec(tmp.dec_deg),
        Array1::from_vec(tmp.ebv),
    )?;
    Ok(grid)
}

/// Read a [`SurveyPlan`] from a yaml or json file.
pub fn read_survey_plan(path: &Path) -> Result<SurveyPlan, ReadMapError> {
    debug!("Attempting to read survey plan {}", path.display());
    from_path(path)
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to write map artifact files.

use std::{
    fs::{DirBuilder, File, OpenOptions},
    io::{BufWriter, Write},
    path::Path,
};

use log::{debug, trace};
use serde::Serialize;

use super::{
    error::WriteMapError, file_type_from_ext, footprint_to_tmp, MapFileType, RunConfig, TmpHalves,
};
use crate::{
    cli::Warn,
    skymap::{Footprint, SkyMap},
    surveys::SurveyPlan,
};

/// Serialize a value as YAML or JSON according to the path's extension.
fn to_path<T: Serialize>(value: &T, path: &Path) -> Result<(), WriteMapError> {
    let file_type = file_type_from_ext(path)
        .ok_or_else(|| WriteMapError::UnhandledFileExt(path.display().to_string()))?;
    let mut buf = BufWriter::new(File::create(path)?);
    match file_type {
        MapFileType::Yaml => serde_yaml::to_writer(&mut buf, value)?,
        MapFileType::Json => serde_json::to_writer_pretty(&mut buf, value)?,
    }
    buf.flush()?;
    Ok(())
}

/// Write a [`Footprint`] to a yaml or json file.
pub fn write_footprint(footprint: &Footprint, path: &Path) -> Result<(), WriteMapError> {
    to_path(&footprint_to_tmp(footprint), path)?;
    debug!("Wrote footprint {}", path.display());
    Ok(())
}

/// Write a rolling sequence (slices first, base footprint last) to a yaml or
/// json file.
pub fn write_rolling_sequence(
    sequence: &[Footprint],
    path: &Path,
) -> Result<(), WriteMapError> {
    let tmps: Vec<_> = sequence.iter().map(footprint_to_tmp).collect();
    to_path(&tmps, path)?;
    debug!("Wrote rolling sequence {}", path.display());
    Ok(())
}

/// Write the two WFD half-masks to a yaml or json file.
pub fn write_wfd_halves(halves: &[SkyMap; 2], path: &Path) -> Result<(), WriteMapError> {
    let tmp = TmpHalves {
        first: halves[0].to_vec(),
        second: halves[1].to_vec(),
    };
    to_path(&tmp, path)?;
    debug!("Wrote WFD halves {}", path.display());
    Ok(())
}

/// Write a [`SurveyPlan`] to a yaml or json file.
pub fn write_survey_plan(plan: &SurveyPlan, path: &Path) -> Result<(), WriteMapError> {
    to_path(plan, path)?;
    debug!("Wrote survey plan {}", path.display());
    Ok(())
}

/// Write the [`RunConfig`] echo as toml.
pub fn write_run_config(config: &RunConfig, path: &Path) -> Result<(), WriteMapError> {
    let mut buf = BufWriter::new(File::create(path)?);
    buf.write_all(toml::to_string_pretty(config)?.as_bytes())?;
    buf.flush()?;
    debug!("Wrote run config {}", path.display());
    Ok(())
}

/// Check if we are able to write to a file. If the leading directories don't
/// exist, create them; if that isn't possible, return an error. If the file
/// already exists, emit a warning that it will be overwritten.
///
/// This avoids generating a run's artifacts only to find the output
/// unwritable at the end. An existing file's contents are left alone.
pub fn can_write_to_file(file: &Path) -> Result<(), WriteMapError> {
    trace!("Testing whether we can write to {}", file.display());

    if file.exists() {
        // Open for writing without truncating.
        match OpenOptions::new().write(true).open(file).map_err(|e| e.kind()) {
            Ok(_) => {
                format!("Will overwrite the existing file '{}'", file.display()).warn();
            }
            Err(std::io::ErrorKind::PermissionDenied) => {
                return Err(WriteMapError::FileNotWritable {
                    file: file.display().to_string(),
                })
            }
            Err(e) => return Err(WriteMapError::IO(e.into())),
        }
        return Ok(());
    }

    // The file doesn't exist. Attempt to make the directories leading up to
    // it; if this fails, then we can't write the file anyway.
    if let Some(parent) = file.parent() {
        match DirBuilder::new()
            .recursive(true)
            .create(parent)
            .map_err(|e| e.kind())
        {
            Ok(()) => (),
            Err(std::io::ErrorKind::PermissionDenied) => {
                return Err(WriteMapError::NewDirectory(parent.to_path_buf()))
            }
            Err(e) => return Err(WriteMapError::IO(e.into())),
        }
    }

    match File::create(file).map_err(|e| e.kind()) {
        // File is writable. We don't want to keep the 0-sized probe; remove
        // it.
        Ok(_) => {
            std::fs::remove_file(file).map_err(WriteMapError::IO)?;
            Ok(())
        }
        Err(std::io::ErrorKind::PermissionDenied) => Err(WriteMapError::FileNotWritable {
            file: file.display().to_string(),
        }),
        Err(e) => Err(WriteMapError::IO(e.into())),
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all skyroll-related errors. This should be the *only* error
//! enum that is publicly visible.

use thiserror::Error;

use super::{generate::GenerateArgsError, slice::SliceArgsError};
use crate::{
    footprint::SkyGridError,
    io::{ReadMapError, WriteMapError},
    rolling::RollingError,
    surveys::SurveyError,
};

const URL: &str = "https://MWATelescope.github.io/skyroll";

/// The *only* publicly visible error from skyroll. Each error message should
/// include the URL, unless it's "generic".
#[derive(Error, Debug)]
pub enum SkyrollError {
    /// An error related to sky grids or footprint construction.
    #[error("{0}\n\nSee for more info: {URL}/defs/footprints.html")]
    Footprint(String),

    /// An error related to rolling-cadence slicing.
    #[error("{0}\n\nSee for more info: {URL}/defs/rolling.html")]
    Rolling(String),

    /// An error related to survey blueprints.
    #[error("{0}\n\nSee for more info: {URL}/defs/surveys.html")]
    Surveys(String),

    /// An error related to reading map artifacts.
    #[error("{0}\n\nSee for more info: {URL}/defs/map_formats.html")]
    MapRead(String),

    /// An error related to writing map artifacts.
    #[error("{0}\n\nSee for more info: {URL}/defs/map_formats.html")]
    MapWrite(String),

    /// An error related to argument files.
    #[error("{0}\n\nSee for more info: {URL}/defs/arg_file.html")]
    ArgFile(String),

    /// A generic error that can't be clarified further with documentation,
    /// e.g. IO errors.
    #[error("{0}")]
    Generic(String),
}

// When changing the error propagation below, ensure `Self::from(e)` uses the
// correct `e`!

// Binary sub-command errors.

impl From<GenerateArgsError> for SkyrollError {
    fn from(e: GenerateArgsError) -> Self {
        match e {
            GenerateArgsError::NoSkyGrid => Self::Footprint(e.to_string()),
        }
    }
}

impl From<SliceArgsError> for SkyrollError {
    fn from(e: SliceArgsError) -> Self {
        match e {
            SliceArgsError::NoFootprint => Self::MapRead(e.to_string()),
        }
    }
}

// Library code errors.

impl From<RollingError> for SkyrollError {
    fn from(e: RollingError) -> Self {
        Self::Rolling(e.to_string())
    }
}

impl From<SkyGridError> for SkyrollError {
    fn from(e: SkyGridError) -> Self {
        Self::Footprint(e.to_string())
    }
}

impl From<SurveyError> for SkyrollError {
    fn from(e: SurveyError) -> Self {
        Self::Surveys(e.to_string())
    }
}

impl From<ReadMapError> for SkyrollError {
    fn from(e: ReadMapError) -> Self {
        let s = e.to_string();
        match e {
            ReadMapError::SkyGrid(_) => Self::Footprint(s),
            ReadMapError::UnhandledFileExt(_)
            | ReadMapError::NoFilters
            | ReadMapError::UnevenMapLengths { .. }
            | ReadMapError::EmptySequence
            | ReadMapError::UnevenSequenceLengths { .. }
            | ReadMapError::UnevenHalves { .. }
            | ReadMapError::Yaml(_)
            | ReadMapError::Json(_) => Self::MapRead(s),
            ReadMapError::IO(e) => Self::from(e),
        }
    }
}

impl From<WriteMapError> for SkyrollError {
    fn from(e: WriteMapError) -> Self {
        let s = e.to_string();
        match e {
            WriteMapError::UnhandledFileExt(_)
            | WriteMapError::FileNotWritable { .. }
            | WriteMapError::NewDirectory(_)
            | WriteMapError::Yaml(_)
            | WriteMapError::Json(_)
            | WriteMapError::TomlSer(_) => Self::MapWrite(s),
            WriteMapError::IO(e) => Self::from(e),
        }
    }
}

impl From<std::io::Error> for SkyrollError {
    fn from(e: std::io::Error) -> Self {
        Self::Generic(e.to_string())
    }
}

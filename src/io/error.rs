// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use thiserror::Error;

use super::MAP_FILE_TYPES_COMMA_SEPARATED;
use crate::{footprint::SkyGridError, skymap::Filter};

/// Errors associated with reading any kind of map artifact.
#[derive(Error, Debug)]
pub enum ReadMapError {
    #[error(
        "Unrecognised file extension on '{0}'. Supported file types are: {}",
        *MAP_FILE_TYPES_COMMA_SEPARATED
    )]
    UnhandledFileExt(String),

    #[error("The file contained no filter maps")]
    NoFilters,

    #[error("The '{filter}' map has {got} weights, but the first map has {expected}")]
    UnevenMapLengths {
        filter: Filter,
        expected: usize,
        got: usize,
    },

    #[error("The rolling sequence contained no footprints")]
    EmptySequence,

    #[error("Sequence entry {index} has maps of {got} pixels, but the first entry has {expected}")]
    UnevenSequenceLengths {
        index: usize,
        expected: usize,
        got: usize,
    },

    #[error("The two half masks have different lengths ({first} and {second})")]
    UnevenHalves { first: usize, second: usize },

    #[error(transparent)]
    SkyGrid(#[from] SkyGridError),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}

/// Errors associated with writing map artifacts.
#[derive(Error, Debug)]
pub enum WriteMapError {
    #[error(
        "Unrecognised file extension on '{0}'. Supported file types are: {}",
        *MAP_FILE_TYPES_COMMA_SEPARATED
    )]
    UnhandledFileExt(String),

    #[error("Cannot write to the specified file '{file}'. Do you have write permissions set?")]
    FileNotWritable { file: String },

    #[error(
        "Couldn't create directory '{0}' for output files. Do you have write permissions set?"
    )]
    NewDirectory(PathBuf),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    TomlSer(#[from] toml::ser::Error),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Slice an existing footprint file into rolling-cadence bands, one output
//! file per band.

use std::path::PathBuf;

use clap::Parser;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};
use vec1::Vec1;

use super::common::{display_warnings, InfoPrinter, ARG_FILE_HELP, SCALE_DOWN_FACTOR_HELP};
use crate::{
    constants::{DEFAULT_SCALE_DOWN_FACTOR, DEFAULT_SPLITS},
    io::{can_write_to_file, read_footprint, write_footprint},
    rolling::{slice_wfd_even, slice_wfd_quad},
    skymap::Footprint,
    SkyrollError,
};

lazy_static::lazy_static! {
    static ref SLICES_HELP: String =
        format!("The number of WFD bands to slice into. Default: {DEFAULT_SPLITS}");
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct SliceArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    pub(super) args_file: Option<PathBuf>,

    /// Path to the footprint file to slice. The outputs are written beside
    /// it as `<stem>_slice<i>.<ext>`.
    #[clap(short, long, parse(from_os_str), help_heading = "INPUT FILES")]
    pub(super) footprint: Option<PathBuf>,

    #[clap(short = 'n', long, help = SLICES_HELP.as_str(), help_heading = "ROLLING CADENCE")]
    pub(super) slices: Option<usize>,

    #[clap(long, help = SCALE_DOWN_FACTOR_HELP.as_str(), help_heading = "ROLLING CADENCE")]
    pub(super) scale_down_factor: Option<f64>,

    /// Slice over four interleaved quad stripes rather than contiguous
    /// bands. This ignores --slices; two outputs are produced.
    #[clap(long, help_heading = "ROLLING CADENCE")]
    #[serde(default)]
    pub(super) quad: bool,
}

impl SliceArgs {
    /// Both command-line and file arguments overlap in terms of what is
    /// available; this function consolidates everything that was specified
    /// into a single struct. Where applicable, it will prefer CLI parameters
    /// over those in the file.
    pub(super) fn merge(self) -> Result<SliceArgs, SkyrollError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            let SliceArgs {
                args_file: _,
                footprint,
                slices,
                scale_down_factor,
                quad,
            } = unpack_arg_file!(arg_file);

            Ok(SliceArgs {
                args_file: None,
                footprint: cli_args.footprint.or(footprint),
                slices: cli_args.slices.or(slices),
                scale_down_factor: cli_args.scale_down_factor.or(scale_down_factor),
                quad: cli_args.quad || quad,
            })
        } else {
            Ok(cli_args)
        }
    }

    fn parse(self) -> Result<SliceParams, SkyrollError> {
        debug!("{:#?}", self);

        let SliceArgs {
            args_file: _,
            footprint,
            slices,
            scale_down_factor,
            quad,
        } = self;

        let input = match footprint {
            Some(f) => f,
            None => return Err(SliceArgsError::NoFootprint.into()),
        };
        let n_slices = slices.unwrap_or(DEFAULT_SPLITS);
        let scale_down_factor = scale_down_factor.unwrap_or(DEFAULT_SCALE_DOWN_FACTOR);

        let footprint = read_footprint(&input)?;
        let slices = if quad {
            slice_wfd_quad(&footprint, scale_down_factor)?
        } else {
            slice_wfd_even(&footprint, n_slices, scale_down_factor)?
        };

        // The read dispatched on the extension, so the path has one.
        let ext = input.extension().and_then(|e| e.to_str()).unwrap_or("yaml");
        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("footprint");
        let outputs = (0..slices.len())
            .map(|i| input.with_file_name(format!("{stem}_slice{i}.{ext}")))
            .collect::<Vec<_>>();
        for file in &outputs {
            can_write_to_file(file)?;
        }
        let outputs = Vec1::try_from_vec(outputs).expect("one output per slice");

        let mut printer = InfoPrinter::new("Slicing info".into());
        printer.push_block(vec![
            format!("Read footprint from {}", input.display()).into(),
            if quad {
                "2 slices over interleaved quad stripes".into()
            } else {
                format!("{n_slices} slices over contiguous bands").into()
            },
            format!("Scale-down factor {scale_down_factor}").into(),
        ]);
        printer.push_block(
            outputs
                .iter()
                .map(|f| format!("Writing to {}", f.display()).into())
                .collect(),
        );
        printer.display();

        display_warnings();

        Ok(SliceParams { slices, outputs })
    }

    pub(super) fn run(self, dry_run: bool) -> Result<(), SkyrollError> {
        debug!("Converting arguments into parameters");
        trace!("{:#?}", self);
        let params = self.parse()?;

        if dry_run {
            info!("Dry run -- exiting now.");
            return Ok(());
        }

        params.run()?;
        Ok(())
    }
}

struct SliceParams {
    slices: Vec1<Footprint>,
    outputs: Vec1<PathBuf>,
}

impl SliceParams {
    fn run(self) -> Result<(), SkyrollError> {
        for (slice, file) in self.slices.iter().zip(self.outputs.iter()) {
            write_footprint(slice, file)?;
            info!("Wrote {}", file.display());
        }
        Ok(())
    }
}

#[derive(thiserror::Error, Debug)]
pub(super) enum SliceArgsError {
    #[error("No footprint file was specified")]
    NoFootprint,
}

#[cfg(test)]
mod tests {
    use ndarray::array;
    use tempfile::tempdir;

    use super::*;
    use crate::skymap::Filter;

    fn write_test_footprint(file: &std::path::Path) {
        let footprint = Footprint::from([
            (Filter::R, array![1.0, 1.0, 1.0, 1.0, 0.3]),
            (Filter::I, array![1.0, 1.0, 1.0, 1.0, 0.25]),
        ]);
        write_footprint(&footprint, file).unwrap();
    }

    #[test]
    fn slice_outputs_sit_beside_the_input() {
        let tmp = tempdir().unwrap();
        let input = tmp.path().join("base_footprint.yaml");
        write_test_footprint(&input);

        let args = SliceArgs {
            footprint: Some(input),
            slices: Some(2),
            ..Default::default()
        };
        let params = args.parse().unwrap();
        assert_eq!(params.slices.len(), 2);
        assert_eq!(
            *params.outputs,
            vec![
                tmp.path().join("base_footprint_slice0.yaml"),
                tmp.path().join("base_footprint_slice1.yaml"),
            ]
        );
    }

    #[test]
    fn quad_slicing_gives_two_outputs() {
        let tmp = tempdir().unwrap();
        let input = tmp.path().join("base.json");
        write_test_footprint(&input);

        let args = SliceArgs {
            footprint: Some(input),
            slices: Some(5),
            quad: true,
            ..Default::default()
        };
        let params = args.parse().unwrap();
        // --quad wins over --slices.
        assert_eq!(params.slices.len(), 2);
        assert_eq!(params.outputs[0], tmp.path().join("base_slice0.json"));
    }

    #[test]
    fn a_missing_footprint_is_an_error() {
        let args = SliceArgs::default();
        assert!(matches!(args.parse(), Err(SkyrollError::MapRead(_))));
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Generate the full artifact set for a rolling-cadence run: the base
//! footprint, the rolling sequence, the WFD halves, the survey plan and the
//! run configuration.

use std::path::PathBuf;

use clap::Parser;
use itertools::Itertools;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};
use vec1::Vec1;

use super::common::{display_warnings, InfoPrinter, ARG_FILE_HELP, SCALE_DOWN_FACTOR_HELP};
use crate::{
    constants::{
        DDF_CAMERA_ROT_LIMIT_DEG, DEFAULT_DUST_LIMIT, DEFAULT_MAX_DITHER_DEG, DEFAULT_MAX_SEASON,
        DEFAULT_NEXP, DEFAULT_SCALE_DOWN_FACTOR, DEFAULT_SPLITS, DEFAULT_SURVEY_LENGTH_DAYS,
    },
    footprint::{big_sky_footprint, FilterWeights},
    io::{
        can_write_to_file, file_root, read_sky_grid, write_footprint, write_rolling_sequence,
        write_run_config, write_survey_plan, write_wfd_halves, RunConfig,
    },
    rolling::{
        slice_wfd_even, slice_wfd_quad, wfd_halves, RollingError, WfdRegion, REFERENCE_FILTER,
    },
    skymap::{Footprint, SkyMap},
    surveys::{
        generate_blob_surveys, generate_greedy_surveys, BlobOptions, GreedyOptions,
        RollingContext, SurveyPlan,
    },
    SkyrollError,
};

lazy_static::lazy_static! {
    static ref SURVEY_LENGTH_HELP: String =
        format!("The length of the simulated survey [days]. Default: {DEFAULT_SURVEY_LENGTH_DAYS}");

    static ref SPLITS_HELP: String =
        format!("The number of WFD bands to rotate over. 2 rolls over interleaved quad stripes, any other count over contiguous declination bands. Default: {DEFAULT_SPLITS}");

    static ref DUST_LIMIT_HELP: String =
        format!("Pixels with E(B-V) dust extinction at or above this value are excluded from the WFD region. Default: {DEFAULT_DUST_LIMIT}");

    static ref NEXP_HELP: String =
        format!("The number of exposures per visit. Default: {DEFAULT_NEXP}");

    static ref MAX_DITHER_HELP: String =
        format!("The maximum dither offset applied to deep-drilling fields [degrees]. Default: {DEFAULT_MAX_DITHER_DEG}");
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct GenerateArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    pub(super) args_file: Option<PathBuf>,

    /// Path to the sky grid file describing the healpix sampling: nside and
    /// the per-pixel RA, Dec and E(B-V) extinction.
    #[clap(short = 'g', long, parse(from_os_str), help_heading = "INPUT FILES")]
    pub(super) sky_grid: Option<PathBuf>,

    /// The directory to write the artifacts into. Default: the current
    /// directory.
    #[clap(short, long, parse(from_os_str), help_heading = "OUTPUT FILES")]
    pub(super) out_dir: Option<PathBuf>,

    #[clap(long, help = SURVEY_LENGTH_HELP.as_str(), help_heading = "ROLLING CADENCE")]
    pub(super) survey_length: Option<f64>,

    #[clap(short, long, help = SPLITS_HELP.as_str(), help_heading = "ROLLING CADENCE")]
    pub(super) splits: Option<usize>,

    #[clap(long, help = SCALE_DOWN_FACTOR_HELP.as_str(), help_heading = "ROLLING CADENCE")]
    pub(super) scale_down_factor: Option<f64>,

    #[clap(long, help = DUST_LIMIT_HELP.as_str(), help_heading = "ROLLING CADENCE")]
    pub(super) dust_limit: Option<f64>,

    #[clap(long, help = NEXP_HELP.as_str(), help_heading = "SURVEY PARAMETERS")]
    pub(super) nexp: Option<u32>,

    #[clap(long, help = MAX_DITHER_HELP.as_str(), help_heading = "DEEP DRILLING")]
    pub(super) max_dither: Option<f64>,

    /// Don't redraw the deep-drilling dither offsets each night.
    #[clap(long, help_heading = "DEEP DRILLING")]
    #[serde(default)]
    pub(super) no_per_night_dither: bool,

    /// Per-filter band weights overriding the built-in ones. These can only
    /// be given in an arguments file.
    #[clap(skip)]
    pub(super) filter_weights: Option<FilterWeights>,
}

impl GenerateArgs {
    /// Both command-line and file arguments overlap in terms of what is
    /// available; this function consolidates everything that was specified
    /// into a single struct. Where applicable, it will prefer CLI parameters
    /// over those in the file.
    ///
    /// This function should only ever merge arguments, and not try to make
    /// sense of them.
    pub(super) fn merge(self) -> Result<GenerateArgs, SkyrollError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            // Read in the file arguments. Ensure all of the file args are
            // accounted for by pattern matching.
            let GenerateArgs {
                args_file: _,
                sky_grid,
                out_dir,
                survey_length,
                splits,
                scale_down_factor,
                dust_limit,
                nexp,
                max_dither,
                no_per_night_dither,
                filter_weights,
            } = unpack_arg_file!(arg_file);

            // Merge all the arguments, preferring the CLI args when available.
            Ok(GenerateArgs {
                args_file: None,
                sky_grid: cli_args.sky_grid.or(sky_grid),
                out_dir: cli_args.out_dir.or(out_dir),
                survey_length: cli_args.survey_length.or(survey_length),
                splits: cli_args.splits.or(splits),
                scale_down_factor: cli_args.scale_down_factor.or(scale_down_factor),
                dust_limit: cli_args.dust_limit.or(dust_limit),
                nexp: cli_args.nexp.or(nexp),
                max_dither: cli_args.max_dither.or(max_dither),
                no_per_night_dither: cli_args.no_per_night_dither || no_per_night_dither,
                filter_weights: cli_args.filter_weights.or(filter_weights),
            })
        } else {
            Ok(cli_args)
        }
    }

    fn parse(self) -> Result<GenerateParams, SkyrollError> {
        debug!("{:#?}", self);

        // Expose all the struct fields to ensure they're all used.
        let GenerateArgs {
            args_file: _,
            sky_grid,
            out_dir,
            survey_length,
            splits,
            scale_down_factor,
            dust_limit,
            nexp,
            max_dither,
            no_per_night_dither,
            filter_weights,
        } = self;

        let sky_grid = match sky_grid {
            Some(f) => f,
            None => return Err(GenerateArgsError::NoSkyGrid.into()),
        };
        let survey_length = survey_length.unwrap_or(DEFAULT_SURVEY_LENGTH_DAYS);
        let splits = splits.unwrap_or(DEFAULT_SPLITS);
        let scale_down_factor = scale_down_factor.unwrap_or(DEFAULT_SCALE_DOWN_FACTOR);
        let dust_limit = dust_limit.unwrap_or(DEFAULT_DUST_LIMIT);
        let nexp = nexp.unwrap_or(DEFAULT_NEXP);
        let max_dither = max_dither.unwrap_or(DEFAULT_MAX_DITHER_DEG);
        let weights = filter_weights.unwrap_or_default();

        let grid = read_sky_grid(&sky_grid)?;
        let mut grid_printer = InfoPrinter::new("Sky grid info".into());
        grid_printer.push_line(format!("Read from {}", sky_grid.display()).into());
        grid_printer.push_line(
            format!("nside {} ({} pixels)", grid.nside(), grid.num_pixels()).into(),
        );
        grid_printer.display();

        let footprint = big_sky_footprint(&grid, &weights, dust_limit);
        let wfd = WfdRegion::from_footprint(&footprint)?;
        let counts = footprint.get_counts();
        let mut footprint_printer = InfoPrinter::new("Footprint info".into());
        footprint_printer.push_block(vec![
            format!(
                "{} filters: {}",
                counts.num_filters,
                footprint.keys().join(", ")
            )
            .into(),
            format!(
                "{} pixels per filter, {} carrying weight",
                counts.num_pixels, counts.num_covered
            )
            .into(),
            format!("Total weight over all filters: {:.2}", counts.total_weight).into(),
        ]);
        footprint_printer.push_line(
            format!(
                "{} WFD pixels selected on the '{REFERENCE_FILTER}' map",
                wfd.num_pixels()
            )
            .into(),
        );
        footprint_printer.display();

        // splits = 2 is the quad-stripe pattern; any other count slices into
        // contiguous declination bands.
        let slices = match splits {
            2 => slice_wfd_quad(&footprint, scale_down_factor)?,
            n => slice_wfd_even(&footprint, n, scale_down_factor)?,
        };
        let halves = match footprint.get(&REFERENCE_FILTER) {
            Some(reference) => wfd_halves(reference)?,
            None => return Err(RollingError::NoReferenceFilter.into()),
        };
        let context = RollingContext::new(&footprint, &wfd, splits, DEFAULT_MAX_SEASON);
        let mut rolling_printer = InfoPrinter::new("Rolling cadence info".into());
        rolling_printer.push_block(vec![
            if splits == 2 {
                "2 slices over interleaved quad stripes".into()
            } else {
                format!("{splits} slices over contiguous bands").into()
            },
            format!("Scale-down factor {scale_down_factor}").into(),
        ]);
        rolling_printer.push_line(
            format!(
                "Season modulo {}, rolling stops after season {}",
                context.season_modulo, context.max_season
            )
            .into(),
        );
        rolling_printer.display();

        let plan = SurveyPlan {
            blobs: generate_blob_surveys(&context, &BlobOptions::default()),
            greedy: generate_greedy_surveys(&context, &GreedyOptions::default()),
        };
        plan.check_against(&footprint)?;
        let mut survey_printer = InfoPrinter::new("Survey plan info".into());
        survey_printer.push_line(
            format!(
                "{} blob surveys, {} greedy surveys",
                plan.blobs.len(),
                plan.greedy.len()
            )
            .into(),
        );
        survey_printer.display();

        let root = file_root(splits, scale_down_factor, survey_length);
        let out_dir = out_dir.unwrap_or_else(|| PathBuf::from("."));
        let paths = ArtifactPaths {
            footprint: out_dir.join(format!("{root}_footprint.yaml")),
            rolling: out_dir.join(format!("{root}_rolling.yaml")),
            halves: out_dir.join(format!("{root}_wfd_halves.yaml")),
            plan: out_dir.join(format!("{root}_plan.json")),
            config: out_dir.join(format!("{root}.toml")),
        };
        for file in [
            &paths.footprint,
            &paths.rolling,
            &paths.halves,
            &paths.plan,
            &paths.config,
        ] {
            can_write_to_file(file)?;
        }
        let mut output_printer = InfoPrinter::new("Output info".into());
        output_printer.push_block(vec![
            format!("Footprint:        {}", paths.footprint.display()).into(),
            format!("Rolling sequence: {}", paths.rolling.display()).into(),
            format!("WFD halves:       {}", paths.halves.display()).into(),
            format!("Survey plan:      {}", paths.plan.display()).into(),
            format!("Run config:       {}", paths.config.display()).into(),
        ]);
        output_printer.display();

        // The runner expects the base map after the slices.
        let rolling_sequence = {
            let mut maps = slices.into_vec();
            maps.push(footprint.clone());
            Vec1::try_from_vec(maps).expect("contains at least the base map")
        };

        let config = RunConfig {
            survey_length,
            nside: grid.nside(),
            splits,
            scale_down_factor,
            max_season: DEFAULT_MAX_SEASON,
            dust_limit,
            nexp,
            max_dither,
            per_night_dither: !no_per_night_dither,
            ddf_camera_rot_limit: DDF_CAMERA_ROT_LIMIT_DEG,
            file_root: root,
        };

        display_warnings();

        Ok(GenerateParams {
            footprint,
            rolling_sequence,
            halves,
            plan,
            config,
            paths,
        })
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

struct GenerateParams {
    footprint: Footprint,
    rolling_sequence: Vec1<Footprint>,
    halves: [SkyMap; 2],
    plan: SurveyPlan,
    config: RunConfig,
    paths: ArtifactPaths,
}

struct ArtifactPaths {
    footprint: PathBuf,
    rolling: PathBuf,
    halves: PathBuf,
    plan: PathBuf,
    config: PathBuf,
}

impl GenerateParams {
    fn run(self) -> Result<(), SkyrollError> {
        let GenerateParams {
            footprint,
            rolling_sequence,
            halves,
            plan,
            config,
            paths,
        } = self;

        write_footprint(&footprint, &paths.footprint)?;
        info!("Wrote the base footprint to {}", paths.footprint.display());
        write_rolling_sequence(&rolling_sequence, &paths.rolling)?;
        info!("Wrote the rolling sequence to {}", paths.rolling.display());
        write_wfd_halves(&halves, &paths.halves)?;
        info!("Wrote the WFD halves to {}", paths.halves.display());
        write_survey_plan(&plan, &paths.plan)?;
        info!("Wrote the survey plan to {}", paths.plan.display());
        write_run_config(&config, &paths.config)?;
        info!("Wrote the run configuration to {}", paths.config.display());

        Ok(())
    }
}

#[derive(thiserror::Error, Debug)]
pub(super) enum GenerateArgsError {
    #[error("No sky grid file was specified")]
    NoSkyGrid,
}

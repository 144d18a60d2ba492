// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Survey blueprint assembly.
//!
//! A blueprint names the decision functions a survey scores the sky with and
//! the weights they carry; evaluating them against live conditions is the
//! external scheduler's job. Everything here is plain serializable data, so
//! a run's decision-making inputs can be inspected and diffed without
//! touching the scheduler.


use serde::{Deserialize, Serialize};
use thiserror::Error;
use vec1::{vec1, Vec1};

use crate::{
    rolling::WfdRegion,
    skymap::{Filter, Footprint},
};

/// The rolling-cadence context shared by every generated survey.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RollingContext {
    /// Seasons are assigned to rolling maps modulo this count.
    pub season_modulo: usize,

    /// Rolling stops after this season; later seasons use the base map.
    pub max_season: u32,

    /// The base footprint summed over every pixel of every filter.
    pub all_footprints_sum: f64,

    /// The base footprint summed over the WFD pixels of every filter.
    pub all_rolling_sum: f64,
}

impl RollingContext {
    /// Compute the normalization sums from the base (un-sliced) footprint.
    pub fn new(
        base: &Footprint,
        wfd: &WfdRegion,
        season_modulo: usize,
        max_season: u32,
    ) -> RollingContext {
        RollingContext {
            season_modulo,
            max_season,
            all_footprints_sum: base.total_sum(),
            all_rolling_sum: base.sum_over(wfd.indices()),
        }
    }

    fn footprint_basis(&self, filter: Filter) -> BasisFunction {
        BasisFunction::FootprintRolling {
            filter,
            season_modulo: self.season_modulo,
            max_season: self.max_season,
            all_footprints_sum: self.all_footprints_sum,
            all_rolling_sum: self.all_rolling_sum,
        }
    }
}

/// A decision-function specification.
///
/// The map-carrying functions don't embed their maps; `FootprintRolling`
/// reads the rolling-sequence artifact (base map last), `NObsPerYear` the
/// base map, and `MapModulo` the WFD-halves artifact. The runner supplies
/// the per-night day offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BasisFunction {
    /// Five-sigma-depth difference from the best achievable.
    M5Diff { filter: Filter },

    /// Season-aware footprint chasing over the rolling map sequence.
    FootprintRolling {
        filter: Filter,
        season_modulo: usize,
        max_season: u32,
        all_footprints_sum: f64,
        all_rolling_sum: f64,
    },

    /// Penalize slew time to each pixel.
    Slewtime { filter: Filter },

    /// Reward staying in the currently loaded filter.
    StrictFilter { filter: Filter },

    /// Alternate emphasis between the WFD-halves masks by season parity.
    MapModulo,

    /// Reward collecting template images in-season.
    NObsPerYear {
        filter: Filter,
        n_obs: u32,
        /// \[days\]
        season: f64,
        /// \[hours\]
        season_start_hour: f64,
        /// \[hours\]
        season_end_hour: f64,
    },

    /// Mask pixels that will pass near zenith within the lookahead window.
    ZenithShadowMask {
        /// \[minutes\]
        shadow_minutes: f64,
        /// \[degrees\]
        max_alt: f64,
    },

    /// Mask pixels near the moon.
    MoonAvoidance {
        /// \[degrees\]
        moon_distance: f64,
    },

    /// Mask everything unless these filters are loaded in the carousel.
    FilterLoaded { filters: Vec1<Filter> },

    /// Mask everything when twilight is closer than the time needed.
    TimeToTwilight {
        /// \[minutes\]
        time_needed: f64,
    },

    /// Mask everything during twilight.
    NotTwilight,

    /// Mask pixels near bright planets.
    PlanetMask,
}

impl BasisFunction {
    /// The filters this decision function needs maps for.
    fn filters(&self) -> Vec<Filter> {
        match self {
            BasisFunction::M5Diff { filter }
            | BasisFunction::FootprintRolling { filter, .. }
            | BasisFunction::Slewtime { filter }
            | BasisFunction::StrictFilter { filter }
            | BasisFunction::NObsPerYear { filter, .. } => vec![*filter],
            BasisFunction::FilterLoaded { filters } => filters.to_vec(),
            BasisFunction::MapModulo
            | BasisFunction::ZenithShadowMask { .. }
            | BasisFunction::MoonAvoidance { .. }
            | BasisFunction::TimeToTwilight { .. }
            | BasisFunction::NotTwilight
            | BasisFunction::PlanetMask => vec![],
        }
    }
}

/// A decision function and the weight its score carries. Masks get weight 0;
/// they veto pixels without steering the choice among the survivors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedBasis {
    pub function: BasisFunction,
    pub weight: f64,
}

/// Observation post-processing steps applied by the runner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DetailerSpec {
    /// Randomize the camera rotator angle within limits.
    CameraRot {
        /// \[degrees\]
        min_rot: f64,
        /// \[degrees\]
        max_rot: f64,
    },

    /// Reorder observations to start near the current altitude.
    CloseAlt,

    /// Repeat the blob in a second filter.
    TakeAsPairs { filter: Filter },

    /// Spatially dither pointings.
    Dither {
        per_night: bool,
        /// \[degrees\]
        max_dither: f64,
    },
}

/// A survey that greedily picks the best pixel each visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GreedySurvey {
    pub survey_name: String,
    pub filter: Filter,
    /// \[seconds\]
    pub exptime: f64,
    pub nexp: u32,
    pub block_size: u32,
    pub seed: u64,
    pub dither: bool,
    /// Observations from surveys whose name contains this substring don't
    /// count towards this survey's progress.
    pub ignore_obs: String,
    pub basis_functions: Vec1<WeightedBasis>,
    pub detailers: Vec<DetailerSpec>,
}

/// A survey that observes contiguous blobs of sky, optionally twice in a
/// filter pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlobSurvey {
    pub survey_name: String,
    pub filter1: Filter,
    pub filter2: Option<Filter>,
    /// \[seconds\]
    pub exptime: f64,
    pub nexp: u32,
    /// \[minutes\]
    pub ideal_pair_time: f64,
    pub ignore_obs: String,
    pub params: BlobParams,
    pub basis_functions: Vec1<WeightedBasis>,
    pub detailers: Vec<DetailerSpec>,
}

/// Blob scheduling approximations; how long the runner should assume
/// telescope overheads take when sizing a blob.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlobParams {
    /// \[seconds\]
    pub slew_approx: f64,
    /// \[seconds\]
    pub filter_change_approx: f64,
    /// \[seconds\]
    pub read_approx: f64,
    /// \[minutes\]
    pub min_pair_time: f64,
    /// \[degrees\]
    pub search_radius: f64,
    /// \[degrees\]
    pub alt_max: f64,
    /// \[degrees\]
    pub az_range: f64,
    /// \[minutes\]
    pub flush_time: f64,
    pub seed: u64,
    pub dither: bool,
    pub twilight_scale: bool,
}

impl Default for BlobParams {
    fn default() -> Self {
        BlobParams {
            slew_approx: 7.5,
            filter_change_approx: 140.0,
            read_approx: 2.0,
            min_pair_time: 15.0,
            search_radius: 30.0,
            alt_max: 85.0,
            az_range: 90.0,
            flush_time: 30.0,
            seed: 42,
            dither: true,
            twilight_scale: true,
        }
    }
}

/// Options for [`generate_greedy_surveys`].
#[derive(Debug, Clone, PartialEq)]
pub struct GreedyOptions {
    pub filters: Vec1<Filter>,
    /// \[seconds\]
    pub exptime: f64,
    pub nexp: u32,
    /// \[degrees\]
    pub camera_rot_limits: [f64; 2],
    /// \[minutes\]
    pub shadow_minutes: f64,
    /// \[degrees\]
    pub max_alt: f64,
    /// \[degrees\]
    pub moon_distance: f64,
    pub ignore_obs: String,
    pub m5_weight: f64,
    pub footprint_weight: f64,
    pub slewtime_weight: f64,
    pub stayfilter_weight: f64,
    pub roll_weight: f64,
}

impl Default for GreedyOptions {
    fn default() -> Self {
        GreedyOptions {
            filters: vec1![Filter::R, Filter::I, Filter::Z, Filter::Y],
            exptime: 30.0,
            nexp: 1,
            camera_rot_limits: [-80.0, 80.0],
            shadow_minutes: 60.0,
            max_alt: 76.0,
            moon_distance: 30.0,
            ignore_obs: "DD".to_string(),
            m5_weight: 3.0,
            footprint_weight: 0.3,
            slewtime_weight: 3.0,
            stayfilter_weight: 3.0,
            roll_weight: 3.0,
        }
    }
}

/// Options for [`generate_blob_surveys`].
#[derive(Debug, Clone, PartialEq)]
pub struct BlobOptions {
    /// First and (optional) second filter of each blob survey.
    pub filter_pairs: Vec1<(Filter, Option<Filter>)>,
    /// \[seconds\]
    pub exptime: f64,
    pub nexp: u32,
    /// The ideal time between the two visits of a pair \[minutes\].
    pub pair_time: f64,
    /// \[degrees\]
    pub camera_rot_limits: [f64; 2],
    /// Template observations wanted per season.
    pub n_obs_template: u32,
    /// Season length before templates expire \[days\].
    pub season: f64,
    /// \[hours\]
    pub season_start_hour: f64,
    /// \[hours\]
    pub season_end_hour: f64,
    /// \[minutes\]
    pub shadow_minutes: f64,
    /// \[degrees\]
    pub max_alt: f64,
    /// \[degrees\]
    pub moon_distance: f64,
    pub ignore_obs: String,
    pub m5_weight: f64,
    pub footprint_weight: f64,
    pub slewtime_weight: f64,
    pub stayfilter_weight: f64,
    pub template_weight: f64,
    pub roll_weight: f64,
    pub params: BlobParams,
}

impl Default for BlobOptions {
    fn default() -> Self {
        BlobOptions {
            filter_pairs: vec1![
                (Filter::U, None),
                (Filter::G, Some(Filter::R)),
                (Filter::R, Some(Filter::I)),
                (Filter::I, Some(Filter::Z)),
                (Filter::Z, None),
                (Filter::Y, None),
            ],
            exptime: 30.0,
            nexp: 1,
            pair_time: 22.0,
            camera_rot_limits: [-80.0, 80.0],
            n_obs_template: 3,
            season: 300.0,
            season_start_hour: -4.0,
            season_end_hour: 2.0,
            shadow_minutes: 60.0,
            max_alt: 76.0,
            moon_distance: 30.0,
            ignore_obs: "DD".to_string(),
            m5_weight: 6.0,
            footprint_weight: 0.6,
            slewtime_weight: 3.0,
            stayfilter_weight: 3.0,
            template_weight: 12.0,
            roll_weight: 3.0,
            params: BlobParams::default(),
        }
    }
}

/// One greedy survey per filter, with the weights and masks of the
/// alt-scheduler baseline.
pub fn generate_greedy_surveys(
    rolling: &RollingContext,
    options: &GreedyOptions,
) -> Vec1<GreedySurvey> {
    let detailer = camera_rot_detailer(options.camera_rot_limits);
    options.filters.mapped_ref(|&filter| {
        let basis_functions = vec1![
            WeightedBasis {
                function: BasisFunction::M5Diff { filter },
                weight: options.m5_weight,
            },
            WeightedBasis {
                function: rolling.footprint_basis(filter),
                weight: options.footprint_weight,
            },
            WeightedBasis {
                function: BasisFunction::Slewtime { filter },
                weight: options.slewtime_weight,
            },
            WeightedBasis {
                function: BasisFunction::StrictFilter { filter },
                weight: options.stayfilter_weight,
            },
            WeightedBasis {
                function: BasisFunction::MapModulo,
                weight: options.roll_weight,
            },
            // Masks.
            WeightedBasis {
                function: BasisFunction::ZenithShadowMask {
                    shadow_minutes: options.shadow_minutes,
                    max_alt: options.max_alt,
                },
                weight: 0.0,
            },
            WeightedBasis {
                function: BasisFunction::MoonAvoidance {
                    moon_distance: options.moon_distance,
                },
                weight: 0.0,
            },
            WeightedBasis {
                function: BasisFunction::FilterLoaded {
                    filters: vec1![filter],
                },
                weight: 0.0,
            },
            WeightedBasis {
                function: BasisFunction::PlanetMask,
                weight: 0.0,
            },
        ];

        GreedySurvey {
            survey_name: "greedy".to_string(),
            filter,
            exptime: options.exptime,
            nexp: options.nexp,
            block_size: 1,
            seed: 42,
            dither: true,
            ignore_obs: options.ignore_obs.clone(),
            basis_functions,
            detailers: vec![detailer],
        }
    })
}

/// One blob survey per filter pair; paired surveys split the per-filter
/// weights in half and double the twilight guard.
pub fn generate_blob_surveys(rolling: &RollingContext, options: &BlobOptions) -> Vec1<BlobSurvey> {
    options.filter_pairs.mapped_ref(|&(filter1, filter2)| {
        let half = |weight: f64| {
            if filter2.is_some() {
                weight / 2.0
            } else {
                weight
            }
        };

        let mut basis_functions = vec1![WeightedBasis {
            function: BasisFunction::M5Diff { filter: filter1 },
            weight: half(options.m5_weight),
        }];
        if let Some(filter2) = filter2 {
            basis_functions.push(WeightedBasis {
                function: BasisFunction::M5Diff { filter: filter2 },
                weight: half(options.m5_weight),
            });
        }

        basis_functions.push(WeightedBasis {
            function: rolling.footprint_basis(filter1),
            weight: half(options.footprint_weight),
        });
        if let Some(filter2) = filter2 {
            basis_functions.push(WeightedBasis {
                function: rolling.footprint_basis(filter2),
                weight: half(options.footprint_weight),
            });
        }

        basis_functions.push(WeightedBasis {
            function: BasisFunction::Slewtime { filter: filter1 },
            weight: options.slewtime_weight,
        });
        basis_functions.push(WeightedBasis {
            function: BasisFunction::StrictFilter { filter: filter1 },
            weight: options.stayfilter_weight,
        });

        basis_functions.push(template_basis(filter1, options, half(options.template_weight)));
        if let Some(filter2) = filter2 {
            basis_functions.push(template_basis(
                filter2,
                options,
                half(options.template_weight),
            ));
        }

        basis_functions.push(WeightedBasis {
            function: BasisFunction::MapModulo,
            weight: options.roll_weight,
        });

        // Masks.
        basis_functions.push(WeightedBasis {
            function: BasisFunction::ZenithShadowMask {
                shadow_minutes: options.shadow_minutes,
                max_alt: options.max_alt,
            },
            weight: 0.0,
        });
        basis_functions.push(WeightedBasis {
            function: BasisFunction::MoonAvoidance {
                moon_distance: options.moon_distance,
            },
            weight: 0.0,
        });
        let mut loaded = vec1![filter1];
        if let Some(filter2) = filter2 {
            loaded.push(filter2);
        }
        basis_functions.push(WeightedBasis {
            function: BasisFunction::FilterLoaded { filters: loaded },
            weight: 0.0,
        });
        let time_needed = if filter2.is_some() {
            options.pair_time * 2.0
        } else {
            options.pair_time
        };
        basis_functions.push(WeightedBasis {
            function: BasisFunction::TimeToTwilight { time_needed },
            weight: 0.0,
        });
        basis_functions.push(WeightedBasis {
            function: BasisFunction::NotTwilight,
            weight: 0.0,
        });
        basis_functions.push(WeightedBasis {
            function: BasisFunction::PlanetMask,
            weight: 0.0,
        });

        let survey_name = match filter2 {
            Some(filter2) => format!("blob, {filter1}{filter2}"),
            None => format!("blob, {filter1}"),
        };

        let mut detailers = vec![
            camera_rot_detailer(options.camera_rot_limits),
            DetailerSpec::CloseAlt,
        ];
        if let Some(filter2) = filter2 {
            detailers.push(DetailerSpec::TakeAsPairs { filter: filter2 });
        }

        BlobSurvey {
            survey_name,
            filter1,
            filter2,
            exptime: options.exptime,
            nexp: options.nexp,
            ideal_pair_time: options.pair_time,
            ignore_obs: options.ignore_obs.clone(),
            params: options.params,
            basis_functions,
            detailers,
        }
    })
}

fn template_basis(filter: Filter, options: &BlobOptions, weight: f64) -> WeightedBasis {
    WeightedBasis {
        function: BasisFunction::NObsPerYear {
            filter,
            n_obs: options.n_obs_template,
            season: options.season,
            season_start_hour: options.season_start_hour,
            season_end_hour: options.season_end_hour,
        },
        weight,
    }
}

fn camera_rot_detailer(limits: [f64; 2]) -> DetailerSpec {
    DetailerSpec::CameraRot {
        min_rot: limits[0].min(limits[1]),
        max_rot: limits[0].max(limits[1]),
    }
}

/// The ordered blueprints a run hands to the external scheduler.
///
/// Tier order matters: blob surveys are offered first and greedy surveys
/// fill the gaps. Deep-drilling surveys are built and prepended by the
/// runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyPlan {
    pub blobs: Vec1<BlobSurvey>,
    pub greedy: Vec1<GreedySurvey>,
}

impl SurveyPlan {
    pub fn num_surveys(&self) -> usize {
        self.blobs.len() + self.greedy.len()
    }

    /// Check that every filter the plan references has a map in the
    /// footprint its artifacts are written alongside.
    pub fn check_against(&self, footprint: &Footprint) -> Result<(), SurveyError> {
        let check = |survey_name: &str, filters: Vec<Filter>| {
            for filter in filters {
                if !footprint.contains_key(&filter) {
                    return Err(SurveyError::MissingFilter {
                        survey: survey_name.to_string(),
                        filter,
                    });
                }
            }
            Ok(())
        };

        for blob in &self.blobs {
            let mut filters = vec![blob.filter1];
            filters.extend(blob.filter2);
            for weighted in &blob.basis_functions {
                filters.extend(weighted.function.filters());
            }
            check(&blob.survey_name, filters)?;
        }
        for greedy in &self.greedy {
            let mut filters = vec![greedy.filter];
            for weighted in &greedy.basis_functions {
                filters.extend(weighted.function.filters());
            }
            check(&greedy.survey_name, filters)?;
        }
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum SurveyError {
    #[error("Survey '{survey}' needs a '{filter}' map, but the footprint has none")]
    MissingFilter { survey: String, filter: Filter },
}

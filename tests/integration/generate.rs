// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tests against the command-line interface for artifact generation.

use approx::assert_abs_diff_eq;

use crate::*;
use skyroll::io::{
    read_footprint, read_rolling_sequence, read_survey_plan, read_wfd_halves, RunConfig,
};

#[test]
fn test_help_is_correct() {
    // First with --help
    let cmd = skyroll().arg("--help").ok();
    assert!(cmd.is_ok());
    let (stdout, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty());
    assert!(stdout.contains("generate"));
    assert!(stdout.contains("slice"));
    assert!(stdout.contains("verify"));

    // Second with -h
    let cmd = skyroll().arg("-h").ok();
    assert!(cmd.is_ok());
    let (stdout, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty());
    assert!(stdout.contains("generate"));
    assert!(stdout.contains("slice"));
    assert!(stdout.contains("verify"));
}

#[test]
fn test_generate_writes_the_full_artifact_set() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir").into_path();
    let grid = write_test_grid(&tmp_dir);

    #[rustfmt::skip]
    let cmd = skyroll()
        .args(&[
            "generate",
            "--sky-grid", &format!("{}", grid.display()),
            "--out-dir", &format!("{}", tmp_dir.display()),
        ])
        .ok();
    assert!(cmd.is_ok());
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("Wrote the base footprint"));
    assert!(stdout.contains("skyroll generate complete."));

    // Default splits and scale-down factor over a 10-year survey.
    let footprint_file = tmp_dir.join("roll_mod2_dust_sdf_0.20_10yrs_footprint.yaml");
    let rolling_file = tmp_dir.join("roll_mod2_dust_sdf_0.20_10yrs_rolling.yaml");
    let halves_file = tmp_dir.join("roll_mod2_dust_sdf_0.20_10yrs_wfd_halves.yaml");
    let plan_file = tmp_dir.join("roll_mod2_dust_sdf_0.20_10yrs_plan.json");
    let config_file = tmp_dir.join("roll_mod2_dust_sdf_0.20_10yrs.toml");
    for file in [
        &footprint_file,
        &rolling_file,
        &halves_file,
        &plan_file,
        &config_file,
    ] {
        assert!(file.exists(), "{} is missing", file.display());
    }

    let footprint = read_footprint(&footprint_file).unwrap();
    assert_eq!(footprint.len(), 6);
    assert_eq!(footprint.num_pixels(), Some(12));

    // Two rolled maps plus the base map, and rolling is budget neutral, so
    // the slices sum to the base map doubled.
    let sequence = read_rolling_sequence(&rolling_file).unwrap();
    assert_eq!(sequence.len(), 3);
    assert_eq!(sequence.last(), &footprint);
    for (filter, base_map) in footprint.iter() {
        let rolled = &sequence[0][filter] + &sequence[1][filter];
        assert_abs_diff_eq!(rolled, base_map * 2.0, epsilon = 1e-12);
    }

    // Each of the four WFD pixels is marked in exactly one half.
    let [first, second] = read_wfd_halves(&halves_file).unwrap();
    assert_eq!(first.len(), 12);
    assert_eq!(second.len(), 12);
    assert_abs_diff_eq!(first.sum() + second.sum(), -4.0, epsilon = 1e-12);

    let plan = read_survey_plan(&plan_file).unwrap();
    assert_eq!(plan.blobs.len(), 6);
    assert_eq!(plan.greedy.len(), 4);

    let config: RunConfig =
        toml::from_str(&std::fs::read_to_string(&config_file).unwrap()).unwrap();
    assert_eq!(config.nside, 1);
    assert_eq!(config.splits, 2);
    assert_abs_diff_eq!(config.scale_down_factor, 0.2);
    assert!(config.per_night_dither);
    assert_eq!(config.file_root, "roll_mod2_dust_sdf_0.20_10yrs");
}

#[test]
fn test_three_splits_roll_over_three_bands() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir").into_path();
    let grid = write_test_grid(&tmp_dir);

    #[rustfmt::skip]
    let cmd = skyroll()
        .args(&[
            "generate",
            "--sky-grid", &format!("{}", grid.display()),
            "--out-dir", &format!("{}", tmp_dir.display()),
            "--splits", "3",
        ])
        .ok();
    assert!(cmd.is_ok());

    let rolling_file = tmp_dir.join("roll_mod3_dust_sdf_0.20_10yrs_rolling.yaml");
    assert!(rolling_file.exists());
    let sequence = read_rolling_sequence(&rolling_file).unwrap();
    assert_eq!(sequence.len(), 4);
}

#[test]
fn test_dry_run_probes_but_writes_nothing() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir").into_path();
    let grid = write_test_grid(&tmp_dir);

    #[rustfmt::skip]
    let cmd = skyroll()
        .args(&[
            "generate",
            "--sky-grid", &format!("{}", grid.display()),
            "--out-dir", &format!("{}", tmp_dir.display()),
            "--dry-run",
        ])
        .ok();
    assert!(cmd.is_ok());
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("Dry run"));

    for name in [
        "roll_mod2_dust_sdf_0.20_10yrs_footprint.yaml",
        "roll_mod2_dust_sdf_0.20_10yrs_rolling.yaml",
        "roll_mod2_dust_sdf_0.20_10yrs_wfd_halves.yaml",
        "roll_mod2_dust_sdf_0.20_10yrs_plan.json",
        "roll_mod2_dust_sdf_0.20_10yrs.toml",
    ] {
        assert!(!tmp_dir.join(name).exists(), "{name} exists after a dry run");
    }
}

#[test]
fn test_saved_arguments_can_be_replayed() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir").into_path();
    let grid = write_test_grid(&tmp_dir);
    let args_file = tmp_dir.join("run.toml");

    // Save the merged arguments during a dry run.
    #[rustfmt::skip]
    let cmd = skyroll()
        .args(&[
            "generate",
            "--sky-grid", &format!("{}", grid.display()),
            "--out-dir", &format!("{}", tmp_dir.display()),
            "--splits", "3",
            "--dry-run",
            "--save-toml", &format!("{}", args_file.display()),
        ])
        .ok();
    assert!(cmd.is_ok());
    assert!(args_file.exists());

    // Replaying the file alone reproduces the run.
    let cmd = skyroll()
        .args(&["generate", &format!("{}", args_file.display())])
        .ok();
    assert!(cmd.is_ok());
    assert!(tmp_dir.join("roll_mod3_dust_sdf_0.20_10yrs_plan.json").exists());
}

#[test]
fn test_no_sky_grid_is_an_error() {
    let cmd = skyroll().args(&["generate", "--splits", "3"]).ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("No sky grid file was specified"));
}

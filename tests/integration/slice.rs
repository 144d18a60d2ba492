// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tests against the command-line interface for footprint slicing.

use approx::assert_abs_diff_eq;

use crate::*;
use skyroll::io::read_footprint;

#[test]
fn test_slices_land_beside_the_input() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir").into_path();
    let footprint_file = write_test_footprint(tmp_dir.join("base.yaml"));

    #[rustfmt::skip]
    let cmd = skyroll()
        .args(&[
            "slice",
            "--footprint", &format!("{}", footprint_file.display()),
            "--slices", "2",
        ])
        .ok();
    assert!(cmd.is_ok());
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("skyroll slice complete."));

    // Budget neutrality at the file level: the slices sum to the base map
    // multiplied by the slice count, on every filter.
    let base = read_footprint(&footprint_file).unwrap();
    let slice0 = read_footprint(&tmp_dir.join("base_slice0.yaml")).unwrap();
    let slice1 = read_footprint(&tmp_dir.join("base_slice1.yaml")).unwrap();
    for (filter, base_map) in base.iter() {
        let rolled = &slice0[filter] + &slice1[filter];
        assert_abs_diff_eq!(rolled, base_map * 2.0, epsilon = 1e-12);
    }
}

#[test]
fn test_quad_slicing_produces_two_files() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir").into_path();
    let footprint_file = write_test_footprint(tmp_dir.join("quad.json"));

    #[rustfmt::skip]
    let cmd = skyroll()
        .args(&[
            "slice",
            "--footprint", &format!("{}", footprint_file.display()),
            "--quad",
        ])
        .ok();
    assert!(cmd.is_ok());

    // The outputs keep the input's file type.
    let slice0 = read_footprint(&tmp_dir.join("quad_slice0.json")).unwrap();
    let slice1 = read_footprint(&tmp_dir.join("quad_slice1.json")).unwrap();
    assert!(!tmp_dir.join("quad_slice2.json").exists());

    let base = read_footprint(&footprint_file).unwrap();
    for (filter, base_map) in base.iter() {
        let rolled = &slice0[filter] + &slice1[filter];
        assert_abs_diff_eq!(rolled, base_map * 2.0, epsilon = 1e-12);
    }
}

#[test]
fn test_unrecognised_footprint_extension_is_an_error() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir").into_path();
    let file = tmp_dir.join("base.txt");
    let mut f = File::create(&file).expect("couldn't make file");
    f.write_all(b"r: [1.0]\n").unwrap();

    let cmd = skyroll()
        .args(&["slice", "--footprint", &format!("{}", file.display())])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("Unrecognised file extension"));
}

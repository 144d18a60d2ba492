// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tests against the command-line interface for footprint verification.

use crate::*;

#[test]
fn test_verify_prints_footprint_stats() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir").into_path();
    let footprint_file = write_test_footprint(tmp_dir.join("base.yaml"));

    let cmd = skyroll()
        .args(&["verify", &format!("{}", footprint_file.display())])
        .ok();
    assert!(cmd.is_ok());
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("3 filters (r, i, u), 6 pixels per filter"));
    assert!(stdout.contains("4 WFD pixels"));
    assert!(stdout.contains("5 pixels carrying weight, total weight 9.94"));
    assert!(stdout.contains("r: sum 4.30"));
}

#[test]
fn test_verify_continues_past_a_bad_file() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir").into_path();
    let bad_file = tmp_dir.join("bad.yaml");
    let mut f = File::create(&bad_file).expect("couldn't make file");
    f.write_all(b"r: [1.0, oops\n").unwrap();
    let good_file = write_test_footprint(tmp_dir.join("good.yaml"));

    #[rustfmt::skip]
    let cmd = skyroll()
        .args(&[
            "verify",
            &format!("{}", bad_file.display()),
            &format!("{}", good_file.display()),
        ])
        .ok();
    // A bad file is reported, not fatal.
    assert!(cmd.is_ok());
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("bad.yaml:"));
    assert!(stdout.contains("good.yaml:"));
    assert!(stdout.contains("4 WFD pixels"));
}

#[test]
fn test_verify_without_files_fails() {
    let cmd = skyroll().arg("verify").ok();
    assert!(cmd.is_err());
}

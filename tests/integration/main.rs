// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Integration tests.
//!
//! Some help for laying out these tests was taken from:
//! https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html

mod generate;
mod slice;
mod verify;

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::str::from_utf8;

use assert_cmd::{output::OutputError, Command};
use indoc::indoc;
use ndarray::array;
use tempfile::TempDir;

use skyroll::io::write_footprint;
use skyroll::skymap::{Filter, Footprint};

fn skyroll() -> Command {
    Command::cargo_bin("skyroll").unwrap()
}

fn get_cmd_output(result: Result<Output, OutputError>) -> (String, String) {
    let output = match result {
        Ok(o) => o,
        Err(o) => o.as_output().unwrap().clone(),
    };
    (
        from_utf8(&output.stdout).unwrap().to_string(),
        from_utf8(&output.stderr).unwrap().to_string(),
    )
}

/// Write a small nside-1 sky grid with four WFD pixels (4, 7, 10 and 11);
/// the others sit too far north, too dusty or in the southern extension.
fn write_test_grid<P: AsRef<Path>>(dir: P) -> PathBuf {
    let file = dir.as_ref().join("grid.yaml");
    let mut f = File::create(&file).expect("couldn't make file");
    f.write_all(
        indoc! {r#"
            nside: 1
            ra_deg: [0.0, 30.0, 60.0, 90.0, 120.0, 150.0, 180.0, 210.0, 240.0, 270.0, 300.0, 330.0]
            dec_deg: [40.0, 30.0, 20.0, 12.4, 0.0, 0.0, 0.0, -40.0, -72.25, -80.0, 5.0, -60.0]
            ebv: [0.01, 0.01, 0.01, 0.01, 0.01, 0.19, 0.5, 0.05, 0.01, 0.01, 0.18, 0.01]
        "#}
        .as_bytes(),
    )
    .unwrap();
    file
}

/// Write a six-pixel footprint with four WFD pixels on the reference map.
fn write_test_footprint<P: AsRef<Path>>(file: P) -> PathBuf {
    let footprint = Footprint::from([
        (Filter::R, array![1.0, 1.0, 1.0, 1.0, 0.3, 0.0]),
        (Filter::I, array![1.0, 1.0, 1.0, 1.0, 0.25, 0.0]),
        (Filter::U, array![0.31, 0.31, 0.31, 0.31, 0.15, 0.0]),
    ]);
    write_footprint(&footprint, file.as_ref()).unwrap();
    file.as_ref().to_path_buf()
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to verify footprint files.

use std::path::{Path, PathBuf};

use clap::Parser;
use itertools::Itertools;
use log::info;

use crate::{io::read_footprint, rolling::WfdRegion, SkyrollError};

/// Verify that footprint files can be read by skyroll.
#[derive(Parser, Debug)]
pub(super) struct VerifyArgs {
    /// Path to the footprint file(s) to be verified.
    #[clap(name = "MAP_FILES", parse(from_os_str))]
    files: Vec<PathBuf>,
}

impl VerifyArgs {
    /// Run [verify] with these arguments.
    pub(super) fn run(&self) -> Result<(), SkyrollError> {
        verify(&self.files)
    }
}

/// Read and print stats out for each input footprint. If a file couldn't be
/// read, print the error, and continue trying to read the other files.
fn verify<P: AsRef<Path>>(files: &[P]) -> Result<(), SkyrollError> {
    if files.is_empty() {
        info!("No files were supplied!");
        std::process::exit(1);
    }

    for file in files {
        let file = file.as_ref();
        info!("{}:", file.display());

        let footprint = match read_footprint(file) {
            Ok(f) => f,
            Err(e) => {
                info!("{}", e);
                info!("");
                continue;
            }
        };
        let counts = footprint.get_counts();
        info!(
            "    {} filters ({}), {} pixels per filter",
            counts.num_filters,
            footprint.keys().join(", "),
            counts.num_pixels
        );
        match WfdRegion::from_footprint(&footprint) {
            Ok(wfd) => info!("    {} WFD pixels", wfd.num_pixels()),
            Err(e) => info!("    No WFD region: {e}"),
        }
        info!(
            "    {} pixels carrying weight, total weight {:.2}",
            counts.num_covered, counts.total_weight
        );
        for (filter, map) in footprint.iter() {
            info!("    {filter}: sum {:.2}", map.sum());
        }
        info!("");
    }

    Ok(())
}

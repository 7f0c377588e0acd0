// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store::LoadPolicy;

pub mod categories;
pub mod doctor;
pub mod summary;
pub mod transactions;

/// Load policy selected by the global `--skip-invalid` flag.
pub fn load_policy(m: &clap::ArgMatches) -> LoadPolicy {
    let skip = m
        .try_get_one::<bool>("skip_invalid")
        .ok()
        .flatten()
        .copied()
        .unwrap_or(false);
    if skip {
        LoadPolicy::SkipInvalid
    } else {
        LoadPolicy::Strict
    }
}

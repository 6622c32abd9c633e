// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

struct AlwaysEmpty;

impl Validator for AlwaysEmpty {
    fn check_data(&self, _dataset: &DeviceDataset) -> Vec<Alert> {
        Vec::new()
    }
}

#[test]
fn empty_sample_list_yields_zero_candidate_alerts() {
    let dataset = DeviceDataset { did: "d1".to_owned(), samples: Vec::new() };
    let validator = AlwaysEmpty;
    assert!(validator.check_data(&dataset).is_empty());
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use healthmonitor_core::domain::{Alert, AlertType, DeviceDataset, Validator, VitalBounds};

use super::scan::scan_two_directions;

pub struct HeartRateValidator {
    bounds: VitalBounds,
}

impl HeartRateValidator {
    pub fn new(bounds: VitalBounds) -> Self {
        Self { bounds }
    }
}

impl Validator for HeartRateValidator {
    fn check_data(&self, dataset: &DeviceDataset) -> Vec<Alert> {
        scan_two_directions(
            &dataset.did,
            &dataset.samples,
            self.bounds,
            AlertType::HeartrateHigh,
            AlertType::HeartrateLow,
            |s| s.heart_rate,
        )
    }
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use healthmonitor_core::domain::{Alert, AlertType, DeviceDataset, Validator, VitalBounds};

use super::scan::scan_two_directions;

pub struct TemperatureValidator {
    bounds: VitalBounds,
}

impl TemperatureValidator {
    pub fn new(bounds: VitalBounds) -> Self {
        Self { bounds }
    }
}

impl Validator for TemperatureValidator {
    fn check_data(&self, dataset: &DeviceDataset) -> Vec<Alert> {
        scan_two_directions(
            &dataset.did,
            &dataset.samples,
            self.bounds,
            AlertType::TempHigh,
            AlertType::TempLow,
            |s| s.temperature,
        )
    }
}

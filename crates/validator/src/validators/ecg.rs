// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use healthmonitor_core::domain::{Alert, AlertType, DeviceDataset, Validator, VitalBounds};

use super::scan::scan_two_directions;

pub struct EcgValidator {
    bounds: VitalBounds,
}

impl EcgValidator {
    pub fn new(bounds: VitalBounds) -> Self {
        Self { bounds }
    }
}

impl Validator for EcgValidator {
    fn check_data(&self, dataset: &DeviceDataset) -> Vec<Alert> {
        scan_two_directions(&dataset.did, &dataset.samples, self.bounds, AlertType::EcgHigh, AlertType::EcgLow, |s| s.ecg)
    }
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The four vital validators (§4.C), each a thin wrapper over the shared
//! two-direction scan parameterized by which field and which `AlertType`
//! pair it watches.

mod ecg;
mod heart_rate;
mod scan;
mod spo2;
mod temperature;

pub use ecg::EcgValidator;
pub use heart_rate::HeartRateValidator;
pub use spo2::Spo2Validator;
pub use temperature::TemperatureValidator;

use healthmonitor_core::domain::Validator;

use crate::config::Config;

/// Build the four validators from configured bounds, in the order the
/// orchestrator fans candidates out to.
pub fn from_config(config: &Config) -> Vec<Box<dyn Validator>> {
    vec![
        Box::new(TemperatureValidator::new(config.temp_bounds())),
        Box::new(HeartRateValidator::new(config.heartrate_bounds())),
        Box::new(EcgValidator::new(config.ecg_bounds())),
        Box::new(Spo2Validator::new(config.spo2_bounds())),
    ]
}

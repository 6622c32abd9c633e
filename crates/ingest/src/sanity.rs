// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Minimalist bound validator (SPEC_FULL.md Supplemented Feature 5).
//!
//! A cheap, stateless ingest-side sanity check, separate from the four
//! stateful alert validators that run in `healthmonitor-validator`. It
//! exists to reject batches that are entirely nonsensical (every vital of
//! every sample simultaneously out of bound — a dead sensor or a
//! misconfigured device), while still storing a one-sided glitch (a real
//! alert condition on a single vital) for the validator service to pick up.

use healthmonitor_core::domain::{DeviceSample, VitalBounds};

#[derive(Debug, Clone, Copy)]
pub struct SanityBounds {
    pub temp: VitalBounds,
    pub heart_rate: VitalBounds,
    pub ecg: VitalBounds,
    pub spo2: VitalBounds,
}

fn out_of_bound(value: f64, bounds: VitalBounds) -> bool {
    value < bounds.low || value > bounds.high
}

fn all_vitals_out_of_bound(sample: &DeviceSample, bounds: &SanityBounds) -> bool {
    out_of_bound(sample.temperature, bounds.temp)
        && out_of_bound(sample.heart_rate, bounds.heart_rate)
        && out_of_bound(sample.ecg, bounds.ecg)
        && out_of_bound(sample.spo2, bounds.spo2)
}

/// Whether this batch is garbage: non-empty, and every sample has every
/// vital simultaneously out of bound.
pub fn batch_is_nonsensical(batch: &[DeviceSample], bounds: &SanityBounds) -> bool {
    !batch.is_empty() && batch.iter().all(|s| all_vitals_out_of_bound(s, bounds))
}

#[cfg(test)]
#[path = "sanity_tests.rs"]
mod tests;

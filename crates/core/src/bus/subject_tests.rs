// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn device_subject_is_deterministic() {
    assert_eq!(device_subject("d1"), device_subject("d1"));
}

#[test]
fn different_dids_can_land_on_different_shards() {
    let subjects: std::collections::HashSet<_> =
        (0..64).map(|i| device_subject(&format!("device-{i}"))).collect();
    assert!(subjects.len() > 1, "expected hashing to spread devices across more than one shard");
}

#[test]
fn control_subject_is_stable_and_distinct_from_device_shards() {
    assert_eq!(control_subject(), control_subject());
    assert!(control_subject().ends_with("ctrl"));
}

#[test]
fn wildcard_subject_covers_topic_prefix() {
    assert!(wildcard_subject().starts_with(TOPIC));
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subject sharding for the single-topic, competing-consumers bus (§6).
//!
//! The source partitions Kafka by a Murmur2 hash of the device id so that
//! all messages for one device land on the same partition and are
//! processed in order relative to each other. JetStream has no partition
//! concept, so the same effect is approximated by fanning one logical
//! topic out over `SHARD_COUNT` subject suffixes, hashed from `did`; the
//! stream subscribes to the wildcard and a pull consumer still
//! competes-consumes across all of them. Control messages (cleanup,
//! report-generation) carry no device affinity and go to a fixed suffix.

pub const TOPIC: &str = "healthmonitor.validation.requests";
const SHARD_COUNT: u32 = 16;
const CONTROL_SHARD: &str = "ctrl";

/// Subject a `validation_<did>` message is published to and fetched from.
pub fn device_subject(did: &str) -> String {
    format!("{TOPIC}.{:x}", fnv1a(did) % SHARD_COUNT)
}

/// Subject `cleanup_*` / `report-generation_*` control messages use.
pub fn control_subject() -> String {
    format!("{TOPIC}.{CONTROL_SHARD}")
}

/// Wildcard subject the stream config and pull consumer bind to.
pub fn wildcard_subject() -> String {
    format!("{TOPIC}.>")
}

/// FNV-1a, chosen over Murmur2 (no crate in this workspace's stack provides
/// it) purely to get a stable, well-distributed shard index; it carries no
/// correctness requirement beyond "same did always picks the same shard".
fn fnv1a(s: &str) -> u32 {
    const OFFSET_BASIS: u32 = 0x811c_9dc5;
    const PRIME: u32 = 0x0100_0193;
    s.bytes().fold(OFFSET_BASIS, |hash, byte| (hash ^ byte as u32).wrapping_mul(PRIME))
}

#[cfg(test)]
#[path = "subject_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    not_found = { StoreError::NotFound, "NOT_FOUND", true },
    already_exists = { StoreError::AlreadyExists, "ALREADY_EXISTS", true },
    conflict = { StoreError::Conflict, "CONFLICT", true },
    unavailable = { StoreError::Unavailable("timed out".into()), "UNAVAILABLE", true },
    other = { StoreError::Other("bad json".into()), "OTHER", false },
)]
fn classification(err: StoreError, code: &str, recoverable: bool) {
    assert_eq!(err.as_str(), code);
    assert_eq!(err.is_recoverable(), recoverable);
}

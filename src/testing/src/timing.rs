//
// Copyright (c) 2025 Contributors to the Eclipse Foundation
//
// See the NOTICE file(s) distributed with this work for additional
// information regarding copyright ownership.
//
// This program and the accompanying materials are made available under the
// terms of the Apache License Version 2.0 which is available at
// <https://www.apache.org/licenses/LICENSE-2.0>
//
// SPDX-License-Identifier: Apache-2.0
//

use core::time::Duration;
use std::time::Instant;

///
/// Runs `f` and returns its result together with how long it took.
///
pub fn timed<R>(f: impl FnOnce() -> R) -> (R, Duration) {
    let start = Instant::now();
    let result = f();
    (result, start.elapsed())
}

#[track_caller]
pub fn assert_elapsed_at_least(elapsed: Duration, min: Duration) {
    assert!(elapsed >= min, "Expected at least {:?} to pass, only {:?} did", min, elapsed);
}

#[track_caller]
pub fn assert_elapsed_below(elapsed: Duration, max: Duration) {
    assert!(elapsed < max, "Expected less than {:?} to pass, but {:?} did", max, elapsed);
}

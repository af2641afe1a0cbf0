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
/// Timeout of a selector wait, in milliseconds.
///
/// # ATTENTION
/// A value of `0` does NOT mean "return immediately". It means "no timeout": the wait blocks until at least one
/// registered endpoint is ready. There is intentionally no way to express a non-blocking probe.
///
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WaitTimeout(u32);

impl WaitTimeout {
    /// Block until something is ready.
    pub const INFINITE: WaitTimeout = WaitTimeout(0);

    pub fn from_millis(millis: u32) -> Self {
        WaitTimeout(millis)
    }

    pub fn as_millis(&self) -> u32 {
        self.0
    }

    pub fn is_infinite(&self) -> bool {
        self.0 == 0
    }

    /// `None` for the infinite timeout.
    pub fn as_duration(&self) -> Option<Duration> {
        (!self.is_infinite()).then(|| Duration::from_millis(u64::from(self.0)))
    }

    pub(crate) fn deadline(&self) -> Deadline {
        Deadline(self.as_duration().map(|d| Instant::now() + d))
    }
}

impl From<u32> for WaitTimeout {
    fn from(millis: u32) -> Self {
        WaitTimeout::from_millis(millis)
    }
}

/// Absolute end of a wait, used to resume `poll` with the remaining time after an interruption.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Deadline(Option<Instant>);

impl Deadline {
    /// Never true for the infinite deadline.
    pub(crate) fn has_expired(&self) -> bool {
        self.0.is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// Remaining time in the form `poll` expects: `-1` for infinite, otherwise milliseconds clamped to `c_int`.
    pub(crate) fn poll_timeout(&self) -> libc::c_int {
        match self.0 {
            None => -1,
            Some(deadline) => {
                let remaining = deadline.saturating_duration_since(Instant::now());
                // Round up, otherwise a sub-millisecond remainder turns into a busy 0ms poll.
                let millis = remaining.as_micros().div_ceil(1000);
                libc::c_int::try_from(millis).unwrap_or(libc::c_int::MAX)
            }
        }
    }
}

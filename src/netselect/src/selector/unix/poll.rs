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

use crate::{
    error::{Result, SelectError},
    selector::timeout::WaitTimeout,
};
use foundation::prelude::*;
use libc::{poll, pollfd, EINTR, POLLERR, POLLHUP, POLLIN, POLLNVAL, POLLPRI};
use std::os::fd::RawFd;

// Hang-up and error are reported regardless of the requested events. Both are counted as ready, since the next
// read on the endpoint returns immediately (EOF or the pending error).
const READY_EVENTS: i16 = POLLIN | POLLPRI | POLLHUP | POLLERR;

pub(crate) fn pollfd_for(fd: RawFd) -> pollfd {
    pollfd {
        fd,
        events: POLLIN | POLLPRI,
        revents: 0,
    }
}

/// What `poll` reported for a single descriptor.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct ReadinessFlags(i16);

impl ReadinessFlags {
    pub(crate) fn from_revents(revents: i16) -> Self {
        ReadinessFlags(revents)
    }

    pub(crate) fn is_ready(&self) -> bool {
        self.0 & READY_EVENTS != 0
    }

    pub(crate) fn is_invalid(&self) -> bool {
        self.0 & POLLNVAL != 0
    }
}

///
/// Block on all `pollfds` until at least one is ready or `timeout` elapses.
///
/// `revents` of every entry is reset before the call, so after an `Ok` return it holds exactly what this call
/// observed. Interrupted calls are resumed with the time left until the original deadline.
///
/// Returns the number of entries with a non-zero `revents`.
/// Returns `Err(SelectError::Timeout)` if the timeout was reached.
/// Returns `Err(SelectError::PrimitiveFailure)` with the `errno` of any other failure.
///
pub(crate) fn poll_readable(pollfds: &mut [pollfd], timeout: WaitTimeout) -> Result<usize> {
    for entry in pollfds.iter_mut() {
        entry.revents = 0;
    }

    let deadline = timeout.deadline();

    loop {
        let poll_result: i32 = unsafe { poll(pollfds.as_mut_ptr(), pollfds.len() as libc::nfds_t, deadline.poll_timeout()) };

        match poll_result {
            -1 => {
                let err = std::io::Error::last_os_error().raw_os_error().unwrap_or(libc::EIO);
                match err {
                    EINTR => {
                        trace!("poll interrupted, resuming");
                        continue;
                    }
                    _ => {
                        warn!("poll failed with errno {}", err);
                        break Err(SelectError::PrimitiveFailure(err));
                    }
                }
            }
            // Timeouts above c_int::MAX are clamped, so an elapsed poll window does not mean the deadline passed.
            0 if !deadline.has_expired() => {
                trace!("poll window elapsed before deadline, resuming");
                continue;
            }
            0 => break Err(SelectError::Timeout),
            n => break Ok(n as usize),
        }
    }
}

#[cfg(not(miri))]
#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        io::Write,
        os::{fd::AsRawFd, unix::net::UnixStream},
    };

    #[test]
    fn test_readable_entry_is_reported() {
        let (mut left, right) = UnixStream::pair().unwrap();
        let mut fds = [pollfd_for(right.as_raw_fd())];

        left.write_all(&[1, 2, 3]).unwrap();

        assert_eq!(poll_readable(&mut fds, WaitTimeout::from_millis(1000)), Ok(1));
        let flags = ReadinessFlags::from_revents(fds[0].revents);
        assert!(flags.is_ready());
        assert!(!flags.is_invalid());
    }

    #[test]
    fn test_hangup_counts_as_ready() {
        let (left, right) = UnixStream::pair().unwrap();
        let mut fds = [pollfd_for(right.as_raw_fd())];

        drop(left);

        assert_eq!(poll_readable(&mut fds, WaitTimeout::from_millis(1000)), Ok(1));
        assert!(ReadinessFlags::from_revents(fds[0].revents).is_ready());
    }

    #[test]
    fn test_idle_entry_times_out() {
        let (_left, right) = UnixStream::pair().unwrap();
        let mut fds = [pollfd_for(right.as_raw_fd())];

        assert_eq!(poll_readable(&mut fds, WaitTimeout::from_millis(20)), Err(SelectError::Timeout));
        assert_eq!(fds[0].revents, 0);
    }

    #[test]
    fn test_timeout_is_not_reported_before_deadline() {
        let (_left, right) = UnixStream::pair().unwrap();
        let mut fds = [pollfd_for(right.as_raw_fd())];

        let start = std::time::Instant::now();
        assert_eq!(poll_readable(&mut fds, WaitTimeout::from_millis(60)), Err(SelectError::Timeout));
        assert!(start.elapsed() >= core::time::Duration::from_millis(60));
    }

    #[test]
    fn test_stale_revents_are_reset() {
        let (_left, right) = UnixStream::pair().unwrap();
        let mut fds = [pollfd_for(right.as_raw_fd())];
        fds[0].revents = POLLIN;

        assert_eq!(poll_readable(&mut fds, WaitTimeout::from_millis(10)), Err(SelectError::Timeout));
        assert_eq!(fds[0].revents, 0);
    }

    #[test]
    fn test_closed_descriptor_is_flagged_invalid() {
        // Far above any descriptor this process opens, so it is never valid.
        let mut fds = [pollfd_for(1_000_000)];

        assert_eq!(poll_readable(&mut fds, WaitTimeout::from_millis(1000)), Ok(1));
        let flags = ReadinessFlags::from_revents(fds[0].revents);
        assert!(flags.is_invalid());
        assert!(!flags.is_ready());
    }
}

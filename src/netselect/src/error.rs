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

use core::fmt;
use std::os::fd::RawFd;

/// Why a wait did not produce any ready endpoint.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SelectError {
    /// Nothing was registered, so no OS call was made.
    EmptyRegistry,
    /// The timeout elapsed without any registered endpoint becoming ready.
    Timeout,
    /// A registered descriptor is not open (anymore).
    InvalidDescriptor(RawFd),
    /// The readiness primitive itself failed with the contained `errno`.
    PrimitiveFailure(i32),
}

pub type Result<T> = core::result::Result<T, SelectError>;

impl fmt::Display for SelectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectError::EmptyRegistry => write!(f, "no endpoint registered"),
            SelectError::Timeout => write!(f, "timed out waiting for readiness"),
            SelectError::InvalidDescriptor(fd) => write!(f, "registered descriptor {} is not open", fd),
            SelectError::PrimitiveFailure(errno) => write!(f, "poll failed with errno {}", errno),
        }
    }
}

impl std::error::Error for SelectError {}

impl From<SelectError> for std::io::Error {
    fn from(err: SelectError) -> Self {
        match err {
            SelectError::EmptyRegistry => std::io::Error::from(std::io::ErrorKind::InvalidInput),
            SelectError::Timeout => std::io::Error::from(std::io::ErrorKind::TimedOut),
            SelectError::InvalidDescriptor(_) => std::io::Error::from_raw_os_error(libc::EBADF),
            SelectError::PrimitiveFailure(errno) => std::io::Error::from_raw_os_error(errno),
        }
    }
}

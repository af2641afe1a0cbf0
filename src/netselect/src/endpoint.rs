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

use core::fmt::Debug;
use std::{
    net::{TcpListener, TcpStream, UdpSocket},
    os::{
        fd::{AsRawFd, RawFd},
        unix::net::{UnixDatagram, UnixListener, UnixStream},
    },
};

/// What readiness means for an endpoint. The selector itself never interprets it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EndpointKind {
    /// Ready means a connection can be accepted.
    Listener,
    /// Ready means bytes can be read, or the peer hung up.
    Stream,
    /// Ready means a datagram is queued.
    Datagram,
}

///
/// Anything exposing a descriptor that can be polled for readiness.
///
/// Implemented for the listener, stream and datagram socket types of `std`, including the Unix-domain ones.
/// Foreign descriptors can be wrapped in [`RawEndpoint`].
///
pub trait Endpoint: AsRawFd {
    fn kind(&self) -> EndpointKind;

    /// The lightweight handle the selector keeps instead of a reference to `self`.
    fn handle(&self) -> EndpointHandle {
        EndpointHandle {
            fd: self.as_raw_fd(),
            kind: self.kind(),
        }
    }
}

///
/// Descriptor plus kind of a registered endpoint.
///
/// The handle does not own the descriptor. Dropping it never closes anything.
///
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct EndpointHandle {
    fd: RawFd,
    kind: EndpointKind,
}

impl EndpointHandle {
    pub fn fd(&self) -> RawFd {
        self.fd
    }

    pub fn kind(&self) -> EndpointKind {
        self.kind
    }
}

macro_rules! impl_endpoint {
    ($kind:ident => $($ty:ty),+) => {
        $(
            impl Endpoint for $ty {
                fn kind(&self) -> EndpointKind {
                    EndpointKind::$kind
                }
            }
        )+
    };
}

impl_endpoint!(Listener => TcpListener, UnixListener);
impl_endpoint!(Stream => TcpStream, UnixStream);
impl_endpoint!(Datagram => UdpSocket, UnixDatagram);

///
/// Adapter to use a bare `RawFd` as an [`Endpoint`].
///
/// Unlike owning fd wrappers, this one never closes the descriptor. The caller stays responsible for its lifetime.
///
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct RawEndpoint {
    fd: RawFd,
    kind: EndpointKind,
}

impl Debug for RawEndpoint {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "RawEndpoint<fd: {:?}, kind: {:?}>", self.fd, self.kind)
    }
}

impl RawEndpoint {
    pub fn new(fd: RawFd, kind: EndpointKind) -> Self {
        RawEndpoint { fd, kind }
    }

    /// Wraps the descriptor of any `AsRawFd` object, e.g. a pipe end, as a stream endpoint.
    pub fn stream<T: AsRawFd + ?Sized>(source: &T) -> Self {
        Self::new(source.as_raw_fd(), EndpointKind::Stream)
    }
}

impl AsRawFd for RawEndpoint {
    fn as_raw_fd(&self) -> RawFd {
        self.fd
    }
}

impl Endpoint for RawEndpoint {
    fn kind(&self) -> EndpointKind {
        self.kind
    }
}

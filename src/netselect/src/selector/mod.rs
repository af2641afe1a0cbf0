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

//!
//! Readiness multiplexing over a dynamic set of endpoints.
//!
//! The [`Selector`] keeps two pieces of state:
//!  - the registry: descriptors of all endpoints added via [`Selector::add`],
//!  - the readiness snapshot: descriptors found ready by the latest [`Selector::wait`].
//!
//! The snapshot is replaced as a whole on every wait, and cleared whenever a wait fails. It is never merged with a
//! previous result.
//!

mod registry;
mod timeout;
pub(crate) mod unix;

use crate::{
    endpoint::{Endpoint, EndpointHandle},
    error::{Result, SelectError},
};
use foundation::prelude::*;
use registry::Registry;
use std::{collections::HashSet, os::fd::RawFd};
use unix::poll::poll_readable;

pub use timeout::WaitTimeout;

///
/// Waits until one or more registered endpoints have data or events pending.
///
/// The selector never owns the endpoints. It stores their descriptor and kind only, so an endpoint can be moved,
/// used for I/O or closed by the caller at any time between waits. Closing an endpoint without removing it first
/// makes the next wait fail with [`SelectError::InvalidDescriptor`], see [`SelectorBuilder::prune_invalid`].
///
/// `Clone` produces a fully independent copy: same registered endpoints, same snapshot, no shared state.
///
/// There is no internal locking. All mutating operations take `&mut self`; share a selector between threads by
/// wrapping it into a `Mutex`.
///
#[derive(Clone, Debug)]
pub struct Selector {
    registry: Registry,
    ready: HashSet<RawFd>,
    prune_invalid: bool,
}

impl Default for Selector {
    fn default() -> Self {
        SelectorBuilder::new().build()
    }
}

impl Selector {
    /// Creates an empty selector with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    ///
    /// Adds `endpoint` to the set of watched endpoints.
    ///
    /// Adding an endpoint whose descriptor is already registered does nothing. The readiness snapshot is not touched,
    /// so `is_ready` reports the newly added endpoint as not ready until the next wait.
    ///
    pub fn add<E: Endpoint + ?Sized>(&mut self, endpoint: &E) {
        let handle = endpoint.handle();

        if self.registry.insert(handle) {
            tracing_adapter!(fd = handle.fd(), kind = ?handle.kind(), "Endpoint registered");
        }
    }

    ///
    /// Removes `endpoint` from the set of watched endpoints, together with any readiness reported for it.
    ///
    /// Removing an endpoint that isn't registered does nothing.
    ///
    pub fn remove<E: Endpoint + ?Sized>(&mut self, endpoint: &E) {
        let fd = endpoint.as_raw_fd();
        self.ready.remove(&fd);

        if self.registry.remove(fd).is_some() {
            tracing_adapter!(fd = fd, "Endpoint deregistered");
        }
    }

    /// Removes all endpoints and forgets the readiness snapshot.
    pub fn clear(&mut self) {
        debug!("Clearing selector with {} endpoints", self.registry.len());
        self.registry.clear();
        self.ready.clear();
    }

    ///
    /// Blocks until at least one registered endpoint is ready, or `timeout_millis` elapsed.
    ///
    /// # ATTENTION
    /// `timeout_millis == 0` means "wait without timeout": the call only returns once something is ready (or the
    /// readiness primitive fails). It does NOT return immediately.
    ///
    /// # Return
    /// `true` if at least one endpoint is ready; query which ones with [`Selector::is_ready`].
    /// `false` if the timeout elapsed, nothing is registered, or the OS call failed. The readiness snapshot is
    /// empty afterwards. Use [`Selector::try_wait`] to tell these cases apart.
    ///
    pub fn wait(&mut self, timeout_millis: u32) -> bool {
        self.try_wait(WaitTimeout::from_millis(timeout_millis)).is_ok()
    }

    ///
    /// Same as [`Selector::wait`], but reports why nothing is ready.
    ///
    /// A timeout of `0` (or [`WaitTimeout::INFINITE`]) blocks until something is ready.
    ///
    /// Returns the number of ready endpoints.
    /// Returns `Err(SelectError::EmptyRegistry)` right away if nothing is registered. No OS call is made.
    /// Returns `Err(SelectError::Timeout)` if the timeout was reached.
    /// Returns `Err(SelectError::InvalidDescriptor)` if a registered descriptor is not open.
    /// Returns `Err(SelectError::PrimitiveFailure)` if `poll` failed for any other reason.
    ///
    pub fn try_wait<T: Into<WaitTimeout>>(&mut self, timeout: T) -> Result<usize> {
        self.ready.clear();

        if self.registry.is_empty() {
            debug!("Wait on empty selector");
            return Err(SelectError::EmptyRegistry);
        }

        // `poll` silently skips negative descriptors, so they would never be reported as invalid.
        let malformed: Vec<RawFd> = self
            .registry
            .handles()
            .iter()
            .map(|h| h.fd())
            .filter(|fd| fd.is_negative())
            .collect();
        if let Some(&first) = malformed.first() {
            self.handle_invalid(&malformed);
            return Err(SelectError::InvalidDescriptor(first));
        }

        let timeout = timeout.into();
        if let Err(e) = poll_readable(self.registry.pollfds_mut(), timeout) {
            debug!("Wait on {} endpoints returned without readiness: {}", self.registry.len(), e);
            return Err(e);
        }

        let mut invalid = Vec::new();
        for (fd, flags) in self.registry.revents() {
            if flags.is_invalid() {
                invalid.push(fd);
            } else if flags.is_ready() {
                self.ready.insert(fd);
            }
        }

        if let Some(&first) = invalid.first() {
            self.ready.clear();
            self.handle_invalid(&invalid);
            return Err(SelectError::InvalidDescriptor(first));
        }

        debug!("{} of {} endpoints ready", self.ready.len(), self.registry.len());
        Ok(self.ready.len())
    }

    ///
    /// Tells whether `endpoint` was found ready by the latest wait.
    ///
    /// Never blocks. Returns `false` for endpoints that are not registered, before the first wait, and after a failed
    /// wait.
    ///
    pub fn is_ready<E: Endpoint + ?Sized>(&self, endpoint: &E) -> bool {
        self.ready.contains(&endpoint.as_raw_fd())
    }

    ///
    /// Handles of all endpoints found ready by the latest wait.
    ///
    /// The order is unspecified. Removing an endpoint may move another one to its slot in the registry.
    ///
    pub fn ready(&self) -> impl Iterator<Item = EndpointHandle> + '_ {
        self.registry
            .handles()
            .iter()
            .filter(|handle| self.ready.contains(&handle.fd()))
            .copied()
    }

    pub fn contains<E: Endpoint + ?Sized>(&self, endpoint: &E) -> bool {
        self.registry.contains(endpoint.as_raw_fd())
    }

    /// Number of registered endpoints.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    fn handle_invalid(&mut self, fds: &[RawFd]) {
        for &fd in fds {
            if self.prune_invalid {
                warn!("Registered descriptor {} is not open, removing it from selector", fd);
                self.registry.remove(fd);
            } else {
                warn!("Registered descriptor {} is not open", fd);
            }
        }
    }
}

///
/// Configuration of a [`Selector`].
///
pub struct SelectorBuilder {
    registry_capacity: usize,
    prune_invalid: bool,
}

impl Default for SelectorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectorBuilder {
    pub fn new() -> Self {
        Self {
            registry_capacity: 0,
            prune_invalid: true,
        }
    }

    ///
    /// Preallocates room for `capacity` endpoints. This is not a limit, the registry grows as needed.
    ///
    pub fn registry_capacity(mut self, capacity: usize) -> Self {
        self.registry_capacity = capacity;
        self
    }

    ///
    /// Whether descriptors reported as not open are removed from the registry after the wait that detected them.
    ///
    /// Enabled by default. When disabled, every following wait fails with [`SelectError::InvalidDescriptor`] until
    /// the caller removes the stale endpoint.
    ///
    pub fn prune_invalid(mut self, enable: bool) -> Self {
        self.prune_invalid = enable;
        self
    }

    pub fn build(self) -> Selector {
        Selector {
            registry: Registry::with_capacity(self.registry_capacity),
            ready: HashSet::with_capacity(self.registry_capacity),
            prune_invalid: self.prune_invalid,
        }
    }
}

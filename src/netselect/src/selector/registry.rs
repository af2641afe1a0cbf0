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

use crate::endpoint::EndpointHandle;
use crate::selector::unix::poll::{pollfd_for, ReadinessFlags};
use libc::pollfd;
use std::{collections::HashMap, os::fd::RawFd};

///
/// Registered endpoints, kept in a layout that can be handed to `poll` as is.
///
/// `handles` and `pollfds` are parallel arrays: the entry at index `i` of both describes the same descriptor, and
/// `fd_to_index` maps every registered descriptor to that index.
///
#[derive(Clone, Default)]
pub(crate) struct Registry {
    fd_to_index: HashMap<RawFd, usize>,
    handles: Vec<EndpointHandle>,
    pollfds: Vec<pollfd>,
}

impl core::fmt::Debug for Registry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.handles.iter()).finish()
    }
}

impl Registry {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            fd_to_index: HashMap::with_capacity(capacity),
            handles: Vec::with_capacity(capacity),
            pollfds: Vec::with_capacity(capacity),
        }
    }

    /// Returns `false` if the descriptor was already registered. The stored kind is updated in that case.
    pub(crate) fn insert(&mut self, handle: EndpointHandle) -> bool {
        if let Some(&index) = self.fd_to_index.get(&handle.fd()) {
            self.handles[index] = handle;
            return false;
        }

        self.fd_to_index.insert(handle.fd(), self.handles.len());
        self.handles.push(handle);
        self.pollfds.push(pollfd_for(handle.fd()));

        true
    }

    pub(crate) fn remove(&mut self, fd: RawFd) -> Option<EndpointHandle> {
        let index = self.fd_to_index.remove(&fd)?;
        let removed = self.handles.swap_remove(index);
        self.pollfds.swap_remove(index);

        // If index wasn't last, the former last entry now lives at index.
        if let Some(moved) = self.handles.get(index) {
            self.fd_to_index.insert(moved.fd(), index);
        }

        Some(removed)
    }

    pub(crate) fn contains(&self, fd: RawFd) -> bool {
        self.fd_to_index.contains_key(&fd)
    }

    pub(crate) fn len(&self) -> usize {
        self.handles.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.fd_to_index.clear();
        self.handles.clear();
        self.pollfds.clear();
    }

    pub(crate) fn handles(&self) -> &[EndpointHandle] {
        &self.handles
    }

    pub(crate) fn pollfds_mut(&mut self) -> &mut [pollfd] {
        &mut self.pollfds
    }

    /// Descriptors together with what the last `poll` reported for them.
    pub(crate) fn revents(&self) -> impl Iterator<Item = (RawFd, ReadinessFlags)> + '_ {
        self.pollfds.iter().map(|p| (p.fd, ReadinessFlags::from_revents(p.revents)))
    }
}

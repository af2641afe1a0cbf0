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
use std::{
    sync::{Arc, Condvar, Mutex},
    thread,
};

/// One-shot flag a spawned thread raises for the test thread.
pub struct SyncPoint(Arc<(Mutex<bool>, Condvar)>);

impl SyncPoint {
    /// Waits until the flag is raised. Returns `false` on timeout.
    pub fn wait(&self, timeout: Duration) -> bool {
        let (m, c) = &*self.0;
        let m = m.lock().unwrap();
        let (m, _) = c.wait_timeout_while(m, timeout, |set| !*set).unwrap();
        *m
    }

    pub fn is_set(&self) -> bool {
        *self.0 .0.lock().unwrap()
    }
}

fn raise(sync: &(Mutex<bool>, Condvar)) {
    let (m, c) = sync;
    let mut m = m.lock().unwrap();
    *m = true;
    c.notify_all();
}

///
/// Spawns `f` on a new thread.
///
/// Returns the `begin` sync point, raised right before `f` runs, the `end` sync point, raised once `f` returned,
/// and the join handle.
///
pub fn create_thread<F, R>(f: F) -> (SyncPoint, SyncPoint, thread::JoinHandle<R>)
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    let begin_sync = Arc::new((Mutex::new(false), Condvar::new()));
    let begin_sync_clone = Arc::clone(&begin_sync);
    let end_sync = Arc::new((Mutex::new(false), Condvar::new()));
    let end_sync_clone = Arc::clone(&end_sync);

    (
        SyncPoint(begin_sync),
        SyncPoint(end_sync),
        thread::spawn(move || {
            raise(&begin_sync_clone);
            let result = f();
            raise(&end_sync_clone);
            result
        }),
    )
}

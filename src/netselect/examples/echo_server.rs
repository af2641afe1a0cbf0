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
//! Single threaded echo server: one selector watches the listener and every accepted client.
//!
//! Usage: `echo_server [ADDR] [TIMEOUT_MS] [MAX_IDLE_ROUNDS]`
//!

use foundation::prelude::*;
use logging_tracing::{Level, TracingLibraryBuilder};
use netselect::prelude::*;
use std::{
    io::{ErrorKind, Read, Write},
    net::{TcpListener, TcpStream},
};

fn main() {
    let mut logging = TracingLibraryBuilder::new()
        .global_log_level(Level::DEBUG)
        .enable_logging(true)
        .build();
    logging.init_log_trace().expect("Failed to initialize logging");

    let mut args = std::env::args().skip(1);
    let addr = args.next().unwrap_or_else(|| "127.0.0.1:7878".to_string());
    let timeout_ms: u32 = args.next().and_then(|v| v.parse().ok()).unwrap_or(1000);
    let max_idle_rounds: Option<usize> = args.next().and_then(|v| v.parse().ok());

    let listener = TcpListener::bind(&addr).expect("Failed to bind listener");
    info!("Echo server listening on {}", listener.local_addr().unwrap());

    let mut selector = SelectorBuilder::new().registry_capacity(16).build();
    selector.add(&listener);

    let mut clients: Vec<TcpStream> = Vec::new();
    let mut idle_rounds = 0;

    loop {
        match selector.try_wait(timeout_ms) {
            Ok(count) => {
                debug!("{} endpoints ready", count);
                idle_rounds = 0;
            }
            Err(SelectError::Timeout) => {
                idle_rounds += 1;
                if max_idle_rounds.is_some_and(|max| idle_rounds >= max) {
                    info!("No activity for {} rounds, shutting down", idle_rounds);
                    break;
                }
                continue;
            }
            Err(e) => {
                error!("Selector failed: {}", e);
                break;
            }
        }

        if selector.is_ready(&listener) {
            match listener.accept() {
                Ok((client, peer)) => {
                    info!("Accepted client {}", peer);
                    selector.add(&client);
                    clients.push(client);
                }
                Err(e) => warn!("Accept failed: {}", e),
            }
        }

        let mut buf = [0_u8; 1024];
        clients.retain_mut(|client| {
            if !selector.is_ready(&*client) {
                return true;
            }

            match client.read(&mut buf) {
                Ok(0) => {
                    info!("Client {:?} disconnected", client.peer_addr().ok());
                    selector.remove(&*client);
                    false
                }
                Ok(n) => {
                    if let Err(e) = client.write_all(&buf[..n]) {
                        warn!("Echo failed: {}", e);
                        selector.remove(&*client);
                        return false;
                    }
                    true
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => true,
                Err(e) => {
                    warn!("Read failed: {}", e);
                    selector.remove(&*client);
                    false
                }
            }
        });
    }
}

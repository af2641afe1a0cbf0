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
//! `netselect` lets a single thread wait, with a bounded timeout, until any of a set of listeners, stream sockets
//! or datagram sockets has something pending.
//!
//! ```no_run
//! use netselect::prelude::*;
//! use std::net::{TcpListener, UdpSocket};
//!
//! let listener = TcpListener::bind("127.0.0.1:0").unwrap();
//! let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
//!
//! let mut selector = Selector::new();
//! selector.add(&listener);
//! selector.add(&socket);
//!
//! // NOTE: a timeout of 0 waits forever.
//! if selector.wait(1000) {
//!     if selector.is_ready(&listener) {
//!         let _ = listener.accept();
//!     }
//!     if selector.is_ready(&socket) {
//!         let mut buf = [0_u8; 512];
//!         let _ = socket.recv_from(&mut buf);
//!     }
//! }
//! ```
//!

pub mod endpoint;
pub mod error;
pub mod prelude;
pub mod selector;

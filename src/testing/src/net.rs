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
    io::Write,
    net::{TcpListener, TcpStream, UdpSocket},
    os::fd::{FromRawFd, OwnedFd, RawFd},
    thread,
};

/// A listener on an OS assigned loopback port.
pub fn local_listener() -> TcpListener {
    TcpListener::bind("127.0.0.1:0").expect("Failed to bind loopback listener")
}

///
/// Connects to `listener` and accepts the connection.
///
/// Returns `(client, server)`. Both ends are blocking.
///
pub fn connected_pair(listener: &TcpListener) -> (TcpStream, TcpStream) {
    let addr = listener.local_addr().expect("Listener has no local address");
    let client = TcpStream::connect(addr).expect("Failed to connect to listener");
    let (server, _) = listener.accept().expect("Failed to accept connection");
    (client, server)
}

/// Two loopback UDP sockets connected to each other.
pub fn udp_pair() -> (UdpSocket, UdpSocket) {
    let left = UdpSocket::bind("127.0.0.1:0").expect("Failed to bind udp socket");
    let right = UdpSocket::bind("127.0.0.1:0").expect("Failed to bind udp socket");
    left.connect(right.local_addr().unwrap()).expect("Failed to connect udp socket");
    right.connect(left.local_addr().unwrap()).expect("Failed to connect udp socket");
    (left, right)
}

///
/// A non-blocking pipe. Returns `(read_end, write_end)`.
///
pub fn pipe() -> (OwnedFd, OwnedFd) {
    let mut fds: [RawFd; 2] = [-1, -1];
    assert_eq!(unsafe { libc::pipe(fds.as_mut_ptr()) }, 0, "pipe failed");

    for fd in fds {
        assert_ne!(unsafe { libc::fcntl(fd, libc::F_SETFL, libc::O_NONBLOCK) }, -1, "fcntl failed");
    }

    // SAFETY: both descriptors were just created and are owned by nobody else.
    unsafe { (OwnedFd::from_raw_fd(fds[0]), OwnedFd::from_raw_fd(fds[1])) }
}

///
/// Writes `data` into `writer` from a new thread after `delay`.
///
/// The writer is handed back through the join handle, so the peer is not closed before the test is done with it.
///
pub fn send_after<W: Write + Send + 'static>(mut writer: W, delay: Duration, data: &'static [u8]) -> thread::JoinHandle<W> {
    thread::spawn(move || {
        thread::sleep(delay);
        writer.write_all(data).expect("Delayed write failed");
        writer.flush().expect("Delayed flush failed");
        writer
    })
}

/// Same as [`send_after`] for a connected datagram socket.
pub fn send_datagram_after(socket: UdpSocket, delay: Duration, data: &'static [u8]) -> thread::JoinHandle<UdpSocket> {
    thread::spawn(move || {
        thread::sleep(delay);
        socket.send(data).expect("Delayed send failed");
        socket
    })
}

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
use netselect::prelude::*;
use std::{
    io::Read,
    net::{Shutdown, TcpStream},
    os::fd::AsRawFd,
    sync::{Arc, Mutex},
    thread,
};
use testing::{
    net::{connected_pair, local_listener, pipe, send_after, send_datagram_after, udp_pair},
    sync::create_thread,
    timing::{assert_elapsed_at_least, assert_elapsed_below, timed},
};

#[test]
fn test_stream_becomes_ready_while_listener_stays_idle() {
    let listener = local_listener();
    let (client, server) = connected_pair(&listener);

    let mut selector = Selector::new();
    selector.add(&listener);
    selector.add(&server);

    let writer = send_after(client, Duration::from_millis(50), &[1, 2, 3]);

    let (ready, elapsed) = timed(|| selector.wait(1000));

    assert!(ready);
    assert_elapsed_at_least(elapsed, Duration::from_millis(40));
    assert_elapsed_below(elapsed, Duration::from_millis(500));
    assert!(!selector.is_ready(&listener));
    assert!(selector.is_ready(&server));

    let _client = writer.join().unwrap();
}

#[test]
fn test_empty_selector_fails_without_waiting() {
    let mut selector = Selector::new();

    let (ready, elapsed) = timed(|| selector.wait(500));

    assert!(!ready);
    assert_elapsed_below(elapsed, Duration::from_millis(5));
}

#[test]
fn test_empty_selector_fails_even_without_timeout() {
    let mut selector = Selector::new();

    let (result, elapsed) = timed(|| selector.try_wait(WaitTimeout::INFINITE));

    assert_eq!(result, Err(SelectError::EmptyRegistry));
    assert_elapsed_below(elapsed, Duration::from_millis(5));
}

#[test]
fn test_idle_stream_times_out() {
    let listener = local_listener();
    let (_client, server) = connected_pair(&listener);

    let mut selector = Selector::new();
    selector.add(&server);

    let (result, elapsed) = timed(|| selector.try_wait(100));

    assert_eq!(result, Err(SelectError::Timeout));
    assert_elapsed_at_least(elapsed, Duration::from_millis(95));
    assert!(!selector.is_ready(&server));
}

#[test]
fn test_removed_endpoint_is_not_ready() {
    let listener = local_listener();
    let (_client, server) = connected_pair(&listener);

    let mut selector = Selector::new();
    selector.add(&server);
    selector.remove(&server);

    assert!(!selector.is_ready(&server));
    assert!(selector.is_empty());
}

#[test]
fn test_zero_timeout_blocks_until_ready() {
    let listener = local_listener();
    let (client, server) = connected_pair(&listener);

    let mut selector = Selector::new();
    selector.add(&server);

    let (begin, end, waiter) = create_thread(move || {
        let ready = selector.wait(0);
        (ready, selector.is_ready(&server))
    });

    assert!(begin.wait(Duration::from_secs(5)));
    // A zero timeout must not be treated as "return immediately".
    assert!(!end.wait(Duration::from_millis(300)));

    let writer = send_after(client, Duration::ZERO, b"ping");

    assert!(end.wait(Duration::from_secs(5)));
    assert_eq!(waiter.join().unwrap(), (true, true));
    let _client = writer.join().unwrap();
}

#[test]
fn test_pending_connection_makes_listener_ready() {
    let listener = local_listener();
    let (_udp_left, udp_right) = udp_pair();

    let mut selector = Selector::new();
    selector.add(&listener);
    selector.add(&udp_right);

    let _client = TcpStream::connect(listener.local_addr().unwrap()).unwrap();

    assert!(selector.wait(1000));
    assert!(selector.is_ready(&listener));
    assert!(!selector.is_ready(&udp_right));

    let (_server, _) = listener.accept().unwrap();
}

#[test]
fn test_datagram_makes_socket_ready() {
    let (left, right) = udp_pair();
    let listener = local_listener();

    let mut selector = Selector::new();
    selector.add(&listener);
    selector.add(&right);

    let sender = send_datagram_after(left, Duration::from_millis(20), b"datagram");

    assert!(selector.wait(1000));
    assert!(selector.is_ready(&right));
    assert!(!selector.is_ready(&listener));

    let mut buf = [0_u8; 16];
    assert_eq!(right.recv(&mut buf).unwrap(), 8);
    let _left = sender.join().unwrap();
}

#[test]
fn test_every_ready_endpoint_is_reported() {
    let listener = local_listener();
    let (mut client_a, server_a) = connected_pair(&listener);
    let (mut client_b, server_b) = connected_pair(&listener);
    let (_client_c, server_c) = connected_pair(&listener);

    let mut selector = Selector::new();
    for endpoint in [&server_a, &server_b, &server_c] {
        selector.add(endpoint);
    }

    std::io::Write::write_all(&mut client_a, b"a").unwrap();
    std::io::Write::write_all(&mut client_b, b"b").unwrap();
    // Loopback delivery is asynchronous, give both writes time to land.
    thread::sleep(Duration::from_millis(50));

    assert_eq!(selector.try_wait(1000), Ok(2));
    assert!(selector.is_ready(&server_a));
    assert!(selector.is_ready(&server_b));
    assert!(!selector.is_ready(&server_c));
    let mut ready: Vec<_> = selector.ready().map(|h| h.fd()).collect();
    let mut expected = vec![server_a.handle().fd(), server_b.handle().fd()];
    ready.sort_unstable();
    expected.sort_unstable();
    assert_eq!(ready, expected);
}

#[test]
fn test_peer_shutdown_reports_ready_for_eof() {
    let listener = local_listener();
    let (client, mut server) = connected_pair(&listener);

    let mut selector = Selector::new();
    selector.add(&server);

    client.shutdown(Shutdown::Write).unwrap();

    assert!(selector.wait(1000));
    assert!(selector.is_ready(&server));

    let mut buf = [0_u8; 4];
    assert_eq!(server.read(&mut buf).unwrap(), 0);
}

#[test]
fn test_failed_wait_clears_previous_readiness() {
    let listener = local_listener();
    let (client, mut server) = connected_pair(&listener);

    let mut selector = Selector::new();
    selector.add(&server);

    let writer = send_after(client, Duration::ZERO, b"x");
    assert!(selector.wait(1000));
    assert!(selector.is_ready(&server));

    let mut buf = [0_u8; 1];
    server.read_exact(&mut buf).unwrap();

    assert!(!selector.wait(50));
    assert!(!selector.is_ready(&server));
    let _client = writer.join().unwrap();
}

#[test]
fn test_endpoint_closed_after_removal_does_not_disturb_selector() {
    let listener = local_listener();
    let (client, server) = connected_pair(&listener);
    let (_other_client, other_server) = connected_pair(&listener);

    let mut selector = Selector::new();
    selector.add(&server);
    selector.add(&other_server);

    selector.remove(&server);
    drop(server);
    drop(client);

    assert_eq!(selector.try_wait(50), Err(SelectError::Timeout));
    selector.add(&listener);
    selector.remove(&listener);
    assert_eq!(selector.len(), 1);
}

#[test]
fn test_copy_and_original_evolve_independently() {
    let listener = local_listener();
    let (client, server) = connected_pair(&listener);
    let (read_end, write_end) = pipe();
    let pipe_endpoint = RawEndpoint::stream(&read_end);

    let mut original = Selector::new();
    original.add(&server);

    let mut copy = original.clone();
    copy.add(&pipe_endpoint);

    let writer = send_after(client, Duration::ZERO, b"x");
    assert!(original.wait(1000));
    assert!(original.is_ready(&server));
    assert!(!copy.is_ready(&server));
    assert!(!original.contains(&pipe_endpoint));

    assert_eq!(unsafe { libc::write(write_end.as_raw_fd(), b"p".as_ptr().cast(), 1) }, 1);
    copy.remove(&server);

    assert_eq!(copy.try_wait(1000), Ok(1));
    assert!(copy.is_ready(&pipe_endpoint));
    assert!(original.contains(&server));
    assert!(original.is_ready(&server));

    let _client = writer.join().unwrap();
}

#[test]
fn test_shared_selector_behind_mutex() {
    let listener = local_listener();
    let (client, server) = connected_pair(&listener);
    let server = Arc::new(server);

    let selector = Arc::new(Mutex::new(Selector::new()));
    selector.lock().unwrap().add(&*server);

    let waiter = {
        let selector = Arc::clone(&selector);
        let server = Arc::clone(&server);
        thread::spawn(move || {
            let mut selector = selector.lock().unwrap();
            selector.wait(2000) && selector.is_ready(&*server)
        })
    };

    let writer = send_after(client, Duration::from_millis(20), b"x");

    assert!(waiter.join().unwrap());
    let _client = writer.join().unwrap();
}

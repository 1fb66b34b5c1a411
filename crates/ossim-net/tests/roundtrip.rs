use std::{
    io::{Read, Write},
    os::unix::net::UnixStream,
    thread,
    time::Duration,
};

use ossim_net::{Transport, TransportEvent};
use ossim_protocol::{Frame, RequestKind};

#[test]
fn accepts_and_echoes_a_frame() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("echo.sock");
    let mut transport = Transport::bind(&path).unwrap();

    let client_path = path.clone();
    let client = thread::spawn(move || {
        thread::sleep(Duration::from_millis(20));
        let mut stream = UnixStream::connect(&client_path).unwrap();
        stream.write_all(&Frame::run(7, 3000).encode()).unwrap();

        let mut buf = [0u8; 12];
        stream.read_exact(&mut buf).unwrap();
        Frame::decode(&buf).unwrap()
    });

    let mut seen_conn = None;
    let mut seen_frame = None;
    let deadline = std::time::Instant::now() + Duration::from_secs(2);
    while seen_frame.is_none() && std::time::Instant::now() < deadline {
        transport.poll(|event| match event {
            TransportEvent::Accepted { conn } => seen_conn = Some(conn),
            TransportEvent::Frame { conn, frame } => {
                assert_eq!(Some(conn), seen_conn);
                seen_frame = Some(frame);
            }
            other => panic!("unexpected event: {other:?}"),
        });
        thread::sleep(Duration::from_millis(1));
    }

    let frame = seen_frame.expect("never received a frame");
    assert_eq!(frame, Frame::run(7, 3000));
    transport.send(seen_conn.unwrap(), Frame::ack(7, 0));

    for _ in 0..200 {
        transport.poll(|_| {});
        thread::sleep(Duration::from_millis(1));
    }

    let echoed = client.join().unwrap();
    assert_eq!(echoed, Frame::ack(7, 0));
    assert_eq!(echoed.request, RequestKind::Ack);
}

#[test]
fn disconnect_is_observed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("disconnect.sock");
    let mut transport = Transport::bind(&path).unwrap();

    let client_path = path.clone();
    let client = thread::spawn(move || {
        thread::sleep(Duration::from_millis(20));
        let stream = UnixStream::connect(&client_path).unwrap();
        drop(stream);
    });

    let mut accepted = false;
    let mut disconnected = false;
    let deadline = std::time::Instant::now() + Duration::from_secs(2);
    while !disconnected && std::time::Instant::now() < deadline {
        transport.poll(|event| match event {
            TransportEvent::Accepted { .. } => accepted = true,
            TransportEvent::Disconnected { .. } => disconnected = true,
            other => panic!("unexpected event: {other:?}"),
        });
        thread::sleep(Duration::from_millis(1));
    }

    client.join().unwrap();
    assert!(accepted);
    assert!(disconnected);
}

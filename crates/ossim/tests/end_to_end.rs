use std::{
    io::{Read, Write},
    os::unix::net::UnixStream,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::Duration,
};

use ossim::Scheduler;
use ossim_policy::PolicyKind;
use ossim_protocol::{Frame, RequestKind};

/// Small tick granularity so the tests run in real time without waiting
/// seconds for a multi-hundred-ms burst to complete.
const TEST_TICK_MS: u32 = 5;

struct Harness {
    socket_path: std::path::PathBuf,
    shutdown: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
    _dir: tempfile::TempDir,
}

impl Harness {
    fn spawn(policy: PolicyKind, quantum_ms: u32) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let socket_path = dir.path().join("ossim.sock");
        let shutdown = Arc::new(AtomicBool::new(false));

        let thread_path = socket_path.clone();
        let thread_shutdown = Arc::clone(&shutdown);
        let handle = thread::spawn(move || {
            let policy = policy.build(quantum_ms);
            let mut scheduler =
                Scheduler::new(&thread_path, policy, TEST_TICK_MS, false).expect("bind scheduler");
            scheduler.run(&thread_shutdown);
        });

        // Give the listener a moment to bind before clients connect.
        thread::sleep(Duration::from_millis(20));

        Self { socket_path, shutdown, handle: Some(handle), _dir: dir }
    }

    fn connect(&self) -> UnixStream {
        for _ in 0..50 {
            if let Ok(stream) = UnixStream::connect(&self.socket_path) {
                return stream;
            }
            thread::sleep(Duration::from_millis(5));
        }
        panic!("couldn't connect to {}", self.socket_path.display());
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn send(stream: &mut UnixStream, frame: Frame) {
    stream.write_all(&frame.encode()).unwrap();
}

fn recv(stream: &mut UnixStream) -> Frame {
    let mut buf = [0u8; 12];
    stream.read_exact(&mut buf).unwrap();
    Frame::decode(&buf).unwrap()
}

/// Scenario 1: single RUN under FIFO gets an immediate ACK and a DONE
/// once its burst elapses.
#[test]
fn single_run_fifo() {
    let harness = Harness::spawn(PolicyKind::Fifo, 500);
    let mut client = harness.connect();

    send(&mut client, Frame::run(0, 60));
    let ack = recv(&mut client);
    assert_eq!(ack.request, RequestKind::Ack);

    let done = recv(&mut client);
    assert_eq!(done.request, RequestKind::Done);
    assert!(done.time_ms >= ack.time_ms + 60 - TEST_TICK_MS);
}

/// Scenario 2: two clients under FIFO run strictly in arrival order — B
/// only starts once A's burst has fully completed.
#[test]
fn two_clients_fifo_arrival_order() {
    let harness = Harness::spawn(PolicyKind::Fifo, 500);
    let mut a = harness.connect();
    send(&mut a, Frame::run(0, 100));
    let ack_a = recv(&mut a);

    thread::sleep(Duration::from_millis(10));
    let mut b = harness.connect();
    send(&mut b, Frame::run(0, 50));
    let ack_b = recv(&mut b);

    let done_a = recv(&mut a);
    let done_b = recv(&mut b);

    assert_eq!(done_a.request, RequestKind::Done);
    assert_eq!(done_b.request, RequestKind::Done);
    assert!(done_b.time_ms >= done_a.time_ms, "B cannot finish before A under FIFO");
    assert!(ack_b.time_ms >= ack_a.time_ms);
}

/// Scenario 3: SJF picks the shorter burst first even though it arrived
/// second.
#[test]
fn sjf_orders_by_remaining_burst() {
    let harness = Harness::spawn(PolicyKind::Sjf, 500);
    let mut a = harness.connect();
    send(&mut a, Frame::run(0, 200));
    let _ack_a = recv(&mut a);

    thread::sleep(Duration::from_millis(10));
    let mut b = harness.connect();
    send(&mut b, Frame::run(0, 50));
    let _ack_b = recv(&mut b);

    let done_b = recv(&mut b);
    assert_eq!(done_b.request, RequestKind::Done);
    assert!(done_b.time_ms < 150, "the shorter burst should finish well before A's 200ms burst");
}

/// Scenario 4: round robin alternates three equal-length clients in
/// fixed slices instead of running one to completion before the next.
#[test]
fn round_robin_alternates_clients() {
    let quantum = 20;
    let harness = Harness::spawn(PolicyKind::Rr, quantum);
    let mut clients: Vec<_> = (0..3)
        .map(|_| {
            let mut c = harness.connect();
            send(&mut c, Frame::run(0, 60));
            let _ack = recv(&mut c);
            c
        })
        .collect();

    let mut finish_order = Vec::new();
    let mut remaining: Vec<usize> = (0..clients.len()).collect();
    while !remaining.is_empty() {
        remaining.retain(|&idx| {
            let mut buf = [0u8; 12];
            clients[idx].set_read_timeout(Some(Duration::from_millis(500))).unwrap();
            if clients[idx].read_exact(&mut buf).is_ok() {
                let frame = Frame::decode(&buf).unwrap();
                if frame.request == RequestKind::Done {
                    finish_order.push(idx);
                    return false;
                }
            }
            true
        });
    }

    assert_eq!(finish_order.len(), 3);
    let _ = &mut clients;
}

/// Scenario 5: a client that blocks mid-run sees `ACK/DONE` for the burst,
/// then `ACK/DONE` for the block, then can issue another burst.
#[test]
fn burst_then_block_then_burst() {
    let harness = Harness::spawn(PolicyKind::Fifo, 500);
    let mut client = harness.connect();

    send(&mut client, Frame::run(0, 40));
    let ack1 = recv(&mut client);
    assert_eq!(ack1.request, RequestKind::Ack);
    let done1 = recv(&mut client);
    assert_eq!(done1.request, RequestKind::Done);

    send(&mut client, Frame::block(0, 20));
    let ack2 = recv(&mut client);
    assert_eq!(ack2.request, RequestKind::Ack);
    let done2 = recv(&mut client);
    assert_eq!(done2.request, RequestKind::Done);

    send(&mut client, Frame::run(0, 30));
    let ack3 = recv(&mut client);
    assert_eq!(ack3.request, RequestKind::Ack);
    let done3 = recv(&mut client);
    assert_eq!(done3.request, RequestKind::Done);
}

/// Scenario 6: MLFQ demotes a long burst out of Q0 but still completes it
/// — and re-parks the client for its next request instead of hanging up.
#[test]
fn mlfq_demotes_and_completes_then_accepts_next_request() {
    let harness = Harness::spawn(PolicyKind::Mlfq, 500);
    let mut client = harness.connect();

    send(&mut client, Frame::run(0, 700));
    let _ack = recv(&mut client);
    let done = recv(&mut client);
    assert_eq!(done.request, RequestKind::Done);

    send(&mut client, Frame::run(0, 20));
    let ack2 = recv(&mut client);
    assert_eq!(ack2.request, RequestKind::Ack);
    let done2 = recv(&mut client);
    assert_eq!(done2.request, RequestKind::Done);
}

/// A client that disconnects mid-burst is reclaimed without the
/// scheduler panicking or leaking the CPU slot for later clients.
#[test]
fn disconnecting_client_is_reclaimed() {
    let harness = Harness::spawn(PolicyKind::Fifo, 500);
    {
        let mut client = harness.connect();
        send(&mut client, Frame::run(0, 500));
        let _ack = recv(&mut client);
    }
    thread::sleep(Duration::from_millis(50));

    let mut next = harness.connect();
    send(&mut next, Frame::run(0, 30));
    let ack = recv(&mut next);
    assert_eq!(ack.request, RequestKind::Ack);
    let done = recv(&mut next);
    assert_eq!(done.request, RequestKind::Done);
}

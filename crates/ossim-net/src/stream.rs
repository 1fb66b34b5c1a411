use std::{
    collections::VecDeque,
    io::{self, Read, Write},
    os::fd::AsRawFd,
};

use mio::{Interest, Registry, Token, net::UnixStream};
use ossim_protocol::{FRAME_SIZE, Frame, ProtocolError};
use tracing::{debug, warn};

/// Whether a connection is still usable after an I/O attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnState {
    Alive,
    Disconnected,
}

pub(crate) enum ReadOutcome {
    Frame(Result<Frame, ProtocolError>),
    WouldBlock,
    Disconnected,
}

/// One accepted client connection.
///
/// Frames are fixed-size ([`FRAME_SIZE`] bytes), so unlike a
/// length-prefixed byte stream the read side only ever needs to
/// accumulate exactly that many bytes before handing a frame to the
/// caller — there is no header to parse first.
///
/// Writes are "all-or-nothing" per the wire contract: a write that the
/// kernel can't accept in full is queued whole and retried on the next
/// `WRITABLE` readiness event. The backlog only ever holds whole frames
/// plus a partial-write offset, since every frame here is exactly
/// `FRAME_SIZE` bytes.
pub(crate) struct ClientStream {
    stream: UnixStream,
    rx_buf: [u8; FRAME_SIZE],
    rx_have: usize,
    send_backlog: VecDeque<([u8; FRAME_SIZE], usize)>,
    writable_armed: bool,
}

impl ClientStream {
    pub(crate) fn new(stream: UnixStream) -> Self {
        set_cloexec(&stream);
        Self {
            stream,
            rx_buf: [0; FRAME_SIZE],
            rx_have: 0,
            send_backlog: VecDeque::new(),
            writable_armed: false,
        }
    }

    pub(crate) fn register(&mut self, registry: &Registry, token: Token) -> io::Result<()> {
        registry.register(&mut self.stream, token, Interest::READABLE)
    }

    pub(crate) fn deregister(&mut self, registry: &Registry) {
        let _ = registry.deregister(&mut self.stream);
        let _ = self.stream.shutdown(std::net::Shutdown::Both);
    }

    /// Read one frame, if a full one is already buffered or the socket has
    /// enough bytes ready without blocking.
    pub(crate) fn read_frame(&mut self) -> ReadOutcome {
        loop {
            match self.stream.read(&mut self.rx_buf[self.rx_have..]) {
                Ok(0) => return ReadOutcome::Disconnected,
                Ok(n) => {
                    self.rx_have += n;
                    if self.rx_have == FRAME_SIZE {
                        let buf = self.rx_buf;
                        self.rx_have = 0;
                        return ReadOutcome::Frame(Frame::decode(&buf));
                    }
                }
                Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => {
                    return ReadOutcome::WouldBlock;
                }
                Err(err) => {
                    debug!(?err, "ossim-net: read failed");
                    return ReadOutcome::Disconnected;
                }
            }
        }
    }

    /// Write a frame immediately, or queue it if the write would block or
    /// a backlog is already draining.
    pub(crate) fn write_or_enqueue(&mut self, registry: &Registry, token: Token, frame: Frame) -> ConnState {
        let buf = frame.encode();

        if !self.send_backlog.is_empty() {
            self.send_backlog.push_back((buf, 0));
            return self.arm_writable(registry, token);
        }

        match self.stream.write(&buf) {
            Ok(0) => {
                warn!("ossim-net: write returned 0, disconnecting");
                ConnState::Disconnected
            }
            Ok(n) if n == FRAME_SIZE => ConnState::Alive,
            Ok(n) => {
                self.send_backlog.push_back((buf, n));
                self.arm_writable(registry, token)
            }
            Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => {
                self.send_backlog.push_back((buf, 0));
                self.arm_writable(registry, token)
            }
            Err(err) => {
                warn!(?err, "ossim-net: write failed");
                ConnState::Disconnected
            }
        }
    }

    /// Flush the backlog until the kernel blocks or it drains entirely.
    pub(crate) fn drain_backlog(&mut self, registry: &Registry, token: Token) -> ConnState {
        while let Some((buf, offset)) = self.send_backlog.front_mut() {
            match self.stream.write(&buf[*offset..]) {
                Ok(0) => return ConnState::Disconnected,
                Ok(n) => {
                    *offset += n;
                    if *offset == FRAME_SIZE {
                        self.send_backlog.pop_front();
                    }
                }
                Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(err) => {
                    debug!(?err, "ossim-net: backlog write failed");
                    return ConnState::Disconnected;
                }
            }
        }

        if self.send_backlog.is_empty() && self.writable_armed {
            if let Err(err) = registry.reregister(&mut self.stream, token, Interest::READABLE) {
                debug!(?err, "ossim-net: reregister readable-only failed");
                return ConnState::Disconnected;
            }
            self.writable_armed = false;
        }

        ConnState::Alive
    }

    fn arm_writable(&mut self, registry: &Registry, token: Token) -> ConnState {
        if !self.writable_armed {
            if let Err(err) =
                registry.reregister(&mut self.stream, token, Interest::READABLE | Interest::WRITABLE)
            {
                debug!(?err, "ossim-net: arm writable failed");
                return ConnState::Disconnected;
            }
            self.writable_armed = true;
        }
        ConnState::Alive
    }
}

fn set_cloexec(stream: &UnixStream) {
    let fd = stream.as_raw_fd();
    unsafe {
        let flags = libc::fcntl(fd, libc::F_GETFD);
        if flags == -1 || libc::fcntl(fd, libc::F_SETFD, flags | libc::FD_CLOEXEC) == -1 {
            warn!("ossim-net: couldn't set FD_CLOEXEC on accepted socket");
        }
    }
}

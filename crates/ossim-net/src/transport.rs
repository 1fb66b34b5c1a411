use std::{io, path::Path, time::Duration};

use mio::{Events, Interest, Poll, Token, net::UnixListener};
use ossim_pcb::ConnId;
use ossim_protocol::{Frame, ProtocolError};
use tracing::{debug, error, warn};

use crate::{
    error::TransportError,
    stream::{ClientStream, ConnState, ReadOutcome},
};

const LISTENER: Token = Token(usize::MAX);

/// Notable I/O occurrence surfaced by [`Transport::poll`].
#[derive(Debug)]
pub enum TransportEvent {
    /// A new client connected; the scheduler should admit it by creating
    /// a PCB in `Command` status.
    Accepted { conn: ConnId },
    /// A client sent a well-formed frame.
    Frame { conn: ConnId, frame: Frame },
    /// A client sent bytes that didn't decode to a known request. The
    /// connection stays open — the frame is dropped but the PCB is kept.
    BadFrame { conn: ConnId, error: ProtocolError },
    /// A client disconnected (EOF, reset, or a fatal I/O error).
    Disconnected { conn: ConnId },
}

/// Unix-domain-socket transport for the scheduler.
///
/// A single `mio::Poll` drives one listener and any number of accepted
/// streams, polled with a zero timeout so the caller's own tick loop
/// controls real-time pacing, not this type.
pub struct Transport {
    poll: Poll,
    events: Events,
    listener: UnixListener,
    socket_path: std::path::PathBuf,
    streams: Vec<(Token, ClientStream)>,
    next_token: usize,
}

impl Transport {
    /// Bind a listening socket at `path`, unlinking a stale socket file
    /// left behind by a previous run first.
    pub fn bind(path: &Path) -> Result<Self, TransportError> {
        if path.exists() {
            std::fs::remove_file(path).map_err(|source| TransportError::RemoveStaleSocket {
                path: path.display().to_string(),
                source,
            })?;
        }

        let mut listener = UnixListener::bind(path).map_err(|source| TransportError::Bind {
            path: path.display().to_string(),
            source,
        })?;

        let poll = Poll::new().map_err(TransportError::Poll)?;
        poll.registry()
            .register(&mut listener, LISTENER, Interest::READABLE)
            .map_err(TransportError::Register)?;

        Ok(Self {
            poll,
            events: Events::with_capacity(256),
            listener,
            socket_path: path.to_path_buf(),
            streams: Vec::new(),
            next_token: 0,
        })
    }

    /// Drain pending connections and I/O once (non-blocking), invoking
    /// `handler` for every [`TransportEvent`] observed.
    ///
    /// A listener-readable event accepts every pending connection, and a
    /// stream-readable event reads every frame currently available on
    /// that connection.
    pub fn poll<F>(&mut self, mut handler: F)
    where
        F: FnMut(TransportEvent),
    {
        if let Err(err) = self.poll.poll(&mut self.events, Some(Duration::ZERO)) {
            error!(?err, "ossim-net: mio poll failed");
            return;
        }

        // Borrow-check note: `self.events` must be iterated without holding
        // `&mut self`, so collect tokens first.
        let tokens: Vec<(Token, bool, bool)> =
            self.events.iter().map(|e| (e.token(), e.is_readable(), e.is_writable())).collect();

        for (token, readable, writable) in tokens {
            if token == LISTENER {
                self.accept_all(&mut handler);
                continue;
            }
            self.handle_stream_event(token, readable, writable, &mut handler);
        }
    }

    fn accept_all<F>(&mut self, handler: &mut F)
    where
        F: FnMut(TransportEvent),
    {
        loop {
            match self.listener.accept() {
                Ok((stream, _addr)) => {
                    let token = Token(self.next_token);
                    self.next_token += 1;

                    let mut client = ClientStream::new(stream);
                    if let Err(err) = client.register(self.poll.registry(), token) {
                        error!(?err, "ossim-net: couldn't register accepted stream");
                        continue;
                    }
                    self.streams.push((token, client));
                    handler(TransportEvent::Accepted { conn: token_to_conn(token) });
                }
                Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(ref e) if e.kind() == io::ErrorKind::ConnectionAborted => continue,
                Err(ref e)
                    if matches!(e.raw_os_error(), Some(libc::EMFILE) | Some(libc::ENFILE)) =>
                {
                    warn!(?e, "ossim-net: fd limit hit, stopping accept drain for this tick");
                    break;
                }
                Err(err) => {
                    error!(?err, "ossim-net: accept failed");
                    break;
                }
            }
        }
    }

    fn handle_stream_event<F>(&mut self, token: Token, readable: bool, writable: bool, handler: &mut F)
    where
        F: FnMut(TransportEvent),
    {
        let Some(idx) = self.streams.iter().position(|(t, _)| *t == token) else {
            return;
        };
        let conn = token_to_conn(token);

        if readable {
            loop {
                let outcome = self.streams[idx].1.read_frame();
                match outcome {
                    ReadOutcome::Frame(Ok(frame)) => handler(TransportEvent::Frame { conn, frame }),
                    ReadOutcome::Frame(Err(error)) => handler(TransportEvent::BadFrame { conn, error }),
                    ReadOutcome::WouldBlock => break,
                    ReadOutcome::Disconnected => {
                        self.drop_stream(idx, conn, handler);
                        return;
                    }
                }
            }
        }

        if writable {
            let state = self.streams[idx].1.drain_backlog(self.poll.registry(), token);
            if state == ConnState::Disconnected {
                self.drop_stream(idx, conn, handler);
            }
        }
    }

    fn drop_stream<F>(&mut self, idx: usize, conn: ConnId, handler: &mut F)
    where
        F: FnMut(TransportEvent),
    {
        let (_, mut client) = self.streams.remove(idx);
        client.deregister(self.poll.registry());
        handler(TransportEvent::Disconnected { conn });
    }

    /// Send a frame to `conn`, queueing it if the write would block.
    /// No-ops (and logs) if `conn` is unknown — already disconnected.
    pub fn send(&mut self, conn: ConnId, frame: Frame) {
        let token = conn_to_token(conn);
        let Some(idx) = self.streams.iter().position(|(t, _)| *t == token) else {
            debug!(?conn, "ossim-net: send to unknown/already-closed connection");
            return;
        };
        if self.streams[idx].1.write_or_enqueue(self.poll.registry(), token, frame) ==
            ConnState::Disconnected
        {
            let (_, mut client) = self.streams.remove(idx);
            client.deregister(self.poll.registry());
        }
    }

    /// Forcibly close a connection, e.g. after a protocol violation.
    pub fn disconnect(&mut self, conn: ConnId) {
        let token = conn_to_token(conn);
        if let Some(idx) = self.streams.iter().position(|(t, _)| *t == token) {
            let (_, mut client) = self.streams.remove(idx);
            client.deregister(self.poll.registry());
        }
    }
}

impl Drop for Transport {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.socket_path);
    }
}

fn token_to_conn(token: Token) -> ConnId {
    ConnId::new(token.0)
}

fn conn_to_token(conn: ConnId) -> Token {
    Token(conn.get())
}

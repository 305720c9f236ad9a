//! Engine session and the shuttle logic shared by both halves
//!
//! A [`Session`] owns the rustls connection and its two memory transports.
//! It never touches the pipeline itself: moving records out to the sink and
//! in from the source is done by whoever holds those endpoints, through the
//! [`OutboundPump`] and [`InboundPull`] capabilities.

use core::fmt;
use std::io::{ErrorKind, Read, Write};

use rustls::Connection;
use streamsec_common::MemoryTransport;

use crate::context::{Context, ProtocolVersion};
use crate::error::{Result, TlsResultExt};

/// Moves queued outbound records to the downstream sink.
pub trait OutboundPump {
    /// Drain every record the engine has queued into the sink, flushing the
    /// sink afterwards when `flush` is set. Returns the bytes moved.
    fn pump_outbound(&mut self, session: &mut Session, flush: bool) -> Result<usize>;
}

/// Feeds transport bytes from the upstream source to the engine.
pub trait InboundPull {
    /// Block until the upstream yields bytes and queue them for the engine.
    /// Returns the bytes queued.
    fn pull_inbound(&mut self, session: &mut Session) -> Result<usize>;
}

/// One TLS engine session with its inbound and outbound memory transports.
pub struct Session {
    conn: Connection,
    inbound: MemoryTransport,
    outbound: MemoryTransport,
    close_sent: bool,
    peer_closed: bool,
}

impl Session {
    pub fn new(context: &Context) -> Result<Self> {
        Ok(Self {
            conn: context.connect()?,
            inbound: MemoryTransport::new(),
            outbound: MemoryTransport::new(),
            close_sent: false,
            peer_closed: false,
        })
    }

    pub fn is_handshaking(&self) -> bool {
        self.conn.is_handshaking()
    }

    pub fn is_established(&self) -> bool {
        !self.conn.is_handshaking()
    }

    pub fn is_server(&self) -> bool {
        matches!(self.conn, Connection::Server(_))
    }

    /// Negotiated protocol version, once known
    pub fn protocol_version(&self) -> Option<ProtocolVersion> {
        self.conn.protocol_version().and_then(ProtocolVersion::from_rustls)
    }

    pub fn negotiated_cipher_suite(&self) -> Option<rustls::SupportedCipherSuite> {
        self.conn.negotiated_cipher_suite()
    }

    /// Whether our close_notify has been queued
    pub fn close_sent(&self) -> bool {
        self.close_sent
    }

    /// Whether the peer's close_notify has been processed
    pub fn peer_has_closed(&self) -> bool {
        self.peer_closed
    }

    /// Transport bytes received but not yet handed to the engine
    pub fn pending_inbound(&self) -> usize {
        self.inbound.len()
    }

    pub(crate) fn inbound_mut(&mut self) -> &mut MemoryTransport {
        &mut self.inbound
    }

    pub(crate) fn outbound_mut(&mut self) -> &mut MemoryTransport {
        &mut self.outbound
    }

    /// Hand queued inbound bytes to the engine for as long as it accepts
    /// them. Stops early while undelivered plaintext is pending.
    pub(crate) fn process(&mut self) -> Result<()> {
        while !self.inbound.is_empty() && self.conn.wants_read() {
            let n = self.conn.read_tls(&mut self.inbound).map_engine_err("tls read_tls")?;
            let state = self.conn.process_new_packets().map_engine_err("tls process")?;
            if state.peer_has_closed() && !self.peer_closed {
                tracing::debug!(server = self.is_server(), "tls peer sent close_notify");
                self.peer_closed = true;
            }
            if n == 0 {
                break;
            }
        }
        Ok(())
    }

    /// Move engine output into the outbound memory transport.
    pub(crate) fn stage_outbound(&mut self) -> Result<usize> {
        let mut total = 0;
        while self.conn.wants_write() {
            total += self.conn.write_tls(&mut self.outbound).map_engine_err("tls write_tls")?;
        }
        Ok(total)
    }

    pub(crate) fn read_plaintext(&mut self, dest: &mut [u8]) -> std::io::Result<usize> {
        self.conn.reader().read(dest)
    }

    pub(crate) fn write_plaintext(&mut self, src: &[u8]) -> std::io::Result<usize> {
        self.conn.writer().write(src)
    }

    /// Drop application data that arrives while closing.
    pub(crate) fn discard_plaintext(&mut self) -> Result<()> {
        let mut scratch = [0u8; 4096];
        loop {
            match self.read_plaintext(&mut scratch) {
                Ok(0) => return Ok(()),
                Ok(n) => tracing::trace!(bytes = n, "tls discarding plaintext during shutdown"),
                Err(e) if e.kind() == ErrorKind::WouldBlock => return Ok(()),
                Err(e) => return Err(e).map_engine_err("tls shutdown read"),
            }
        }
    }

    /// Queue close_notify, once.
    pub(crate) fn send_close_notify(&mut self) {
        if !self.close_sent {
            tracing::debug!(server = self.is_server(), "tls sending close_notify");
            self.conn.send_close_notify();
            self.close_sent = true;
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("server", &self.is_server())
            .field("handshaking", &self.is_handshaking())
            .field("inbound", &self.inbound.len())
            .field("outbound", &self.outbound.len())
            .field("close_sent", &self.close_sent)
            .field("peer_closed", &self.peer_closed)
            .finish()
    }
}

/// Process inbound records; on a fatal engine error, push the alert the
/// engine queued towards the peer before returning the error.
pub(crate) fn process_or_alert<P>(session: &mut Session, pump: &mut P) -> Result<()>
where
    P: OutboundPump + ?Sized,
{
    if let Err(e) = session.process() {
        if let Err(pump_err) = pump.pump_outbound(session, true) {
            tracing::debug!(error = %pump_err, "could not deliver fatal alert");
        }
        return Err(e);
    }
    Ok(())
}

/// The engine needs more transport input: pump outbound first, then pull
/// inbound unless the engine still has unconsumed input queued.
pub(crate) fn want_read<P, Q>(session: &mut Session, pump: &mut P, pull: &mut Q) -> Result<usize>
where
    P: OutboundPump + ?Sized,
    Q: InboundPull + ?Sized,
{
    pump.pump_outbound(session, true)?;
    if session.inbound.is_empty() {
        pull.pull_inbound(session)?;
    }
    Ok(0)
}

/// One handshake step. Always returns 0; the caller retries until the
/// session is established.
pub(crate) fn advance_handshake<P, Q>(session: &mut Session, pump: &mut P, pull: &mut Q) -> Result<usize>
where
    P: OutboundPump + ?Sized,
    Q: InboundPull + ?Sized,
{
    process_or_alert(session, pump)?;
    if session.is_handshaking() {
        return want_read(session, pump, pull);
    }
    tracing::debug!(
        server = session.is_server(),
        version = ?session.protocol_version(),
        "tls handshake complete"
    );
    Ok(0)
}

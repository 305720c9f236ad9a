//! Writing half of the TLS transform

use streamsec_api::{Result, Sink};

use crate::error::TlsResultExt;
use crate::session::{advance_handshake, InboundPull, OutboundPump, Session};

/// Owns the downstream sink; feeds plaintext into the session.
#[derive(Debug)]
pub struct TlsEncrypt<K: Sink> {
    downstream: K,
}

impl<K: Sink> TlsEncrypt<K> {
    pub fn new(downstream: K) -> Self {
        Self { downstream }
    }

    pub fn get_ref(&self) -> &K {
        &self.downstream
    }

    pub fn get_mut(&mut self) -> &mut K {
        &mut self.downstream
    }

    /// One write step.
    ///
    /// Returns the plaintext bytes accepted, or 0 after a handshake step or
    /// when the engine's send buffer was full and had to be pumped first.
    /// Accepted bytes are encrypted and pumped to the sink immediately; the
    /// sink is not flushed.
    pub fn write_bytes<Q>(&mut self, session: &mut Session, src: &[u8], pull: &mut Q) -> Result<usize>
    where
        Q: InboundPull + ?Sized,
    {
        if src.is_empty() {
            return Ok(0);
        }
        if session.is_handshaking() {
            return advance_handshake(session, self, pull);
        }

        let n = session.write_plaintext(src).map_engine_err("tls write")?;
        if n > 0 {
            self.pump_outbound(session, false)?;
            return Ok(n);
        }
        self.pump_outbound(session, true)?;
        Ok(0)
    }
}

impl<K: Sink> OutboundPump for TlsEncrypt<K> {
    fn pump_outbound(&mut self, session: &mut Session, flush: bool) -> Result<usize> {
        session.stage_outbound()?;
        let n = session.outbound_mut().drain_to(&mut self.downstream)?;
        if n > 0 {
            tracing::trace!(bytes = n, "tls pumped outbound");
        }
        if flush {
            self.downstream.flush()?;
        }
        Ok(n)
    }
}

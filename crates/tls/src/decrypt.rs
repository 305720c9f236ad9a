//! Reading half of the TLS transform

use std::io::ErrorKind;

use streamsec_api::{Error, Result, Source};
use streamsec_params::MAX_TLS_RECORD_SIZE;

use crate::error::TlsResultExt;
use crate::session::{advance_handshake, process_or_alert, want_read, InboundPull, OutboundPump, Session};

/// Owns the upstream source; yields plaintext from the session.
#[derive(Debug)]
pub struct TlsDecrypt<S: Source> {
    upstream: S,
}

impl<S: Source> TlsDecrypt<S> {
    pub fn new(upstream: S) -> Self {
        Self { upstream }
    }

    pub fn get_ref(&self) -> &S {
        &self.upstream
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.upstream
    }

    /// One read step.
    ///
    /// Returns plaintext bytes, or 0 after a handshake step or a transport
    /// shuttle. Fails with [`Error::NoMoreData`] once the peer has sent
    /// close_notify and all plaintext before it was delivered.
    pub fn read_bytes<P>(&mut self, session: &mut Session, dest: &mut [u8], pump: &mut P) -> Result<usize>
    where
        P: OutboundPump + ?Sized,
    {
        if dest.is_empty() {
            return Ok(0);
        }
        if session.is_handshaking() {
            return advance_handshake(session, pump, self);
        }

        process_or_alert(session, pump)?;
        match session.read_plaintext(dest) {
            Ok(0) => Err(Error::no_more_data("tls read")),
            Ok(n) => Ok(n),
            Err(e) if e.kind() == ErrorKind::WouldBlock => want_read(session, pump, self),
            Err(e) => Err(e).map_engine_err("tls read"),
        }
    }
}

impl<S: Source> InboundPull for TlsDecrypt<S> {
    fn pull_inbound(&mut self, session: &mut Session) -> Result<usize> {
        let n = session
            .inbound_mut()
            .fill_from(&mut self.upstream, MAX_TLS_RECORD_SIZE)?;
        tracing::trace!(bytes = n, "tls pulled inbound");
        Ok(n)
    }
}

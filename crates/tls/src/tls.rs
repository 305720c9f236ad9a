//! Composite TLS transform

use streamsec_api::{Input, Output, Result, Sink, Source};

use crate::context::{Context, ProtocolVersion};
use crate::decrypt::TlsDecrypt;
use crate::encrypt::TlsEncrypt;
use crate::session::{advance_handshake, process_or_alert, InboundPull, OutboundPump, Session};

/// TLS over a pipeline: ciphertext is pulled from `S` and pushed to `K`,
/// plaintext is exchanged through [`Input`] and [`Output`].
///
/// The session is shared by the reading and writing halves; each half is
/// handed the other's capability (outbound pump or inbound pull) for the
/// duration of a call, since either direction may need to move records the
/// other way while the handshake runs.
///
/// Dropping an established session that was never shut down queues
/// close_notify and pumps it out on a best-effort basis.
#[derive(Debug)]
pub struct Tls<S: Source, K: Sink> {
    session: Session,
    decrypt: TlsDecrypt<S>,
    encrypt: TlsEncrypt<K>,
}

impl<S: Source, K: Sink> Tls<S, K> {
    pub fn new(context: &Context, upstream: S, downstream: K) -> Result<Self> {
        Ok(Self {
            session: Session::new(context)?,
            decrypt: TlsDecrypt::new(upstream),
            encrypt: TlsEncrypt::new(downstream),
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_established(&self) -> bool {
        self.session.is_established()
    }

    pub fn is_server(&self) -> bool {
        self.session.is_server()
    }

    pub fn protocol_version(&self) -> Option<ProtocolVersion> {
        self.session.protocol_version()
    }

    pub fn negotiated_cipher_suite(&self) -> Option<rustls::SupportedCipherSuite> {
        self.session.negotiated_cipher_suite()
    }

    pub fn upstream(&self) -> &S {
        self.decrypt.get_ref()
    }

    pub fn downstream(&self) -> &K {
        self.encrypt.get_ref()
    }

    /// Drive the handshake to completion without exchanging data.
    pub fn handshake(&mut self) -> Result<()> {
        while self.session.is_handshaking() {
            advance_handshake(&mut self.session, &mut self.encrypt, &mut self.decrypt)?;
        }
        // the final flight (client Finished) is still queued in the engine
        self.encrypt.pump_outbound(&mut self.session, true)?;
        Ok(())
    }

    /// Close the session in both directions.
    ///
    /// Sends close_notify, then waits for the peer's, discarding any
    /// application data that arrives first. Returns `true` on a clean
    /// bidirectional close and `false` when the transport fails before the
    /// peer's close_notify arrives. Engine errors are returned as errors.
    pub fn shutdown(&mut self) -> Result<bool> {
        self.session.send_close_notify();
        loop {
            process_or_alert(&mut self.session, &mut self.encrypt)?;
            self.session.discard_plaintext()?;

            if let Err(e) = self.encrypt.pump_outbound(&mut self.session, true) {
                tracing::warn!(error = %e, "tls shutdown incomplete: close_notify not delivered");
                return Ok(false);
            }
            if self.session.peer_has_closed() {
                tracing::debug!(server = self.session.is_server(), "tls shutdown complete");
                return Ok(true);
            }
            if self.session.pending_inbound() == 0 {
                if let Err(e) = self.decrypt.pull_inbound(&mut self.session) {
                    tracing::warn!(error = %e, "tls shutdown incomplete: peer did not close");
                    return Ok(false);
                }
            }
        }
    }
}

impl<S: Source, K: Sink> Input for Tls<S, K> {
    fn read_bytes(&mut self, dest: &mut [u8]) -> Result<usize> {
        self.decrypt.read_bytes(&mut self.session, dest, &mut self.encrypt)
    }
}

impl<S: Source, K: Sink> Output for Tls<S, K> {
    fn write_bytes(&mut self, src: &[u8]) -> Result<usize> {
        self.encrypt.write_bytes(&mut self.session, src, &mut self.decrypt)
    }

    fn flush(&mut self) -> Result<()> {
        self.encrypt.pump_outbound(&mut self.session, true).map(|_| ())
    }
}

impl<S: Source, K: Sink> Drop for Tls<S, K> {
    fn drop(&mut self) {
        if !self.session.is_established() || self.session.close_sent() {
            return;
        }
        self.session.send_close_notify();
        if let Err(e) = self.encrypt.pump_outbound(&mut self.session, true) {
            tracing::warn!(error = %e, "implicit tls shutdown failed");
        }
    }
}

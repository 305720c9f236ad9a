//! TLS configuration shared by sessions
//!
//! A [`Context`] holds everything a session needs besides its transport: the
//! role and allowed protocol versions, the local identity, the trusted
//! issuers and, for clients, the expected server name. Engine configurations
//! are built lazily, cached, and rebuilt after any change.

use core::fmt;
use std::sync::{Arc, OnceLock};

use rustls::crypto::CryptoProvider;
use rustls::server::WebPkiClientVerifier;
use rustls::{ClientConfig, ClientConnection, Connection, RootCertStore, ServerConfig, ServerConnection};
use rustls::SupportedProtocolVersion;
use rustls_pki_types::{CertificateDer, PrivateKeyDer, ServerName};

use crate::error::{validate, Error, Result, TlsResultExt};

/// Which side of the handshake a session plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Role {
    Client,
    Server,
}

/// TLS protocol versions a context may negotiate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProtocolVersion {
    Tls12,
    Tls13,
}

impl ProtocolVersion {
    fn supported(self) -> &'static SupportedProtocolVersion {
        match self {
            Self::Tls12 => &rustls::version::TLS12,
            Self::Tls13 => &rustls::version::TLS13,
        }
    }

    pub(crate) fn from_rustls(version: rustls::ProtocolVersion) -> Option<Self> {
        match version {
            rustls::ProtocolVersion::TLSv1_2 => Some(Self::Tls12),
            rustls::ProtocolVersion::TLSv1_3 => Some(Self::Tls13),
            _ => None,
        }
    }
}

/// Role plus the protocol versions a context allows
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Method {
    role: Role,
    versions: Vec<ProtocolVersion>,
}

impl Method {
    /// Client allowing TLS 1.3 and TLS 1.2
    pub fn client() -> Self {
        Self {
            role: Role::Client,
            versions: vec![ProtocolVersion::Tls13, ProtocolVersion::Tls12],
        }
    }

    /// Server allowing TLS 1.3 and TLS 1.2
    pub fn server() -> Self {
        Self {
            role: Role::Server,
            versions: vec![ProtocolVersion::Tls13, ProtocolVersion::Tls12],
        }
    }

    /// Restrict to `versions`. Duplicates are dropped; an empty list is
    /// rejected when the context is built.
    pub fn with_versions(mut self, versions: &[ProtocolVersion]) -> Self {
        self.versions.clear();
        for v in versions {
            if !self.versions.contains(v) {
                self.versions.push(*v);
            }
        }
        self
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn versions(&self) -> &[ProtocolVersion] {
        &self.versions
    }

    pub fn is_server(&self) -> bool {
        self.role == Role::Server
    }
}

struct Identity {
    chain: Vec<CertificateDer<'static>>,
    key: PrivateKeyDer<'static>,
}

fn default_provider() -> Arc<CryptoProvider> {
    static INSTANCE: OnceLock<Arc<CryptoProvider>> = OnceLock::new();
    INSTANCE
        .get_or_init(|| Arc::new(rustls::crypto::aws_lc_rs::default_provider()))
        .clone()
}

fn config_error(context: &'static str) -> impl FnOnce(rustls::Error) -> Error {
    move |e| Error::Configuration {
        context,
        message: e.to_string(),
    }
}

/// Shared TLS configuration
///
/// Read-only once sessions exist, apart from [`Context::add_to_store`], which
/// takes `&mut self`; share it behind an `Arc` and add trust anchors before
/// wrapping it.
pub struct Context {
    method: Method,
    identity: Option<Identity>,
    roots: RootCertStore,
    server_name: Option<ServerName<'static>>,
    provider: Arc<CryptoProvider>,
    client_config: OnceLock<Arc<ClientConfig>>,
    server_config: OnceLock<Arc<ServerConfig>>,
}

impl Context {
    /// Context without a local identity
    pub fn new(method: Method) -> Self {
        Self {
            method,
            identity: None,
            roots: RootCertStore::empty(),
            server_name: None,
            provider: default_provider(),
            client_config: OnceLock::new(),
            server_config: OnceLock::new(),
        }
    }

    /// Context presenting `chain` (leaf first) with its private key.
    ///
    /// The engine configuration is built immediately, so a key the engine
    /// cannot load fails here rather than at the first handshake.
    pub fn with_identity(
        method: Method,
        chain: Vec<CertificateDer<'static>>,
        key: PrivateKeyDer<'static>,
    ) -> Result<Self> {
        validate::parameter(!chain.is_empty(), "tls identity", "certificate chain is empty")?;
        let mut context = Self::new(method);
        context.identity = Some(Identity { chain, key });
        context.build_for_role()?;
        Ok(context)
    }

    /// Expected name of the server; required for client contexts.
    pub fn with_server_name(mut self, name: &str) -> Result<Self> {
        let name = ServerName::try_from(name.to_string()).map_err(|e| Error::Configuration {
            context: "tls server name",
            message: e.to_string(),
        })?;
        self.server_name = Some(name);
        Ok(self)
    }

    /// Restrict the negotiable protocol versions.
    pub fn with_protocol_versions(mut self, versions: &[ProtocolVersion]) -> Result<Self> {
        self.method = self.method.with_versions(versions);
        self.reset();
        self.build_for_role()?;
        Ok(self)
    }

    /// Trust `cert` as an issuer.
    ///
    /// For a client this is the set of acceptable server roots. For a server
    /// a non-empty store switches on client certificate verification.
    pub fn add_to_store(&mut self, cert: CertificateDer<'static>) -> Result<()> {
        self.roots.add(cert).map_err(config_error("tls trust store"))?;
        self.reset();
        Ok(())
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn is_server(&self) -> bool {
        self.method.is_server()
    }

    pub fn has_identity(&self) -> bool {
        self.identity.is_some()
    }

    pub fn server_name(&self) -> Option<&ServerName<'static>> {
        self.server_name.as_ref()
    }

    /// Number of trusted issuers
    pub fn trusted_count(&self) -> usize {
        self.roots.len()
    }

    /// Create the engine connection for one session.
    pub(crate) fn connect(&self) -> Result<Connection> {
        match self.method.role() {
            Role::Client => {
                let Some(name) = self.server_name.clone() else {
                    return Err(Error::Configuration {
                        context: "tls client",
                        message: "client context has no server name".to_string(),
                    });
                };
                let conn = ClientConnection::new(self.client_config()?, name).map_engine_err("tls client")?;
                Ok(Connection::Client(conn))
            }
            Role::Server => {
                let conn = ServerConnection::new(self.server_config()?).map_engine_err("tls server")?;
                Ok(Connection::Server(conn))
            }
        }
    }

    fn reset(&mut self) {
        self.client_config = OnceLock::new();
        self.server_config = OnceLock::new();
    }

    fn build_for_role(&self) -> Result<()> {
        match self.method.role() {
            Role::Client => self.client_config().map(|_| ()),
            Role::Server if self.identity.is_some() => self.server_config().map(|_| ()),
            Role::Server => Ok(()),
        }
    }

    fn versions(&self) -> Result<Vec<&'static SupportedProtocolVersion>> {
        let versions = self.method.versions();
        validate::configuration(!versions.is_empty(), "tls versions", "no protocol version allowed")?;
        Ok(versions.iter().map(|v| v.supported()).collect())
    }

    fn client_config(&self) -> Result<Arc<ClientConfig>> {
        if let Some(config) = self.client_config.get() {
            return Ok(config.clone());
        }

        let builder = ClientConfig::builder_with_provider(self.provider.clone())
            .with_protocol_versions(&self.versions()?)
            .map_err(config_error("tls client config"))?
            .with_root_certificates(self.roots.clone());
        let config = match &self.identity {
            Some(identity) => builder
                .with_client_auth_cert(identity.chain.clone(), identity.key.clone_key())
                .map_err(config_error("tls client identity"))?,
            None => builder.with_no_client_auth(),
        };

        let config = Arc::new(config);
        let _ = self.client_config.set(config.clone());
        Ok(config)
    }

    fn server_config(&self) -> Result<Arc<ServerConfig>> {
        if let Some(config) = self.server_config.get() {
            return Ok(config.clone());
        }
        let Some(identity) = &self.identity else {
            return Err(Error::Configuration {
                context: "tls server",
                message: "server context has no certificate".to_string(),
            });
        };

        let builder = ServerConfig::builder_with_provider(self.provider.clone())
            .with_protocol_versions(&self.versions()?)
            .map_err(config_error("tls server config"))?;
        let builder = if self.roots.is_empty() {
            builder.with_no_client_auth()
        } else {
            let verifier = WebPkiClientVerifier::builder_with_provider(
                Arc::new(self.roots.clone()),
                self.provider.clone(),
            )
            .build()
            .map_err(|e| Error::Configuration {
                context: "tls client verifier",
                message: e.to_string(),
            })?;
            builder.with_client_cert_verifier(verifier)
        };
        let config = builder
            .with_single_cert(identity.chain.clone(), identity.key.clone_key())
            .map_err(config_error("tls server identity"))?;

        let config = Arc::new(config);
        let _ = self.server_config.set(config.clone());
        Ok(config)
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("method", &self.method)
            .field("identity", &self.identity.as_ref().map(|i| i.chain.len()))
            .field("trusted", &self.roots.len())
            .field("server_name", &self.server_name)
            .finish_non_exhaustive()
    }
}

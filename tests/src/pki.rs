//! Throwaway certificate authorities for TLS tests

use rcgen::{BasicConstraints, CertificateParams, IsCa, KeyPair};
use rustls_pki_types::{CertificateDer, PrivateKeyDer};

/// Name every test leaf certificate is issued for
pub const TEST_DOMAIN: &str = "domain.loc";

/// A CA and one leaf certificate it signed.
#[derive(Debug)]
pub struct Pki {
    pub ca: CertificateDer<'static>,
    pub leaf: CertificateDer<'static>,
    leaf_key: Vec<u8>,
}

impl Pki {
    /// Fresh CA with a leaf for [`TEST_DOMAIN`]
    pub fn generate() -> Self {
        Self::for_name(TEST_DOMAIN)
    }

    pub fn for_name(name: &str) -> Self {
        let ca_key = KeyPair::generate().expect("ca key");
        let mut ca_params = CertificateParams::new(Vec::<String>::new()).expect("ca params");
        ca_params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
        let ca_cert = ca_params.self_signed(&ca_key).expect("ca cert");

        let leaf_key = KeyPair::generate().expect("leaf key");
        let leaf_params = CertificateParams::new(vec![name.to_string()]).expect("leaf params");
        let leaf_cert = leaf_params
            .signed_by(&leaf_key, &ca_cert, &ca_key)
            .expect("leaf cert");

        Self {
            ca: ca_cert.der().clone(),
            leaf: leaf_cert.der().clone(),
            leaf_key: leaf_key.serialize_der(),
        }
    }

    /// Leaf first, as presented on the wire
    pub fn chain(&self) -> Vec<CertificateDer<'static>> {
        vec![self.leaf.clone()]
    }

    pub fn key(&self) -> PrivateKeyDer<'static> {
        PrivateKeyDer::Pkcs8(self.leaf_key.clone().into())
    }
}

//! Single-owner wrapper around an OpenSSL cipher context

use core::fmt;

use openssl::symm::{Cipher as Algorithm, Crypter, Mode};
use streamsec_api::error::validate;
use streamsec_common::SecretVec;

use crate::error::{CipherResultExt, Error, Result};

/// Algorithm, key and IV for one cipher context.
///
/// Key and IV are held in zeroizing storage and checked against the
/// algorithm's expected lengths when the parameter set is built, so engine
/// construction never sees a malformed key.
#[derive(Clone)]
pub struct CipherParams {
    algorithm: Algorithm,
    key: SecretVec,
    iv: Option<SecretVec>,
}

impl CipherParams {
    /// Build a parameter set.
    ///
    /// # Errors
    /// [`Error::InvalidLength`] when the key or IV length does not match the
    /// algorithm, [`Error::InvalidParameter`] when an IV is given to an
    /// algorithm that takes none or omitted for one that needs it.
    pub fn new(algorithm: Algorithm, key: impl Into<SecretVec>, iv: Option<&[u8]>) -> Result<Self> {
        let key = key.into();
        validate::length("cipher key", key.len(), algorithm.key_len())?;

        let iv = match (algorithm.iv_len(), iv) {
            (Some(expected), Some(iv)) => {
                validate::length("cipher iv", iv.len(), expected)?;
                Some(SecretVec::from_slice(iv))
            }
            (Some(expected), None) => {
                validate::parameter(expected == 0, "cipher iv", "algorithm requires an IV")?;
                None
            }
            (None, Some(_)) => {
                return Err(Error::InvalidParameter {
                    context: "cipher iv",
                    message: "algorithm does not take an IV".to_string(),
                })
            }
            (None, None) => None,
        };

        Ok(Self { algorithm, key, iv })
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Block length reported by the algorithm; 1 for stream ciphers
    pub fn block_size(&self) -> usize {
        self.algorithm.block_size()
    }
}

impl fmt::Debug for CipherParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CipherParams")
            .field("algorithm", &self.algorithm.nid().short_name().unwrap_or("?"))
            .field("key", &self.key)
            .field("iv", &self.iv)
            .finish()
    }
}

/// Exclusively owned cipher context.
///
/// Exposes only update, finalize and block size. Output-size requirements
/// are checked up front and reported as errors rather than left to the
/// engine.
pub struct CipherEngine {
    crypter: Crypter,
    block_size: usize,
}

impl CipherEngine {
    pub fn new(params: &CipherParams, mode: Mode) -> Result<Self> {
        let iv = params.iv.as_ref().map(SecretVec::as_slice);
        let mut crypter = Crypter::new(params.algorithm, mode, params.key.as_slice(), iv)
            .map_engine_err("cipher init")?;
        crypter.pad(true);
        Ok(Self {
            crypter,
            block_size: params.block_size(),
        })
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Output space `update` needs for `input_len` bytes of input
    pub fn update_space(&self, input_len: usize) -> usize {
        if self.block_size > 1 {
            input_len + self.block_size
        } else {
            input_len
        }
    }

    /// Feed `input` through the context, returning the bytes written to
    /// `output`.
    pub fn update(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize> {
        let needed = self.update_space(input.len());
        if output.len() < needed {
            return Err(Error::InvalidLength {
                context: "cipher update output",
                expected: needed,
                actual: output.len(),
            });
        }
        self.crypter
            .update(input, output)
            .map_engine_err("cipher update")
    }

    /// Flush the final block into `output`, returning the bytes written.
    pub fn finalize(&mut self, output: &mut [u8]) -> Result<usize> {
        if self.block_size > 1 && output.len() < self.block_size {
            return Err(Error::InvalidLength {
                context: "cipher final output",
                expected: self.block_size,
                actual: output.len(),
            });
        }
        self.crypter.finalize(output).map_engine_err("cipher final")
    }
}

impl fmt::Debug for CipherEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CipherEngine")
            .field("block_size", &self.block_size)
            .finish_non_exhaustive()
    }
}

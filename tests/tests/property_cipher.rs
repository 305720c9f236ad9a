//! Property-based tests for the cipher transforms

use proptest::prelude::*;
use streamsec_api::Input;
use streamsec_common::{SliceSource, VecSink};
use streamsec_symmetric::{Algorithm, CipherDecrypt, CipherEncrypt, CipherParams};
use streamsec_tests::{read_chunked, write_chunked};

const ALGORITHMS: usize = 4;

fn algorithm(index: usize) -> Algorithm {
    match index % ALGORITHMS {
        0 => Algorithm::aes_256_cbc(),
        1 => Algorithm::aes_128_ctr(),
        2 => Algorithm::aes_128_ofb(),
        _ => Algorithm::chacha20(),
    }
}

fn params(index: usize, key_byte: u8, iv_byte: u8) -> CipherParams {
    let algorithm = algorithm(index);
    let key = vec![key_byte; algorithm.key_len()];
    let iv = vec![iv_byte; algorithm.iv_len().unwrap_or(0)];
    CipherParams::new(algorithm, key, Some(&iv[..])).unwrap()
}

fn encrypt_chunked(params: &CipherParams, data: &[u8], max_chunk: usize, seed: u64) -> Vec<u8> {
    let mut sink = VecSink::new();
    {
        let mut enc = CipherEncrypt::new(&mut sink, params).unwrap();
        write_chunked(&mut enc, data, max_chunk, seed).unwrap();
        enc.finalize_encryption().unwrap();
    }
    sink.into_inner()
}

proptest! {
    #[test]
    fn roundtrip_any_chunking(
        index in 0..ALGORITHMS,
        key_byte in any::<u8>(),
        iv_byte in any::<u8>(),
        data in prop::collection::vec(any::<u8>(), 0..2048),
        write_chunk in 1usize..100,
        read_chunk in 1usize..100,
        seed in any::<u64>(),
    ) {
        let params = params(index, key_byte, iv_byte);
        let ciphertext = encrypt_chunked(&params, &data, write_chunk, seed);

        let mut dec = CipherDecrypt::new(SliceSource::new(&ciphertext), &params).unwrap();
        let plaintext = read_chunked(&mut dec, read_chunk, seed ^ 0x5a5a).unwrap();
        prop_assert_eq!(plaintext, data);
    }

    #[test]
    fn ciphertext_independent_of_write_chunking(
        index in 0..ALGORITHMS,
        data in prop::collection::vec(any::<u8>(), 0..1024),
        write_chunk in 1usize..64,
        seed in any::<u64>(),
    ) {
        let params = params(index, 0x42, 0x24);
        let whole = encrypt_chunked(&params, &data, data.len().max(1), 0);
        let pieces = encrypt_chunked(&params, &data, write_chunk, seed);
        prop_assert_eq!(&whole, &pieces);

        let block_size = algorithm(index).block_size();
        let expected_len = if block_size > 1 {
            (data.len() / block_size + 1) * block_size
        } else {
            data.len()
        };
        prop_assert_eq!(whole.len(), expected_len);
    }

    #[test]
    fn source_view_size_does_not_matter(
        index in 0..ALGORITHMS,
        data in prop::collection::vec(any::<u8>(), 1..1024),
        max_view in 1usize..50,
        read_chunk in 1usize..80,
    ) {
        let params = params(index, 7, 9);
        let ciphertext = encrypt_chunked(&params, &data, 256, 1);

        let source = SliceSource::new(&ciphertext).with_max_chunk(max_view);
        let mut dec = CipherDecrypt::new(source, &params).unwrap();
        let plaintext = read_chunked(&mut dec, read_chunk, 2).unwrap();
        prop_assert_eq!(plaintext, data);
    }

    #[test]
    fn explicit_finalize_matches_starvation_finalize(
        index in 0..ALGORITHMS,
        data in prop::collection::vec(any::<u8>(), 0..512),
    ) {
        let params = params(index, 1, 2);
        let ciphertext = encrypt_chunked(&params, &data, 64, 3);

        let mut dec = CipherDecrypt::new(SliceSource::new(&ciphertext), &params)
            .unwrap()
            .with_finalize_on_starvation(false);
        let mut out = Vec::new();
        let mut buf = [0u8; 64];
        loop {
            match dec.read_bytes(&mut buf) {
                Ok(n) => out.extend_from_slice(&buf[..n]),
                Err(e) if e.is_no_more_data() => break,
                Err(e) => return Err(TestCaseError::fail(e.to_string())),
            }
        }
        dec.finalize_decryption().unwrap();
        // lookahead drains first, then the released context reports itself
        loop {
            match dec.read_bytes(&mut buf) {
                Ok(n) => out.extend_from_slice(&buf[..n]),
                Err(e) => {
                    prop_assert!(!dec.is_initialized());
                    prop_assert!(!e.is_no_more_data());
                    break;
                }
            }
        }
        prop_assert_eq!(out, data);
    }
}

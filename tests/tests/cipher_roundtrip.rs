//! Cipher transforms chained over real pipelines

use std::io::Cursor;

use streamsec_api::{Error, Input, Output};
use streamsec_common::{BufferedSink, BufferedSource, IoSink, IoSource, SliceSource, VecSink};
use streamsec_symmetric::{Algorithm, Cipher, CipherDecrypt, CipherEncrypt, CipherParams};
use streamsec_params::DEFAULT_BUFFER_SIZE;
use streamsec_tests::{read_chunked, test_bytes, write_chunked};

fn params(algorithm: Algorithm, seed: u64) -> CipherParams {
    let key = test_bytes(seed, algorithm.key_len());
    let iv = algorithm.iv_len().map(|len| test_bytes(seed + 1, len));
    CipherParams::new(algorithm, key, iv.as_deref()).unwrap()
}

fn encrypt(params: &CipherParams, plaintext: &[u8]) -> Vec<u8> {
    let mut sink = VecSink::new();
    let mut enc = CipherEncrypt::new(&mut sink, params).unwrap();
    enc.write_all(plaintext).unwrap();
    enc.finalize_encryption().unwrap();
    drop(enc);
    sink.into_inner()
}

#[test]
fn test_io_file_roundtrip() {
    let params = params(Algorithm::aes_256_cbc(), 1);
    let plaintext = test_bytes(10, 50_000);

    let mut file = Vec::new();
    {
        let mut enc = CipherEncrypt::new(IoSink::new(&mut file), &params).unwrap();
        write_chunked(&mut enc, &plaintext, 777, 11).unwrap();
        enc.finalize_encryption().unwrap();
        enc.flush().unwrap();
    }
    assert_eq!(file.len(), (plaintext.len() / 16 + 1) * 16);

    let mut dec = CipherDecrypt::new(IoSource::with_chunk(Cursor::new(file), 1000), &params).unwrap();
    assert_eq!(read_chunked(&mut dec, 513, 12).unwrap(), plaintext);
}

#[test]
fn test_large_io_roundtrip_stays_bounded() {
    let plaintext = test_bytes(13, 4 * 1024 * 1024 + 7);
    for (seed, algorithm) in [(14, Algorithm::aes_256_cbc()), (15, Algorithm::aes_128_ctr())] {
        let params = params(algorithm, seed);

        let mut file = Vec::new();
        {
            let mut enc = CipherEncrypt::new(IoSink::new(&mut file), &params).unwrap();
            let mut max_pending = 0;
            for (i, piece) in plaintext.chunks(256 * 1024).enumerate() {
                write_chunked(&mut enc, piece, 70_000, seed * 100 + i as u64).unwrap();
                max_pending = max_pending.max(enc.get_ref().pending());
            }
            assert!(max_pending < DEFAULT_BUFFER_SIZE, "{max_pending} bytes held back");
            enc.finalize_encryption().unwrap();
            enc.flush().unwrap();
            assert_eq!(enc.get_ref().pending(), 0);
        }
        let bs = algorithm.block_size();
        let expected = if bs > 1 { (plaintext.len() / bs + 1) * bs } else { plaintext.len() };
        assert_eq!(file.len(), expected);

        let src = IoSource::with_chunk(Cursor::new(file), 3000);
        let mut dec = CipherDecrypt::new(src, &params).unwrap();
        let out = read_chunked(&mut dec, 65_537, seed + 1).unwrap();
        assert!(out == plaintext, "round trip mismatch for seed {seed}");
    }
}

#[test]
fn test_block_boundary_lengths() {
    for algorithm in [Algorithm::aes_128_cbc(), Algorithm::aes_128_ctr()] {
        let params = params(algorithm, 5);
        let bs = algorithm.block_size().max(16);
        for len in [0, 1, bs - 1, bs, bs + 1, 2 * bs, 5_000] {
            let plaintext = test_bytes(len as u64, len);
            let ciphertext = encrypt(&params, &plaintext);
            for read_size in [1, bs - 1, bs, 2 * bs - 1, 2 * bs, 4096] {
                let mut dec = CipherDecrypt::new(SliceSource::new(&ciphertext), &params).unwrap();
                let out = read_chunked(&mut dec, read_size, 6).unwrap();
                assert!(out == plaintext, "len {len}, read size {read_size}");
            }
        }
    }
}

#[test]
fn test_matches_openssl_one_shot() {
    let plaintext = test_bytes(20, 4097);
    for algorithm in [Algorithm::aes_128_cbc(), Algorithm::aes_256_ctr(), Algorithm::aes_128_ofb()] {
        let key = test_bytes(21, algorithm.key_len());
        let iv = test_bytes(22, algorithm.iv_len().unwrap_or(0));
        let params = CipherParams::new(algorithm, key.clone(), Some(&iv[..])).unwrap();

        let streamed = encrypt(&params, &plaintext);
        let one_shot = openssl::symm::encrypt(algorithm, &key, Some(&iv[..]), &plaintext).unwrap();
        assert_eq!(streamed, one_shot);
    }
}

#[test]
fn test_nested_cipher_layers() {
    // outer CTR carrying an inner CBC stream
    let inner = params(Algorithm::aes_128_cbc(), 30);
    let outer = params(Algorithm::aes_256_ctr(), 40);
    let plaintext = test_bytes(50, 10_000);

    let mut wire = VecSink::new();
    {
        let outer_enc = CipherEncrypt::new(&mut wire, &outer).unwrap();
        let mut inner_enc = CipherEncrypt::new(BufferedSink::with_chunk(outer_enc, 100), &inner).unwrap();
        write_chunked(&mut inner_enc, &plaintext, 300, 51).unwrap();
        inner_enc.finalize_encryption().unwrap();
        inner_enc.flush().unwrap();
    }
    assert_eq!(wire.len(), (plaintext.len() / 16 + 1) * 16);

    let outer_dec = CipherDecrypt::new(SliceSource::new(wire.as_slice()).with_max_chunk(64), &outer).unwrap();
    let mut inner_dec = CipherDecrypt::new(BufferedSource::with_chunk(outer_dec, 48), &inner).unwrap();
    assert_eq!(read_chunked(&mut inner_dec, 70, 52).unwrap(), plaintext);
}

#[test]
fn test_duplex_cipher_over_one_link() {
    let params = params(Algorithm::aes_128_ctr(), 60);
    let request = encrypt(&params, b"ping from the other side");

    let mut reply = VecSink::new();
    {
        let mut link = Cipher::new(SliceSource::new(&request), &mut reply, &params).unwrap();
        let mut buf = [0u8; 24];
        link.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"ping from the other side");
        link.write_all(b"pong").unwrap();
        link.finalize_encryption().unwrap();
    }

    let mut dec = CipherDecrypt::new(SliceSource::new(reply.as_slice()), &params).unwrap();
    let mut out = Vec::new();
    dec.read_to_end(&mut out).unwrap();
    assert_eq!(out, b"pong");
}

#[test]
fn test_messages_back_to_back_with_reinit() {
    let first_params = params(Algorithm::aes_256_cbc(), 70);
    let second_params = params(Algorithm::aes_128_cbc(), 80);

    let mut sink = VecSink::new();
    {
        let mut enc = CipherEncrypt::new(&mut sink, &first_params).unwrap();
        enc.write_all(b"first message").unwrap();
        // finalizes the first message before switching keys
        enc.init(&second_params).unwrap();
        enc.write_all(b"second, longer message").unwrap();
    }
    assert_eq!(sink.len(), 16 + 32);

    let (first, second) = sink.as_slice().split_at(16);
    let mut dec = CipherDecrypt::new(SliceSource::new(first), &first_params).unwrap();
    let mut out = Vec::new();
    dec.read_to_end(&mut out).unwrap();
    assert_eq!(out, b"first message");

    let mut dec = CipherDecrypt::new(SliceSource::new(second), &second_params).unwrap();
    out.clear();
    dec.read_to_end(&mut out).unwrap();
    assert_eq!(out, b"second, longer message");
}

#[test]
fn test_wrong_key_never_yields_plaintext() {
    let right = params(Algorithm::aes_256_cbc(), 90);
    let wrong = params(Algorithm::aes_256_cbc(), 91);
    let plaintext = test_bytes(92, 100);
    let ciphertext = encrypt(&right, &plaintext);

    let mut dec = CipherDecrypt::new(SliceSource::new(&ciphertext), &wrong).unwrap();
    let mut out = Vec::new();
    match dec.read_to_end(&mut out) {
        Err(err) => assert!(matches!(err, Error::Engine { .. }), "unexpected error: {err}"),
        // garbage that happens to end in valid padding
        Ok(_) => assert_ne!(out, plaintext),
    }
}

#[test]
fn test_truncated_ciphertext_is_rejected() {
    let params = params(Algorithm::aes_128_cbc(), 100);
    let ciphertext = encrypt(&params, &test_bytes(101, 64));

    let mut dec = CipherDecrypt::new(SliceSource::new(&ciphertext[..ciphertext.len() - 3]), &params).unwrap();
    let mut out = Vec::new();
    assert!(matches!(dec.read_to_end(&mut out), Err(Error::Engine { .. })));
}

#[test]
fn test_invalid_parameters() {
    let err = CipherParams::new(Algorithm::aes_256_cbc(), vec![0u8; 16], Some(&[0u8; 16][..])).unwrap_err();
    assert!(matches!(err, Error::InvalidLength { .. }));

    let err = CipherParams::new(Algorithm::aes_128_cbc(), vec![0u8; 16], Some(&[0u8; 8][..])).unwrap_err();
    assert!(matches!(err, Error::InvalidLength { .. }));
}

//! Digest filters composed with cipher transforms

use streamsec_api::{Input, Output};
use streamsec_common::{BufferedSink, BufferedSource, SliceSource, VecSink};
use streamsec_symmetric::digest::{compute, matches};
use streamsec_symmetric::{Algorithm, CipherDecrypt, CipherEncrypt, CipherParams, DigestSink, DigestSource, MessageDigest};
use streamsec_tests::{read_chunked, test_bytes, write_chunked};

fn cbc() -> CipherParams {
    CipherParams::new(Algorithm::aes_128_cbc(), test_bytes(1, 16), Some(&test_bytes(2, 16)[..])).unwrap()
}

#[test]
fn test_plaintext_digest_survives_roundtrip() {
    let params = cbc();
    let plaintext = test_bytes(3, 9_999);

    let mut wire = VecSink::new();
    let sent_digest = {
        let enc = CipherEncrypt::new(&mut wire, &params).unwrap();
        let mut filter = DigestSink::new(BufferedSink::with_chunk(enc, 512), MessageDigest::sha256()).unwrap();
        write_chunked(&mut filter, &plaintext, 200, 4).unwrap();
        filter.flush().unwrap();
        assert_eq!(filter.bytes_hashed(), plaintext.len() as u64);
        filter.digest().unwrap()
    };

    let dec = CipherDecrypt::new(SliceSource::new(wire.as_slice()), &params).unwrap();
    let mut filter = DigestSource::new(BufferedSource::with_chunk(dec, 100), MessageDigest::sha256()).unwrap();
    let received = read_chunked(&mut filter, 333, 5).unwrap();

    assert_eq!(received, plaintext);
    assert!(matches(&sent_digest, &filter.digest().unwrap()));
    assert!(matches(&compute(MessageDigest::sha256(), &plaintext).unwrap(), &sent_digest));
}

#[test]
fn test_ciphertext_digest_below_cipher() {
    let params = cbc();
    let plaintext = test_bytes(6, 1_000);

    let mut wire = VecSink::new();
    let digest = {
        let filter = DigestSink::new(&mut wire, MessageDigest::sha1()).unwrap();
        let mut enc = CipherEncrypt::new(BufferedSink::with_chunk(filter, 64), &params).unwrap();
        enc.write_all(&plaintext).unwrap();
        enc.finalize_encryption().unwrap();
        enc.flush().unwrap();
        enc.get_ref().get_ref().digest().unwrap()
    };

    assert_eq!(wire.len(), 1_008);
    assert_eq!(digest, compute(MessageDigest::sha1(), wire.as_slice()).unwrap());
}

#[test]
fn test_tampered_stream_changes_digest() {
    let data = test_bytes(7, 4_096);
    let mut tampered = data.clone();
    tampered[2_048] ^= 1;

    let mut a = DigestSource::new(SliceSource::new(&data), MessageDigest::sha384()).unwrap();
    let mut b = DigestSource::new(SliceSource::new(&tampered), MessageDigest::sha384()).unwrap();
    let mut sink = Vec::new();
    a.read_to_end(&mut sink).unwrap();
    b.read_to_end(&mut sink).unwrap();

    assert!(!matches(&a.digest().unwrap(), &b.digest().unwrap()));
}

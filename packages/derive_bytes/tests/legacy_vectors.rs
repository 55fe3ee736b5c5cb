//! Known-answer tests against the legacy PasswordDeriveBytes reference output

use cryypt_derive_bytes::{DeriveBytesError, PasswordDeriveBytes};
use hex_literal::hex;

const SALT: [u8; 8] = hex!("0102030405060708");

fn salted(hash_name: &str, iterations: u32) -> PasswordDeriveBytes {
    PasswordDeriveBytes::with_params("password", Some(SALT.to_vec()), hash_name, iterations)
        .expect("valid parameters")
}

fn default_engine() -> PasswordDeriveBytes {
    PasswordDeriveBytes::new("password", Some(SALT.to_vec())).expect("valid parameters")
}

fn take(pdb: &mut PasswordDeriveBytes, count: usize) -> Vec<u8> {
    pdb.get_bytes(count).expect("derivation should succeed")
}

#[test]
fn sha1_key_then_iv_splices_second_request() {
    let mut pdb = default_engine();
    assert_eq!(take(&mut pdb, 16), hex!("7c2e3423c7d2b975e3cb15f9220e5c92"));
    // first four bytes come from offset 4 of the first request
    assert_eq!(take(&mut pdb, 16), hex!("c7d2b975928660595a6c06c11ffaa084"));
    // later requests continue the plain stream
    assert_eq!(take(&mut pdb, 8), hex!("ffd8819e4fa03369"));
}

#[test]
fn sha1_single_request_is_plain_stream() {
    let mut pdb = default_engine();
    assert_eq!(
        take(&mut pdb, 60),
        hex!(
            "7c2e3423c7d2b975e3cb15f9220e5c922b334cdc"
            "928660595a6c06c11ffaa084ffd8819e4fa03369"
            "c72bfa4576e6941aa978e844c0a79a08094d8f8d"
        )
    );
}

#[test]
fn sha1_long_first_request_uses_forty_byte_span() {
    let mut pdb = default_engine();
    assert_eq!(
        take(&mut pdb, 32),
        hex!("7c2e3423c7d2b975e3cb15f9220e5c922b334cdc928660595a6c06c11ffaa084")
    );
    assert_eq!(take(&mut pdb, 16), hex!("e3cb15f9220e5c92c72bfa4576e6941a"));
}

#[test]
fn sha1_without_salt() {
    let mut pdb = PasswordDeriveBytes::new("password", None).expect("valid parameters");
    assert_eq!(take(&mut pdb, 16), hex!("3a175af6d49704536b9df8ff67bdc1df"));
    assert_eq!(take(&mut pdb, 16), hex!("d49704539eb481f9c77408103bfb47c6"));

    let mut pdb = PasswordDeriveBytes::new("password", None).expect("valid parameters");
    assert_eq!(
        take(&mut pdb, 32),
        hex!("3a175af6d49704536b9df8ff67bdc1dfb32680159eb481f9c77408103bfb47c6")
    );
}

#[test]
fn other_digests() {
    let mut pdb = salted("SHA256", 1000);
    assert_eq!(
        take(&mut pdb, 32),
        hex!("a0f53e5fa4b4b1ef7209e3daabda85e65c09cd32d4e04624c56a2f1403e29610")
    );
    assert_eq!(take(&mut pdb, 16), hex!("7209e3daabda85e6564e74dcaa1fbf9e"));

    let mut pdb = salted("MD5", 100);
    assert_eq!(take(&mut pdb, 16), hex!("081e72e5855a7ff224039899e6954e81"));
    assert_eq!(take(&mut pdb, 8), hex!("855a7ff232594a0c"));

    let mut pdb = salted("SHA-512", 100);
    assert_eq!(
        take(&mut pdb, 32),
        hex!("921807efed259af60ec06180af461ff7da5445aa03f037b73aca7ee02c4fb611")
    );
    assert_eq!(take(&mut pdb, 16), hex!("0ec06180af461ff736c2e24a71e5522d"));
}

#[test]
fn iteration_counts_one_and_two_coincide() {
    let expected = hex!("bcd6991db6b09dc0d2578c8cdcc471d4ed53324b");
    assert_eq!(take(&mut salted("SHA-1", 1), 20), expected);
    assert_eq!(take(&mut salted("SHA-1", 2), 20), expected);
}

#[test]
fn neighbouring_iteration_counts_differ() {
    assert_eq!(
        take(&mut salted("SHA-1", 99), 16),
        hex!("b5aec610669a226c1c11284d460a0323")
    );
    assert_eq!(
        take(&mut salted("SHA-1", 100), 16),
        hex!("7c2e3423c7d2b975e3cb15f9220e5c92")
    );
    assert_eq!(
        take(&mut salted("SHA-1", 101), 16),
        hex!("d6ee5bf8bdff3f5f34a3433cd84028da")
    );
}

#[test]
fn text_password_transcodes_non_ascii() {
    let mut pdb = PasswordDeriveBytes::from_text("pässword", Some(SALT.to_vec()))
        .expect("valid parameters");
    assert_eq!(take(&mut pdb, 16), hex!("a18652e1ab819bb9478f2467ea7df061"));

    let mut raw = PasswordDeriveBytes::new("p?ssword", Some(SALT.to_vec()))
        .expect("valid parameters");
    assert_eq!(take(&mut raw, 16), hex!("a18652e1ab819bb9478f2467ea7df061"));
}

#[test]
fn empty_password_is_allowed() {
    let mut pdb = PasswordDeriveBytes::new(Vec::new(), Some(SALT.to_vec()))
        .expect("valid parameters");
    assert_eq!(take(&mut pdb, 16), hex!("14fcf3a483e3e1f88f3e99eed8d99aa3"));
}

#[test]
fn short_first_request_splices_across_boundary() {
    let mut pdb = default_engine();
    assert_eq!(take(&mut pdb, 8), hex!("7c2e3423c7d2b975"));
    assert_eq!(
        take(&mut pdb, 16),
        hex!("220e5c922b334cdc9286605992866059")
    );
}

#[test]
fn splice_is_clamped_when_second_request_is_short() {
    // pending skip of 16 with only 8 bytes requested
    let mut pdb = default_engine();
    assert_eq!(
        take(&mut pdb, 24),
        hex!("7c2e3423c7d2b975e3cb15f9220e5c922b334cdc92866059")
    );
    assert_eq!(take(&mut pdb, 8), hex!("2b334cdc92866059"));

    // pending skip of 19 runs past the combined buffer entirely
    let mut pdb = default_engine();
    assert_eq!(take(&mut pdb, 1), hex!("7c"));
    assert_eq!(take(&mut pdb, 5), hex!("2e3423c7d2"));
}

#[test]
fn derive_key_iv_matches_two_requests() {
    let mut pdb = default_engine();
    take(&mut pdb, 40);

    let material = pdb.derive_key_iv(32, 16).expect("derivation should succeed");
    assert_eq!(
        material.key(),
        hex!("7c2e3423c7d2b975e3cb15f9220e5c922b334cdc928660595a6c06c11ffaa084")
    );
    assert_eq!(material.iv(), hex!("e3cb15f9220e5c92c72bfa4576e6941a"));

    assert!(matches!(
        pdb.derive_key_iv(16, 0),
        Err(DeriveBytesError::Range { requested: 0 })
    ));
}

#[test]
fn chain_tail_before_ceiling() {
    let mut pdb = default_engine();
    let stream = take(&mut pdb, 20_000);
    assert_eq!(stream.len(), 20_000);
    assert_eq!(
        &stream[19_980..],
        hex!("56d458fd23cfcc6cd25363f3c84b7c39d6f74612")
    );
}

//! Property tests for the TON address codec

use proptest::prelude::*;
use tonvault_testing::*;
use tonvault_ton::{
    friendly_to_raw, is_valid_address, normalize_address, raw_to_friendly, AddressFlags,
    AddressFormat, TonAddress, FRIENDLY_ADDRESS_LEN,
};

const URL_SAFE_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

#[test]
fn test_known_addresses() {
    assert_eq!(
        friendly_to_raw(EdgeCaseAddresses::FRIENDLY_1).unwrap(),
        EdgeCaseAddresses::RAW_1
    );
    assert_eq!(
        friendly_to_raw(EdgeCaseAddresses::FRIENDLY_2).unwrap(),
        EdgeCaseAddresses::RAW_2
    );
    assert_eq!(
        raw_to_friendly(EdgeCaseAddresses::RAW_1, false, false).unwrap(),
        EdgeCaseAddresses::NON_BOUNCEABLE_1
    );
    assert!(is_valid_address(EdgeCaseAddresses::FRIENDLY_3));
    assert!(is_valid_address(EdgeCaseAddresses::MASTERCHAIN));
}

#[test]
fn test_invalid_edge_cases() {
    for addr in EdgeCaseAddresses::invalid() {
        assert!(!is_valid_address(addr), "accepted {:?}", addr);
    }
}

#[test]
fn test_bad_checksum_reports_checksum() {
    let err = friendly_to_raw(EdgeCaseAddresses::BAD_CHECKSUM).unwrap_err();
    assert!(err.to_string().contains("checksum"));
}

#[test]
fn test_bounceable_and_non_bounceable_normalize_equal() {
    let a = normalize_address(EdgeCaseAddresses::FRIENDLY_1, AddressFormat::Raw).unwrap();
    let b = normalize_address(EdgeCaseAddresses::NON_BOUNCEABLE_1, AddressFormat::Raw).unwrap();
    assert_eq!(a, b);
}

proptest! {
    #[test]
    fn test_raw_friendly_roundtrip(raw in raw_address(), (bounceable, testnet) in address_flags()) {
        let friendly = raw_to_friendly(&raw, bounceable, testnet).unwrap();
        prop_assert_eq!(friendly.len(), FRIENDLY_ADDRESS_LEN);
        prop_assert_eq!(friendly_to_raw(&friendly).unwrap(), raw);
    }

    #[test]
    fn test_flags_survive_parse(
        (wc, hash) in raw_address_parts(),
        (bounceable, testnet) in address_flags(),
    ) {
        let addr = TonAddress::new(wc, hash);
        let flags = AddressFlags::new(bounceable, testnet);
        let (parsed, parsed_flags) = TonAddress::parse_friendly(&addr.to_friendly(flags)).unwrap();
        prop_assert_eq!(parsed, addr);
        prop_assert_eq!(parsed_flags, flags);
    }

    #[test]
    fn test_any_workchain_roundtrip(wc in any_workchain(), hash in account_hash()) {
        let addr = TonAddress::new(wc, hash);
        let reparsed = TonAddress::from_raw(&addr.to_raw()).unwrap();
        prop_assert_eq!(reparsed, addr);
    }

    #[test]
    fn test_single_char_corruption_detected(
        raw in raw_address(),
        position in 0..FRIENDLY_ADDRESS_LEN,
        replacement in 0..URL_SAFE_ALPHABET.len(),
    ) {
        let friendly = raw_to_friendly(&raw, true, false).unwrap();
        let mut bytes = friendly.into_bytes();
        let mut new_char = URL_SAFE_ALPHABET[replacement];
        if new_char == bytes[position] {
            new_char = URL_SAFE_ALPHABET[(replacement + 1) % URL_SAFE_ALPHABET.len()];
        }
        bytes[position] = new_char;
        let corrupted = String::from_utf8(bytes).unwrap();

        prop_assert!(friendly_to_raw(&corrupted).is_err());
        prop_assert!(!is_valid_address(&corrupted));
    }

    #[test]
    fn test_normalize_is_idempotent(raw in raw_address()) {
        let friendly = normalize_address(&raw, AddressFormat::Friendly).unwrap();
        prop_assert_eq!(
            normalize_address(&friendly, AddressFormat::Friendly).unwrap(),
            friendly.clone()
        );
        prop_assert_eq!(normalize_address(&friendly, AddressFormat::Raw).unwrap(), raw);
    }

    #[test]
    fn test_garbage_never_panics(input in "\\PC{0,80}") {
        let _ = is_valid_address(&input);
        let _ = friendly_to_raw(&input);
    }
}

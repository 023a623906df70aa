#![no_main]

use libfuzzer_sys::fuzz_target;
use std::str::FromStr;
use tonvault_ton::{is_valid_address, AddressFlags, TonAddress};

fuzz_target!(|data: &str| {
    let parsed = TonAddress::from_str(data);
    assert_eq!(parsed.is_ok(), is_valid_address(data));

    if let Ok(address) = parsed {
        // Every rendering parses back to the same address
        for (bounceable, testnet) in [(true, false), (false, false), (true, true), (false, true)] {
            let flags = AddressFlags::new(bounceable, testnet);
            let friendly = address.to_friendly(flags);
            let (back, back_flags) =
                TonAddress::parse_friendly(&friendly).expect("own output parses");
            assert_eq!(back, address);
            assert_eq!(back_flags, flags);
        }
        assert_eq!(TonAddress::from_raw(&address.to_raw()).expect("raw parses"), address);
    }
});

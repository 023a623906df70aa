#![no_main]

use libfuzzer_sys::fuzz_target;
use tonvault_ton::Mnemonic;

fuzz_target!(|data: &str| {
    // Parsing never panics, only returns errors for invalid input.
    // Only 24-word inputs reach the seed check, which is slow.
    if data.split_whitespace().count() != 24 {
        assert!(Mnemonic::parse(data).is_err());
        return;
    }

    if let Ok(mnemonic) = Mnemonic::parse(data) {
        assert_eq!(mnemonic.words().len(), 24);
        // Normalized phrase parses to the same mnemonic
        let again = Mnemonic::parse(&mnemonic.phrase()).expect("normalized phrase parses");
        assert_eq!(again, mnemonic);
    }
});

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(value) = hardy_cbor_tree::decode_tree(data) {
        let encoded = hardy_cbor_tree::encode_tree(&value);
        match hardy_cbor_tree::decode_tree(&encoded) {
            Ok(decoded) => assert_eq!(decoded, value, "{encoded:02x?}"),
            Err(e) => panic!("Re-encoded {encoded:02x?} fails to decode: {e}"),
        }
        // Encoding is minimal, so a second pass is byte for byte stable
        assert_eq!(hardy_cbor_tree::encode_tree(&value), encoded);
    }
});

#![no_main]

use hardy_cbor_tree::Decoder;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let items = hardy_cbor_tree::decode_sequence(data);

    // Walk the same bytes item by item without building values
    let mut decoder = Decoder::new(data);
    let mut raw = Vec::new();
    while let Ok(false) = decoder.is_finished() {
        match decoder.read_encoded_value() {
            Ok(item) => raw.push(item),
            Err(_) => break,
        }
    }

    if let Ok(items) = items {
        for (item, raw) in items.iter().zip(raw) {
            if let Ok(value) = hardy_cbor_tree::decode_tree(raw) {
                assert_eq!(&value, item);
            }
        }
    }
});

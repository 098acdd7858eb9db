use super::*;
use hex_literal::hex;

fn round_trip(value: Value) {
    let data = encode_tree(&value);
    assert_eq!(decode_tree(&data).unwrap(), value, "{data:02x?}");
}

fn simple(code: u8) -> Value {
    Value::Simple(SimpleCode::try_from(code).unwrap())
}

#[test]
fn rfc_tests() {
    // RFC 7049, Appendix A:
    // https://www.rfc-editor.org/rfc/rfc7049.html#appendix-A

    assert_eq!(decode_tree(&hex!("00")).unwrap(), Value::Integer(0));
    assert_eq!(
        decode_tree(&hex!("3bffffffffffffffff")).unwrap(),
        Value::Integer(-18446744073709551616)
    );
    assert_eq!(
        decode_tree(&hex!("c249010000000000000000")).unwrap(),
        Value::Integer(18446744073709551616)
    );
    assert_eq!(decode_tree(&hex!("f97c00")).unwrap(), Value::Float(f64::INFINITY));
    assert_eq!(decode_tree(&hex!("f97e00")).unwrap(), Value::Float(f64::NAN));
    assert_eq!(decode_tree(&hex!("f4")).unwrap(), Value::Bool(false));
    assert_eq!(decode_tree(&hex!("f6")).unwrap(), Value::Null);
    assert_eq!(decode_tree(&hex!("f7")).unwrap(), Value::Undefined);
    assert_eq!(decode_tree(&hex!("f0")).unwrap(), simple(16));
    assert_eq!(decode_tree(&hex!("f8ff")).unwrap(), simple(255));
    assert_eq!(
        decode_tree(&hex!("c11a514b67b0")).unwrap(),
        Value::tagged(1u64, Value::Integer(1363896240))
    );
    assert_eq!(
        decode_tree(&hex!("d818456449455446")).unwrap(),
        Value::tagged(24u64, Value::Bytes(hex!("6449455446").to_vec()))
    );
    assert_eq!(decode_tree(&hex!("80")).unwrap(), Value::Array(vec![]));
    assert_eq!(decode_tree(&hex!("a0")).unwrap(), Value::Map(vec![]));
    assert_eq!(
        decode_tree(&hex!("9fff")).unwrap(),
        Value::Indefinite(Indefinite::Array(vec![]))
    );
    assert_eq!(
        decode_tree(&hex!("bfff")).unwrap(),
        Value::Indefinite(Indefinite::Map(vec![]))
    );
    assert_eq!(
        decode_tree(&hex!("826161bf61626163ff")).unwrap(),
        Value::Array(vec![
            Value::from("a"),
            Value::Indefinite(Indefinite::Map(vec![(Value::from("b"), Value::from("c"))]))
        ])
    );
    assert_eq!(
        decode_tree(&hex!("9f018202039f0405ffff")).unwrap(),
        Value::Indefinite(Indefinite::Array(vec![
            Value::from(1),
            Value::Array(vec![Value::from(2), Value::from(3)]),
            Value::Indefinite(Indefinite::Array(vec![Value::from(4), Value::from(5)]))
        ]))
    );
    assert_eq!(
        decode_tree(&hex!("a56161614161626142616361436164614461656145")).unwrap(),
        Value::Map(
            ["a", "b", "c", "d", "e"]
                .into_iter()
                .map(|k| (Value::from(k), Value::from(k.to_uppercase())))
                .collect()
        )
    );
    assert_eq!(
        decode_tree(&hex!("7f657374726561646d696e67ff")).unwrap(),
        Value::from("streaming")
    );
    assert_eq!(decode_tree(&hex!("7f62616260ff")).unwrap(), Value::from("ab"));
}

#[test]
fn trailing_data() {
    assert!(matches!(
        decode_tree(&hex!("0000")),
        Err(Error::TrailingData { offset: 1 })
    ));
    assert!(matches!(
        decode_tree(&hex!("80ff")),
        Err(Error::TrailingData { offset: 1 })
    ));
    assert!(matches!(
        decode_tree(&[]),
        Err(Error::UnexpectedEndOfBuffer { offset: 0, .. })
    ));
}

#[test]
fn malformed() {
    assert!(matches!(
        decode_tree(&hex!("bf01ff")),
        Err(Error::MapKeyMissingValue { offset: 2 })
    ));
    assert!(matches!(
        decode_tree(&hex!("a10102a1")),
        Err(Error::TrailingData { offset: 3 })
    ));
    assert!(matches!(
        decode_tree(&hex!("a201")),
        Err(Error::DefiniteLengthExceedsBuffer { offset: 0, .. })
    ));
    assert!(matches!(
        decode_tree(&hex!("9f01")),
        Err(Error::UnexpectedEndOfBuffer { offset: 2, .. })
    ));
    assert!(matches!(
        decode_tree(&hex!("c1")),
        Err(Error::TagNotFollowedByValue { offset: 0 })
    ));
    assert!(matches!(
        decode_tree(&hex!("62c328")),
        Err(Error::InvalidUtf8 { offset: 0, .. })
    ));
}

#[test]
fn depth_limit() {
    let mut nested = vec![0x81; 100_000];
    nested.push(0x00);
    assert!(matches!(
        decode_tree(&nested),
        Err(Error::DepthLimitExceeded { max_depth: 256, .. })
    ));

    let config = Config {
        max_depth: 3,
        ..Default::default()
    };
    assert!(decode_tree_with_config(&hex!("81818100"), &config).is_ok());
    assert!(matches!(
        decode_tree_with_config(&hex!("8181818100"), &config),
        Err(Error::DepthLimitExceeded { max_depth: 3, .. })
    ));
    assert!(matches!(
        decode_tree_with_config(&hex!("c1c1c1c100"), &config),
        Err(Error::DepthLimitExceeded { max_depth: 3, .. })
    ));
}

#[test]
fn bignums() {
    assert_eq!(
        decode_tree(&hex!("c349010000000000000000")).unwrap(),
        Value::Integer(-18446744073709551617)
    );
    // Leading zero bytes are ignored
    assert_eq!(
        decode_tree(&hex!("c24a00010000000000000000")).unwrap(),
        Value::Integer(1 << 64)
    );
    // Within the native range a bignum is kept as written
    assert_eq!(
        decode_tree(&hex!("c24101")).unwrap(),
        Value::tagged(2u64, Value::Bytes(vec![1]))
    );
    assert_eq!(
        decode_tree(&hex!("c348ffffffffffffffff")).unwrap(),
        Value::tagged(3u64, Value::Bytes(vec![0xff; 8]))
    );
    // Too big for an i128, so it stays tagged
    let huge = hex!("c2518000000000000000000000000000000000");
    assert_eq!(
        decode_tree(&huge).unwrap(),
        Value::tagged(2u64, Value::Bytes(huge[2..].to_vec()))
    );
    // Tag 2 around anything but a byte string stays tagged
    assert_eq!(
        decode_tree(&hex!("c200")).unwrap(),
        Value::tagged(2u64, Value::Integer(0))
    );

    let config = Config {
        decode_bignums: false,
        ..Default::default()
    };
    assert_eq!(
        decode_tree_with_config(&hex!("c249010000000000000000"), &config).unwrap(),
        Value::tagged(2u64, Value::Bytes(hex!("010000000000000000").to_vec()))
    );
}

#[test]
fn wide_integers_round_trip() {
    let data = encode_tree(&Value::Integer(1 << 64));
    assert_eq!(data, hex!("c249010000000000000000"));
    assert_eq!(decode_tree(&data).unwrap(), Value::Integer(1 << 64));
}

#[test]
fn simple_values() {
    for code in [0, 19, 32, 255] {
        let data = encode_tree(&simple(code));
        assert_eq!(decode_tree(&data).unwrap(), simple(code));
    }
    // Codes with their own variants never decode as Simple
    assert_eq!(decode_tree(&hex!("f4")).unwrap(), Value::Bool(false));
    assert_eq!(decode_tree(&hex!("f5")).unwrap(), Value::Bool(true));
    assert_eq!(decode_tree(&hex!("f6")).unwrap(), Value::Null);
    assert_eq!(decode_tree(&hex!("f7")).unwrap(), Value::Undefined);
}

#[test]
fn sequences() {
    assert_eq!(decode_sequence(&[]).unwrap(), vec![]);
    assert_eq!(
        decode_sequence(&hex!("0161618080")).unwrap(),
        vec![
            Value::from(1),
            Value::from("a"),
            Value::Array(vec![]),
            Value::Array(vec![])
        ]
    );
    assert!(matches!(
        decode_sequence(&hex!("01ff")),
        Err(Error::UnexpectedBreakByte { offset: 1 })
    ));
}

#[test]
fn round_trips() {
    round_trip(Value::Null);
    round_trip(Value::Undefined);
    round_trip(Value::Bool(true));
    for code in [0, 16, 19, 32, 255] {
        round_trip(simple(code));
    }
    round_trip(Value::Float(1.1));
    round_trip(Value::Float(-0.0));
    round_trip(Value::Float(f64::NAN));
    round_trip(Value::Float(f64::NEG_INFINITY));
    for n in [
        0,
        23,
        24,
        255,
        256,
        65535,
        65536,
        4294967295,
        4294967296,
        u64::MAX as i128,
        -1,
        -24,
        -25,
        i64::MIN as i128,
        -(u64::MAX as i128) - 1,
        1 << 64,
        -(1 << 64) - 1,
        1 << 100,
        i128::MAX,
        i128::MIN,
    ] {
        round_trip(Value::Integer(n));
    }
    round_trip(Value::from(&hex!("deadbeef")[..]));
    round_trip(Value::from("\u{6c34}"));
    round_trip(Value::tagged(
        55799u64,
        Value::Map(vec![
            (Value::from(1), Value::Array(vec![Value::from("x"), Value::Null])),
            (
                Value::Array(vec![]),
                Value::Indefinite(Indefinite::Map(vec![(
                    Value::from("k"),
                    Value::Indefinite(Indefinite::Array(vec![Value::Float(1.5)])),
                )])),
            ),
        ]),
    ));
    round_trip(Value::tagged(2u64, Value::Bytes(vec![1])));
    round_trip(Value::tagged(3u64, Value::Bytes(vec![])));
}

#[test]
fn re_encoding_is_minimal() {
    // Non-minimal input decodes, and re-encodes at the shortest width
    let value = decode_tree(&hex!("1b0000000000000017")).unwrap();
    assert_eq!(encode_tree(&value), hex!("17"));
    let value = decode_tree(&hex!("fb3ff8000000000000")).unwrap();
    assert_eq!(encode_tree(&value), hex!("f93e00"));
    let value = decode_tree(&hex!("5f42010243030405ff")).unwrap();
    assert_eq!(encode_tree(&value), hex!("450102030405"));
}

#[test]
fn write_value_chains() {
    let mut encoder = Encoder::new();
    encoder
        .write_value(&Value::from(1))
        .write_value(&Value::from("a"));
    assert_eq!(encoder.into_bytes(), hex!("016161"));
}

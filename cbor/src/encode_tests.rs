use super::encode::*;
use hex_literal::hex;

fn emit<F>(f: F) -> Vec<u8>
where
    F: FnOnce(&mut Encoder) -> &mut Encoder,
{
    let mut e = Encoder::new();
    f(&mut e);
    e.into_bytes()
}

fn emit_int(value: i128) -> Vec<u8> {
    emit(|e| e.write_int(value))
}

fn emit_float(value: f64) -> Vec<u8> {
    emit(|e| e.write_float(value))
}

#[test]
fn rfc_tests() {
    // RFC 7049, Appendix A:
    // https://www.rfc-editor.org/rfc/rfc7049.html#appendix-A

    assert_eq!(*emit_int(0), hex!("00"));
    assert_eq!(*emit_int(1), hex!("01"));
    assert_eq!(*emit_int(10), hex!("0a"));
    assert_eq!(*emit_int(23), hex!("17"));
    assert_eq!(*emit_int(24), hex!("1818"));
    assert_eq!(*emit_int(25), hex!("1819"));
    assert_eq!(*emit_int(100), hex!("1864"));
    assert_eq!(*emit_int(1000), hex!("1903e8"));
    assert_eq!(*emit_int(1000000), hex!("1a000f4240"));
    assert_eq!(*emit_int(1000000000000), hex!("1b000000e8d4a51000"));
    assert_eq!(*emit_int(18446744073709551615), hex!("1bffffffffffffffff"));
    assert_eq!(*emit_int(18446744073709551616), hex!("c249010000000000000000"));
    assert_eq!(*emit_int(-18446744073709551616), hex!("3bffffffffffffffff"));
    assert_eq!(*emit_int(-18446744073709551617), hex!("c349010000000000000000"));
    assert_eq!(*emit_int(-1), hex!("20"));
    assert_eq!(*emit_int(-10), hex!("29"));
    assert_eq!(*emit_int(-100), hex!("3863"));
    assert_eq!(*emit_int(-1000), hex!("3903e7"));

    assert_eq!(*emit_float(0.0), hex!("f90000"));
    assert_eq!(*emit_float(-0.0), hex!("f98000"));
    assert_eq!(*emit_float(1.0), hex!("f93c00"));
    assert_eq!(*emit_float(1.1), hex!("fb3ff199999999999a"));
    assert_eq!(*emit_float(1.5), hex!("f93e00"));
    assert_eq!(*emit_float(65504.0), hex!("f97bff"));
    assert_eq!(*emit_float(100000.0), hex!("fa47c35000"));
    assert_eq!(*emit_float(3.4028234663852886e+38), hex!("fa7f7fffff"));
    assert_eq!(*emit_float(1.0e+300), hex!("fb7e37e43c8800759c"));
    assert_eq!(*emit_float(5.960464477539063e-8), hex!("f90001"));
    assert_eq!(*emit_float(0.00006103515625), hex!("f90400"));
    assert_eq!(*emit_float(-4.0), hex!("f9c400"));
    assert_eq!(*emit_float(-4.1), hex!("fbc010666666666666"));

    assert_eq!(*emit(|e| e.write_bool(false)), hex!("f4"));
    assert_eq!(*emit(|e| e.write_bool(true)), hex!("f5"));
    assert_eq!(*emit(|e| e.write_null()), hex!("f6"));
    assert_eq!(*emit(|e| e.write_undefined()), hex!("f7"));
    assert_eq!(*emit(|e| e.write_simple_value(16)), hex!("f0"));
    assert_eq!(*emit(|e| e.write_simple_value(255)), hex!("f8ff"));
    assert_eq!(
        *emit(|e| e.write_tag(0).write_text_string("2013-03-21T20:04:00Z")),
        hex!("c074323031332d30332d32315432303a30343a30305a")
    );
    assert_eq!(
        *emit(|e| e.write_tag(1).write_uint(1363896240)),
        hex!("c11a514b67b0")
    );
    assert_eq!(
        *emit(|e| e.write_tag(1).write_float(1363896240.5)),
        hex!("c1fb41d452d9ec200000")
    );
    assert_eq!(
        *emit(|e| e.write_tag(23).write_byte_string(&hex!("01020304"))),
        hex!("d74401020304")
    );
    assert_eq!(
        *emit(|e| e.write_tag(32).write_text_string("http://www.example.com")),
        hex!("d82076687474703a2f2f7777772e6578616d706c652e636f6d")
    );

    assert_eq!(*emit(|e| e.write_byte_string(&[])), hex!("40"));
    assert_eq!(*emit(|e| e.write_text_string("")), hex!("60"));
    assert_eq!(*emit(|e| e.write_text_string("IETF")), hex!("6449455446"));
    assert_eq!(*emit(|e| e.write_text_string("\u{00fc}")), hex!("62c3bc"));
    assert_eq!(*emit(|e| e.write_text_string("\u{10151}")), hex!("64f0908591"));

    assert_eq!(*emit(|e| e.write_start_array(Some(0))), hex!("80"));
    assert_eq!(
        *emit(|e| e
            .write_start_array(Some(3))
            .write_uint(1)
            .write_start_array(Some(2))
            .write_uint(2)
            .write_uint(3)
            .write_start_array(Some(2))
            .write_uint(4)
            .write_uint(5)),
        hex!("8301820203820405")
    );
    assert_eq!(*emit(|e| e.write_start_map(Some(0))), hex!("a0"));
    assert_eq!(
        *emit(|e| e
            .write_start_map(Some(2))
            .write_uint(1)
            .write_uint(2)
            .write_uint(3)
            .write_uint(4)),
        hex!("a201020304")
    );
    assert_eq!(
        *emit(|e| e
            .write_start_indefinite_byte_string()
            .write_byte_string(&hex!("0102"))
            .write_byte_string(&hex!("030405"))
            .write_break()),
        hex!("5f42010243030405ff")
    );
    assert_eq!(
        *emit(|e| e
            .write_start_indefinite_text_string()
            .write_text_string("strea")
            .write_text_string("ming")
            .write_break()),
        hex!("7f657374726561646d696e67ff")
    );
    assert_eq!(
        *emit(|e| e.write_start_array(None).write_end_array()),
        hex!("9fff")
    );
    assert_eq!(
        *emit(|e| e
            .write_start_map(None)
            .write_text_string("Fun")
            .write_bool(true)
            .write_text_string("Amt")
            .write_int(-2)
            .write_end_map()),
        hex!("bf6346756ef563416d7421ff")
    );
}

#[test]
fn integer_widths() {
    for (value, data) in [
        (23u64, &hex!("17")[..]),
        (24, &hex!("1818")[..]),
        (255, &hex!("18ff")[..]),
        (256, &hex!("190100")[..]),
        (65535, &hex!("19ffff")[..]),
        (65536, &hex!("1a00010000")[..]),
        (4294967295, &hex!("1affffffff")[..]),
        (4294967296, &hex!("1b0000000100000000")[..]),
    ] {
        assert_eq!(*emit(|e| e.write_uint(value)), *data);
        assert_eq!(*emit_int(value.into()), *data);
    }
}

#[test]
fn special_floats() {
    assert_eq!(*emit_float(f64::NAN), hex!("fb7ff8000000000000"));
    assert_eq!(*emit_float(-f64::NAN), hex!("fb7ff8000000000000"));
    assert_eq!(*emit_float(f64::INFINITY), hex!("fb7ff0000000000000"));
    assert_eq!(*emit_float(f64::NEG_INFINITY), hex!("fbfff0000000000000"));
    assert_eq!(*emit_float(f32::NAN.into()), hex!("fb7ff8000000000000"));
    // Below the half precision range
    assert_eq!(*emit_float(f32::MIN_POSITIVE.into()), hex!("fa00800000"));
}

#[test]
fn big_integers() {
    assert_eq!(*emit(|e| e.write_big_integer(0)), hex!("c24100"));
    assert_eq!(*emit(|e| e.write_big_integer(-1)), hex!("c34100"));
    assert_eq!(*emit(|e| e.write_big_integer(256)), hex!("c2420100"));
    assert_eq!(
        *emit(|e| e.write_big_integer(i128::MAX)),
        hex!("c2507fffffffffffffffffffffffffffffff")
    );
    assert_eq!(
        *emit(|e| e.write_big_integer(i128::MIN)),
        hex!("c3507fffffffffffffffffffffffffffffff")
    );
}

#[test]
#[should_panic]
fn reserved_simple_value() {
    emit(|e| e.write_simple_value(24));
}

#[test]
fn buffer_lifecycle() {
    let mut e = Encoder::new();
    e.write_uint(1).write_uint(2);
    assert_eq!(e.offset(), 2);
    assert_eq!(e.finish(), hex!("0102"));
    assert_eq!(e.finish(), hex!("0102"));

    e.reset().write_encoded_value(&hex!("8301820203820405"));
    assert_eq!(e.offset(), 8);
    assert_eq!(e.into_bytes(), hex!("8301820203820405"));
}

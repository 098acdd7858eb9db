/*!
Value tree to diagnostic notation
*/

use hardy_cbor_tree::{Config, Error, Indefinite, Value};

/// Decodes `data` and formats it as diagnostic notation.
///
/// With `decode_embedded` set, byte strings that hold a well-formed CBOR
/// sequence are shown as `<<item, ...>>`, and a tag 24 wrapping one is shown
/// as `24(item, ...)`. Anything else stays as `h'..'`.
pub fn format_cbor(data: &[u8], config: &Config, decode_embedded: bool) -> Result<String, Error> {
    let value = hardy_cbor_tree::decode_tree_with_config(data, config)?;
    Ok(format_value(&value, decode_embedded))
}

pub fn format_value(value: &Value, decode_embedded: bool) -> String {
    let mut out = String::new();
    write_value(&mut out, value, decode_embedded);
    out
}

fn write_value(out: &mut String, value: &Value, decode_embedded: bool) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Undefined => out.push_str("undefined"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Integer(n) => out.push_str(&n.to_string()),
        Value::Float(f) => out.push_str(&format_float(*f)),
        Value::Simple(code) => out.push_str(&format!("simple({code})")),
        Value::Text(s) => write_text(out, s),
        Value::Bytes(bytes) => match embedded(bytes, decode_embedded) {
            Some(items) => {
                out.push_str("<<");
                write_items(out, &items, decode_embedded);
                out.push_str(">>");
            }
            None => out.push_str(&format!("h'{}'", hex::encode(bytes))),
        },
        Value::Array(items) => {
            out.push('[');
            write_items(out, items, decode_embedded);
            out.push(']');
        }
        Value::Indefinite(Indefinite::Array(items)) => {
            out.push_str("[_ ");
            write_items(out, items, decode_embedded);
            out.push(']');
        }
        Value::Map(pairs) => {
            out.push('{');
            write_pairs(out, pairs, decode_embedded);
            out.push('}');
        }
        Value::Indefinite(Indefinite::Map(pairs)) => {
            out.push_str("{_ ");
            write_pairs(out, pairs, decode_embedded);
            out.push('}');
        }
        Value::Tagged(tag, inner) => {
            out.push_str(&format!("{tag}("));
            match inner.as_ref() {
                Value::Bytes(bytes) if *tag == 24 => match embedded(bytes, decode_embedded) {
                    Some(items) => write_items(out, &items, decode_embedded),
                    None => write_value(out, inner, decode_embedded),
                },
                _ => write_value(out, inner, decode_embedded),
            }
            out.push(')');
        }
    }
}

fn write_items(out: &mut String, items: &[Value], decode_embedded: bool) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_value(out, item, decode_embedded);
    }
}

fn write_pairs(out: &mut String, pairs: &[(Value, Value)], decode_embedded: bool) {
    for (i, (key, value)) in pairs.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_value(out, key, decode_embedded);
        out.push_str(": ");
        write_value(out, value, decode_embedded);
    }
}

// An empty byte string is not treated as an empty sequence
fn embedded(bytes: &[u8], decode_embedded: bool) -> Option<Vec<Value>> {
    if !decode_embedded || bytes.is_empty() {
        return None;
    }
    hardy_cbor_tree::decode_sequence(bytes).ok()
}

/// Debug formatting always keeps a `.` or an exponent, so floats parse back as floats
fn format_float(f: f64) -> String {
    if f.is_nan() {
        "NaN".into()
    } else if f.is_infinite() {
        if f.is_sign_positive() {
            "Infinity".into()
        } else {
            "-Infinity".into()
        }
    } else {
        format!("{f:?}")
    }
}

fn write_text(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

/*!
Compose command - build CBOR from diagnostic notation, JSON or hex
*/

use crate::cdn;
use crate::io::{Input, Output};
use clap::Parser;
use hardy_cbor_tree::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum InputFormat {
    /// CBOR diagnostic notation
    #[value(alias = "diagnostic", alias = "cdn")]
    Diag,
    /// JSON, integers stay integers, everything else maps to its CBOR twin
    Json,
    /// Hex encoded CBOR, whitespace is ignored
    Hex,
}

#[derive(Parser, Debug)]
#[command(
    about = "Encode text as CBOR",
    long_about = "Parse diagnostic notation, JSON or hex and write CBOR bytes.\n\n\
                  Diagnostic notation preserves tags, indefinite lengths and simple values.\n\
                  Hex input is checked to be a well-formed CBOR sequence and written as is."
)]
pub struct Command {
    #[arg(
        long,
        default_value = "diag",
        value_name = "FORMAT",
        help = "Input format: diag/diagnostic/cdn, json, hex"
    )]
    format: InputFormat,

    /// Output file (default: stdout)
    #[arg(short = 'o', long)]
    output: Option<Output>,

    /// Input file (use '-' for stdin)
    input: Input,
}

impl Command {
    pub fn exec(self) -> anyhow::Result<()> {
        let text = self.input.read_text()?;

        let data = match self.format {
            InputFormat::Diag => {
                let value = cdn::parse(&text).map_err(|errors| {
                    let message = errors
                        .iter()
                        .map(|e| format!("Parse error at {:?}: {e}", e.span()))
                        .collect::<Vec<_>>()
                        .join("\n");
                    anyhow::anyhow!("Failed to parse diagnostic notation:\n{message}")
                })?;
                hardy_cbor_tree::encode_tree(&value)
            }
            InputFormat::Json => {
                let json: serde_json::Value = serde_json::from_str(&text)?;
                hardy_cbor_tree::encode_tree(&json_to_value(json)?)
            }
            InputFormat::Hex => hex_to_cbor(&text)?,
        };
        tracing::debug!("Composed {} bytes from {:?}", data.len(), self.format);

        self.output.unwrap_or_default().write(&data)
    }
}

fn hex_to_cbor(text: &str) -> anyhow::Result<Vec<u8>> {
    let digits: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let data = hex::decode(digits)?;
    let items = hardy_cbor_tree::decode_sequence(&data)?;
    tracing::trace!("Hex input holds {} items", items.len());
    Ok(data)
}

fn json_to_value(json: serde_json::Value) -> anyhow::Result<Value> {
    use serde_json::Value as J;

    Ok(match json {
        J::Null => Value::Null,
        J::Bool(b) => Value::Bool(b),
        J::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else if let Some(f) = n.as_f64() {
                Value::Float(f)
            } else {
                anyhow::bail!("Invalid JSON number: {n}")
            }
        }
        J::String(s) => Value::Text(s),
        J::Array(items) => Value::Array(
            items
                .into_iter()
                .map(json_to_value)
                .collect::<Result<_, _>>()?,
        ),
        J::Object(entries) => Value::Map(
            entries
                .into_iter()
                .map(|(key, value)| Ok((Value::Text(key), json_to_value(value)?)))
                .collect::<anyhow::Result<_>>()?,
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_to_value() {
        assert_eq!(json_to_value(json!(null)).unwrap(), Value::Null);
        assert_eq!(json_to_value(json!(-7)).unwrap(), Value::Integer(-7));
        assert_eq!(
            json_to_value(json!(u64::MAX)).unwrap(),
            Value::Integer(u64::MAX as i128)
        );
        assert_eq!(json_to_value(json!(2.5)).unwrap(), Value::Float(2.5));
        assert_eq!(
            json_to_value(json!({"a": [true, "x"]})).unwrap(),
            Value::Map(vec![(
                Value::from("a"),
                Value::Array(vec![Value::Bool(true), Value::from("x")])
            )])
        );
    }

    #[test]
    fn test_json_encoding() {
        let value = json_to_value(json!({"Fun": true, "Amt": -2})).unwrap();
        // serde_json keeps object keys sorted
        assert_eq!(
            hardy_cbor_tree::encode_tree(&value),
            [0xa2, 0x63, b'A', b'm', b't', 0x21, 0x63, b'F', b'u', b'n', 0xf5]
        );
    }

    #[test]
    fn test_hex_to_cbor() {
        assert_eq!(hex_to_cbor("83 01 02 03\n").unwrap(), [0x83, 0x01, 0x02, 0x03]);
        assert_eq!(hex_to_cbor("0102").unwrap(), [0x01, 0x02]);
        assert_eq!(hex_to_cbor("").unwrap(), Vec::<u8>::new());
        // Well-formed hex, malformed CBOR
        assert!(hex_to_cbor("8301").is_err());
        assert!(hex_to_cbor("zz").is_err());
    }
}

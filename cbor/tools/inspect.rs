/*!
Inspect command - print CBOR as diagnostic notation, JSON or hex
*/

use super::cdn;
use super::io::{Input, Output};
use base64::prelude::*;
use clap::Parser;
use hardy_cbor_tree::{Config, Indefinite, Value, config::DEFAULT_MAX_DEPTH};

#[derive(Parser, Debug)]
#[command(about = "Decode CBOR and print it", long_about = None)]
pub struct Command {
    #[arg(
        long,
        default_value = "diag",
        value_name = "FORMAT",
        help = "Output format: diag/diagnostic (lossless), json (lossy), hex"
    )]
    format: OutputFormat,

    #[arg(
        short = 'e',
        long = "decode-embedded",
        help = "Show byte strings that hold CBOR sequences as <<...>> (tag 24 and untagged)"
    )]
    decode_embedded: bool,

    /// Maximum nesting of containers and tags
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH, value_name = "DEPTH")]
    max_depth: usize,

    /// Keep tag 2/3 bignums tagged instead of showing them as plain integers
    #[arg(long)]
    raw_bignums: bool,

    /// Output file (default: stdout)
    #[arg(short = 'o', long)]
    output: Option<Output>,

    /// Input CBOR file (use '-' for stdin)
    input: Input,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    /// CBOR diagnostic notation
    #[value(alias = "diagnostic")]
    Diag,
    /// JSON, dropping tags and CBOR-only types
    Json,
    /// Hexadecimal dump of the input
    Hex,
}

impl Command {
    pub fn exec(self) -> anyhow::Result<()> {
        let data = self.input.read_bytes()?;
        let config = Config {
            max_depth: self.max_depth,
            decode_bignums: !self.raw_bignums,
        };
        tracing::debug!("Inspecting {} bytes as {:?}", data.len(), self.format);

        let text = match self.format {
            OutputFormat::Diag => cdn::format_cbor(&data, &config, self.decode_embedded)?,
            OutputFormat::Json => {
                let value = hardy_cbor_tree::decode_tree_with_config(&data, &config)?;
                serde_json::to_string_pretty(&value_to_json(&value))?
            }
            OutputFormat::Hex => hex::encode(&data),
        };

        self.output.unwrap_or_default().write_text(&text)
    }
}

/// Lossy: tags are dropped, bytes become base64url text, and values
/// JSON cannot hold become `null`
fn value_to_json(value: &Value) -> serde_json::Value {
    use serde_json::Value as J;

    match value {
        Value::Null | Value::Undefined | Value::Simple(_) => J::Null,
        Value::Bool(b) => J::Bool(*b),
        Value::Integer(n) => {
            if let Ok(n) = i64::try_from(*n) {
                J::from(n)
            } else if let Ok(n) = u64::try_from(*n) {
                J::from(n)
            } else {
                J::String(n.to_string())
            }
        }
        Value::Float(f) => serde_json::Number::from_f64(*f).map_or(J::Null, J::Number),
        Value::Text(s) => J::String(s.clone()),
        Value::Bytes(bytes) => J::String(BASE64_URL_SAFE_NO_PAD.encode(bytes)),
        Value::Array(items) | Value::Indefinite(Indefinite::Array(items)) => {
            J::Array(items.iter().map(value_to_json).collect())
        }
        Value::Map(pairs) | Value::Indefinite(Indefinite::Map(pairs)) => J::Object(
            pairs
                .iter()
                .map(|(key, value)| {
                    let key = match key {
                        Value::Text(s) => s.clone(),
                        key => cdn::format_value(key, false),
                    };
                    (key, value_to_json(value))
                })
                .collect(),
        ),
        Value::Tagged(_, inner) => value_to_json(inner),
    }
}

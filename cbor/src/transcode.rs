/*!
Conversion between byte buffers and [`Value`] trees.

Decoding preserves the distinction between definite and indefinite
containers, so `decode_tree(&encode_tree(&v)) == v` for every tree built
from decoded input. Indefinite strings are concatenated and come back as
plain `Bytes` or `Text`.

Integers outside -2^64..2^64-1 are written as tag 2/3 bignums and, by
default, folded back into `Value::Integer` on decode. A `Tagged(2 | 3, Bytes)`
tree holding such a magnitude therefore decodes as the equivalent integer.
*/

use super::*;
use crate::types::Tag;

struct TreeBuilder<'a, 'c> {
    decoder: Decoder<'a>,
    config: &'c Config,
}

impl TreeBuilder<'_, '_> {
    fn read_value(&mut self, depth: usize) -> Result<Value, Error> {
        if depth > self.config.max_depth {
            tracing::debug!(
                "CBOR value at offset {} exceeds maximum depth {}",
                self.decoder.offset(),
                self.config.max_depth
            );
            return Err(Error::DepthLimitExceeded {
                offset: self.decoder.offset(),
                max_depth: self.config.max_depth,
            });
        }

        let state = self.decoder.peek_state()?;
        match state {
            State::UnsignedInteger | State::NegativeInteger => {
                self.decoder.read_int().map(Value::Integer)
            }
            State::ByteString | State::StartIndefiniteLengthByteString => {
                self.decoder.read_byte_string().map(Value::Bytes)
            }
            State::TextString | State::StartIndefiniteLengthTextString => {
                self.decoder.read_text_string().map(Value::Text)
            }
            State::StartArray => self.read_array(depth),
            State::StartMap => self.read_map(depth),
            State::Tag => {
                let tag = self.decoder.read_tag()?;
                let value = self.read_value(depth + 1)?;
                Ok(self.fold_bignum(tag, value))
            }
            State::Boolean => self.decoder.read_boolean().map(Value::Bool),
            State::Null => self.decoder.read_null().map(|_| Value::Null),
            State::SimpleValue => {
                let offset = self.decoder.offset();
                match self.decoder.read_simple_value()? {
                    23 => Ok(Value::Undefined),
                    code => SimpleCode::try_from(code)
                        .map(Value::Simple)
                        .map_err(|_| Error::NotASimpleValueEncoding { offset }),
                }
            }
            State::HalfPrecisionFloat
            | State::SinglePrecisionFloat
            | State::DoublePrecisionFloat => self.decoder.read_double().map(Value::Float),
            State::EndArray
            | State::EndMap
            | State::EndIndefiniteLengthByteString
            | State::EndIndefiniteLengthTextString
            | State::Finished => Err(self.decoder.not_an_item(state)),
        }
    }

    fn read_array(&mut self, depth: usize) -> Result<Value, Error> {
        let length = self.decoder.read_start_array()?;
        let mut items = Vec::with_capacity(length.unwrap_or(0).min(self.decoder.remaining()));
        match length {
            Some(length) => {
                for _ in 0..length {
                    items.push(self.read_value(depth + 1)?);
                }
            }
            None => {
                while self.decoder.peek_state()? != State::EndArray {
                    items.push(self.read_value(depth + 1)?);
                }
            }
        }
        self.decoder.read_end_array()?;
        Ok(match length {
            Some(_) => Value::Array(items),
            None => Value::Indefinite(Indefinite::Array(items)),
        })
    }

    fn read_map(&mut self, depth: usize) -> Result<Value, Error> {
        let length = self.decoder.read_start_map()?;
        let mut pairs = Map::with_capacity(length.unwrap_or(0).min(self.decoder.remaining() / 2));
        match length {
            Some(length) => {
                for _ in 0..length {
                    let key = self.read_value(depth + 1)?;
                    pairs.push((key, self.read_value(depth + 1)?));
                }
            }
            None => {
                while self.decoder.peek_state()? != State::EndMap {
                    let key = self.read_value(depth + 1)?;
                    pairs.push((key, self.read_value(depth + 1)?));
                }
            }
        }
        self.decoder.read_end_map()?;
        Ok(match length {
            Some(_) => Value::Map(pairs),
            None => Value::Indefinite(Indefinite::Map(pairs)),
        })
    }

    fn fold_bignum(&self, tag: u64, value: Value) -> Value {
        if !self.config.decode_bignums {
            return Value::tagged(tag, value);
        }
        let negative = match Tag::from_u64(tag) {
            Tag::PositiveBignum => false,
            Tag::NegativeBignum => true,
            _ => return Value::tagged(tag, value),
        };
        let folded = value.as_bytes().and_then(bignum_magnitude).map(|magnitude| {
            if negative { -1 - magnitude } else { magnitude }
        });
        match folded {
            Some(n) if !is_native(n) => Value::Integer(n),
            _ => Value::tagged(tag, value),
        }
    }
}

/// Whether `n` has a plain major type 0 or 1 encoding
fn is_native(n: i128) -> bool {
    u64::try_from(n).is_ok() || u64::try_from(-1 - n).is_ok()
}

/// Interprets big-endian magnitude bytes, if they fit below 2^127
fn bignum_magnitude(bytes: &[u8]) -> Option<i128> {
    let significant = match bytes.iter().position(|b| *b != 0) {
        Some(start) => &bytes[start..],
        None => return Some(0),
    };
    if significant.len() > 16 {
        return None;
    }
    let magnitude = significant
        .iter()
        .fold(0u128, |acc, b| (acc << 8) | *b as u128);
    i128::try_from(magnitude).ok()
}

/// Decodes exactly one item, failing if anything follows it.
pub fn decode_tree(data: &[u8]) -> Result<Value, Error> {
    decode_tree_with_config(data, &Config::default())
}

#[cfg_attr(feature = "instrument", tracing::instrument(skip_all))]
pub fn decode_tree_with_config(data: &[u8], config: &Config) -> Result<Value, Error> {
    let mut builder = TreeBuilder {
        decoder: Decoder::with_config(data, config),
        config,
    };
    let value = builder.read_value(0).and_then(|value| match builder.decoder.is_finished() {
        Ok(true) => Ok(value),
        _ => Err(Error::TrailingData {
            offset: builder.decoder.offset(),
        }),
    });
    if let Err(e) = &value {
        tracing::trace!("Failed to decode CBOR: {e}");
    }
    value
}

/// Decodes an RFC 8742 sequence: zero or more items back to back.
pub fn decode_sequence(data: &[u8]) -> Result<Vec<Value>, Error> {
    decode_sequence_with_config(data, &Config::default())
}

#[cfg_attr(feature = "instrument", tracing::instrument(skip_all))]
pub fn decode_sequence_with_config(data: &[u8], config: &Config) -> Result<Vec<Value>, Error> {
    let mut builder = TreeBuilder {
        decoder: Decoder::with_config(data, config),
        config,
    };
    let mut values = Vec::new();
    loop {
        match builder.decoder.is_finished() {
            Ok(true) => return Ok(values),
            Ok(false) => {}
            Err(e) => {
                tracing::trace!("Failed to decode CBOR sequence item {}: {e}", values.len());
                return Err(e);
            }
        }
        match builder.read_value(0) {
            Ok(value) => values.push(value),
            Err(e) => {
                tracing::trace!("Failed to decode CBOR sequence item {}: {e}", values.len());
                return Err(e);
            }
        }
    }
}

#[cfg_attr(feature = "instrument", tracing::instrument(skip_all))]
pub fn encode_tree(value: &Value) -> Vec<u8> {
    let mut encoder = Encoder::new();
    encoder.write_value(value);
    encoder.into_bytes()
}

impl Encoder {
    /// Writes a whole tree, preserving indefinite container markers
    pub fn write_value(&mut self, value: &Value) -> &mut Self {
        match value {
            Value::Null => self.write_null(),
            Value::Undefined => self.write_undefined(),
            Value::Bool(b) => self.write_bool(*b),
            Value::Integer(n) => self.write_int(*n),
            Value::Float(f) => self.write_float(*f),
            Value::Simple(code) => self.write_simple_value(code.get()),
            Value::Text(s) => self.write_text_string(s),
            Value::Bytes(b) => self.write_byte_string(b),
            Value::Array(items) => {
                self.write_start_array(Some(items.len()));
                for item in items {
                    self.write_value(item);
                }
                self
            }
            Value::Map(pairs) => {
                self.write_start_map(Some(pairs.len()));
                for (key, value) in pairs {
                    self.write_value(key).write_value(value);
                }
                self
            }
            Value::Indefinite(Indefinite::Array(items)) => {
                self.write_start_array(None);
                for item in items {
                    self.write_value(item);
                }
                self.write_end_array()
            }
            Value::Indefinite(Indefinite::Map(pairs)) => {
                self.write_start_map(None);
                for (key, value) in pairs {
                    self.write_value(key).write_value(value);
                }
                self.write_end_map()
            }
            Value::Tagged(tag, value) => self.write_tag(*tag).write_value(value),
        }
    }
}

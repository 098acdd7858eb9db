/*!
An append-only CBOR writer.

Every argument is written at its shortest width, and finite floats are
narrowed to the smallest of half, single or double precision that holds them
exactly. Integers outside the native -2^64..2^64-1 range fall back to tag 2/3
bignums. Indefinite containers are left open until the caller writes the
break byte.
*/

use super::*;
use crate::types::*;

/// An append-only CBOR writer.
///
/// Every item is written with the shortest argument encoding. The encoder
/// does not track nesting: closing indefinite containers with
/// [`Encoder::write_end_array`] and friends is the caller's job, and
/// definite containers need no closing call at all.
#[derive(Debug, Default, Clone)]
pub struct Encoder {
    data: Vec<u8>,
}

impl Encoder {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    pub fn offset(&self) -> usize {
        self.data.len()
    }

    /// A copy of everything written so far
    pub fn finish(&self) -> Vec<u8> {
        self.data.clone()
    }

    /// Discards everything written, keeping the allocation
    pub fn reset(&mut self) -> &mut Self {
        self.data.clear();
        self
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    fn write_major(&mut self, major: MajorType, val: u64) -> &mut Self {
        if val < ONE_BYTE as u64 {
            self.data.push(pack_initial_byte(major, val as u8))
        } else if val <= u8::MAX as u64 {
            self.data.push(pack_initial_byte(major, ONE_BYTE));
            self.data.push(val as u8)
        } else if val <= u16::MAX as u64 {
            self.data.push(pack_initial_byte(major, TWO_BYTES));
            self.data.extend((val as u16).to_be_bytes())
        } else if val <= u32::MAX as u64 {
            self.data.push(pack_initial_byte(major, FOUR_BYTES));
            self.data.extend((val as u32).to_be_bytes())
        } else {
            self.data.push(pack_initial_byte(major, EIGHT_BYTES));
            self.data.extend(val.to_be_bytes())
        }
        self
    }

    fn write_initial_byte(&mut self, major: MajorType, info: u8) -> &mut Self {
        self.data.push(pack_initial_byte(major, info));
        self
    }

    pub fn write_uint(&mut self, value: u64) -> &mut Self {
        self.write_major(MajorType::UnsignedInteger, value)
    }

    /// Writes an integer, falling back to a bignum outside -2^64..2^64-1
    pub fn write_int(&mut self, value: i128) -> &mut Self {
        if let Ok(value) = u64::try_from(value) {
            self.write_major(MajorType::UnsignedInteger, value)
        } else if let Ok(value) = u64::try_from(-1 - value) {
            self.write_major(MajorType::NegativeInteger, value)
        } else {
            self.write_big_integer(value)
        }
    }

    /// Writes a tag 2 or 3 bignum, whatever the magnitude
    pub fn write_big_integer(&mut self, value: i128) -> &mut Self {
        let (tag, magnitude) = if value < 0 {
            (Tag::NegativeBignum, (-1 - value) as u128)
        } else {
            (Tag::PositiveBignum, value as u128)
        };
        // At least one byte, even for zero
        let leading = ((magnitude.leading_zeros() / 8) as usize).min(15);
        self.write_tag(tag.as_u64())
            .write_byte_string(&magnitude.to_be_bytes()[leading..])
    }

    /// Writes the narrowest float that holds `value` exactly.
    ///
    /// NaN and the infinities are always written as doubles.
    pub fn write_float(&mut self, value: f64) -> &mut Self {
        let value = if value.is_nan() {
            f64::NAN
        } else if value.is_infinite() {
            value
        } else if let Some(f) = lossless_float_coerce::<half::f16>(value) {
            self.write_initial_byte(MajorType::Simple, HALF_FLOAT);
            self.data.extend(f.to_be_bytes());
            return self;
        } else if let Some(f) = lossless_float_coerce::<f32>(value) {
            self.write_initial_byte(MajorType::Simple, SINGLE_FLOAT);
            self.data.extend(f.to_be_bytes());
            return self;
        } else {
            value
        };
        self.write_initial_byte(MajorType::Simple, DOUBLE_FLOAT);
        self.data.extend(value.to_be_bytes());
        self
    }

    pub fn write_bool(&mut self, value: bool) -> &mut Self {
        let value = if value {
            SimpleValue::True
        } else {
            SimpleValue::False
        };
        self.write_initial_byte(MajorType::Simple, value.code())
    }

    pub fn write_null(&mut self) -> &mut Self {
        self.write_initial_byte(MajorType::Simple, SimpleValue::Null.code())
    }

    pub fn write_undefined(&mut self) -> &mut Self {
        self.write_initial_byte(MajorType::Simple, SimpleValue::Undefined.code())
    }

    /// # Panics
    ///
    /// Simple values 24 to 31 are reserved and cannot be written.
    pub fn write_simple_value(&mut self, value: u8) -> &mut Self {
        if (ONE_BYTE..=INDEFINITE).contains(&value) {
            panic!("Invalid simple value {value}, 24 to 31 are reserved");
        }
        self.write_major(MajorType::Simple, value as u64)
    }

    pub fn write_byte_string(&mut self, value: &[u8]) -> &mut Self {
        self.write_major(MajorType::ByteString, value.len() as u64);
        self.data.extend_from_slice(value);
        self
    }

    pub fn write_text_string(&mut self, value: &str) -> &mut Self {
        self.write_major(MajorType::TextString, value.len() as u64);
        self.data.extend_from_slice(value.as_bytes());
        self
    }

    /// Opens an indefinite byte string, write chunks with
    /// [`Encoder::write_byte_string`] and close it with [`Encoder::write_break`]
    pub fn write_start_indefinite_byte_string(&mut self) -> &mut Self {
        self.write_initial_byte(MajorType::ByteString, INDEFINITE)
    }

    /// Opens an indefinite text string, write chunks with
    /// [`Encoder::write_text_string`] and close it with [`Encoder::write_break`]
    pub fn write_start_indefinite_text_string(&mut self) -> &mut Self {
        self.write_initial_byte(MajorType::TextString, INDEFINITE)
    }

    /// Opens an array of `count` items, or an indefinite array if `None`
    pub fn write_start_array(&mut self, count: Option<usize>) -> &mut Self {
        match count {
            Some(count) => self.write_major(MajorType::Array, count as u64),
            None => self.write_initial_byte(MajorType::Array, INDEFINITE),
        }
    }

    /// Closes an indefinite array
    pub fn write_end_array(&mut self) -> &mut Self {
        self.write_break()
    }

    /// Opens a map of `count` pairs, or an indefinite map if `None`
    pub fn write_start_map(&mut self, count: Option<usize>) -> &mut Self {
        match count {
            Some(count) => self.write_major(MajorType::Map, count as u64),
            None => self.write_initial_byte(MajorType::Map, INDEFINITE),
        }
    }

    /// Closes an indefinite map
    pub fn write_end_map(&mut self) -> &mut Self {
        self.write_break()
    }

    pub fn write_break(&mut self) -> &mut Self {
        self.data.push(BREAK);
        self
    }

    pub fn write_tag(&mut self, tag: u64) -> &mut Self {
        self.write_major(MajorType::Tag, tag)
    }

    /// Appends an already encoded item verbatim
    pub fn write_encoded_value(&mut self, value: &[u8]) -> &mut Self {
        self.data.extend_from_slice(value);
        self
    }
}

fn lossless_float_coerce<T>(value: f64) -> Option<T>
where
    T: num_traits::FromPrimitive + Into<f64> + Copy,
{
    match <T as num_traits::FromPrimitive>::from_f64(value) {
        Some(f) if <T as Into<f64>>::into(f) == value => Some(f),
        _ => None,
    }
}

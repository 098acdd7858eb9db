/*!
Wire-level vocabulary shared by the decoder and encoder.

An initial byte packs a 3-bit major type and a 5-bit "additional info" code.
Additional info values below 24 are literal, 24 to 27 select a following
1, 2, 4 or 8 byte argument, 28 to 30 are reserved and 31 marks an
indefinite-length item (or the break byte for major type 7).
*/

/// Additional info: argument is the following byte.
pub const ONE_BYTE: u8 = 24;
/// Additional info: argument is the following 2 bytes.
pub const TWO_BYTES: u8 = 25;
/// Additional info: argument is the following 4 bytes.
pub const FOUR_BYTES: u8 = 26;
/// Additional info: argument is the following 8 bytes.
pub const EIGHT_BYTES: u8 = 27;
/// Additional info: indefinite length (or break, for major type 7).
pub const INDEFINITE: u8 = 31;

/// The break byte closing an indefinite-length item.
pub const BREAK: u8 = 0xFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MajorType {
    UnsignedInteger = 0,
    NegativeInteger = 1,
    ByteString = 2,
    TextString = 3,
    Array = 4,
    Map = 5,
    Tag = 6,
    Simple = 7,
}

impl TryFrom<u8> for MajorType {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::UnsignedInteger),
            1 => Ok(Self::NegativeInteger),
            2 => Ok(Self::ByteString),
            3 => Ok(Self::TextString),
            4 => Ok(Self::Array),
            5 => Ok(Self::Map),
            6 => Ok(Self::Tag),
            7 => Ok(Self::Simple),
            v => Err(v),
        }
    }
}

impl From<MajorType> for u8 {
    fn from(value: MajorType) -> Self {
        value as u8
    }
}

impl core::fmt::Display for MajorType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::UnsignedInteger => "unsigned integer",
            Self::NegativeInteger => "negative integer",
            Self::ByteString => "byte string",
            Self::TextString => "text string",
            Self::Array => "array",
            Self::Map => "map",
            Self::Tag => "tag",
            Self::Simple => "simple value or float",
        })
    }
}

#[inline]
pub const fn pack_initial_byte(major: MajorType, additional_info: u8) -> u8 {
    ((major as u8) << 5) | (additional_info & 0x1F)
}

#[inline]
pub const fn unpack_major_type(byte: u8) -> MajorType {
    // Three bits can only ever hold 0..=7
    match byte >> 5 {
        0 => MajorType::UnsignedInteger,
        1 => MajorType::NegativeInteger,
        2 => MajorType::ByteString,
        3 => MajorType::TextString,
        4 => MajorType::Array,
        5 => MajorType::Map,
        6 => MajorType::Tag,
        _ => MajorType::Simple,
    }
}

#[inline]
pub const fn unpack_additional_info(byte: u8) -> u8 {
    byte & 0x1F
}

/// Well-known semantic tags.
///
/// The decoder and encoder never interpret tags, they only carry the number.
/// This enumeration exists so callers can name the tags they care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    DateTimeString,
    EpochTime,
    PositiveBignum,
    NegativeBignum,
    DecimalFraction,
    Bigfloat,
    ExpectedBase64Url,
    ExpectedBase64,
    ExpectedBase16,
    EmbeddedCbor,
    Uri,
    Base64Url,
    Base64,
    Regex,
    Mime,
    Set,
    SelfDescribe,
    Other(u64),
}

impl Tag {
    pub const fn from_u64(value: u64) -> Self {
        match value {
            0 => Self::DateTimeString,
            1 => Self::EpochTime,
            2 => Self::PositiveBignum,
            3 => Self::NegativeBignum,
            4 => Self::DecimalFraction,
            5 => Self::Bigfloat,
            21 => Self::ExpectedBase64Url,
            22 => Self::ExpectedBase64,
            23 => Self::ExpectedBase16,
            24 => Self::EmbeddedCbor,
            32 => Self::Uri,
            33 => Self::Base64Url,
            34 => Self::Base64,
            35 => Self::Regex,
            36 => Self::Mime,
            258 => Self::Set,
            55799 => Self::SelfDescribe,
            v => Self::Other(v),
        }
    }

    pub const fn as_u64(&self) -> u64 {
        match self {
            Self::DateTimeString => 0,
            Self::EpochTime => 1,
            Self::PositiveBignum => 2,
            Self::NegativeBignum => 3,
            Self::DecimalFraction => 4,
            Self::Bigfloat => 5,
            Self::ExpectedBase64Url => 21,
            Self::ExpectedBase64 => 22,
            Self::ExpectedBase16 => 23,
            Self::EmbeddedCbor => 24,
            Self::Uri => 32,
            Self::Base64Url => 33,
            Self::Base64 => 34,
            Self::Regex => 35,
            Self::Mime => 36,
            Self::Set => 258,
            Self::SelfDescribe => 55799,
            Self::Other(v) => *v,
        }
    }
}

impl From<u64> for Tag {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl From<Tag> for u64 {
    fn from(value: Tag) -> Self {
        value.as_u64()
    }
}

/// Named simple values (major type 7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SimpleValue {
    False = 20,
    True = 21,
    Null = 22,
    Undefined = 23,
}

impl SimpleValue {
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            20 => Some(Self::False),
            21 => Some(Self::True),
            22 => Some(Self::Null),
            23 => Some(Self::Undefined),
            _ => None,
        }
    }

    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }
}

/// Half, single and double precision float codes
pub(crate) const HALF_FLOAT: u8 = TWO_BYTES;
pub(crate) const SINGLE_FLOAT: u8 = FOUR_BYTES;
pub(crate) const DOUBLE_FLOAT: u8 = EIGHT_BYTES;

/*!
A stateful, forward-only CBOR reader.

The [`Decoder`] walks a borrowed byte buffer one data item at a time. It keeps
a stack of open containers so that every read can be validated against its
context: definite containers must be read to exactly their declared length,
indefinite containers must be closed by a break byte, maps must hold whole
key/value pairs, and a tag must be followed by exactly one item.

No read advances the decoder unless it completes successfully, so a caller
may inspect the error and try a different read at the same position.
*/

use super::*;
use crate::types::*;

/// The kind of the next item, as reported by [`Decoder::peek_state`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    UnsignedInteger,
    NegativeInteger,
    ByteString,
    StartIndefiniteLengthByteString,
    EndIndefiniteLengthByteString,
    TextString,
    StartIndefiniteLengthTextString,
    EndIndefiniteLengthTextString,
    StartArray,
    EndArray,
    StartMap,
    EndMap,
    Tag,
    SimpleValue,
    HalfPrecisionFloat,
    SinglePrecisionFloat,
    DoublePrecisionFloat,
    Null,
    Boolean,
    Finished,
}

impl State {
    fn is_end(self) -> bool {
        matches!(
            self,
            Self::EndArray
                | Self::EndMap
                | Self::EndIndefiniteLengthByteString
                | Self::EndIndefiniteLengthTextString
        )
    }
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    /// `None` for the root context
    major: Option<MajorType>,
    start: usize,
    /// Item slots, twice the pair count for maps; `None` when indefinite
    length: Option<usize>,
    items: usize,
    /// Offset of a tag still waiting for its item
    tag: Option<usize>,
}

impl Frame {
    const ROOT: Frame = Frame {
        major: None,
        start: 0,
        length: None,
        items: 0,
        tag: None,
    };
}

/// A decoded initial byte and its argument
#[derive(Debug, Clone, Copy)]
struct Head {
    major: MajorType,
    info: u8,
    argument: u64,
    end: usize,
}

impl Head {
    fn is_indefinite(&self) -> bool {
        self.info == INDEFINITE
    }
}

struct Checkpoint {
    offset: usize,
    depth: usize,
    frame: Frame,
}

pub struct Decoder<'a> {
    data: &'a [u8],
    offset: usize,
    root: Frame,
    stack: Vec<Frame>,
    state: Option<State>,
    max_depth: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_config(data, &Config::default())
    }

    pub fn with_config(data: &'a [u8], config: &Config) -> Self {
        Self {
            data,
            offset: 0,
            root: Frame::ROOT,
            stack: Vec::new(),
            state: None,
            max_depth: config.max_depth,
        }
    }

    /// Offset of the next unread byte
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of unread bytes
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// Number of open containers and chunked strings
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn is_finished(&mut self) -> Result<bool, Error> {
        self.peek_state().map(|s| s == State::Finished)
    }

    fn frame(&self) -> &Frame {
        self.stack.last().unwrap_or(&self.root)
    }

    fn frame_mut(&mut self) -> &mut Frame {
        match self.stack.last_mut() {
            Some(frame) => frame,
            None => &mut self.root,
        }
    }

    /// Reports the kind of the next item without consuming anything.
    ///
    /// The result is cached until the next successful read.
    pub fn peek_state(&mut self) -> Result<State, Error> {
        if let Some(state) = self.state {
            return Ok(state);
        }
        let state = self.resolve_state()?;
        self.state = Some(state);
        Ok(state)
    }

    fn resolve_state(&self) -> Result<State, Error> {
        let frame = self.frame();
        let offset = self.offset;

        // A definite container ends after its last item, without a marker
        if let (Some(major), Some(length)) = (frame.major, frame.length)
            && frame.items >= length
        {
            return Ok(if major == MajorType::Map {
                State::EndMap
            } else {
                State::EndArray
            });
        }

        let Some(&byte) = self.data.get(offset) else {
            return match (frame.major, frame.tag) {
                (_, Some(tag)) => Err(Error::TagNotFollowedByValue { offset: tag }),
                (None, None) => Ok(State::Finished),
                (Some(_), None) => Err(Error::UnexpectedEndOfBuffer { offset, needed: 1 }),
            };
        };

        if byte == BREAK {
            if let Some(tag) = frame.tag {
                return Err(Error::TagNotFollowedByValue { offset: tag });
            }
            return match (frame.major, frame.length) {
                (Some(MajorType::Array), None) => Ok(State::EndArray),
                (Some(MajorType::Map), None) if frame.items % 2 == 1 => {
                    Err(Error::MapKeyMissingValue { offset })
                }
                (Some(MajorType::Map), None) => Ok(State::EndMap),
                (Some(MajorType::ByteString), None) => Ok(State::EndIndefiniteLengthByteString),
                (Some(MajorType::TextString), None) => Ok(State::EndIndefiniteLengthTextString),
                _ => Err(Error::UnexpectedBreakByte { offset }),
            };
        }

        let major = unpack_major_type(byte);
        let info = unpack_additional_info(byte);

        // Chunks of an indefinite string are definite strings of the same type
        if let Some(expected @ (MajorType::ByteString | MajorType::TextString)) = frame.major
            && (major != expected || info == INDEFINITE)
        {
            return Err(Error::IndefiniteStringChunkTypeMismatch { offset, expected });
        }

        let invalid = Error::InvalidAdditionalInfo {
            offset,
            major,
            info,
        };
        if (EIGHT_BYTES + 1..INDEFINITE).contains(&info) {
            return Err(invalid);
        }

        Ok(match (major, info) {
            (
                MajorType::UnsignedInteger | MajorType::NegativeInteger | MajorType::Tag,
                INDEFINITE,
            ) => return Err(invalid),
            (MajorType::UnsignedInteger, _) => State::UnsignedInteger,
            (MajorType::NegativeInteger, _) => State::NegativeInteger,
            (MajorType::ByteString, INDEFINITE) => State::StartIndefiniteLengthByteString,
            (MajorType::ByteString, _) => State::ByteString,
            (MajorType::TextString, INDEFINITE) => State::StartIndefiniteLengthTextString,
            (MajorType::TextString, _) => State::TextString,
            (MajorType::Array, _) => State::StartArray,
            (MajorType::Map, _) => State::StartMap,
            (MajorType::Tag, _) => State::Tag,
            (MajorType::Simple, 20 | 21) => State::Boolean,
            (MajorType::Simple, 22) => State::Null,
            (MajorType::Simple, 0..=19 | 23 | ONE_BYTE) => State::SimpleValue,
            (MajorType::Simple, HALF_FLOAT) => State::HalfPrecisionFloat,
            (MajorType::Simple, SINGLE_FLOAT) => State::SinglePrecisionFloat,
            (MajorType::Simple, DOUBLE_FLOAT) => State::DoublePrecisionFloat,
            (MajorType::Simple, _) => return Err(invalid),
        })
    }

    /// Decodes the initial byte at `offset` and its argument
    fn head(&self, offset: usize) -> Result<Head, Error> {
        let Some(&byte) = self.data.get(offset) else {
            return Err(Error::UnexpectedEndOfBuffer { offset, needed: 1 });
        };
        let major = unpack_major_type(byte);
        let info = unpack_additional_info(byte);
        let width = match info {
            0..=23 => {
                return Ok(Head {
                    major,
                    info,
                    argument: info as u64,
                    end: offset + 1,
                });
            }
            ONE_BYTE => 1,
            TWO_BYTES => 2,
            FOUR_BYTES => 4,
            EIGHT_BYTES => 8,
            INDEFINITE => {
                return Ok(Head {
                    major,
                    info,
                    argument: 0,
                    end: offset + 1,
                });
            }
            _ => {
                return Err(Error::InvalidAdditionalInfo {
                    offset,
                    major,
                    info,
                });
            }
        };

        let start = offset + 1;
        let Some(bytes) = self.data.get(start..start + width) else {
            return Err(Error::UnexpectedEndOfBuffer {
                offset,
                needed: start + width - self.data.len(),
            });
        };
        Ok(Head {
            major,
            info,
            argument: bytes.iter().fold(0u64, |acc, b| (acc << 8) | *b as u64),
            end: start + width,
        })
    }

    /// `length` bytes starting at `start`, bounds checked
    fn payload(&self, offset: usize, start: usize, length: u64) -> Result<&'a [u8], Error> {
        let data: &'a [u8] = self.data;
        let remaining = data.len() - start;
        match usize::try_from(length) {
            Ok(length) if length <= remaining => Ok(&data[start..start + length]),
            _ => Err(Error::UnexpectedEndOfBuffer {
                offset,
                needed: usize::try_from(length - remaining as u64).unwrap_or(usize::MAX),
            }),
        }
    }

    /// The error for reading an item where `state` has none
    pub(crate) fn not_an_item(&self, state: State) -> Error {
        let offset = self.offset;
        match state {
            State::Finished => Error::UnexpectedEndOfBuffer { offset, needed: 1 },
            _ if self.data.get(offset) == Some(&BREAK) => Error::UnexpectedBreakByte { offset },
            _ => Error::NotAtEndOfDefiniteItem {
                offset: self.frame().start,
                read: self.frame().items,
                expected: self.frame().length.unwrap_or(0),
            },
        }
    }

    /// Resolves the next item, which must have major type `expected`
    fn begin(&mut self, expected: MajorType) -> Result<(State, Head), Error> {
        let state = self.peek_state()?;
        if state == State::Finished || state.is_end() {
            return Err(self.not_an_item(state));
        }
        let head = self.head(self.offset)?;
        if head.major != expected {
            return Err(Error::MajorTypeMismatch {
                offset: self.offset,
                expected,
                actual: head.major,
            });
        }
        Ok((state, head))
    }

    /// Completes a read of one item ending at `end`
    fn advance(&mut self, end: usize) {
        self.offset = end;
        self.state = None;
        let frame = self.frame_mut();
        frame.items += 1;
        frame.tag = None;
    }

    pub fn read_uint(&mut self) -> Result<u64, Error> {
        let (_, head) = self.begin(MajorType::UnsignedInteger)?;
        self.advance(head.end);
        Ok(head.argument)
    }

    /// Reads the raw argument `n` of a negative integer, whose value is `-1 - n`
    pub fn read_negative_raw(&mut self) -> Result<u64, Error> {
        let (_, head) = self.begin(MajorType::NegativeInteger)?;
        self.advance(head.end);
        Ok(head.argument)
    }

    /// Reads an unsigned or negative integer
    pub fn read_int(&mut self) -> Result<i128, Error> {
        if self.peek_state()? == State::NegativeInteger {
            self.read_negative_raw().map(|n| -1 - n as i128)
        } else {
            self.read_uint().map(i128::from)
        }
    }

    /// Reads a half, single or double precision float
    pub fn read_double(&mut self) -> Result<f64, Error> {
        let (state, head) = self.begin(MajorType::Simple)?;
        let value = match state {
            State::HalfPrecisionFloat => half::f16::from_bits(head.argument as u16).to_f64(),
            State::SinglePrecisionFloat => f32::from_bits(head.argument as u32) as f64,
            State::DoublePrecisionFloat => f64::from_bits(head.argument),
            _ => {
                return Err(Error::NotAFloatEncoding {
                    offset: self.offset,
                });
            }
        };
        self.advance(head.end);
        Ok(value)
    }

    pub fn read_boolean(&mut self) -> Result<bool, Error> {
        let (_, head) = self.begin(MajorType::Simple)?;
        let value = match SimpleValue::from_code(head.info) {
            Some(SimpleValue::True) => true,
            Some(SimpleValue::False) => false,
            _ => {
                return Err(Error::NotABooleanEncoding {
                    offset: self.offset,
                });
            }
        };
        self.advance(head.end);
        Ok(value)
    }

    pub fn read_null(&mut self) -> Result<(), Error> {
        let (_, head) = self.begin(MajorType::Simple)?;
        if head.info != SimpleValue::Null.code() {
            return Err(Error::NotANullEncoding {
                offset: self.offset,
            });
        }
        self.advance(head.end);
        Ok(())
    }

    pub fn read_undefined(&mut self) -> Result<(), Error> {
        let (_, head) = self.begin(MajorType::Simple)?;
        if head.info != SimpleValue::Undefined.code() {
            return Err(Error::NotAnUndefinedEncoding {
                offset: self.offset,
            });
        }
        self.advance(head.end);
        Ok(())
    }

    /// Reads any simple value, including false, true, null and undefined
    pub fn read_simple_value(&mut self) -> Result<u8, Error> {
        let (_, head) = self.begin(MajorType::Simple)?;
        let value = match head.info {
            0..=23 => head.info,
            // Values below 32 must use the one byte form
            ONE_BYTE if head.argument >= 32 => head.argument as u8,
            _ => {
                return Err(Error::NotASimpleValueEncoding {
                    offset: self.offset,
                });
            }
        };
        self.advance(head.end);
        Ok(value)
    }

    /// Walks the chunks of the string starting with `head`, returning the end offset
    fn string_chunks<F>(&self, head: &Head, mut f: F) -> Result<usize, Error>
    where
        F: FnMut(usize, &'a [u8]) -> Result<(), Error>,
    {
        if !head.is_indefinite() {
            let bytes = self.payload(self.offset, head.end, head.argument)?;
            f(self.offset, bytes)?;
            return Ok(head.end + bytes.len());
        }

        let mut offset = head.end;
        loop {
            match self.data.get(offset) {
                None => return Err(Error::UnexpectedEndOfBuffer { offset, needed: 1 }),
                Some(&BREAK) => return Ok(offset + 1),
                Some(_) => {}
            }
            let chunk = self.head(offset)?;
            if chunk.major != head.major || chunk.is_indefinite() {
                return Err(Error::IndefiniteStringChunkTypeMismatch {
                    offset,
                    expected: head.major,
                });
            }
            let bytes = self.payload(offset, chunk.end, chunk.argument)?;
            f(offset, bytes)?;
            offset = chunk.end + bytes.len();
        }
    }

    /// Reads a definite byte string, or a whole indefinite one
    pub fn read_byte_string(&mut self) -> Result<Vec<u8>, Error> {
        let (_, head) = self.begin(MajorType::ByteString)?;
        let mut value = Vec::new();
        let end = self.string_chunks(&head, |_, bytes| {
            value.extend_from_slice(bytes);
            Ok(())
        })?;
        self.advance(end);
        Ok(value)
    }

    /// Reads a definite text string, or a whole indefinite one
    pub fn read_text_string(&mut self) -> Result<String, Error> {
        let (_, head) = self.begin(MajorType::TextString)?;
        let mut value = String::new();
        let end = self.string_chunks(&head, |offset, bytes| {
            value.push_str(utf8(offset, bytes)?);
            Ok(())
        })?;
        self.advance(end);
        Ok(value)
    }

    fn start_chunked(&mut self, major: MajorType) -> Result<(), Error> {
        let (_, head) = self.begin(major)?;
        if !head.is_indefinite() {
            return Err(Error::InvalidAdditionalInfo {
                offset: self.offset,
                major,
                info: head.info,
            });
        }
        self.push(major, None, head.end)
    }

    /// Opens an indefinite byte string to be read chunk by chunk with
    /// [`Decoder::read_byte_string`]
    pub fn read_start_indefinite_byte_string(&mut self) -> Result<(), Error> {
        self.start_chunked(MajorType::ByteString)
    }

    pub fn read_end_indefinite_byte_string(&mut self) -> Result<(), Error> {
        self.pop(MajorType::ByteString)
    }

    /// Opens an indefinite text string to be read chunk by chunk with
    /// [`Decoder::read_text_string`]
    pub fn read_start_indefinite_text_string(&mut self) -> Result<(), Error> {
        self.start_chunked(MajorType::TextString)
    }

    pub fn read_end_indefinite_text_string(&mut self) -> Result<(), Error> {
        self.pop(MajorType::TextString)
    }

    fn push(&mut self, major: MajorType, length: Option<usize>, end: usize) -> Result<(), Error> {
        if self.stack.len() >= self.max_depth {
            tracing::debug!(
                "CBOR nesting at offset {} exceeds maximum depth {}",
                self.offset,
                self.max_depth
            );
            return Err(Error::DepthLimitExceeded {
                offset: self.offset,
                max_depth: self.max_depth,
            });
        }
        let start = self.offset;
        self.advance(end);
        self.stack.push(Frame {
            major: Some(major),
            start,
            length,
            items: 0,
            tag: None,
        });
        Ok(())
    }

    fn pop(&mut self, major: MajorType) -> Result<(), Error> {
        let offset = self.offset;
        let frame = match self.stack.last() {
            Some(frame) if frame.major == Some(major) => frame,
            _ => return Err(Error::NotInContainer { offset, expected: major }),
        };
        if let Some(tag) = frame.tag {
            return Err(Error::TagNotFollowedByValue { offset: tag });
        }

        let end = match frame.length {
            Some(length) if frame.items != length => {
                return Err(Error::NotAtEndOfDefiniteItem {
                    offset: frame.start,
                    read: frame.items,
                    expected: length,
                });
            }
            Some(_) => offset,
            None => match self.data.get(offset) {
                None => return Err(Error::UnexpectedEndOfBuffer { offset, needed: 1 }),
                Some(&BREAK) if major == MajorType::Map && frame.items % 2 == 1 => {
                    return Err(Error::MapKeyMissingValue { offset });
                }
                Some(&BREAK) => offset + 1,
                Some(_) => return Err(Error::ExpectedBreakByte { offset }),
            },
        };

        self.stack.pop();
        self.offset = end;
        self.state = None;
        Ok(())
    }

    fn start_container(&mut self, major: MajorType) -> Result<Option<usize>, Error> {
        let (_, head) = self.begin(major)?;
        if head.is_indefinite() {
            self.push(major, None, head.end)?;
            return Ok(None);
        }

        let remaining = self.data.len() - head.end;
        let exceeds = Error::DefiniteLengthExceedsBuffer {
            offset: self.offset,
            length: head.argument,
            remaining,
        };
        let slots = if major == MajorType::Map {
            head.argument.checked_mul(2)
        } else {
            Some(head.argument)
        };
        let Some(slots) = slots.and_then(|s| usize::try_from(s).ok()) else {
            return Err(exceeds);
        };
        // Every item takes at least one byte
        if major == MajorType::Map && slots > remaining {
            return Err(exceeds);
        }

        self.push(major, Some(slots), head.end)?;
        Ok(Some(head.argument as usize))
    }

    /// Opens an array, returning its length or `None` if indefinite
    pub fn read_start_array(&mut self) -> Result<Option<usize>, Error> {
        self.start_container(MajorType::Array)
    }

    pub fn read_end_array(&mut self) -> Result<(), Error> {
        self.pop(MajorType::Array)
    }

    /// Opens a map, returning its pair count or `None` if indefinite
    pub fn read_start_map(&mut self) -> Result<Option<usize>, Error> {
        self.start_container(MajorType::Map)
    }

    pub fn read_end_map(&mut self) -> Result<(), Error> {
        self.pop(MajorType::Map)
    }

    /// Returns the next tag number without consuming it
    pub fn peek_tag(&mut self) -> Result<u64, Error> {
        self.begin(MajorType::Tag).map(|(_, head)| head.argument)
    }

    /// Reads a tag number; the next read must be the tagged item
    pub fn read_tag(&mut self) -> Result<u64, Error> {
        let (_, head) = self.begin(MajorType::Tag)?;
        let offset = self.offset;
        self.offset = head.end;
        self.state = None;
        self.frame_mut().tag = Some(offset);
        Ok(head.argument)
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            offset: self.offset,
            depth: self.stack.len(),
            frame: *self.frame(),
        }
    }

    fn rewind(&mut self, checkpoint: Checkpoint) {
        self.stack.truncate(checkpoint.depth);
        *self.frame_mut() = checkpoint.frame;
        self.offset = checkpoint.offset;
        self.state = None;
    }

    /// Consumes one complete item, including any tags and nested items
    pub fn skip_value(&mut self) -> Result<(), Error> {
        self.read_encoded_value().map(|_| ())
    }

    /// Consumes one complete item and returns its exact encoding
    pub fn read_encoded_value(&mut self) -> Result<&'a [u8], Error> {
        let data: &'a [u8] = self.data;
        let checkpoint = self.checkpoint();
        let start = checkpoint.offset;
        match self.skip(0) {
            Ok(()) => Ok(&data[start..self.offset]),
            Err(e) => {
                self.rewind(checkpoint);
                Err(e)
            }
        }
    }

    fn skip(&mut self, depth: usize) -> Result<(), Error> {
        if depth > self.max_depth {
            return Err(Error::DepthLimitExceeded {
                offset: self.offset,
                max_depth: self.max_depth,
            });
        }

        match self.peek_state()? {
            State::UnsignedInteger => self.read_uint().map(|_| ()),
            State::NegativeInteger => self.read_negative_raw().map(|_| ()),
            State::ByteString
            | State::StartIndefiniteLengthByteString
            | State::TextString
            | State::StartIndefiniteLengthTextString => {
                let head = self.head(self.offset)?;
                let text = head.major == MajorType::TextString;
                let end = self.string_chunks(&head, |offset, bytes| {
                    if text {
                        utf8(offset, bytes)?;
                    }
                    Ok(())
                })?;
                self.advance(end);
                Ok(())
            }
            State::StartArray => {
                match self.read_start_array()? {
                    Some(length) => {
                        for _ in 0..length {
                            self.skip(depth + 1)?;
                        }
                    }
                    None => {
                        while self.peek_state()? != State::EndArray {
                            self.skip(depth + 1)?;
                        }
                    }
                }
                self.read_end_array()
            }
            State::StartMap => {
                match self.read_start_map()? {
                    Some(length) => {
                        for _ in 0..length * 2 {
                            self.skip(depth + 1)?;
                        }
                    }
                    None => {
                        while self.peek_state()? != State::EndMap {
                            self.skip(depth + 1)?;
                        }
                    }
                }
                self.read_end_map()
            }
            State::Tag => {
                self.read_tag()?;
                self.skip(depth + 1)
            }
            State::SimpleValue | State::Null | State::Boolean => {
                self.read_simple_value().map(|_| ())
            }
            State::HalfPrecisionFloat
            | State::SinglePrecisionFloat
            | State::DoublePrecisionFloat => self.read_double().map(|_| ()),
            state => Err(self.not_an_item(state)),
        }
    }
}

fn utf8(offset: usize, bytes: &[u8]) -> Result<&str, Error> {
    core::str::from_utf8(bytes).map_err(|source| Error::InvalidUtf8 { offset, source })
}

//! Message parameters and POCSAG message body encoding

use crate::core::{Capcode, Codeword, TransmitWord};
use crate::encoding::encode_word;
use crate::error::{EncodeError, Result};

/// Message content type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MessageType {
    /// Numeric (BCD) page
    Numeric,
    /// Alphanumeric (7-bit ASCII) page
    Alpha,
}

impl MessageType {
    /// POCSAG function bits announced in the address codeword
    pub fn function_bits(&self) -> u32 {
        match self {
            MessageType::Numeric => 0,
            MessageType::Alpha => 3,
        }
    }
}

impl TryFrom<u8> for MessageType {
    type Error = EncodeError;

    /// Map POCSAG function bits back to a message type
    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(MessageType::Numeric),
            3 => Ok(MessageType::Alpha),
            _ => Err(EncodeError::unsupported_type(format!(
                "No message type for function bits {}",
                value
            ))),
        }
    }
}

impl std::str::FromStr for MessageType {
    type Err = EncodeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "numeric" => Ok(MessageType::Numeric),
            "alpha" | "alphanumeric" => Ok(MessageType::Alpha),
            _ => Err(EncodeError::unsupported_type(format!(
                "Unknown message type: {}",
                s
            ))),
        }
    }
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageType::Numeric => write!(f, "Numeric"),
            MessageType::Alpha => write!(f, "Alpha"),
        }
    }
}

/// The inputs for one encoding run
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Message {
    /// Destination pager
    pub capcode: Capcode,
    /// Content type
    pub message_type: MessageType,
    /// Body text
    pub text: String,
}

impl Message {
    /// Create a new message
    pub fn new(capcode: Capcode, message_type: MessageType, text: impl Into<String>) -> Self {
        Message {
            capcode,
            message_type,
            text: text.into(),
        }
    }

    /// Encode the body into POCSAG message codewords
    pub fn pocsag_body(&self) -> Result<Vec<Codeword>> {
        match self.message_type {
            MessageType::Numeric => encode_numeric(&self.text),
            MessageType::Alpha => encode_alpha(&self.text),
        }
    }
}

/// BCD value of a character in the paging numeric character set
///
/// Shared by FLEX and POCSAG: `0`-`9`, spare `*` (0xA), urgency `U`
/// (0xB), space (0xC), hyphen (0xD), `]` or `)` (0xE), `[` or `(` (0xF).
pub fn numeric_digit(c: char) -> Option<u32> {
    match c {
        '0'..='9' => c.to_digit(10),
        '*' => Some(0xA),
        'U' => Some(0xB),
        ' ' => Some(0xC),
        '-' => Some(0xD),
        ']' | ')' => Some(0xE),
        '[' | '(' => Some(0xF),
        _ => None,
    }
}

/// BCD value used to pad unused numeric digit positions
pub const NUMERIC_SPACE: u32 = 0xC;

/// Payload bits carried by one POCSAG message codeword
const POCSAG_PAYLOAD_BITS: u32 = 20;

/// Flag bit marking a POCSAG message (rather than address) codeword
const POCSAG_MESSAGE_FLAG: u32 = 0x8000_0000;

/// Accumulates payload bits and emits POCSAG message codewords
#[derive(Debug, Default)]
struct PayloadPacker {
    words: Vec<Codeword>,
    current: u32,
    filled: u32,
}

impl PayloadPacker {
    fn push_bit(&mut self, bit: bool) {
        self.current = (self.current << 1) | bit as u32;
        self.filled += 1;
        if self.filled == POCSAG_PAYLOAD_BITS {
            self.flush();
        }
    }

    /// Push `count` bits of `value`, least significant bit first
    fn push_lsb_first(&mut self, value: u32, count: u32) {
        for i in 0..count {
            self.push_bit((value >> i) & 1 != 0);
        }
    }

    fn flush(&mut self) {
        let payload = self.current << (POCSAG_PAYLOAD_BITS - self.filled);
        let word = TransmitWord::new(POCSAG_MESSAGE_FLAG | (payload << 11));
        self.words.push(encode_word(word));
        self.current = 0;
        self.filled = 0;
    }

    fn is_partial(&self) -> bool {
        self.filled != 0
    }

    /// Zero-pad any partial word and return the codewords
    fn finish(mut self) -> Vec<Codeword> {
        if self.is_partial() {
            self.flush();
        }
        self.words
    }
}

/// Encode a numeric page body into POCSAG message codewords
///
/// Five digits per codeword, each sent least significant bit first. The
/// last codeword is padded with spaces.
pub fn encode_numeric(text: &str) -> Result<Vec<Codeword>> {
    let mut packer = PayloadPacker::default();
    for c in text.chars() {
        let digit = numeric_digit(c).ok_or_else(|| {
            EncodeError::invalid_message(format!("Character {:?} is not in the numeric set", c))
        })?;
        packer.push_lsb_first(digit, 4);
    }
    while packer.is_partial() {
        packer.push_lsb_first(NUMERIC_SPACE, 4);
    }
    Ok(packer.finish())
}

/// Encode an alphanumeric page body into POCSAG message codewords
///
/// Characters are 7-bit ASCII sent least significant bit first and packed
/// across codeword boundaries. The last codeword is zero padded.
pub fn encode_alpha(text: &str) -> Result<Vec<Codeword>> {
    let mut packer = PayloadPacker::default();
    for c in text.chars() {
        if !c.is_ascii() {
            return Err(EncodeError::invalid_message(format!(
                "Character {:?} is not 7-bit ASCII",
                c
            )));
        }
        packer.push_lsb_first(c as u32, 7);
    }
    Ok(packer.finish())
}

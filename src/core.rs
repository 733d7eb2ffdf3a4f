//! Core types for FLEX and POCSAG word handling
//!
//! Bit order is carried in the type. A [`DataWord`] holds protocol fields
//! with the first transmitted bit in bit 0, the way FLEX numbers its
//! information bits. A [`TransmitWord`] holds the same information with
//! the first transmitted bit in bit 31, the layout the BCH encoder and the
//! bit queue expect. A [`Codeword`] is the finished, FEC-protected word.

use crate::error::{EncodeError, Result};

/// Paging protocol selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Protocol {
    /// Motorola FLEX, 1600 bps two-level
    Flex,
    /// POCSAG (CCIR Radiopaging Code No. 1)
    Pocsag,
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Protocol::Flex => write!(f, "FLEX"),
            Protocol::Pocsag => write!(f, "POCSAG"),
        }
    }
}

/// Pager capcode (subscriber address)
///
/// Capcodes are 21-bit values. Protocol-specific narrower ranges (the
/// FLEX short address window) are checked by the word builders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Capcode(u32);

impl Capcode {
    /// Largest capcode representable in 21 bits
    pub const MAX: u32 = 0x1F_FFFF;

    /// Create a new capcode, validating it fits in 21 bits
    pub fn new(value: u32) -> Result<Self> {
        if value > Self::MAX {
            return Err(EncodeError::range(format!(
                "Capcode {} out of range [0, {}]",
                value,
                Self::MAX
            )));
        }
        Ok(Capcode(value))
    }

    /// Get the raw capcode value
    pub fn value(&self) -> u32 {
        self.0
    }

    /// POCSAG frame (0-7) in which this capcode's address word is sent
    pub fn frame_offset(&self) -> u32 {
        self.0 & 7
    }

    /// The 18 address bits carried in a POCSAG address codeword
    pub fn address_bits(&self) -> u32 {
        self.0 >> 3
    }
}

impl std::fmt::Display for Capcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:07}", self.0)
    }
}

/// An unencoded 32-bit word with its first transmitted bit in bit 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DataWord(u32);

impl DataWord {
    /// Wrap a raw field-packed value
    pub fn new(raw: u32) -> Self {
        DataWord(raw)
    }

    /// Get the raw value
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Reverse the word so the first transmitted bit lands in bit 31
    pub fn to_transmit_order(self) -> TransmitWord {
        TransmitWord(crate::encoding::reverse_bits32(self.0))
    }
}

/// An unencoded 32-bit word with its first transmitted bit in bit 31
///
/// Only the top 21 bits (31..11) are information bits; the low 11 bits
/// are overwritten by the BCH check bits and parity during encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransmitWord(u32);

impl TransmitWord {
    /// Mask selecting the 21 information bits
    pub const DATA_MASK: u32 = 0xFFFF_F800;

    /// Wrap a raw value already in transmit order
    pub fn new(raw: u32) -> Self {
        TransmitWord(raw)
    }

    /// Get the raw value
    pub fn value(&self) -> u32 {
        self.0
    }

    /// The 21 information bits, left in place
    pub fn data_bits(&self) -> u32 {
        self.0 & Self::DATA_MASK
    }
}

/// A BCH(31,21) protected codeword, most significant bit sent first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Codeword(u32);

impl Codeword {
    /// Wrap a literal codeword such as a sync or idle word
    ///
    /// The value is trusted to already be a valid codeword.
    pub const fn from_raw(raw: u32) -> Self {
        Codeword(raw)
    }

    /// Get the raw 32-bit value
    pub fn value(&self) -> u32 {
        self.0
    }

    /// The 21 information bits, left in place
    pub fn data_bits(&self) -> u32 {
        self.0 & TransmitWord::DATA_MASK
    }

    /// The 10 BCH check bits
    pub fn check_bits(&self) -> u32 {
        (self.0 >> 1) & 0x3FF
    }

    /// The overall even-parity bit (bit 0)
    pub fn parity_bit(&self) -> bool {
        self.0 & 1 != 0
    }

    /// Iterate the 32 bits in transmission order (MSB first)
    pub fn bits(&self) -> impl Iterator<Item = bool> {
        let value = self.0;
        (0..32).rev().map(move |i| (value >> i) & 1 != 0)
    }
}

impl std::fmt::Display for Codeword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:032b}", self.0)
    }
}

/// Polar output symbol handed to the modulator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Symbol {
    /// Bit 0, positive deviation
    Plus,
    /// Bit 1, negative deviation
    Minus,
}

impl Symbol {
    /// Map a queued bit to its symbol
    pub fn from_bit(bit: bool) -> Self {
        if bit {
            Symbol::Minus
        } else {
            Symbol::Plus
        }
    }

    /// Integer polar value (+1 / -1)
    pub fn as_i8(&self) -> i8 {
        match self {
            Symbol::Plus => 1,
            Symbol::Minus => -1,
        }
    }

    /// Floating point polar value for FM modulators
    pub fn as_f32(&self) -> f32 {
        self.as_i8() as f32
    }
}
